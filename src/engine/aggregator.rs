// ==========================================
// 订单分组汇总系统 - 聚合器
// ==========================================
// 职责: 按 (渠道, 订单类型, 款式) 累加单量与实际数量
// 规则:
//   - 刷单行: 单量 +1, 数量 +1
//   - 多编码行: 每个已匹配编码的数量计入其自身款式;
//               单量仅计入代表编码的款式
// 说明: 多款式行会使某些桶的数量大于单量,属预期行为
// ==========================================

use crate::domain::report::{AggregateBucket, GroupKey};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct Aggregator {
    buckets: BTreeMap<GroupKey, AggregateBucket>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&mut self, channel: &str, order_type: &str, style: &str) -> &mut AggregateBucket {
        self.buckets
            .entry(GroupKey::new(channel, order_type, style))
            .or_default()
    }

    /// 单件计入（刷单行 / 单编码且数量按 1 计的行）
    pub fn add_single(&mut self, channel: &str, order_type: &str, style: &str) {
        let bucket = self.bucket(channel, order_type, style);
        bucket.unit_count += 1;
        bucket.quantity_sum += 1;
    }

    /// 多编码行计入
    ///
    /// # 参数
    /// - `selected_style`: 代表编码的款式（单量 +1）
    /// - `quantities`: 每个已匹配编码的 (款式, 数量)
    pub fn add_resolved(
        &mut self,
        channel: &str,
        order_type: &str,
        selected_style: &str,
        quantities: &[(&str, u64)],
    ) {
        for (style, qty) in quantities {
            self.bucket(channel, order_type, style).quantity_sum += *qty;
        }
        self.bucket(channel, order_type, selected_style).unit_count += 1;
    }

    pub fn get(&self, key: &GroupKey) -> Option<&AggregateBucket> {
        self.buckets.get(key)
    }

    /// 定稿：丢弃单量为 0 的桶（按键字典序返回）
    pub fn finalize(self) -> Vec<(GroupKey, AggregateBucket)> {
        self.buckets
            .into_iter()
            .filter(|(_, b)| b.unit_count > 0)
            .collect()
    }
}
