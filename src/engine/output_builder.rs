// ==========================================
// 订单分组汇总系统 - 输出排序
// ==========================================
// 排序键 (升序, 稳定排序):
//   1) 渠道优先级     自营 < 分销 < 代发 < 其他
//   2) 渠道名称       同优先级的未知渠道按名称聚在一起
//   3) 订单类型优先级 新订单 < 补发单 < 批采单 < 其他
//   4) 款式排序值     未知款式排在所有已知款式之后
// 同键时保持聚合键字典序,保证结果确定
// ==========================================

use crate::config::EngineConfig;
use crate::domain::reference::ReferenceData;
use crate::domain::report::{AggregateBucket, GroupKey, OutputRow};

pub struct OutputBuilder<'a> {
    config: &'a EngineConfig,
    reference: &'a ReferenceData,
}

impl<'a> OutputBuilder<'a> {
    pub fn new(config: &'a EngineConfig, reference: &'a ReferenceData) -> Self {
        Self { config, reference }
    }

    /// 款式排序值
    pub fn style_rank(&self, style: &str) -> i64 {
        self.reference
            .style_sort
            .get(style)
            .copied()
            .unwrap_or_else(|| self.reference.unknown_style_rank(self.config.default_sort_rank))
    }

    pub fn sort_key<'k>(&self, key: &'k GroupKey) -> (i64, &'k str, i64, i64) {
        (
            self.config.channel_rank(&key.channel),
            key.channel.as_str(),
            self.config.order_type_rank(&key.order_type),
            self.style_rank(&key.style),
        )
    }

    /// 生成有序输出行
    ///
    /// 入参应已按聚合键字典序排列（Aggregator::finalize 的输出）
    pub fn build(&self, mut buckets: Vec<(GroupKey, AggregateBucket)>) -> Vec<OutputRow> {
        buckets.sort_by(|a, b| self.sort_key(&a.0).cmp(&self.sort_key(&b.0)));

        buckets
            .into_iter()
            .map(|(key, bucket)| OutputRow::from_bucket(key, bucket))
            .collect()
    }
}
