// ==========================================
// 订单分组汇总系统 - 订单行模型
// ==========================================
// 红线: OrderRow 为只读输入,引擎内不得修改
// ==========================================

use crate::domain::table::{columns, RawRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// OrderRow - 订单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub wave_id: Option<String>,     // 打印波次（空白视为无波次）
    pub shop_name: String,           // 店铺
    pub order_type_tag: String,      // 订单类型（原始标签）
    pub product_code_field: String,  // 货品商家编码（原始复合字段）
    pub row_number: usize,           // 源文件行号
}

impl OrderRow {
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            wave_id: record.cell(columns::ORDER_WAVE).map(str::to_string),
            shop_name: record.text(columns::ORDER_SHOP).to_string(),
            order_type_tag: record.text(columns::ORDER_TYPE).to_string(),
            product_code_field: record.text(columns::ORDER_PRODUCT_CODE).to_string(),
            row_number: record.row_number,
        }
    }

    /// 店铺渠道前缀（第一个 '/' 之前的部分；无 '/' 时为整个店铺名）
    pub fn shop_prefix(&self) -> &str {
        self.shop_name
            .split('/')
            .next()
            .unwrap_or("")
            .trim()
    }

    /// 波次展示名（无波次时使用占位文本）
    pub fn wave_label(&self) -> String {
        self.wave_id
            .clone()
            .unwrap_or_else(|| NO_WAVE_LABEL.to_string())
    }
}

/// 无波次的展示占位
pub const NO_WAVE_LABEL: &str = "（无波次）";

// ==========================================
// ParsedLine - 复合编码解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// 编码列表（保持字段内顺序，允许重复）
    pub codes: Vec<String>,
    /// 编码 → 数量（重复编码以最后一次为准）
    pub quantity_by_code: HashMap<String, u64>,
}

impl ParsedLine {
    /// 去重后的编码（保持首次出现顺序）
    pub fn distinct_codes(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.codes
            .iter()
            .filter(|c| seen.insert(c.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn quantity(&self, code: &str) -> u64 {
        self.quantity_by_code.get(code).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::RawTable;

    #[test]
    fn test_from_record_blank_wave_is_none() {
        let table = RawTable::from_rows(
            &["打印波次", "店铺", "货品商家编码", "订单类型"],
            &[vec!["  ", "自营/旗舰店", "A*2", "网店销售"]],
        );
        let row = OrderRow::from_record(&table.records()[0]);
        assert_eq!(row.wave_id, None);
        assert_eq!(row.wave_label(), NO_WAVE_LABEL);
        assert_eq!(row.shop_prefix(), "自营");
        assert_eq!(row.row_number, 2);
    }

    #[test]
    fn test_shop_prefix_without_slash() {
        let row = OrderRow {
            wave_id: None,
            shop_name: "线下门店".to_string(),
            order_type_tag: String::new(),
            product_code_field: String::new(),
            row_number: 2,
        };
        assert_eq!(row.shop_prefix(), "线下门店");
    }

    #[test]
    fn test_distinct_codes_keep_first_order() {
        let line = ParsedLine {
            codes: vec!["B".into(), "A".into(), "B".into()],
            quantity_by_code: HashMap::from([("A".into(), 1), ("B".into(), 3)]),
        };
        assert_eq!(line.distinct_codes(), vec!["B", "A"]);
        assert_eq!(line.quantity("B"), 3);
        assert_eq!(line.quantity("Z"), 0);
    }
}
