// ==========================================
// 订单分组汇总系统 - 逻辑表
// ==========================================
// 职责: 引擎所有输入表的统一形态（列名 + 行记录）
// 约定: 单元格去首尾空白后为空 → 视为 NULL
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 标准列名
pub mod columns {
    // ===== 订单表 (1.xlsx) =====
    pub const ORDER_WAVE: &str = "打印波次";
    pub const ORDER_SHOP: &str = "店铺";
    pub const ORDER_PRODUCT_CODE: &str = "货品商家编码";
    pub const ORDER_TYPE: &str = "订单类型";
    pub const ORDER_OPERATOR: &str = "打单员";

    // ===== 编码对应关系表 =====
    pub const CODE_CODE: &str = "货品商家编码";
    pub const CODE_NAME: &str = "名称";
    pub const CODE_PRIORITY: &str = "优先级";
    pub const CODE_SORT: &str = "排序";

    // ===== 渠道映射表（首个为标准列名，其余为别名）=====
    pub const MAPPING_CHANNEL: &[&str] = &["渠道", "店铺渠道"];
    pub const MAPPING_TYPE: &[&str] = &["类型", "订单类型"];
    pub const MAPPING_OUTPUT_CHANNEL: &[&str] = &["输出渠道"];
    pub const MAPPING_OUTPUT_TYPE: &[&str] = &["输出类型", "输出订单类型"];

    // ===== 副表 =====
    pub const CONTROL_EXCLUDED: &str = "排除";
    pub const CONTROL_BRUSH: &str = "刷单";
}

/// 单行记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 源文件行号（表头为第 1 行）
    pub row_number: usize,
    pub cells: HashMap<String, String>,
}

impl RawRecord {
    /// 读取单元格（去空白，空串视为 None）
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// 读取单元格，空值返回空串
    pub fn text(&self, column: &str) -> &str {
        self.cell(column).unwrap_or("")
    }
}

/// RawTable - 逻辑表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    columns: Vec<String>,
    records: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| c.trim().to_string()).collect(),
            records: Vec::new(),
        }
    }

    /// 由字面量构造（测试与演示数据使用）
    ///
    /// 第 i 行数据的行号为 i + 2。
    pub fn from_rows(columns: &[&str], rows: &[Vec<&str>]) -> Self {
        let mut table = Self::new(columns.iter().map(|c| c.to_string()).collect());
        for (idx, row) in rows.iter().enumerate() {
            let cells = columns
                .iter()
                .zip(row.iter())
                .map(|(c, v)| (c.to_string(), v.trim().to_string()))
                .collect();
            table.push(RawRecord {
                row_number: idx + 2,
                cells,
            });
        }
        table
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// 返回缺失的必需列（保持入参顺序）
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    /// 在别名列表中找到表中实际存在的列名
    pub fn resolve_column<'a>(&self, aliases: &[&'a str]) -> Option<&'a str> {
        aliases.iter().copied().find(|alias| self.has_column(alias))
    }

    /// 按谓词保留行（返回新表）
    pub fn retain_records<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&RawRecord) -> bool,
    {
        self.records.retain(|r| keep(r));
        self
    }
}
