// ==========================================
// 订单分组汇总系统 - 汇总结果模型
// ==========================================
// 职责: 聚合键、聚合桶、输出行、诊断消息、运行统计
// ==========================================

use crate::domain::types::{DiagnosticCategory, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// GroupKey - 聚合键 (输出渠道, 输出订单类型, 款式)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub channel: String,
    pub order_type: String,
    pub style: String,
}

impl GroupKey {
    pub fn new(channel: &str, order_type: &str, style: &str) -> Self {
        Self {
            channel: channel.to_string(),
            order_type: order_type.to_string(),
            style: style.to_string(),
        }
    }
}

// ==========================================
// AggregateBucket - 聚合桶
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub unit_count: u64,   // 单量
    pub quantity_sum: u64, // 实际数量
}

// ==========================================
// OutputRow - 输出行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub channel: String,
    pub order_type: String,
    pub style: String,
    pub unit_count: u64,
    pub quantity_sum: u64,
}

impl OutputRow {
    pub fn from_bucket(key: GroupKey, bucket: AggregateBucket) -> Self {
        Self {
            channel: key.channel,
            order_type: key.order_type,
            style: key.style,
            unit_count: bucket.unit_count,
            quantity_sum: bucket.quantity_sum,
        }
    }

    /// 输出表头
    pub const HEADERS: [&'static str; 5] = ["订单渠道", "订单类型", "款式", "单量", "实际数量"];
}

// ==========================================
// Diagnostic - 诊断消息
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub text: String,
    pub severity: Severity,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    pub fn new(category: DiagnosticCategory, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity,
            category,
        }
    }
}

// ==========================================
// RunStats - 运行统计（审计用，不进入输出表）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_rows: usize,
    pub aggregated_rows: usize,
    pub non_today_rows: usize,
    pub unknown_order_type_rows: usize,
    pub unmapped_rows: usize,
    pub excluded_rows: usize,
    pub brush_rows: usize,
    pub fully_unmatched_rows: usize,
    pub partially_unmatched_rows: usize,
    pub ignored_code_rows_skipped: usize,
    pub ignored_code_rows_filtered: usize,
}

// ==========================================
// ReconReport - 一次运行的完整结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconReport {
    pub run_id: String,
    pub rows: Vec<OutputRow>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RunStats,
    /// 代表编码被选中次数
    pub selector_usage: BTreeMap<String, u64>,
}

impl ReconReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn diagnostics_of(
        &self,
        category: DiagnosticCategory,
    ) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.category == category)
    }

    pub fn find_row(&self, channel: &str, order_type: &str, style: &str) -> Option<&OutputRow> {
        self.rows
            .iter()
            .find(|r| r.channel == channel && r.order_type == order_type && r.style == style)
    }
}
