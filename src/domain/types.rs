// ==========================================
// 订单分组汇总系统 - 领域类型定义
// ==========================================
// 职责: 诊断级别、诊断类别、标准订单类型
// 红线: 级别仅用于展示着色,不参与计算
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 诊断级别 (Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,  // 提示（绿色）
    Warn,  // 警告（紫色）
    Error, // 错误（红色）
}

impl Severity {
    /// 导出时使用的标签
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Info => "[信息]",
            Severity::Warn => "[警告]",
            Severity::Error => "[错误]",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warn => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

// ==========================================
// 诊断类别 (Diagnostic Category)
// ==========================================
// 每个类别在一次运行中最多汇总为一条消息
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCategory {
    NonTodayWave,       // 非当天波次
    UnmappedChannel,    // 渠道映射未命中
    FullyUnmatched,     // 编码全部未匹配
    PartiallyUnmatched, // 编码部分未匹配
    IgnoredCodeFiltered, // 剔除了忽略优先级编码
    IgnoredCodeSkipped, // 仅含忽略优先级编码
    BrushTally,         // 刷单汇总
    ExcludedTally,      // 排除汇总
    ControlTable,       // 副表状态
    UnmatchedBrushWave, // 副表刷单波次未出现
    UnmatchedExcludedWave, // 副表排除波次未出现
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticCategory::NonTodayWave => "NON_TODAY_WAVE",
            DiagnosticCategory::UnmappedChannel => "UNMAPPED_CHANNEL",
            DiagnosticCategory::FullyUnmatched => "FULLY_UNMATCHED",
            DiagnosticCategory::PartiallyUnmatched => "PARTIALLY_UNMATCHED",
            DiagnosticCategory::IgnoredCodeFiltered => "IGNORED_CODE_FILTERED",
            DiagnosticCategory::IgnoredCodeSkipped => "IGNORED_CODE_SKIPPED",
            DiagnosticCategory::BrushTally => "BRUSH_TALLY",
            DiagnosticCategory::ExcludedTally => "EXCLUDED_TALLY",
            DiagnosticCategory::ControlTable => "CONTROL_TABLE",
            DiagnosticCategory::UnmatchedBrushWave => "UNMATCHED_BRUSH_WAVE",
            DiagnosticCategory::UnmatchedExcludedWave => "UNMATCHED_EXCLUDED_WAVE",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 标准订单类型 (Normalized Order Type)
// ==========================================
// 由原始订单类型标签归一化得到
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    New,     // 新订单
    Reissue, // 补发单
}

impl OrderKind {
    pub const NEW_LABEL: &'static str = "新订单";
    pub const REISSUE_LABEL: &'static str = "补发单";

    /// 根据订单类型标签归一化
    ///
    /// - 含 "订单补发" → 补发单
    /// - 含 "网店销售" 或 "线下零售" → 新订单
    /// - 其他 → None（调用方静默丢弃）
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.contains("订单补发") {
            Some(OrderKind::Reissue)
        } else if tag.contains("网店销售") || tag.contains("线下零售") {
            Some(OrderKind::New)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderKind::New => Self::NEW_LABEL,
            OrderKind::Reissue => Self::REISSUE_LABEL,
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_kind_from_tag() {
        assert_eq!(OrderKind::from_tag("网店销售"), Some(OrderKind::New));
        assert_eq!(OrderKind::from_tag(" 线下零售 "), Some(OrderKind::New));
        assert_eq!(OrderKind::from_tag("订单补发-顺丰"), Some(OrderKind::Reissue));
        assert_eq!(OrderKind::from_tag("批发采购"), None);
        assert_eq!(OrderKind::from_tag(""), None);
    }

    #[test]
    fn test_reissue_wins_over_sales_tag() {
        assert_eq!(OrderKind::from_tag("网店销售/订单补发"), Some(OrderKind::Reissue));
    }

    #[test]
    fn test_severity_tag() {
        assert_eq!(Severity::Info.tag(), "[信息]");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }
}
