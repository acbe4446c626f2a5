// ==========================================
// 订单分组汇总系统 - 参考数据模型
// ==========================================
// 职责: 编码对应关系、渠道映射规则、副表波次集合
// 红线: 运行期间只读
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// ==========================================
// CodeEntry - 编码条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,       // 货品商家编码
    pub style_name: String, // 款式名称
    pub priority: i64,      // 优先级（越小越优先）
    pub sort_rank: i64,     // 排序值
}

// ==========================================
// MappingRule - 渠道映射规则
// ==========================================
// 匹配键: (店铺渠道前缀 + "/", 原始订单类型标签)，按表顺序首个命中
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub input_channel_prefix: String,
    pub input_order_type_tag: String,
    pub output_channel: String,
    pub output_order_type: String,
}

impl MappingRule {
    pub fn matches(&self, channel_key: &str, order_type_tag: &str) -> bool {
        self.input_channel_prefix == channel_key && self.input_order_type_tag == order_type_tag
    }
}

// ==========================================
// ControlSet - 副表波次集合
// ==========================================
// 红线: excluded_waves ∩ brush_waves = ∅（加载时校验）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSet {
    pub excluded_waves: BTreeSet<String>,
    pub brush_waves: BTreeSet<String>,
    /// 副表是否提供
    pub present: bool,
}

impl ControlSet {
    pub fn is_excluded(&self, wave: &str) -> bool {
        self.excluded_waves.contains(wave)
    }

    pub fn is_brush(&self, wave: &str) -> bool {
        self.brush_waves.contains(wave)
    }

    pub fn is_empty(&self) -> bool {
        self.excluded_waves.is_empty() && self.brush_waves.is_empty()
    }
}

// ==========================================
// ReferenceData - 参考数据汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// 编码 → 条目
    pub codes: HashMap<String, CodeEntry>,
    /// 款式 → 最小排序值
    pub style_sort: HashMap<String, i64>,
    /// 渠道映射规则（有序）
    pub mapping_rules: Vec<MappingRule>,
    /// 刷单款式
    pub brush_style: String,
}

impl ReferenceData {
    pub fn entry(&self, code: &str) -> Option<&CodeEntry> {
        self.codes.get(code)
    }

    /// 首个命中的映射规则
    pub fn find_rule(&self, channel_key: &str, order_type_tag: &str) -> Option<&MappingRule> {
        self.mapping_rules
            .iter()
            .find(|r| r.matches(channel_key, order_type_tag))
    }

    /// 未知款式的排序值 = 已知最大排序值 + 1
    pub fn unknown_style_rank(&self, default_sort_rank: i64) -> i64 {
        self.style_sort
            .values()
            .copied()
            .max()
            .unwrap_or(default_sort_rank)
            .saturating_add(1)
    }
}
