// ==========================================
// 订单分组汇总系统 - 引擎配置
// ==========================================
// 职责: 排序优先级、刷单款式、忽略优先级等可调参数
// 存储: JSON 文件（缺省字段取默认值）
// 红线: 配置由调用方显式构造并传入,引擎内无全局配置
// ==========================================

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 订单渠道排序优先级
    pub channel_priority: HashMap<String, i64>,

    /// 订单类型排序优先级
    pub order_type_priority: HashMap<String, i64>,

    /// 未配置渠道/类型的优先级
    pub unknown_priority: i64,

    /// 编码表优先级缺失且无可前向填充值时的默认值
    pub default_priority: i64,

    /// 编码表排序值缺失时的默认值
    pub default_sort_rank: i64,

    /// 刷单款式在编码表中的编码字面量
    pub brush_code: String,

    /// 编码表中无刷单编码时使用的款式名
    pub default_brush_style: String,

    /// 忽略优先级（该优先级的编码在选择和聚合前剔除；None 表示关闭）
    pub ignored_priority: Option<i64>,

    /// 波次号前缀
    pub wave_prefix: String,

    /// 诊断消息中列举条目的展示上限（仅影响展示，不影响计数）
    pub unmatched_display_limit: usize,

    /// 渠道映射未命中时是否按店铺名推导渠道
    pub legacy_channel_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channel_priority: HashMap::from([
                ("自营".to_string(), 0),
                ("分销".to_string(), 1),
                ("代发".to_string(), 2),
            ]),
            order_type_priority: HashMap::from([
                ("新订单".to_string(), 0),
                ("补发单".to_string(), 1),
                ("批采单".to_string(), 2),
            ]),
            unknown_priority: 999,
            default_priority: 999,
            default_sort_rank: 999,
            brush_code: "刷单".to_string(),
            default_brush_style: "洗脸巾/其它包数".to_string(),
            ignored_priority: Some(100),
            wave_prefix: "PB".to_string(),
            unmatched_display_limit: 20,
            legacy_channel_fallback: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn channel_rank(&self, channel: &str) -> i64 {
        self.channel_priority
            .get(channel)
            .copied()
            .unwrap_or(self.unknown_priority)
    }

    pub fn order_type_rank(&self, order_type: &str) -> i64 {
        self.order_type_priority
            .get(order_type)
            .copied()
            .unwrap_or(self.unknown_priority)
    }

    pub fn is_ignored_priority(&self, priority: i64) -> bool {
        self.ignored_priority == Some(priority)
    }
}

// ==========================================
// RunContext - 单次运行上下文
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    /// 当前日期（用于非当天波次判定）
    pub today: NaiveDate,
    pub config: EngineConfig,
}

impl RunContext {
    pub fn new(today: NaiveDate, config: EngineConfig) -> Self {
        Self { today, config }
    }

    /// 以本地当天日期构造
    pub fn for_today(config: EngineConfig) -> Self {
        Self::new(Local::now().date_naive(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priorities() {
        let config = EngineConfig::default();
        assert_eq!(config.channel_rank("自营"), 0);
        assert_eq!(config.channel_rank("分销"), 1);
        assert_eq!(config.channel_rank("代发"), 2);
        assert_eq!(config.channel_rank("其他"), 999);
        assert_eq!(config.order_type_rank("批采单"), 2);
        assert_eq!(config.order_type_rank("样品单"), 999);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"ignored_priority": null, "legacy_channel_fallback": true}"#,
        )
        .unwrap();
        assert_eq!(config.ignored_priority, None);
        assert!(config.legacy_channel_fallback);
        assert_eq!(config.brush_code, "刷单");
        assert_eq!(config.unmatched_display_limit, 20);
    }

    #[test]
    fn test_invalid_json() {
        let result = EngineConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigLoadError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::from_json_file("/nonexistent/engine.json");
        assert!(matches!(result, Err(ConfigLoadError::Io(_))));
    }

    #[test]
    fn test_is_ignored_priority() {
        let mut config = EngineConfig::default();
        assert!(config.is_ignored_priority(100));
        assert!(!config.is_ignored_priority(1));
        config.ignored_priority = None;
        assert!(!config.is_ignored_priority(100));
    }
}
