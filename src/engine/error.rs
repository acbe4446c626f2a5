// ==========================================
// 订单分组汇总系统 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 只有配置错误与意外错误会中止运行,行级问题一律进诊断
// ==========================================

use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ===== 配置错误（行处理前中止）=====
    #[error("{table}中缺少必要的列: {}", .columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("渠道映射表为空（过滤不完整行后无有效规则）")]
    EmptyMappingTable,

    #[error("副表数据错误:\n{}", .0.join("\n"))]
    ControlTableInvalid(Vec<String>),

    #[error("{table}第 {row} 行字段 {column} 无法解析为整数: {value}")]
    InvalidCell {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    // ===== 意外错误 =====
    #[error("处理过程中出错: {0}")]
    Unexpected(String),
}

impl EngineError {
    /// 是否属于配置类错误
    pub fn is_config_error(&self) -> bool {
        !matches!(self, EngineError::Unexpected(_))
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = EngineError::MissingColumns {
            table: "编码对应关系".to_string(),
            columns: vec!["名称".to_string(), "优先级".to_string()],
        };
        assert_eq!(err.to_string(), "编码对应关系中缺少必要的列: 名称, 优先级");
        assert!(err.is_config_error());
    }

    #[test]
    fn test_control_table_message() {
        let err = EngineError::ControlTableInvalid(vec![
            "排除和刷单列存在重复数据: PB2510150001".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "副表数据错误:\n排除和刷单列存在重复数据: PB2510150001"
        );
    }

    #[test]
    fn test_unexpected_is_not_config() {
        assert!(!EngineError::Unexpected("boom".into()).is_config_error());
    }
}
