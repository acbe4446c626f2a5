// ==========================================
// 订单分组汇总系统 - 配置层
// ==========================================
// 职责: 引擎参数与单次运行上下文
// 存储: JSON 文件（可选）
// ==========================================

pub mod engine_config;

// 重导出核心配置
pub use engine_config::{ConfigLoadError, EngineConfig, RunContext};
