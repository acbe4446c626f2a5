// ==========================================
// 订单分组汇总系统 - 核心库
// ==========================================
// 技术栈: Rust + calamine/csv + tracing
// 系统定位: 波次订单按 渠道/订单类型/款式 汇总单量与实际数量
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 输入表与结果类型
pub mod domain;

// 配置层 - 引擎配置与运行上下文
pub mod config;

// 引擎层 - 汇总规则
pub mod engine;

// 导入层 - 表格文件读取
pub mod importer;

// 导出层 - 结果写出
pub mod exporter;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Diagnostic, DiagnosticCategory, OrderKind, OutputRow, RawRecord, RawTable, ReconReport,
    RunStats, Severity,
};

// 配置
pub use config::{EngineConfig, RunContext};

// 引擎
pub use engine::{run, EngineError, EngineResult, ReconEngine, ReconInput};

// 导入 / 导出
pub use exporter::CsvReportWriter;
pub use importer::{ImportError, InputFiles, UniversalFileParser};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "订单分组汇总系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "订单分组汇总系统");
    }
}
