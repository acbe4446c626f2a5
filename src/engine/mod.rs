// ==========================================
// 订单分组汇总系统 - 引擎层
// ==========================================
// 职责: 参考数据加载、行分类、代表编码选择、聚合与排序
// 红线: 引擎不做文件读写,不打印; 诊断是数据,日志是日志
// ==========================================

pub mod aggregator;
pub mod classifier;
pub mod code_resolver;
pub mod control_loader;
pub mod diagnostics;
pub mod error;
pub mod orchestrator;
pub mod output_builder;
pub mod reference_loader;
pub mod style_selector;

// 重导出核心引擎
pub use aggregator::Aggregator;
pub use classifier::{RowClassifier, RowOutcome};
pub use code_resolver::Resolution;
pub use control_loader::ControlLoader;
pub use diagnostics::DiagnosticsCollector;
pub use error::{EngineError, EngineResult};
pub use orchestrator::{run, ReconEngine, ReconInput, REQUIRED_ORDER_COLUMNS};
pub use output_builder::OutputBuilder;
pub use reference_loader::ReferenceLoader;
pub use style_selector::{Candidate, StyleSelector};
