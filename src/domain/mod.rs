// ==========================================
// 订单分组汇总系统 - 领域模型层
// ==========================================
// 职责: 定义输入表、订单行、参考数据、汇总结果
// 红线: 不含文件读写,不含引擎逻辑
// ==========================================

pub mod order;
pub mod reference;
pub mod report;
pub mod table;
pub mod types;

// 重导出核心类型
pub use order::{OrderRow, ParsedLine, NO_WAVE_LABEL};
pub use reference::{CodeEntry, ControlSet, MappingRule, ReferenceData};
pub use report::{
    AggregateBucket, Diagnostic, GroupKey, OutputRow, ReconReport, RunStats,
};
pub use table::{columns, RawRecord, RawTable};
pub use types::{DiagnosticCategory, OrderKind, Severity};
