// ==========================================
// 订单分组汇总系统 - 导出层
// ==========================================
// 职责: ReconReport → 外部文件
// ==========================================

pub mod csv_writer;
pub mod error;

pub use csv_writer::CsvReportWriter;
pub use error::{ExportError, ExportResult};
