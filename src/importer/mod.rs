// ==========================================
// 订单分组汇总系统 - 导入层
// ==========================================
// 职责: 外部表格文件 → RawTable
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod input_loader;
pub mod order_preparer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, TableParser, UniversalFileParser};
pub use input_loader::{default_input_dir, InputFiles, OUTPUT_FILE};
pub use order_preparer::{OrderTablePreparer, ORDER_IMPORT_COLUMNS, PRINTING_DUTY_KEYWORD};
