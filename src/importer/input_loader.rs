// ==========================================
// 订单分组汇总系统 - 输入文件集
// ==========================================
// 职责: 定位四张输入表并解析为 ReconInput
// 默认目录: 环境变量 ORDER_GROUP_CALC_DIR → 桌面 → 用户目录 → 当前目录
// ==========================================

use crate::engine::orchestrator::ReconInput;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::order_preparer::OrderTablePreparer;
use std::path::{Path, PathBuf};

pub const ORDER_FILE: &str = "1.xlsx";
pub const CODE_FILE: &str = "编码对应关系.xlsx";
pub const MAPPING_FILE: &str = "渠道映射.xlsx";
pub const CONTROL_FILE: &str = "副表.xlsx";
pub const OUTPUT_FILE: &str = "输出结果.csv";

/// 订单表 / 编码表所在工作表
pub const MAIN_SHEET: &str = "Sheet1";
/// 副表所在工作表
pub const CONTROL_SHEET: &str = "副表数据";

/// 默认工作目录
pub fn default_input_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ORDER_GROUP_CALC_DIR") {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    pub orders: PathBuf,
    pub codes: PathBuf,
    pub mapping: PathBuf,
    pub control: PathBuf,
}

impl InputFiles {
    /// 目录下的默认文件名
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            orders: dir.join(ORDER_FILE),
            codes: dir.join(CODE_FILE),
            mapping: dir.join(MAPPING_FILE),
            control: dir.join(CONTROL_FILE),
        }
    }

    /// 读取并预处理全部输入表
    ///
    /// 副表文件不存在时视为缺失（由引擎给出提示）
    pub fn load(&self) -> ImportResult<ReconInput> {
        let parser = UniversalFileParser;

        let orders = parser.parse(&self.orders, sheet_for(&self.orders, MAIN_SHEET))?;
        let orders = OrderTablePreparer::new(file_label(&self.orders)).prepare(orders)?;

        let code_table = parser.parse(&self.codes, sheet_for(&self.codes, MAIN_SHEET))?;
        let mapping_table = parser.parse(&self.mapping, None)?;
        let control_table = parser.parse_optional(&self.control, Some(CONTROL_SHEET))?;

        tracing::info!(
            orders = orders.len(),
            codes = code_table.len(),
            mapping = mapping_table.len(),
            control = control_table.as_ref().map(|t| t.len()),
            "输入表加载完成"
        );

        Ok(ReconInput {
            orders,
            code_table,
            mapping_table,
            control_table,
        })
    }
}

/// 仅 Excel 文件按名称取工作表
fn sheet_for<'a>(path: &Path, sheet: &'a str) -> Option<&'a str> {
    let is_excel = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xls"))
        .unwrap_or(false);
    is_excel.then_some(sheet)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_in_dir_default_names() {
        let files = InputFiles::in_dir("/data");
        assert_eq!(files.orders, Path::new("/data/1.xlsx"));
        assert_eq!(files.control, Path::new("/data/副表.xlsx"));
    }

    #[test]
    fn test_load_csv_inputs_without_control() {
        let dir = tempfile::tempdir().unwrap();
        let files = InputFiles {
            orders: write(
                dir.path(),
                "orders.csv",
                "打印波次,店铺,货品商家编码,订单类型,打单员\nW1,天猫/店,A,网店销售,打单\nW1,天猫/店,A,网店销售,审核\n",
            ),
            codes: write(dir.path(), "codes.csv", "货品商家编码,名称,优先级\nA,S1,1\n"),
            mapping: write(dir.path(), "mapping.csv", "渠道,类型,输出渠道,输出类型\n天猫/,网店销售,自营,新订单\n"),
            control: dir.path().join("副表.xlsx"),
        };

        let input = files.load().unwrap();
        assert_eq!(input.orders.len(), 1);
        assert_eq!(input.code_table.len(), 1);
        assert!(input.control_table.is_none());
    }

    #[test]
    fn test_load_reports_missing_order_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InputFiles::in_dir(dir.path()).load().unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }

    #[test]
    fn test_sheet_only_for_excel() {
        assert_eq!(sheet_for(Path::new("a.xlsx"), MAIN_SHEET), Some("Sheet1"));
        assert_eq!(sheet_for(Path::new("a.csv"), MAIN_SHEET), None);
    }
}
