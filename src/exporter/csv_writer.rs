// ==========================================
// 订单分组汇总系统 - CSV 报告输出
// ==========================================
// 格式:
//   表头 → 结果行 → 一个空行 → 每条诊断一行（[信息]/[警告]/[错误] 前缀）
// 说明: 默认写入 UTF-8 BOM,便于表格软件识别中文
// ==========================================

use crate::domain::report::{OutputRow, ReconReport};
use crate::exporter::error::ExportResult;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct CsvReportWriter {
    with_bom: bool,
}

impl Default for CsvReportWriter {
    fn default() -> Self {
        Self { with_bom: true }
    }
}

impl CsvReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bom(mut self, enabled: bool) -> Self {
        self.with_bom = enabled;
        self
    }

    /// 写入文件（覆盖已有文件）
    pub fn write_to_path<P: AsRef<Path>>(&self, report: &ReconReport, path: P) -> ExportResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write(report, file)?;

        tracing::info!(
            path = %path.display(),
            rows = report.rows.len(),
            diagnostics = report.diagnostics.len(),
            "汇总结果已写出"
        );
        Ok(())
    }

    pub fn write<W: Write>(&self, report: &ReconReport, mut out: W) -> ExportResult<()> {
        if self.with_bom {
            out.write_all(UTF8_BOM)?;
        }

        let mut writer = WriterBuilder::new().flexible(true).from_writer(out);

        writer.write_record(OutputRow::HEADERS)?;
        for row in &report.rows {
            writer.write_record([
                row.channel.clone(),
                row.order_type.clone(),
                row.style.clone(),
                row.unit_count.to_string(),
                row.quantity_sum.to_string(),
            ])?;
        }

        if report.diagnostics.is_empty() {
            writer.flush()?;
            return Ok(());
        }

        // 空行不能经由 csv 写出（单个空字段会被写成 ""），需直接写底层流
        let mut inner = writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        inner.write_all(b"\n")?;

        let mut writer = WriterBuilder::new().flexible(true).from_writer(inner);
        for diagnostic in &report.diagnostics {
            writer.write_record([format!("{} {}", diagnostic.severity.tag(), diagnostic.text)])?;
        }

        writer.flush()?;
        Ok(())
    }
}
