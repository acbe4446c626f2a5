// ==========================================
// 订单分组汇总系统 - 命令行入口
// ==========================================
// 流程: 读取输入表 → 执行汇总 → 写出 CSV → 终端打印诊断
// 退出码: 0 成功; 1 输入或配置错误; 2 存在错误级诊断
// ==========================================

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use order_group_calc::config::{EngineConfig, RunContext};
use order_group_calc::engine::ReconEngine;
use order_group_calc::exporter::CsvReportWriter;
use order_group_calc::importer::{default_input_dir, InputFiles, OUTPUT_FILE};
use order_group_calc::logging::{self, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "order-group-calc")]
#[command(about = "订单分组汇总: 按渠道/订单类型/款式统计单量与实际数量")]
#[command(version)]
struct Cli {
    /// 输入文件所在目录（默认: 桌面）
    #[arg(long)]
    dir: Option<PathBuf>,

    /// 引擎配置 JSON 文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 运行日期 YYYY-MM-DD（默认: 今天）
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// 输出 CSV 路径（默认: <dir>/输出结果.csv）
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    log_json: bool,
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("日期格式应为 YYYY-MM-DD: {}", e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init_with_format(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    tracing::info!("{} v{}", order_group_calc::APP_NAME, order_group_calc::VERSION);

    match execute(cli) {
        Ok(has_errors) if has_errors => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("错误: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// 返回结果中是否存在错误级诊断
fn execute(cli: Cli) -> Result<bool> {
    let dir = cli.dir.unwrap_or_else(default_input_dir);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let ctx = match cli.date {
        Some(date) => RunContext::new(date, config),
        None => RunContext::for_today(config),
    };

    let input = InputFiles::in_dir(&dir)
        .load()
        .with_context(|| format!("读取输入文件失败: {}", dir.display()))?;

    let report = ReconEngine::new().run(&input, &ctx)?;

    let output = cli.output.unwrap_or_else(|| dir.join(OUTPUT_FILE));
    CsvReportWriter::new()
        .write_to_path(&report, &output)
        .with_context(|| format!("写出结果失败: {}", output.display()))?;

    for diagnostic in &report.diagnostics {
        println!("{} {}", diagnostic.severity.tag(), diagnostic.text);
    }
    println!("结果已保存到: {}", output.display());

    Ok(report.has_errors())
}
