// ==========================================
// 订单分组汇总系统 - 引擎编排器
// ==========================================
// 用途: 协调一次完整的汇总运行
// 流程:
//   1) 订单表必要列校验
//   2) 参考数据加载（编码表 + 渠道映射表）
//   3) 副表加载与校验
//   4) 逐行分类 → 选择代表编码 → 聚合
//   5) 排序输出 + 诊断定稿
// 红线: 每次运行独立状态; 要么完整结果,要么单一错误
// ==========================================

use crate::config::RunContext;
use crate::domain::order::OrderRow;
use crate::domain::report::{ReconReport, RunStats};
use crate::domain::table::{columns, RawTable};
use crate::domain::types::OrderKind;
use crate::engine::aggregator::Aggregator;
use crate::engine::classifier::{RowClassifier, RowOutcome};
use crate::engine::control_loader::ControlLoader;
use crate::engine::diagnostics::DiagnosticsCollector;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::output_builder::OutputBuilder;
use crate::engine::reference_loader::ReferenceLoader;
use crate::engine::style_selector::{Candidate, StyleSelector};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

/// 订单表名称（用于错误消息）
pub const ORDER_TABLE_NAME: &str = "订单表";

/// 订单表必要列
pub const REQUIRED_ORDER_COLUMNS: [&str; 4] = [
    columns::ORDER_WAVE,
    columns::ORDER_SHOP,
    columns::ORDER_PRODUCT_CODE,
    columns::ORDER_TYPE,
];

// ==========================================
// ReconInput - 一次运行的输入表
// ==========================================
#[derive(Debug, Clone)]
pub struct ReconInput {
    pub orders: RawTable,
    pub code_table: RawTable,
    pub mapping_table: RawTable,
    /// 副表（可缺失）
    pub control_table: Option<RawTable>,
}

// ==========================================
// ReconEngine - 汇总引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReconEngine;

impl ReconEngine {
    pub fn new() -> Self {
        Self
    }

    /// 执行一次完整汇总
    ///
    /// # 参数
    /// - input: 四张输入表
    /// - ctx: 运行上下文（当前日期 + 配置）
    ///
    /// # 返回
    /// - Ok(ReconReport): 完整结果与诊断
    /// - Err(EngineError): 配置错误或意外错误（不产生部分结果）
    pub fn run(&self, input: &ReconInput, ctx: &RunContext) -> EngineResult<ReconReport> {
        run(input, ctx)
    }
}

/// 执行一次完整汇总（自由函数形式）
pub fn run(input: &ReconInput, ctx: &RunContext) -> EngineResult<ReconReport> {
    let run_id = Uuid::new_v4().to_string();
    let span = info_span!("recon_run", run_id = %run_id);
    let _guard = span.enter();

    let started = Instant::now();
    info!(
        today = %ctx.today,
        order_rows = input.orders.len(),
        code_rows = input.code_table.len(),
        mapping_rows = input.mapping_table.len(),
        control_present = input.control_table.is_some(),
        "开始执行订单分组汇总"
    );

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| execute(input, ctx, run_id.clone())));

    let result = match outcome {
        Ok(result) => result,
        Err(payload) => {
            let cause = panic_message(payload.as_ref());
            error!(cause = %cause, "汇总运行意外中止");
            Err(EngineError::Unexpected(cause))
        }
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => info!(
            output_rows = report.rows.len(),
            diagnostics = report.diagnostics.len(),
            aggregated_rows = report.stats.aggregated_rows,
            elapsed_ms,
            "订单分组汇总完成"
        ),
        Err(e) => error!(error = %e, elapsed_ms, "订单分组汇总失败"),
    }

    result
}

fn execute(input: &ReconInput, ctx: &RunContext, run_id: String) -> EngineResult<ReconReport> {
    let config = &ctx.config;

    let missing = input.orders.missing_columns(&REQUIRED_ORDER_COLUMNS);
    if !missing.is_empty() {
        return Err(EngineError::MissingColumns {
            table: ORDER_TABLE_NAME.to_string(),
            columns: missing,
        });
    }

    let reference = ReferenceLoader::new(config).load(&input.code_table, &input.mapping_table)?;

    let mut diagnostics = DiagnosticsCollector::new();
    let control = ControlLoader::load(input.control_table.as_ref(), &mut diagnostics)?;

    let classifier = RowClassifier::new(ctx, &reference, &control);
    let mut selector = StyleSelector::new();
    let mut aggregator = Aggregator::new();
    let mut stats = RunStats {
        total_rows: input.orders.len(),
        ..Default::default()
    };

    for record in input.orders.records() {
        let row = OrderRow::from_record(record);
        let row_number = row.row_number;

        match classifier.classify(&row) {
            RowOutcome::NonToday { wave } => {
                stats.non_today_rows += 1;
                diagnostics.record_non_today(&wave, row_number);
            }
            RowOutcome::UnknownOrderType { tag } => {
                stats.unknown_order_type_rows += 1;
                debug!(row = row_number, tag = %tag, "订单类型无法识别，已跳过");
            }
            RowOutcome::Excluded { wave } => {
                stats.excluded_rows += 1;
                diagnostics.record_excluded(&wave, row_number);
            }
            RowOutcome::Unmapped {
                channel_key,
                tag,
                brush_wave,
            } => {
                stats.unmapped_rows += 1;
                diagnostics.record_unmapped(&channel_key, &tag, row_number);
                if let Some(wave) = brush_wave {
                    diagnostics.note_brush_wave(&wave);
                }
            }
            RowOutcome::Brush {
                wave,
                channel,
                style,
            } => {
                stats.brush_rows += 1;
                stats.aggregated_rows += 1;
                diagnostics.record_brush(&wave, row_number);
                aggregator.add_single(&channel, OrderKind::NEW_LABEL, &style);
            }
            RowOutcome::Regular {
                channel,
                order_type,
                line,
                resolution,
            } => {
                let wave = row.wave_label();

                if resolution.is_fully_unmatched() {
                    stats.fully_unmatched_rows += 1;
                    let codes: Vec<&str> =
                        resolution.unmatched.iter().map(String::as_str).collect();
                    diagnostics.record_fully_unmatched(&wave, row_number, &codes);
                    continue;
                }

                if resolution.is_partially_unmatched() {
                    stats.partially_unmatched_rows += 1;
                    let codes: Vec<&str> =
                        resolution.unmatched.iter().map(String::as_str).collect();
                    diagnostics.record_partially_unmatched(&wave, row_number, &codes);
                }

                if resolution.is_only_ignored() {
                    stats.ignored_code_rows_skipped += 1;
                    diagnostics.record_ignored_skipped(&wave, row_number);
                    continue;
                }

                if !resolution.ignored.is_empty() {
                    stats.ignored_code_rows_filtered += 1;
                    diagnostics.record_ignored_filtered(&wave, row_number);
                }

                let mut candidates = Vec::with_capacity(resolution.matched.len());
                let mut quantities = Vec::with_capacity(resolution.matched.len());
                for code in &resolution.matched {
                    let Some(entry) = reference.entry(code) else {
                        continue;
                    };
                    let qty = line.quantity(code);
                    candidates.push(Candidate::new(code, entry.priority, qty));
                    quantities.push((entry.style_name.as_str(), qty));
                }

                let Some(selected) = selector.select(&candidates) else {
                    continue;
                };
                let Some(selected_entry) = reference.entry(&selected) else {
                    continue;
                };

                aggregator.add_resolved(
                    &channel,
                    &order_type,
                    &selected_entry.style_name,
                    &quantities,
                );
                stats.aggregated_rows += 1;
            }
        }
    }

    debug!(
        non_today_waves = diagnostics.non_today_wave_count(),
        excluded_rows = diagnostics.excluded_row_count(),
        selector_states = selector.state_count(),
        "逐行处理完成"
    );

    let rows = OutputBuilder::new(config, &reference).build(aggregator.finalize());
    let diagnostics = diagnostics.finalize(&control, config);

    Ok(ReconReport {
        run_id,
        rows,
        diagnostics,
        stats,
        selector_usage: selector.usage_snapshot(),
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "未知错误".to_string()
    }
}
