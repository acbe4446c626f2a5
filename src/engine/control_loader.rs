// ==========================================
// 订单分组汇总系统 - 副表加载器
// ==========================================
// 职责: 副表(排除/刷单) → ControlSet
// 红线: 排除与刷单不得重叠、列内不得重复,违反即中止整次运行
// ==========================================

use crate::domain::reference::ControlSet;
use crate::domain::report::Diagnostic;
use crate::domain::table::{columns, RawTable};
use crate::domain::types::{DiagnosticCategory, Severity};
use crate::engine::diagnostics::DiagnosticsCollector;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{BTreeMap, BTreeSet};

pub struct ControlLoader;

impl ControlLoader {
    /// 加载副表
    ///
    /// - 副表缺失 → 空集合 + 提示
    /// - 副表存在但无有效波次 → 空集合 + 警告
    /// - 重叠/重复 → ControlTableInvalid（汇总全部问题）
    pub fn load(
        table: Option<&RawTable>,
        diagnostics: &mut DiagnosticsCollector,
    ) -> EngineResult<ControlSet> {
        let table = match table {
            Some(t) => t,
            None => {
                diagnostics.note_control(Diagnostic::new(
                    DiagnosticCategory::ControlTable,
                    Severity::Info,
                    "注意：副表不存在",
                ));
                return Ok(ControlSet::default());
            }
        };

        let excluded = column_values(table, columns::CONTROL_EXCLUDED);
        let brush = column_values(table, columns::CONTROL_BRUSH);

        let mut problems = Vec::new();

        let excluded_set: BTreeSet<&str> = excluded.iter().map(String::as_str).collect();
        let brush_set: BTreeSet<&str> = brush.iter().map(String::as_str).collect();
        let overlap: Vec<&str> = excluded_set.intersection(&brush_set).copied().collect();
        if !overlap.is_empty() {
            problems.push(format!("排除和刷单列存在重复数据: {}", overlap.join(", ")));
        }

        let excluded_dups = duplicates(&excluded);
        if !excluded_dups.is_empty() {
            problems.push(format!("排除列中存在重复数据: {}", excluded_dups.join(", ")));
        }

        let brush_dups = duplicates(&brush);
        if !brush_dups.is_empty() {
            problems.push(format!("刷单列中存在重复数据: {}", brush_dups.join(", ")));
        }

        if !problems.is_empty() {
            tracing::warn!(problems = problems.len(), "副表校验失败");
            return Err(EngineError::ControlTableInvalid(problems));
        }

        let set = ControlSet {
            excluded_waves: excluded.into_iter().collect(),
            brush_waves: brush.into_iter().collect(),
            present: true,
        };

        if set.is_empty() {
            diagnostics.note_control(Diagnostic::new(
                DiagnosticCategory::ControlTable,
                Severity::Warn,
                "注意：副表无有效波次数据",
            ));
        }

        tracing::debug!(
            excluded = set.excluded_waves.len(),
            brush = set.brush_waves.len(),
            "副表加载完成"
        );

        Ok(set)
    }
}

/// 读取一列的非空值（去空白，保持行序；列缺失视为空列）
fn column_values(table: &RawTable, column: &str) -> Vec<String> {
    if !table.has_column(column) {
        return Vec::new();
    }
    table
        .records()
        .iter()
        .filter_map(|r| r.cell(column))
        .map(str::to_string)
        .collect()
}

/// 出现不止一次的值（去重、排序）
fn duplicates(values: &[String]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(v, _)| v.to_string())
        .collect()
}
