// ==========================================
// 订单分组汇总系统 - 诊断收集器
// ==========================================
// 职责: 按类别批量收集行级问题,运行结束时每类汇总为一条消息
// 红线: 诊断只追加不中止; 列举条目截断仅影响展示,计数始终完整
// ==========================================

use crate::config::EngineConfig;
use crate::domain::reference::ControlSet;
use crate::domain::report::Diagnostic;
use crate::domain::types::{DiagnosticCategory, Severity};
use std::collections::{BTreeMap, BTreeSet};

/// 波次 → 行号列表
type WaveRows = BTreeMap<String, Vec<usize>>;

/// DiagnosticsCollector - 诊断收集器（单次运行私有）
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    non_today_waves: WaveRows,
    unmapped_keys: BTreeMap<(String, String), Vec<usize>>,
    fully_unmatched: WaveRows,
    fully_unmatched_codes: BTreeSet<String>,
    partially_unmatched: WaveRows,
    partially_unmatched_codes: BTreeSet<String>,
    ignored_filtered: WaveRows,
    ignored_skipped: WaveRows,
    brush_waves: WaveRows,
    observed_brush_waves: BTreeSet<String>,
    excluded_waves: WaveRows,
    control_notices: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // 记录方法
    // ==========================================

    pub fn record_non_today(&mut self, wave: &str, row: usize) {
        push_row(&mut self.non_today_waves, wave, row);
    }

    pub fn record_unmapped(&mut self, channel_key: &str, order_type_tag: &str, row: usize) {
        self.unmapped_keys
            .entry((channel_key.to_string(), order_type_tag.to_string()))
            .or_default()
            .push(row);
    }

    pub fn record_fully_unmatched(&mut self, wave: &str, row: usize, codes: &[&str]) {
        push_row(&mut self.fully_unmatched, wave, row);
        self.fully_unmatched_codes
            .extend(codes.iter().map(|c| c.to_string()));
    }

    pub fn record_partially_unmatched(&mut self, wave: &str, row: usize, codes: &[&str]) {
        push_row(&mut self.partially_unmatched, wave, row);
        self.partially_unmatched_codes
            .extend(codes.iter().map(|c| c.to_string()));
    }

    pub fn record_ignored_filtered(&mut self, wave: &str, row: usize) {
        push_row(&mut self.ignored_filtered, wave, row);
    }

    pub fn record_ignored_skipped(&mut self, wave: &str, row: usize) {
        push_row(&mut self.ignored_skipped, wave, row);
    }

    /// 刷单行（同时视为该副表波次已出现）
    pub fn record_brush(&mut self, wave: &str, row: usize) {
        push_row(&mut self.brush_waves, wave, row);
        self.note_brush_wave(wave);
    }

    /// 刷单波次已出现但该行未计入汇总（如渠道未映射）
    pub fn note_brush_wave(&mut self, wave: &str) {
        self.observed_brush_waves.insert(wave.to_string());
    }

    /// 排除行（同时视为该副表波次已出现）
    pub fn record_excluded(&mut self, wave: &str, row: usize) {
        push_row(&mut self.excluded_waves, wave, row);
    }

    /// 副表状态提示（不存在 / 无有效数据）
    pub fn note_control(&mut self, diagnostic: Diagnostic) {
        self.control_notices.push(diagnostic);
    }

    pub fn excluded_row_count(&self) -> usize {
        count_rows(&self.excluded_waves)
    }

    pub fn non_today_wave_count(&self) -> usize {
        self.non_today_waves.len()
    }

    // ==========================================
    // 汇总
    // ==========================================

    /// 生成最终诊断列表（顺序固定）
    pub fn finalize(self, control: &ControlSet, config: &EngineConfig) -> Vec<Diagnostic> {
        let limit = config.unmatched_display_limit;
        let ignored_label = config
            .ignored_priority
            .map(|p| p.to_string())
            .unwrap_or_default();
        let mut out = Vec::new();

        if !self.non_today_waves.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::NonTodayWave,
                Severity::Info,
                format!(
                    "发现非当天波次，已忽略: {}",
                    join_limited(self.non_today_waves.keys(), ", ", limit)
                ),
            ));
        }

        if !self.unmapped_keys.is_empty() {
            let rows: usize = self.unmapped_keys.values().map(Vec::len).sum();
            let keys = self
                .unmapped_keys
                .keys()
                .map(|(channel, tag)| format!("{}（{}）", channel, tag));
            out.push(Diagnostic::new(
                DiagnosticCategory::UnmappedChannel,
                Severity::Warn,
                format!(
                    "发现 {} 行数据未匹配到渠道映射，共 {} 组: {}",
                    rows,
                    self.unmapped_keys.len(),
                    join_limited(keys, "、", limit)
                ),
            ));
        }

        if !self.fully_unmatched.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::FullyUnmatched,
                Severity::Error,
                format!(
                    "发现 {} 行数据未匹配到任何编码，波次号：{}；未匹配编码：{}",
                    count_rows(&self.fully_unmatched),
                    join_limited(self.fully_unmatched.keys(), "、", limit),
                    join_limited(self.fully_unmatched_codes.iter(), "、", limit)
                ),
            ));
        }

        if !self.partially_unmatched.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::PartiallyUnmatched,
                Severity::Error,
                format!(
                    "发现 {} 行数据部分编码未匹配，波次号：{}；未匹配编码：{}",
                    count_rows(&self.partially_unmatched),
                    join_limited(self.partially_unmatched.keys(), "、", limit),
                    join_limited(self.partially_unmatched_codes.iter(), "、", limit)
                ),
            ));
        }

        if !self.ignored_filtered.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::IgnoredCodeFiltered,
                Severity::Info,
                format!(
                    "已处理 {} 行数据（排除了其中的优先级{}编码）:{}",
                    count_rows(&self.ignored_filtered),
                    ignored_label,
                    join_limited(self.ignored_filtered.keys(), "，", limit)
                ),
            ));
        }

        if !self.ignored_skipped.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::IgnoredCodeSkipped,
                Severity::Info,
                format!(
                    "已跳过 {} 行数据（仅包含优先级{}编码）:{}",
                    count_rows(&self.ignored_skipped),
                    ignored_label,
                    join_limited(self.ignored_skipped.keys(), "，", limit)
                ),
            ));
        }

        if !self.brush_waves.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::BrushTally,
                Severity::Info,
                format!(
                    "已处理 {} 条刷单波次:{}",
                    count_rows(&self.brush_waves),
                    join_limited(self.brush_waves.keys(), "，", limit)
                ),
            ));
        }

        if !self.excluded_waves.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::ExcludedTally,
                Severity::Info,
                format!(
                    "已排除 {} 条数据，来自波次: {}",
                    count_rows(&self.excluded_waves),
                    join_limited(self.excluded_waves.keys(), ", ", limit)
                ),
            ));
        }

        // 副表相关消息始终位于末尾
        out.extend(self.control_notices);

        let unmatched_brush: Vec<&String> = control
            .brush_waves
            .iter()
            .filter(|w| !self.observed_brush_waves.contains(w.as_str()))
            .collect();
        if !unmatched_brush.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::UnmatchedBrushWave,
                Severity::Warn,
                format!(
                    "警告：副表中存在没有匹配到的刷单波次: {}",
                    join_limited(unmatched_brush.into_iter(), ", ", limit)
                ),
            ));
        }

        let unmatched_excluded: Vec<&String> = control
            .excluded_waves
            .iter()
            .filter(|w| !self.excluded_waves.contains_key(w.as_str()))
            .collect();
        if !unmatched_excluded.is_empty() {
            out.push(Diagnostic::new(
                DiagnosticCategory::UnmatchedExcludedWave,
                Severity::Warn,
                format!(
                    "警告：副表中存在没有匹配到的排除波次:{}",
                    join_limited(unmatched_excluded.into_iter(), "，", limit)
                ),
            ));
        }

        out
    }
}

fn push_row(map: &mut WaveRows, wave: &str, row: usize) {
    map.entry(wave.to_string()).or_default().push(row);
}

fn count_rows(map: &WaveRows) -> usize {
    map.values().map(Vec::len).sum()
}

/// 拼接展示列表,超过上限时截断并注明总数
pub(crate) fn join_limited<I, S>(items: I, sep: &str, limit: usize) -> String
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    let all: Vec<S> = items.collect();
    let total = all.len();
    let shown: Vec<&str> = all.iter().take(limit.max(1)).map(|s| s.as_ref()).collect();
    let mut text = shown.join(sep);
    if total > shown.len() {
        text.push_str(&format!(" …等 {} 项", total));
    }
    text
}
