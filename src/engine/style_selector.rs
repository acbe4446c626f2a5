// ==========================================
// 订单分组汇总系统 - 代表编码选择器
// ==========================================
// 职责: 多编码行中选出唯一代表编码,计入单量
// 规则:
//   1) 仅在最小优先级的候选中选择
//   2) 同优先级同数量 → 按字典序轮询
//   3) 同优先级不同数量 → 最大数量子集（按状态键缓存一次）内轮询
//   4) 不同优先级 → 收缩到最小优先级子集后重试（有界循环）
// 红线: 状态仅在单次运行内有效,不跨运行共享
// ==========================================

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashMap};

/// 选择候选
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub code: &'a str,
    pub priority: i64,
    pub quantity: u64,
}

impl<'a> Candidate<'a> {
    pub fn new(code: &'a str, priority: i64, quantity: u64) -> Self {
        Self {
            code,
            priority,
            quantity,
        }
    }
}

/// 单个候选集合（状态键）的持久状态
#[derive(Debug, Clone, Default)]
struct SelectorState {
    /// 同数量轮询列表（字典序）
    sorted_codes: Option<Vec<String>>,
    /// 同数量轮询计数
    index: u64,
    /// 最大数量子集（首次计算后缓存）
    max_qty_codes: Option<Vec<String>>,
    /// 最大数量子集轮询计数（独立于 index）
    max_qty_index: u64,
    /// 本状态下各编码被选中次数
    counters: HashMap<String, u64>,
}

/// StyleSelector - 代表编码选择器
#[derive(Debug, Default)]
pub struct StyleSelector {
    states: HashMap<Vec<String>, SelectorState>,
    usage: BTreeMap<String, u64>,
}

impl StyleSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 选出代表编码
    ///
    /// # 返回
    /// - Some(code): 代表编码
    /// - None: 候选为空
    pub fn select(&mut self, candidates: &[Candidate<'_>]) -> Option<String> {
        let mut pool: Vec<Candidate<'_>> = candidates.to_vec();

        // 收缩到最小优先级子集；每轮集合严格变小，至多 len 轮
        for _ in 0..=candidates.len() {
            let min_priority = pool.iter().map(|c| c.priority).min()?;
            if pool.iter().all(|c| c.priority == min_priority) {
                break;
            }
            pool.retain(|c| c.priority == min_priority);
        }

        let mut key: Vec<String> = pool.iter().map(|c| c.code.to_string()).collect();
        key.sort();
        key.dedup();

        let state = self.states.entry(key.clone()).or_default();
        let first_qty = pool[0].quantity;
        let same_quantity = pool.iter().all(|c| c.quantity == first_qty);

        let selected = if same_quantity {
            let list = state.sorted_codes.get_or_insert_with(|| key.clone());
            let pick = list[(state.index % list.len() as u64) as usize].clone();
            state.index += 1;
            pick
        } else {
            let subset = state.max_qty_codes.get_or_insert_with(|| max_quantity_subset(&pool));
            if subset.len() > 1 {
                let pick = subset[(state.max_qty_index % subset.len() as u64) as usize].clone();
                state.max_qty_index += 1;
                pick
            } else {
                subset[0].clone()
            }
        };

        *state.counters.entry(selected.clone()).or_insert(0) += 1;
        *self.usage.entry(selected.clone()).or_insert(0) += 1;

        Some(selected)
    }

    /// 编码被选中的总次数
    pub fn usage(&self, code: &str) -> u64 {
        self.usage.get(code).copied().unwrap_or(0)
    }

    /// 指定状态键下编码被选中的次数
    pub fn usage_in(&self, key: &[&str], code: &str) -> u64 {
        let mut key: Vec<String> = key.iter().map(|c| c.to_string()).collect();
        key.sort();
        self.states
            .get(&key)
            .and_then(|s| s.counters.get(code).copied())
            .unwrap_or(0)
    }

    pub fn usage_snapshot(&self) -> BTreeMap<String, u64> {
        self.usage.clone()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// 最大数量子集（字典序）
fn max_quantity_subset(pool: &[Candidate<'_>]) -> Vec<String> {
    let max_qty = pool.iter().map(|c| c.quantity).max().unwrap_or(0);
    let mut codes: Vec<String> = pool
        .iter()
        .filter(|c| c.quantity == max_qty)
        .map(|c| c.code.to_string())
        .collect();
    codes.sort();
    codes.dedup();
    codes
}
