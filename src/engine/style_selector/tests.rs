use super::{Candidate, StyleSelector};

// ==========================================
// 测试辅助函数
// ==========================================

fn pick_n(selector: &mut StyleSelector, candidates: &[Candidate<'_>], n: usize) -> Vec<String> {
    (0..n)
        .map(|_| selector.select(candidates).expect("候选非空"))
        .collect()
}

// ==========================================
// 轮询（同优先级、同数量）
// ==========================================

#[test]
fn test_round_robin_equal_priority_and_quantity() {
    let mut selector = StyleSelector::new();
    let candidates = [Candidate::new("X", 1, 1), Candidate::new("Y", 1, 1)];

    assert_eq!(pick_n(&mut selector, &candidates, 4), vec!["X", "Y", "X", "Y"]);
    assert_eq!(selector.usage("X"), 2);
    assert_eq!(selector.usage("Y"), 2);
}

#[test]
fn test_round_robin_is_lexicographic_regardless_of_input_order() {
    let mut selector = StyleSelector::new();
    let candidates = [
        Candidate::new("C", 2, 1),
        Candidate::new("A", 2, 1),
        Candidate::new("B", 2, 1),
    ];

    assert_eq!(
        pick_n(&mut selector, &candidates, 4),
        vec!["A", "B", "C", "A"]
    );
}

#[test]
fn test_state_shared_across_rows_with_same_candidate_set() {
    let mut selector = StyleSelector::new();

    let first = selector.select(&[Candidate::new("Y", 1, 2), Candidate::new("X", 1, 2)]);
    let second = selector.select(&[Candidate::new("X", 1, 5), Candidate::new("Y", 1, 5)]);

    assert_eq!(first.as_deref(), Some("X"));
    assert_eq!(second.as_deref(), Some("Y"));
    assert_eq!(selector.state_count(), 1);
}

#[test]
fn test_independent_state_per_candidate_set() {
    let mut selector = StyleSelector::new();
    let xy = [Candidate::new("X", 1, 1), Candidate::new("Y", 1, 1)];
    let xz = [Candidate::new("X", 1, 1), Candidate::new("Z", 1, 1)];

    assert_eq!(selector.select(&xy).as_deref(), Some("X"));
    assert_eq!(selector.select(&xz).as_deref(), Some("X"));
    assert_eq!(selector.select(&xy).as_deref(), Some("Y"));
    assert_eq!(selector.select(&xz).as_deref(), Some("Z"));
    assert_eq!(selector.state_count(), 2);
    assert_eq!(selector.usage_in(&["Y", "X"], "X"), 1);
}

// ==========================================
// 优先级收缩
// ==========================================

#[test]
fn test_lower_priority_value_always_wins() {
    let mut selector = StyleSelector::new();
    let candidates = [Candidate::new("X", 1, 1), Candidate::new("Y", 2, 1)];

    assert_eq!(
        pick_n(&mut selector, &candidates, 5),
        vec!["X", "X", "X", "X", "X"]
    );
    assert_eq!(selector.usage("Y"), 0);
}

#[test]
fn test_priority_narrowing_ignores_larger_quantity() {
    let mut selector = StyleSelector::new();
    let candidates = [Candidate::new("X", 2, 9), Candidate::new("Y", 1, 1)];

    assert_eq!(selector.select(&candidates).as_deref(), Some("Y"));
}

#[test]
fn test_priority_narrowing_then_round_robin() {
    let mut selector = StyleSelector::new();
    let candidates = [
        Candidate::new("B", 1, 1),
        Candidate::new("C", 3, 1),
        Candidate::new("A", 1, 1),
    ];

    assert_eq!(pick_n(&mut selector, &candidates, 3), vec!["A", "B", "A"]);
}

// ==========================================
// 最大数量子集
// ==========================================

#[test]
fn test_max_quantity_single_winner() {
    let mut selector = StyleSelector::new();
    let candidates = [Candidate::new("X", 1, 1), Candidate::new("Y", 1, 3)];

    assert_eq!(pick_n(&mut selector, &candidates, 3), vec!["Y", "Y", "Y"]);
}

#[test]
fn test_max_quantity_tie_round_robin_with_own_counter() {
    let mut selector = StyleSelector::new();
    let candidates = [
        Candidate::new("Z", 1, 2),
        Candidate::new("X", 1, 2),
        Candidate::new("Y", 1, 1),
    ];

    assert_eq!(pick_n(&mut selector, &candidates, 4), vec!["X", "Z", "X", "Z"]);
}

#[test]
fn test_max_quantity_subset_cached_per_state_key() {
    let mut selector = StyleSelector::new();

    // 首次：Y 数量最大 → 子集 {Y} 被缓存
    let first = selector.select(&[Candidate::new("X", 1, 1), Candidate::new("Y", 1, 4)]);
    // 同一状态键、数量不同：仍沿用缓存子集
    let second = selector.select(&[Candidate::new("X", 1, 7), Candidate::new("Y", 1, 2)]);

    assert_eq!(first.as_deref(), Some("Y"));
    assert_eq!(second.as_deref(), Some("Y"));
}

#[test]
fn test_equal_and_unequal_quantity_counters_are_independent() {
    let mut selector = StyleSelector::new();
    let equal = [Candidate::new("X", 1, 1), Candidate::new("Y", 1, 1)];
    let tied_max = [
        Candidate::new("X", 1, 3),
        Candidate::new("Y", 1, 3),
    ];
    let unequal = [Candidate::new("X", 1, 3), Candidate::new("Y", 1, 2)];

    assert_eq!(selector.select(&equal).as_deref(), Some("X"));
    // 同状态键的不同数量分支: 子集 {X} 被缓存
    assert_eq!(selector.select(&unequal).as_deref(), Some("X"));
    // 同数量分支继续自己的计数
    assert_eq!(selector.select(&tied_max).as_deref(), Some("Y"));
    assert_eq!(selector.usage("X"), 2);
}

// ==========================================
// 边界
// ==========================================

#[test]
fn test_empty_candidates() {
    let mut selector = StyleSelector::new();
    assert_eq!(selector.select(&[]), None);
    assert_eq!(selector.state_count(), 0);
}

#[test]
fn test_single_candidate() {
    let mut selector = StyleSelector::new();
    assert_eq!(
        pick_n(&mut selector, &[Candidate::new("A", 5, 0)], 2),
        vec!["A", "A"]
    );
    assert_eq!(selector.usage("A"), 2);
}

#[test]
fn test_fresh_selectors_are_deterministic() {
    let candidates = [
        Candidate::new("X", 1, 1),
        Candidate::new("Y", 1, 1),
        Candidate::new("Z", 1, 1),
    ];
    let mut a = StyleSelector::new();
    let mut b = StyleSelector::new();

    assert_eq!(pick_n(&mut a, &candidates, 7), pick_n(&mut b, &candidates, 7));
    assert_eq!(a.usage_snapshot(), b.usage_snapshot());
}
