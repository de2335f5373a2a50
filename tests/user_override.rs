//! Override model behavior: decay scoring, context-key construction, and
//! the bounded cache.

use libphonabet_core::node::{KeyValue, Unigram, WalkedNode};
use libphonabet_core::user_override::UserOverrideModel;

fn node(key: &str, value: &str) -> WalkedNode {
    let span = key.split('-').count();
    let pair = KeyValue::new(key, value);
    WalkedNode::new(span, pair.clone(), -8.0, vec![Unigram::new(pair, -8.0)])
}

#[test]
fn score_halves_per_half_life_and_floors_to_zero() {
    let decay_exponent = 0.5f64.ln() / 100.0;
    assert_eq!(UserOverrideModel::score(1, 1, 0.0, 0.0, decay_exponent), 1.0);
    assert_eq!(UserOverrideModel::score(1, 2, 0.0, 0.0, decay_exponent), 0.5);
    let half = UserOverrideModel::score(1, 1, 0.0, 100.0, decay_exponent);
    assert!((half - 0.5).abs() < 1e-12);
    // 25 half-lives is far past the 1/1048576 floor
    assert_eq!(UserOverrideModel::score(1, 1, 0.0, 2500.0, decay_exponent), 0.0);
    assert_eq!(UserOverrideModel::score(0, 0, 0.0, 0.0, decay_exponent), 0.0);
}

#[test]
fn observed_candidate_comes_back_with_the_node_reading() {
    let mut model = UserOverrideModel::new(10, 100.0);
    let walked = vec![node("ni3", "你"), node("hao3", "好")];
    model.observe(&walked, 2, "好", 0.0);
    assert_eq!(model.len(), 1);
    let suggestions = model.suggest(&walked, 2, 1.0);
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].key_value.key, "hao3");
    assert_eq!(suggestions[0].key_value.value, "好");
    assert!(suggestions[0].score > 0.0);
}

#[test]
fn suggestions_lead_with_the_dominant_override() {
    let mut model = UserOverrideModel::new(10, 1000.0);
    let walked = vec![node("nian2", "年"), node("zhong1", "中")];
    model.observe(&walked, 2, "中", 0.0);
    model.observe(&walked, 2, "終", 1.0);
    model.observe(&walked, 2, "終", 2.0);
    let suggestions = model.suggest(&walked, 2, 2.0);
    assert_eq!(suggestions[0].key_value.value, "終");
    for pair in suggestions.windows(2) {
        assert!(pair[0].score > pair[1].score);
    }
}

#[test]
fn span_character_mismatch_never_learns() {
    let mut model = UserOverrideModel::new(10, 100.0);
    // two reading segments but a single visible character
    let walked = vec![node("ke1-ji4", "科")];
    model.observe(&walked, 2, "科", 0.0);
    assert!(model.is_empty());
    assert!(model.suggest(&walked, 2, 0.0).is_empty());
}

#[test]
fn punctuation_and_marker_keys_never_learn() {
    let mut model = UserOverrideModel::new(10, 100.0);
    let punctuation = vec![node("ma5", "嗎"), node("_punctuation_,", "，")];
    model.observe(&punctuation, 2, "，", 0.0);
    assert!(model.is_empty());

    let clause_end = vec![node("le5", "。")];
    model.observe(&clause_end, 1, "。", 0.0);
    assert!(model.is_empty());
}

#[test]
fn lone_single_character_requires_the_whitelist() {
    let mut model = UserOverrideModel::new(10, 100.0);
    let walked = vec![node("hao3", "好")];
    model.observe(&walked, 1, "好", 0.0);
    assert!(model.is_empty());

    let mut whitelisted =
        UserOverrideModel::new(10, 100.0).with_whitelist(["你".to_string()]);
    let walked = vec![node("ni3", "你")];
    whitelisted.observe(&walked, 1, "你", 0.0);
    assert_eq!(whitelisted.len(), 1);
    assert_eq!(whitelisted.suggest(&walked, 1, 0.0)[0].key_value.value, "你");
}

#[test]
fn single_character_with_a_previous_node_learns_without_whitelist() {
    let mut model = UserOverrideModel::new(10, 100.0);
    let walked = vec![node("ni3", "你"), node("hao3", "好")];
    model.observe(&walked, 2, "好", 0.0);
    assert_eq!(model.len(), 1);
}

#[test]
fn empty_walk_is_a_silent_no_op() {
    let mut model = UserOverrideModel::new(10, 100.0);
    model.observe(&[], 0, "好", 0.0);
    assert!(model.is_empty());
    assert!(model.suggest(&[], 0, 0.0).is_empty());
}

#[test]
fn cache_evicts_least_recently_observed_context() {
    let mut model = UserOverrideModel::new(2, 100.0);
    let a = vec![node("ni3", "你"), node("hao3", "好")];
    let b = vec![node("ni3", "你"), node("zhong1", "中")];
    let c = vec![node("ni3", "你"), node("jin1", "金")];
    model.observe(&a, 2, "好", 0.0);
    model.observe(&b, 2, "中", 1.0);
    // touching a again makes b the eviction victim
    model.observe(&a, 2, "好", 2.0);
    model.observe(&c, 2, "金", 3.0);
    assert_eq!(model.len(), 2);
    assert!(!model.suggest(&a, 2, 4.0).is_empty());
    assert!(model.suggest(&b, 2, 4.0).is_empty());
    assert!(!model.suggest(&c, 2, 4.0).is_empty());
}
