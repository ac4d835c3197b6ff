//! Per-request content selection.
//!
//! One `Selection` is drawn per generation request: topic, genre, subtype,
//! optional speaker persona, optional trap element, and the resolved question
//! count. All randomness flows through the caller-supplied `Rng` so tests can
//! seed it; all probabilities come from `SelectionProbabilities`.
//!
//! Empty pools degrade to `None`/defaults, never to errors; the caller always
//! ends up with a usable Selection.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::ContentCatalog;
use crate::config::{RecentCacheConfig, SelectionProbabilities};
use crate::domain::{LengthClass, Selection, Speaker, Subtype, Topic};
use crate::seeds::{default_genre, default_topic};

/// The top difficulty tag. Trap elements are gated to this level only.
pub const TOP_LEVEL: &str = "N1";

/// Cumulative-weight sampling over a pool.
/// Draws r uniformly in [0, total) and returns the first element whose
/// cumulative weight exceeds r. Zero-weight elements are never returned;
/// an empty or all-zero pool yields None.
pub fn weighted_pick<'a, T>(
  pool: &'a [T],
  weight_of: impl Fn(&T) -> f64,
  rng: &mut impl Rng,
) -> Option<&'a T> {
  let total: f64 = pool.iter().map(|item| weight_of(item).max(0.0)).sum();
  if total <= 0.0 {
    return None;
  }
  let r = rng.gen_range(0.0..total);
  let mut cumulative = 0.0;
  for item in pool {
    cumulative += weight_of(item).max(0.0);
    if r < cumulative {
      return Some(item);
    }
  }
  pool.last()
}

/// Bounded, TTL-expiring set of recently served topic names.
/// Best-effort repeat suppression only; not a correctness guarantee.
#[derive(Debug)]
pub struct RecentCache {
  capacity: usize,
  ttl: Duration,
  entries: VecDeque<(String, Instant)>,
}

impl RecentCache {
  pub fn new(capacity: usize, ttl: Duration) -> Self {
    Self { capacity, ttl, entries: VecDeque::new() }
  }

  pub fn from_config(cfg: &RecentCacheConfig) -> Self {
    Self::new(cfg.capacity, Duration::from_secs(cfg.ttl_secs))
  }

  pub fn contains(&self, key: &str) -> bool {
    let now = Instant::now();
    self.entries.iter().any(|(k, at)| k == key && now.duration_since(*at) < self.ttl)
  }

  pub fn note(&mut self, key: &str) {
    let now = Instant::now();
    self.entries.retain(|(_, at)| now.duration_since(*at) < self.ttl);
    self.entries.push_back((key.to_string(), now));
    while self.entries.len() > self.capacity {
      self.entries.pop_front();
    }
  }

  #[allow(dead_code)]
  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

/// Draws selections from a catalog. Stateless; construct per request.
pub struct SelectionEngine<'a> {
  catalog: &'a ContentCatalog,
  probs: SelectionProbabilities,
}

impl<'a> SelectionEngine<'a> {
  pub fn new(catalog: &'a ContentCatalog, probs: SelectionProbabilities) -> Self {
    Self { catalog, probs }
  }

  /// Pick a topic whose levels intersect the requested ones.
  ///
  /// Categories are visited in random order (the preferred category first,
  /// when given); the first category containing a matching topic wins, and
  /// the pick within it is uniform. Topics in `recent` are avoided when the
  /// category offers alternatives. None when no category matches at all.
  pub fn select_topic(
    &self,
    rng: &mut impl Rng,
    levels: &[String],
    preferred_category: Option<&str>,
    recent: &RecentCache,
  ) -> Option<&'a Topic> {
    let mut order: Vec<&str> = self.catalog.categories();
    order.shuffle(rng);
    if let Some(pref) = preferred_category {
      if let Some(pos) = order.iter().position(|c| *c == pref) {
        order.swap(0, pos);
      }
    }

    for category in order {
      let Some(pool) = self.catalog.topics.get(category) else { continue };
      let matching: Vec<&Topic> = pool
        .iter()
        .filter(|t| t.applicable_levels.iter().any(|lv| levels.contains(lv)))
        .collect();
      if matching.is_empty() {
        continue;
      }
      let fresh: Vec<&&Topic> = matching.iter().filter(|t| !recent.contains(&t.name)).collect();
      return if fresh.is_empty() {
        matching.choose(rng).copied()
      } else {
        fresh.choose(rng).map(|t| **t)
      };
    }
    None
  }

  /// Weighted pick among the length class's subtypes, preferring those that
  /// list the requested level. An empty level-filtered pool falls back to the
  /// unfiltered pool; None only when the class has no subtypes at all.
  pub fn select_subtype(
    &self,
    rng: &mut impl Rng,
    length: &'a LengthClass,
    level: &str,
  ) -> Option<&'a Subtype> {
    if length.subtypes.is_empty() {
      return None;
    }
    let leveled: Vec<&Subtype> = length
      .subtypes
      .iter()
      .filter(|st| st.applicable_levels.iter().any(|lv| lv == level))
      .collect();
    if leveled.is_empty() {
      weighted_pick(&length.subtypes, |st| st.weight, rng)
    } else {
      weighted_pick(&leveled, |st| st.weight, rng).copied()
    }
  }

  /// Bernoulli-gated persona pick. Most problems get no persona at all.
  pub fn select_speaker(&self, rng: &mut impl Rng, level: &str) -> Option<&'a Speaker> {
    if !rng.gen_bool(self.probs.speaker_inclusion.clamp(0.0, 1.0)) {
      return None;
    }
    let pool: Vec<&Speaker> = self
      .catalog
      .speakers
      .iter()
      .filter(|sp| sp.applicable_levels.iter().any(|lv| lv == level))
      .collect();
    pool.choose(rng).copied()
  }

  /// Trap elements only exist at the top difficulty tag, behind their own
  /// gate; all four pools are flattened for the pick.
  pub fn select_trap(&self, rng: &mut impl Rng, level: &str) -> Option<&'a str> {
    if level != TOP_LEVEL {
      return None;
    }
    if !rng.gen_bool(self.probs.trap_inclusion.clamp(0.0, 1.0)) {
      return None;
    }
    let pool = self.catalog.traps.all();
    pool.choose(rng).copied()
  }

  /// Resolve the question count: subtype's fixed count when set and nonzero,
  /// else a weighted draw from the class policy, else the default.
  pub fn question_count(
    &self,
    rng: &mut impl Rng,
    subtype: Option<&Subtype>,
    length: &LengthClass,
    default_count: u32,
  ) -> u32 {
    if let Some(n) = subtype.and_then(|st| st.question_count).filter(|n| *n > 0) {
      return n;
    }
    let pairs: Vec<(u32, f64)> = length
      .possible_counts
      .iter()
      .copied()
      .zip(length.count_weights.iter().copied())
      .collect();
    match weighted_pick(&pairs, |(_, w)| *w, rng) {
      Some((n, _)) => *n,
      None => default_count,
    }
  }

  /// Assemble one full Selection for the given request parameters.
  pub fn select(
    &self,
    rng: &mut impl Rng,
    levels: &[String],
    length: &LengthClass,
    preferred_category: Option<&str>,
    recent: &RecentCache,
    default_count: u32,
  ) -> Selection {
    let level = levels.first().cloned().unwrap_or_else(|| TOP_LEVEL.to_string());

    let topic = self
      .select_topic(rng, levels, preferred_category, recent)
      .cloned()
      .unwrap_or_else(default_topic);

    let subtype = self.select_subtype(rng, length, &level).cloned();

    let genre = subtype
      .as_ref()
      .and_then(|st| self.catalog.genre(&st.genre_hint))
      .cloned()
      .or_else(|| self.catalog.genres.choose(rng).cloned())
      .unwrap_or_else(default_genre);

    let speaker = self.select_speaker(rng, &level).cloned();
    let trap = self.select_trap(rng, &level).map(|t| t.to_string());

    let cultural_context = topic.cultural_context.clone().filter(|_| {
      rng.gen_bool(self.probs.cultural_context_inclusion.clamp(0.0, 1.0))
    });

    let question_count = self.question_count(rng, subtype.as_ref(), length, default_count);

    Selection {
      level,
      length: length.clone(),
      topic,
      genre,
      subtype,
      speaker,
      trap,
      cultural_context,
      question_count,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::builtin_catalog;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
  }

  fn probs(speaker: f64, trap: f64, cultural: f64) -> SelectionProbabilities {
    SelectionProbabilities {
      speaker_inclusion: speaker,
      trap_inclusion: trap,
      cultural_context_inclusion: cultural,
    }
  }

  #[test]
  fn weighted_pick_never_returns_zero_weight_members() {
    let pool = vec![("a", 0.0), ("b", 2.0), ("c", 0.0), ("d", 1.0)];
    let mut rng = rng();
    for _ in 0..500 {
      let picked = weighted_pick(&pool, |(_, w)| *w, &mut rng).unwrap();
      assert!(picked.1 > 0.0, "picked zero-weight member {:?}", picked.0);
    }
  }

  #[test]
  fn weighted_pick_tracks_configured_weights() {
    let pool = vec![("rare", 1.0), ("common", 9.0)];
    let mut rng = rng();
    let mut common = 0usize;
    let trials = 5000;
    for _ in 0..trials {
      if weighted_pick(&pool, |(_, w)| *w, &mut rng).unwrap().0 == "common" {
        common += 1;
      }
    }
    let freq = common as f64 / trials as f64;
    assert!((freq - 0.9).abs() < 0.03, "frequency {freq} too far from 0.9");
  }

  #[test]
  fn weighted_pick_empty_or_all_zero_is_none() {
    let empty: Vec<(&str, f64)> = vec![];
    assert!(weighted_pick(&empty, |(_, w)| *w, &mut rng()).is_none());
    let zeros = vec![("a", 0.0)];
    assert!(weighted_pick(&zeros, |(_, w)| *w, &mut rng()).is_none());
  }

  #[test]
  fn select_topic_honors_requested_levels() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let recent = RecentCache::new(8, Duration::from_secs(60));
    let mut rng = rng();
    for _ in 0..50 {
      let t = engine
        .select_topic(&mut rng, &["N1".to_string()], None, &recent)
        .expect("builtin catalog has N1 topics");
      assert!(t.applicable_levels.iter().any(|lv| lv == "N1"));
    }
  }

  #[test]
  fn select_topic_returns_none_for_unknown_level() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let recent = RecentCache::new(8, Duration::from_secs(60));
    assert!(engine.select_topic(&mut rng(), &["N9".to_string()], None, &recent).is_none());
  }

  #[test]
  fn select_topic_prefers_unseen_topics() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let mut recent = RecentCache::new(64, Duration::from_secs(600));
    // Mark every society topic except one as recently used.
    let society = &cat.topics["society"];
    for t in society.iter().skip(1) {
      recent.note(&t.name);
    }
    let mut rng = rng();
    for _ in 0..30 {
      let t = engine
        .select_topic(&mut rng, &["N1".to_string()], Some("society"), &recent)
        .unwrap();
      assert_eq!(t.name, society[0].name);
    }
  }

  #[test]
  fn select_subtype_falls_back_to_unfiltered_pool() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    // "long" subtypes are N1-only; an N3 request must still get one.
    let long = cat.length_class("long").unwrap();
    let st = engine.select_subtype(&mut rng(), long, "N3");
    assert!(st.is_some());
  }

  #[test]
  fn speaker_gate_can_be_forced_closed_and_open() {
    let cat = builtin_catalog();
    let closed = SelectionEngine::new(&cat, probs(0.0, 0.7, 0.5));
    let mut r = rng();
    for _ in 0..20 {
      assert!(closed.select_speaker(&mut r, "N1").is_none());
    }
    let open = SelectionEngine::new(&cat, probs(1.0, 0.7, 0.5));
    for _ in 0..20 {
      let sp = open.select_speaker(&mut r, "N1").expect("pool has N1 speakers");
      assert!(sp.applicable_levels.iter().any(|lv| lv == "N1"));
    }
  }

  #[test]
  fn trap_requires_top_level_even_with_open_gate() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, probs(0.6, 1.0, 0.5));
    let mut r = rng();
    for _ in 0..20 {
      assert!(engine.select_trap(&mut r, "N2").is_none());
      assert!(engine.select_trap(&mut r, "N1").is_some());
    }
  }

  #[test]
  fn question_count_prefers_fixed_subtype_count() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let long = cat.length_class("long").unwrap();
    let fixed = long.subtypes.iter().find(|st| st.question_count == Some(4)).unwrap();
    assert_eq!(engine.question_count(&mut rng(), Some(fixed), long, 2), 4);
  }

  #[test]
  fn question_count_zero_means_policy_draw() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let medium = cat.length_class("medium").unwrap();
    let mut st = medium.subtypes[0].clone();
    st.question_count = Some(0);
    let mut r = rng();
    for _ in 0..50 {
      let n = engine.question_count(&mut r, Some(&st), medium, 9);
      assert!(medium.possible_counts.contains(&n), "unexpected count {n}");
    }
  }

  #[test]
  fn question_count_defaults_when_policy_empty() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let mut bare = cat.length_class("short").unwrap().clone();
    bare.possible_counts.clear();
    bare.count_weights.clear();
    assert_eq!(engine.question_count(&mut rng(), None, &bare, 3), 3);
  }

  #[test]
  fn select_always_yields_complete_selection() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let recent = RecentCache::new(8, Duration::from_secs(60));
    let medium = cat.length_class("medium").unwrap();
    let mut r = rng();
    for _ in 0..50 {
      let sel = engine.select(&mut r, &["N1".to_string()], medium, None, &recent, 3);
      assert_eq!(sel.level, "N1");
      assert!(!sel.topic.name.is_empty());
      assert!(!sel.genre.key.is_empty());
      assert!(sel.question_count >= 1);
    }
  }

  #[test]
  fn select_survives_unknown_level_via_defaults() {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let recent = RecentCache::new(8, Duration::from_secs(60));
    let medium = cat.length_class("medium").unwrap();
    let sel = engine.select(&mut rng(), &["N9".to_string()], medium, None, &recent, 3);
    assert_eq!(sel.topic.name, default_topic().name);
  }

  #[test]
  fn recent_cache_bounds_capacity_and_expires() {
    let mut cache = RecentCache::new(2, Duration::from_secs(600));
    cache.note("a");
    cache.note("b");
    cache.note("c");
    assert_eq!(cache.len(), 2);
    assert!(!cache.contains("a"));
    assert!(cache.contains("c"));

    let mut instant = RecentCache::new(4, Duration::from_secs(0));
    instant.note("x");
    assert!(!instant.contains("x"));
  }
}
