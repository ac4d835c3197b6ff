//! Prompt assembly.
//!
//! `build_prompt` is a pure function of (Selection, Prompts): no randomness,
//! no I/O, byte-identical output for identical input. Everything probabilistic
//! happens earlier, in selection. Conditional sections emit zero lines when
//! their field is absent; there are never empty-labeled headers.

use crate::config::Prompts;
use crate::domain::{PassageKind, Selection};
use crate::util::fill_template;

/// JSON skeleton the model must fill, per passage shape.
fn output_skeleton(kind: PassageKind) -> &'static str {
  match kind {
    PassageKind::Single => {
      r#"{
  "passage": "本文",
  "questions": [
    {
      "question": "設問文",
      "options": ["選択肢1", "選択肢2", "選択肢3", "選択肢4"],
      "correctAnswer": 1,
      "explanation": "解説"
    }
  ]
}"#
    }
    PassageKind::Comparative => {
      r#"{
  "passageA": "一つ目の文章",
  "passageB": "二つ目の文章",
  "questions": [
    {
      "question": "設問文",
      "options": ["選択肢1", "選択肢2", "選択肢3", "選択肢4"],
      "correctAnswer": 1,
      "explanation": "解説"
    }
  ]
}"#
    }
    PassageKind::Practical => {
      r#"{
  "passages": ["資料1", "資料2"],
  "questions": [
    {
      "question": "設問文",
      "options": ["選択肢1", "選択肢2", "選択肢3", "選択肢4"],
      "correctAnswer": 1,
      "explanation": "解説"
    }
  ]
}"#
    }
  }
}

/// The required-output block: literal character range, literal question
/// count, the JSON skeleton, and the closing JSON-only rule. Appended to
/// both generated and custom prompts so every reply stays machine-checkable.
fn output_requirements(sel_len_range: &str, question_count: u32, kind: PassageKind, prompts: &Prompts) -> String {
  let mut out = String::new();
  out.push_str("【出力要件】\n");
  out.push_str(&format!("- 本文の長さ: {}字\n", sel_len_range));
  out.push_str(&format!("- 設問数: {}問\n", question_count));
  out.push_str("- 各設問の選択肢はちょうど4つ。\"correctAnswer\" は 1・2・3・4 のいずれかの数値。\n");
  out.push_str(&format!(
    "- \"explanation\" はすべて{}で書くこと（本文の言語では書かない）。\n",
    prompts.explanation_language
  ));
  out.push_str("- 次のJSON構造に厳密に従うこと:\n");
  out.push_str(output_skeleton(kind));
  out.push_str("\n\n出力はこのJSON構造のみとし、前後に説明文やマークダウンの囲み（```）を付けないこと。\n");
  out
}

/// Render a Selection into the full instruction text for the model.
pub fn build_prompt(sel: &Selection, prompts: &Prompts) -> String {
  let mut out = String::new();

  out.push_str(&fill_template(
    &prompts.preamble_template,
    &[("level", &sel.level), ("length", &sel.length.label)],
  ));
  out.push_str("\n\n");

  // Topic block
  out.push_str(&format!("【テーマ】{}\n", sel.topic.name));
  out.push_str(&format!("説明: {}\n", sel.topic.description));
  if !sel.topic.keywords.is_empty() {
    out.push_str(&format!("キーワード: {}\n", sel.topic.keywords.join("、")));
  }
  if let Some(ctx) = &sel.cultural_context {
    out.push_str(&format!("文化的背景: {}\n", ctx));
  }
  if let Some(cl) = &sel.topic.controversy_level {
    out.push_str(&format!("議論の分かれやすさ: {}\n", cl));
  }
  out.push('\n');

  // Genre block
  out.push_str(&format!("【ジャンル】{}（{}）\n", sel.genre.label, sel.genre.genre_type));
  if !sel.genre.characteristics.is_empty() {
    out.push_str("特徴:\n");
    for c in &sel.genre.characteristics {
      out.push_str(&format!("- {}\n", c));
    }
  }
  if !sel.genre.question_types.is_empty() {
    out.push_str("設問タイプ:\n");
    for (name, desc) in &sel.genre.question_types {
      out.push_str(&format!("- {}: {}\n", name, desc));
    }
  }
  if let Some(v) = &sel.genre.vocabulary_focus {
    out.push_str(&format!("語彙の焦点: {}\n", v));
  }
  if let Some(g) = &sel.genre.grammar_style {
    out.push_str(&format!("文体・文法: {}\n", g));
  }
  if let Some(ts) = &sel.genre.text_structure {
    out.push_str(&format!("基本構成: {}\n", ts.basic_flow));
    if !ts.variation_patterns.is_empty() {
      out.push_str("構成のバリエーション:\n");
      for p in &ts.variation_patterns {
        out.push_str(&format!("- {}\n", p));
      }
    }
  }
  if let Some(ad) = sel.genre.length_adaptations.get(&sel.length.key) {
    out.push_str(&format!(
      "この長さでの書き方: 焦点={} / 構成={} / 設問の重点={}\n",
      ad.focus, ad.structure, ad.question_emphasis
    ));
  }
  if let Some(instr) = &sel.genre.instructions {
    out.push_str(&format!("執筆上の指示: {}\n", instr));
  }
  out.push('\n');

  // Subtype block
  if let Some(st) = &sel.subtype {
    out.push_str(&format!("【スタイル】{}\n", st.label));
    out.push_str(&format!("説明: {}\n", st.description));
    out.push_str(&format!("設問の焦点: {}\n", st.question_focus));
    if !st.characteristics.is_empty() {
      out.push_str("特徴:\n");
      for c in &st.characteristics {
        out.push_str(&format!("- {}\n", c));
      }
    }
    if !st.example_topics.is_empty() {
      out.push_str(&format!("題材の例: {}\n", st.example_topics.join("、")));
    }
    out.push('\n');
  }

  // Speaker block
  if let Some(sp) = &sel.speaker {
    out.push_str(&format!("【書き手】{}（{}）\n", sp.label, sp.age_range));
    out.push_str(&format!("文体: {}\n", sp.writing_style));
    out.push_str(&format!("語彙: {}\n", sp.vocabulary_level));
    out.push_str(&format!("語り口: {}\n", sp.tone));
    if !sp.sentence_patterns.is_empty() {
      out.push_str("文のパターン例:\n");
      for p in &sp.sentence_patterns {
        out.push_str(&format!("- {}\n", p));
      }
    }
    out.push_str("この書き手の人物像を文章全体で一貫させること。\n\n");
  }

  // Trap block
  if let Some(trap) = &sel.trap {
    out.push_str("【引っかけ要素】\n");
    out.push_str(&format!("- {}\n", trap));
    out.push_str("この要素を、もっともらしい誤答選択肢が成立するように本文へ自然に織り込むこと。\n\n");
  }

  out.push_str(&output_requirements(
    &sel.length.character_range,
    sel.question_count,
    sel.length.passage_kind,
    prompts,
  ));
  out
}

/// Custom mode: a user-supplied brief replaces the assembled content blocks,
/// but the output requirements still apply so the reply can be validated.
pub fn build_custom_prompt(
  user_prompt: &str,
  char_range: &str,
  question_count: u32,
  kind: PassageKind,
  prompts: &Prompts,
) -> String {
  let mut out = String::new();
  out.push_str(user_prompt.trim());
  out.push_str("\n\n");
  out.push_str(&output_requirements(char_range, question_count, kind, prompts));
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SelectionProbabilities;
  use crate::seeds::builtin_catalog;
  use crate::selection::{RecentCache, SelectionEngine};
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use std::time::Duration;

  fn sample_selection(length_key: &str) -> Selection {
    let cat = builtin_catalog();
    let engine = SelectionEngine::new(&cat, SelectionProbabilities::default());
    let recent = RecentCache::new(8, Duration::from_secs(60));
    let length = cat.length_class(length_key).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    engine.select(&mut rng, &["N1".to_string()], length, None, &recent, 3)
  }

  #[test]
  fn build_prompt_is_byte_deterministic() {
    let sel = sample_selection("medium");
    let prompts = Prompts::default();
    assert_eq!(build_prompt(&sel, &prompts), build_prompt(&sel, &prompts));
  }

  #[test]
  fn absent_sections_leave_no_headers() {
    let mut sel = sample_selection("medium");
    sel.speaker = None;
    sel.trap = None;
    sel.subtype = None;
    sel.cultural_context = None;
    let text = build_prompt(&sel, &Prompts::default());
    assert!(!text.contains("【書き手】"));
    assert!(!text.contains("【引っかけ要素】"));
    assert!(!text.contains("【スタイル】"));
    assert!(!text.contains("文化的背景"));
    // Required blocks always present.
    assert!(text.contains("【テーマ】"));
    assert!(text.contains("【出力要件】"));
  }

  #[test]
  fn skeleton_shape_follows_length_class() {
    let single = build_prompt(&sample_selection("medium"), &Prompts::default());
    assert!(single.contains("\"passage\""));
    assert!(!single.contains("\"passageA\""));

    let comparative = build_prompt(&sample_selection("comparative"), &Prompts::default());
    assert!(comparative.contains("\"passageA\""));
    assert!(comparative.contains("\"passageB\""));

    let practical = build_prompt(&sample_selection("practical"), &Prompts::default());
    assert!(practical.contains("\"passages\""));
  }

  #[test]
  fn prompt_carries_literal_range_and_count() {
    let sel = sample_selection("medium");
    let text = build_prompt(&sel, &Prompts::default());
    assert!(text.contains(&format!("本文の長さ: {}字", sel.length.character_range)));
    assert!(text.contains(&format!("設問数: {}問", sel.question_count)));
  }

  #[test]
  fn custom_prompt_keeps_user_text_and_requirements() {
    let text = build_custom_prompt(
      "敬語の誤用についての短い評論を書いてください。",
      "200-400",
      2,
      PassageKind::Single,
      &Prompts::default(),
    );
    assert!(text.starts_with("敬語の誤用"));
    assert!(text.contains("【出力要件】"));
    assert!(text.contains("設問数: 2問"));
  }

  #[test]
  fn explanation_language_is_quoted_from_config() {
    let mut prompts = Prompts::default();
    prompts.explanation_language = "中国語".into();
    let text = build_prompt(&sample_selection("short"), &prompts);
    assert!(text.contains("中国語"));
  }
}
