//! Validation of model replies.
//!
//! The model is told to return bare JSON, but replies still arrive wrapped in
//! markdown fences or with stray prose around the object. Extraction is
//! therefore defensive: strip fences, slice to the outermost braces, then
//! parse strictly. Structural validation reports every violation it finds,
//! not just the first; length and suitability checks are advisory and never
//! reject a response.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::domain::GeneratedProblem;
use crate::error::GenerateError;
use crate::util::{is_cjk, parse_char_range};

/// Advanced collocations an N1-grade passage is expected to draw on.
/// The suitability heuristic counts how many distinct patterns appear.
static N1_COLLOCATIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  [
    r"ざるを[得え]な",
    r"を余儀なく",
    r"に(?:ほ|他)かならな",
    r"とは限らな",
    r"を禁じ[得え]な",
    r"ないわけにはいかな",
    r"(?:ん|せん)ばかりに",
    r"に(?:も)?かかわらず",
  ]
  .iter()
  .map(|p| Regex::new(p).expect("collocation pattern compiles"))
  .collect()
});

/// Strip surrounding markdown code fences (``` with optional language tag).
fn strip_fences(text: &str) -> &str {
  let mut s = text.trim();
  if let Some(rest) = s.strip_prefix("```") {
    // Drop the fence line including any language tag after it.
    s = match rest.split_once('\n') {
      Some((_tag, body)) => body,
      None => rest,
    };
  }
  if let Some(body) = s.trim_end().strip_suffix("```") {
    s = body;
  }
  s.trim()
}

/// Extract the JSON object from a raw completion reply.
pub fn extract_json(text: &str) -> Result<Value, GenerateError> {
  let stripped = strip_fences(text);
  // Defend against leading/trailing prose: slice to the outermost braces.
  let candidate = match (stripped.find('{'), stripped.rfind('}')) {
    (Some(open), Some(close)) if open < close => &stripped[open..=close],
    _ => stripped,
  };
  serde_json::from_str(candidate)
    .map_err(|e| GenerateError::MalformedResponse(format!("JSON parse failed: {}", e)))
}

fn non_empty_str(v: Option<&Value>) -> bool {
  v.and_then(Value::as_str).map(|s| !s.trim().is_empty()).unwrap_or(false)
}

/// Check required structure, collecting every violation found.
/// An empty result means the value can be converted to `GeneratedProblem`.
pub fn validate_structure(v: &Value) -> Vec<String> {
  let mut violations = Vec::new();

  let has_single = non_empty_str(v.get("passage"));
  let has_pair = non_empty_str(v.get("passageA")) && non_empty_str(v.get("passageB"));
  let has_many = v
    .get("passages")
    .and_then(Value::as_array)
    .map(|a| !a.is_empty() && a.iter().all(|p| p.as_str().map(|s| !s.is_empty()).unwrap_or(false)))
    .unwrap_or(false);
  if !has_single && !has_pair && !has_many {
    violations.push("missing passage, passageA/passageB, or non-empty passages".to_string());
  }

  let questions = v.get("questions").and_then(Value::as_array);
  match questions {
    None => violations.push("missing questions array".to_string()),
    Some(qs) if qs.is_empty() => violations.push("questions array is empty".to_string()),
    Some(qs) => {
      for (i, q) in qs.iter().enumerate() {
        if !q.is_object() {
          violations.push(format!("questions[{}] is not an object", i));
          continue;
        }
        if !non_empty_str(q.get("question")) {
          violations.push(format!("questions[{}].question missing or empty", i));
        }
        match q.get("options").and_then(Value::as_array) {
          Some(opts) if opts.len() == 4 => {}
          Some(opts) => {
            violations.push(format!("questions[{}].options has {} entries, expected 4", i, opts.len()))
          }
          None => violations.push(format!("questions[{}].options missing", i)),
        }
        match q.get("correctAnswer").and_then(Value::as_u64) {
          Some(n) if (1..=4).contains(&n) => {}
          Some(n) => violations.push(format!("questions[{}].correctAnswer is {}, expected 1-4", i, n)),
          None => violations.push(format!("questions[{}].correctAnswer missing or not 1-4", i)),
        }
        if !non_empty_str(q.get("explanation")) {
          violations.push(format!("questions[{}].explanation missing or empty", i));
        }
      }
    }
  }

  violations
}

/// Full pipeline: extract, validate, and convert a raw reply.
pub fn parse_problem(text: &str) -> Result<GeneratedProblem, GenerateError> {
  let value = extract_json(text)?;
  let violations = validate_structure(&value);
  if !violations.is_empty() {
    return Err(GenerateError::SchemaViolation(violations));
  }
  serde_json::from_value(value).map_err(|e| GenerateError::SchemaViolation(vec![e.to_string()]))
}

/// Result of the advisory passage-length check.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthCheck {
  pub within_range: bool,
  pub actual_chars: usize,
  pub expected_range: String,
}

/// Compare total passage characters against a "min-max" range.
/// Out-of-range is a warning for the metadata, never a rejection.
pub fn validate_length(problem: &GeneratedProblem, expected_range: &str) -> LengthCheck {
  let actual = problem.body.char_count();
  let within = match parse_char_range(expected_range) {
    Some((min, max)) => actual >= min && actual <= max,
    // Unparseable range: nothing to judge against.
    None => true,
  };
  LengthCheck {
    within_range: within,
    actual_chars: actual,
    expected_range: expected_range.to_string(),
  }
}

/// Advisory difficulty telemetry for top-level problems.
#[derive(Clone, Debug, Serialize)]
pub struct Suitability {
  pub score: u32,
  pub warnings: Vec<String>,
}

/// Heuristic N1-suitability score. Starts at 100; each triggered heuristic
/// deducts 10 and adds one warning. Advisory only.
pub fn check_suitability(problem: &GeneratedProblem) -> Suitability {
  let text = problem.body.full_text();
  let mut score: u32 = 100;
  let mut warnings = Vec::new();

  let total = text.chars().filter(|c| !c.is_whitespace()).count();
  let kanji = text.chars().filter(|c| is_cjk(*c)).count();
  let ratio = if total == 0 { 0.0 } else { kanji as f64 / total as f64 };
  if ratio < 0.15 {
    score -= 10;
    warnings.push(format!("kanji ratio {:.2} below 0.15; passage may read below N1", ratio));
  }

  let sentences: Vec<&str> = text
    .split(['。', '！', '？'])
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();
  let sentence_count = sentences.len().max(1);
  let mean_len = sentences.iter().map(|s| s.chars().count()).sum::<usize>() as f64
    / sentence_count as f64;
  if mean_len < 30.0 {
    score -= 10;
    warnings.push(format!("mean sentence length {:.1} below 30 chars", mean_len));
  }

  let collocations = N1_COLLOCATIONS.iter().filter(|re| re.is_match(&text)).count();
  if collocations < 2 {
    score -= 10;
    warnings.push(format!("only {} advanced collocation(s) found, expected 2+", collocations));
  }

  Suitability { score, warnings }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::PassageBody;

  fn problem_with_passage(passage: &str) -> GeneratedProblem {
    GeneratedProblem {
      body: PassageBody::Single { passage: passage.into() },
      questions: vec![],
    }
  }

  #[test]
  fn fenced_reply_parses_with_zero_violations() {
    let raw = " ```json\n{\"passage\":\"...\", \"questions\":[{\"question\":\"Q\",\"options\":[\"a\",\"b\",\"c\",\"d\"],\"correctAnswer\":2,\"explanation\":\"E\"}]} \n``` ";
    let problem = parse_problem(raw).unwrap();
    assert_eq!(problem.questions[0].correct_answer, 2);
    assert_eq!(validate_structure(&extract_json(raw).unwrap()).len(), 0);
  }

  #[test]
  fn surrounding_prose_is_sliced_away() {
    let raw = "Here is the quiz you asked for:\n{\"passage\":\"本文\",\"questions\":[{\"question\":\"Q\",\"options\":[\"a\",\"b\",\"c\",\"d\"],\"correctAnswer\":1,\"explanation\":\"E\"}]}\nHope this helps!";
    assert!(parse_problem(raw).is_ok());
  }

  #[test]
  fn garbage_is_malformed_response() {
    let err = parse_problem("the model refused").unwrap_err();
    assert!(matches!(err, GenerateError::MalformedResponse(_)));
  }

  #[test]
  fn every_violation_is_reported_not_just_the_first() {
    let raw = r#"{"questions":[{"options":["a","b","c"],"correctAnswer":7}]}"#;
    let violations = validate_structure(&extract_json(raw).unwrap());
    let joined = violations.join("\n");
    assert!(joined.contains("passage"), "missing passage not reported: {joined}");
    assert!(joined.contains("questions[0].question"), "{joined}");
    assert!(joined.contains("3 entries"), "{joined}");
    assert!(joined.contains("correctAnswer"), "{joined}");
    assert!(joined.contains("explanation"), "{joined}");
    assert!(violations.len() >= 5);
  }

  #[test]
  fn well_formed_comparative_and_practical_pass() {
    let pair = r#"{"passageA":"甲","passageB":"乙","questions":[{"question":"Q","options":["a","b","c","d"],"correctAnswer":4,"explanation":"E"}]}"#;
    assert!(validate_structure(&extract_json(pair).unwrap()).is_empty());

    let many = r#"{"passages":["資料1","資料2"],"questions":[{"question":"Q","options":["a","b","c","d"],"correctAnswer":1,"explanation":"E"}]}"#;
    assert!(validate_structure(&extract_json(many).unwrap()).is_empty());
  }

  #[test]
  fn empty_questions_is_a_violation() {
    let raw = r#"{"passage":"本文","questions":[]}"#;
    let violations = validate_structure(&extract_json(raw).unwrap());
    assert_eq!(violations, vec!["questions array is empty".to_string()]);
  }

  #[test]
  fn length_check_boundaries() {
    let range = "5-10";
    let exactly = |n: usize| problem_with_passage(&"あ".repeat(n));
    assert!(validate_length(&exactly(5), range).within_range);
    assert!(validate_length(&exactly(10), range).within_range);
    assert!(!validate_length(&exactly(4), range).within_range);
    assert!(!validate_length(&exactly(11), range).within_range);
    assert_eq!(validate_length(&exactly(4), range).actual_chars, 4);
  }

  #[test]
  fn comparative_length_sums_both_passages() {
    let p = GeneratedProblem {
      body: PassageBody::Comparative { passage_a: "あいう".into(), passage_b: "えおかき".into() },
      questions: vec![],
    };
    assert_eq!(validate_length(&p, "7-7").actual_chars, 7);
    assert!(validate_length(&p, "7-7").within_range);
  }

  #[test]
  fn suitability_flags_kana_only_short_sentences() {
    let p = problem_with_passage("ねこがいる。いぬもいる。とりはいない。");
    let s = check_suitability(&p);
    assert_eq!(s.score, 70);
    assert_eq!(s.warnings.len(), 3);
  }

  #[test]
  fn suitability_passes_dense_n1_prose() {
    let passage = "現代社会の構造的変化を前にして、我々は従来の制度を根本から再考せざるを得ない状況に置かれているのであって、これは一部の専門家だけの課題ではないのである。にもかかわらず、議論は表層的な損得勘定に終始しがちであり、制度の持続可能性という本質的な問いは先送りされ続けてきたと言わねばならないのだ。";
    let s = check_suitability(&problem_with_passage(passage));
    assert_eq!(s.score, 100, "warnings: {:?}", s.warnings);
  }
}
