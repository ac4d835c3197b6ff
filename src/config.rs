//! Loading tuning configuration (prompts, probabilities, completion options)
//! from TOML.
//!
//! See `AgentConfig` for the expected schema. Content (topics, genres, ...)
//! lives in the JSON catalog instead; this file only tunes behavior.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub probabilities: SelectionProbabilities,
  #[serde(default)]
  pub completion: CompletionOptions,
  #[serde(default)]
  pub recent_cache: RecentCacheConfig,
}

/// Prompt fragments used by the builder and the completion client.
/// Defaults are sensible for JLPT reading-comprehension generation; override
/// them in TOML to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  /// System message for every completion call.
  pub system_instruction: String,
  /// Opening line of the assembled prompt. Supports {level} and {length}.
  pub preamble_template: String,
  /// Language the model must use for question explanations.
  pub explanation_language: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      system_instruction: "You are a JLPT reading-comprehension item writer. Respond ONLY with strict JSON. Never wrap the JSON in markdown fences or add commentary.".into(),
      preamble_template: "JLPT {level} の読解問題を1問作成してください。文章の種類は「{length}」です。".into(),
      explanation_language: "English".into(),
    }
  }
}

/// Inclusion probabilities for the optional parts of a selection.
/// Consolidated here so they are injected and testable instead of being
/// literals buried in the sampling code.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SelectionProbabilities {
  pub speaker_inclusion: f64,
  pub trap_inclusion: f64,
  pub cultural_context_inclusion: f64,
}

impl Default for SelectionProbabilities {
  fn default() -> Self {
    Self {
      speaker_inclusion: 0.6,
      trap_inclusion: 0.7,
      cultural_context_inclusion: 0.5,
    }
  }
}

/// Options forwarded with every completion call.
#[derive(Clone, Debug, Deserialize)]
pub struct CompletionOptions {
  pub max_output_tokens: u32,
  pub temperature: f32,
}

impl Default for CompletionOptions {
  fn default() -> Self {
    Self { max_output_tokens: 4096, temperature: 0.9 }
  }
}

/// Bounds for the repeat-suppression cache of recently used topics.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RecentCacheConfig {
  pub capacity: usize,
  pub ttl_secs: u64,
}

impl Default for RecentCacheConfig {
  fn default() -> Self {
    Self { capacity: 64, ttl_secs: 1800 }
  }
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO
/// error, returns None and the defaults apply.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AgentConfig>(&s) {
      Ok(cfg) => {
        info!(target: "dokkai_backend", %path, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "dokkai_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "dokkai_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_documented_probabilities() {
    let p = SelectionProbabilities::default();
    assert!((p.speaker_inclusion - 0.6).abs() < f64::EPSILON);
    assert!((p.trap_inclusion - 0.7).abs() < f64::EPSILON);
    assert!((p.cultural_context_inclusion - 0.5).abs() < f64::EPSILON);
  }

  #[test]
  fn partial_toml_keeps_defaults_elsewhere() {
    let cfg: AgentConfig = toml::from_str(
      r#"
        [probabilities]
        speaker_inclusion = 1.0
        trap_inclusion = 0.0
        cultural_context_inclusion = 0.5
      "#,
    )
    .unwrap();
    assert!((cfg.probabilities.speaker_inclusion - 1.0).abs() < f64::EPSILON);
    assert_eq!(cfg.completion.max_output_tokens, 4096);
    assert_eq!(cfg.prompts.explanation_language, "English");
  }
}
