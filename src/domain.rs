//! Domain models used by the backend: catalog entities, the per-request
//! selection tuple, and the generated problem the client renders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_weight() -> f64 { 1.0 }

/// A reading-passage theme. Grouped by category key inside the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
  pub name: String,
  pub description: String,
  #[serde(default)] pub keywords: Vec<String>,
  #[serde(default)] pub cultural_context: Option<String>,
  #[serde(default)] pub controversy_level: Option<String>,
  #[serde(default)] pub applicable_levels: Vec<String>,
  #[serde(default = "default_weight")] pub weight: f64,
}

/// Structural guidance for a genre's passages.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStructure {
  pub basic_flow: String,
  #[serde(default)] pub variation_patterns: Vec<String>,
}

/// How a genre adapts its focus to a given length class.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthAdaptation {
  pub focus: String,
  pub structure: String,
  pub question_emphasis: String,
}

/// A passage genre (critical essay, novel excerpt, editorial, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
  pub key: String,
  pub label: String,
  pub genre_type: String,
  #[serde(default)] pub characteristics: Vec<String>,
  #[serde(default)] pub question_types: BTreeMap<String, String>,
  #[serde(default)] pub vocabulary_focus: Option<String>,
  #[serde(default)] pub grammar_style: Option<String>,
  #[serde(default)] pub text_structure: Option<TextStructure>,
  #[serde(default)] pub length_adaptations: BTreeMap<String, LengthAdaptation>,
  #[serde(default)] pub instructions: Option<String>,
}

/// A finer-grained passage style within a length class.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtype {
  pub label: String,
  pub description: String,
  pub question_focus: String,
  pub vocabulary_level: String,
  /// 0 or absent means "no fixed count": the length-class policy decides.
  #[serde(default)] pub question_count: Option<u32>,
  #[serde(default)] pub char_range: Option<String>,
  pub genre_hint: String,
  #[serde(default)] pub characteristics: Vec<String>,
  #[serde(default)] pub example_topics: Vec<String>,
  #[serde(default)] pub applicable_levels: Vec<String>,
  #[serde(default = "default_weight")] pub weight: f64,
}

/// An authorial persona the model may be asked to write as.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
  pub id: String,
  pub label: String,
  pub age_range: String,
  pub writing_style: String,
  pub vocabulary_level: String,
  pub tone: String,
  #[serde(default)] pub sentence_patterns: Vec<String>,
  #[serde(default)] pub applicable_levels: Vec<String>,
  pub category: String,
  #[serde(default)] pub sub_category: Option<String>,
}

/// Pre-authored linguistic pitfalls, one pool per passage region.
/// Only ever sampled at the top difficulty level.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrapPools {
  #[serde(default)] pub opening: Vec<String>,
  #[serde(default)] pub middle: Vec<String>,
  #[serde(default)] pub conclusion: Vec<String>,
  #[serde(default)] pub linguistic: Vec<String>,
}

impl TrapPools {
  /// All four pools flattened, in declaration order.
  pub fn all(&self) -> Vec<&str> {
    self.opening.iter()
      .chain(self.middle.iter())
      .chain(self.conclusion.iter())
      .chain(self.linguistic.iter())
      .map(|s| s.as_str())
      .collect()
  }
}

/// Which JSON shape a length class expects from the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassageKind {
  Single,
  Comparative,
  Practical,
}

/// A named passage-length / question-count policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthClass {
  pub key: String,
  pub label: String,
  /// "min-max" in characters, e.g. "500-700".
  pub character_range: String,
  pub passage_kind: PassageKind,
  #[serde(default)] pub possible_counts: Vec<u32>,
  #[serde(default)] pub count_weights: Vec<f64>,
  #[serde(default)] pub subtypes: Vec<Subtype>,
}

/// The concrete tuple drawn for one generation request.
/// Fully determines the prompt text; never persisted.
#[derive(Clone, Debug)]
pub struct Selection {
  pub level: String,
  pub length: LengthClass,
  pub topic: Topic,
  pub genre: Genre,
  pub subtype: Option<Subtype>,
  pub speaker: Option<Speaker>,
  pub trap: Option<String>,
  /// The topic's cultural context, resolved here (probability-gated) so the
  /// prompt builder stays pure.
  pub cultural_context: Option<String>,
  pub question_count: u32,
}

//
// Generated output
//

/// Passage payload; the wire shape varies by `PassageKind`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassageBody {
  Single {
    passage: String,
  },
  Comparative {
    #[serde(rename = "passageA")] passage_a: String,
    #[serde(rename = "passageB")] passage_b: String,
  },
  Practical {
    passages: Vec<String>,
  },
}

impl PassageBody {
  /// Total character count across whichever representation is present.
  pub fn char_count(&self) -> usize {
    match self {
      PassageBody::Single { passage } => passage.chars().count(),
      PassageBody::Comparative { passage_a, passage_b } => {
        passage_a.chars().count() + passage_b.chars().count()
      }
      PassageBody::Practical { passages } => {
        passages.iter().map(|p| p.chars().count()).sum()
      }
    }
  }

  /// Concatenated passage text, for heuristics that scan the whole body.
  pub fn full_text(&self) -> String {
    match self {
      PassageBody::Single { passage } => passage.clone(),
      PassageBody::Comparative { passage_a, passage_b } => {
        format!("{}\n{}", passage_a, passage_b)
      }
      PassageBody::Practical { passages } => passages.join("\n"),
    }
  }
}

/// One four-option question. Answer indices are 1-based (1..=4) on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub question: String,
  pub options: Vec<String>,
  #[serde(rename = "correctAnswer")]
  pub correct_answer: u8,
  pub explanation: String,
}

/// The validated model output served to the client for rendering/grading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedProblem {
  #[serde(flatten)]
  pub body: PassageBody,
  pub questions: Vec<QuizQuestion>,
}
