//! The content catalog: an immutable, in-memory view over the static JSON
//! documents describing topics, genres, length classes, speakers, and trap
//! pools.
//!
//! Loaded once at startup. If CONTENT_DIR is unset, or any document is
//! missing/corrupt, we log the failure and serve the built-in seed catalog
//! instead; a broken catalog must never crash the process.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::domain::{Genre, LengthClass, Speaker, Topic, TrapPools};
use crate::error::GenerateError;
use crate::seeds::builtin_catalog;

#[derive(Clone, Debug)]
pub struct ContentCatalog {
  /// Topics grouped by category key, e.g. "society" -> [...].
  pub topics: BTreeMap<String, Vec<Topic>>,
  pub genres: Vec<Genre>,
  pub length_classes: Vec<LengthClass>,
  pub speakers: Vec<Speaker>,
  pub traps: TrapPools,
}

impl ContentCatalog {
  pub fn length_class(&self, key: &str) -> Option<&LengthClass> {
    self.length_classes.iter().find(|lc| lc.key == key)
  }

  pub fn genre(&self, key: &str) -> Option<&Genre> {
    self.genres.iter().find(|g| g.key == key)
  }

  pub fn categories(&self) -> Vec<&str> {
    self.topics.keys().map(|k| k.as_str()).collect()
  }

  /// Every level tag that appears on at least one topic, deduplicated.
  pub fn levels(&self) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for topic in self.topics.values().flatten() {
      for lv in &topic.applicable_levels {
        if !out.contains(lv) {
          out.push(lv.clone());
        }
      }
    }
    out.sort();
    out
  }

  /// Load all five catalog documents from a directory.
  pub fn load_from_dir(dir: &Path) -> Result<Self, GenerateError> {
    Ok(Self {
      topics: load_json(&dir.join("topics.json"))?,
      genres: load_json(&dir.join("genres.json"))?,
      length_classes: load_json(&dir.join("length_classes.json"))?,
      speakers: load_json(&dir.join("speakers.json"))?,
      traps: load_json(&dir.join("traps.json"))?,
    })
  }

  /// Build from CONTENT_DIR if set and loadable, otherwise the seed catalog.
  pub fn from_env() -> Self {
    match std::env::var("CONTENT_DIR") {
      Ok(dir) => match Self::load_from_dir(Path::new(&dir)) {
        Ok(cat) => {
          info!(target: "dokkai_backend", %dir, "Loaded content catalog (JSON)");
          cat
        }
        Err(e) => {
          error!(target: "dokkai_backend", %dir, error = %e, "Failed to load content catalog; using built-in seeds");
          builtin_catalog()
        }
      },
      Err(_) => builtin_catalog(),
    }
  }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, GenerateError> {
  let raw = std::fs::read_to_string(path)
    .map_err(|e| GenerateError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
  serde_json::from_str(&raw)
    .map_err(|e| GenerateError::ConfigLoad(format!("{}: {}", path.display(), e)))
}
