//! Error taxonomy for the generation pipeline.
//!
//! Every variant here is recoverable at the request boundary: handlers catch
//! them and serve a canned fallback problem with `success:false` instead of
//! surfacing a 5xx to the client.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GenerateError {
  /// Static catalog JSON missing or corrupt.
  #[error("catalog load error: {0}")]
  ConfigLoad(String),

  /// Completion endpoint rejected our credential (401/403).
  #[error("completion auth error: {0}")]
  Auth(String),

  /// Completion endpoint rate-limited us (429).
  #[error("completion rate limited: {0}")]
  RateLimited(String),

  /// Any other non-2xx or transport failure from the completion endpoint.
  #[error("completion upstream error: {0}")]
  Upstream(String),

  /// Completion text was not parseable as JSON even after fence stripping.
  #[error("malformed model response: {0}")]
  MalformedResponse(String),

  /// Parsed JSON is missing required fields; carries every violation found.
  #[error("model response violates schema: {}", .0.join("; "))]
  SchemaViolation(Vec<String>),
}

impl GenerateError {
  /// Short stable label used in logs and fallback messages.
  pub fn kind(&self) -> &'static str {
    match self {
      GenerateError::ConfigLoad(_) => "config_load",
      GenerateError::Auth(_) => "auth",
      GenerateError::RateLimited(_) => "rate_limited",
      GenerateError::Upstream(_) => "upstream",
      GenerateError::MalformedResponse(_) => "malformed_response",
      GenerateError::SchemaViolation(_) => "schema_violation",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn schema_violation_lists_every_entry() {
    let e = GenerateError::SchemaViolation(vec!["missing passage".into(), "questions empty".into()]);
    let s = e.to_string();
    assert!(s.contains("missing passage"));
    assert!(s.contains("questions empty"));
  }

  #[test]
  fn kinds_are_stable() {
    assert_eq!(GenerateError::Auth("x".into()).kind(), "auth");
    assert_eq!(GenerateError::RateLimited("x".into()).kind(), "rate_limited");
    assert_eq!(GenerateError::MalformedResponse("x".into()).kind(), "malformed_response");
  }
}
