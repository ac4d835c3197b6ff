//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// True if unicode char belongs to CJK ideograph ranges (kanji).
/// Kana are intentionally excluded; the suitability heuristics want the
/// kanji share of a passage, not the share of Japanese script overall.
pub fn is_cjk(ch: char) -> bool {
  (ch >= '\u{4E00}' && ch <= '\u{9FFF}')
    || (ch >= '\u{3400}' && ch <= '\u{4DBF}')
    || (ch >= '\u{20000}' && ch <= '\u{2A6DF}')
    || (ch >= '\u{2A700}' && ch <= '\u{2B73F}')
    || (ch >= '\u{2B740}' && ch <= '\u{2B81F}')
    || (ch >= '\u{2B820}' && ch <= '\u{2CEAF}')
    || (ch >= '\u{F900}' && ch <= '\u{FAFF}')
}

/// Parse a "min-max" character range such as "500-700".
pub fn parse_char_range(s: &str) -> Option<(usize, usize)> {
  let (min, max) = s.split_once('-')?;
  let min = min.trim().parse::<usize>().ok()?;
  let max = max.trim().parse::<usize>().ok()?;
  if min > max { return None; }
  Some((min, max))
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_occurrences() {
    let out = fill_template("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and y and x");
  }

  #[test]
  fn is_cjk_accepts_kanji_rejects_kana() {
    assert!(is_cjk('漢'));
    assert!(is_cjk('語'));
    assert!(!is_cjk('あ'));
    assert!(!is_cjk('カ'));
    assert!(!is_cjk('a'));
  }

  #[test]
  fn parse_char_range_accepts_well_formed() {
    assert_eq!(parse_char_range("500-700"), Some((500, 700)));
    assert_eq!(parse_char_range(" 200 - 400 "), Some((200, 400)));
    assert_eq!(parse_char_range("700-500"), None);
    assert_eq!(parse_char_range("short"), None);
  }

  #[test]
  fn trunc_for_log_counts_chars_not_bytes() {
    let s = "あいうえお";
    assert_eq!(trunc_for_log(s, 5), s);
    assert!(trunc_for_log(s, 3).starts_with("あいう"));
  }
}
