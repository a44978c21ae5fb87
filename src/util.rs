//! Small utility helpers used across modules.

/// Case-insensitive substring test used by reference search.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Log-safe truncation for user-supplied strings.
/// Avoids spamming logs with huge option labels or search terms.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn contains_ignores_case() {
    assert!(contains_ignore_case("MissingSwitchDefault", "switch"));
    assert!(!contains_ignore_case("NeedBraces", "switch"));
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let t = trunc_for_log("ééééé", 3);
    assert!(t.starts_with("é…"));
  }
}
