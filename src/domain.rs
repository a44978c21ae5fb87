//! Domain models: rule categories, category filters, rule records and quiz modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed set of Checkstyle rule groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  #[serde(rename = "Class-Level")]
  ClassLevel,
  #[serde(rename = "Method-Level")]
  MethodLevel,
  #[serde(rename = "Variable-Level")]
  VariableLevel,
  #[serde(rename = "Control-Flow")]
  ControlFlow,
  #[serde(rename = "Java-Specific")]
  JavaSpecific,
}

impl Category {
  /// Declaration order, used for listings.
  pub const ALL: [Category; 5] = [
    Category::ClassLevel,
    Category::MethodLevel,
    Category::VariableLevel,
    Category::ControlFlow,
    Category::JavaSpecific,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Category::ClassLevel => "Class-Level",
      Category::MethodLevel => "Method-Level",
      Category::VariableLevel => "Variable-Level",
      Category::ControlFlow => "Control-Flow",
      Category::JavaSpecific => "Java-Specific",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::ALL
      .into_iter()
      .find(|c| c.as_str() == s)
      .ok_or_else(|| format!("unknown category '{}'", s))
  }
}

/// Which slice of the catalog a deck or search covers.
///
/// `Unknown` keeps a filter name that matches no category; it selects nothing
/// instead of failing, so callers get an empty deck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
  All,
  Only(Category),
  Unknown(String),
}

impl CategoryFilter {
  pub const ALL_ID: &'static str = "all";

  pub fn parse(s: &str) -> Self {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case(Self::ALL_ID) {
      return CategoryFilter::All;
    }
    match s.parse::<Category>() {
      Ok(c) => CategoryFilter::Only(c),
      Err(_) => CategoryFilter::Unknown(s.to_string()),
    }
  }

  pub fn matches(&self, category: Category) -> bool {
    match self {
      CategoryFilter::All => true,
      CategoryFilter::Only(c) => *c == category,
      CategoryFilter::Unknown(_) => false,
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      CategoryFilter::All => Self::ALL_ID,
      CategoryFilter::Only(c) => c.as_str(),
      CategoryFilter::Unknown(s) => s,
    }
  }
}

impl Default for CategoryFilter {
  fn default() -> Self { CategoryFilter::All }
}

impl fmt::Display for CategoryFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for CategoryFilter {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for CategoryFilter {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(CategoryFilter::parse(&s))
  }
}

/// One Checkstyle rule as presented in study material and quizzes.
/// Immutable once it enters a `Catalog`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
  pub name: String,
  pub category: Category,
  pub where_used: String,
  pub what_it_checks: String,
  pub why_it_matters: String,
  pub common_violation: String,
  pub correct_usage: String,
}

/// Which quiz variant a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
  /// Rule name shown; the user says whether they know what it checks.
  Recall,
  /// Description shown; the user picks the rule name among options.
  Choice,
}

impl Default for QuizMode {
  fn default() -> Self { QuizMode::Recall }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filter_parses_known_all_and_unknown() {
    assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
    assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
    assert_eq!(
      CategoryFilter::parse("Control-Flow"),
      CategoryFilter::Only(Category::ControlFlow)
    );
    assert_eq!(
      CategoryFilter::parse("NonexistentCategory"),
      CategoryFilter::Unknown("NonexistentCategory".into())
    );
  }

  #[test]
  fn unknown_filter_matches_nothing() {
    let f = CategoryFilter::parse("Nope");
    assert!(Category::ALL.into_iter().all(|c| !f.matches(c)));
    assert!(Category::ALL.into_iter().all(|c| CategoryFilter::All.matches(c)));
  }

  #[test]
  fn category_wire_names_round_trip_through_serde() {
    let json = serde_json::to_string(&Category::JavaSpecific).unwrap();
    assert_eq!(json, "\"Java-Specific\"");
    let back: CategoryFilter = serde_json::from_str("\"Method-Level\"").unwrap();
    assert_eq!(back, CategoryFilter::Only(Category::MethodLevel));
  }
}
