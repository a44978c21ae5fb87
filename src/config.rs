//! Loading trainer configuration (quiz tuning + optional extra rules) from TOML.
//!
//! See `TrainerConfig` for the expected schema:
//!
//! ```toml
//! [quiz]
//! option_count = 4
//! max_sessions = 1024
//! idle_timeout_secs = 1800
//!
//! [[rules]]
//! name = "LineLength"
//! category = "Class-Level"
//! what_it_checks = "Checks for long lines."
//! ```

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Category, RuleRecord};
use crate::options::DEFAULT_OPTION_COUNT;

pub const DEFAULT_MAX_SESSIONS: usize = 1024;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TrainerConfig {
  #[serde(default)]
  pub quiz: QuizCfg,
  #[serde(default)]
  pub rules: Vec<RuleCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuizCfg {
  /// Options per multiple-choice question (correct answer included).
  #[serde(default = "default_option_count")]
  pub option_count: usize,
  /// Cap on live HTTP quiz sessions.
  #[serde(default = "default_max_sessions")]
  pub max_sessions: usize,
  /// HTTP sessions untouched for this long are dropped.
  #[serde(default = "default_idle_timeout_secs")]
  pub idle_timeout_secs: u64,
}

impl Default for QuizCfg {
  fn default() -> Self {
    Self {
      option_count: DEFAULT_OPTION_COUNT,
      max_sessions: DEFAULT_MAX_SESSIONS,
      idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
    }
  }
}

fn default_option_count() -> usize { DEFAULT_OPTION_COUNT }
fn default_max_sessions() -> usize { DEFAULT_MAX_SESSIONS }
fn default_idle_timeout_secs() -> u64 { DEFAULT_IDLE_TIMEOUT_SECS }

/// Extra catalog entry accepted in TOML configuration.
/// Only `name` and `category` are required.
#[derive(Clone, Debug, Deserialize)]
pub struct RuleCfg {
  pub name: String,
  pub category: Category,
  #[serde(default)] pub where_used: String,
  #[serde(default)] pub what_it_checks: String,
  #[serde(default)] pub why_it_matters: String,
  #[serde(default)] pub common_violation: String,
  #[serde(default)] pub correct_usage: String,
}

impl From<RuleCfg> for RuleRecord {
  fn from(c: RuleCfg) -> Self {
    RuleRecord {
      name: c.name,
      category: c.category,
      where_used: c.where_used,
      what_it_checks: c.what_it_checks,
      why_it_matters: c.why_it_matters,
      common_violation: c.common_violation,
      correct_usage: c.correct_usage,
    }
  }
}

pub fn parse_config(s: &str) -> Result<TrainerConfig, toml::de::Error> {
  toml::from_str::<TrainerConfig>(s)
}

/// Attempt to load `TrainerConfig` from TRAINER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<TrainerConfig> {
  let path = std::env::var("TRAINER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "checkstyle_trainer", %path, extra_rules = cfg.rules.len(), "Loaded trainer config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "checkstyle_trainer", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "checkstyle_trainer", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_uses_defaults() {
    let cfg = parse_config("").unwrap();
    assert_eq!(cfg.quiz.option_count, 4);
    assert_eq!(cfg.quiz.max_sessions, DEFAULT_MAX_SESSIONS);
    assert_eq!(cfg.quiz.idle_timeout_secs, DEFAULT_IDLE_TIMEOUT_SECS);
    assert!(cfg.rules.is_empty());
  }

  #[test]
  fn parses_quiz_section_and_extra_rules() {
    let cfg = parse_config(
      r#"
        [quiz]
        option_count = 3

        [[rules]]
        name = "LineLength"
        category = "Class-Level"
        what_it_checks = "Checks for long lines."
      "#,
    )
    .unwrap();
    assert_eq!(cfg.quiz.option_count, 3);
    assert_eq!(cfg.quiz.max_sessions, DEFAULT_MAX_SESSIONS);
    let rule: RuleRecord = cfg.rules[0].clone().into();
    assert_eq!(rule.name, "LineLength");
    assert_eq!(rule.category, Category::ClassLevel);
    assert!(rule.correct_usage.is_empty());
  }

  #[test]
  fn unknown_category_is_a_parse_error() {
    assert!(parse_config("[[rules]]\nname = \"X\"\ncategory = \"Style\"\n").is_err());
  }
}
