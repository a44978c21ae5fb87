//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Dispatching a `QuizAction` onto a session
//!   - Reference search over the catalog

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::domain::{CategoryFilter, RuleRecord};
use crate::protocol::QuizAction;
use crate::session::{Outcome, QuizSession};
use crate::util::trunc_for_log;

/// Apply one user action. Refused transitions are logged at debug level and
/// reported back through the `Outcome`.
#[instrument(level = "debug", skip(session), fields(mode = ?session.mode(), position = session.position()))]
pub fn apply_action(session: &mut QuizSession, action: QuizAction) -> Outcome {
  let outcome = match action {
    QuizAction::Reveal => session.reveal(),
    QuizAction::Know => session.answer_known(),
    QuizAction::DontKnow => session.answer_unknown(),
    QuizAction::Select { option } => session.select_option(&option),
    QuizAction::Next => session.advance(),
    QuizAction::Prev => session.retreat(),
    QuizAction::Restart => {
      session.restart();
      Outcome::Applied
    }
    QuizAction::ChangeCategory { category } => {
      session.change_category(category);
      Outcome::Applied
    }
  };

  let score = session.score();
  match outcome {
    Outcome::Applied => {
      info!(target: "quiz", status = ?session.status(), position = session.position(), correct = score.correct, total = score.total, "Action applied")
    }
    Outcome::Ignored(reason) => debug!(target: "quiz", ?reason, "Action ignored"),
  }
  outcome
}

/// Reference search with the raw query parameters of the HTTP endpoint.
#[instrument(level = "info", skip(catalog))]
pub fn search_rules(catalog: &Catalog, category: Option<&str>, term: Option<&str>) -> Vec<Arc<RuleRecord>> {
  let filter = category.map(CategoryFilter::parse).unwrap_or_default();
  let term = term.unwrap_or_default();
  let hits = catalog.search(&filter, term);
  debug!(target: "checkstyle_trainer", %filter, term = %trunc_for_log(term, 64), hits = hits.len(), "Rule search");
  hits
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Category, QuizMode};
  use crate::session::{Ignored, SessionStatus};
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn started(mode: QuizMode, filter: CategoryFilter) -> QuizSession {
    let catalog = Arc::new(Catalog::builtin().unwrap());
    let mut s = QuizSession::new(mode, catalog, filter, 4).with_rng(StdRng::seed_from_u64(31));
    s.begin();
    s
  }

  #[test]
  fn recall_walkthrough_through_actions() {
    let mut s = started(QuizMode::Recall, CategoryFilter::Only(Category::JavaSpecific));
    assert!(apply_action(&mut s, QuizAction::Reveal).is_applied());
    assert!(apply_action(&mut s, QuizAction::Know).is_applied());
    assert!(apply_action(&mut s, QuizAction::Prev).is_applied());
    assert_eq!(s.position(), 0);
    for _ in 0..5 {
      apply_action(&mut s, QuizAction::DontKnow);
    }
    assert_eq!(s.status(), SessionStatus::Finished);
    assert_eq!(s.score().total, 6);
    assert_eq!(apply_action(&mut s, QuizAction::Know), Outcome::Ignored(Ignored::NotInProgress));

    assert!(apply_action(&mut s, QuizAction::Restart).is_applied());
    assert_eq!(s.status(), SessionStatus::InProgress);
    assert_eq!(s.score().total, 0);
  }

  #[test]
  fn change_category_action_switches_deck() {
    let mut s = started(QuizMode::Choice, CategoryFilter::All);
    let action = QuizAction::ChangeCategory { category: CategoryFilter::parse("Nope") };
    assert!(apply_action(&mut s, action).is_applied());
    assert_eq!(s.status(), SessionStatus::Empty);
  }

  #[test]
  fn search_rules_parses_raw_parameters() {
    let catalog = Catalog::builtin().unwrap();
    assert_eq!(search_rules(&catalog, None, None).len(), 44);
    assert_eq!(search_rules(&catalog, Some("Method-Level"), None).len(), 8);
    assert_eq!(search_rules(&catalog, Some("all"), Some("equals")).len(), 2);
    assert!(search_rules(&catalog, Some("Bogus"), None).is_empty());
  }
}
