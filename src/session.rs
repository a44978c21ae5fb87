//! Quiz session engine shared by both quiz variants.
//!
//! A `QuizSession` owns its deck, position, score and per-question state.
//! Every operation is a synchronous in-memory transition that either applies
//! or is refused; refusals come back as `Outcome::Ignored` and leave the
//! state untouched.
//!
//! Session lifecycle: `NotStarted -> InProgress -> Finished`, with `Empty`
//! standing in for `InProgress` when the deck has no rules. `restart` and
//! `change_category` go back to `InProgress` from any state.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::deck::{build_deck, Deck};
use crate::domain::{CategoryFilter, QuizMode, RuleRecord};
use crate::options::{generate_options, OptionSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
  NotStarted,
  InProgress,
  Finished,
  /// The deck had no rules; there is nothing to navigate.
  Empty,
}

/// Why an operation did not change the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ignored {
  NotInProgress,
  AlreadyRevealed,
  AlreadyAnswered,
  WrongMode,
  AtFirstQuestion,
  UnknownOption,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
  Applied,
  Ignored(Ignored),
}

impl Outcome {
  #[allow(dead_code)]
  pub fn is_applied(self) -> bool {
    matches!(self, Outcome::Applied)
  }
}

/// Running tally. `correct <= total` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Score {
  pub correct: u32,
  pub total: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
  Strong,
  Fair,
  Weak,
}

impl Score {
  fn record(&mut self, correct: bool) {
    self.total += 1;
    if correct {
      self.correct += 1;
    }
  }

  /// Rounded percentage of correct answers; 0 before any answer.
  pub fn percent(&self) -> u32 {
    if self.total == 0 {
      return 0;
    }
    ((f64::from(self.correct) * 100.0) / f64::from(self.total)).round() as u32
  }

  /// Band from the exact ratio; `percent` is for display and may round up
  /// across a threshold.
  pub fn band(&self) -> ScoreBand {
    let scaled = u64::from(self.correct) * 100;
    let total = u64::from(self.total);
    if total == 0 {
      ScoreBand::Weak
    } else if scaled >= 80 * total {
      ScoreBand::Strong
    } else if scaled >= 60 * total {
      ScoreBand::Fair
    } else {
      ScoreBand::Weak
    }
  }
}

pub struct QuizSession {
  mode: QuizMode,
  catalog: Arc<Catalog>,
  filter: CategoryFilter,
  option_count: usize,
  rng: StdRng,

  deck: Deck,
  position: usize,
  score: Score,
  revealed: bool,
  selected: Option<String>,
  options: Option<OptionSet>,
  status: SessionStatus,
}

impl QuizSession {
  /// A session that has not started yet. Call `begin` (or `start`) to deal.
  pub fn new(mode: QuizMode, catalog: Arc<Catalog>, filter: CategoryFilter, option_count: usize) -> Self {
    Self {
      mode,
      catalog,
      filter,
      option_count,
      rng: StdRng::from_entropy(),
      deck: Deck::default(),
      position: 0,
      score: Score::default(),
      revealed: false,
      selected: None,
      options: None,
      status: SessionStatus::NotStarted,
    }
  }

  /// Replace the random source, e.g. with a seeded one.
  #[must_use]
  pub fn with_rng(mut self, rng: StdRng) -> Self {
    self.rng = rng;
    self
  }

  /// Build a fresh deck for the current filter and start on it.
  pub fn begin(&mut self) {
    let deck = build_deck(&self.catalog, &self.filter, &mut self.rng);
    self.start(deck);
  }

  /// Start on the given deck: first question, zero score, nothing revealed.
  /// An empty deck puts the session straight into `Empty`.
  pub fn start(&mut self, deck: Deck) {
    self.deck = deck;
    self.position = 0;
    self.score = Score::default();
    self.status = if self.deck.is_empty() {
      SessionStatus::Empty
    } else {
      SessionStatus::InProgress
    };
    self.enter_question();
    debug!(target: "quiz", mode = ?self.mode, filter = %self.filter, deck_len = self.deck.len(), status = ?self.status, "Session started");
  }

  /// Re-shuffle the same category and start over, from any state.
  pub fn restart(&mut self) {
    self.begin();
  }

  /// Switch category and start over on the new deck.
  pub fn change_category(&mut self, filter: CategoryFilter) {
    self.filter = filter;
    self.begin();
  }

  /// Show the current answer. Unscored; idempotent.
  pub fn reveal(&mut self) -> Outcome {
    if self.status != SessionStatus::InProgress {
      return Outcome::Ignored(Ignored::NotInProgress);
    }
    if self.revealed {
      return Outcome::Ignored(Ignored::AlreadyRevealed);
    }
    self.revealed = true;
    Outcome::Applied
  }

  pub fn answer_known(&mut self) -> Outcome {
    self.answer_recall(true)
  }

  pub fn answer_unknown(&mut self) -> Outcome {
    self.answer_recall(false)
  }

  fn answer_recall(&mut self, known: bool) -> Outcome {
    if self.mode != QuizMode::Recall {
      return Outcome::Ignored(Ignored::WrongMode);
    }
    if self.status != SessionStatus::InProgress {
      return Outcome::Ignored(Ignored::NotInProgress);
    }
    self.score.record(known);
    self.step_forward();
    Outcome::Applied
  }

  /// Pick an option for the current question. The first pick stands; the
  /// question then stays revealed until `advance`.
  pub fn select_option(&mut self, label: &str) -> Outcome {
    if self.mode != QuizMode::Choice {
      return Outcome::Ignored(Ignored::WrongMode);
    }
    if self.status != SessionStatus::InProgress {
      return Outcome::Ignored(Ignored::NotInProgress);
    }
    if self.revealed {
      return Outcome::Ignored(Ignored::AlreadyAnswered);
    }
    let Some(options) = &self.options else {
      return Outcome::Ignored(Ignored::NotInProgress);
    };
    if !options.contains(label) {
      return Outcome::Ignored(Ignored::UnknownOption);
    }
    let correct = options.correct() == label;
    self.score.record(correct);
    self.revealed = true;
    self.selected = Some(label.to_string());
    Outcome::Applied
  }

  /// Next question, or `Finished` after the last one.
  pub fn advance(&mut self) -> Outcome {
    if self.status != SessionStatus::InProgress {
      return Outcome::Ignored(Ignored::NotInProgress);
    }
    self.step_forward();
    Outcome::Applied
  }

  /// Previous question. Recall only; free (score untouched).
  pub fn retreat(&mut self) -> Outcome {
    if self.mode != QuizMode::Recall {
      return Outcome::Ignored(Ignored::WrongMode);
    }
    if self.status != SessionStatus::InProgress {
      return Outcome::Ignored(Ignored::NotInProgress);
    }
    if self.position == 0 {
      return Outcome::Ignored(Ignored::AtFirstQuestion);
    }
    self.position -= 1;
    self.enter_question();
    Outcome::Applied
  }

  fn step_forward(&mut self) {
    if self.position + 1 < self.deck.len() {
      self.position += 1;
      self.enter_question();
    } else {
      self.status = SessionStatus::Finished;
      debug!(target: "quiz", correct = self.score.correct, total = self.score.total, "Session finished");
    }
  }

  // Per-question reset; options are dealt once here and stay fixed until the
  // question changes.
  fn enter_question(&mut self) {
    self.revealed = false;
    self.selected = None;
    self.options = match (self.mode, self.deck.get(self.position)) {
      (QuizMode::Choice, Some(rule)) => {
        Some(generate_options(&self.catalog, rule, self.option_count, &mut self.rng))
      }
      _ => None,
    };
  }

  pub fn mode(&self) -> QuizMode {
    self.mode
  }

  pub fn filter(&self) -> &CategoryFilter {
    &self.filter
  }

  pub fn status(&self) -> SessionStatus {
    self.status
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn deck_len(&self) -> usize {
    self.deck.len()
  }

  pub fn score(&self) -> Score {
    self.score
  }

  pub fn revealed(&self) -> bool {
    self.revealed
  }

  pub fn current(&self) -> Option<&Arc<RuleRecord>> {
    match self.status {
      SessionStatus::InProgress | SessionStatus::Finished => self.deck.get(self.position),
      SessionStatus::NotStarted | SessionStatus::Empty => None,
    }
  }

  pub fn options(&self) -> Option<&OptionSet> {
    self.options.as_ref()
  }

  pub fn selected(&self) -> Option<&str> {
    self.selected.as_deref()
  }

  /// Whether the selected option was right; `None` until something is picked.
  pub fn answered_correctly(&self) -> Option<bool> {
    let selected = self.selected.as_deref()?;
    self.options.as_ref().map(|o| o.correct() == selected)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Category;
  use crate::options::DEFAULT_OPTION_COUNT;

  fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin().unwrap())
  }

  fn session(mode: QuizMode, filter: &str) -> QuizSession {
    let mut s = QuizSession::new(mode, catalog(), CategoryFilter::parse(filter), DEFAULT_OPTION_COUNT)
      .with_rng(StdRng::seed_from_u64(2024));
    s.begin();
    s
  }

  fn deck_of(n: usize) -> Deck {
    let catalog = catalog();
    Deck::from_rules(catalog.rules().iter().take(n).cloned().collect())
  }

  fn wrong_label(s: &QuizSession) -> String {
    let options = s.options().unwrap();
    options.labels().iter().find(|l| *l != options.correct()).unwrap().clone()
  }

  #[test]
  fn new_session_is_not_started() {
    let mut s = QuizSession::new(QuizMode::Recall, catalog(), CategoryFilter::All, 4);
    assert_eq!(s.status(), SessionStatus::NotStarted);
    assert!(s.current().is_none());
    assert_eq!(s.reveal(), Outcome::Ignored(Ignored::NotInProgress));
  }

  #[test]
  fn three_known_answers_then_finished() {
    let mut s = QuizSession::new(QuizMode::Recall, catalog(), CategoryFilter::All, 4);
    s.start(deck_of(3));
    assert_eq!(s.status(), SessionStatus::InProgress);

    for _ in 0..3 {
      assert!(s.answer_known().is_applied());
    }
    assert_eq!(s.score(), Score { correct: 3, total: 3 });
    assert_eq!(s.status(), SessionStatus::Finished);
    assert_eq!(s.advance(), Outcome::Ignored(Ignored::NotInProgress));
    assert_eq!(s.advance(), Outcome::Ignored(Ignored::NotInProgress));
    assert_eq!(s.score(), Score { correct: 3, total: 3 });
  }

  #[test]
  fn advance_past_last_question_finishes() {
    let mut s = QuizSession::new(QuizMode::Recall, catalog(), CategoryFilter::All, 4);
    s.start(deck_of(3));
    s.answer_known();
    s.answer_unknown();
    assert_eq!(s.position(), 2);
    assert!(s.advance().is_applied());
    assert_eq!(s.status(), SessionStatus::Finished);
    assert_eq!(s.advance(), Outcome::Ignored(Ignored::NotInProgress));
    assert_eq!(s.position(), 2);
  }

  #[test]
  fn score_invariants_hold_for_mixed_answers() {
    let mut s = session(QuizMode::Recall, "all");
    let pattern = [true, false, false, true, true, false, true];
    let mut last = Score::default();
    for (i, known) in pattern.iter().enumerate() {
      if *known { s.answer_known(); } else { s.answer_unknown(); }
      let now = s.score();
      assert!(now.correct <= now.total);
      assert!(now.correct >= last.correct && now.total >= last.total);
      assert_eq!(now.total as usize, i + 1);
      last = now;
    }
    assert_eq!(last, Score { correct: 4, total: 7 });
  }

  #[test]
  fn reveal_is_idempotent() {
    let mut s = session(QuizMode::Recall, "Method-Level");
    assert!(s.reveal().is_applied());
    let position = s.position();
    let score = s.score();
    assert_eq!(s.reveal(), Outcome::Ignored(Ignored::AlreadyRevealed));
    assert!(s.revealed());
    assert_eq!(s.position(), position);
    assert_eq!(s.score(), score);
  }

  #[test]
  fn retreat_is_free_and_stops_at_first_question() {
    let mut s = session(QuizMode::Recall, "all");
    assert_eq!(s.retreat(), Outcome::Ignored(Ignored::AtFirstQuestion));
    s.answer_known();
    s.reveal();
    assert!(s.retreat().is_applied());
    assert_eq!(s.position(), 0);
    assert!(!s.revealed());
    assert_eq!(s.score(), Score { correct: 1, total: 1 });
  }

  #[test]
  fn advance_resets_reveal() {
    let mut s = session(QuizMode::Recall, "all");
    s.reveal();
    s.advance();
    assert_eq!(s.position(), 1);
    assert!(!s.revealed());
    assert_eq!(s.score(), Score::default());
  }

  #[test]
  fn empty_deck_is_terminal_without_panicking() {
    let mut s = session(QuizMode::Choice, "NonexistentCategory");
    assert_eq!(s.status(), SessionStatus::Empty);
    assert_eq!(s.deck_len(), 0);
    assert!(s.current().is_none());
    assert!(s.options().is_none());
    assert_eq!(s.advance(), Outcome::Ignored(Ignored::NotInProgress));
    assert_eq!(s.select_option("NeedBraces"), Outcome::Ignored(Ignored::NotInProgress));
  }

  #[test]
  fn restart_resets_score_and_position() {
    let mut s = session(QuizMode::Recall, "Java-Specific");
    while s.status() == SessionStatus::InProgress {
      s.answer_unknown();
    }
    assert_eq!(s.score().total, 5);
    s.restart();
    assert_eq!(s.status(), SessionStatus::InProgress);
    assert_eq!(s.position(), 0);
    assert_eq!(s.score(), Score::default());
    assert_eq!(s.deck_len(), 5);
    assert!(s.current().is_some_and(|r| r.category == Category::JavaSpecific));
  }

  #[test]
  fn change_category_rebuilds_deck() {
    let mut s = session(QuizMode::Recall, "all");
    s.answer_known();
    s.change_category(CategoryFilter::Only(Category::ControlFlow));
    assert_eq!(s.deck_len(), 12);
    assert_eq!(s.score(), Score::default());
    assert_eq!(s.filter(), &CategoryFilter::Only(Category::ControlFlow));
  }

  #[test]
  fn choice_first_answer_stands() {
    let mut s = session(QuizMode::Choice, "all");
    let correct = s.options().unwrap().correct().to_string();
    assert_eq!(s.current().unwrap().name, correct);

    assert!(s.select_option(&correct).is_applied());
    assert!(s.revealed());
    assert_eq!(s.selected(), Some(correct.as_str()));
    assert_eq!(s.answered_correctly(), Some(true));

    let other = wrong_label(&s);
    assert_eq!(s.select_option(&other), Outcome::Ignored(Ignored::AlreadyAnswered));
    assert_eq!(s.score(), Score { correct: 1, total: 1 });
    assert_eq!(s.position(), 0);
  }

  #[test]
  fn choice_wrong_answer_counts_and_does_not_advance() {
    let mut s = session(QuizMode::Choice, "all");
    let wrong = wrong_label(&s);
    assert!(s.select_option(&wrong).is_applied());
    assert_eq!(s.score(), Score { correct: 0, total: 1 });
    assert_eq!(s.answered_correctly(), Some(false));
    assert_eq!(s.position(), 0);

    assert!(s.advance().is_applied());
    assert_eq!(s.position(), 1);
    assert!(!s.revealed());
    assert!(s.selected().is_none());
    let options = s.options().unwrap();
    assert_eq!(options.correct(), s.current().unwrap().name);
  }

  #[test]
  fn choice_options_stay_stable_within_a_question() {
    let mut s = session(QuizMode::Choice, "all");
    let before = s.options().cloned();
    assert_eq!(s.select_option("NotARealRule"), Outcome::Ignored(Ignored::UnknownOption));
    assert_eq!(s.options().cloned(), before);
    let correct = s.options().unwrap().correct().to_string();
    s.select_option(&correct);
    assert_eq!(s.options().cloned(), before);
  }

  #[test]
  fn mode_specific_operations_are_refused_in_other_mode() {
    let mut choice = session(QuizMode::Choice, "all");
    assert_eq!(choice.answer_known(), Outcome::Ignored(Ignored::WrongMode));
    assert_eq!(choice.retreat(), Outcome::Ignored(Ignored::WrongMode));

    let mut recall = session(QuizMode::Recall, "all");
    assert_eq!(recall.select_option("NeedBraces"), Outcome::Ignored(Ignored::WrongMode));
    assert!(recall.options().is_none());
  }

  #[test]
  fn revealing_in_choice_mode_blocks_a_later_pick() {
    let mut s = session(QuizMode::Choice, "all");
    assert!(s.reveal().is_applied());
    let correct = s.options().unwrap().correct().to_string();
    assert_eq!(s.select_option(&correct), Outcome::Ignored(Ignored::AlreadyAnswered));
    assert_eq!(s.score(), Score::default());
  }

  #[test]
  fn score_bands_follow_thresholds() {
    assert_eq!(Score { correct: 0, total: 0 }.percent(), 0);
    assert_eq!(Score { correct: 4, total: 5 }.band(), ScoreBand::Strong);
    assert_eq!(Score { correct: 3, total: 5 }.band(), ScoreBand::Fair);
    assert_eq!(Score { correct: 1, total: 2 }.band(), ScoreBand::Weak);
    assert_eq!(Score { correct: 2, total: 3 }.percent(), 67);
  }

  #[test]
  fn band_uses_unrounded_ratio() {
    let just_under_strong = Score { correct: 35, total: 44 };
    assert_eq!(just_under_strong.percent(), 80);
    assert_eq!(just_under_strong.band(), ScoreBand::Fair);

    let just_under_fair = Score { correct: 25, total: 42 };
    assert_eq!(just_under_fair.percent(), 60);
    assert_eq!(just_under_fair.band(), ScoreBand::Weak);

    assert_eq!(Score { correct: 44, total: 55 }.band(), ScoreBand::Strong);
    assert_eq!(Score { correct: 0, total: 0 }.band(), ScoreBand::Weak);
  }
}
