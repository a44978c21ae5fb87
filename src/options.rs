//! Multiple-choice option generation: the current rule's name plus distinct
//! distractor names drawn from the rest of the catalog, in random order.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Catalog;
use crate::deck::shuffle;
use crate::domain::RuleRecord;

/// Default number of options per question.
pub const DEFAULT_OPTION_COUNT: usize = 4;

/// Labels offered for one question. Exactly one is the correct rule name and
/// no label repeats. Stable for as long as the question is displayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionSet {
  labels: Vec<String>,
  correct: String,
}

impl OptionSet {
  pub fn labels(&self) -> &[String] {
    &self.labels
  }

  pub fn correct(&self) -> &str {
    &self.correct
  }

  pub fn contains(&self, label: &str) -> bool {
    self.labels.iter().any(|l| l == label)
  }

  #[allow(dead_code)]
  pub fn len(&self) -> usize {
    self.labels.len()
  }
}

/// Build `min(k, catalog size)` options for `current`. Distractors are picked
/// without replacement from every catalog rule except `current`.
pub fn generate_options<R: Rng + ?Sized>(
  catalog: &Catalog,
  current: &RuleRecord,
  k: usize,
  rng: &mut R,
) -> OptionSet {
  let others: Vec<&str> = catalog
    .rules()
    .iter()
    .filter(|r| r.name != current.name)
    .map(|r| r.name.as_str())
    .collect();

  let wanted = k.min(catalog.len()).saturating_sub(1);
  let mut labels: Vec<String> = others
    .choose_multiple(rng, wanted)
    .map(|s| s.to_string())
    .collect();
  labels.push(current.name.clone());
  shuffle(&mut labels, rng);

  OptionSet { labels, correct: current.name.clone() }
}
