//! Deck builder: filter the catalog by category and put the result in a
//! uniformly random order.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Catalog;
use crate::domain::{CategoryFilter, RuleRecord};

/// Uniform Fisher-Yates permutation in place.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
  items.shuffle(rng);
}

/// Ordered working set of rules for one quiz session.
#[derive(Clone, Debug, Default)]
pub struct Deck {
  cards: Vec<Arc<RuleRecord>>,
}

impl Deck {
  #[allow(dead_code)]
  pub fn from_rules(cards: Vec<Arc<RuleRecord>>) -> Self {
    Self { cards }
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  pub fn get(&self, position: usize) -> Option<&Arc<RuleRecord>> {
    self.cards.get(position)
  }

  #[allow(dead_code)]
  pub fn iter(&self) -> impl Iterator<Item = &Arc<RuleRecord>> {
    self.cards.iter()
  }
}

/// Select the rules the filter admits and shuffle them. A filter that matches
/// nothing yields an empty deck. The catalog is never mutated.
pub fn build_deck<R: Rng + ?Sized>(catalog: &Catalog, filter: &CategoryFilter, rng: &mut R) -> Deck {
  let mut cards: Vec<Arc<RuleRecord>> = catalog.filtered(filter).cloned().collect();
  shuffle(&mut cards, rng);
  Deck { cards }
}
