//! Classifier score sets

use std::collections::{BTreeMap, BTreeSet};

use super::category::Category;

/// Per-category confidence values for one analyzed message.
///
/// Backed by a `BTreeMap`, so iteration follows enumeration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSet {
    scores: BTreeMap<Category, f64>,
}

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw classifier output, keeping only usable scores for the
    /// requested categories.
    ///
    /// A score is usable when it is finite and within `[0, 1]`. Values are
    /// rounded to three decimals.
    pub fn from_raw<I>(raw: I, requested: &BTreeSet<Category>) -> Self
    where
        I: IntoIterator<Item = (Category, f64)>,
    {
        let scores = raw
            .into_iter()
            .filter(|(category, _)| requested.contains(category))
            .filter(|(_, value)| value.is_finite() && (0.0..=1.0).contains(value))
            .map(|(category, value)| (category, round3(value)))
            .collect();
        Self { scores }
    }

    pub fn insert(&mut self, category: Category, score: f64) -> &mut Self {
        self.scores.insert(category, score);
        self
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.scores.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.scores.iter().map(|(c, v)| (*c, *v))
    }
}

impl FromIterator<(Category, f64)> for ScoreSet {
    fn from_iter<T: IntoIterator<Item = (Category, f64)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
