use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Error, Result};

/// A frequency counter over a finite set of labels, used for plurality voting.
///
/// Labels are remembered in first-seen order so that ties in
/// [`plurality_label`](Histogram::plurality_label) break deterministically:
/// among labels tied for the maximum count, the one bumped first wins.
#[derive(Debug, Clone)]
pub struct Histogram<L: Eq + Hash + Clone> {
    counts: HashMap<L, usize>,
    order: Vec<L>,
    total: usize,
}

impl<L: Eq + Hash + Clone> Histogram<L> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            order: Vec::new(),
            total: 0,
        }
    }

    /// Increments the count for `label`, creating the entry on first use.
    pub fn bump(&mut self, label: L) {
        match self.counts.entry(label.clone()) {
            Entry::Occupied(mut e) => *e.get_mut() += 1,
            Entry::Vacant(e) => {
                e.insert(1);
                self.order.push(label);
            }
        }
        self.total += 1;
    }

    /// Returns the count for `label`, 0 if it was never bumped.
    pub fn count(&self, label: &L) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Total number of bumps across all labels.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Fraction of all bumps that went to `label`; 0.0 when the histogram
    /// is empty.
    pub fn portion(&self, label: &L) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(label) as f64 / self.total as f64
        }
    }

    /// Labels in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.order.iter()
    }

    /// The label with the maximum count. Ties break in favor of the label
    /// that was bumped first.
    pub fn plurality_label(&self) -> Result<&L> {
        let mut best: Option<(&L, usize)> = None;
        for label in &self.order {
            let count = self.counts[label];
            let better = match best {
                None => true,
                Some((_, best_count)) => count > best_count,
            };
            if better {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label).ok_or(Error::EmptyHistogram)
    }
}

impl<L: Eq + Hash + Clone> Default for Histogram<L> {
    fn default() -> Self {
        Self::new()
    }
}
