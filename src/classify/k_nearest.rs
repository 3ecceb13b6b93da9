use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::stats::Histogram;

/// A k-nearest-neighbor classifier over caller-supplied observations,
/// labels, and distance function.
///
/// # Type Parameters
/// - `T`: the observation type.
/// - `L`: the label type. Must be `Eq + Hash` for vote counting.
/// - `D`: the ordered distance value produced by `F`.
/// - `F`: the distance function.
///
/// Examples only ever accumulate; there is no removal. Classification ranks
/// every stored example by distance to the query with a stable sort, so ties
/// at equal distance resolve in insertion order, then takes the plurality
/// label among the `k` nearest. When fewer than `k` examples are stored,
/// all of them vote rather than failing.
pub struct Knn<T, L, D, F>
where
    F: Fn(&T, &T) -> D,
{
    distance: F,
    k: usize,
    examples: Vec<(T, L)>,
    _distance_marker: PhantomData<D>,
}

impl<T, L, D, F> Knn<T, L, D, F>
where
    L: Eq + Hash + Clone,
    D: PartialOrd,
    F: Fn(&T, &T) -> D,
{
    /// Constructs an empty classifier.
    ///
    /// # Panics
    ///
    /// If `k == 0`.
    pub fn new(distance: F, k: usize) -> Self {
        assert!(k > 0, "k must be > 0");
        Self {
            distance,
            k,
            examples: Vec::new(),
            _distance_marker: PhantomData,
        }
    }

    /// Appends one training example. Always succeeds; O(1) amortized.
    pub fn add_example(&mut self, observation: T, label: L) {
        self.examples.push((observation, label));
    }

    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }

    /// Plurality label among the `k` stored examples nearest to `query`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyModel`] when no examples are stored.
    pub fn label_for(&self, query: &T) -> Result<L> {
        self.label_for_excluding(query, None)
    }

    fn label_for_excluding(&self, query: &T, skip: Option<usize>) -> Result<L> {
        let mut ranked: Vec<(D, usize)> = self
            .examples
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(i, (observation, _))| ((self.distance)(query, observation), i))
            .collect();
        if ranked.is_empty() {
            return Err(Error::EmptyModel);
        }
        // Stable sort: equal distances keep insertion order.
        ranked.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut votes = Histogram::new();
        for (_, idx) in ranked.iter().take(self.k) {
            votes.bump(self.examples[*idx].1.clone());
        }
        Ok(votes.plurality_label()?.clone())
    }

    /// Leave-one-out cross-validation over the stored examples.
    ///
    /// Each example is classified against the remaining `n - 1` and compared
    /// to its true label. O(n²); a diagnostic, not a hot path.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyModel`] with fewer than two examples, since excluding
    /// the example under test must leave something to classify against.
    pub fn assess(&self) -> Result<Assessment<L>> {
        if self.examples.len() < 2 {
            return Err(Error::EmptyModel);
        }
        let mut attempts = Histogram::new();
        let mut correct = Histogram::new();
        for (i, (observation, truth)) in self.examples.iter().enumerate() {
            let predicted = self.label_for_excluding(observation, Some(i))?;
            attempts.bump(truth.clone());
            if predicted == *truth {
                correct.bump(truth.clone());
            }
        }
        Ok(Assessment { attempts, correct })
    }
}

/// Per-label and overall accuracy tallies from [`Knn::assess`].
#[derive(Debug, Clone)]
pub struct Assessment<L: Eq + Hash + Clone> {
    attempts: Histogram<L>,
    correct: Histogram<L>,
}

impl<L: Eq + Hash + Clone> Assessment<L> {
    /// Overall fraction of correctly classified examples, in [0, 1].
    pub fn accuracy(&self) -> f64 {
        if self.attempts.total() == 0 {
            0.0
        } else {
            self.correct.total() as f64 / self.attempts.total() as f64
        }
    }

    pub fn attempts_for(&self, label: &L) -> usize {
        self.attempts.count(label)
    }

    pub fn correct_for(&self, label: &L) -> usize {
        self.correct.count(label)
    }
}

impl<L: Eq + Hash + Clone + fmt::Display> Assessment<L> {
    /// Human-readable accuracy report: overall accuracy plus per-label counts.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl<L: Eq + Hash + Clone + fmt::Display> fmt::Display for Assessment<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Overall accuracy: {:.1}% ({}/{})",
            self.accuracy() * 100.0,
            self.correct.total(),
            self.attempts.total()
        )?;
        for label in self.attempts.labels() {
            let attempts = self.attempts.count(label);
            let correct = self.correct.count(label);
            writeln!(
                f,
                "  {}: {}/{} ({:.1}%)",
                label,
                correct,
                attempts,
                100.0 * correct as f64 / attempts as f64
            )?;
        }
        Ok(())
    }
}
