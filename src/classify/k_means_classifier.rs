use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::cluster::k_means::{nearest, KMeans, KMeansConfig};
use crate::error::{Error, Result};
use crate::stats::Histogram;

/// Classifies by nearest labeled centroid after one global clustering of the
/// whole training set.
///
/// Labels are ignored while clustering; the cluster budget is
/// `k × (number of distinct labels)` so that every label can claim about `k`
/// centroids, matching the resolution of clustering each label separately.
/// Each centroid then takes the majority label (first-seen tie-break) of the
/// training examples nearest to it; centroids that attract no examples are
/// dropped. With `k` large relative to the per-label population this
/// degrades to nearest-neighbor precision, the same boundary behavior as
/// [`KMeansClassifierAggregated`].
pub struct KMeansClassifier<T, L, D, F>
where
    F: Fn(&T, &T) -> D,
{
    distance: F,
    centroids: Vec<(T, L)>,
    _distance_marker: PhantomData<D>,
}

impl<T, L, D, F> KMeansClassifier<T, L, D, F>
where
    T: Clone + PartialEq,
    L: Eq + Hash + Clone,
    D: PartialOrd,
    F: Fn(&T, &T) -> D,
{
    /// Reduces `data` to labeled centroids.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyModel`] when `data` is empty.
    ///
    /// # Panics
    ///
    /// If `k == 0`.
    pub fn fit<M>(k: usize, distance: F, data: &[(T, L)], mean: M) -> Result<Self>
    where
        M: Fn(&[T]) -> T,
    {
        assert!(k > 0, "k must be > 0");
        if data.is_empty() {
            return Err(Error::EmptyModel);
        }
        let observations: Vec<T> = data.iter().map(|(obs, _)| obs.clone()).collect();
        let distinct_labels: HashSet<&L> = data.iter().map(|(_, label)| label).collect();
        let budget = k * distinct_labels.len();
        let clustering = KMeans::fit(&KMeansConfig::new(budget), &distance, &observations, mean)?;

        let mut votes: Vec<Histogram<L>> = vec![Histogram::new(); clustering.len()];
        for (observation, label) in data {
            let cluster = nearest(&distance, clustering.means(), observation);
            votes[cluster].bump(label.clone());
        }
        let mut centroids = Vec::new();
        for (centroid, vote) in clustering.means().iter().zip(&votes) {
            if let Ok(label) = vote.plurality_label() {
                centroids.push((centroid.clone(), label.clone()));
            }
        }

        Ok(Self {
            distance,
            centroids,
            _distance_marker: PhantomData,
        })
    }

    /// Label of the tagged centroid nearest to `query`.
    pub fn label_for(&self, query: &T) -> Result<L> {
        nearest_label(&self.distance, &self.centroids, query)
    }

    /// The labeled centroids the classifier decides with.
    pub fn centroids(&self) -> &[(T, L)] {
        &self.centroids
    }
}

/// Classifies by nearest labeled centroid after clustering each label's
/// observations independently.
///
/// The training data is partitioned by label (first-seen label order), a
/// separate k-means run reduces each partition, and every resulting centroid
/// is tagged directly with its partition's label. No majority vote is needed:
/// all members of a run already share the label.
pub struct KMeansClassifierAggregated<T, L, D, F>
where
    F: Fn(&T, &T) -> D,
{
    distance: F,
    centroids: Vec<(T, L)>,
    _distance_marker: PhantomData<D>,
}

impl<T, L, D, F> KMeansClassifierAggregated<T, L, D, F>
where
    T: Clone + PartialEq,
    L: Eq + Hash + Clone,
    D: PartialOrd,
    F: Fn(&T, &T) -> D,
{
    /// Reduces each label's observations to at most `k` centroids.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyModel`] when `data` is empty.
    ///
    /// # Panics
    ///
    /// If `k == 0`.
    pub fn fit<M>(k: usize, distance: F, data: &[(T, L)], mean: M) -> Result<Self>
    where
        M: Fn(&[T]) -> T,
    {
        assert!(k > 0, "k must be > 0");
        if data.is_empty() {
            return Err(Error::EmptyModel);
        }

        let mut label_order: Vec<L> = Vec::new();
        let mut partitions: HashMap<L, Vec<T>> = HashMap::new();
        for (observation, label) in data {
            match partitions.entry(label.clone()) {
                Entry::Occupied(mut e) => e.get_mut().push(observation.clone()),
                Entry::Vacant(e) => {
                    e.insert(vec![observation.clone()]);
                    label_order.push(label.clone());
                }
            }
        }

        let config = KMeansConfig::new(k);
        let mut centroids = Vec::new();
        for label in &label_order {
            let clustering = KMeans::fit(&config, &distance, &partitions[label], &mean)?;
            for centroid in clustering.means() {
                centroids.push((centroid.clone(), label.clone()));
            }
        }

        Ok(Self {
            distance,
            centroids,
            _distance_marker: PhantomData,
        })
    }

    /// Label of the tagged centroid nearest to `query`.
    pub fn label_for(&self, query: &T) -> Result<L> {
        nearest_label(&self.distance, &self.centroids, query)
    }

    /// The labeled centroids the classifier decides with.
    pub fn centroids(&self) -> &[(T, L)] {
        &self.centroids
    }
}

/// Label of the nearest tagged centroid; ties go to the earliest tag.
fn nearest_label<T, L, D, F>(distance: &F, centroids: &[(T, L)], query: &T) -> Result<L>
where
    L: Clone,
    D: PartialOrd,
    F: Fn(&T, &T) -> D,
{
    let mut best: Option<(&L, D)> = None;
    for (centroid, label) in centroids {
        let d = distance(query, centroid);
        let closer = match &best {
            None => true,
            Some((_, best_dist)) => d < *best_dist,
        };
        if closer {
            best = Some((label, d));
        }
    }
    best.map(|(label, _)| label.clone()).ok_or(Error::EmptyModel)
}
