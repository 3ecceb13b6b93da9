use crate::error::{Error, Result};

/// Configuration options for k-means clustering.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters to find.
    pub k: usize,
    /// Maximum number of assign/update iterations before giving up on
    /// convergence and returning the assignment found so far.
    pub max_iterations: usize,
}

impl KMeansConfig {
    /// Create a new config with the default iteration cap (300).
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 300,
        }
    }

    /// Customize the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of partitioning a fixed dataset into at most `k` clusters by
/// iterative relocation (Lloyd's method) under a caller-supplied distance
/// function and mean/aggregation function.
///
/// Seeding is deterministic: the first data point seeds the first centroid,
/// and each further centroid is the data point farthest (by the supplied
/// distance) from every centroid chosen so far, skipping points equal to an
/// existing centroid. Identical inputs therefore always produce identical
/// clusterings, and the effective cluster count never exceeds
/// `min(k, number of distinct data points)`.
///
/// Requesting more clusters than there are distinct points is not an error:
/// every point becomes its own singleton centroid and survives unmodified
/// among [`means`](KMeans::means).
#[derive(Debug, Clone)]
pub struct KMeans<T> {
    means: Vec<T>,
    members: Vec<Vec<T>>,
    converged: bool,
    underflowed: bool,
}

impl<T: Clone + PartialEq> KMeans<T> {
    /// Clusters `data` into at most `config.k` groups.
    ///
    /// # Arguments
    ///
    /// - `distance`: pure function scoring how far apart two observations are.
    /// - `data`: the observations to cluster; must be non-empty.
    /// - `mean`: pure function reducing a non-empty group of observations to
    ///   a representative; applied to a singleton it must return the element.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyModel`] when `data` is empty.
    ///
    /// # Panics
    ///
    /// If `config.k` is 0.
    pub fn fit<D, F, M>(config: &KMeansConfig, distance: F, data: &[T], mean: M) -> Result<Self>
    where
        D: PartialOrd,
        F: Fn(&T, &T) -> D,
        M: Fn(&[T]) -> T,
    {
        assert!(config.k > 0, "k must be > 0");
        if data.is_empty() {
            return Err(Error::EmptyModel);
        }

        let mut means = seed_centroids(config.k.min(data.len()), &distance, data);
        let mut assignments = vec![usize::MAX; data.len()];
        let mut members: Vec<Vec<T>> = vec![Vec::new(); means.len()];
        let mut converged = false;

        for _ in 0..config.max_iterations {
            let mut changed = false;

            // Assignment step: nearest centroid, ties to the lowest index.
            for group in &mut members {
                group.clear();
            }
            for (i, point) in data.iter().enumerate() {
                let cluster = nearest(&distance, &means, point);
                if cluster != assignments[i] {
                    assignments[i] = cluster;
                    changed = true;
                }
                members[cluster].push(point.clone());
            }

            // Update step: a centroid with no members keeps its value.
            for (cluster, group) in members.iter().enumerate() {
                if !group.is_empty() {
                    means[cluster] = mean(group);
                }
            }

            if !changed {
                converged = true;
                break;
            }
        }

        Ok(Self {
            means,
            members,
            converged,
            underflowed: config.k > data.len(),
        })
    }

    /// Final centroid values, in seeding order.
    pub fn means(&self) -> &[T] {
        &self.means
    }

    /// Member observations of each centroid at the final assignment.
    pub fn members(&self) -> &[Vec<T>] {
        &self.members
    }

    /// Number of clusters actually produced.
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// False when the iteration cap was reached before the assignment
    /// stabilized; the last assignment found is still exposed.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// True when more clusters were requested than there were data points.
    pub fn is_underflowed(&self) -> bool {
        self.underflowed
    }
}

/// Index of the centroid nearest to `point`; ties go to the lowest index.
pub(crate) fn nearest<T, D, F>(distance: &F, centers: &[T], point: &T) -> usize
where
    D: PartialOrd,
    F: Fn(&T, &T) -> D,
{
    let mut best = 0;
    let mut best_dist = distance(point, &centers[0]);
    for (idx, center) in centers.iter().enumerate().skip(1) {
        let d = distance(point, center);
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    best
}

/// Deterministic farthest-point seeding: starts from the first data point and
/// repeatedly picks the point with the greatest distance to its nearest chosen
/// centroid (ties to the earliest point). Points equal to a chosen centroid
/// are skipped, so duplicates never produce duplicate seeds.
fn seed_centroids<T, D, F>(k: usize, distance: &F, data: &[T]) -> Vec<T>
where
    T: Clone + PartialEq,
    D: PartialOrd,
    F: Fn(&T, &T) -> D,
{
    let mut centroids = vec![data[0].clone()];
    while centroids.len() < k {
        let mut best: Option<(usize, D)> = None;
        for (i, point) in data.iter().enumerate() {
            if centroids.contains(point) {
                continue;
            }
            let mut nearest_dist = distance(point, &centroids[0]);
            for center in &centroids[1..] {
                let d = distance(point, center);
                if d < nearest_dist {
                    nearest_dist = d;
                }
            }
            let farther = match &best {
                None => true,
                Some((_, best_dist)) => nearest_dist > *best_dist,
            };
            if farther {
                best = Some((i, nearest_dist));
            }
        }
        match best {
            Some((i, _)) => centroids.push(data[i].clone()),
            // Every remaining point duplicates a centroid.
            None => break,
        }
    }
    centroids
}
