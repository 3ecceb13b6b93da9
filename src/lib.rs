pub mod classify;
pub mod cluster;
pub mod error;
pub mod metrics;
pub mod stats;

pub use classify::{Bitmap, BitmapKnnClassifier, Knn, KMeansClassifier, KMeansClassifierAggregated};
pub use cluster::{KMeans, KMeansConfig};
pub use error::{Error, Result};
pub use stats::{Distribution, Histogram};
