pub mod bitmap;
pub mod k_means_classifier;
pub mod k_nearest;

pub use bitmap::{
    bitmap_ssd, Bitmap, BitmapKnnClassifier, ClassificationListener, TrainingStore,
};
pub use k_means_classifier::{KMeansClassifier, KMeansClassifierAggregated};
pub use k_nearest::{Assessment, Knn};
