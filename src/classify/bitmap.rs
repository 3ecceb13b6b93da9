use log::info;

use crate::classify::k_nearest::Knn;
use crate::error::Result;

/// A row-major RGB image crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl Bitmap {
    /// # Panics
    ///
    /// If `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> Self {
        assert_eq!(pixels.len(), width * height, "pixel buffer size mismatch");
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A solid-color bitmap.
    pub fn filled(width: usize, height: usize, pixel: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }

    /// Nearest-neighbor resample to the given size.
    ///
    /// # Panics
    ///
    /// If either target dimension is zero.
    pub fn scaled(&self, width: usize, height: usize) -> Bitmap {
        assert!(width > 0 && height > 0, "target size must be non-zero");
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let src_y = y * self.height / height;
            for x in 0..width {
                let src_x = x * self.width / width;
                pixels.push(self.pixel(src_x, src_y));
            }
        }
        Bitmap {
            width,
            height,
            pixels,
        }
    }
}

/// Pixel-wise sum of squared channel differences between two equally-sized
/// bitmaps. The adapter guarantees equal sizes by scaling every image first.
pub fn bitmap_ssd(a: &Bitmap, b: &Bitmap) -> u64 {
    debug_assert_eq!((a.width, a.height), (b.width, b.height));
    a.pixels
        .iter()
        .zip(&b.pixels)
        .map(|(p, q)| {
            p.iter()
                .zip(q)
                .map(|(&x, &y)| {
                    let d = i64::from(x) - i64::from(y);
                    (d * d) as u64
                })
                .sum::<u64>()
        })
        .sum()
}

/// Boundary to the project/label storage collaborator that holds training
/// images. Implementations own the directory layout and decoding; the
/// classifier only iterates labels and their example bitmaps.
pub trait TrainingStore {
    fn labels_for_project(&self, project: &str) -> Result<Vec<String>>;
    fn examples_for_label(&self, project: &str, label: &str) -> Result<Vec<Bitmap>>;
}

/// Receives each classification result; delivery is synchronous and
/// fire-and-forget, on the caller's thread.
pub trait ClassificationListener {
    fn on_classified(&self, label: &str);
}

type BitmapDistance = fn(&Bitmap, &Bitmap) -> u64;

/// KNN instantiated for image crops: observations are bitmaps scaled to a
/// fixed size, the distance is [`bitmap_ssd`], and labels are class names.
///
/// Training examples are loaded once from the [`TrainingStore`] at
/// construction; the store is not consulted afterwards.
pub struct BitmapKnnClassifier {
    knn: Knn<Bitmap, String, u64, BitmapDistance>,
    scale_width: usize,
    scale_height: usize,
    listeners: Vec<Box<dyn ClassificationListener>>,
}

impl BitmapKnnClassifier {
    /// Loads every labeled example of `project` from `store`, scaling each
    /// to `scale_width` × `scale_height`.
    ///
    /// # Panics
    ///
    /// If `k == 0` or either scale dimension is zero.
    pub fn new<S: TrainingStore>(
        k: usize,
        project: &str,
        store: &S,
        scale_width: usize,
        scale_height: usize,
    ) -> Result<Self> {
        assert!(
            scale_width > 0 && scale_height > 0,
            "scale size must be non-zero"
        );
        let mut knn = Knn::new(bitmap_ssd as BitmapDistance, k);
        for label in store.labels_for_project(project)? {
            for image in store.examples_for_label(project, &label)? {
                knn.add_example(image.scaled(scale_width, scale_height), label.clone());
            }
        }
        Ok(Self {
            knn,
            scale_width,
            scale_height,
            listeners: Vec::new(),
        })
    }

    /// Registers a listener for future classification results.
    pub fn add_listener(&mut self, listener: Box<dyn ClassificationListener>) {
        self.listeners.push(listener);
    }

    pub fn num_examples(&self) -> usize {
        self.knn.num_examples()
    }

    /// Scales `image` and classifies it, notifying every registered
    /// listener of the result.
    ///
    /// # Errors
    ///
    /// [`crate::Error::EmptyModel`] when no training examples were loaded.
    pub fn classify(&self, image: &Bitmap) -> Result<String> {
        info!(
            "classifying {}x{} crop against {} examples",
            image.width(),
            image.height(),
            self.knn.num_examples()
        );
        let label = self
            .knn
            .label_for(&image.scaled(self.scale_width, self.scale_height))?;
        info!("classified as {label}");
        for listener in &self.listeners {
            listener.on_classified(&label);
        }
        Ok(label)
    }

    /// Leave-one-out accuracy report over the loaded examples.
    pub fn assess(&self) -> Result<String> {
        Ok(self.knn.assess()?.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[test]
    fn test_pixel_addressing() {
        let bitmap = Bitmap::new(
            2,
            2,
            vec![[1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4]],
        );
        assert_eq!(bitmap.pixel(0, 0), [1, 1, 1]);
        assert_eq!(bitmap.pixel(1, 0), [2, 2, 2]);
        assert_eq!(bitmap.pixel(0, 1), [3, 3, 3]);
        assert_eq!(bitmap.pixel(1, 1), [4, 4, 4]);
    }

    #[test]
    fn test_scaling_dimensions() {
        let bitmap = Bitmap::filled(8, 6, [9, 9, 9]);
        let scaled = bitmap.scaled(4, 3);
        assert_eq!(scaled.width(), 4);
        assert_eq!(scaled.height(), 3);
        assert_eq!(scaled.pixel(3, 2), [9, 9, 9]);
    }

    #[test]
    fn test_downscale_samples_source_pixels() {
        // Left half dark, right half bright.
        let mut pixels = Vec::new();
        for _y in 0..2 {
            pixels.extend([[0, 0, 0], [0, 0, 0], [200, 200, 200], [200, 200, 200]]);
        }
        let bitmap = Bitmap::new(4, 2, pixels);
        let scaled = bitmap.scaled(2, 1);
        assert_eq!(scaled.pixel(0, 0), [0, 0, 0]);
        assert_eq!(scaled.pixel(1, 0), [200, 200, 200]);
    }

    #[test]
    fn test_ssd() {
        let a = Bitmap::filled(2, 2, [10, 10, 10]);
        let b = Bitmap::filled(2, 2, [10, 10, 13]);
        assert_eq!(bitmap_ssd(&a, &a), 0);
        // 4 pixels, one channel off by 3 each
        assert_eq!(bitmap_ssd(&a, &b), 4 * 9);
    }

    struct MemoryStore {
        examples: HashMap<&'static str, Vec<Bitmap>>,
    }

    impl TrainingStore for MemoryStore {
        fn labels_for_project(&self, _project: &str) -> Result<Vec<String>> {
            let mut labels: Vec<String> = self.examples.keys().map(|l| l.to_string()).collect();
            labels.sort();
            Ok(labels)
        }

        fn examples_for_label(&self, _project: &str, label: &str) -> Result<Vec<Bitmap>> {
            Ok(self.examples.get(label).cloned().unwrap_or_default())
        }
    }

    fn store() -> MemoryStore {
        let mut examples = HashMap::new();
        examples.insert(
            "night",
            vec![
                Bitmap::filled(10, 10, [10, 10, 10]),
                Bitmap::filled(12, 8, [20, 20, 20]),
                Bitmap::filled(6, 6, [30, 30, 30]),
            ],
        );
        examples.insert(
            "sky",
            vec![
                Bitmap::filled(10, 10, [200, 200, 230]),
                Bitmap::filled(8, 8, [210, 210, 240]),
                Bitmap::filled(14, 10, [220, 220, 250]),
            ],
        );
        MemoryStore { examples }
    }

    #[test]
    fn test_loads_and_classifies() {
        let classifier = BitmapKnnClassifier::new(3, "test", &store(), 4, 4).unwrap();
        assert_eq!(classifier.num_examples(), 6);

        let dark = Bitmap::filled(20, 16, [15, 15, 15]);
        assert_eq!(classifier.classify(&dark).unwrap(), "night");

        let bright = Bitmap::filled(5, 5, [205, 205, 235]);
        assert_eq!(classifier.classify(&bright).unwrap(), "sky");
    }

    #[test]
    fn test_assess_separable_images() {
        let classifier = BitmapKnnClassifier::new(3, "test", &store(), 4, 4).unwrap();
        let report = classifier.assess().unwrap();
        assert!(report.contains("Overall accuracy: 100.0% (6/6)"));
    }

    struct Recorder {
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl ClassificationListener for Recorder {
        fn on_classified(&self, label: &str) {
            self.seen.borrow_mut().push(label.to_string());
        }
    }

    #[test]
    fn test_listeners_notified() {
        let mut classifier = BitmapKnnClassifier::new(3, "test", &store(), 4, 4).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        classifier.add_listener(Box::new(Recorder { seen: seen.clone() }));
        classifier.add_listener(Box::new(Recorder { seen: seen.clone() }));

        classifier
            .classify(&Bitmap::filled(4, 4, [8, 8, 8]))
            .unwrap();
        assert_eq!(*seen.borrow(), vec!["night".to_string(), "night".to_string()]);
    }

    #[test]
    fn test_empty_store_classify_fails() {
        let empty = MemoryStore {
            examples: HashMap::new(),
        };
        let classifier = BitmapKnnClassifier::new(3, "test", &empty, 4, 4).unwrap();
        assert_eq!(classifier.num_examples(), 0);
        assert!(classifier
            .classify(&Bitmap::filled(4, 4, [0, 0, 0]))
            .is_err());
    }
}
