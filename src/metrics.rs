use num_traits::{Float, FromPrimitive, ToPrimitive};

/// Squared difference between two scalar observations, in `f64`.
///
/// The 1-D analogue of a squared Euclidean metric; squaring keeps the sqrt
/// out of nearest-neighbor comparisons without changing their order.
pub fn squared_distance<T: Copy + ToPrimitive>(a: &T, b: &T) -> f64 {
    let a = a.to_f64().unwrap();
    let b = b.to_f64().unwrap();
    (a - b) * (a - b)
}

/// Truncating arithmetic mean of a non-empty slice of integers.
///
/// # Panics
///
/// If `values` is empty.
pub fn integer_mean<T: Copy + ToPrimitive + FromPrimitive>(values: &[T]) -> T {
    assert!(!values.is_empty(), "mean of an empty slice");
    let sum: i64 = values.iter().map(|v| v.to_i64().unwrap()).sum();
    T::from_i64(sum / values.len() as i64).unwrap()
}

/// Arithmetic mean of a non-empty slice of floats.
///
/// # Panics
///
/// If `values` is empty.
pub fn float_mean<T: Float>(values: &[T]) -> T {
    assert!(!values.is_empty(), "mean of an empty slice");
    let mut sum = T::zero();
    for v in values {
        sum = sum + *v;
    }
    sum / T::from(values.len()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_squared_distance() {
        assert_abs_diff_eq!(squared_distance(&3, &7), 16.0);
        assert_abs_diff_eq!(squared_distance(&7, &3), 16.0);
        assert_abs_diff_eq!(squared_distance(&5, &5), 0.0);
    }

    #[test]
    fn test_integer_mean_truncates() {
        assert_eq!(integer_mean(&[1, 2, 3]), 2);
        assert_eq!(integer_mean(&[1, 2]), 1);
        assert_eq!(integer_mean(&[9]), 9);
    }

    #[test]
    fn test_float_mean() {
        assert_abs_diff_eq!(float_mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_abs_diff_eq!(float_mean(&[4.5]), 4.5);
    }
}
