use crate::timespec::Timespec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point type that can carry the outcome of an aggregation.
pub trait ResultPoint: Clone + PartialEq + fmt::Debug + Send + Sync {
    /// Column type name, used in error messages.
    const COLUMN: &'static str;

    fn timestamp(&self) -> Timespec;

    /// Placeholder result for an aggregation that matched zero samples.
    ///
    /// A real sample may carry the same fields, so whether a result holds
    /// data is decided by the sample count, never by comparing against this.
    fn no_data() -> Self;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoublePoint {
    pub timestamp: Timespec,
    pub value: f64,
}

// NaN compares equal to NaN so that two no-data results are the same value.
impl PartialEq for DoublePoint {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
            && (self.value == other.value || (self.value.is_nan() && other.value.is_nan()))
    }
}

impl DoublePoint {
    pub fn new(timestamp: Timespec, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl ResultPoint for DoublePoint {
    const COLUMN: &'static str = "double";

    fn timestamp(&self) -> Timespec {
        self.timestamp
    }

    fn no_data() -> Self {
        Self::new(Timespec::ZERO, f64::NAN)
    }
}

impl fmt::Display for DoublePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.timestamp, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobPoint {
    pub timestamp: Timespec,
    pub content: Vec<u8>,
}

impl BlobPoint {
    pub fn new(timestamp: Timespec, content: impl Into<Vec<u8>>) -> Self {
        Self {
            timestamp,
            content: content.into(),
        }
    }
}

impl ResultPoint for BlobPoint {
    const COLUMN: &'static str = "blob";

    fn timestamp(&self) -> Timespec {
        self.timestamp
    }

    fn no_data() -> Self {
        Self::new(Timespec::ZERO, Vec::new())
    }
}

impl fmt::Display for BlobPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {} bytes)", self.timestamp, self.content.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_point_creation() {
        let point = DoublePoint::new(Timespec::from_millis(199), 87.5);
        assert_eq!(point.timestamp(), Timespec::from_millis(199));
        assert_eq!(point.value, 87.5);
    }

    #[test]
    fn test_no_data_placeholders() {
        let double = DoublePoint::no_data();
        assert_eq!(double.timestamp(), Timespec::ZERO);
        assert!(double.value.is_nan());

        let blob = BlobPoint::no_data();
        assert_eq!(blob.timestamp(), Timespec::ZERO);
        assert!(blob.content.is_empty());
    }

    #[test]
    fn test_double_point_equality() {
        let p1 = DoublePoint::new(Timespec::from_millis(1000), 42.5);
        let p2 = DoublePoint::new(Timespec::from_millis(1000), 42.5);
        let p3 = DoublePoint::new(Timespec::from_millis(1001), 42.5);

        assert_eq!(p1, p2);
        assert_ne!(p1, p3);
        assert_eq!(DoublePoint::no_data(), DoublePoint::no_data());
    }

    #[test]
    fn test_point_display() {
        assert_eq!(
            DoublePoint::new(Timespec::from_secs(1), 2.5).to_string(),
            "(1970-01-01T00:00:01Z, 2.5)"
        );
        assert_eq!(
            BlobPoint::new(Timespec::from_secs(1), "abc").to_string(),
            "(1970-01-01T00:00:01Z, 3 bytes)"
        );
    }
}
