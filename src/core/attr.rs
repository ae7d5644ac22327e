use serde::{Deserialize, Serialize};

/// A raw attribute entry as supplied by the host.
///
/// Hosts may hand over numbers, numeric strings, date strings (for bases on
/// date axes) or explicit gaps. Which of these are usable depends on the axis
/// that interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Datum {
    /// Returns the value when the datum is numeric (finite numbers and numeric strings).
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for Datum {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Scalar-or-per-point attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerPoint<T> {
    Array(Vec<T>),
    Scalar(T),
}

impl<T> PerPoint<T> {
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }
}

impl<T: Default> Default for PerPoint<T> {
    fn default() -> Self {
        Self::Scalar(T::default())
    }
}

impl PerPoint<f64> {
    /// Value that applies to the point at `index`.
    ///
    /// Arrays are expected to be repaired to the series length; out-of-range
    /// lookups yield `NaN` so the bar is treated as missing downstream.
    #[must_use]
    pub fn resolve(&self, index: usize) -> f64 {
        match self {
            Self::Scalar(value) => *value,
            Self::Array(values) => values.get(index).copied().unwrap_or(f64::NAN),
        }
    }

    /// The scalar value, or `None` for per-point arrays.
    #[must_use]
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Array(_) => None,
        }
    }
}

impl PerPoint<Datum> {
    /// Resolves a user override against the computed `fallback`.
    ///
    /// Arrays are truncated to `len`, non-numeric entries are replaced by
    /// `fallback`, and short arrays are padded with it.
    #[must_use]
    pub fn repair(&self, len: usize, fallback: f64) -> PerPoint<f64> {
        match self {
            Self::Scalar(datum) => PerPoint::Scalar(datum.as_number().unwrap_or(fallback)),
            Self::Array(data) => {
                let mut values: Vec<f64> = data
                    .iter()
                    .take(len)
                    .map(|datum| datum.as_number().unwrap_or(fallback))
                    .collect();
                values.resize(len, fallback);
                PerPoint::Array(values)
            }
        }
    }

    /// Mirrors attribute truthiness: arrays always count, scalars only when
    /// numeric and nonzero.
    #[must_use]
    pub fn is_set_nonzero(&self) -> bool {
        match self {
            Self::Array(_) => true,
            Self::Scalar(datum) => datum.as_number().is_some_and(|value| value != 0.0),
        }
    }
}

impl From<f64> for PerPoint<Datum> {
    fn from(value: f64) -> Self {
        Self::Scalar(Datum::Number(value))
    }
}

impl From<&str> for PerPoint<Datum> {
    fn from(value: &str) -> Self {
        Self::Scalar(Datum::from(value))
    }
}

impl From<Vec<f64>> for PerPoint<Datum> {
    fn from(values: Vec<f64>) -> Self {
        Self::Array(values.into_iter().map(Datum::Number).collect())
    }
}

impl From<Vec<Option<f64>>> for PerPoint<Datum> {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self::Array(values.into_iter().map(Datum::from).collect())
    }
}

impl From<Vec<Datum>> for PerPoint<Datum> {
    fn from(values: Vec<Datum>) -> Self {
        Self::Array(values)
    }
}
