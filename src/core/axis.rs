use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::attr::Datum;

/// Coordinate system of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    #[default]
    Linear,
    Log,
    /// Milliseconds since the Unix epoch.
    Date,
    Category,
    MultiCategory,
}

impl AxisKind {
    #[must_use]
    pub fn is_categorical(self) -> bool {
        matches!(self, Self::Category | Self::MultiCategory)
    }
}

/// Axis collaborator consumed by the layout pass.
///
/// `d2c` turns user data into calc coordinates, `c2l`/`l2c` convert between
/// calc and linearized coordinates (only log axes differ), and `min_dtick`
/// records the finest tick step the bars can tolerate.
pub trait Axis {
    fn id(&self) -> &str;

    fn kind(&self) -> AxisKind;

    /// Converts a datum to a calc coordinate. `None` means "not representable".
    fn d2c(&self, datum: &Datum, calendar: Option<&str>) -> Option<f64>;

    fn c2l(&self, value: f64) -> f64;

    fn l2c(&self, value: f64) -> f64;

    /// Requests ticks no finer than `new_diff`, anchored at `new_first`.
    ///
    /// `allow = false` cancels any forced step.
    fn min_dtick(&mut self, new_diff: f64, new_first: f64, allow: bool);

    fn is_categorical(&self) -> bool {
        self.kind().is_categorical()
    }
}

/// Concrete cartesian axis with linear, log, date and category support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianAxis {
    id: String,
    kind: AxisKind,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(skip)]
    min_dtick: Option<f64>,
    #[serde(skip)]
    force_tick0: Option<f64>,
}

impl CartesianAxis {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: AxisKind) -> Self {
        Self {
            id: id.into(),
            kind,
            categories: Vec::new(),
            min_dtick: None,
            force_tick0: None,
        }
    }

    #[must_use]
    pub fn linear(id: impl Into<String>) -> Self {
        Self::new(id, AxisKind::Linear)
    }

    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Forced minimum tick step; `Some(0.0)` means a previous request was cancelled.
    #[must_use]
    pub fn forced_min_dtick(&self) -> Option<f64> {
        self.min_dtick
    }

    #[must_use]
    pub fn forced_tick0(&self) -> Option<f64> {
        self.force_tick0
    }

    /// Clears tick constraints left over from a previous redraw.
    pub fn reset_tick_constraints(&mut self) {
        self.min_dtick = None;
        self.force_tick0 = None;
    }
}

impl Axis for CartesianAxis {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> AxisKind {
        self.kind
    }

    fn d2c(&self, datum: &Datum, calendar: Option<&str>) -> Option<f64> {
        match self.kind {
            AxisKind::Linear | AxisKind::Log => datum.as_number(),
            AxisKind::Date => date_to_millis(datum, calendar),
            AxisKind::Category | AxisKind::MultiCategory => match datum {
                Datum::Text(text) => self
                    .categories
                    .iter()
                    .position(|category| category == text)
                    .map(|index| index as f64),
                _ => datum.as_number(),
            },
        }
    }

    fn c2l(&self, value: f64) -> f64 {
        match self.kind {
            AxisKind::Log if value > 0.0 => value.log10(),
            AxisKind::Log => f64::NAN,
            _ => value,
        }
    }

    fn l2c(&self, value: f64) -> f64 {
        match self.kind {
            AxisKind::Log => 10f64.powf(value),
            _ => value,
        }
    }

    fn min_dtick(&mut self, new_diff: f64, new_first: f64, allow: bool) {
        if matches!(
            self.kind,
            AxisKind::Log | AxisKind::Category | AxisKind::MultiCategory
        ) || !allow
        {
            self.min_dtick = Some(0.0);
            return;
        }

        let (Some(current), Some(tick0)) = (self.min_dtick, self.force_tick0) else {
            if self.min_dtick.is_none() {
                self.min_dtick = Some(new_diff);
                self.force_tick0 = Some(new_first);
            }
            return;
        };
        if current == 0.0 {
            return;
        }

        let current_is_multiple = (current / new_diff + 1e-6) % 1.0 < 2e-6;
        let first_aligns_new = (((new_first - tick0) / new_diff % 1.0) + 1.000_001) % 1.0 < 2e-6;
        if current_is_multiple && first_aligns_new {
            self.min_dtick = Some(new_diff);
            self.force_tick0 = Some(new_first);
            return;
        }

        let new_is_multiple = (new_diff / current + 1e-6) % 1.0 <= 2e-6;
        let first_aligns_current =
            (((new_first - tick0) / current % 1.0) + 1.000_001) % 1.0 <= 2e-6;
        if !new_is_multiple || !first_aligns_current {
            self.min_dtick = Some(0.0);
        }
    }
}

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn date_to_millis(datum: &Datum, calendar: Option<&str>) -> Option<f64> {
    let unsupported = calendar
        .filter(|calendar| !calendar.is_empty() && !calendar.eq_ignore_ascii_case("gregorian"));
    if let Some(calendar) = unsupported {
        warn!(calendar, "unsupported calendar, interpreting dates as gregorian");
    }

    let text = match datum {
        Datum::Number(value) if value.is_finite() => return Some(*value),
        Datum::Text(text) => text.trim(),
        _ => return None,
    };
    let normalized = text.replacen('T', " ", 1);

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(parsed.and_utc().timestamp_millis() as f64);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc().timestamp_millis() as f64);
    }
    datum.as_number()
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisKind, CartesianAxis};
    use crate::core::attr::Datum;

    #[test]
    fn date_axis_parses_iso_dates_and_datetimes() {
        let axis = CartesianAxis::new("y", AxisKind::Date);
        assert_eq!(axis.d2c(&Datum::from("1970-01-02"), None), Some(86_400_000.0));
        assert_eq!(
            axis.d2c(&Datum::from("1970-01-01T00:00:01"), Some("gregorian")),
            Some(1_000.0)
        );
        assert_eq!(axis.d2c(&Datum::from("not a date"), None), None);
    }

    #[test]
    fn log_axis_linearizes_positive_values_only() {
        let axis = CartesianAxis::new("y", AxisKind::Log);
        assert!((axis.c2l(100.0) - 2.0).abs() <= 1e-12);
        assert!(axis.c2l(0.0).is_nan());
        assert!((axis.l2c(2.0) - 100.0).abs() <= 1e-9);
    }

    #[test]
    fn category_axis_maps_labels_to_indices() {
        let axis = CartesianAxis::new("x", AxisKind::Category)
            .with_categories(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(axis.d2c(&Datum::from("b"), None), Some(1.0));
        assert_eq!(axis.d2c(&Datum::from("c"), None), None);
    }

    #[test]
    fn min_dtick_keeps_finer_compatible_step() {
        let mut axis = CartesianAxis::linear("x");
        axis.min_dtick(2.0, 0.0, true);
        axis.min_dtick(1.0, 1.0, true);
        assert_eq!(axis.forced_min_dtick(), Some(1.0));
        assert_eq!(axis.forced_tick0(), Some(1.0));
    }

    #[test]
    fn min_dtick_cancels_incompatible_steps() {
        let mut axis = CartesianAxis::linear("x");
        axis.min_dtick(1.0, 0.0, true);
        axis.min_dtick(0.7, 0.0, true);
        assert_eq!(axis.forced_min_dtick(), Some(0.0));
    }

    #[test]
    fn min_dtick_is_cancelled_when_not_allowed() {
        let mut axis = CartesianAxis::linear("x");
        axis.min_dtick(1.0, 0.0, false);
        assert_eq!(axis.forced_min_dtick(), Some(0.0));
    }
}
