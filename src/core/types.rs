use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::attr::{Datum, PerPoint};
use crate::core::extents::Extents;

/// How traces sharing a position axis are composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Stack,
    #[default]
    Group,
    Overlay,
    /// Stacks non-negative and negative magnitudes on independent lanes.
    Relative,
}

/// Normalization of bar sizes against the per-position total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BarNorm {
    #[default]
    None,
    Fraction,
    Percent,
}

impl BarNorm {
    /// Target total at every position, if normalization is enabled.
    #[must_use]
    pub fn target(self) -> Option<f64> {
        match self {
            Self::None => None,
            Self::Fraction => Some(1.0),
            Self::Percent => Some(100.0),
        }
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        self != Self::None
    }
}

/// Which axis carries the bar positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Orientation {
    /// Positions on x, sizes on y.
    #[default]
    Vertical,
    /// Positions on y, sizes on x.
    Horizontal,
}

/// One bar per data point.
///
/// `p` and `s` come from the upstream calc stage; non-finite values mark the
/// point as missing. Every other field is written by the layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(with = "missing_as_null")]
    pub p: f64,
    #[serde(with = "missing_as_null")]
    pub s: f64,
    #[serde(default)]
    pub b: f64,
    #[serde(default)]
    pub has_b: bool,
    /// Center on the position axis.
    #[serde(default)]
    pub center: f64,
    /// End of the bar on the size axis.
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub p0: f64,
    #[serde(default)]
    pub p1: f64,
    #[serde(default)]
    pub s0: f64,
    #[serde(default)]
    pub s1: f64,
    #[serde(default)]
    pub outmost: bool,
}

impl Bar {
    #[must_use]
    pub fn new(p: f64, s: f64) -> Self {
        Self {
            p,
            s,
            b: 0.0,
            has_b: false,
            center: p,
            top: s,
            w: 0.0,
            p0: p,
            p1: p,
            s0: 0.0,
            s1: s,
            outmost: false,
        }
    }

    /// A bar whose magnitude is missing upstream.
    #[must_use]
    pub fn missing(p: f64) -> Self {
        Self::new(p, f64::NAN)
    }

    #[must_use]
    pub fn has_position(&self) -> bool {
        self.p.is_finite()
    }

    #[must_use]
    pub fn has_size(&self) -> bool {
        self.s.is_finite()
    }
}

/// Geometry shared by all bars of a trace, computed by the layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceMeta {
    pub barwidth: PerPoint<f64>,
    pub poffset: PerPoint<f64>,
    pub bargroupwidth: f64,
    /// Slot unit of the position axis (`minDiff`).
    pub bardelta: f64,
}

impl Default for TraceMeta {
    fn default() -> Self {
        Self {
            barwidth: PerPoint::Scalar(0.0),
            poffset: PerPoint::Scalar(0.0),
            bargroupwidth: 0.0,
            bardelta: 1.0,
        }
    }
}

/// Autorange contributions of one trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceExtremes {
    pub position: Option<Extents>,
    pub size: Option<Extents>,
}

/// An ordered series of bars plus its user overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_xaxis")]
    pub xaxis: String,
    #[serde(default = "default_yaxis")]
    pub yaxis: String,
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub base: Option<PerPoint<Datum>>,
    #[serde(default)]
    pub offset: Option<PerPoint<Datum>>,
    #[serde(default)]
    pub width: Option<PerPoint<Datum>>,
    /// Calendar used to interpret `base` on the size axis.
    #[serde(default)]
    pub size_calendar: Option<String>,
    /// Upstream bin width (histograms); caps the slot unit.
    #[serde(default)]
    pub width_hint: Option<f64>,
    #[serde(skip)]
    pub meta: TraceMeta,
    #[serde(skip)]
    pub extremes: TraceExtremes,
}

fn default_visible() -> bool {
    true
}

fn default_xaxis() -> String {
    "x".to_owned()
}

fn default_yaxis() -> String {
    "y".to_owned()
}

impl Trace {
    #[must_use]
    pub fn new(orientation: Orientation, bars: Vec<Bar>) -> Self {
        Self {
            name: String::new(),
            orientation,
            visible: true,
            xaxis: default_xaxis(),
            yaxis: default_yaxis(),
            bars,
            base: None,
            offset: None,
            width: None,
            size_calendar: None,
            width_hint: None,
            meta: TraceMeta::default(),
            extremes: TraceExtremes::default(),
        }
    }

    /// Vertical trace from parallel position/size arrays.
    ///
    /// Extra entries in the longer array are ignored.
    #[must_use]
    pub fn vertical(positions: &[f64], sizes: &[f64]) -> Self {
        Self::new(Orientation::Vertical, zip_bars(positions, sizes))
    }

    /// Horizontal trace from parallel position/size arrays.
    #[must_use]
    pub fn horizontal(positions: &[f64], sizes: &[f64]) -> Self {
        Self::new(Orientation::Horizontal, zip_bars(positions, sizes))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_base(mut self, base: impl Into<PerPoint<Datum>>) -> Self {
        self.base = Some(base.into());
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: impl Into<PerPoint<Datum>>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: impl Into<PerPoint<Datum>>) -> Self {
        self.width = Some(width.into());
        self
    }

    #[must_use]
    pub fn with_size_calendar(mut self, calendar: impl Into<String>) -> Self {
        self.size_calendar = Some(calendar.into());
        self
    }

    #[must_use]
    pub fn with_width_hint(mut self, width: f64) -> Self {
        self.width_hint = Some(width);
        self
    }

    #[must_use]
    pub fn with_axes(mut self, xaxis: impl Into<String>, yaxis: impl Into<String>) -> Self {
        self.xaxis = xaxis.into();
        self.yaxis = yaxis.into();
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Id of the axis bars are placed along.
    #[must_use]
    pub fn position_axis_id(&self) -> &str {
        match self.orientation {
            Orientation::Vertical => &self.xaxis,
            Orientation::Horizontal => &self.yaxis,
        }
    }

    /// Id of the axis carrying bar magnitudes.
    #[must_use]
    pub fn size_axis_id(&self) -> &str {
        match self.orientation {
            Orientation::Vertical => &self.yaxis,
            Orientation::Horizontal => &self.xaxis,
        }
    }
}

fn zip_bars(positions: &[f64], sizes: &[f64]) -> Vec<Bar> {
    positions
        .iter()
        .zip(sizes)
        .map(|(&p, &s)| Bar::new(p, s))
        .collect()
}

mod missing_as_null {
    use super::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
