use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::axis::{Axis, AxisKind};
use crate::core::types::Trace;

/// Fraction of the data span added to padded sides during autorange.
pub const STANDARD_PADDING_FRACTION: f64 = 0.05;

/// Resolution of the hover position key across the laid-out position span.
const HOVER_KEY_RESOLUTION: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtentsOptions {
    pub tozero: bool,
    pub padded: bool,
}

/// Autorange contribution of one trace on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub min: f64,
    pub max: f64,
    /// The range must include zero.
    pub tozero: bool,
    /// The range gets extra room beyond the data.
    pub padded: bool,
}

impl Extents {
    /// Collects min/max over `values`, skipping entries the axis cannot linearize.
    ///
    /// Zero inclusion only applies to linear axes. Returns `None` when no value
    /// is usable.
    #[must_use]
    pub fn find(axis: &dyn Axis, values: &[f64], options: ExtentsOptions) -> Option<Self> {
        let (min, max) = values
            .iter()
            .copied()
            .filter(|value| value.is_finite() && axis.c2l(*value).is_finite())
            .fold(None, |acc: Option<(f64, f64)>, value| match acc {
                Some((min, max)) => Some((min.min(value), max.max(value))),
                None => Some((value, value)),
            })?;

        Some(Self {
            min,
            max,
            tozero: options.tozero && axis.kind() == AxisKind::Linear,
            padded: options.padded,
        })
    }

    /// Merges several contributions and returns the axis range.
    ///
    /// Padded sides grow by `padding_fraction` of the span, except a side
    /// pinned at zero by `tozero`.
    #[must_use]
    pub fn autorange(extents: &[Self], padding_fraction: f64) -> Option<(f64, f64)> {
        let first = extents.first()?;
        let mut min = first.min;
        let mut max = first.max;
        let mut tozero = false;
        for extent in extents {
            min = min.min(extent.min);
            max = max.max(extent.max);
            tozero |= extent.tozero;
        }
        let pad_min = extents.iter().any(|e| e.padded && e.min == min);
        let pad_max = extents.iter().any(|e| e.padded && e.max == max);

        if tozero {
            min = min.min(0.0);
            max = max.max(0.0);
        }

        let span = if max > min {
            max - min
        } else {
            min.abs().max(1.0)
        };
        let pad = span * padding_fraction.max(0.0);
        let low = if pad_min && !(tozero && min == 0.0) {
            min - pad
        } else {
            min
        };
        let high = if pad_max && !(tozero && max == 0.0) {
            max + pad
        } else {
            max
        };
        if low == high {
            return Some((low - 0.5 * span, high + 0.5 * span));
        }
        Some((low, high))
    }
}

/// Union of bar edges drawn at one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSpan {
    pub start: f64,
    pub end: f64,
}

impl PositionSpan {
    #[must_use]
    pub fn width(self) -> f64 {
        self.end - self.start
    }

    fn union(self, start: f64, end: f64) -> Self {
        Self {
            start: self.start.min(start),
            end: self.end.max(end),
        }
    }
}

/// Position-indexed footprint table used by hover.
///
/// Positions are keyed by `round(10000 * (p - pMin) / (pMax - pMin))`, so
/// values that drifted apart by floating-point noise share one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverSpanTable {
    p_min: f64,
    round_factor: f64,
    spans: IndexMap<i64, PositionSpan>,
}

impl HoverSpanTable {
    fn for_position_range(p_min: f64, p_max: f64) -> Self {
        let span = p_max - p_min;
        let round_factor = if span.is_finite() && span > 0.0 {
            HOVER_KEY_RESOLUTION / span
        } else {
            0.0
        };
        Self {
            p_min: if p_min.is_finite() { p_min } else { 0.0 },
            round_factor,
            spans: IndexMap::new(),
        }
    }

    /// Rounded key of a position; `None` for missing positions.
    #[must_use]
    pub fn key(&self, p: f64) -> Option<i64> {
        if !p.is_finite() {
            return None;
        }
        Some(round_half_up(self.round_factor * (p - self.p_min)) as i64)
    }

    /// Full footprint of all bars drawn at `p`.
    #[must_use]
    pub fn span_at(&self, p: f64) -> Option<PositionSpan> {
        self.key(p).and_then(|key| self.spans.get(&key).copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, PositionSpan)> + '_ {
        self.spans.iter().map(|(key, span)| (*key, *span))
    }

    fn expand(&mut self, key: i64, start: f64, end: f64) {
        self.spans
            .entry(key)
            .and_modify(|span| *span = span.union(start, end))
            .or_insert(PositionSpan { start, end });
    }
}

/// Builds the hover table and stamps `p0/p1/s0/s1` on every bar.
///
/// Runs once per orientation group, after bases and tops are final.
pub fn collect_extents(traces: &mut [&mut Trace]) -> HoverSpanTable {
    let (p_min, p_max) = traces
        .iter()
        .flat_map(|trace| trace.bars.iter())
        .filter(|bar| bar.has_position())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), bar| {
            (min.min(bar.p), max.max(bar.p))
        });

    let mut table = HoverSpanTable::for_position_range(p_min, p_max);

    for trace in traces.iter_mut() {
        let trace = &mut **trace;
        for (index, bar) in trace.bars.iter_mut().enumerate() {
            let start = bar.center - bar.w / 2.0;
            if start.is_finite() {
                let end = bar.center + bar.w / 2.0;
                if let Some(key) = table.key(bar.p) {
                    table.expand(key, start, end);
                }
            }

            bar.p0 = bar.p + trace.meta.poffset.resolve(index);
            bar.p1 = bar.p0 + bar.w;
            bar.s0 = bar.b;
            bar.s1 = bar.s0 + bar.s;
        }
    }

    table
}

/// `Math.round` semantics: halves round toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
