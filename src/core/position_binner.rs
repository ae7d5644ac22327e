use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::core::extents::round_half_up;
use crate::core::types::Trace;

/// Sorted distinct values and the smallest gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct DistinctValues {
    pub values: Vec<f64>,
    pub min_diff: f64,
}

/// Sorts `values` and drops entries closer than `span / (n - 1) / 10000` to
/// their predecessor.
///
/// Non-finite entries are ignored. The gap defaults to the full span, or `1`
/// when fewer than two distinct values remain.
#[must_use]
pub fn distinct_values(values: &[f64]) -> DistinctValues {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return DistinctValues {
            values: Vec::new(),
            min_diff: 1.0,
        };
    };

    let full_span = last - first;
    let mut min_diff = if full_span != 0.0 { full_span } else { 1.0 };
    let last_index = (sorted.len() - 1).max(1) as f64;
    let err_diff = min_diff / last_index / 10_000.0;

    let mut distinct = vec![first];
    let mut previous = first;
    for &value in &sorted[1..] {
        let diff = value - previous;
        if diff > err_diff {
            min_diff = min_diff.min(diff);
            distinct.push(value);
            previous = value;
        }
    }

    DistinctValues {
        values: distinct,
        min_diff,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinnerOptions {
    /// Negative values accumulate on their own lane.
    pub separate_negative_values: bool,
    /// Key bins by exact position instead of `round(position / bin_width)`.
    pub dont_merge_overlapping_data: bool,
    /// The position axis is categorical, which pins the slot unit to `1`.
    pub categorical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Exact(OrderedFloat<f64>),
    Quantized(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BinKey {
    negative: bool,
    slot: Slot,
}

/// Running totals keyed by position (and sign lane).
#[derive(Debug, Clone)]
pub struct PositionBinner {
    positions: Vec<f64>,
    distinct_positions: Vec<f64>,
    min_diff: f64,
    bin_width: f64,
    options: BinnerOptions,
    bins: HashMap<BinKey, f64>,
}

impl PositionBinner {
    /// Scans the positions of `traces`.
    ///
    /// A trace-level width hint (histogram bin width) caps the slot unit, and
    /// replaces it when all bars share one position.
    #[must_use]
    pub fn new(traces: &[&mut Trace], options: BinnerOptions) -> Self {
        let mut width_hint = f64::INFINITY;
        let mut positions = Vec::new();
        for trace in traces {
            positions.extend(
                trace
                    .bars
                    .iter()
                    .filter(|bar| bar.has_position())
                    .map(|bar| bar.p),
            );
            if let Some(hint) = trace.width_hint.filter(|hint| hint.is_finite() && *hint > 0.0) {
                width_hint = width_hint.min(hint);
            }
        }

        let distinct = distinct_values(&positions);
        let mut min_diff = if distinct.values.len() == 1 && width_hint.is_finite() {
            width_hint
        } else {
            distinct.min_diff.min(width_hint)
        };
        if options.categorical {
            min_diff = 1.0;
        }

        Self {
            positions,
            distinct_positions: distinct.values,
            min_diff,
            bin_width: min_diff,
            options,
            bins: HashMap::new(),
        }
    }

    /// Every valid position, duplicates included.
    #[must_use]
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    #[must_use]
    pub fn distinct_positions(&self) -> &[f64] {
        &self.distinct_positions
    }

    #[must_use]
    pub fn min_diff(&self) -> f64 {
        self.min_diff
    }

    #[must_use]
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn set_bin_width(&mut self, bin_width: f64) {
        self.bin_width = bin_width;
    }

    /// Adds `value` to the bin at `position` and returns the bin's prior total.
    pub fn put(&mut self, position: f64, value: f64) -> f64 {
        let key = self.key(position, value);
        let total = self.bins.entry(key).or_insert(0.0);
        let previous = *total;
        *total += value;
        previous
    }

    /// Current total of the bin `value` would land in.
    #[must_use]
    pub fn get(&self, position: f64, value: f64) -> f64 {
        self.bins
            .get(&self.key(position, value))
            .copied()
            .unwrap_or(0.0)
    }

    fn key(&self, position: f64, value: f64) -> BinKey {
        let negative = self.options.separate_negative_values && value < 0.0;
        let quantized = position / self.bin_width;
        let slot = if self.options.dont_merge_overlapping_data || !quantized.is_finite() {
            Slot::Exact(OrderedFloat(position))
        } else {
            Slot::Quantized(round_half_up(quantized) as i64)
        };
        BinKey { negative, slot }
    }
}
