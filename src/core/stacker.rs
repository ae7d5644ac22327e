use tracing::trace;

use crate::core::attr::{Datum, PerPoint};
use crate::core::axis::Axis;
use crate::core::extents::{Extents, ExtentsOptions};
use crate::core::position_binner::{BinnerOptions, PositionBinner};
use crate::core::types::{BarNorm, Trace};

/// Relative tolerance used to decide whether a bar ends its stack.
const OUTMOST_TOLERANCE: f64 = 1e-9;

/// Resolves each trace's `base` through the size axis.
///
/// Categorical size axes never produce a base. Entries that do not convert
/// leave the bar at `0` without `has_b`.
pub fn init_base(size_axis: &dyn Axis, traces: &mut [&mut Trace]) {
    let categorical = size_axis.is_categorical();

    for trace in traces.iter_mut() {
        let trace = &mut **trace;
        let calendar = trace.size_calendar.as_deref();
        let convert = |datum: &Datum| -> Option<f64> {
            if categorical {
                None
            } else {
                size_axis.d2c(datum, calendar)
            }
        };

        match &trace.base {
            Some(PerPoint::Array(bases)) => {
                for (index, bar) in trace.bars.iter_mut().enumerate() {
                    match bases.get(index).and_then(&convert) {
                        Some(base) => {
                            bar.b = base;
                            bar.has_b = true;
                        }
                        None => {
                            bar.b = 0.0;
                            bar.has_b = false;
                        }
                    }
                }
            }
            Some(PerPoint::Scalar(datum)) => {
                let base = convert(datum);
                for bar in &mut trace.bars {
                    bar.b = base.unwrap_or(0.0);
                    bar.has_b = base.is_some();
                }
            }
            None => {
                for bar in &mut trace.bars {
                    bar.b = 0.0;
                    bar.has_b = false;
                }
            }
        }
    }
}

/// Sets `top = b + s` without cross-trace accumulation.
///
/// Size extents include zero unless every bar sits on a nonzero explicit base.
pub fn set_base_and_top(size_axis: &dyn Axis, traces: &mut [&mut Trace]) {
    for trace in traces.iter_mut() {
        let mut values = Vec::with_capacity(trace.bars.len() * 2);
        let mut tozero = false;

        for bar in &mut trace.bars {
            bar.top = bar.b + bar.s;
            values.push(bar.top);
            if bar.has_b {
                values.push(bar.b);
            }
            if !bar.has_b || bar.b == 0.0 {
                tozero = true;
            }
        }

        trace.extremes.size = Extents::find(
            size_axis,
            &values,
            ExtentsOptions {
                tozero,
                padded: true,
            },
        );
    }
}

/// Stacks bars across traces in declaration order.
///
/// Each bar starts where the previous total at its position (and sign lane)
/// ended. When `norm` is enabled the size extents are left to the normalizer.
pub fn stack_bars(
    size_axis: &dyn Axis,
    traces: &mut [&mut Trace],
    binner: &mut PositionBinner,
    norm: BarNorm,
) {
    for trace in traces.iter_mut() {
        let mut values = Vec::with_capacity(trace.bars.len() * 2);

        for bar in &mut trace.bars {
            if !bar.has_size() {
                continue;
            }
            let value = bar.s + bar.b;
            let base = binner.put(bar.p, value);
            let top = base + value;

            bar.b = base;
            bar.top = top;

            if !norm.is_enabled() {
                values.push(top);
                if bar.has_b {
                    values.push(base);
                }
            }
        }

        if !norm.is_enabled() {
            // explicit bases are never stacked, so zero is always in range
            trace.extremes.size = Extents::find(
                size_axis,
                &values,
                ExtentsOptions {
                    tozero: true,
                    padded: true,
                },
            );
        }
    }
}

/// Flags the bar that ends the stack at its position.
///
/// Must run after [`stack_bars`] and before normalization rescales the bars.
pub fn mark_outmost(traces: &mut [&mut Trace], binner: &PositionBinner) {
    for trace in traces.iter_mut() {
        for bar in &mut trace.bars {
            if !bar.has_size() {
                continue;
            }
            let total = binner.get(bar.p, bar.s);
            let tolerance = OUTMOST_TOLERANCE * total.abs().max(1.0);
            if (bar.top - total).abs() <= tolerance {
                bar.outmost = true;
            }
        }
    }
}

/// Accumulates per-position totals without touching bases or tops.
pub fn sieve_bars(traces: &[&mut Trace], binner: &mut PositionBinner) {
    for trace in traces.iter() {
        for bar in trace.bars.iter().filter(|bar| bar.has_size()) {
            binner.put(bar.p, bar.b + bar.s);
        }
    }
}

/// Lifts bars of one trace that share a position so none hides another.
///
/// Each trace without an explicit base gets a private sign-separated binner.
pub fn unhide_bars_within_trace(traces: &mut [&mut Trace], categorical: bool) {
    for trace in traces.iter_mut() {
        if trace.base.is_some() {
            continue;
        }

        let mut in_trace = PositionBinner::new(
            std::slice::from_ref(trace),
            BinnerOptions {
                separate_negative_values: true,
                dont_merge_overlapping_data: true,
                categorical,
            },
        );

        let mut lifted = 0usize;
        for bar in trace.bars.iter_mut().filter(|bar| bar.has_position()) {
            let base = in_trace.put(bar.p, bar.b + bar.s);
            if base != 0.0 && base.is_finite() {
                bar.b = base;
                lifted += 1;
            }
        }
        if lifted > 0 {
            trace!(trace = %trace.name, lifted, "lifted overlapping bars within trace");
        }
    }
}
