use tracing::trace;

use crate::core::axis::Axis;
use crate::core::extents::{Extents, ExtentsOptions};
use crate::core::position_binner::PositionBinner;
use crate::core::types::{BarMode, Trace};

/// Rescales every bar so the totals at each position equal `target`.
///
/// The binner must already hold the per-position totals (from
/// [`crate::core::stacker::stack_bars`] or
/// [`crate::core::stacker::sieve_bars`]). Bars at a position whose total is
/// zero collapse to base `0` and size `0`.
pub fn normalize_bars(
    size_axis: &dyn Axis,
    traces: &mut [&mut Trace],
    binner: &PositionBinner,
    mode: BarMode,
    target: f64,
) {
    let tiny = target / 1e9;
    let s_min = size_axis.l2c(size_axis.c2l(0.0));
    let s_max = if mode == BarMode::Stack { target } else { s_min };
    let needs_padding = |value: f64| {
        size_axis.c2l(value).is_finite()
            && (value < s_min - tiny || value > s_max + tiny || !s_min.is_finite())
    };

    for trace in traces.iter_mut() {
        let mut values = Vec::with_capacity(trace.bars.len() * 2);
        let mut tozero = false;
        let mut padded = false;
        let mut collapsed = 0usize;

        for bar in &mut trace.bars {
            if !bar.has_size() {
                continue;
            }

            let scale = (target / binner.get(bar.p, bar.s)).abs();
            if scale.is_finite() {
                bar.b *= scale;
                bar.s *= scale;
            } else {
                bar.b = 0.0;
                bar.s = 0.0;
                collapsed += 1;
            }

            let base = bar.b;
            let top = base + bar.s;
            bar.top = top;
            values.push(top);
            padded = padded || needs_padding(top);

            if bar.has_b {
                values.push(base);
                padded = padded || needs_padding(base);
            }
            if !bar.has_b || bar.b == 0.0 {
                tozero = true;
            }
        }

        if collapsed > 0 {
            trace!(
                trace = %trace.name,
                collapsed,
                "zero total at position, normalized bars collapsed"
            );
        }

        trace.extremes.size = Extents::find(size_axis, &values, ExtentsOptions { tozero, padded });
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_bars;
    use crate::core::axis::CartesianAxis;
    use crate::core::position_binner::{BinnerOptions, PositionBinner};
    use crate::core::stacker::sieve_bars;
    use crate::core::types::{BarMode, Trace};

    #[test]
    fn zero_total_collapses_bar() {
        let axis = CartesianAxis::linear("y");
        let mut up = Trace::vertical(&[0.0], &[5.0]);
        let mut down = Trace::vertical(&[0.0], &[-5.0]);
        let mut traces = [&mut up, &mut down];
        let mut binner = PositionBinner::new(&traces, BinnerOptions::default());

        sieve_bars(&traces, &mut binner);
        normalize_bars(&axis, &mut traces, &binner, BarMode::Group, 100.0);

        assert_eq!(up.bars[0].s, 0.0);
        assert_eq!(up.bars[0].top, 0.0);
        assert_eq!(down.bars[0].s, 0.0);
    }
}
