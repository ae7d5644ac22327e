use crate::core::attr::PerPoint;
use crate::core::axis::Axis;
use crate::core::extents::{Extents, ExtentsOptions};
use crate::core::position_binner::PositionBinner;
use crate::core::types::Trace;

/// Slot layout shared by stacked, relative and overlaid bars.
///
/// Every trace gets the full `minDiff * (1 - gap) * (1 - group_gap)` width,
/// centered on its position.
pub fn set_offset_and_width(
    position_axis: &mut dyn Axis,
    traces: &mut [&mut Trace],
    binner: &mut PositionBinner,
    gap: f64,
    group_gap: f64,
) {
    let min_diff = binner.min_diff();
    let bar_group_width = min_diff * (1.0 - gap);
    let bar_width = bar_group_width * (1.0 - group_gap);
    let offset_from_center = -bar_width / 2.0;

    for trace in traces.iter_mut() {
        trace.meta.barwidth = PerPoint::Scalar(bar_width);
        trace.meta.poffset = PerPoint::Scalar(offset_from_center);
        trace.meta.bargroupwidth = bar_group_width;
        trace.meta.bardelta = min_diff;
    }

    // positions that only differ by rounding share a bin
    binner.set_bin_width(bar_width / 100.0);

    apply_attributes(traces);
    set_bar_center_and_width(traces);
    // every slot is centered on its position, so the tick step always applies
    update_position_axis(position_axis, traces, binner, true);
}

/// Slot layout for grouped bars.
///
/// When no two bars share a position every trace keeps the full slot;
/// otherwise the slot is split evenly and traces are placed side by side in
/// declaration order, symmetric about the position.
pub fn set_offset_and_width_in_group_mode(
    position_axis: &mut dyn Axis,
    traces: &mut [&mut Trace],
    binner: &mut PositionBinner,
    gap: f64,
    group_gap: f64,
) {
    let min_diff = binner.min_diff();
    let trace_count = traces.len() as f64;
    let overlap = binner.positions().len() != binner.distinct_positions().len();
    let bar_group_width = min_diff * (1.0 - gap);
    let bar_width_plus_gap = if overlap {
        bar_group_width / trace_count
    } else {
        bar_group_width
    };
    let bar_width = bar_width_plus_gap * (1.0 - group_gap);

    for (index, trace) in traces.iter_mut().enumerate() {
        let offset_from_center = if overlap {
            ((2.0 * index as f64 + 1.0 - trace_count) * bar_width_plus_gap - bar_width) / 2.0
        } else {
            -bar_width / 2.0
        };

        trace.meta.barwidth = PerPoint::Scalar(bar_width);
        trace.meta.poffset = PerPoint::Scalar(offset_from_center);
        trace.meta.bargroupwidth = bar_group_width;
        trace.meta.bardelta = min_diff;
    }

    binner.set_bin_width(bar_width / 100.0);

    apply_attributes(traces);
    set_bar_center_and_width(traces);
    update_position_axis(position_axis, traces, binner, overlap);
}

/// Applies user `offset`/`width` overrides on top of the computed defaults.
///
/// A width override without an offset override re-centers the bar by half
/// the width change.
pub fn apply_attributes(traces: &mut [&mut Trace]) {
    for trace in traces.iter_mut() {
        let len = trace.bars.len();
        let initial_poffset = trace.meta.poffset.scalar().unwrap_or(0.0);
        let initial_barwidth = trace.meta.barwidth.scalar().unwrap_or(0.0);

        if let Some(offset) = &trace.offset {
            trace.meta.poffset = offset.repair(len, initial_poffset);
        }

        let Some(width) = &trace.width else {
            continue;
        };
        let barwidth = width.repair(len, initial_barwidth);
        if trace.offset.is_none() {
            trace.meta.poffset = match &barwidth {
                PerPoint::Scalar(width) => {
                    PerPoint::Scalar(initial_poffset + (initial_barwidth - width) / 2.0)
                }
                PerPoint::Array(widths) => PerPoint::Array(
                    widths
                        .iter()
                        .map(|width| initial_poffset + (initial_barwidth - width) / 2.0)
                        .collect(),
                ),
            };
        }
        trace.meta.barwidth = barwidth;
    }
}

/// Stores each bar's resolved width and its center `p + offset + width / 2`.
pub fn set_bar_center_and_width(traces: &mut [&mut Trace]) {
    for trace in traces.iter_mut() {
        let trace = &mut **trace;
        for (index, bar) in trace.bars.iter_mut().enumerate() {
            let width = trace.meta.barwidth.resolve(index);
            bar.w = width;
            bar.center = bar.p + trace.meta.poffset.resolve(index) + width / 2.0;
        }
    }
}

/// Records unpadded position extents per trace and the minimum tick step.
///
/// Every bar reserves `p ± minDiff / 2`; traces with explicit width or offset
/// also contribute their actual edges.
pub fn update_position_axis(
    position_axis: &mut dyn Axis,
    traces: &mut [&mut Trace],
    binner: &PositionBinner,
    allow_min_dtick: bool,
) {
    let min_diff = binner.min_diff();
    let half_slot = min_diff / 2.0;
    let first_position = binner
        .distinct_positions()
        .first()
        .copied()
        .unwrap_or(f64::NAN);

    position_axis.min_dtick(min_diff, first_position, allow_min_dtick);

    for trace in traces.iter_mut() {
        let mut edges = Vec::with_capacity(trace.bars.len() * 2);
        for bar in &trace.bars {
            edges.push(bar.p - half_slot);
            edges.push(bar.p + half_slot);
        }

        let explicit = trace.width.as_ref().is_some_and(PerPoint::is_set_nonzero)
            || trace.offset.as_ref().is_some_and(PerPoint::is_set_nonzero);
        if explicit {
            for (index, bar) in trace.bars.iter().enumerate() {
                let left = bar.p + trace.meta.poffset.resolve(index);
                edges.push(left);
                edges.push(left + trace.meta.barwidth.resolve(index));
            }
        }

        trace.extremes.position = Extents::find(
            &*position_axis,
            &edges,
            ExtentsOptions {
                tozero: false,
                padded: false,
            },
        );
    }
}
