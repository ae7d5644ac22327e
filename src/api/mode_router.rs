use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{
    Axis, BarMode, BinnerOptions, HoverSpanTable, Orientation, PositionBinner, Trace,
    collect_extents, init_base, mark_outmost, normalize_bars, set_base_and_top,
    set_offset_and_width, set_offset_and_width_in_group_mode, sieve_bars, stack_bars,
    unhide_bars_within_trace,
};
use crate::error::{LayoutError, LayoutResult};

use super::BarLayoutConfig;

type TraceSlice<'t> = SmallVec<[&'t mut Trace; 8]>;

/// The pair of axes one orientation group is laid out against.
pub struct AxisPair<'a> {
    pub position: &'a mut dyn Axis,
    pub size: &'a dyn Axis,
}

/// One composition mode's geometry pass over its participating traces.
pub trait CompositionStrategy {
    fn compute_geometry(
        &self,
        traces: &mut [&mut Trace],
        axes: &mut AxisPair<'_>,
        config: &BarLayoutConfig,
    );
}

/// Each trace is laid out on its own, centered on its positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayStrategy;

/// Traces share each position side by side.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupStrategy;

/// Traces accumulate on top of each other; `relative` splits sign lanes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackStrategy {
    pub relative: bool,
}

impl CompositionStrategy for OverlayStrategy {
    fn compute_geometry(
        &self,
        traces: &mut [&mut Trace],
        axes: &mut AxisPair<'_>,
        config: &BarLayoutConfig,
    ) {
        let options = BinnerOptions {
            separate_negative_values: false,
            dont_merge_overlapping_data: !config.norm.is_enabled(),
            categorical: axes.position.is_categorical(),
        };

        for trace in traces.iter_mut() {
            let single = std::slice::from_mut(trace);
            let mut binner = PositionBinner::new(single, options);
            set_offset_and_width(
                axes.position,
                single,
                &mut binner,
                config.gap,
                config.group_gap,
            );

            // overlay also serves the traces excluded from grouping or
            // stacking, so normalization is handled here too
            match config.norm.target() {
                Some(target) => {
                    sieve_bars(single, &mut binner);
                    normalize_bars(axes.size, single, &binner, config.mode, target);
                }
                None => set_base_and_top(axes.size, single),
            }
        }
    }
}

impl CompositionStrategy for GroupStrategy {
    fn compute_geometry(
        &self,
        traces: &mut [&mut Trace],
        axes: &mut AxisPair<'_>,
        config: &BarLayoutConfig,
    ) {
        let categorical = axes.position.is_categorical();
        let mut binner = PositionBinner::new(
            traces,
            BinnerOptions {
                separate_negative_values: false,
                dont_merge_overlapping_data: !config.norm.is_enabled(),
                categorical,
            },
        );

        set_offset_and_width_in_group_mode(
            axes.position,
            traces,
            &mut binner,
            config.gap,
            config.group_gap,
        );
        unhide_bars_within_trace(traces, categorical);

        match config.norm.target() {
            Some(target) => {
                sieve_bars(traces, &mut binner);
                normalize_bars(axes.size, traces, &binner, config.mode, target);
            }
            None => set_base_and_top(axes.size, traces),
        }
    }
}

impl CompositionStrategy for StackStrategy {
    fn compute_geometry(
        &self,
        traces: &mut [&mut Trace],
        axes: &mut AxisPair<'_>,
        config: &BarLayoutConfig,
    ) {
        let mut binner = PositionBinner::new(
            traces,
            BinnerOptions {
                separate_negative_values: self.relative,
                dont_merge_overlapping_data: false,
                categorical: axes.position.is_categorical(),
            },
        );

        set_offset_and_width(
            axes.position,
            traces,
            &mut binner,
            config.gap,
            config.group_gap,
        );
        stack_bars(axes.size, traces, &mut binner, config.norm);
        mark_outmost(traces, &binner);

        if let Some(target) = config.norm.target() {
            normalize_bars(axes.size, traces, &binner, config.mode, target);
        }
    }
}

/// Strategy applied to the traces that take part in `mode`'s shared layout.
#[must_use]
pub fn strategy_for(mode: BarMode) -> &'static dyn CompositionStrategy {
    match mode {
        BarMode::Overlay => &OverlayStrategy,
        BarMode::Group => &GroupStrategy,
        BarMode::Stack => &StackStrategy { relative: false },
        BarMode::Relative => &StackStrategy { relative: true },
    }
}

/// Whether `trace` joins the shared layout of `mode`.
///
/// A user `offset` opts a trace out of grouping, a user `base` opts it out of
/// stacking. Excluded traces are laid out as if overlaid.
#[must_use]
pub fn participates(mode: BarMode, trace: &Trace) -> bool {
    match mode {
        BarMode::Overlay => true,
        BarMode::Group => trace.offset.is_none(),
        BarMode::Stack | BarMode::Relative => trace.base.is_none(),
    }
}

/// Result of laying out one orientation group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupLayout {
    pub orientation: Orientation,
    pub trace_count: usize,
    pub hover: HoverSpanTable,
}

/// Lays out traces that share one position axis, one size axis and one
/// orientation.
///
/// Traces are processed in slice order; that order decides stacking sums and
/// which bar ends each stack.
pub fn set_group_positions(
    position_axis: &mut dyn Axis,
    size_axis: &dyn Axis,
    traces: &mut [&mut Trace],
    config: &BarLayoutConfig,
) -> LayoutResult<GroupLayout> {
    let config = config.validate()?;
    let Some(orientation) = traces.first().map(|trace| trace.orientation) else {
        return Ok(GroupLayout::default());
    };
    if traces.iter().any(|trace| trace.orientation != orientation) {
        return Err(LayoutError::InvalidData(
            "traces of one bar group must share an orientation".to_owned(),
        ));
    }

    init_base(size_axis, traces);

    let mode = config.mode;
    {
        // partitions borrow `traces` until the end of this block
        let (mut included, mut excluded): (TraceSlice<'_>, TraceSlice<'_>) = traces
            .iter_mut()
            .map(|trace| &mut **trace)
            .partition(|trace| participates(mode, trace));
        debug!(
            ?mode,
            ?orientation,
            included = included.len(),
            excluded = excluded.len(),
            "set group positions"
        );

        let mut axes = AxisPair {
            position: position_axis,
            size: size_axis,
        };
        if !included.is_empty() {
            strategy_for(mode).compute_geometry(&mut included, &mut axes, &config);
        }
        if !excluded.is_empty() {
            OverlayStrategy.compute_geometry(&mut excluded, &mut axes, &config);
        }
    }

    let hover = collect_extents(traces);
    trace!(spans = hover.len(), "collected hover spans");

    Ok(GroupLayout {
        orientation,
        trace_count: traces.len(),
        hover,
    })
}

/// Per-orientation results of one subplot pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubplotLayout {
    pub vertical: Option<GroupLayout>,
    pub horizontal: Option<GroupLayout>,
}

/// Lays out all visible bar traces drawn on the `xaxis`/`yaxis` subplot.
///
/// Vertical traces use x as the position axis, horizontal ones use y. Traces
/// on other subplots or hidden traces are left untouched.
pub fn cross_trace_calc(
    traces: &mut [Trace],
    xaxis: &mut dyn Axis,
    yaxis: &mut dyn Axis,
    config: &BarLayoutConfig,
) -> LayoutResult<SubplotLayout> {
    let x_id = xaxis.id().to_owned();
    let y_id = yaxis.id().to_owned();

    let mut vertical: TraceSlice<'_> = SmallVec::new();
    let mut horizontal: TraceSlice<'_> = SmallVec::new();
    for trace in traces
        .iter_mut()
        .filter(|trace| trace.visible && trace.xaxis == x_id && trace.yaxis == y_id)
    {
        match trace.orientation {
            Orientation::Vertical => vertical.push(trace),
            Orientation::Horizontal => horizontal.push(trace),
        }
    }

    let mut layout = SubplotLayout::default();
    if !vertical.is_empty() {
        layout.vertical = Some(set_group_positions(
            xaxis,
            &*yaxis,
            &mut vertical,
            config,
        )?);
    }
    if !horizontal.is_empty() {
        layout.horizontal = Some(set_group_positions(
            yaxis,
            &*xaxis,
            &mut horizontal,
            config,
        )?);
    }
    Ok(layout)
}
