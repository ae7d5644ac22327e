pub mod attr;
pub mod axis;
pub mod extents;
pub mod normalizer;
pub mod offset_width;
pub mod position_binner;
pub mod stacker;
pub mod types;

pub use attr::{Datum, PerPoint};
pub use axis::{Axis, AxisKind, CartesianAxis};
pub use extents::{
    Extents, ExtentsOptions, HoverSpanTable, PositionSpan, STANDARD_PADDING_FRACTION,
    collect_extents,
};
pub use normalizer::normalize_bars;
pub use offset_width::{
    apply_attributes, set_bar_center_and_width, set_offset_and_width,
    set_offset_and_width_in_group_mode, update_position_axis,
};
pub use position_binner::{BinnerOptions, DistinctValues, PositionBinner, distinct_values};
pub use stacker::{
    init_base, mark_outmost, set_base_and_top, sieve_bars, stack_bars, unhide_bars_within_trace,
};
pub use types::{Bar, BarMode, BarNorm, Orientation, Trace, TraceExtremes, TraceMeta};
