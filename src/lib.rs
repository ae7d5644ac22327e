//! chart-bars: bar composition layout for cartesian charts.
//!
//! Given bar traces that share a position axis, the layout pass decides each
//! bar's slot width, offset, base and top for the grouped, stacked, relative
//! and overlaid modes, with optional fraction/percent normalization. It also
//! reports per-trace autorange extents and the per-position footprints hover
//! needs. Rendering is left to the host.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{
    BarLayoutConfig, GroupLayout, HoverMode, Subplot, SubplotLayout, cross_trace_calc,
    layout_subplots, set_group_positions,
};
pub use error::{LayoutError, LayoutResult};
