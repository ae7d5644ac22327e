mod hover;
mod layout_config;
mod mode_router;
mod subplot;

pub use hover::{HoverMode, hover_position_range, position_footprint};
pub use layout_config::BarLayoutConfig;
pub use mode_router::{
    AxisPair, CompositionStrategy, GroupLayout, GroupStrategy, OverlayStrategy, StackStrategy,
    SubplotLayout, cross_trace_calc, participates, set_group_positions, strategy_for,
};
#[cfg(feature = "parallel-layout")]
pub use subplot::layout_subplots_parallel;
pub use subplot::{Subplot, layout_subplots};
