use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{CartesianAxis, Extents, STANDARD_PADDING_FRACTION, Trace};
use crate::error::{LayoutError, LayoutResult};

use super::{BarLayoutConfig, SubplotLayout, cross_trace_calc};

/// One x/y axis pair and the bar traces drawn on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subplot {
    pub xaxis: CartesianAxis,
    pub yaxis: CartesianAxis,
    #[serde(default)]
    pub traces: Vec<Trace>,
}

impl Subplot {
    #[must_use]
    pub fn new(xaxis: CartesianAxis, yaxis: CartesianAxis) -> Self {
        Self {
            xaxis,
            yaxis,
            traces: Vec::new(),
        }
    }

    /// Loads a subplot fixture (axes plus traces) from JSON.
    pub fn from_json_str(input: &str) -> LayoutResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| LayoutError::InvalidData(format!("failed to parse subplot: {e}")))
    }

    /// Serializes the subplot, including laid-out bar geometry.
    pub fn to_json_pretty(&self) -> LayoutResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::InvalidData(format!("failed to serialize subplot: {e}")))
    }

    #[must_use]
    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Runs the bar layout for this subplot.
    ///
    /// Tick constraints from a previous pass are cleared first, so repeated
    /// calls on unchanged data give identical axes.
    pub fn layout(&mut self, config: &BarLayoutConfig) -> LayoutResult<SubplotLayout> {
        self.xaxis.reset_tick_constraints();
        self.yaxis.reset_tick_constraints();
        cross_trace_calc(&mut self.traces, &mut self.xaxis, &mut self.yaxis, config)
    }

    /// Autorange of the axis with `axis_id`, merged from the last layout pass.
    ///
    /// Returns `None` when no visible trace contributed to that axis.
    #[must_use]
    pub fn axis_range(&self, axis_id: &str) -> Option<(f64, f64)> {
        let extents: Vec<Extents> = self
            .traces
            .iter()
            .filter(|trace| trace.visible)
            .flat_map(|trace| {
                let position = (trace.position_axis_id() == axis_id)
                    .then_some(trace.extremes.position)
                    .flatten();
                let size = (trace.size_axis_id() == axis_id)
                    .then_some(trace.extremes.size)
                    .flatten();
                position.into_iter().chain(size)
            })
            .collect();

        Extents::autorange(&extents, STANDARD_PADDING_FRACTION)
    }
}

/// Lays out every subplot in order. Stops at the first failing subplot.
pub fn layout_subplots(
    subplots: &mut [Subplot],
    config: &BarLayoutConfig,
) -> LayoutResult<Vec<SubplotLayout>> {
    debug!(subplots = subplots.len(), "bar layout pass");
    subplots
        .iter_mut()
        .map(|subplot| subplot.layout(config))
        .collect()
}

/// Parallel variant of [`layout_subplots`]; subplots share no state.
#[cfg(feature = "parallel-layout")]
pub fn layout_subplots_parallel(
    subplots: &mut [Subplot],
    config: &BarLayoutConfig,
) -> LayoutResult<Vec<SubplotLayout>> {
    use rayon::prelude::*;

    debug!(subplots = subplots.len(), "parallel bar layout pass");
    subplots
        .par_iter_mut()
        .map(|subplot| subplot.layout(config))
        .collect()
}
