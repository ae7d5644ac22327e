use serde::{Deserialize, Serialize};

use crate::core::{Bar, HoverSpanTable, PositionSpan, TraceMeta};

/// How hover picks the position range a bar answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HoverMode {
    /// Only the drawn bar counts.
    #[default]
    Closest,
    /// The whole slot around the position counts, so every trace at a
    /// position is picked together.
    Compare,
}

/// Position range over which hovering selects `bar`.
///
/// In compare mode the range is widened to `p ± bardelta / 2` so thin or
/// shifted bars still answer for their whole slot.
#[must_use]
pub fn hover_position_range(bar: &Bar, meta: &TraceMeta, mode: HoverMode) -> PositionSpan {
    let start = bar.center - bar.w / 2.0;
    let end = bar.center + bar.w / 2.0;

    match mode {
        HoverMode::Closest => PositionSpan { start, end },
        HoverMode::Compare => {
            let half_slot = meta.bardelta / 2.0;
            PositionSpan {
                start: start.min(bar.p - half_slot),
                end: end.max(bar.p + half_slot),
            }
        }
    }
}

/// Footprint of every bar sharing `bar`'s position in its layout group.
#[must_use]
pub fn position_footprint(table: &HoverSpanTable, bar: &Bar) -> Option<PositionSpan> {
    table.span_at(bar.p)
}
