//! Telemetry helpers for hosts embedding `chart-bars`.
//!
//! Events emitted by the layout passes, all under the `chart_bars` target:
//!
//! - `debug`: one event per subplot pass (`subplots`) and per orientation group
//!   (`mode`, `orientation`, `included`, `excluded`).
//! - `trace`: hover span counts, bars lifted within a grouped trace (`lifted`)
//!   and bars collapsed by a zero normalization total (`collapsed`).
//! - `warn`: dates on an unsupported calendar, which are read as gregorian.
//!
//! Installing a subscriber stays the host's call: either use
//! `init_default_tracing` or wire your own subscriber and filters.

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Without `RUST_LOG` the filter is `warn,chart_bars=info`, so only the calendar
/// warning shows up. Set `RUST_LOG=chart_bars=debug` or `=trace` for the passes.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,chart_bars=info")),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
