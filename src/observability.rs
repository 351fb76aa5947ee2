use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

// ── Booking metrics ─────────────────────────────────────────────

/// Counter: stays opened.
pub const STAYS_OPENED_TOTAL: &str = "innkeep_stays_opened_total";

/// Counter: stays closed at checkout.
pub const STAYS_CLOSED_TOTAL: &str = "innkeep_stays_closed_total";

/// Counter: booking requests refused. Labels: reason.
pub const BOOKINGS_REJECTED_TOTAL: &str = "innkeep_bookings_rejected_total";

/// Counter: occupancy flag updates that failed and were downgraded to warnings.
pub const OCCUPANCY_UPDATE_FAILURES_TOTAL: &str = "innkeep_occupancy_update_failures_total";

// ── Store metrics ───────────────────────────────────────────────

/// Histogram: full-store rewrite duration in seconds.
pub const STORE_REWRITE_DURATION_SECONDS: &str = "innkeep_store_rewrite_duration_seconds";

/// Histogram: records written per full-store rewrite.
pub const STORE_REWRITE_RECORDS: &str = "innkeep_store_rewrite_records";

/// Install the fmt subscriber on stderr so log lines stay out of the shell's
/// stdout. Honors `RUST_LOG`, defaulting to `innkeep=info`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "innkeep=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Install the in-process Prometheus recorder. No-op if disabled.
pub fn init_metrics(enabled: bool) -> Option<PrometheusHandle> {
    if !enabled {
        return None;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            tracing::info!("metrics recorder installed");
            Some(handle)
        }
        Err(e) => {
            tracing::warn!("failed to install metrics recorder: {e}");
            None
        }
    }
}

/// Short label for a refused booking, used on `BOOKINGS_REJECTED_TOTAL`.
pub fn rejection_label(err: &crate::engine::BookingError) -> &'static str {
    use crate::engine::BookingError;
    match err {
        BookingError::CustomerNotFound(_) => "customer_not_found",
        BookingError::InvalidPeriod(_) => "invalid_period",
        BookingError::InvalidGuestCount => "invalid_guest_count",
        BookingError::NoRoomAvailable { .. } => "no_room_available",
        BookingError::Io(_) => "io",
        _ => "other",
    }
}
