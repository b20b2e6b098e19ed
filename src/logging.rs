//! Logging helpers for merge scanner events.

/// Single logging target for the crate.
pub(crate) const LOG_TARGET: &str = "merge_scan";

/// Log an `event=<name>` line under [`LOG_TARGET`].
macro_rules! scan_log {
    ($level:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {{
        if log::log_enabled!(target: crate::logging::LOG_TARGET, $level) {
            log::log!(
                target: crate::logging::LOG_TARGET,
                $level,
                "event={} {}",
                $event,
                format_args!($fmt $(, $args)*)
            );
        }
    }};
}

pub(crate) use scan_log;
