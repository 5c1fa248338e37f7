use serde::Serialize;
use tracing::{Level, debug, enabled};

/// Log `value` as pretty JSON under `label`. Serialization is skipped unless DEBUG is enabled.
pub(crate) fn debug_json<T: Serialize>(label: &str, value: &T) {
    if !enabled!(Level::DEBUG) {
        return;
    }

    match serde_json::to_string_pretty(value) {
        Ok(json) => debug!("{label}:\n{json}"),
        Err(error) => debug!("{label}: <pretty serialize failed: {error}>"),
    }
}
