//! Wall-clock helpers used for span timestamps.

use std::time::SystemTime;

/// The current wall-clock time.
pub fn now() -> SystemTime {
    SystemTime::now()
}
