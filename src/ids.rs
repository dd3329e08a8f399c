//! Identifier generation for journeys and events.

use chrono::Utc;
use rand::Rng;

/// Characters used for the random id suffix.
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random id suffix.
const SUFFIX_LEN: usize = 9;

/// Builds an id of the form `{prefix}_{millis}_{random}`.
///
/// The millisecond timestamp keeps ids roughly sortable; the random
/// suffix disambiguates ids minted within the same millisecond.
pub(crate) fn new_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_CHARSET.len());
            SUFFIX_CHARSET[idx] as char
        })
        .collect();
    format!("{prefix}_{}_{suffix}", Utc::now().timestamp_millis())
}
