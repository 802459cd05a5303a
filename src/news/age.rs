//! "Time since published" phrases.

use chrono::{DateTime, Utc};

/// Render the age of an item published at `published`, e.g. `"3 hours ago"`.
///
/// Uses the largest whole unit among days, hours and minutes.  Anything
/// under a minute, including timestamps in the future, is
/// `"less than a minute ago"`.
pub fn relative_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - published;

    let units = [
        (elapsed.num_days(), "day"),
        (elapsed.num_hours(), "hour"),
        (elapsed.num_minutes(), "minute"),
    ];

    units
        .into_iter()
        .find(|(count, _)| *count > 0)
        .map_or_else(
            || "less than a minute ago".to_string(),
            |(count, unit)| {
                let plural = if count == 1 { "" } else { "s" };
                format!("{count} {unit}{plural} ago")
            },
        )
}
