//! Display names for weekday and month indices
//! Weekdays follow the Monday = 0 convention used by the derived columns

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Get weekday display name, falling back to "Unknown" outside 0..=6
pub fn day_name(day: u32) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("Unknown")
}

/// Three-letter weekday name for table columns
pub fn day_name_short(day: u32) -> &'static str {
    match day_name(day) {
        "Unknown" => "???",
        name => &name[..3],
    }
}

/// Get month display name, falling back to "Unknown" outside 1..=12
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|m| MONTH_NAMES.get(m as usize))
        .copied()
        .unwrap_or("Unknown")
}
