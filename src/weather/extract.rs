//! Pulls numbers out of the free-text fields of the weather widget.
//!
//! The widget reports values as `"label: number unit"`. Anything that does not fit
//! that shape (including negative numbers) yields 0. A bare number is read as-is,
//! so running an extractor over its own output gives the same value back.

const WIND_SEPARATOR: &str = ": ";
const WIND_UNIT: &str = "km/";
const PERCENT_SEPARATOR: &str = ":";
const PERCENT_UNIT: &str = "%";

fn labelled_number(text: &str, separator: &str, unit: &str) -> u32 {
    let mut parts = text.split(separator);
    let label_or_value = parts.next().unwrap_or_default();
    let value = parts.next().unwrap_or(label_or_value);
    value
        .split(unit)
        .next()
        .unwrap_or_default()
        .trim()
        .parse()
        .unwrap_or(0)
}

/// `"Wind: 10 km/h"` → `10`.
///
/// Only km/h readings are understood; `"Wind: 6 mph"` is 0.
pub fn wind_speed(text: &str) -> u32 {
    labelled_number(text, WIND_SEPARATOR, WIND_UNIT)
}

/// `"Precipitation: 20%"` → `20`.
pub fn precipitation(text: &str) -> u32 {
    labelled_number(text, PERCENT_SEPARATOR, PERCENT_UNIT)
}

/// `"Humidity: 74%"` → `74`.
pub fn humidity(text: &str) -> u32 {
    labelled_number(text, PERCENT_SEPARATOR, PERCENT_UNIT)
}

/// Temperature as shown in the widget (already a bare number, in °C).
pub fn temperature(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}
