/// Placeholder shown wherever a sample is missing.
pub const MISSING_PLACEHOLDER: &str = "---";

/// Magnitude-aware number formatting shared by axis labels, value readouts
/// and tooltips.
///
/// `|v| >= 1000` uses no decimals, `>= 10` one, `>= 1` two, anything smaller
/// three.
#[must_use]
pub fn format_axis_value(value: f64) -> String {
    let magnitude = value.abs();
    let decimals = if magnitude >= 1000.0 {
        0
    } else if magnitude >= 10.0 {
        1
    } else if magnitude >= 1.0 {
        2
    } else {
        3
    };
    format!("{value:.decimals$}")
}

/// Like [`format_axis_value`], with the placeholder for missing samples.
#[must_use]
pub fn format_sample(value: f64) -> String {
    if value.is_nan() {
        MISSING_PLACEHOLDER.to_owned()
    } else {
        format_axis_value(value)
    }
}
