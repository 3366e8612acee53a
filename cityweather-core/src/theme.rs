//! Page background per weather condition.

pub const DEFAULT_GRADIENT: &str = "linear-gradient(to right, #667eea, #764ba2)";

/// CSS gradient for a provider condition keyword such as `"Rain"`.
/// Keywords are matched exactly; anything else gets [`DEFAULT_GRADIENT`].
pub fn background_for(condition: &str) -> &'static str {
    match condition {
        "Clear" => "linear-gradient(to right, #ffdb00, #ffa500)",
        "Clouds" => "linear-gradient(to right, #d3d3d3, #a9a9a9)",
        "Rain" => "linear-gradient(to right, #4e54c8, #8f94fb)",
        "Thunderstorm" => "linear-gradient(to right, #3a6073, #16222a)",
        "Snow" => "linear-gradient(to right, #e0eafc, #cfdef3)",
        "Drizzle" => "linear-gradient(to right, #89f7fe, #66a6ff)",
        "Mist" => "linear-gradient(to right, #dde2e3, #bcc9cd)",
        _ => DEFAULT_GRADIENT,
    }
}
