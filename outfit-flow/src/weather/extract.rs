//! Heuristics for pulling a temperature and a condition out of free-form
//! search result text.

use std::sync::LazyLock;

use regex::Regex;

// ASCII digits only; `str::parse::<f64>` rejects other scripts.
const NUMBER: &str = r"([0-9]+(?:\.[0-9]+)?)";

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p.replace("{n}", NUMBER))).expect("Invalid regex"))
        .collect()
}

static CELSIUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"{n}°C",
        r"{n} °C",
        r"{n} degrees Celsius",
        r"{n} Celsius",
        r"temperature (?:is|of) {n}",
        r"{n} degrees",
    ])
});

static FAHRENHEIT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"{n}°F",
        r"{n} °F",
        r"{n} degrees Fahrenheit",
        r"{n} Fahrenheit",
    ])
});

// Checked in this order; the first category with a hit wins.
static CONDITION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(sunny|clear sky|clear)",
        r"(cloudy|overcast|cloud cover)",
        r"(rainy|raining|rain shower|light rain|heavy rain)",
        r"(snowy|snowing|snow shower|light snow|heavy snow)",
        r"(foggy|misty|hazy)",
        r"(stormy|thunderstorm|thunder|lightning)",
        r"(windy|strong winds|gusts)",
        r"(humid|humidity|muggy)",
        r"(dry|arid)",
        r"(hot|warm|pleasant|cool|cold|chilly|freezing)",
    ])
});

static WEATHER_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[^.!?]*(?:weather|condition)[^.!?]*[.!?]").expect("Invalid regex")
});

/// Convert Fahrenheit to Celsius, rounded to one decimal place.
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    ((fahrenheit - 32.0) * 5.0 / 9.0 * 10.0).round() / 10.0
}

fn first_number(patterns: &[Regex], text: &str) -> Option<f64> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    })
}

/// Find a temperature in Celsius.
///
/// Celsius-labelled patterns are tried first; Fahrenheit readings are
/// converted.
pub fn extract_temperature(text: &str) -> Option<f64> {
    first_number(&CELSIUS_PATTERNS, text)
        .or_else(|| first_number(&FAHRENHEIT_PATTERNS, text).map(fahrenheit_to_celsius))
}

/// Find a short condition phrase such as `Sunny` or `Light rain`.
pub fn extract_condition(text: &str) -> Option<String> {
    if let Some(found) = CONDITION_PATTERNS
        .iter()
        .find_map(|re| re.find(text).map(|m| capitalize(m.as_str())))
    {
        return Some(found);
    }

    WEATHER_SENTENCE
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
