use serde::{Deserialize, Deserializer};

const KMH_PER_MPH: f64 = 1.609_344;

/// Strips list syntax (`[a, b]`, `['a', 'b']`) and returns the first item.
fn first_item(raw: &str) -> &str {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);
    inner
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
}

/// Parses a speed limit such as `50`, `"50"`, `30 mph` or `['40', '60']`.
/// Returns `None` for empty or unparsable values.
pub(crate) fn parse_speed(raw: &str) -> Option<f64> {
    let value = first_item(raw);
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let speed: f64 = value[..end].parse().ok()?;
    let speed = if value[end..].trim().eq_ignore_ascii_case("mph") {
        speed * KMH_PER_MPH
    } else {
        speed
    };

    (speed.is_finite() && speed > 0.0).then_some(speed)
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match first_item(raw).to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

pub(super) fn deserialize_speed<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_speed(&raw))
}

pub(super) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid boolean '{raw}'")))
}
