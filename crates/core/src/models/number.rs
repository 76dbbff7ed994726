use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Numbers coming from the feed are sometimes encoded as JSON strings
/// (`"1234.56"`) and sometimes as plain numbers. Missing or `null`
/// values read as `0.0`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Num(f64),
    Str(String),
}

/// `deserialize_with` helper accepting a number, a numeric string or `null`.
/// Pair with `#[serde(default)]` so an absent field also reads as `0.0`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(RawNumber::Num(n)) => Ok(n),
        Some(RawNumber::Str(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .map_err(|e| D::Error::custom(format!("invalid numeric string '{trimmed}': {e}")))
        }
    }
}
