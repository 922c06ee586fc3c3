//! Per-type coercion of raw environment strings.

use url::Url;

use crate::error::CoerceError;
use crate::schema::BaseType;
use crate::value::EnvValue;

const TRUTHY: [&str; 5] = ["true", "1", "yes", "y", "on"];
const FALSY: [&str; 5] = ["false", "0", "no", "n", "off"];

/// Coerce a raw string into a value of the given base type.
///
/// `string` and `url` values are returned exactly as supplied; `url` only
/// checks that the text parses as an absolute URL.
///
/// ```
/// use env_typed_checker::coerce::coerce;
/// use env_typed_checker::schema::BaseType;
/// use env_typed_checker::EnvValue;
///
/// assert_eq!(coerce(BaseType::Number, " 3000 ").unwrap(), EnvValue::Number(3000.0));
/// assert_eq!(coerce(BaseType::Boolean, "Yes").unwrap(), EnvValue::Bool(true));
/// assert!(coerce(BaseType::Url, "not-a-url").is_err());
/// ```
pub fn coerce(base_type: BaseType, raw: &str) -> Result<EnvValue, CoerceError> {
    match base_type {
        BaseType::String => Ok(EnvValue::String(raw.to_string())),
        BaseType::Number => coerce_number(raw).map(EnvValue::Number),
        BaseType::Boolean => coerce_boolean(raw).map(EnvValue::Bool),
        BaseType::Json => serde_json::from_str(raw)
            .map(EnvValue::Json)
            .map_err(|e| CoerceError::Json {
                raw: raw.to_string(),
                reason: e.to_string(),
            }),
        BaseType::Url => match Url::parse(raw) {
            Ok(_) => Ok(EnvValue::String(raw.to_string())),
            Err(_) => Err(CoerceError::Url {
                raw: raw.to_string(),
            }),
        },
    }
}

fn coerce_number(raw: &str) -> Result<f64, CoerceError> {
    let trimmed = raw.trim();
    parse_numeric_literal(trimmed)
        .filter(|n| n.is_finite())
        .ok_or_else(|| CoerceError::Number {
            raw: raw.to_string(),
        })
}

/// Decimal literals plus unsigned `0x`/`0o`/`0b` integers. Blank input is 0.
fn parse_numeric_literal(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u128::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }

    // `f64::from_str` also accepts "inf"/"nan" spellings; those are filtered
    // out by the finiteness check.
    if !s.bytes().all(|b| b.is_ascii_digit() || b"+-.eE".contains(&b)) {
        return None;
    }
    s.parse::<f64>().ok()
}

fn coerce_boolean(raw: &str) -> Result<bool, CoerceError> {
    let normalized = raw.trim().to_lowercase();
    if TRUTHY.contains(&normalized.as_str()) {
        Ok(true)
    } else if FALSY.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(CoerceError::Boolean {
            raw: raw.to_string(),
        })
    }
}
