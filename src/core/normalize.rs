//! Free-text height and salary parsing.

use regex::Regex;
use std::sync::LazyLock;

const CM_PER_FOOT: f64 = 30.48;
const CM_PER_INCH: f64 = 2.54;

/// "172 cm", "172.5cms"
static RE_CENTIMETERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:cm|cms|centimet(?:er|re)s?)\b").expect("Invalid regex")
});

/// `5'8"`, `5' 8`, "5 ft 8 in", "5 feet 8 inches", "6ft".
/// The feet digits must not follow another digit or a dot.
static RE_FEET_INCHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:^|[^\d.])(\d+)\s*(?:'|’|ft\.?|feet|foot)\s*(?:(\d+(?:\.\d+)?)\s*(?:"|''|”|in\b|inch(?:es)?)?)?"#,
    )
    .expect("Invalid regex")
});

/// "5.8" read as 5 ft 8 in, "5.10" as 5 ft 10 in, with an optional feet unit
static RE_DECIMAL_FEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d)\.(\d{1,2})\s*(?:'|’|ft\.?|feet|foot)?\s*$").expect("Invalid regex")
});

static RE_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex"));

#[inline]
fn feet_inches_to_cm(feet: f64, inches: f64) -> u32 {
    (feet * CM_PER_FOOT + inches * CM_PER_INCH).round() as u32
}

/// Convert a free-text height to whole centimeters, 0 when unparseable.
///
/// Forms are tried in order: explicit centimeters, the decimal-feet
/// shorthand where the digits after the dot are inches (`5.10` and
/// `5.10 ft` are 5'10", not 5.1 ft), then feet/inches notation.
pub fn height_to_cm(raw: Option<&str>) -> u32 {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return 0;
    };

    if let Some(caps) = RE_CENTIMETERS.captures(text) {
        return caps[1].parse::<f64>().map(|cm| cm.round() as u32).unwrap_or(0);
    }

    if let Some(caps) = RE_DECIMAL_FEET.captures(text) {
        let feet = caps[1].parse::<f64>().unwrap_or(0.0);
        let inches = caps[2].parse::<f64>().unwrap_or(0.0);
        return feet_inches_to_cm(feet, inches);
    }

    if let Some(caps) = RE_FEET_INCHES.captures(text) {
        let feet = caps[1].parse::<f64>().unwrap_or(0.0);
        let inches = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        return feet_inches_to_cm(feet, inches);
    }

    0
}

/// First integer token of a salary string ("10 LPA" -> 10).
///
/// `None` means no digits at all, which is not the same as a salary of zero.
/// Tokens too large for `u32` saturate.
pub fn income_to_units(raw: Option<&str>) -> Option<u32> {
    RE_INTEGER
        .find(raw?)
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_inches_notation() {
        assert_eq!(height_to_cm(Some("5'8\"")), 173);
        assert_eq!(height_to_cm(Some("5' 8")), 173);
        assert_eq!(height_to_cm(Some("5 ft 8 in")), 173);
        assert_eq!(height_to_cm(Some("5 feet 8 inches")), 173);
        assert_eq!(height_to_cm(Some("6ft")), 183);
    }

    #[test]
    fn test_centimeters_take_priority() {
        assert_eq!(height_to_cm(Some("172 cm")), 172);
        assert_eq!(height_to_cm(Some("172cm")), 172);
        assert_eq!(height_to_cm(Some("5'8\" (172 cm)")), 172);
    }

    #[test]
    fn test_decimal_feet_shorthand() {
        // 5.8 is 5'8", not 5.8 feet
        assert_eq!(height_to_cm(Some("5.8")), 173);
        assert_eq!(height_to_cm(Some("5.10")), 178);
        assert_eq!(height_to_cm(Some("5.8 ft")), 173);
        assert_eq!(height_to_cm(Some("5.8'")), 173);
        assert_eq!(height_to_cm(Some("5.10 feet")), 178);
        assert_eq!(height_to_cm(Some("5.10ft.")), 178);
    }

    #[test]
    fn test_feet_digits_never_taken_from_a_decimal() {
        // "8 ft" here follows a dot and is not a feet reading
        assert_eq!(height_to_cm(Some("5.8 ft 2 in")), 0);
        assert_eq!(height_to_cm(Some("height: 5 ft 8 in")), 173);
    }

    #[test]
    fn test_unparseable_height_is_zero() {
        assert_eq!(height_to_cm(Some("")), 0);
        assert_eq!(height_to_cm(Some("tall")), 0);
        assert_eq!(height_to_cm(None), 0);
    }

    #[test]
    fn test_income_first_integer_token() {
        assert_eq!(income_to_units(Some("10 LPA")), Some(10));
        assert_eq!(income_to_units(Some("INR 12-15 lakhs")), Some(12));
        assert_eq!(income_to_units(Some("0")), Some(0));
        assert_eq!(income_to_units(Some("not disclosed")), None);
        assert_eq!(income_to_units(None), None);
    }

    #[test]
    fn test_income_overflow_saturates() {
        assert_eq!(income_to_units(Some("1500000000000 INR")), Some(u32::MAX));
        assert_eq!(income_to_units(Some("4294967295")), Some(u32::MAX));
    }
}
