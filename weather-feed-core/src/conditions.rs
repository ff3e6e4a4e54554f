//! WMO weather interpretation codes.

/// Human-readable description and icon for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub description: &'static str,
    pub icon: &'static str,
}

impl Condition {
    const fn new(description: &'static str, icon: &'static str) -> Self {
        Self { description, icon }
    }
}

pub const CLEAR: Condition = Condition::new("Clear", "☀️");
pub const PARTLY_CLOUDY: Condition = Condition::new("Partly cloudy", "⛅");
pub const FOGGY: Condition = Condition::new("Foggy", "🌫️");
pub const RAINY: Condition = Condition::new("Rainy", "🌧️");
pub const SNOWY: Condition = Condition::new("Snowy", "❄️");
pub const STORMY: Condition = Condition::new("Stormy", "⛈️");
pub const UNKNOWN: Condition = Condition::new("Unknown", "🌈");

pub fn describe(code: i32) -> Condition {
    match code {
        0 => CLEAR,
        1..=3 => PARTLY_CLOUDY,
        45 | 48 => FOGGY,
        51..=67 => RAINY,
        71..=77 => SNOWY,
        80..=99 => STORMY,
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_codes_map_to_expected_conditions() {
        let cases = [
            (0, CLEAR),
            (1, PARTLY_CLOUDY),
            (3, PARTLY_CLOUDY),
            (45, FOGGY),
            (48, FOGGY),
            (51, RAINY),
            (67, RAINY),
            (71, SNOWY),
            (77, SNOWY),
            (80, STORMY),
            (99, STORMY),
            (150, UNKNOWN),
            (-1, UNKNOWN),
        ];

        for (code, expected) in cases {
            assert_eq!(describe(code), expected, "code {code}");
        }
    }

    #[test]
    fn every_code_up_to_99_matches_the_table() {
        for code in 0..=99 {
            let expected = if code == 0 {
                CLEAR
            } else if (1..=3).contains(&code) {
                PARTLY_CLOUDY
            } else if code == 45 || code == 48 {
                FOGGY
            } else if (51..=67).contains(&code) {
                RAINY
            } else if (71..=77).contains(&code) {
                SNOWY
            } else if (80..=99).contains(&code) {
                STORMY
            } else {
                UNKNOWN
            };

            assert_eq!(describe(code), expected, "code {code}");
        }
    }

    #[test]
    fn gaps_between_ranges_are_unknown() {
        for code in [4, 44, 46, 47, 49, 50, 68, 70, 78, 79] {
            assert_eq!(describe(code), UNKNOWN, "code {code}");
        }
    }

    #[test]
    fn unknown_condition_text() {
        assert_eq!(UNKNOWN.description, "Unknown");
        assert_eq!(UNKNOWN.icon, "🌈");
    }
}
