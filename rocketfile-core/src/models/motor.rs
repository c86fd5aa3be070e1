use serde::{Deserialize, Serialize};

/// A motor record from the thrust-curve database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Motor {
    pub manufacturer: String,
    pub designation: String,
    /// Content digest of the thrust curve, unique per curve.
    pub digest: String,
    /// Motor diameter in metres.
    pub diameter: f64,
    /// Motor length in metres.
    pub length: f64,
    /// Total impulse in newton-seconds.
    #[serde(default)]
    pub total_impulse: f64,
}

/// A motor placed in a body tube, with its ejection delay in seconds.
///
/// `ejection_delay` is `None` for plugged motors or when the designation carried no delay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotorMount {
    pub motor: Motor,
    pub ejection_delay: Option<f64>,
}

/// A known motor manufacturer and the names it appears under in design files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Manufacturer {
    pub display_name: &'static str,
    pub simple_name: &'static str,
    aliases: &'static [&'static str],
}

const MANUFACTURERS: &[Manufacturer] = &[
    Manufacturer {
        display_name: "AeroTech",
        simple_name: "AeroTech",
        aliases: &["A", "AT", "ATR", "AEROTECH", "AERO TECH", "RCS", "ISP"],
    },
    Manufacturer {
        display_name: "Apogee Components",
        simple_name: "Apogee",
        aliases: &["AP", "APOG", "APOGEE", "P"],
    },
    Manufacturer {
        display_name: "Estes",
        simple_name: "Estes",
        aliases: &["E", "ES", "ESTES"],
    },
    Manufacturer {
        display_name: "Cesaroni Technology",
        simple_name: "Cesaroni",
        aliases: &["CTI", "CS", "CSR", "PRO38", "ABC", "CESARONI"],
    },
    Manufacturer {
        display_name: "Quest",
        simple_name: "Quest",
        aliases: &["Q", "QU", "QUEST"],
    },
    Manufacturer {
        display_name: "Loki Research",
        simple_name: "Loki",
        aliases: &["LOKI", "LR"],
    },
    Manufacturer {
        display_name: "Kosdon by AeroTech",
        simple_name: "Kosdon",
        aliases: &["K", "KBA", "K-AT", "KOS", "KOSDON", "KOSDON/AT", "KOSDON/AEROTECH"],
    },
    Manufacturer {
        display_name: "Animal Motor Works",
        simple_name: "AMW",
        aliases: &["AW", "ANIMAL"],
    },
    Manufacturer {
        display_name: "Gorilla Rocket Motors",
        simple_name: "Gorilla",
        aliases: &["GR", "GORILLA"],
    },
    Manufacturer {
        display_name: "Hypertek",
        simple_name: "Hypertek",
        aliases: &["H", "HT", "HY", "HYPERTEK"],
    },
];

/// Uppercase and strip everything but letters and digits.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

impl Manufacturer {
    /// Look up a known manufacturer by display name, simple name or alias.
    pub fn find(name: &str) -> Option<&'static Manufacturer> {
        let key = normalize(name);
        if key.is_empty() {
            return None;
        }
        MANUFACTURERS.iter().find(|m| m.is_named(&key))
    }

    fn is_named(&self, normalized: &str) -> bool {
        normalize(self.display_name) == normalized
            || normalize(self.simple_name) == normalized
            || self.aliases.iter().any(|a| normalize(a) == normalized)
    }

    /// Whether `name` refers to this manufacturer.
    pub fn matches(&self, name: &str) -> bool {
        self.is_named(&normalize(name))
    }
}

/// Whether two manufacturer strings name the same manufacturer.
///
/// Known manufacturers are compared through their alias table; anything else
/// falls back to a case- and punctuation-insensitive comparison.
pub fn manufacturers_match(a: &str, b: &str) -> bool {
    match (Manufacturer::find(a), Manufacturer::find(b)) {
        (Some(x), Some(y)) => x == y,
        _ => {
            let (a, b) = (normalize(a), normalize(b));
            !a.is_empty() && a == b
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_same_manufacturer() {
        assert!(manufacturers_match("AP", "Apogee Components"));
        assert!(manufacturers_match("aerotech", "AT"));
        assert!(manufacturers_match("Kosdon/AeroTech", "KBA"));
        assert!(!manufacturers_match("AP", "Estes"));
    }

    #[test]
    fn unknown_manufacturers_compare_normalized() {
        assert!(manufacturers_match("Some Co.", "SOME CO"));
        assert!(!manufacturers_match("NoSuchMfr", "Estes"));
        assert!(!manufacturers_match("", ""));
    }

    #[test]
    fn find_reports_display_name() {
        let m = Manufacturer::find("cti").expect("known alias");
        assert_eq!(m.display_name, "Cesaroni Technology");
        assert!(m.matches("Cesaroni"));
    }
}
