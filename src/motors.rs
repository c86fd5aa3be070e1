//! Motor lookup from the free-text descriptors found in design files.
//!
//! The index over the motor database is built on first use and can be
//! cleared between operations to release memory.

use std::collections::HashMap;
use std::sync::OnceLock;

use rocketfile_core::db::MotorDatabase;
use rocketfile_core::models::{manufacturers_match, Motor, MotorMount};

use crate::warnings::{Warning, WarningSet};

/// Anything that can produce a snapshot of motor records.
pub trait MotorSource: Send + Sync {
    fn load_motors(&self) -> anyhow::Result<Vec<Motor>>;
}

impl MotorSource for MotorDatabase {
    fn load_motors(&self) -> anyhow::Result<Vec<Motor>> {
        self.all_motors()
    }
}

impl MotorSource for Vec<Motor> {
    fn load_motors(&self) -> anyhow::Result<Vec<Motor>> {
        Ok(self.clone())
    }
}

#[derive(Debug, Default)]
struct Index {
    motors: Vec<Motor>,
    by_designation: HashMap<String, Vec<usize>>,
}

impl Index {
    fn build(motors: Vec<Motor>) -> Self {
        let mut by_designation: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, motor) in motors.iter().enumerate() {
            by_designation
                .entry(motor.designation.clone())
                .or_default()
                .push(i);
        }
        Self {
            motors,
            by_designation,
        }
    }

    fn find(&self, designation: &str, manufacturer: &str) -> Option<&Motor> {
        self.by_designation
            .get(designation)?
            .iter()
            .map(|i| &self.motors[*i])
            .find(|m| manufacturers_match(&m.manufacturer, manufacturer))
    }
}

/// Lazily built lookup service over a [`MotorSource`].
pub struct MotorIndex {
    source: Box<dyn MotorSource>,
    index: OnceLock<Index>,
}

impl MotorIndex {
    pub fn new(source: impl MotorSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            index: OnceLock::new(),
        }
    }

    /// An index with no motors; every lookup fails with a warning.
    pub fn empty() -> Self {
        Self::new(Vec::<Motor>::new())
    }

    pub fn is_loaded(&self) -> bool {
        self.index.get().is_some()
    }

    /// Drop the built index. The next lookup reloads from the source.
    pub fn clear(&mut self) {
        self.index = OnceLock::new();
    }

    pub fn len(&self) -> usize {
        self.index().motors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index(&self) -> &Index {
        self.index.get_or_init(|| match self.source.load_motors() {
            Ok(motors) => {
                tracing::debug!("Indexed {} motors", motors.len());
                Index::build(motors)
            }
            Err(e) => {
                tracing::warn!("Motor database unavailable: {:#}", e);
                Index::default()
            }
        })
    }

    pub fn find(&self, designation: &str, manufacturer: &str) -> Option<&Motor> {
        self.index().find(designation, manufacturer)
    }

    /// Resolve a descriptor of the form `"<designation>  (<manufacturer>)"`.
    ///
    /// A descriptor without exactly one double-space separator means "no
    /// motor" and resolves to `None` silently. A well-formed descriptor that
    /// matches nothing adds a [`Warning::MotorNotFound`].
    pub fn resolve(&self, descriptor: &str, warnings: &mut WarningSet) -> Option<MotorMount> {
        let (designation, manufacturer) = split_descriptor(descriptor)?;
        let (designation, delay) = split_delay(designation);
        let manufacturer = strip_parentheses(manufacturer);

        match self.find(designation, manufacturer) {
            Some(motor) => Some(MotorMount {
                motor: motor.clone(),
                ejection_delay: delay,
            }),
            None => {
                warnings.add(Warning::MotorNotFound {
                    descriptor: descriptor.to_string(),
                });
                None
            }
        }
    }
}

fn split_descriptor(descriptor: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = descriptor.split("  ").collect();
    match parts.as_slice() {
        [designation, manufacturer]
            if !designation.trim().is_empty() && !manufacturer.trim().is_empty() =>
        {
            Some((*designation, *manufacturer))
        }
        _ => None,
    }
}

/// Split a trailing delay suffix off a designation: `"A8-3"` → `("A8", Some(3.0))`.
///
/// A plugged motor (`"-P"`) or a bare trailing dash drops the suffix with no delay.
pub fn split_delay(designation: &str) -> (&str, Option<f64>) {
    if let Some(stripped) = designation.strip_suffix('-') {
        return (stripped, None);
    }
    let Some((base, suffix)) = designation.rsplit_once('-') else {
        return (designation, None);
    };
    if base.is_empty() {
        return (designation, None);
    }
    if suffix.eq_ignore_ascii_case("P") {
        return (base, None);
    }
    if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
        return (base, suffix.parse().ok());
    }
    (designation, None)
}

fn strip_parentheses(manufacturer: &str) -> &str {
    let s = manufacturer.strip_prefix('(').unwrap_or(manufacturer);
    s.strip_suffix(')').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor(manufacturer: &str, designation: &str) -> Motor {
        Motor {
            manufacturer: manufacturer.to_string(),
            designation: designation.to_string(),
            digest: format!("{}-{}", manufacturer, designation),
            diameter: 0.013,
            length: 0.045,
            total_impulse: 0.6,
        }
    }

    fn index() -> MotorIndex {
        MotorIndex::new(vec![
            motor("Apogee Components", "1/4A2"),
            motor("Estes", "A8"),
            motor("AeroTech", "A8"),
        ])
    }

    #[test]
    fn resolves_designation_and_manufacturer_alias() {
        let mut warnings = WarningSet::new();
        let mount = index().resolve("1/4A2  (AP)", &mut warnings).unwrap();
        assert_eq!(mount.motor.designation, "1/4A2");
        assert_eq!(mount.motor.manufacturer, "Apogee Components");
        assert_eq!(mount.ejection_delay, None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn strips_delay_suffix() {
        let mut warnings = WarningSet::new();
        let mount = index().resolve("A8-3  (Estes)", &mut warnings).unwrap();
        assert_eq!(mount.motor.manufacturer, "Estes");
        assert_eq!(mount.ejection_delay, Some(3.0));
    }

    #[test]
    fn malformed_descriptor_is_silent() {
        let mut warnings = WarningSet::new();
        assert!(index().resolve("BadFormat", &mut warnings).is_none());
        assert!(index().resolve("A  B  C", &mut warnings).is_none());
        assert!(index().resolve("A8  ", &mut warnings).is_none());
        assert!(index().resolve("  (Estes)", &mut warnings).is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_motor_warns_once_with_descriptor() {
        let mut warnings = WarningSet::new();
        assert!(index().resolve("Unknown1  (NoSuchMfr)", &mut warnings).is_none());
        assert_eq!(warnings.len(), 1);
        assert!(warnings
            .iter()
            .next()
            .unwrap()
            .to_string()
            .contains("Unknown1  (NoSuchMfr)"));
    }

    #[test]
    fn index_is_lazy_and_clearable() {
        let mut index = index();
        assert!(!index.is_loaded());
        assert!(index.find("A8", "AT").is_some());
        assert!(index.is_loaded());
        index.clear();
        assert!(!index.is_loaded());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn failing_source_yields_empty_index() {
        struct Broken;
        impl MotorSource for Broken {
            fn load_motors(&self) -> anyhow::Result<Vec<Motor>> {
                anyhow::bail!("no database")
            }
        }

        let index = MotorIndex::new(Broken);
        let mut warnings = WarningSet::new();
        assert!(index.resolve("A8  (Estes)", &mut warnings).is_none());
        assert_eq!(warnings.len(), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn split_delay_cases() {
        assert_eq!(split_delay("A8-3"), ("A8", Some(3.0)));
        assert_eq!(split_delay("H128W-14"), ("H128W", Some(14.0)));
        assert_eq!(split_delay("G80-P"), ("G80", None));
        assert_eq!(split_delay("C6-"), ("C6", None));
        assert_eq!(split_delay("1/4A2"), ("1/4A2", None));
        assert_eq!(split_delay("K-Special"), ("K-Special", None));
    }
}
