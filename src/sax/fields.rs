use std::collections::HashMap;

use crate::warnings::{Warning, WarningSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Real,
    Integer,
}

/// Accumulates the numeric leaf elements a translator cares about.
///
/// Translators register the element names they read, feed every closing
/// child through [`ScalarFields::accept`], and query the parsed values when
/// they finalize. A value that fails to parse is reported once and leaves the
/// previous value in place.
#[derive(Debug, Clone, Default)]
pub struct ScalarFields {
    kinds: HashMap<&'static str, ScalarKind>,
    values: HashMap<&'static str, f64>,
}

impl ScalarFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn real(mut self, elements: &[&'static str]) -> Self {
        for element in elements {
            self.kinds.insert(*element, ScalarKind::Real);
        }
        self
    }

    pub fn integer(mut self, elements: &[&'static str]) -> Self {
        for element in elements {
            self.kinds.insert(*element, ScalarKind::Integer);
        }
        self
    }

    /// Parse `content` if `element` is registered. Returns `false` for unregistered elements.
    pub fn accept(&mut self, element: &str, content: &str, warnings: &mut WarningSet) -> bool {
        let Some((name, kind)) = self.kinds.get_key_value(element) else {
            return false;
        };
        let parsed = match kind {
            ScalarKind::Real => content.parse::<f64>().ok().filter(|v| v.is_finite()),
            ScalarKind::Integer => content.parse::<i64>().ok().map(|v| v as f64),
        };
        match parsed {
            Some(value) => {
                self.values.insert(*name, value);
            }
            None => {
                warnings.add(Warning::invalid_number(element, content));
            }
        }
        true
    }

    pub fn get(&self, element: &str) -> Option<f64> {
        self.values.get(element).copied()
    }

    pub fn get_or(&self, element: &str, default: f64) -> f64 {
        self.get(element).unwrap_or(default)
    }

    pub fn get_int(&self, element: &str) -> Option<i64> {
        self.get(element).map(|v| v as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_registered_elements() {
        let mut warnings = WarningSet::new();
        let mut fields = ScalarFields::new().real(&["Length"]).integer(&["Count"]);

        assert!(fields.accept("Length", "12.5", &mut warnings));
        assert!(fields.accept("Count", "4", &mut warnings));
        assert!(!fields.accept("Color", "Black", &mut warnings));

        assert_eq!(fields.get("Length"), Some(12.5));
        assert_eq!(fields.get_int("Count"), Some(4));
        assert!(warnings.is_empty());
    }

    #[test]
    fn invalid_value_keeps_previous_value() {
        let mut warnings = WarningSet::new();
        let mut fields = ScalarFields::new().integer(&["Count"]);

        fields.accept("Count", "3", &mut warnings);
        fields.accept("Count", "abc", &mut warnings);
        fields.accept("Count", "2.5", &mut warnings);

        assert_eq!(fields.get_int("Count"), Some(3));
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().next().unwrap().to_string().contains("Count"));
    }

    #[test]
    fn non_finite_reals_are_rejected() {
        let mut warnings = WarningSet::new();
        let mut fields = ScalarFields::new().real(&["Length"]);
        fields.accept("Length", "NaN", &mut warnings);
        assert_eq!(fields.get("Length"), None);
        assert_eq!(warnings.len(), 1);
    }
}
