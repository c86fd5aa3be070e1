//! Format selection and the artifacts returned by import and export.

use std::io::BufRead;
use std::path::Path;

use rocketfile_core::models::Rocket;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ImportError};
use crate::motors::MotorIndex;
use crate::warnings::SealedWarnings;
use crate::{rasaero, rocksim};

/// External design file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[value(name = "rasaero")]
    RasAero,
    Rocksim,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RasAero => "rasaero",
            Self::Rocksim => "rocksim",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rasaero" => Some(Self::RasAero),
            "rocksim" => Some(Self::Rocksim),
            _ => None,
        }
    }

    /// Guess the format from a file extension (`.CDX1` or `.rkt`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "cdx1" => Some(Self::RasAero),
            "rkt" => Some(Self::Rocksim),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::RasAero => "CDX1",
            Self::Rocksim => "rkt",
        }
    }
}

/// A completed import: the native tree plus every non-fatal issue found.
#[derive(Debug)]
pub struct ImportOutcome {
    pub rocket: Rocket,
    pub warnings: SealedWarnings,
}

/// A completed export: the serialized document plus every non-fatal issue found.
#[derive(Debug)]
pub struct ExportOutcome {
    pub xml: String,
    pub warnings: SealedWarnings,
}

pub fn import<R: BufRead>(
    format: Format,
    source: R,
    motors: &MotorIndex,
) -> Result<ImportOutcome, ImportError> {
    match format {
        Format::RasAero => rasaero::load(source, motors),
        Format::Rocksim => rocksim::load(source),
    }
}

pub fn export(format: Format, rocket: &Rocket) -> Result<ExportOutcome, ExportError> {
    match format {
        Format::RasAero => rasaero::save(rocket),
        Format::Rocksim => rocksim::save(rocket),
    }
}

/// Serialize an export DTO tree. The root element name comes from the DTO's serde name.
pub(crate) fn write_xml<T: Serialize>(document: &T) -> Result<String, ExportError> {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let mut serializer = quick_xml::se::Serializer::new(&mut xml);
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.CDX1")), Some(Format::RasAero));
        assert_eq!(Format::from_path(Path::new("b.rkt")), Some(Format::Rocksim));
        assert_eq!(Format::from_path(Path::new("b.ork")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }

    #[test]
    fn parses_format_names() {
        assert_eq!(Format::from_str("RASAero"), Some(Format::RasAero));
        assert_eq!(Format::from_str("rocksim"), Some(Format::Rocksim));
        assert_eq!(Format::from_str("ork"), None);
    }
}
