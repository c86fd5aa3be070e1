//! Runtime configuration from the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rocketfile_core::db::MotorDatabase;

use crate::document::Format;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Motor database location (from ROCKETFILE_MOTOR_DB); the platform data dir when unset.
    pub motor_db: Option<PathBuf>,
    /// Format used when a file extension is not recognised (from ROCKETFILE_FORMAT).
    pub default_format: Option<Format>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let motor_db = std::env::var_os("ROCKETFILE_MOTOR_DB").map(PathBuf::from);
        let default_format = std::env::var("ROCKETFILE_FORMAT").ok().and_then(|s| {
            let format = Format::from_str(&s);
            if format.is_none() {
                tracing::warn!("Ignoring unknown ROCKETFILE_FORMAT value '{}'", s);
            }
            format
        });
        Self::new(motor_db, default_format)
    }

    pub fn new(motor_db: Option<PathBuf>, default_format: Option<Format>) -> Self {
        Self {
            motor_db,
            default_format,
        }
    }

    pub fn motor_db_path(&self) -> Result<PathBuf> {
        match &self.motor_db {
            Some(path) => Ok(path.clone()),
            None => MotorDatabase::default_path(),
        }
    }

    /// Open and migrate the configured motor database.
    pub fn open_motor_database(&self) -> Result<MotorDatabase> {
        let db = match &self.motor_db {
            Some(path) => MotorDatabase::open(path.clone())
                .with_context(|| format!("Failed to open motor database at {}", path.display()))?,
            None => MotorDatabase::open_default().context("Failed to open the default motor database")?,
        };
        db.migrate()?;
        Ok(db)
    }

    /// Pick the format for `path`: an explicit choice, then the extension, then the configured default.
    pub fn format_for(&self, path: &Path, explicit: Option<Format>) -> Result<Format> {
        explicit
            .or_else(|| Format::from_path(path))
            .or(self.default_format)
            .with_context(|| {
                format!(
                    "Cannot tell the format of {}; pass --format or set ROCKETFILE_FORMAT",
                    path.display()
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_wins() {
        let config = Config::new(None, Some(Format::Rocksim));
        let format = config
            .format_for(Path::new("design.CDX1"), Some(Format::Rocksim))
            .unwrap();
        assert_eq!(format, Format::Rocksim);
    }

    #[test]
    fn extension_beats_default() {
        let config = Config::new(None, Some(Format::Rocksim));
        let format = config.format_for(Path::new("design.CDX1"), None).unwrap();
        assert_eq!(format, Format::RasAero);
        let format = config.format_for(Path::new("design.xml"), None).unwrap();
        assert_eq!(format, Format::Rocksim);
    }

    #[test]
    fn unknown_format_is_an_error() {
        let config = Config::default();
        assert!(config.format_for(Path::new("design.xml"), None).is_err());
    }

    #[test]
    fn explicit_database_path() {
        let config = Config::new(Some(PathBuf::from("/tmp/motors.db")), None);
        assert_eq!(config.motor_db_path().unwrap(), PathBuf::from("/tmp/motors.db"));
    }
}
