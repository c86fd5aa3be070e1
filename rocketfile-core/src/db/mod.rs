mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use crate::models::Motor;

/// SQLite-backed snapshot of the thrust-curve motor database.
#[derive(Clone)]
pub struct MotorDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl MotorDatabase {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Location of the database in the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "rocketfile")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("motors.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    /// Insert or replace a motor, keyed by its digest.
    pub fn insert_motor(&self, motor: &Motor) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO motors
                (digest, manufacturer, designation, diameter, length, total_impulse, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                &motor.digest,
                &motor.manufacturer,
                &motor.designation,
                motor.diameter,
                motor.length,
                motor.total_impulse,
                Utc::now().to_rfc3339(),
            ),
        )?;
        Ok(())
    }

    /// Insert a batch of motors in one transaction. Returns the number written.
    pub fn insert_motors(&self, motors: &[Motor]) -> Result<usize> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO motors
                    (digest, manufacturer, designation, diameter, length, total_impulse, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            for motor in motors {
                stmt.execute((
                    &motor.digest,
                    &motor.manufacturer,
                    &motor.designation,
                    motor.diameter,
                    motor.length,
                    motor.total_impulse,
                    &now,
                ))?;
            }
        }
        tx.commit()?;
        tracing::info!("Stored {} motors", motors.len());
        Ok(motors.len())
    }

    pub fn all_motors(&self) -> Result<Vec<Motor>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT manufacturer, designation, digest, diameter, length, total_impulse
             FROM motors ORDER BY manufacturer, designation",
        )?;

        let motors = stmt
            .query_map([], |row| {
                Ok(Motor {
                    manufacturer: row.get(0)?,
                    designation: row.get(1)?,
                    digest: row.get(2)?,
                    diameter: row.get(3)?,
                    length: row.get(4)?,
                    total_impulse: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(motors)
    }

    pub fn motor_count(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM motors", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn clear(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM motors", [])?;
        Ok(rows)
    }
}
