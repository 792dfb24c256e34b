//! The storage module provides database operations for storing and
//! retrieving study guides using SQLite.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::convert::TryFrom;
use std::sync::{Arc, Mutex};

use crate::guide::{BibliographyEntry, Guide};

/// Storage provides database operations for storing and retrieving guides.
pub struct Storage {
    /// The underlying SQLite connection wrapped in Arc<Mutex<>> to make it thread-safe
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Creates a new Storage instance with a database at the specified path.
    ///
    /// # Arguments
    ///
    /// * `database_path` - Path where the database file should be created or opened
    ///
    /// # Errors
    ///
    /// Returns an error if database creation fails
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Initializes the database schema with the guides table if it doesn't exist.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS guides (
                id TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL,
                title TEXT NOT NULL,
                subject TEXT NOT NULL,
                unit TEXT NOT NULL,
                guide_number TEXT NOT NULL,
                image_url TEXT NOT NULL,
                topics TEXT NOT NULL,
                datos TEXT NOT NULL,
                desarrollo TEXT NOT NULL,
                actividades TEXT NOT NULL,
                rubrica TEXT NOT NULL,
                autoevaluacion TEXT NOT NULL,
                bibliografia TEXT NOT NULL,
                bibliografia_items TEXT NOT NULL
            )",
            params![],
        )?;

        Ok(())
    }

    /// Returns a list of all guide ids stored in the database, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn list_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare("SELECT id FROM guides ORDER BY created_at ASC")?;
        let ids: Result<Vec<String>, rusqlite::Error> =
            stmt.query_map([], |row| row.get(0))?.collect();

        ids.map_err(|e| e.into())
    }

    /// Returns (id, title, created_at) for every stored guide, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn list_guides(&self) -> Result<Vec<(String, String, DateTime<Utc>)>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt =
            conn.prepare("SELECT id, title, created_at FROM guides ORDER BY created_at ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get(1)?, row.get::<_, i64>(2)?))
        })?;

        let mut guides = Vec::new();
        for row in rows.flatten() {
            let (id, title, created_at) = row;
            let created_at = DateTime::from_timestamp_secs(created_at)
                .context("Unable to initialize created_at from database")?;
            guides.push((id, title, created_at));
        }

        Ok(guides)
    }

    /// Gets all guide data for a specific id from the database.
    ///
    /// # Arguments
    ///
    /// * `id` - The guide id to look up in the database
    ///
    /// # Returns
    ///
    /// Returns a Guide if found, None if not found, or an error if database operation fails
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn get_guide(&self, id: &str) -> Result<Option<Guide>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, created_at, title, subject, unit, guide_number, image_url, topics,
                    datos, desarrollo, actividades, rubrica, autoevaluacion,
                    bibliografia, bibliografia_items
             FROM guides WHERE id = ?1",
        )?;
        let guide_row: Result<Option<GuideRow>, rusqlite::Error> = stmt
            .query_row([id], |row| {
                Ok(GuideRow {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    title: row.get(2)?,
                    subject: row.get(3)?,
                    unit: row.get(4)?,
                    guide_number: row.get(5)?,
                    image_url: row.get(6)?,
                    topics: row.get(7)?,
                    datos: row.get(8)?,
                    desarrollo: row.get(9)?,
                    actividades: row.get(10)?,
                    rubrica: row.get(11)?,
                    autoevaluacion: row.get(12)?,
                    bibliografia: row.get(13)?,
                    bibliografia_items: row.get(14)?,
                })
            })
            .optional();

        let guide_row: Option<GuideRow> =
            guide_row.map_err(|e| anyhow::anyhow!("Unable to fetch guide row: {e}"))?;

        let guide_row = match guide_row {
            Some(guide_row) => guide_row,
            None => return Ok(None),
        };

        Ok(Some(guide_row.try_into()?))
    }

    /// Adds or updates a guide in the database.
    ///
    /// # Arguments
    ///
    /// * `guide` - The Guide struct containing all the guide data
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn upsert_guide(&self, guide: &Guide) -> Result<()> {
        let topics = serde_json::to_string(&guide.topics)?;
        let bibliografia_items = serde_json::to_string(&guide.bibliografia_items)?;
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO guides (
                id, created_at, title, subject, unit, guide_number, image_url, topics,
                datos, desarrollo, actividades, rubrica, autoevaluacion,
                bibliografia, bibliografia_items
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                guide.id,
                guide.created_at.timestamp(),
                guide.title,
                guide.subject,
                guide.unit,
                guide.guide_number,
                guide.image_url,
                topics,
                guide.datos,
                guide.desarrollo,
                guide.actividades,
                guide.rubrica,
                guide.autoevaluacion,
                guide.bibliografia,
                bibliografia_items,
            ],
        )?;

        Ok(())
    }

    /// Removes a guide from the database.
    ///
    /// # Arguments
    ///
    /// * `id` - The id of the guide to remove
    ///
    /// # Returns
    ///
    /// Returns `true` when a guide was deleted
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn remove_guide(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let deleted = conn.execute("DELETE FROM guides WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

/// Represents a guide row stored in the database
#[derive(Debug)]
struct GuideRow {
    id: String,
    created_at: i64,
    title: String,
    subject: String,
    unit: String,
    guide_number: String,
    image_url: String,
    topics: String,
    datos: String,
    desarrollo: String,
    actividades: String,
    rubrica: String,
    autoevaluacion: String,
    bibliografia: String,
    bibliografia_items: String,
}

impl TryFrom<GuideRow> for Guide {
    type Error = anyhow::Error;

    fn try_from(guide_row: GuideRow) -> Result<Self> {
        let topics: Vec<String> = serde_json::from_str(&guide_row.topics)
            .context("Unable to parse topics from database")?;
        let bibliografia_items: Vec<BibliographyEntry> =
            serde_json::from_str(&guide_row.bibliografia_items)
                .context("Unable to parse bibliography items from database")?;
        Ok(Guide {
            id: guide_row.id,
            created_at: DateTime::from_timestamp_secs(guide_row.created_at)
                .context("Unable to initialize created_at from database")?,
            title: guide_row.title,
            subject: guide_row.subject,
            unit: guide_row.unit,
            guide_number: guide_row.guide_number,
            image_url: guide_row.image_url,
            topics,
            datos: guide_row.datos,
            desarrollo: guide_row.desarrollo,
            actividades: guide_row.actividades,
            rubrica: guide_row.rubrica,
            autoevaluacion: guide_row.autoevaluacion,
            bibliografia: guide_row.bibliografia,
            bibliografia_items,
        })
    }
}
