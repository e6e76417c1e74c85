//! Database Access Layer
//!
//! This module wraps the student records database behind a fixed set of
//! parameterized read queries.
//!
//! # Stateless Design
//! [`Database`] holds only the file path. Every operation opens a
//! connection, uses it, and drops it before returning, so no connection
//! state is shared between commands.
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver, no async needed)
//! - Identifiers bind as named SQL parameters, never via string formatting
//! - Cell values convert to `serde_json::Value`; BLOB data is
//!   Base64-encoded for JSON safety, NaN/Infinity map to null
//! - Unknown identifiers yield empty result sets, not errors

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, ToSql};

use crate::error::{Result, RollbookError};

/// One result row: an ordered sequence of column values.
///
/// Column order always matches the heading order of the command that ran
/// the query.
pub type Row = Vec<serde_json::Value>;

/// Schema and seed script, executed against the database file on startup.
pub const SCHEMA_SCRIPT: &str = include_str!("../sql/schema.sql");

/// Highest mark still reported by the completed-course shortfall listing.
pub const SHORTFALL_MARK: i64 = 30;

/// Handle to the student records database file
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Create a handle for the given database file. No connection is opened
    /// until the first operation runs.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying database file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection for the duration of one operation
    fn connect(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
        Connection::open_with_flags(&self.path, flags).map_err(|e| {
            RollbookError::connection_failed(format!("Failed to open student database: {e}"))
        })
    }

    /// Run the bundled schema script against the database file.
    ///
    /// The script drops and recreates every table, so calling this on an
    /// existing database resets it to the seeded state.
    pub fn initialize(&self, script: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(script)
            .map_err(|e| RollbookError::query_failed(format!("Failed to run schema script: {e}")))
    }

    /// First and last names of every student, for the demo listing
    pub fn student_names(&self) -> Result<Vec<(String, String)>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT first_name, last_name FROM Student ORDER BY student_id")
            .map_err(|e| RollbookError::query_failed(format!("Failed to prepare query: {e}")))?;

        let names = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| RollbookError::query_failed(format!("Failed to execute query: {e}")))?
            .collect::<std::result::Result<Vec<(String, String)>, _>>()
            .map_err(|e| RollbookError::query_failed(format!("Failed to fetch row: {e}")))?;

        Ok(names)
    }

    /// Course names a student is enrolled in
    pub fn subjects_for_student(&self, student_id: &str) -> Result<Vec<Row>> {
        self.query_rows(
            "SELECT c.course_name
             FROM StudentCourse AS sc
             JOIN Course AS c ON c.course_code = sc.course_code
             WHERE sc.student_id = :student_id",
            &[(":student_id", &student_id)],
        )
    }

    /// Street and city for a student looked up by first and last name
    pub fn address_for_name(&self, first_name: &str, last_name: &str) -> Result<Vec<Row>> {
        self.query_rows(
            "SELECT a.street, a.city
             FROM Student AS s
             JOIN Address AS a ON a.address_id = s.address_id
             WHERE s.first_name = :first_name AND s.last_name = :last_name",
            &[(":first_name", &first_name), (":last_name", &last_name)],
        )
    }

    /// All review scores and texts recorded for a student
    pub fn reviews_for_student(&self, student_id: &str) -> Result<Vec<Row>> {
        self.query_rows(
            "SELECT r.completeness, r.efficiency, r.style, r.documentation, r.review_text
             FROM Review AS r
             JOIN Student AS s ON s.student_id = r.student_id
             WHERE s.student_id = :student_id",
            &[(":student_id", &student_id)],
        )
    }

    /// Course names taught by a teacher
    pub fn courses_for_teacher(&self, teacher_id: &str) -> Result<Vec<Row>> {
        self.query_rows(
            "SELECT course_name
             FROM Course
             WHERE teacher_id = :teacher_id",
            &[(":teacher_id", &teacher_id)],
        )
    }

    /// Students with at least one course still marked incomplete,
    /// one row per open enrolment
    pub fn students_with_incomplete_courses(&self) -> Result<Vec<Row>> {
        self.query_rows(
            "SELECT s.student_id, s.first_name, s.last_name, s.email, c.course_name
             FROM Student AS s
             JOIN StudentCourse AS sc ON sc.student_id = s.student_id
             JOIN Course AS c ON c.course_code = sc.course_code
             WHERE sc.is_complete = 0",
            &[],
        )
    }

    /// Students who completed a course with a mark at or below
    /// [`SHORTFALL_MARK`]
    pub fn students_completed_below_threshold(&self) -> Result<Vec<Row>> {
        self.query_rows(
            "SELECT s.student_id, s.first_name, s.last_name, s.email, c.course_name, sc.mark
             FROM Student AS s
             JOIN StudentCourse AS sc ON sc.student_id = s.student_id
             JOIN Course AS c ON c.course_code = sc.course_code
             WHERE sc.is_complete = 1 AND sc.mark <= :mark",
            &[(":mark", &SHORTFALL_MARK)],
        )
    }

    /// Execute a read query and collect every row as JSON-safe values
    fn query_rows(&self, sql: &str, params: &[(&str, &dyn ToSql)]) -> Result<Vec<Row>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| RollbookError::query_failed(format!("Failed to prepare query: {e}")))?;

        let column_count = stmt.column_count();
        let mut rows = stmt
            .query(params)
            .map_err(|e| RollbookError::query_failed(format!("Failed to execute query: {e}")))?;

        let mut collected = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| RollbookError::query_failed(format!("Failed to fetch row: {e}")))?
        {
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                let value = sqlite_value_to_json(row, idx).map_err(|e| {
                    RollbookError::query_failed(format!("Failed to read column {idx}: {e}"))
                })?;
                values.push(value);
            }
            collected.push(values);
        }

        Ok(collected)
    }
}

/// Convert a `SQLite` value to a JSON value
fn sqlite_value_to_json(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> std::result::Result<serde_json::Value, rusqlite::Error> {
    use rusqlite::types::ValueRef;

    let value_ref = row.get_ref(idx)?;

    Ok(match value_ref {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::Number(i.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number), // Handle NaN/Infinity as null
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            serde_json::Value::String(text.to_string())
        }
        ValueRef::Blob(b) => {
            // Encode BLOB as Base64 for JSON safety
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(b);
            serde_json::Value::String(encoded)
        }
    })
}
