//! Result Set Export
//!
//! Persists query results to JSON or XML on user request.
//!
//! # Output Contract
//! - JSON: the raw tuple sequence as an array of arrays, positional, no
//!   field names, 4-space indent, UTF-8. An empty result exports as `[]`.
//! - XML: `<data><tuple><field>text</field>...</tuple>...</data>` with an
//!   XML declaration and 4-space indent. Field element names come from the
//!   per-command [`RowSchema`]; values come from the header-to-value
//!   mappings built by [`crate::output::to_mappings`].
//!
//! The two formats are intentionally asymmetric: JSON preserves only
//! positional structure while XML carries per-command field names.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::Row;
use crate::error::{Result, RollbookError};
use crate::output::{format_cell, to_mappings};

/// Supported export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Positional JSON (array of arrays)
    Json,
    /// Per-command named-field XML
    Xml,
}

impl ExportFormat {
    /// Detect the format from a filename extension, case-insensitively.
    ///
    /// Returns `None` for anything other than `.json` or `.xml`; the
    /// filename prompt uses this to reject bad extensions.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if ext.eq_ignore_ascii_case("xml") {
            Some(Self::Xml)
        } else {
            None
        }
    }
}

/// Per-command result shape: ordered (heading, XML element name) pairs.
///
/// The same descriptor drives the table headings, the exporter mappings,
/// and the XML element names, so the positional pairing between query
/// columns and labels is declared exactly once per command.
#[derive(Debug, Clone, Copy)]
pub struct RowSchema {
    fields: &'static [(&'static str, &'static str)],
}

impl RowSchema {
    /// `vs` and `lc`: a single course-name column
    pub const SUBJECTS: Self = Self { fields: &[("Subjects", "subject")] };

    /// `la`: street and city
    pub const ADDRESS: Self =
        Self { fields: &[("Street Name", "street_name"), ("City", "city")] };

    /// `lr`: review scores and text
    pub const REVIEWS: Self = Self {
        fields: &[
            ("Completeness", "completeness"),
            ("Efficiency", "efficiency"),
            ("Style", "style"),
            ("Documentation", "documentation"),
            ("Review", "review"),
        ],
    };

    /// `lnc`: students with an open course
    pub const INCOMPLETE: Self = Self {
        fields: &[
            ("Student ID", "student_id"),
            ("First Name", "first_name"),
            ("Last Name", "last_name"),
            ("Email Address", "email_address"),
            ("Course", "course"),
        ],
    };

    /// `lf`: completed courses with a shortfall mark
    pub const SHORTFALL: Self = Self {
        fields: &[
            ("Student ID", "student_id"),
            ("First Name", "first_name"),
            ("Last Name", "last_name"),
            ("Email Address", "email_address"),
            ("Course", "course"),
            ("Marks", "mark"),
        ],
    };

    /// Heading list, in column order
    #[must_use]
    pub fn headings(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(heading, _)| *heading).collect()
    }

    /// (heading, element) pairs, in column order
    #[must_use]
    pub const fn fields(&self) -> &'static [(&'static str, &'static str)] {
        self.fields
    }
}

/// Writes result sets to export files.
pub struct Exporter;

impl Exporter {
    /// Export rows to the given path, picking the format from the
    /// filename extension.
    pub fn export(path: &Path, schema: &RowSchema, rows: &[Row]) -> Result<()> {
        let format = ExportFormat::from_path(path).ok_or_else(|| {
            RollbookError::export_failed(format!(
                "Unsupported extension for '{}': use .json or .xml",
                path.display()
            ))
        })?;

        let file = File::create(path).map_err(|e| {
            RollbookError::export_failed(format!("Failed to create '{}': {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);

        match format {
            ExportFormat::Json => write_json(&mut writer, rows)?,
            ExportFormat::Xml => {
                let headings = schema.headings();
                let mappings = to_mappings(&headings, rows);
                write_xml(&mut writer, schema, &mappings)?;
            }
        }

        writer.flush().map_err(|e| {
            RollbookError::export_failed(format!("Failed to write '{}': {e}", path.display()))
        })
    }
}

/// Serialize a value as pretty JSON with a 4-space indent.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| RollbookError::export_failed(format!("Failed to serialize JSON: {e}")))
}

/// Write mapped rows as an indented XML document.
///
/// One `<tuple>` per row under a `<data>` root; each field element is
/// named by the schema and filled from the mapping entry for its heading.
/// Missing entries render as empty elements.
pub fn write_xml<W: Write>(
    writer: W,
    schema: &RowSchema,
    rows: &[Map<String, Value>],
) -> Result<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 4);

    emit(&mut xml, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    emit(&mut xml, Event::Start(BytesStart::new("data")))?;

    for row in rows {
        emit(&mut xml, Event::Start(BytesStart::new("tuple")))?;
        for (heading, element) in schema.fields() {
            let text = row.get(*heading).map(format_cell).unwrap_or_default();
            emit(&mut xml, Event::Start(BytesStart::new(*element)))?;
            emit(&mut xml, Event::Text(BytesText::new(&text)))?;
            emit(&mut xml, Event::End(BytesEnd::new(*element)))?;
        }
        emit(&mut xml, Event::End(BytesEnd::new("tuple")))?;
    }

    emit(&mut xml, Event::End(BytesEnd::new("data")))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| RollbookError::export_failed(format!("Failed to write XML: {e}")))
}
