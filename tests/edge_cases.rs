//! Edge Case Testing
//!
//! Boundary conditions and unusual inputs across the whole pipeline:
//! command parsing arity, Unicode and XML-hostile text, NULL marks,
//! and larger result sets.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use rollbook::output::{render_table, to_mappings};
use rollbook::{export, Command, Database, ParsedInput, RowSchema, SCHEMA_SCRIPT};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_seeded_db(tag: &str) -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let thread_id = std::thread::current().id();
    let path = std::env::temp_dir().join(format!("rollbook_edge_{tag}_{thread_id:?}_{id}.db"));
    let _ = std::fs::remove_file(&path);

    let db = Database::open(&path);
    db.initialize(SCHEMA_SCRIPT).expect("schema script should run");

    path
}

fn cleanup_db(path: &std::path::Path) {
    let _ = std::fs::remove_file(path);
}

// ============================================================================
// Command Arity
// ============================================================================

#[test]
fn test_every_command_enforces_its_arity() {
    let arities = [
        ("d", 0),
        ("vs", 1),
        ("la", 2),
        ("lr", 1),
        ("lc", 1),
        ("lnc", 0),
        ("lf", 0),
        ("e", 0),
    ];

    for (token, arity) in arities {
        for given in 0..=3 {
            let line = std::iter::once(token)
                .chain(std::iter::repeat("x").take(given))
                .collect::<Vec<_>>()
                .join(" ");
            let parsed = ParsedInput::parse(&line);

            if given == arity {
                assert!(
                    matches!(parsed, ParsedInput::Command(_) | ParsedInput::Exit),
                    "'{line}' should parse cleanly, got {parsed:?}"
                );
            } else {
                assert_eq!(
                    parsed,
                    ParsedInput::BadUsage { command: token.to_string(), expected: arity },
                    "'{line}' should be a usage error"
                );
            }
        }
    }
}

#[test]
fn test_argument_values_pass_through_verbatim() {
    // Identifiers are not validated at parse time; the query layer binds
    // whatever the user typed
    assert_eq!(
        ParsedInput::parse("vs not-a-number"),
        ParsedInput::Command(Command::SubjectsByStudent {
            student_id: "not-a-number".to_string()
        })
    );
}

// ============================================================================
// Unicode and Hostile Text
// ============================================================================

#[test]
fn test_unicode_names_survive_query_and_render() {
    let path = create_seeded_db("unicode");
    let db = Database::open(&path);

    {
        let conn = rusqlite::Connection::open(&path).expect("open seeded database");
        conn.execute(
            "INSERT INTO Address (address_id, street, city) VALUES (9, 'Hauptstraße 1', 'Köln')",
            [],
        )
        .expect("insert address");
        conn.execute(
            "INSERT INTO Student (student_id, first_name, last_name, email, address_id)
             VALUES (9, 'Zoë', 'Müller', 'zoe.muller@example.com', 9)",
            [],
        )
        .expect("insert student");
    }

    let rows = db.address_for_name("Zoë", "Müller").expect("query should succeed");
    assert_eq!(rows, vec![vec![json!("Hauptstraße 1"), json!("Köln")]]);

    let table = render_table(&RowSchema::ADDRESS.headings(), &rows);
    assert!(table.contains("Hauptstraße 1"));
    assert!(table.contains("Köln"));

    cleanup_db(&path);
}

#[test]
fn test_xml_hostile_review_text_is_escaped() {
    let path = create_seeded_db("hostile");
    let db = Database::open(&path);

    {
        let conn = rusqlite::Connection::open(&path).expect("open seeded database");
        conn.execute(
            "INSERT INTO Review
                 (review_id, student_id, completeness, efficiency, style, documentation, review_text)
             VALUES (9, 3, 1, 1, 1, 1, 'Uses <iostream> & \"magic\" constants')",
            [],
        )
        .expect("insert review");
    }

    let rows = db.reviews_for_student("3").expect("query should succeed");
    assert_eq!(rows.len(), 1);

    let headings = RowSchema::REVIEWS.headings();
    let mappings = to_mappings(&headings, &rows);
    let mut buffer = Vec::new();
    export::write_xml(&mut buffer, &RowSchema::REVIEWS, &mappings)
        .expect("export should succeed");
    let xml = String::from_utf8(buffer).unwrap();

    assert!(xml.contains("&lt;iostream&gt;"));
    assert!(xml.contains("&amp;"));
    assert!(!xml.contains("<iostream>"));

    cleanup_db(&path);
}

// ============================================================================
// NULL Handling
// ============================================================================

#[test]
fn test_null_marks_never_count_as_shortfall() {
    let path = create_seeded_db("null_mark");
    let db = Database::open(&path);

    {
        let conn = rusqlite::Connection::open(&path).expect("open seeded database");
        // Completed but never marked
        conn.execute(
            "INSERT INTO StudentCourse (student_id, course_code, is_complete, mark)
             VALUES (4, 'PY101', 1, NULL)",
            [],
        )
        .expect("insert enrolment");
    }

    let rows = db.students_completed_below_threshold().expect("query should succeed");
    for row in &rows {
        assert_ne!(row[0], json!(4), "unmarked completions must not appear");
    }

    cleanup_db(&path);
}

#[test]
fn test_null_cells_render_as_empty_text() {
    let rows = vec![vec![json!("PY101"), Value::Null]];
    let table = render_table(&["Course", "Marks"], &rows);
    assert!(table.contains("PY101"));

    let mappings = to_mappings(&["Course", "Marks"], &rows);
    assert_eq!(mappings[0]["Marks"], Value::Null);
}

// ============================================================================
// Larger Result Sets
// ============================================================================

#[test]
fn test_many_enrolments_return_in_insertion_order() {
    let path = create_seeded_db("many");
    let db = Database::open(&path);

    {
        let mut conn = rusqlite::Connection::open(&path).expect("open seeded database");
        let tx = conn.transaction().expect("begin transaction");
        for i in 0..200 {
            tx.execute(
                "INSERT INTO Course (course_code, course_name, teacher_id)
                 VALUES (?1, ?2, 2)",
                rusqlite::params![format!("X{i:03}"), format!("Elective {i:03}")],
            )
            .expect("insert course");
            tx.execute(
                "INSERT INTO StudentCourse (student_id, course_code, is_complete, mark)
                 VALUES (4, ?1, 0, NULL)",
                rusqlite::params![format!("X{i:03}")],
            )
            .expect("insert enrolment");
        }
        tx.commit().expect("commit seed data");
    }

    let rows = db.subjects_for_student("4").expect("query should succeed");
    // One seeded enrolment plus the 200 electives
    assert_eq!(rows.len(), 201);
    assert_eq!(rows[1], vec![json!("Elective 000")]);
    assert_eq!(rows[200], vec![json!("Elective 199")]);

    cleanup_db(&path);
}
