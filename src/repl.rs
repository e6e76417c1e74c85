//! Interactive Command Loop
//!
//! Reads menu commands line by line, dispatches them against the database,
//! renders the result, and offers to store it. One command is processed
//! fully, export prompt included, before the next line is read.

use std::path::Path;

use dialoguer::{Confirm, Input};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::db::{Database, Row};
use crate::error::{Result, RollbookError};
use crate::export::{ExportFormat, Exporter, RowSchema};
use crate::output;

const MENU: &str = "\
What would you like to do?

d                          - demo: list all student names
vs <student_id>            - view subjects taken by a student
la <firstname> <surname>   - lookup the address for a given first and last name
lr <student_id>            - list all reviews for a given student
lc <teacher_id>            - list all courses given by a teacher
lnc                        - list all students who have not completed their course
lf                         - list all students who completed their course with a mark of 30 or below
e                          - exit this program
";

const PROMPT: &str = "Type your option here: ";
const EXIT_MESSAGE: &str = "Programme exited successfully!";

/// A well-formed menu command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `d`: print every student's full name
    Demo,
    /// `vs`: subjects taken by a student
    SubjectsByStudent { student_id: String },
    /// `la`: address for a first and last name
    AddressByName { first_name: String, last_name: String },
    /// `lr`: reviews for a student
    ReviewsByStudent { student_id: String },
    /// `lc`: courses given by a teacher
    CoursesByTeacher { teacher_id: String },
    /// `lnc`: students with an incomplete course
    IncompleteCourses,
    /// `lf`: students who completed a course with a shortfall mark
    CompletedBelowThreshold,
}

/// One parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// A well-formed command, ready to dispatch
    Command(Command),
    /// The exit token
    Exit,
    /// Blank line
    Empty,
    /// Known token with the wrong number of arguments.
    /// No query runs for these.
    BadUsage { command: String, expected: usize },
    /// Unrecognized token
    Unknown(String),
}

impl ParsedInput {
    /// Parse a whitespace-split command line.
    ///
    /// Argument counts are enforced for every token, including the
    /// zero-argument ones.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Self::Empty;
        };
        let args: Vec<&str> = tokens.collect();

        let bad_usage = |expected| Self::BadUsage { command: command.to_string(), expected };

        match (command, args.as_slice()) {
            ("d", []) => Self::Command(Command::Demo),
            ("vs", [student_id]) => {
                Self::Command(Command::SubjectsByStudent { student_id: (*student_id).to_string() })
            }
            ("la", [first_name, last_name]) => Self::Command(Command::AddressByName {
                first_name: (*first_name).to_string(),
                last_name: (*last_name).to_string(),
            }),
            ("lr", [student_id]) => {
                Self::Command(Command::ReviewsByStudent { student_id: (*student_id).to_string() })
            }
            ("lc", [teacher_id]) => {
                Self::Command(Command::CoursesByTeacher { teacher_id: (*teacher_id).to_string() })
            }
            ("lnc", []) => Self::Command(Command::IncompleteCourses),
            ("lf", []) => Self::Command(Command::CompletedBelowThreshold),
            ("e", []) => Self::Exit,
            ("d" | "lnc" | "lf" | "e", _) => bad_usage(0),
            ("vs" | "lr" | "lc", _) => bad_usage(1),
            ("la", _) => bad_usage(2),
            _ => Self::Unknown(command.to_string()),
        }
    }
}

/// Run the command loop until the user exits.
///
/// Usage errors and unknown commands are reported at the prompt and the
/// loop continues. Errors from the database, the exporter, or the prompts
/// themselves propagate to the caller and end the session.
pub fn run(db: &Database) -> Result<()> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| RollbookError::prompt_failed(format!("Failed to start line editor: {e}")))?;

    loop {
        println!("\n{MENU}");
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                println!("\n{EXIT_MESSAGE}");
                return Ok(());
            }
            Err(e) => {
                return Err(RollbookError::prompt_failed(format!("Failed to read input: {e}")))
            }
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(&line);
        }

        match ParsedInput::parse(&line) {
            ParsedInput::Empty => {}
            ParsedInput::Exit => {
                println!("\n{EXIT_MESSAGE}");
                return Ok(());
            }
            ParsedInput::Unknown(token) => {
                println!("Incorrect command: '{token}'");
            }
            ParsedInput::BadUsage { command, expected } => {
                let plural = if expected == 1 { "argument" } else { "arguments" };
                println!("The {command} command requires {expected} {plural}.");
            }
            ParsedInput::Command(command) => execute(db, &command)?,
        }
    }
}

/// Execute one command: query, render, then offer to store the result
fn execute(db: &Database, command: &Command) -> Result<()> {
    match command {
        Command::Demo => {
            println!("\nAll registered students:\n");
            for (first_name, last_name) in db.student_names()? {
                println!("{first_name} {last_name}");
            }
            Ok(())
        }
        Command::SubjectsByStudent { student_id } => {
            report(db.subjects_for_student(student_id)?, &RowSchema::SUBJECTS)
        }
        Command::AddressByName { first_name, last_name } => {
            report(db.address_for_name(first_name, last_name)?, &RowSchema::ADDRESS)
        }
        Command::ReviewsByStudent { student_id } => {
            let rows = db.reviews_for_student(student_id)?;
            for row in &rows {
                println!("\n{}", output::review_block(row));
            }
            offer_to_store(&RowSchema::REVIEWS, &rows)
        }
        Command::CoursesByTeacher { teacher_id } => {
            report(db.courses_for_teacher(teacher_id)?, &RowSchema::SUBJECTS)
        }
        Command::IncompleteCourses => {
            report(db.students_with_incomplete_courses()?, &RowSchema::INCOMPLETE)
        }
        Command::CompletedBelowThreshold => {
            report(db.students_completed_below_threshold()?, &RowSchema::SHORTFALL)
        }
    }
}

/// Print rows as a table, then offer to store them
fn report(rows: Vec<Row>, schema: &RowSchema) -> Result<()> {
    let headings = schema.headings();
    println!("\n{}", output::render_table(&headings, &rows));
    offer_to_store(schema, &rows)
}

/// Ask whether to store the result and, if so, where.
///
/// The offer is made even for empty result sets. The filename prompt
/// rejects anything without a `.json` or `.xml` extension and asks again.
fn offer_to_store(schema: &RowSchema, rows: &[Row]) -> Result<()> {
    let store = Confirm::new()
        .with_prompt("Would you like to store this result?")
        .default(false)
        .interact()
        .map_err(|e| RollbookError::prompt_failed(format!("Failed to read choice: {e}")))?;
    if !store {
        return Ok(());
    }

    let filename: String = Input::new()
        .with_prompt("Specify filename. Must end in .xml or .json")
        .validate_with(|name: &String| match ExportFormat::from_path(Path::new(name)) {
            Some(_) => Ok(()),
            None => Err("Invalid file extension. Please use .xml or .json"),
        })
        .interact_text()
        .map_err(|e| RollbookError::prompt_failed(format!("Failed to read filename: {e}")))?;

    Exporter::export(Path::new(&filename), schema, rows)?;
    println!("Result stored in {filename}");
    Ok(())
}
