//! Rollbook CLI Entry Point
//!
//! Opens the student records database, (re)initializes its schema from the
//! bundled script, and hands control to the interactive command loop.
//!
//! The process always exits 0: a connection failure prints a fixed
//! instructional message and ends the session.

use std::path::PathBuf;

use clap::Parser;

use rollbook::{db, repl, Database};

/// Rollbook - Interactive query tool for a student records database
#[derive(Parser)]
#[command(name = "rollbook")]
#[command(about = "Interactive query CLI for a student records database")]
#[command(version)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, default_value = "rollbook.db")]
    database: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let database = Database::open(&cli.database);
    if let Err(err) = database.initialize(db::SCHEMA_SCRIPT) {
        println!("Unable to open the student database at {}.", cli.database.display());
        println!("Please store your database as rollbook.db and restart. ({err})");
        return;
    }

    println!("Welcome to the data querying app!");

    if let Err(err) = repl::run(&database) {
        if err.is_fatal() {
            println!("Lost the connection to {}.", cli.database.display());
            println!("Please store your database as rollbook.db and restart.");
        } else {
            println!("{err}");
        }
    }
}
