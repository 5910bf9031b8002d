//! Smoke probe for `school_reviews_core` linkage and schema bootstrap.
//!
//! Usage: `school_reviews_cli [DB_PATH]`. Without a path the store is opened
//! in memory.

use school_reviews_core::db::migrations::latest_version;
use school_reviews_core::db::{open_db, open_db_in_memory};
use school_reviews_core::{SqliteSubjectRepository, SubjectRepository};
use std::process::ExitCode;

const PROBE_SPACE: i64 = 0;

fn main() -> ExitCode {
    let path = std::env::args().nth(1);
    match probe(path.as_deref()) {
        Ok(subjects) => {
            println!("school_reviews_core version={}", school_reviews_core::core_version());
            println!("school_reviews_core schema_version={}", latest_version());
            println!("school_reviews_core probe_space_subjects={subjects}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("school_reviews_core open failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn probe(path: Option<&str>) -> Result<usize, Box<dyn std::error::Error>> {
    let conn = match path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let subjects = SqliteSubjectRepository::new(&conn).list_subjects(PROBE_SPACE)?;
    Ok(subjects.len())
}
