//! Purpose: Deterministic synthetic who-uses-json-v1 payloads for benchmarking.
//! Exports: `PayloadShape`, `make_document`, `make_payload`.
//! Role: Payload synthesizer; builds typed documents and encodes them via the schema encoder.
//! Invariants: Same shape in, byte-identical payload out.
//! Invariants: Summary counts are derived from the shape and always consistent with `results`.

use crate::core::encode;
use crate::core::error::Error;
use crate::core::model::{Document, FileResult, JsonOptions, Match, ProjectResult, Summary};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayloadShape {
    pub term: String,
    pub projects: usize,
    pub files_per_project: usize,
    pub matches_per_file: usize,
}

impl Default for PayloadShape {
    fn default() -> Self {
        Self {
            term: "PHP".to_string(),
            projects: 200,
            files_per_project: 30,
            matches_per_file: 10,
        }
    }
}

pub fn make_document(shape: &PayloadShape) -> Document {
    let matches: Vec<Match> = (0..shape.matches_per_file)
        .map(|i| Match {
            line: i as u64 + 1,
            column: 1,
        })
        .collect();

    let results = (0..shape.projects)
        .map(|p| ProjectResult {
            project: format!("proj{p}"),
            files: (0..shape.files_per_project)
                .map(|f| FileResult {
                    path: format!("src/mod{f}.py"),
                    matches: matches.clone(),
                })
                .collect(),
        })
        .collect();

    let projects = shape.projects as u64;
    let files = projects * shape.files_per_project as u64;
    let summary = Summary {
        projects_with_hits: projects,
        files_with_hits: files,
        total_matches: files * shape.matches_per_file as u64,
    };

    let options = JsonOptions {
        deps_only: false,
        include_venv: false,
        projects_only: true,
    };

    Document::new("scan", shape.term.clone(), options, results, summary)
}

/// Compact JSON bytes for `make_document(shape)`.
pub fn make_payload(shape: &PayloadShape) -> Result<Vec<u8>, Error> {
    encode::to_vec(&make_document(shape))
}
