//! Purpose: Strongly-typed who-uses-json-v1 document entities.
//! Exports: `Document`, `JsonOptions`, `ProjectResult`, `FileResult`, `Match`, `Summary`.
//! Role: Output of the binder and input of the encoder; plain immutable data.
//! Invariants: `Match` line/column are >= 1 once bound; sequences keep input order.
//! Invariants: `Summary` is carried as given and never recomputed from `results`.

use crate::core::schema::SCHEMA_TAG;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Match {
    pub line: u64,
    pub column: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileResult {
    pub path: String,
    pub matches: Vec<Match>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectResult {
    pub project: String,
    pub files: Vec<FileResult>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub projects_with_hits: u64,
    pub files_with_hits: u64,
    pub total_matches: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct JsonOptions {
    pub deps_only: bool,
    pub include_venv: bool,
    pub projects_only: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Document {
    schema_tag: &'static str,
    pub cmd: String,
    pub term: String,
    pub options: JsonOptions,
    pub results: Vec<ProjectResult>,
    pub summary: Summary,
}

impl Document {
    pub fn new(
        cmd: impl Into<String>,
        term: impl Into<String>,
        options: JsonOptions,
        results: Vec<ProjectResult>,
        summary: Summary,
    ) -> Self {
        Self {
            schema_tag: SCHEMA_TAG,
            cmd: cmd.into(),
            term: term.into(),
            options,
            results,
            summary,
        }
    }

    /// Always `SCHEMA_TAG`; serialized under the wire key `schema`.
    pub fn schema_tag(&self) -> &'static str {
        self.schema_tag
    }

    pub fn match_count(&self) -> u64 {
        self.results
            .iter()
            .flat_map(|project| project.files.iter())
            .map(|file| file.matches.len() as u64)
            .sum()
    }
}
