//! Purpose: Deterministic serialization of a bound `Document` back to JSON bytes.
//! Exports: `to_vec`, `to_vec_pretty`, `to_writer`; `serde::Serialize` impls for the model.
//! Role: Encoder; field names and order come from the schema tables, not from the structs.
//! Invariants: Output re-binds to an equal `Document`.
//! Invariants: Integers render as plain decimals; strings use standard JSON escaping.

use std::io::Write;

use serde::ser::{self, Serialize, SerializeStruct, Serializer};

use crate::core::error::{Error, ErrorKind};
use crate::core::model::{Document, FileResult, JsonOptions, Match, ProjectResult, Summary};
use crate::core::schema::{self, ObjectSchema};

pub fn to_vec(document: &Document) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(document).map_err(encode_error)
}

pub fn to_vec_pretty(document: &Document) -> Result<Vec<u8>, Error> {
    serde_json::to_vec_pretty(document).map_err(encode_error)
}

pub fn to_writer<W: Write>(writer: W, document: &Document) -> Result<(), Error> {
    serde_json::to_writer(writer, document).map_err(|err| {
        if err.is_io() {
            Error::new(ErrorKind::Io)
                .with_message("failed to write document")
                .with_source(err)
        } else {
            encode_error(err)
        }
    })
}

fn encode_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("document encode failed")
        .with_source(err)
}

fn unbound<E: ser::Error>(schema: &ObjectSchema, internal: &str) -> E {
    E::custom(format_args!(
        "{} field `{internal}` has no encoding",
        schema.name
    ))
}

impl Serialize for Match {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let schema = &schema::MATCH;
        let mut out = serializer.serialize_struct(schema.name, schema.fields.len())?;
        for field in schema.fields {
            match field.internal {
                "line" => out.serialize_field(field.wire, &self.line)?,
                "column" => out.serialize_field(field.wire, &self.column)?,
                other => return Err(unbound(schema, other)),
            }
        }
        out.end()
    }
}

impl Serialize for FileResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let schema = &schema::FILE_RESULT;
        let mut out = serializer.serialize_struct(schema.name, schema.fields.len())?;
        for field in schema.fields {
            match field.internal {
                "path" => out.serialize_field(field.wire, &self.path)?,
                "matches" => out.serialize_field(field.wire, &self.matches)?,
                other => return Err(unbound(schema, other)),
            }
        }
        out.end()
    }
}

impl Serialize for ProjectResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let schema = &schema::PROJECT_RESULT;
        let mut out = serializer.serialize_struct(schema.name, schema.fields.len())?;
        for field in schema.fields {
            match field.internal {
                "project" => out.serialize_field(field.wire, &self.project)?,
                "files" => out.serialize_field(field.wire, &self.files)?,
                other => return Err(unbound(schema, other)),
            }
        }
        out.end()
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let schema = &schema::SUMMARY;
        let mut out = serializer.serialize_struct(schema.name, schema.fields.len())?;
        for field in schema.fields {
            let count = match field.internal {
                "projects_with_hits" => self.projects_with_hits,
                "files_with_hits" => self.files_with_hits,
                "total_matches" => self.total_matches,
                other => return Err(unbound(schema, other)),
            };
            out.serialize_field(field.wire, &count)?;
        }
        out.end()
    }
}

impl Serialize for JsonOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let schema = &schema::OPTIONS;
        let mut out = serializer.serialize_struct(schema.name, schema.fields.len())?;
        for field in schema.fields {
            let flag = match field.internal {
                "deps_only" => self.deps_only,
                "include_venv" => self.include_venv,
                "projects_only" => self.projects_only,
                other => return Err(unbound(schema, other)),
            };
            out.serialize_field(field.wire, &flag)?;
        }
        out.end()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let schema = &schema::DOCUMENT;
        let mut out = serializer.serialize_struct(schema.name, schema.fields.len())?;
        for field in schema.fields {
            match field.internal {
                "schema_tag" => out.serialize_field(field.wire, self.schema_tag())?,
                "cmd" => out.serialize_field(field.wire, &self.cmd)?,
                "term" => out.serialize_field(field.wire, &self.term)?,
                "options" => out.serialize_field(field.wire, &self.options)?,
                "results" => out.serialize_field(field.wire, &self.results)?,
                "summary" => out.serialize_field(field.wire, &self.summary)?,
                other => return Err(unbound(schema, other)),
            }
        }
        out.end()
    }
}
