//! Purpose: Declarative model of the who-uses-json-v1 document shape.
//! Exports: `SCHEMA_TAG`, `FieldSpec`, `FieldKind`, `IntRule`, `ObjectSchema`, per-object tables.
//! Role: Single source of wire names, internal names, field order, and constraints.
//! Invariants: Field tables list fields in canonical serialization order.
//! Invariants: Every object is closed; a key absent from its table is rejected.
//! Notes: `schema` is a wire name only; the typed model calls it `schema_tag`.

pub const SCHEMA_TAG: &str = "who-uses-json-v1";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntRule {
    /// Integer >= 1.
    Positive,
    /// Integer >= 0.
    NonNegative,
}

#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    Literal(&'static str),
    Text,
    Flag,
    Int(IntRule),
    Object(&'static ObjectSchema),
    List(&'static ObjectSchema),
}

impl FieldKind {
    /// Short type label used in wrong-type diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Literal(_) => "string literal",
            FieldKind::Text => "string",
            FieldKind::Flag => "boolean",
            FieldKind::Int(IntRule::Positive) => "positive integer",
            FieldKind::Int(IntRule::NonNegative) => "non-negative integer",
            FieldKind::Object(_) => "object",
            FieldKind::List(_) => "array",
        }
    }
}

/// One entry of the wire name <-> internal name table.
#[derive(Debug)]
pub struct FieldSpec {
    pub wire: &'static str,
    pub internal: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug)]
pub struct ObjectSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ObjectSchema {
    pub fn by_wire(&self, wire: &str) -> Option<(usize, &'static FieldSpec)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.wire == wire)
    }

    pub fn by_internal(&self, internal: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.internal == internal)
    }

    /// First declared field whose bit is unset in `seen`.
    pub fn first_missing(&self, seen: u64) -> Option<&'static FieldSpec> {
        self.fields
            .iter()
            .enumerate()
            .find(|(idx, _)| seen & (1u64 << idx) == 0)
            .map(|(_, field)| field)
    }

    pub fn wire_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.wire)
    }
}

const fn field(wire: &'static str, internal: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        wire,
        internal,
        kind,
    }
}

pub static MATCH: ObjectSchema = ObjectSchema {
    name: "Match",
    fields: &[
        field("line", "line", FieldKind::Int(IntRule::Positive)),
        field("column", "column", FieldKind::Int(IntRule::Positive)),
    ],
};

pub static FILE_RESULT: ObjectSchema = ObjectSchema {
    name: "FileResult",
    fields: &[
        field("path", "path", FieldKind::Text),
        field("matches", "matches", FieldKind::List(&MATCH)),
    ],
};

pub static PROJECT_RESULT: ObjectSchema = ObjectSchema {
    name: "ProjectResult",
    fields: &[
        field("project", "project", FieldKind::Text),
        field("files", "files", FieldKind::List(&FILE_RESULT)),
    ],
};

pub static SUMMARY: ObjectSchema = ObjectSchema {
    name: "Summary",
    fields: &[
        field(
            "projects_with_hits",
            "projects_with_hits",
            FieldKind::Int(IntRule::NonNegative),
        ),
        field(
            "files_with_hits",
            "files_with_hits",
            FieldKind::Int(IntRule::NonNegative),
        ),
        field(
            "total_matches",
            "total_matches",
            FieldKind::Int(IntRule::NonNegative),
        ),
    ],
};

pub static OPTIONS: ObjectSchema = ObjectSchema {
    name: "JsonOptions",
    fields: &[
        field("deps_only", "deps_only", FieldKind::Flag),
        field("include_venv", "include_venv", FieldKind::Flag),
        field("projects_only", "projects_only", FieldKind::Flag),
    ],
};

pub static DOCUMENT: ObjectSchema = ObjectSchema {
    name: "Document",
    fields: &[
        field("schema", "schema_tag", FieldKind::Literal(SCHEMA_TAG)),
        field("cmd", "cmd", FieldKind::Text),
        field("term", "term", FieldKind::Text),
        field("options", "options", FieldKind::Object(&OPTIONS)),
        field("results", "results", FieldKind::List(&PROJECT_RESULT)),
        field("summary", "summary", FieldKind::Object(&SUMMARY)),
    ],
};
