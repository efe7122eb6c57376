//! Purpose: Bind JSON input to a typed `Document` while enforcing the closed schema.
//! Exports: `bind_slice` (decode + bind in one pass), `bind_value` (bind a generic tree).
//! Role: Validator/binder; both entrypoints share one set of serde visitors.
//! Invariants: Objects are closed; an undeclared key fails `extra_field_forbidden` when reached.
//! Invariants: Absent keys fail `missing_field` after the object ends, in declared order.
//! Invariants: Fail-fast; the first violation wins and no partial document is returned.
//! Notes: The failing path is recorded while the error unwinds, so valid input pays nothing.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use serde_json::error::Category;

use crate::core::error::{Constraint, Error};
use crate::core::model::{Document, FileResult, JsonOptions, Match, ProjectResult, Summary};
use crate::core::schema::{self, FieldKind, FieldSpec, IntRule, ObjectSchema};
use crate::json::parse;

/// Decode and bind raw bytes in a single pass.
pub fn bind_slice(input: &[u8]) -> Result<Document, Error> {
    parse::ensure_not_blank(input)?;
    let trail = Trail::default();
    let mut de = serde_json::Deserializer::from_slice(input);
    let bound = RecordSeed::<Document>::new(&trail)
        .deserialize(&mut de)
        .and_then(|doc| de.end().map(|()| doc));
    bound.map_err(|err| trail.into_error(err, input))
}

/// Bind an already-decoded generic tree.
pub fn bind_value(value: &Value) -> Result<Document, Error> {
    let trail = Trail::default();
    RecordSeed::<Document>::new(&trail)
        .deserialize(value)
        .map_err(|err| trail.into_error(err, &[]))
}

enum Segment {
    Key(Cow<'static, str>),
    Index(usize),
}

/// Failure breadcrumbs, pushed innermost-first as an error propagates.
#[derive(Default)]
struct Trail {
    segments: RefCell<Vec<Segment>>,
    constraint: Cell<Option<Constraint>>,
}

impl Trail {
    fn at_key<E>(&self, wire: &'static str, err: E) -> E {
        self.segments
            .borrow_mut()
            .push(Segment::Key(Cow::Borrowed(wire)));
        err
    }

    fn at_index<E>(&self, idx: usize, err: E) -> E {
        self.segments.borrow_mut().push(Segment::Index(idx));
        err
    }

    fn violation<E: de::Error>(&self, constraint: Constraint, message: fmt::Arguments<'_>) -> E {
        if self.constraint.get().is_none() {
            self.constraint.set(Some(constraint));
        }
        E::custom(message)
    }

    fn extra_field<E: de::Error>(&self, schema: &ObjectSchema, key: &str) -> E {
        self.segments
            .borrow_mut()
            .push(Segment::Key(Cow::Owned(key.to_string())));
        let expected: Vec<_> = schema.wire_names().collect();
        self.violation(
            Constraint::ExtraFieldForbidden,
            format_args!(
                "unknown field `{key}` in {}, expected one of {}",
                schema.name,
                expected.join(", ")
            ),
        )
    }

    fn missing_field<E: de::Error>(&self, schema: &ObjectSchema, field: &'static FieldSpec) -> E {
        self.segments
            .borrow_mut()
            .push(Segment::Key(Cow::Borrowed(field.wire)));
        self.violation(
            Constraint::MissingField,
            format_args!("missing field `{}` in {}", field.wire, schema.name),
        )
    }

    fn path(&self) -> String {
        let segments = self.segments.borrow();
        if segments.is_empty() {
            return "$".to_string();
        }
        let mut out = String::new();
        for segment in segments.iter().rev() {
            match segment {
                Segment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                Segment::Index(idx) => {
                    out.push('[');
                    out.push_str(&idx.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    fn into_error(&self, err: serde_json::Error, input: &[u8]) -> Error {
        match err.classify() {
            Category::Data => {
                let constraint = self.constraint.get().unwrap_or(Constraint::WrongType);
                Error::validation(constraint, self.path())
                    .with_message(parse::error_reason(&err))
                    .with_source(err)
            }
            Category::Syntax | Category::Eof | Category::Io => {
                parse::serde_decode_error(err, input, "bind")
            }
        }
    }
}

/// A schema object that binds from a JSON mapping.
trait Record: Sized {
    type Slots: Default;

    fn schema() -> &'static ObjectSchema;

    fn accept<'de, A>(
        slots: &mut Self::Slots,
        field: &'static FieldSpec,
        map: &mut A,
        trail: &Trail,
    ) -> Result<(), A::Error>
    where
        A: MapAccess<'de>;

    fn finish<E: de::Error>(slots: Self::Slots, trail: &Trail) -> Result<Self, E>;
}

/// Moves bound slots out, reporting an empty slot as `missing_field`.
struct Take<'t, E> {
    schema: &'static ObjectSchema,
    trail: &'t Trail,
    marker: PhantomData<fn() -> E>,
}

impl<'t, E: de::Error> Take<'t, E> {
    fn new(schema: &'static ObjectSchema, trail: &'t Trail) -> Self {
        Self {
            schema,
            trail,
            marker: PhantomData,
        }
    }

    fn slot<T>(&self, slot: Option<T>, internal: &str) -> Result<T, E> {
        match slot {
            Some(value) => Ok(value),
            None => match self.schema.by_internal(internal) {
                Some(field) => Err(self.trail.missing_field(self.schema, field)),
                None => Err(unbound(self.schema, internal)),
            },
        }
    }
}

fn unbound<E: de::Error>(schema: &ObjectSchema, internal: &str) -> E {
    E::custom(format_args!(
        "{} field `{internal}` has no binding",
        schema.name
    ))
}

struct RecordSeed<'t, T> {
    trail: &'t Trail,
    marker: PhantomData<fn() -> T>,
}

impl<'t, T> RecordSeed<'t, T> {
    fn new(trail: &'t Trail) -> Self {
        Self {
            trail,
            marker: PhantomData,
        }
    }
}

impl<'de, T: Record> DeserializeSeed<'de> for RecordSeed<'_, T> {
    type Value = T;

    fn deserialize<D>(self, deserializer: D) -> Result<T, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, T: Record> Visitor<'de> for RecordSeed<'_, T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} object", T::schema().name)
    }

    fn visit_map<A>(self, mut map: A) -> Result<T, A::Error>
    where
        A: MapAccess<'de>,
    {
        let schema = T::schema();
        let mut slots = T::Slots::default();
        let mut seen = 0u64;
        while let Some((idx, field)) = map.next_key_seed(KeySeed {
            schema,
            trail: self.trail,
        })? {
            T::accept(&mut slots, field, &mut map, self.trail)
                .map_err(|err| self.trail.at_key(field.wire, err))?;
            seen |= 1u64 << idx;
        }
        if let Some(field) = schema.first_missing(seen) {
            return Err(self.trail.missing_field(schema, field));
        }
        T::finish(slots, self.trail)
    }
}

struct KeySeed<'t> {
    schema: &'static ObjectSchema,
    trail: &'t Trail,
}

impl<'de> DeserializeSeed<'de> for KeySeed<'_> {
    type Value = (usize, &'static FieldSpec);

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for KeySeed<'_> {
    type Value = (usize, &'static FieldSpec);

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} field name", self.schema.name)
    }

    fn visit_str<E: de::Error>(self, key: &str) -> Result<Self::Value, E> {
        self.schema
            .by_wire(key)
            .ok_or_else(|| self.trail.extra_field(self.schema, key))
    }
}

struct ListSeed<'t, T> {
    trail: &'t Trail,
    marker: PhantomData<fn() -> T>,
}

impl<'t, T> ListSeed<'t, T> {
    fn new(trail: &'t Trail) -> Self {
        Self {
            trail,
            marker: PhantomData,
        }
    }
}

impl<'de, T: Record> DeserializeSeed<'de> for ListSeed<'_, T> {
    type Value = Vec<T>;

    fn deserialize<D>(self, deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, T: Record> Visitor<'de> for ListSeed<'_, T> {
    type Value = Vec<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array of {} objects", T::schema().name)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Vec<T>, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        loop {
            let idx = items.len();
            let next = seq
                .next_element_seed(RecordSeed::<T>::new(self.trail))
                .map_err(|err| self.trail.at_index(idx, err))?;
            match next {
                Some(item) => items.push(item),
                None => return Ok(items),
            }
        }
    }
}

struct TextSeed;

impl<'de> DeserializeSeed<'de> for TextSeed {
    type Value = String;

    fn deserialize<D>(self, deserializer: D) -> Result<String, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_string(self)
    }
}

impl<'de> Visitor<'de> for TextSeed {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.to_owned())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
        Ok(value)
    }
}

struct FlagSeed;

impl<'de> DeserializeSeed<'de> for FlagSeed {
    type Value = bool;

    fn deserialize<D>(self, deserializer: D) -> Result<bool, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_bool(self)
    }
}

impl<'de> Visitor<'de> for FlagSeed {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("boolean")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
        Ok(value)
    }
}

struct IntSeed<'t> {
    field: &'static FieldSpec,
    rule: IntRule,
    trail: &'t Trail,
}

impl<'t> IntSeed<'t> {
    fn new<E: de::Error>(field: &'static FieldSpec, trail: &'t Trail) -> Result<Self, E> {
        match field.kind {
            FieldKind::Int(rule) => Ok(Self { field, rule, trail }),
            _ => Err(E::custom(format_args!(
                "field `{}` is not declared as an integer",
                field.wire
            ))),
        }
    }
}

impl<'de> DeserializeSeed<'de> for IntSeed<'_> {
    type Value = u64;

    fn deserialize<D>(self, deserializer: D) -> Result<u64, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_u64(self)
    }
}

impl<'de> Visitor<'de> for IntSeed<'_> {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field.kind.label())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
        if value == 0 && self.rule == IntRule::Positive {
            return Err(self.trail.violation(
                Constraint::NotPositive,
                format_args!("`{}` must be >= 1, got 0", self.field.wire),
            ));
        }
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
        if value >= 0 {
            return self.visit_u64(value as u64);
        }
        Err(self.trail.violation(
            Constraint::NotPositive,
            format_args!(
                "`{}` must be a {}, got {value}",
                self.field.wire,
                self.field.kind.label()
            ),
        ))
    }

    // serde_json decodes the integer literal `-0` as a negative-zero float.
    fn visit_f64<E: de::Error>(self, value: f64) -> Result<u64, E> {
        if value == 0.0 && value.is_sign_negative() {
            return self.visit_u64(0);
        }
        Err(E::invalid_type(de::Unexpected::Float(value), &self))
    }
}

struct LiteralSeed<'t> {
    field: &'static FieldSpec,
    expected: &'static str,
    trail: &'t Trail,
}

impl<'t> LiteralSeed<'t> {
    fn new<E: de::Error>(field: &'static FieldSpec, trail: &'t Trail) -> Result<Self, E> {
        match field.kind {
            FieldKind::Literal(expected) => Ok(Self {
                field,
                expected,
                trail,
            }),
            _ => Err(E::custom(format_args!(
                "field `{}` is not declared as a literal",
                field.wire
            ))),
        }
    }
}

impl<'de> DeserializeSeed<'de> for LiteralSeed<'_> {
    type Value = &'static str;

    fn deserialize<D>(self, deserializer: D) -> Result<&'static str, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for LiteralSeed<'_> {
    type Value = &'static str;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the string \"{}\"", self.expected)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<&'static str, E> {
        if value == self.expected {
            return Ok(self.expected);
        }
        Err(self.trail.violation(
            Constraint::LiteralMismatch,
            format_args!(
                "`{}` must be exactly \"{}\", got {value:?}",
                self.field.wire, self.expected
            ),
        ))
    }
}

#[derive(Default)]
struct MatchSlots {
    line: Option<u64>,
    column: Option<u64>,
}

impl Record for Match {
    type Slots = MatchSlots;

    fn schema() -> &'static ObjectSchema {
        &schema::MATCH
    }

    fn accept<'de, A>(
        slots: &mut MatchSlots,
        field: &'static FieldSpec,
        map: &mut A,
        trail: &Trail,
    ) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        match field.internal {
            "line" => slots.line = Some(map.next_value_seed(IntSeed::new::<A::Error>(field, trail)?)?),
            "column" => slots.column = Some(map.next_value_seed(IntSeed::new::<A::Error>(field, trail)?)?),
            other => return Err(unbound(Self::schema(), other)),
        }
        Ok(())
    }

    fn finish<E: de::Error>(slots: MatchSlots, trail: &Trail) -> Result<Self, E> {
        let take = Take::<E>::new(Self::schema(), trail);
        Ok(Match {
            line: take.slot(slots.line, "line")?,
            column: take.slot(slots.column, "column")?,
        })
    }
}

#[derive(Default)]
struct FileResultSlots {
    path: Option<String>,
    matches: Option<Vec<Match>>,
}

impl Record for FileResult {
    type Slots = FileResultSlots;

    fn schema() -> &'static ObjectSchema {
        &schema::FILE_RESULT
    }

    fn accept<'de, A>(
        slots: &mut FileResultSlots,
        field: &'static FieldSpec,
        map: &mut A,
        trail: &Trail,
    ) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        match field.internal {
            "path" => slots.path = Some(map.next_value_seed(TextSeed)?),
            "matches" => slots.matches = Some(map.next_value_seed(ListSeed::<Match>::new(trail))?),
            other => return Err(unbound(Self::schema(), other)),
        }
        Ok(())
    }

    fn finish<E: de::Error>(slots: FileResultSlots, trail: &Trail) -> Result<Self, E> {
        let take = Take::<E>::new(Self::schema(), trail);
        Ok(FileResult {
            path: take.slot(slots.path, "path")?,
            matches: take.slot(slots.matches, "matches")?,
        })
    }
}

#[derive(Default)]
struct ProjectResultSlots {
    project: Option<String>,
    files: Option<Vec<FileResult>>,
}

impl Record for ProjectResult {
    type Slots = ProjectResultSlots;

    fn schema() -> &'static ObjectSchema {
        &schema::PROJECT_RESULT
    }

    fn accept<'de, A>(
        slots: &mut ProjectResultSlots,
        field: &'static FieldSpec,
        map: &mut A,
        trail: &Trail,
    ) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        match field.internal {
            "project" => slots.project = Some(map.next_value_seed(TextSeed)?),
            "files" => slots.files = Some(map.next_value_seed(ListSeed::<FileResult>::new(trail))?),
            other => return Err(unbound(Self::schema(), other)),
        }
        Ok(())
    }

    fn finish<E: de::Error>(slots: ProjectResultSlots, trail: &Trail) -> Result<Self, E> {
        let take = Take::<E>::new(Self::schema(), trail);
        Ok(ProjectResult {
            project: take.slot(slots.project, "project")?,
            files: take.slot(slots.files, "files")?,
        })
    }
}

#[derive(Default)]
struct SummarySlots {
    projects_with_hits: Option<u64>,
    files_with_hits: Option<u64>,
    total_matches: Option<u64>,
}

impl Record for Summary {
    type Slots = SummarySlots;

    fn schema() -> &'static ObjectSchema {
        &schema::SUMMARY
    }

    fn accept<'de, A>(
        slots: &mut SummarySlots,
        field: &'static FieldSpec,
        map: &mut A,
        trail: &Trail,
    ) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let count = map.next_value_seed(IntSeed::new::<A::Error>(field, trail)?)?;
        match field.internal {
            "projects_with_hits" => slots.projects_with_hits = Some(count),
            "files_with_hits" => slots.files_with_hits = Some(count),
            "total_matches" => slots.total_matches = Some(count),
            other => return Err(unbound(Self::schema(), other)),
        }
        Ok(())
    }

    fn finish<E: de::Error>(slots: SummarySlots, trail: &Trail) -> Result<Self, E> {
        let take = Take::<E>::new(Self::schema(), trail);
        Ok(Summary {
            projects_with_hits: take.slot(slots.projects_with_hits, "projects_with_hits")?,
            files_with_hits: take.slot(slots.files_with_hits, "files_with_hits")?,
            total_matches: take.slot(slots.total_matches, "total_matches")?,
        })
    }
}

#[derive(Default)]
struct OptionsSlots {
    deps_only: Option<bool>,
    include_venv: Option<bool>,
    projects_only: Option<bool>,
}

impl Record for JsonOptions {
    type Slots = OptionsSlots;

    fn schema() -> &'static ObjectSchema {
        &schema::OPTIONS
    }

    fn accept<'de, A>(
        slots: &mut OptionsSlots,
        field: &'static FieldSpec,
        map: &mut A,
        _trail: &Trail,
    ) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let flag = map.next_value_seed(FlagSeed)?;
        match field.internal {
            "deps_only" => slots.deps_only = Some(flag),
            "include_venv" => slots.include_venv = Some(flag),
            "projects_only" => slots.projects_only = Some(flag),
            other => return Err(unbound(Self::schema(), other)),
        }
        Ok(())
    }

    fn finish<E: de::Error>(slots: OptionsSlots, trail: &Trail) -> Result<Self, E> {
        let take = Take::<E>::new(Self::schema(), trail);
        Ok(JsonOptions {
            deps_only: take.slot(slots.deps_only, "deps_only")?,
            include_venv: take.slot(slots.include_venv, "include_venv")?,
            projects_only: take.slot(slots.projects_only, "projects_only")?,
        })
    }
}

#[derive(Default)]
struct DocumentSlots {
    schema_tag: Option<&'static str>,
    cmd: Option<String>,
    term: Option<String>,
    options: Option<JsonOptions>,
    results: Option<Vec<ProjectResult>>,
    summary: Option<Summary>,
}

impl Record for Document {
    type Slots = DocumentSlots;

    fn schema() -> &'static ObjectSchema {
        &schema::DOCUMENT
    }

    fn accept<'de, A>(
        slots: &mut DocumentSlots,
        field: &'static FieldSpec,
        map: &mut A,
        trail: &Trail,
    ) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        match field.internal {
            "schema_tag" => {
                slots.schema_tag = Some(map.next_value_seed(LiteralSeed::new::<A::Error>(field, trail)?)?)
            }
            "cmd" => slots.cmd = Some(map.next_value_seed(TextSeed)?),
            "term" => slots.term = Some(map.next_value_seed(TextSeed)?),
            "options" => {
                slots.options = Some(map.next_value_seed(RecordSeed::<JsonOptions>::new(trail))?)
            }
            "results" => {
                slots.results = Some(map.next_value_seed(ListSeed::<ProjectResult>::new(trail))?)
            }
            "summary" => {
                slots.summary = Some(map.next_value_seed(RecordSeed::<Summary>::new(trail))?)
            }
            other => return Err(unbound(Self::schema(), other)),
        }
        Ok(())
    }

    fn finish<E: de::Error>(slots: DocumentSlots, trail: &Trail) -> Result<Self, E> {
        let take = Take::<E>::new(Self::schema(), trail);
        take.slot(slots.schema_tag, "schema_tag")?;
        Ok(Document::new(
            take.slot(slots.cmd, "cmd")?,
            take.slot(slots.term, "term")?,
            take.slot(slots.options, "options")?,
            take.slot(slots.results, "results")?,
            take.slot(slots.summary, "summary")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{bind_slice, bind_value};
    use crate::core::error::{Constraint, ErrorKind};
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "schema": "who-uses-json-v1",
            "cmd": "scan",
            "term": "PHP",
            "options": {"deps_only": false, "include_venv": false, "projects_only": true},
            "results": [],
            "summary": {"projects_with_hits": 0, "files_with_hits": 0, "total_matches": 0}
        })
    }

    #[test]
    fn minimal_document_binds_from_both_entrypoints() {
        let value = minimal();
        let bytes = serde_json::to_vec(&value).unwrap();
        let from_tree = bind_value(&value).expect("tree");
        let from_bytes = bind_slice(&bytes).expect("bytes");
        assert_eq!(from_tree, from_bytes);
        assert_eq!(from_tree.schema_tag(), "who-uses-json-v1");
        assert!(from_tree.options.projects_only);
    }

    #[test]
    fn root_that_is_not_an_object_is_wrong_type_at_root() {
        let err = bind_slice(b"[1,2]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.constraint(), Some(Constraint::WrongType));
        assert_eq!(err.field(), Some("$"));
    }

    #[test]
    fn missing_root_key_names_the_key() {
        let mut value = minimal();
        value.as_object_mut().unwrap().remove("cmd");
        let err = bind_value(&value).unwrap_err();
        assert_eq!(err.constraint(), Some(Constraint::MissingField));
        assert_eq!(err.field(), Some("cmd"));
    }

    #[test]
    fn negative_summary_count_is_rejected() {
        let mut value = minimal();
        value["summary"]["total_matches"] = json!(-1);
        let err = bind_value(&value).unwrap_err();
        assert_eq!(err.constraint(), Some(Constraint::NotPositive));
        assert_eq!(err.field(), Some("summary.total_matches"));
    }

    #[test]
    fn float_and_string_counts_are_wrong_type() {
        for bad in [json!(1.0), json!("1"), json!(null), json!(true)] {
            let mut value = minimal();
            value["summary"]["files_with_hits"] = bad.clone();
            let err = bind_value(&value).unwrap_err();
            assert_eq!(err.constraint(), Some(Constraint::WrongType), "input {bad}");
            assert_eq!(err.field(), Some("summary.files_with_hits"));
        }
    }

    #[test]
    fn syntax_error_in_fused_path_is_decode_error() {
        let err = bind_slice(br#"{"schema": "who-uses-json-v1",,}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.offset().is_some());
    }

    #[test]
    fn trailing_garbage_after_valid_document_is_decode_error() {
        let mut bytes = serde_json::to_vec(&minimal()).unwrap();
        bytes.extend_from_slice(b" {}");
        let err = bind_slice(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn blank_input_is_empty_input() {
        let err = bind_slice(b" \n ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }
}
