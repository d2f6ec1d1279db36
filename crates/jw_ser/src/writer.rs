//! The recursive writer: shape dispatch, emitters, and the public entry
//! points.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use jw_reflect::{Record, ToValue, Value, registry};

use crate::escape::escape;
use crate::layout;

// -----------------------------------------------------------------------------
// Entry points

/// Serializes the given value. All readable record fields are serialized.
///
/// When `format` is `true` the output is indented four spaces per nesting
/// level with platform line breaks; otherwise it is a single compact line.
/// No trailing newline is appended either way.
///
/// # Examples
///
/// ```
/// use jw_ser::serialize;
///
/// assert_eq!(serialize(&true, false), "true");
/// assert_eq!(serialize(&vec![1, 2, 3], false), "[1,2,3]");
/// assert_eq!(serialize(&None::<i32>, false), "{ }");
///
/// // Quoting is decided from the canonical text alone, so string content
/// // that reads as a number or boolean is emitted bare.
/// assert_eq!(serialize(&"42", false), "42");
/// assert_eq!(serialize(&"forty-two", false), "\"forty-two\"");
/// ```
pub fn serialize<T: ToValue + ?Sized>(value: &T, format: bool) -> String {
    JsonWriter::new(format).render(&value.to_value())
}

/// Serializes the given value, keeping only the named record fields.
///
/// The filter applies to every record reached during the pass; mapping keys
/// and sequence elements are never filtered.
///
/// # Examples
///
/// ```
/// use jw_reflect::impl_record;
/// use jw_ser::serialize_only;
///
/// #[derive(Clone)]
/// struct User {
///     id: u32,
///     name: String,
/// }
/// impl_record!(User { id, name });
///
/// let user = User { id: 7, name: "geo".to_owned() };
/// assert_eq!(serialize_only(&user, false, &["id"]), "{\"id\": 7}");
/// ```
pub fn serialize_only<T: ToValue + ?Sized>(value: &T, format: bool, names: &[&str]) -> String {
    JsonWriter::with_filters(format, names, &[]).render(&value.to_value())
}

/// Serializes the given value, dropping the named record fields.
///
/// The filter applies to every record reached during the pass; mapping keys
/// and sequence elements are never filtered.
pub fn serialize_excluding<T: ToValue + ?Sized>(value: &T, format: bool, names: &[&str]) -> String {
    JsonWriter::with_filters(format, &[], names).render(&value.to_value())
}

// -----------------------------------------------------------------------------
// JsonWriter

/// One depth-first serialization pass over a [`Value`].
///
/// The writer is immutable during traversal; each emitter returns its
/// fragment as an owned string so parents can inspect how a nested fragment
/// opens before splicing it in.
pub struct JsonWriter<'a> {
    format: bool,
    include: &'a [&'a str],
    exclude: &'a [&'a str],
}

impl<'a> JsonWriter<'a> {
    /// Creates a writer with no field filtering.
    #[inline]
    pub const fn new(format: bool) -> Self {
        Self {
            format,
            include: &[],
            exclude: &[],
        }
    }

    /// Creates a writer with include/exclude filters for record fields.
    ///
    /// An empty `include` list means "no include filter". Excluded names are
    /// dropped even when they also appear in `include`.
    #[inline]
    pub const fn with_filters(
        format: bool,
        include: &'a [&'a str],
        exclude: &'a [&'a str],
    ) -> Self {
        Self {
            format,
            include,
            exclude,
        }
    }

    /// Renders `value` as a complete JSON document.
    pub fn render(&self, value: &Value) -> String {
        self.write_value(value, 0)
    }

    // Shape dispatch, in classification order: absent values first, then
    // scalars, blobs before general sequences, then the containers.
    fn write_value(&self, value: &Value, depth: usize) -> String {
        match value {
            // An absent root still renders as an object.
            Value::Null => {
                if depth == 0 {
                    "{ }".to_owned()
                } else {
                    "null".to_owned()
                }
            }
            Value::Scalar(text) => self.write_scalar(text),
            // A blob re-dispatches as its base64 text at the same depth.
            Value::Bytes(bytes) => self.write_value(&Value::Scalar(STANDARD.encode(bytes)), depth),
            Value::Map(entries) => self.write_map(entries, depth),
            Value::List(items) => self.write_list(items, depth),
            Value::Record(record) => self.write_record(record.as_ref(), depth),
        }
    }

    fn write_scalar(&self, text: &str) -> String {
        if parses_as_number(text) {
            text.to_owned()
        } else if let Some(flag) = parses_as_bool(text) {
            if flag { "true" } else { "false" }.to_owned()
        } else {
            format!("\"{}\"", escape(text))
        }
    }

    fn write_map(&self, entries: &[(String, Value)], depth: usize) -> String {
        let mut out = String::new();
        self.push(&mut out, "{", depth);
        if !entries.is_empty() {
            self.push_line(&mut out);
        }

        for (key, value) in entries {
            self.push(&mut out, &format!("\"{}\": ", escape(key)), depth + 1);

            let fragment = self.write_value(value, depth + 1);
            if layout::opens_set(&fragment) {
                // The fragment carries its own leading indent; give it a
                // fresh line instead of continuing after the key.
                self.push_line(&mut out);
            }
            out.push_str(&fragment);

            out.push(',');
            self.push_line(&mut out);
        }

        self.strip_last_separator(&mut out);
        self.push(&mut out, "}", if entries.is_empty() { 0 } else { depth });
        out
    }

    fn write_list(&self, items: &[Value], depth: usize) -> String {
        let mut out = String::new();
        self.push(&mut out, "[", depth);
        if !items.is_empty() {
            self.push_line(&mut out);
        }

        for item in items {
            let fragment = self.write_value(item, depth + 1);
            if layout::opens_set(&fragment) {
                out.push_str(&fragment);
            } else {
                self.push(&mut out, &fragment, depth + 1);
            }

            out.push(',');
            self.push_line(&mut out);
        }

        self.strip_last_separator(&mut out);
        self.push(&mut out, "]", if items.is_empty() { 0 } else { depth });
        out
    }

    fn write_record(&self, record: &dyn Record, depth: usize) -> String {
        let fields = registry::global().fields_of(record);

        let mut entries = Vec::with_capacity(fields.len());
        for field in fields {
            if !self.include.is_empty() && !self.include.contains(&field.name()) {
                continue;
            }
            if self.exclude.contains(&field.name()) {
                continue;
            }
            // Unreadable fields are omitted, never reported.
            if let Ok(value) = field.read(record) {
                entries.push((field.name().to_owned(), value));
            }
        }

        if entries.is_empty() {
            // Nothing survived discovery and filtering; fall back to the
            // record's own textual form.
            self.write_scalar(&record.fallback_text())
        } else {
            self.write_map(&entries, depth)
        }
    }

    fn push(&self, out: &mut String, text: &str, depth: usize) {
        if self.format && depth > 0 {
            out.push_str(&layout::indent(depth));
        }
        out.push_str(text);
    }

    fn push_line(&self, out: &mut String) {
        if self.format {
            out.push_str(layout::LINE_BREAK);
        }
    }

    // Strips the last `,` before a closing bracket, keeping the line break
    // that followed it.
    fn strip_last_separator(&self, out: &mut String) {
        if self.format {
            let Some(line_at) = out.len().checked_sub(layout::LINE_BREAK.len()) else {
                return;
            };
            if out.ends_with(layout::LINE_BREAK) && out[..line_at].ends_with(',') {
                out.remove(line_at - 1);
            }
        } else if out.ends_with(',') {
            out.pop();
        }
    }
}

// -----------------------------------------------------------------------------
// Scalar sniffing

// The canonical text is the only discriminator: content that parses as a
// finite decimal number is emitted bare, as is boolean-looking content.
fn parses_as_number(text: &str) -> bool {
    text.parse::<f64>().is_ok_and(f64::is_finite)
}

fn parses_as_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use jw_reflect::{Bytes, FieldError, FieldInfo, Fielded, Record, ToValue, Value, impl_record};

    use super::{serialize, serialize_excluding, serialize_only};
    use crate::layout;

    fn lines(parts: &[&str]) -> String {
        parts.join(layout::LINE_BREAK)
    }

    #[derive(Clone)]
    struct Account {
        id: u32,
        name: String,
        secret: String,
    }

    impl_record!(Account { id, name, secret });

    fn account() -> Account {
        Account {
            id: 1,
            name: "geo".to_owned(),
            secret: "hunter2".to_owned(),
        }
    }

    // ---- scalars ------------------------------------------------------------

    #[test]
    fn primitives_render_bare_or_quoted() {
        assert_eq!(serialize(&true, false), "true");
        assert_eq!(serialize(&false, false), "false");
        assert_eq!(serialize(&42, false), "42");
        assert_eq!(serialize(&-7_i64, false), "-7");
        assert_eq!(serialize(&1.5_f64, false), "1.5");
        assert_eq!(serialize(&"hello", false), "\"hello\"");
    }

    #[test]
    fn string_content_is_the_only_discriminator() {
        // Documented quirk: string content that reads as a number or
        // boolean is emitted bare.
        assert_eq!(serialize(&"42", false), "42");
        assert_eq!(serialize(&"true", false), "true");
        assert_eq!(serialize(&"True", false), "true");
        assert_eq!(serialize(&"truthy", false), "\"truthy\"");
    }

    #[test]
    fn non_finite_numbers_stay_quoted() {
        assert_eq!(serialize(&f64::NAN, false), "\"NaN\"");
        assert_eq!(serialize(&f64::INFINITY, false), "\"inf\"");
    }

    #[test]
    fn strings_are_escaped_when_quoted() {
        assert_eq!(serialize(&"a\"b", false), "\"a\\\"b\"");
        assert_eq!(serialize(&"line\nbreak", false), "\"line\\nbreak\"");
        assert_eq!(serialize(&"a/b", false), "\"a\\/b\"");
    }

    // ---- null ---------------------------------------------------------------

    #[test]
    fn absent_root_renders_as_empty_object() {
        assert_eq!(serialize(&None::<i32>, false), "{ }");
        assert_eq!(serialize(&None::<i32>, true), "{ }");
    }

    #[test]
    fn nested_null_renders_as_null() {
        let items = vec![Some(1), None, Some(2)];
        assert_eq!(serialize(&items, false), "[1,null,2]");
    }

    // ---- maps and lists -----------------------------------------------------

    #[test]
    fn compact_map_output() {
        let mut map = BTreeMap::new();
        map.insert("a", Value::scalar(1));
        map.insert("b", Value::scalar("x"));
        let map: Vec<(String, Value)> = map
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect();

        let writer = super::JsonWriter::new(false);
        assert_eq!(writer.render(&Value::Map(map)), "{\"a\": 1,\"b\": \"x\"}");
    }

    #[test]
    fn formatted_map_indents_by_depth() {
        let mut inner = BTreeMap::new();
        inner.insert("c", 2);
        let mut map: BTreeMap<&str, Value> = BTreeMap::new();
        map.insert("a", Value::scalar(1));
        map.insert("b", inner.to_value());

        let expected = lines(&[
            "{",
            "    \"a\": 1,",
            "    \"b\": ",
            "    {",
            "        \"c\": 2",
            "    }",
            "}",
        ]);
        assert_eq!(serialize(&map, true), expected);
    }

    #[test]
    fn formatted_list_output() {
        assert_eq!(
            serialize(&vec![1, 2], true),
            lines(&["[", "    1,", "    2", "]"])
        );

        let mut entry = BTreeMap::new();
        entry.insert("x", 1);
        assert_eq!(
            serialize(&vec![entry], true),
            lines(&["[", "    {", "        \"x\": 1", "    }", "]"])
        );
    }

    #[test]
    fn empty_containers_close_immediately() {
        assert_eq!(serialize(&Vec::<i32>::new(), false), "[]");
        assert_eq!(serialize(&Vec::<i32>::new(), true), "[]");
        assert_eq!(serialize(&BTreeMap::<String, i32>::new(), false), "{}");
        assert_eq!(serialize(&BTreeMap::<String, i32>::new(), true), "{}");
    }

    #[test]
    fn no_trailing_commas_anywhere() {
        let mut map = BTreeMap::new();
        map.insert("k", vec![1, 2, 3]);

        for format in [false, true] {
            let output = serialize(&map, format);
            assert!(!output.contains(",]"));
            assert!(!output.contains(",}"));
            let line_comma = format!(",{}]", layout::LINE_BREAK);
            assert!(!output.contains(&line_comma));
        }
    }

    // ---- records ------------------------------------------------------------

    #[test]
    fn record_renders_all_fields_in_order() {
        assert_eq!(
            serialize(&account(), false),
            "{\"id\": 1,\"name\": \"geo\",\"secret\": \"hunter2\"}"
        );
    }

    #[test]
    fn exclude_drops_record_fields_only() {
        assert_eq!(
            serialize_excluding(&account(), false, &["secret"]),
            "{\"id\": 1,\"name\": \"geo\"}"
        );

        // A mapping key literally named "secret" is never filtered.
        let mut map = BTreeMap::new();
        map.insert("secret", 1);
        assert_eq!(
            serialize_excluding(&map, false, &["secret"]),
            "{\"secret\": 1}"
        );
    }

    #[test]
    fn include_keeps_only_named_fields() {
        assert_eq!(
            serialize_only(&account(), false, &["id", "name"]),
            "{\"id\": 1,\"name\": \"geo\"}"
        );
        // Exclusion wins over inclusion.
        assert_eq!(
            serialize_only(&account(), false, &["id"]),
            "{\"id\": 1}"
        );
    }

    #[test]
    fn fully_filtered_record_falls_back_to_text() {
        assert_eq!(
            serialize_excluding(&account(), false, &["id", "name", "secret"]),
            "\"Account\""
        );
    }

    #[test]
    fn empty_record_falls_back_to_text() {
        #[derive(Clone)]
        struct Ghost;
        impl_record!(Ghost {});

        assert_eq!(serialize(&Ghost, false), "\"Ghost\"");
    }

    #[test]
    fn nested_records_render_as_nested_objects() {
        #[derive(Clone)]
        struct Profile {
            owner: Account,
            active: bool,
        }
        impl_record!(Profile { owner, active });

        let profile = Profile {
            owner: account(),
            active: true,
        };

        assert_eq!(
            serialize_excluding(&profile, false, &["secret"]),
            "{\"owner\": {\"id\": 1,\"name\": \"geo\"},\"active\": true}"
        );
    }

    #[test]
    fn formatted_record_nests_like_a_map() {
        #[derive(Clone)]
        struct Holder {
            item: Account,
        }
        impl_record!(Holder { item });

        let holder = Holder { item: account() };
        let expected = lines(&[
            "{",
            "    \"item\": ",
            "    {",
            "        \"id\": 1,",
            "        \"name\": \"geo\"",
            "    }",
            "}",
        ]);
        assert_eq!(
            serialize_excluding(&holder, true, &["secret"]),
            expected
        );
    }

    // ---- unreadable fields --------------------------------------------------

    #[derive(Clone)]
    struct Flaky;

    impl Fielded for Flaky {
        fn field_list() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] = &[
                FieldInfo::new("bad", |_| Err(FieldError::Unreadable { field: "bad" })),
                FieldInfo::new("good", |record| match record.downcast_ref::<Flaky>() {
                    Some(_) => Ok(Value::scalar(1)),
                    None => Err(FieldError::MismatchedRecord { expected: "Flaky" }),
                }),
            ];
            FIELDS
        }
    }

    impl Record for Flaky {
        fn type_name(&self) -> &'static str {
            "Flaky"
        }

        fn fields(&self) -> &'static [FieldInfo] {
            Self::field_list()
        }

        fn clone_record(&self) -> Box<dyn Record> {
            Box::new(self.clone())
        }
    }

    impl ToValue for Flaky {
        fn to_value(&self) -> Value {
            Value::Record(Box::new(self.clone()))
        }
    }

    #[test]
    fn unreadable_fields_are_silently_omitted() {
        assert_eq!(serialize(&Flaky, false), "{\"good\": 1}");
    }

    #[derive(Clone)]
    struct Broken;

    impl Fielded for Broken {
        fn field_list() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] =
                &[FieldInfo::new("only", |_| {
                    Err(FieldError::Unreadable { field: "only" })
                })];
            FIELDS
        }
    }

    impl Record for Broken {
        fn type_name(&self) -> &'static str {
            "Broken"
        }

        fn fields(&self) -> &'static [FieldInfo] {
            Self::field_list()
        }

        fn clone_record(&self) -> Box<dyn Record> {
            Box::new(self.clone())
        }
    }

    impl ToValue for Broken {
        fn to_value(&self) -> Value {
            Value::Record(Box::new(self.clone()))
        }
    }

    #[test]
    fn record_with_no_readable_field_falls_back_to_text() {
        assert_eq!(serialize(&Broken, false), "\"Broken\"");
    }

    // ---- byte blobs ---------------------------------------------------------

    #[test]
    fn bytes_render_as_base64_strings() {
        let blob = Bytes::new([0x41_u8, 0x42]);
        assert_eq!(serialize(&blob, false), "\"QUI=\"");
        assert_eq!(serialize(&blob, false), serialize(&"QUI=", false));
        // The format flag does not change blob rendering.
        assert_eq!(serialize(&blob, true), "\"QUI=\"");
    }

    #[test]
    fn plain_byte_vectors_are_sequences() {
        assert_eq!(serialize(&vec![0x41_u8, 0x42], false), "[65,66]");
    }

    // ---- cross-validation ---------------------------------------------------

    #[test]
    fn output_parses_as_json() {
        let mut inner = BTreeMap::new();
        inner.insert("deep", vec![Some(3), None]);
        let mut map = BTreeMap::new();
        map.insert("text", Value::scalar("with \"quotes\" and /slashes/"));
        map.insert("nested", inner.to_value());
        map.insert("flag", Value::scalar(false));

        let compact: serde_json::Value = serde_json::from_str(&serialize(&map, false)).unwrap();
        let formatted: serde_json::Value = serde_json::from_str(&serialize(&map, true)).unwrap();
        assert_eq!(compact, formatted);
        assert_eq!(
            compact["text"],
            serde_json::Value::String("with \"quotes\" and /slashes/".to_owned())
        );
    }

    #[test]
    fn indentation_grows_with_nesting() {
        let nested = vec![vec![vec![1]]];
        let expected = lines(&[
            "[",
            "    [",
            "        [",
            "            1",
            "        ]",
            "    ]",
            "]",
        ]);
        assert_eq!(serialize(&nested, true), expected);
    }
}
