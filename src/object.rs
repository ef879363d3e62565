//! Typed object model for the document graph.
//!
//! A document is a graph of [`Node`]s. Nodes are built freely in memory and
//! only gain an identity (object number + generation) when registered with a
//! [`Document`](crate::document::Document). Cross-node relations are
//! expressed as [`ObjectRef`] values, never as owning pointers, so the graph
//! cannot create lifetime cycles.

use bytes::Bytes;
use indexmap::IndexMap;

use crate::error::Result;
use crate::serializer::write_value;
use crate::stream::ContentStream;

/// Reference to an indirect object.
///
/// A non-owning (number, generation) pair that resolves to the referenced
/// object at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub number: u32,
    /// Generation number
    pub generation: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

/// A value appearing inside a dictionary, array, or content stream.
///
/// Composite values ([`Dictionary`], [`Array`], [`PdfString`]) are inlined
/// into the surrounding body; an indirect relation to a registered node is
/// expressed with [`Value::Reference`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value, formatted by the numeric rules in
    /// [`serializer`](crate::serializer)
    Real(f64),
    /// Name, written with a leading `/`
    Name(String),
    /// Pre-formatted ASCII token, written as-is
    Literal(String),
    /// Raw bytes, passed through unchanged
    Raw(Bytes),
    /// String literal with encoding fallback
    String(PdfString),
    /// Reference to a registered node
    Reference(ObjectRef),
    /// Nested dictionary, inlined
    Dictionary(Dictionary),
    /// Nested array, inlined
    Array(Array),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Literal(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Literal(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Raw(value)
    }
}

impl From<PdfString> for Value {
    fn from(value: PdfString) -> Self {
        Value::String(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Reference(value)
    }
}

impl From<Dictionary> for Value {
    fn from(value: Dictionary) -> Self {
        Value::Dictionary(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

/// An insertion-ordered mapping from name keys to values.
///
/// Key order is preserved and observable in the output, which keeps emitted
/// documents reproducible. Keys are unique; setting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: IndexMap<String, Value>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key to a value. Last write wins; insertion order is kept for
    /// keys that already exist.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Get a mutable value by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Serialize to the bracketed body form.
    ///
    /// `<<`, one `/Key value` line per entry in insertion order, `>>`,
    /// newline-joined.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut lines: Vec<Vec<u8>> = vec![b"<<".to_vec()];
        for (key, value) in &self.entries {
            let mut line = Vec::with_capacity(key.len() + 2);
            line.push(b'/');
            line.extend_from_slice(key.as_bytes());
            line.push(b' ');
            write_value(&mut line, value);
            lines.push(line);
        }
        lines.push(b">>".to_vec());
        lines.join(&b"\n"[..])
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

/// An ordered sequence of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    values: Vec<Value>,
}

impl Array {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an array from a list of values.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Append a value.
    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Append all values from an iterator.
    pub fn extend(&mut self, values: impl IntoIterator<Item = Value>) -> &mut Self {
        self.values.extend(values);
        self
    }

    /// Get an element by index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Serialize to the bracketed body form: `[`, elements, `]`,
    /// space-joined.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut tokens: Vec<Vec<u8>> = vec![b"[".to_vec()];
        for value in &self.values {
            let mut token = Vec::new();
            write_value(&mut token, value);
            tokens.push(token);
        }
        tokens.push(b"]".to_vec());
        tokens.join(&b" "[..])
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A string payload with an encoding fallback.
///
/// Text payloads are encoded as ASCII inside a parenthesized literal. Text
/// that does not fit in ASCII falls back to the hex literal syntax with a
/// UTF-16BE byte-order mark, since the format forbids raw non-ASCII bytes
/// inside a text literal. Raw byte payloads are wrapped without re-encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfString {
    /// Textual payload, ASCII with UTF-16BE hex fallback
    Text(String),
    /// Raw byte payload, wrapped as-is
    Bytes(Bytes),
}

impl PdfString {
    /// Create a textual string.
    pub fn text(text: impl Into<String>) -> Self {
        PdfString::Text(text.into())
    }

    /// Create a string from raw bytes.
    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        PdfString::Bytes(bytes.into())
    }

    /// Encode to a literal token. Total: the only branch is the internal
    /// fallback between the two literal syntaxes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PdfString::Text(text) if text.is_ascii() => {
                let mut out = Vec::with_capacity(text.len() + 2);
                out.push(b'(');
                out.extend_from_slice(text.as_bytes());
                out.push(b')');
                out
            },
            PdfString::Text(text) => {
                // UTF-16BE with BOM, hex-encoded
                let mut out = vec![b'<'];
                out.extend_from_slice(b"FEFF");
                for unit in text.encode_utf16() {
                    for byte in unit.to_be_bytes() {
                        out.extend_from_slice(format!("{:02X}", byte).as_bytes());
                    }
                }
                out.push(b'>');
                out
            },
            PdfString::Bytes(bytes) => {
                let mut out = Vec::with_capacity(bytes.len() + 2);
                out.push(b'(');
                out.extend_from_slice(bytes);
                out.push(b')');
                out
            },
        }
    }
}

/// A typed unit of the document graph.
///
/// Each variant produces its body bytes on demand; variants differ only in
/// body shape. Only [`Node::Stream`] can fail, when compression was
/// requested and the compressor reports an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Dictionary node
    Dictionary(Dictionary),
    /// Array node
    Array(Array),
    /// String node
    String(PdfString),
    /// Content stream node
    Stream(ContentStream),
    /// Pre-serialized body bytes
    Opaque(Bytes),
}

impl Node {
    /// Produce the canonical body bytes for this node.
    pub fn body(&self) -> Result<Vec<u8>> {
        match self {
            Node::Dictionary(dict) => Ok(dict.to_bytes()),
            Node::Array(array) => Ok(array.to_bytes()),
            Node::String(string) => Ok(string.to_bytes()),
            Node::Stream(stream) => stream.body(),
            Node::Opaque(bytes) => Ok(bytes.to_vec()),
        }
    }
}

impl From<Dictionary> for Node {
    fn from(value: Dictionary) -> Self {
        Node::Dictionary(value)
    }
}

impl From<Array> for Node {
    fn from(value: Array) -> Self {
        Node::Array(value)
    }
}

impl From<PdfString> for Node {
    fn from(value: PdfString) -> Self {
        Node::String(value)
    }
}

impl From<ContentStream> for Node {
    fn from(value: ContentStream) -> Self {
        Node::Stream(value)
    }
}

impl From<Bytes> for Node {
    fn from(value: Bytes) -> Self {
        Node::Opaque(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ref_display() {
        assert_eq!(format!("{}", ObjectRef::new(10, 0)), "10 0 R");
    }

    #[test]
    fn test_dictionary_preserves_insertion_order() {
        let mut dict = Dictionary::new();
        dict.set("Type", Value::Name("Pages".to_string()));
        dict.set("Count", 0i64);
        dict.set("Kids", Array::new());
        let body = String::from_utf8(dict.to_bytes()).unwrap();
        assert_eq!(body, "<<\n/Type /Pages\n/Count 0\n/Kids [ ]\n>>");
    }

    #[test]
    fn test_dictionary_last_write_wins() {
        let mut dict = Dictionary::new();
        dict.set("Count", 0i64);
        dict.set("Type", Value::Name("Pages".to_string()));
        dict.set("Count", 3i64);
        assert_eq!(dict.len(), 2);
        let body = String::from_utf8(dict.to_bytes()).unwrap();
        // Replacing a key keeps its original position
        assert_eq!(body, "<<\n/Count 3\n/Type /Pages\n>>");
    }

    #[test]
    fn test_empty_dictionary_body() {
        assert_eq!(Dictionary::new().to_bytes(), b"<<\n>>");
    }

    #[test]
    fn test_array_body() {
        let array: Array = [0i64, 0, 200, 200].into_iter().collect();
        assert_eq!(array.to_bytes(), b"[ 0 0 200 200 ]");
    }

    #[test]
    fn test_array_mixed_values() {
        let mut array = Array::new();
        array.push(Value::Name("PDF".to_string()));
        array.push(2.5f64);
        array.push(ObjectRef::new(4, 0));
        assert_eq!(array.to_bytes(), b"[ /PDF 2.5 4 0 R ]");
    }

    #[test]
    fn test_string_ascii_literal() {
        let string = PdfString::text("Hello World");
        assert_eq!(string.to_bytes(), b"(Hello World)");
    }

    #[test]
    fn test_string_non_ascii_falls_back_to_hex() {
        let string = PdfString::text("é");
        let encoded = string.to_bytes();
        assert_eq!(encoded, b"<FEFF00E9>");
    }

    #[test]
    fn test_string_hex_starts_with_bom() {
        let encoded = PdfString::text("Tête").to_bytes();
        assert!(encoded.starts_with(b"<FEFF"));
        assert!(encoded.ends_with(b">"));
    }

    #[test]
    fn test_string_raw_bytes_unmodified() {
        let string = PdfString::bytes(Bytes::from_static(b"\x8Eraw"));
        assert_eq!(string.to_bytes(), b"(\x8Eraw)");
    }

    #[test]
    fn test_node_body_dispatch() {
        let mut dict = Dictionary::new();
        dict.set("Size", 5i64);
        let node: Node = dict.into();
        assert_eq!(node.body().unwrap(), b"<<\n/Size 5\n>>");

        let node: Node = Bytes::from_static(b"raw body").into();
        assert_eq!(node.body().unwrap(), b"raw body");
    }

    #[test]
    fn test_dictionary_from_iterator() {
        let dict: Dictionary = [("A", 1i64), ("B", 2i64)].into_iter().collect();
        assert_eq!(dict.to_bytes(), b"<<\n/A 1\n/B 2\n>>");
    }
}
