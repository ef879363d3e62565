//! Document assembler and writer.
//!
//! Owns every registered node, assigns identities in registration order,
//! and performs the exactly-once write pass: header, body, cross-reference
//! table, and trailer, tracking the running byte offset as it writes.

use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use log::debug;

use crate::error::Result;
use crate::object::{Array, Dictionary, Node, ObjectRef, PdfString, Value};

/// Configuration for document generation.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Creator application
    pub creator: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: Some("pdf_scribe".to_string()),
        }
    }
}

impl DocumentConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set document keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }
}

/// One arena slot: a registered node plus its identity bookkeeping.
#[derive(Debug)]
struct Entry {
    node: Node,
    generation: u16,
    in_use: bool,
    /// Byte offset of the indirect form, recorded during the write pass
    offset: u64,
}

/// A document being assembled.
///
/// The document is the sole owner of all registered nodes; references
/// between nodes are (number, generation) pairs, so the lifetime of every
/// node equals the lifetime of the document. Object numbers are dense,
/// starting at 0, assigned strictly in registration order. Object 0 is the
/// reserved free-list head (generation 65535, never written to the body);
/// the page tree, info, and catalog dictionaries follow at numbers 1-3.
///
/// Not synchronized: register nodes and call [`Document::write`] from one
/// thread only. Node bodies are recomputed from current state on every
/// write, so mutating a node between registration and `write` is safe.
pub struct Document {
    entries: Vec<Entry>,
    pages: ObjectRef,
    info: ObjectRef,
    catalog: ObjectRef,
    version: String,
    xref_offset: u64,
}

impl Document {
    /// Create a document with default configuration.
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create a document with custom configuration.
    pub fn with_config(config: DocumentConfig) -> Self {
        let mut document = Self {
            entries: Vec::new(),
            pages: ObjectRef::new(0, 0),
            info: ObjectRef::new(0, 0),
            catalog: ObjectRef::new(0, 0),
            version: config.version,
            xref_offset: 0,
        };

        // Object 0: the fixed free-list head, required by the format
        document.entries.push(Entry {
            node: Node::Opaque(Bytes::new()),
            generation: 65535,
            in_use: false,
            offset: 0,
        });

        let mut pages = Dictionary::new();
        pages.set("Type", Value::Name("Pages".to_string()));
        pages.set("Kids", Array::new());
        pages.set("Count", 0i64);
        document.pages = document.add_object(pages);

        let mut info = Dictionary::new();
        if let Some(title) = config.title {
            info.set("Title", PdfString::text(title));
        }
        if let Some(author) = config.author {
            info.set("Author", PdfString::text(author));
        }
        if let Some(subject) = config.subject {
            info.set("Subject", PdfString::text(subject));
        }
        if let Some(keywords) = config.keywords {
            info.set("Keywords", PdfString::text(keywords));
        }
        if let Some(creator) = config.creator {
            info.set("Creator", PdfString::text(creator));
        }
        document.info = document.add_object(info);

        let mut catalog = Dictionary::new();
        catalog.set("Type", Value::Name("Catalog".to_string()));
        catalog.set("Pages", document.pages);
        document.catalog = document.add_object(catalog);

        document
    }

    /// Register a node, assigning the next object number.
    ///
    /// Pure bookkeeping, cannot fail. The returned reference is how other
    /// nodes relate to this one.
    pub fn add_object(&mut self, node: impl Into<Node>) -> ObjectRef {
        let number = self.entries.len() as u32;
        self.entries.push(Entry {
            node: node.into(),
            generation: 0,
            in_use: true,
            offset: 0,
        });
        ObjectRef::new(number, 0)
    }

    /// Register a page dictionary and link it into the page tree.
    ///
    /// Increments the page tree's `/Count` and appends a reference to its
    /// `/Kids` array. The dictionary is trusted structurally; no page-type
    /// check is enforced.
    pub fn add_page(&mut self, page: Dictionary) -> ObjectRef {
        let pages_index = self.pages.number as usize;
        if let Node::Dictionary(pages) = &mut self.entries[pages_index].node {
            if let Some(Value::Integer(count)) = pages.get_mut("Count") {
                *count += 1;
            }
        }

        let page_ref = self.add_object(Node::Dictionary(page));

        if let Node::Dictionary(pages) = &mut self.entries[pages_index].node {
            if let Some(Value::Array(kids)) = pages.get_mut("Kids") {
                kids.push(page_ref);
            }
        }
        page_ref
    }

    /// Reference to the page tree dictionary (object 1).
    pub fn pages(&self) -> ObjectRef {
        self.pages
    }

    /// Reference to the info dictionary (object 2).
    pub fn info(&self) -> ObjectRef {
        self.info
    }

    /// Reference to the catalog dictionary (object 3).
    pub fn catalog(&self) -> ObjectRef {
        self.catalog
    }

    /// Mutable access to the info dictionary.
    pub fn info_mut(&mut self) -> &mut Dictionary {
        self.dictionary_mut(self.info)
    }

    /// Mutable access to the page tree dictionary.
    pub fn pages_mut(&mut self) -> &mut Dictionary {
        self.dictionary_mut(self.pages)
    }

    /// Mutable access to the catalog dictionary.
    pub fn catalog_mut(&mut self) -> &mut Dictionary {
        self.dictionary_mut(self.catalog)
    }

    /// Look up a registered node.
    pub fn node(&self, reference: ObjectRef) -> Option<&Node> {
        self.entries.get(reference.number as usize).map(|e| &e.node)
    }

    /// Total number of registered objects, including the free head.
    pub fn object_count(&self) -> usize {
        self.entries.len()
    }

    /// Byte offset of the cross-reference table, recorded by the last
    /// write pass. Zero before the first write.
    pub fn xref_offset(&self) -> u64 {
        self.xref_offset
    }

    fn dictionary_mut(&mut self, reference: ObjectRef) -> &mut Dictionary {
        match &mut self.entries[reference.number as usize].node {
            Node::Dictionary(dict) => dict,
            // The fixed low-numbered nodes are dictionaries by construction
            _ => unreachable!("built-in node is not a dictionary"),
        }
    }

    /// Write the complete document to `output`.
    ///
    /// Single-pass and forward-only: header, then every live object in
    /// ascending number order, then the cross-reference table, then the
    /// trailer. Every recorded offset equals the cursor value at the moment
    /// the object's indirect form began. A body generation failure (for
    /// example a stream compression error) aborts the pass without emitting
    /// a trailer; no partial-output recovery is attempted.
    pub fn write<W: Write>(&mut self, output: &mut W) -> Result<()> {
        let mut cursor: u64 = 0;

        write_line(output, &mut cursor, format!("%PDF-{}", self.version).as_bytes())?;

        debug!("writing body: {} objects", self.entries.len());
        for number in 0..self.entries.len() {
            if !self.entries[number].in_use {
                continue;
            }
            let body = self.entries[number].node.body()?;
            let entry = &mut self.entries[number];
            entry.offset = cursor;

            let mut indirect = format!("{} {} obj\n", number, entry.generation).into_bytes();
            indirect.extend_from_slice(&body);
            indirect.extend_from_slice(b"\nendobj");
            write_line(output, &mut cursor, &indirect)?;
        }

        // startxref points here, at the line holding the xref keyword
        self.xref_offset = cursor;
        debug!("writing xref table at offset {}", self.xref_offset);
        write_line(output, &mut cursor, b"xref")?;
        write_line(output, &mut cursor, format!("0 {}", self.entries.len()).as_bytes())?;
        for entry in &self.entries {
            let liveness = if entry.in_use { 'n' } else { 'f' };
            // Fixed-width: readers seek into this table by byte arithmetic
            let line = format!("{:010} {:05} {} ", entry.offset, entry.generation, liveness);
            write_line(output, &mut cursor, line.as_bytes())?;
        }

        let mut trailer = Dictionary::new();
        trailer.set("Size", self.entries.len() as i64);
        trailer.set("Root", self.catalog);
        trailer.set("Info", self.info);
        write_line(output, &mut cursor, b"trailer")?;
        write_line(output, &mut cursor, &trailer.to_bytes())?;
        write_line(output, &mut cursor, b"startxref")?;
        write_line(output, &mut cursor, self.xref_offset.to_string().as_bytes())?;
        write_line(output, &mut cursor, b"%%EOF")?;

        debug!("document written: {} bytes", cursor);
        Ok(())
    }

    /// Write the document to a file.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        self.write(&mut file)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit one line and advance the shared cursor by its byte length plus the
/// line terminator.
fn write_line<W: Write>(output: &mut W, cursor: &mut u64, content: &[u8]) -> Result<()> {
    output.write_all(content)?;
    output.write_all(b"\n")?;
    *cursor += content.len() as u64 + 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::ContentStream;

    #[test]
    fn test_built_in_objects() {
        let document = Document::new();
        assert_eq!(document.object_count(), 4);
        assert_eq!(document.pages(), ObjectRef::new(1, 0));
        assert_eq!(document.info(), ObjectRef::new(2, 0));
        assert_eq!(document.catalog(), ObjectRef::new(3, 0));
    }

    #[test]
    fn test_registration_order_is_dense() {
        let mut document = Document::new();
        let a = document.add_object(Dictionary::new());
        let b = document.add_object(Array::new());
        let c = document.add_object(ContentStream::new());
        assert_eq!((a.number, b.number, c.number), (4, 5, 6));
        assert_eq!(document.object_count(), 7);
    }

    #[test]
    fn test_add_page_updates_page_tree() {
        let mut document = Document::new();
        let mut page = Dictionary::new();
        page.set("Type", Value::Name("Page".to_string()));
        page.set("Parent", document.pages());
        let page_ref = document.add_page(page);

        let pages = match document.node(document.pages()).unwrap() {
            Node::Dictionary(dict) => dict,
            _ => panic!("page tree is not a dictionary"),
        };
        assert_eq!(pages.get("Count"), Some(&Value::Integer(1)));
        match pages.get("Kids") {
            Some(Value::Array(kids)) => {
                assert_eq!(kids.get(0), Some(&Value::Reference(page_ref)));
            },
            other => panic!("unexpected Kids entry: {:?}", other),
        }
    }

    #[test]
    fn test_catalog_references_page_tree() {
        let document = Document::new();
        let catalog = match document.node(document.catalog()).unwrap() {
            Node::Dictionary(dict) => dict,
            _ => panic!("catalog is not a dictionary"),
        };
        assert_eq!(catalog.get("Pages"), Some(&Value::Reference(document.pages())));
    }

    #[test]
    fn test_config_populates_info() {
        let config = DocumentConfig::default()
            .with_title("Test Document")
            .with_author("Test Author");
        let mut document = Document::with_config(config);
        let mut output = Vec::new();
        document.write(&mut output).unwrap();
        let text = String::from_utf8_lossy(&output);
        assert!(text.contains("/Title (Test Document)"));
        assert!(text.contains("/Author (Test Author)"));
        assert!(text.contains("/Creator (pdf_scribe)"));
    }

    #[test]
    fn test_mutation_before_write_is_observed() {
        let mut document = Document::new();
        document.info_mut().set("Title", PdfString::text("Late Title"));
        let mut output = Vec::new();
        document.write(&mut output).unwrap();
        assert!(String::from_utf8_lossy(&output).contains("/Title (Late Title)"));
    }

    #[test]
    fn test_header_and_eof_markers() {
        let mut document = Document::new();
        let mut output = Vec::new();
        document.write(&mut output).unwrap();
        assert!(output.starts_with(b"%PDF-1.7\n"));
        assert!(output.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_free_head_is_skipped_in_body() {
        let mut document = Document::new();
        let mut output = Vec::new();
        document.write(&mut output).unwrap();
        let text = String::from_utf8_lossy(&output);
        assert!(!text.contains("0 65535 obj"));
        assert!(text.contains("1 0 obj"));
    }
}
