//! # pdf_scribe
//!
//! Low-level PDF generator: build a graph of typed nodes, register them
//! with a [`Document`] to assign identities, and serialize the graph in one
//! forward-only pass into a byte-exact PDF with header, body,
//! cross-reference table, and trailer.
//!
//! ## Core pieces
//!
//! - [`Value`] / [`serializer`]: canonical value-to-bytes encoding, total
//!   over its input domain (numeric precision rules, string encoding
//!   fallback, nested-object inlining)
//! - [`Dictionary`], [`Array`], [`PdfString`], [`ContentStream`]: the typed
//!   node variants, each producing its body bytes on demand
//! - [`Document`]: node registration, identity assignment, and the
//!   single-pass writer that records every object's byte offset for the
//!   cross-reference table
//!
//! ## Quick start
//!
//! ```
//! use pdf_scribe::{ContentStream, Dictionary, Document, Value};
//!
//! # fn main() -> pdf_scribe::Result<()> {
//! let mut document = Document::new();
//!
//! let mut draw = ContentStream::new();
//! draw.rectangle(100.0, 100.0, 50.0, 70.0);
//! draw.fill(false);
//! let contents = document.add_object(draw);
//!
//! let mut page = Dictionary::new();
//! page.set("Type", Value::Name("Page".to_string()));
//! page.set("Parent", document.pages());
//! page.set("MediaBox", pdf_scribe::Array::from_values(vec![
//!     Value::Integer(0), Value::Integer(0),
//!     Value::Integer(200), Value::Integer(200),
//! ]));
//! page.set("Contents", contents);
//! document.add_page(page);
//!
//! let mut output = Vec::new();
//! document.write(&mut output)?;
//! # Ok(())
//! # }
//! ```
//!
//! The emitted bytes are consumed by external renderers and validators;
//! this crate only produces them. Parsing PDFs back, validating page-tree
//! semantics, and font embedding are out of scope.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Object model and serialization
pub mod object;
pub mod serializer;
pub mod stream;

// Document assembly and writing
pub mod document;

// Re-exports
pub use document::{Document, DocumentConfig};
pub use error::{Error, Result};
pub use object::{Array, Dictionary, Node, ObjectRef, PdfString, Value};
pub use serializer::{encode_value, format_number};
pub use stream::{ContentStream, LineCap, LineJoin};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_scribe");
    }
}
