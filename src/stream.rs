//! Content stream node.
//!
//! Accumulates an ordered sequence of graphics and text operators
//! (ISO 32000-1:2008, Sections 8-9) and serializes them as an embedded
//! stream object with a correct declared length and optional Flate
//! compression.

use std::io::Write;

use crate::error::{Error, Result};
use crate::object::{Dictionary, PdfString, Value};
use crate::serializer::{encode_value, format_number};

/// Line cap styles for path stroking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Square butt cap (default)
    #[default]
    Butt = 0,
    /// Round cap
    Round = 1,
    /// Projecting square cap
    Square = 2,
}

/// Line join styles for path stroking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineJoin {
    /// Miter join (default)
    #[default]
    Miter = 0,
    /// Round join
    Round = 1,
    /// Bevel join
    Bevel = 2,
}

/// Compress a stream payload with Flate/Deflate.
///
/// Returns bytes suitable for a `/FlateDecode` filter.
fn compress_payload(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

/// An embedded content stream.
///
/// Tokens are append-only: each operator helper appends exactly one
/// pre-formatted token, and no token is rewritten or removed afterwards.
/// The stream carries an auxiliary metadata dictionary whose `/Length`
/// entry is recomputed on every serialization, so it is never stale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStream {
    tokens: Vec<Value>,
    extra: Dictionary,
    compress: bool,
}

impl ContentStream {
    /// Create an empty content stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach extra stream metadata entries.
    pub fn with_extra(mut self, extra: Dictionary) -> Self {
        self.extra = extra;
        self
    }

    /// Enable or disable Flate compression of the payload.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Append one already-formatted token.
    pub fn push(&mut self, token: impl Into<Value>) -> &mut Self {
        self.tokens.push(token.into());
        self
    }

    /// Tokens appended so far, in order.
    pub fn tokens(&self) -> &[Value] {
        &self.tokens
    }

    /// Serialize the stream body.
    ///
    /// Joins all tokens with newlines, optionally compresses the payload,
    /// and wraps it as `<< ... >>`, `stream`, payload, `endstream`. The
    /// declared `/Length` is the payload length plus the newline that
    /// separates the payload from `endstream`.
    pub fn body(&self) -> Result<Vec<u8>> {
        let encoded: Vec<Vec<u8>> = self.tokens.iter().map(encode_value).collect();
        let mut payload = encoded.join(&b"\n"[..]);

        let mut dict = self.extra.clone();
        if self.compress {
            payload = compress_payload(&payload).map_err(Error::Compression)?;
            dict.set("Filter", Value::Name("FlateDecode".to_string()));
        }
        dict.set("Length", (payload.len() + 1) as i64);

        let parts: Vec<Vec<u8>> = vec![
            dict.to_bytes(),
            b"stream".to_vec(),
            payload,
            b"endstream".to_vec(),
        ];
        Ok(parts.join(&b"\n"[..]))
    }
}

/// Graphics and text operator helpers.
///
/// Thin builders over [`ContentStream::push`]; numeric arguments go through
/// the canonical number formatting so coordinates inside streams look the
/// same as numbers everywhere else in the document.
impl ContentStream {
    /// Begin a text object (`BT`).
    pub fn begin_text(&mut self) -> &mut Self {
        self.push("BT")
    }

    /// End a text object (`ET`).
    pub fn end_text(&mut self) -> &mut Self {
        self.push("ET")
    }

    /// Use the current path as a clipping path (`W`, or `W*` with the
    /// even-odd rule).
    pub fn clip(&mut self, even_odd: bool) -> &mut Self {
        self.push(if even_odd { "W*" } else { "W" })
    }

    /// Close the current subpath (`h`).
    pub fn close(&mut self) -> &mut Self {
        self.push("h")
    }

    /// Append a cubic Bézier curve (`c`).
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        self.push(format!(
            "{} {} {} {} {} {} c",
            format_number(x1),
            format_number(y1),
            format_number(x2),
            format_number(y2),
            format_number(x3),
            format_number(y3)
        ))
    }

    /// Append a cubic Bézier curve whose first control point is the
    /// current point (`v`).
    pub fn curve_start_to(&mut self, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        self.push(format!(
            "{} {} {} {} v",
            format_number(x2),
            format_number(y2),
            format_number(x3),
            format_number(y3)
        ))
    }

    /// Append a cubic Bézier curve whose second control point is the
    /// endpoint (`y`).
    pub fn curve_end_to(&mut self, x1: f64, y1: f64, x3: f64, y3: f64) -> &mut Self {
        self.push(format!(
            "{} {} {} {} y",
            format_number(x1),
            format_number(y1),
            format_number(x3),
            format_number(y3)
        ))
    }

    /// Paint an external object (`Do`).
    pub fn draw_x_object(&mut self, name: &str) -> &mut Self {
        self.push(format!("/{} Do", name))
    }

    /// End the path without filling or stroking (`n`).
    pub fn end_path(&mut self) -> &mut Self {
        self.push("n")
    }

    /// Fill the current path (`f`, or `f*` with the even-odd rule).
    pub fn fill(&mut self, even_odd: bool) -> &mut Self {
        self.push(if even_odd { "f*" } else { "f" })
    }

    /// Fill and stroke the current path (`B`/`B*`).
    pub fn fill_and_stroke(&mut self, even_odd: bool) -> &mut Self {
        self.push(if even_odd { "B*" } else { "B" })
    }

    /// Close, fill and stroke the current path (`b`/`b*`).
    pub fn fill_stroke_and_close(&mut self, even_odd: bool) -> &mut Self {
        self.push(if even_odd { "b*" } else { "b" })
    }

    /// Append a straight line segment (`l`).
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(format!("{} {} l", format_number(x), format_number(y)))
    }

    /// Begin a new subpath (`m`).
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(format!("{} {} m", format_number(x), format_number(y)))
    }

    /// Restore the graphics state (`Q`).
    pub fn pop_state(&mut self) -> &mut Self {
        self.push("Q")
    }

    /// Save the graphics state (`q`).
    pub fn push_state(&mut self) -> &mut Self {
        self.push("q")
    }

    /// Append a rectangle subpath (`re`).
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.push(format!(
            "{} {} {} {} re",
            format_number(x),
            format_number(y),
            format_number(width),
            format_number(height)
        ))
    }

    /// Set the RGB color for filling, or for stroking when `stroke` is set
    /// (`rg`/`RG`).
    pub fn set_color_rgb(&mut self, r: f64, g: f64, b: f64, stroke: bool) -> &mut Self {
        self.push(format!(
            "{} {} {} {}",
            format_number(r),
            format_number(g),
            format_number(b),
            if stroke { "RG" } else { "rg" }
        ))
    }

    /// Set the dash pattern (`d`).
    pub fn set_dash(&mut self, dash_array: &[f64], dash_phase: f64) -> &mut Self {
        let array: crate::object::Array = dash_array.iter().map(|&v| Value::Real(v)).collect();
        // Numeric tokens and brackets are always ASCII
        let array = String::from_utf8(array.to_bytes()).expect("dash array encodes to ASCII");
        self.push(format!("{} {} d", array, format_number(dash_phase)))
    }

    /// Select the font and size for text showing (`Tf`).
    pub fn set_font_size(&mut self, font: &str, size: f64) -> &mut Self {
        self.push(format!("/{} {} Tf", font, format_number(size)))
    }

    /// Set the line cap style (`J`).
    pub fn set_line_cap(&mut self, cap: LineCap) -> &mut Self {
        self.push(format!("{} J", cap as i64))
    }

    /// Set the line join style (`j`).
    pub fn set_line_join(&mut self, join: LineJoin) -> &mut Self {
        self.push(format!("{} j", join as i64))
    }

    /// Set the line width (`w`).
    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.push(format!("{} w", format_number(width)))
    }

    /// Set the miter limit (`M`).
    pub fn set_miter_limit(&mut self, limit: f64) -> &mut Self {
        self.push(format!("{} M", format_number(limit)))
    }

    /// Set the graphics state from a named ExtGState dictionary (`gs`).
    pub fn set_state(&mut self, state_name: &str) -> &mut Self {
        self.push(format!("/{} gs", state_name))
    }

    /// Show a text string (`Tj`).
    pub fn show_text(&mut self, text: PdfString) -> &mut Self {
        self.push(text);
        self.push("Tj")
    }

    /// Stroke the current path (`S`).
    pub fn stroke(&mut self) -> &mut Self {
        self.push("S")
    }

    /// Close and stroke the current path (`s`).
    pub fn stroke_and_close(&mut self) -> &mut Self {
        self.push("s")
    }

    /// Set the text matrix (`Tm`).
    pub fn text_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.push(format!(
            "{} {} {} {} {} {} Tm",
            format_number(a),
            format_number(b),
            format_number(c),
            format_number(d),
            format_number(e),
            format_number(f)
        ))
    }

    /// Concatenate a matrix to the current transformation matrix (`cm`).
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.push(format!(
            "{} {} {} {} {} {} cm",
            format_number(a),
            format_number(b),
            format_number(c),
            format_number(d),
            format_number(e),
            format_number(f)
        ))
    }
}
