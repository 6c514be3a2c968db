//! PDF adapter: opens a document and exposes, per page, the primitives the
//! field detector needs — positioned text spans, vector drawing primitives,
//! interactive widgets, and substring search.
//!
//! Built directly on `lopdf`'s content-stream decoder rather than a
//! higher-level text-extraction crate, because the detector needs glyph
//! *positions*, not just concatenated text.

use crate::error::PdfError;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use shared_types::BoundingBox;

/// Horizontal-line tolerance: two endpoints within this many points of each
/// other in y are considered the same horizontal line.
pub const LINE_HORIZONTAL_EPSILON: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One non-empty text-showing span, in page render order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub bbox: BoundingBox,
    pub font_size: f64,
    pub font_name: String,
}

/// A vector drawing primitive taken off a page's content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingPrimitive {
    Line { start: Point, end: Point },
    Rect { bbox: BoundingBox },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Checkbox,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub kind: WidgetKind,
    pub bbox: BoundingBox,
}

/// A handle onto one page's geometry and text, all pre-parsed at `page()`
/// time so strategies can query it repeatedly without re-decoding.
pub struct PdfPage {
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    pub text_spans: Vec<TextSpan>,
    pub drawings: Vec<DrawingPrimitive>,
    pub widgets: Vec<Widget>,
}

impl PdfPage {
    /// Find every occurrence of `needle` in the page's rendered text,
    /// returning the bounding box covering the spans that contain it.
    ///
    /// Mirrors PyMuPDF's `page.search_for`: operates over the concatenation
    /// of text spans in render order, not over any particular text line.
    pub fn search(&self, needle: &str) -> Vec<BoundingBox> {
        if needle.is_empty() || self.text_spans.is_empty() {
            return Vec::new();
        }

        let mut full_text = String::new();
        // (start_offset, end_offset) into `full_text` for each span.
        let mut span_ranges: Vec<(usize, usize)> = Vec::with_capacity(self.text_spans.len());
        for span in &self.text_spans {
            let start = full_text.len();
            full_text.push_str(&span.text);
            span_ranges.push((start, full_text.len()));
        }

        let mut hits = Vec::new();
        let mut search_from = 0;
        while let Some(rel) = full_text[search_from..].find(needle) {
            let match_start = search_from + rel;
            let match_end = match_start + needle.len();

            let covering: Vec<&TextSpan> = self
                .text_spans
                .iter()
                .zip(span_ranges.iter())
                .filter(|(_, (s, e))| *s < match_end && *e > match_start)
                .map(|(span, _)| span)
                .collect();

            if let Some(bbox) = union_bboxes(&covering) {
                hits.push(bbox);
            }

            search_from = match_start + 1;
            if search_from >= full_text.len() {
                break;
            }
        }
        hits
    }
}

fn union_bboxes(spans: &[&TextSpan]) -> Option<BoundingBox> {
    let first = spans.first()?;
    let mut min_x = first.bbox.x;
    let mut min_y = first.bbox.y;
    let mut max_x = first.bbox.x + first.bbox.width;
    let mut max_y = first.bbox.y + first.bbox.height;

    for span in &spans[1..] {
        min_x = min_x.min(span.bbox.x);
        min_y = min_y.min(span.bbox.y);
        max_x = max_x.max(span.bbox.x + span.bbox.width);
        max_y = max_y.max(span.bbox.y + span.bbox.height);
    }

    Some(BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// An opened PDF document. Acquired on entry, dropped on exit, never
/// mutated — every query is a pure read over the parsed structure.
pub struct PdfAdapter {
    doc: Document,
}

impl PdfAdapter {
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(bytes)?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Page numbers present in the document, ascending, 1-indexed.
    pub fn page_numbers(&self) -> Vec<u32> {
        let mut nums: Vec<u32> = self.doc.get_pages().into_keys().collect();
        nums.sort_unstable();
        nums
    }

    /// Parse one page's geometry and text. Malformed content streams
    /// degrade to an empty page rather than failing the whole document.
    pub fn page(&self, page_number: u32) -> Result<PdfPage, PdfError> {
        let page_id = *self
            .doc
            .get_pages()
            .get(&page_number)
            .ok_or(PdfError::PageNotFound(page_number))?;

        let (width, height) = self.page_dimensions(page_id);
        let (text_spans, drawings) = self.parse_content_stream(page_id);
        let widgets = self.parse_widgets(page_id);

        Ok(PdfPage {
            page_number,
            width,
            height,
            text_spans,
            drawings,
            widgets,
        })
    }

    fn page_dimensions(&self, page_id: ObjectId) -> (f64, f64) {
        let media_box = self
            .media_box(page_id)
            .unwrap_or([0.0, 0.0, 612.0, 792.0]);
        (media_box[2] - media_box[0], media_box[3] - media_box[1])
    }

    fn media_box(&self, page_id: ObjectId) -> Option<[f64; 4]> {
        let mut current = Some(page_id);
        while let Some(id) = current {
            let dict = self.doc.get_object(id).ok()?.as_dict().ok()?;
            if let Ok(obj) = dict.get(b"MediaBox") {
                if let Some(arr) = self.resolve_array(obj) {
                    if arr.len() == 4 {
                        let mut vals = [0.0f64; 4];
                        for (i, o) in arr.iter().enumerate() {
                            vals[i] = self.resolve_number(o)?;
                        }
                        return Some(vals);
                    }
                }
            }
            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|o| o.as_reference().ok());
        }
        None
    }

    fn resolve_array<'a>(&'a self, obj: &'a Object) -> Option<&'a Vec<Object>> {
        match obj {
            Object::Array(a) => Some(a),
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok(),
            _ => None,
        }
    }

    fn resolve_number(&self, obj: &Object) -> Option<f64> {
        match obj {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r as f64),
            Object::Reference(id) => self.resolve_number(self.doc.get_object(*id).ok()?),
            _ => None,
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Dictionary(d) => Some(d),
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_dict().ok(),
            _ => None,
        }
    }

    fn parse_widgets(&self, page_id: ObjectId) -> Vec<Widget> {
        let mut widgets = Vec::new();
        let Ok(page_dict) = self.doc.get_object(page_id).and_then(|o| o.as_dict()) else {
            return widgets;
        };
        let Ok(annots_obj) = page_dict.get(b"Annots") else {
            return widgets;
        };
        let Some(annots) = self.resolve_array(annots_obj) else {
            return widgets;
        };

        for annot_ref in annots {
            let Some(annot) = self.resolve_dict(annot_ref) else {
                continue;
            };
            let is_widget = annot
                .get(b"Subtype")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| n == b"Widget")
                .unwrap_or(false);
            if !is_widget {
                continue;
            }

            let field_type = annot.get(b"FT").ok().and_then(|o| o.as_name().ok());
            let kind = if field_type == Some(b"Btn") {
                WidgetKind::Checkbox
            } else {
                WidgetKind::Other
            };

            let Ok(rect_obj) = annot.get(b"Rect") else {
                continue;
            };
            let Some(rect_arr) = self.resolve_array(rect_obj) else {
                continue;
            };
            if rect_arr.len() != 4 {
                continue;
            }
            let mut vals = [0.0f64; 4];
            let mut ok = true;
            for (i, o) in rect_arr.iter().enumerate() {
                match self.resolve_number(o) {
                    Some(v) => vals[i] = v,
                    None => {
                        ok = false;
                        break;
                    }
                }
            }
            if !ok {
                continue;
            }

            widgets.push(Widget {
                kind,
                bbox: BoundingBox::new(vals[0], vals[1], vals[2] - vals[0], vals[3] - vals[1]),
            });
        }

        widgets
    }

    /// Walk the page's content stream, tracking the text and graphics
    /// transformation matrices, and collect text spans + drawing primitives.
    fn parse_content_stream(&self, page_id: ObjectId) -> (Vec<TextSpan>, Vec<DrawingPrimitive>) {
        let mut spans = Vec::new();
        let mut drawings = Vec::new();

        let Ok(content_bytes) = self.doc.get_page_content(page_id) else {
            return (spans, drawings);
        };
        let Ok(content) = Content::decode(&content_bytes) else {
            return (spans, drawings);
        };

        let mut ctm_stack: Vec<Matrix> = vec![Matrix::IDENTITY];
        let mut ctm = Matrix::IDENTITY;
        let mut text_matrix = Matrix::IDENTITY;
        let mut line_matrix = Matrix::IDENTITY;
        let mut font_size = 12.0;
        let mut font_name = String::new();

        let mut current_point: Option<Point> = None;
        let mut subpath_start: Option<Point> = None;
        let mut rect_candidate: Option<BoundingBox> = None;

        for op in &content.operations {
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => {
                    if let Some(m) = ctm_stack.pop() {
                        ctm = m;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_from_operands(&op.operands) {
                        ctm = m.concat(&ctm);
                    }
                }
                "BT" => {
                    text_matrix = Matrix::IDENTITY;
                    line_matrix = Matrix::IDENTITY;
                }
                "ET" => {}
                "Tf" => {
                    if op.operands.len() >= 2 {
                        font_name = operand_name(&op.operands[0]);
                        font_size = operand_number(&op.operands[1]).unwrap_or(font_size);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = operand_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = operand_number(&op.operands[1]).unwrap_or(0.0);
                        line_matrix = Matrix::translation(tx, ty).concat(&line_matrix);
                        text_matrix = line_matrix;
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_from_operands(&op.operands) {
                        text_matrix = m;
                        line_matrix = m;
                    }
                }
                "T*" => {
                    line_matrix = Matrix::translation(0.0, -font_size).concat(&line_matrix);
                    text_matrix = line_matrix;
                }
                "Tj" => {
                    if let Some(s) = op.operands.first() {
                        show_text(
                            &mut spans,
                            operand_text(s),
                            &text_matrix,
                            &ctm,
                            font_size,
                            &font_name,
                        );
                    }
                }
                "'" => {
                    line_matrix = Matrix::translation(0.0, -font_size).concat(&line_matrix);
                    text_matrix = line_matrix;
                    if let Some(s) = op.operands.first() {
                        show_text(
                            &mut spans,
                            operand_text(s),
                            &text_matrix,
                            &ctm,
                            font_size,
                            &font_name,
                        );
                    }
                }
                "\"" => {
                    line_matrix = Matrix::translation(0.0, -font_size).concat(&line_matrix);
                    text_matrix = line_matrix;
                    if let Some(s) = op.operands.get(2) {
                        show_text(
                            &mut spans,
                            operand_text(s),
                            &text_matrix,
                            &ctm,
                            font_size,
                            &font_name,
                        );
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = op.operands.first() {
                        let mut text = String::new();
                        for item in items {
                            match item {
                                Object::String(_, _) => text.push_str(&operand_text(item)),
                                Object::Integer(n) if *n < -100 => text.push(' '),
                                Object::Real(n) if *n < -100.0 => text.push(' '),
                                _ => {}
                            }
                        }
                        show_text(&mut spans, text, &text_matrix, &ctm, font_size, &font_name);
                    }
                }
                "m" => {
                    if let Some(p) = point_from_operands(&op.operands, &ctm) {
                        current_point = Some(p);
                        subpath_start = Some(p);
                    }
                }
                "l" => {
                    if let (Some(start), Some(end)) =
                        (current_point, point_from_operands(&op.operands, &ctm))
                    {
                        drawings.push(DrawingPrimitive::Line { start, end });
                        current_point = Some(end);
                    }
                }
                "re" => {
                    if op.operands.len() >= 4 {
                        let x = operand_number(&op.operands[0]).unwrap_or(0.0);
                        let y = operand_number(&op.operands[1]).unwrap_or(0.0);
                        let w = operand_number(&op.operands[2]).unwrap_or(0.0);
                        let h = operand_number(&op.operands[3]).unwrap_or(0.0);
                        let p0 = ctm.apply(x, y);
                        let p1 = ctm.apply(x + w, y + h);
                        let bbox = BoundingBox::new(
                            p0.x.min(p1.x),
                            p0.y.min(p1.y),
                            (p1.x - p0.x).abs(),
                            (p1.y - p0.y).abs(),
                        );
                        rect_candidate = Some(bbox);
                        current_point = Some(ctm.apply(x, y));
                        subpath_start = Some(ctm.apply(x, y));
                    }
                }
                "f" | "F" | "f*" | "S" | "s" | "B" | "B*" | "b" | "b*" => {
                    if let Some(bbox) = rect_candidate.take() {
                        drawings.push(DrawingPrimitive::Rect { bbox });
                    }
                    current_point = subpath_start;
                }
                "h" => {
                    current_point = subpath_start;
                }
                _ => {}
            }
        }

        (spans, drawings)
    }
}

fn show_text(
    spans: &mut Vec<TextSpan>,
    text: String,
    text_matrix: &Matrix,
    ctm: &Matrix,
    font_size: f64,
    font_name: &str,
) {
    if text.trim().is_empty() {
        return;
    }
    let combined = text_matrix.concat(ctm);
    let origin = combined.apply(0.0, 0.0);
    // Approximate glyph width: no embedded font metrics available here.
    let width = text.chars().count() as f64 * font_size * 0.5;
    let height = font_size;
    spans.push(TextSpan {
        text,
        bbox: BoundingBox::new(origin.x, origin.y, width, height),
        font_size,
        font_name: font_name.to_string(),
    });
}

fn point_from_operands(operands: &[Object], ctm: &Matrix) -> Option<Point> {
    if operands.len() < 2 {
        return None;
    }
    let x = operand_number(&operands[0])?;
    let y = operand_number(&operands[1])?;
    Some(ctm.apply(x, y))
}

fn operand_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn operand_name(obj: &Object) -> String {
    match obj {
        Object::Name(n) => String::from_utf8_lossy(n).to_string(),
        _ => String::new(),
    }
}

/// Decode a PDF string operand to text, trying UTF-16BE (common for
/// Identity-H encoded fonts) before falling back to Latin-1.
fn operand_text(obj: &Object) -> String {
    match obj {
        Object::String(bytes, _) => {
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let units: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                if let Ok(s) = String::from_utf16(&units) {
                    return s;
                }
            }
            if let Ok(s) = std::str::from_utf8(bytes) {
                return s.to_string();
            }
            bytes.iter().map(|&b| b as char).collect()
        }
        _ => String::new(),
    }
}

fn matrix_from_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let vals: Vec<f64> = operands.iter().filter_map(operand_number).collect();
    if vals.len() < 6 {
        return None;
    }
    Some(Matrix {
        a: vals[0],
        b: vals[1],
        c: vals[2],
        d: vals[3],
        e: vals[4],
        f: vals[5],
    })
}

/// A 2D affine transform, `[a b 0; c d 0; e f 1]` in PDF's row-vector form.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f64, ty: f64) -> Matrix {
        Matrix {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    /// `self` followed by `other`, i.e. `self * other` under PDF's
    /// row-vector convention (point' = point * self * other).
    fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f64, y: f64) -> Point {
        Point {
            x: x * self.a + y * self.c + self.e,
            y: x * self.b + y * self.d + self.f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_identity_is_noop() {
        let p = Matrix::IDENTITY.apply(10.0, 20.0);
        assert_eq!(p, Point { x: 10.0, y: 20.0 });
    }

    #[test]
    fn matrix_translation_composes() {
        let m = Matrix::translation(5.0, 5.0).concat(&Matrix::translation(1.0, 2.0));
        let p = m.apply(0.0, 0.0);
        assert_eq!(p, Point { x: 6.0, y: 7.0 });
    }

    #[test]
    fn search_finds_substring_across_spans() {
        let spans = vec![
            TextSpan {
                text: "[sig|".to_string(),
                bbox: BoundingBox::new(0.0, 0.0, 20.0, 10.0),
                font_size: 10.0,
                font_name: "F1".to_string(),
            },
            TextSpan {
                text: "role:client]".to_string(),
                bbox: BoundingBox::new(20.0, 0.0, 40.0, 10.0),
                font_size: 10.0,
                font_name: "F1".to_string(),
            },
        ];
        let page = PdfPage {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            text_spans: spans,
            drawings: vec![],
            widgets: vec![],
        };
        let hits = page.search("[sig|role:client]");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].x, 0.0);
        assert_eq!(hits[0].width, 60.0);
    }

    #[test]
    fn search_missing_substring_returns_empty() {
        let page = PdfPage {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            text_spans: vec![TextSpan {
                text: "hello world".to_string(),
                bbox: BoundingBox::new(0.0, 0.0, 50.0, 10.0),
                font_size: 10.0,
                font_name: "F1".to_string(),
            }],
            drawings: vec![],
            widgets: vec![],
        };
        assert!(page.search("goodbye").is_empty());
    }
}
