//! PDF structural access for the field detector.
//!
//! `PdfAdapter` opens a document and exposes, per page, positioned text
//! spans, vector drawing primitives, interactive widgets and substring
//! search. `LayoutExtractor` turns those spans into the normalized
//! words/lines/blocks the detection strategies reason over.

pub mod adapter;
pub mod error;
pub mod layout;

pub use adapter::{
    DrawingPrimitive, PdfAdapter, PdfPage, Point, TextSpan, Widget, WidgetKind,
    LINE_HORIZONTAL_EPSILON,
};
pub use error::PdfError;
pub use layout::LayoutExtractor;
