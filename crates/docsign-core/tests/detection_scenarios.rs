//! End-to-end detection scenarios (spec §8, S1-S7), run over hand-built
//! page/layout fixtures rather than real PDF bytes: constructing a page
//! straight from `shared_pdf`'s types exercises the same strategy and
//! dedup code the orchestrator runs, without needing a PDF file on disk.

use docsign_core::config::DetectionConfig;
use docsign_core::dedup::deduplicate;
use docsign_core::detector::{detect_fields, PdfSource};
use docsign_core::strategies::{self, Strategy};
use shared_pdf::{PdfPage, TextSpan};
use shared_pdf::LayoutExtractor;
use shared_types::{AssigneeType, BoundingBox, FieldType, Line, PageLayout};

fn run(text: &str) -> Vec<shared_types::Candidate> {
    let page = PdfPage {
        page_number: 1,
        width: 612.0,
        height: 792.0,
        text_spans: vec![TextSpan {
            text: text.to_string(),
            bbox: shared_types::BoundingBox::new(0.0, 700.0, text.len() as f64 * 5.0, 12.0),
            font_size: 10.0,
            font_name: "F1".to_string(),
        }],
        drawings: vec![],
        widgets: vec![],
    };
    let layout = LayoutExtractor::extract(&page);
    let config = DetectionConfig::default();

    let mut candidates = Vec::new();
    for strategy in strategies::all() {
        candidates.extend(strategy.detect(&page, &layout, &config));
    }
    let deduped = deduplicate(candidates, config.dedup_overlap_threshold);
    deduped
        .into_iter()
        .filter(|c| c.detection_confidence >= config.detection_confidence_threshold)
        .collect()
}

/// Builds a one-page PDF with a literal content stream, the way
/// `pdfjoin-core`'s merge tests build their fixtures — real `lopdf` objects
/// rather than hand-built `shared_pdf` structs, so the adapter's own
/// content-stream walk is what's under test, not a stand-in for it.
fn build_single_page_pdf(content: &str) -> Vec<u8> {
    use lopdf::{Dictionary, Document, Object};

    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let catalog_id = doc.new_object_id();
    let page_id = doc.new_object_id();
    let content_id = doc.new_object_id();

    doc.objects.insert(
        content_id,
        Object::Stream(lopdf::Stream::new(Dictionary::new(), content.as_bytes().to_vec())),
    );

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
    );
    doc.objects.insert(page_id, Object::Dictionary(page_dict));

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(1));
    pages_dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog_dict = Dictionary::new();
    catalog_dict.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog_dict.set("Pages", Object::Reference(pages_id));
    doc.objects.insert(catalog_id, Object::Dictionary(catalog_dict));

    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

#[test]
fn detect_fields_walks_a_real_content_stream_end_to_end() {
    let bytes = build_single_page_pdf("BT /F1 12 Tf 72 700 Td (Client Signature:) Tj ET");
    let config = DetectionConfig::default();

    let result = detect_fields("doc-e2e-1", PdfSource::Bytes(bytes), None, &config).unwrap();

    assert_eq!(result.document_id, "doc-e2e-1");
    assert_eq!(result.detected_fields.len(), 1);
    assert_eq!(result.total_candidates, result.filtered_candidates);

    let field = &result.detected_fields[0];
    pretty_assertions::assert_eq!(field.field_type, FieldType::Signature);
    pretty_assertions::assert_eq!(field.assignee_type, AssigneeType::Role);
    pretty_assertions::assert_eq!(field.detected_role_key.as_deref(), Some("client"));
    assert!(field.bbox.x > 0.0, "signature bbox should sit to the right of the label");
}

#[test]
fn s1_anchor_tag_document() {
    let candidates = run("Sign here: [sig|role:client] Date: [date|role:client]");
    assert!(candidates.len() >= 2);

    let signature = candidates.iter().find(|c| c.field_type == FieldType::Signature).unwrap();
    assert_eq!(signature.detected_role_key.as_deref(), Some("client"));
    assert_eq!(signature.detection_confidence, 0.95);
    assert_eq!(signature.assignee_type, AssigneeType::Role);

    let date = candidates.iter().find(|c| c.field_type == FieldType::DateSigned).unwrap();
    assert_eq!(date.detected_role_key.as_deref(), Some("client"));
    assert_eq!(date.detection_confidence, 0.95);
}

#[test]
fn s2_legacy_anchor_compatibility() {
    let candidates = run("Sign: [sig|signer1] Date: [date|signer2]");

    let signature = candidates.iter().find(|c| c.field_type == FieldType::Signature).unwrap();
    assert_eq!(signature.detected_role_key.as_deref(), Some("signer_1"));
    assert_eq!(signature.detection_confidence, 0.95);

    let date = candidates.iter().find(|c| c.field_type == FieldType::DateSigned).unwrap();
    assert_eq!(date.detected_role_key.as_deref(), Some("signer_2"));
    assert_eq!(date.detection_confidence, 0.95);
}

#[test]
fn s3_underscore_blank() {
    let candidates = run("Name: _________________________");
    assert!(!candidates.is_empty());

    let field = &candidates[0];
    assert!(matches!(field.field_type, FieldType::Name | FieldType::Text));
    assert_eq!(field.label.as_deref(), Some("Name:"));
    assert_eq!(field.detection_confidence, 0.8);
}

#[test]
fn s4_keyword_only_signature() {
    let candidates = run("Client Signature:");
    let signature = candidates.iter().find(|c| c.field_type == FieldType::Signature).unwrap();
    assert!(signature.bbox.x > 0.0);
    assert_eq!(signature.detected_role_key.as_deref(), Some("client"));
    assert_eq!(signature.role_confidence, 0.7);
}

#[test]
fn s5_checkbox_by_glyph() {
    let candidates = run("\u{2610} I agree");
    let checkbox = candidates.iter().find(|c| c.field_type == FieldType::Checkbox).unwrap();
    assert_eq!(checkbox.detection_confidence, 0.9);
    // 5pt padding added on each dimension over the raw glyph span.
    assert!(checkbox.bbox.width > 0.0 && checkbox.bbox.height > 0.0);
}

#[test]
fn s7_sender_variable() {
    let candidates = run("Date: {{effective_date}}");
    assert_eq!(candidates.len(), 1);
    let field = &candidates[0];
    assert_eq!(field.field_type, FieldType::Text);
    assert_eq!(field.assignee_type, AssigneeType::Sender);
    assert!(field.detected_role_key.is_none());
    assert_eq!(field.label.as_deref(), Some("effective_date"));
    assert_eq!(field.detection_confidence, 0.95);
}

#[test]
fn s6_dedup_across_strategies() {
    // Two adjacent lines: a short "Signature:" label (triggers C6, whose
    // bbox lands at label.x + label.width + 10 = 65) and the blank drawn
    // right where that keyword candidate lands (triggers C4's underscore
    // path, whose bbox is the blank's own line bbox). The two genuinely
    // cover the same region, which is the collision S6 describes.
    let layout = PageLayout {
        page_number: 1,
        width: 612.0,
        height: 792.0,
        words: vec![],
        lines: vec![
            Line {
                text: "Signature:".to_string(),
                bbox: BoundingBox::new(0.0, 700.0, 55.0, 12.0),
                words: vec![],
            },
            Line {
                text: "_________________".to_string(),
                bbox: BoundingBox::new(65.0, 700.0, 150.0, 20.0),
                words: vec![],
            },
        ],
        blocks: vec![],
    };
    let page = PdfPage {
        page_number: 1,
        width: 612.0,
        height: 792.0,
        text_spans: vec![],
        drawings: vec![],
        widgets: vec![],
    };
    let config = DetectionConfig::default();

    let mut candidates = Vec::new();
    for strategy in strategies::all() {
        candidates.extend(strategy.detect(&page, &layout, &config));
    }
    assert_eq!(
        candidates.len(),
        2,
        "expected one keyword candidate and one underscore-blank candidate before dedup"
    );

    let deduped = deduplicate(candidates, config.dedup_overlap_threshold);
    assert_eq!(
        deduped.len(),
        1,
        "keyword signature and underscore blank cover the same region and must collapse to one candidate"
    );
}
