//! Layout extraction: turn a page's raw text spans into words, lines, and
//! blocks. No whitespace normalization — anchor-tag patterns rely on the
//! original spacing surviving into line text.

use crate::adapter::{PdfPage, TextSpan};
use shared_types::{Block, BoundingBox, Line, PageLayout, Word};

/// Spans on the same line if their vertical centers are within this many
/// points of each other.
const LINE_VERTICAL_TOLERANCE: f64 = 3.0;

/// Lines within this many points of each other vertically are grouped into
/// the same block (a simple paragraph heuristic: most PDFs don't carry
/// explicit paragraph boundaries in the content stream).
const BLOCK_LINE_GAP: f64 = 14.0;

pub struct LayoutExtractor;

impl LayoutExtractor {
    /// Build a normalized `PageLayout` from a parsed page's text spans.
    pub fn extract(page: &PdfPage) -> PageLayout {
        let words: Vec<Word> = page
            .text_spans
            .iter()
            .filter(|s| !s.text.is_empty())
            .map(span_to_word)
            .collect();

        let lines = group_into_lines(&words);
        let blocks = group_into_blocks(&lines);

        PageLayout {
            page_number: page.page_number,
            width: page.width,
            height: page.height,
            words,
            lines,
            blocks,
        }
    }
}

fn span_to_word(span: &TextSpan) -> Word {
    Word {
        text: span.text.clone(),
        bbox: span.bbox,
        font_size: span.font_size,
        font_name: span.font_name.clone(),
    }
}

fn group_into_lines(words: &[Word]) -> Vec<Line> {
    // Sort by (approximate row, x) so spans land in reading order even
    // though the content stream may not emit them that way.
    let mut indices: Vec<usize> = (0..words.len()).collect();
    indices.sort_by(|&a, &b| {
        let ya = words[a].bbox.y;
        let yb = words[b].bbox.y;
        yb.partial_cmp(&ya)
            .unwrap()
            .then(words[a].bbox.x.partial_cmp(&words[b].bbox.x).unwrap())
    });

    let mut lines: Vec<Vec<usize>> = Vec::new();
    for idx in indices {
        let y = words[idx].bbox.y;
        let placed = lines.iter_mut().find(|line| {
            let other_y = words[line[0]].bbox.y;
            (other_y - y).abs() < LINE_VERTICAL_TOLERANCE
        });
        match placed {
            Some(line) => line.push(idx),
            None => lines.push(vec![idx]),
        }
    }

    let mut result = Vec::with_capacity(lines.len());
    for mut line in lines {
        line.sort_by(|&a, &b| words[a].bbox.x.partial_cmp(&words[b].bbox.x).unwrap());

        let mut text = String::new();
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        let mut line_words = Vec::with_capacity(line.len());

        for &idx in &line {
            let w = &words[idx];
            text.push_str(&w.text);
            min_x = min_x.min(w.bbox.x);
            min_y = min_y.min(w.bbox.y);
            max_x = max_x.max(w.bbox.x + w.bbox.width);
            max_y = max_y.max(w.bbox.y + w.bbox.height);
            line_words.push(w.clone());
        }

        result.push(Line {
            text,
            bbox: BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y),
            words: line_words,
        });
    }

    // Reading order: top of page first (largest y, since origin is
    // bottom-left and y grows upward).
    result.sort_by(|a, b| b.bbox.y.partial_cmp(&a.bbox.y).unwrap());
    result
}

fn group_into_blocks(lines: &[Line]) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in lines {
        let attach_to_last = blocks.last().map(|b: &Block| {
            let last_line = b.lines.last().unwrap();
            (last_line.bbox.y - line.bbox.y).abs() <= BLOCK_LINE_GAP
        });

        match attach_to_last {
            Some(true) => {
                let block = blocks.last_mut().unwrap();
                block.lines.push(line.clone());
                block.bbox = union_bbox(&block.bbox, &line.bbox);
            }
            _ => blocks.push(Block {
                bbox: line.bbox,
                lines: vec![line.clone()],
            }),
        }
    }

    blocks
}

fn union_bbox(a: &BoundingBox, b: &BoundingBox) -> BoundingBox {
    let min_x = a.x.min(b.x);
    let min_y = a.y.min(b.y);
    let max_x = (a.x + a.width).max(b.x + b.width);
    let max_y = (a.y + a.height).max(b.y + b.height);
    BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
}
