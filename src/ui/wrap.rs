//! Soft wrapping of paragraphs into screen rows.
//!
//! Offsets are char offsets into the paragraph text; widths are terminal
//! columns from `unicode-width`. A `\n` inside a paragraph forces a break
//! and is never drawn.

use unicode_width::UnicodeWidthChar;

use crate::editor::{Document, Pos};

/// One screen row of a paragraph: chars `start..end` of block `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualLine {
    pub block: usize,
    pub start: usize,
    pub end: usize,
}

pub fn char_width(ch: char) -> usize {
    match ch {
        '\t' => 1,
        _ => ch.width().unwrap_or(0),
    }
}

/// Wrap every paragraph to `width` columns. Empty paragraphs still take
/// one row.
pub fn wrap_document(doc: &Document, width: u16) -> Vec<VisualLine> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    for (block, paragraph) in doc.blocks().iter().enumerate() {
        let chars: Vec<char> = paragraph.text().chars().collect();
        wrap_chars(&chars, width, |start, end| {
            lines.push(VisualLine { block, start, end });
        });
    }
    lines
}

fn wrap_chars(chars: &[char], width: usize, mut emit: impl FnMut(usize, usize)) {
    let mut start = 0;
    let mut used = 0;
    // Offset just past the last space on the current row.
    let mut last_break: Option<usize> = None;
    let mut idx = 0;

    while idx < chars.len() {
        let ch = chars[idx];
        if ch == '\n' {
            emit(start, idx);
            idx += 1;
            start = idx;
            used = 0;
            last_break = None;
            continue;
        }
        let w = char_width(ch);
        if used + w > width && idx > start {
            let end = last_break.filter(|&b| b > start).unwrap_or(idx);
            emit(start, end);
            start = end;
            used = chars[start..idx].iter().copied().map(char_width).sum();
            last_break = None;
            continue;
        }
        used += w;
        if ch == ' ' {
            last_break = Some(idx + 1);
        }
        idx += 1;
    }
    emit(start, chars.len());
}

/// Screen row and column of `pos`, relative to the first wrapped row.
pub fn visual_position(doc: &Document, lines: &[VisualLine], pos: Pos) -> (usize, usize) {
    let row = lines
        .iter()
        .rposition(|line| line.block == pos.block && line.start <= pos.offset)
        .unwrap_or(0);
    let Some(line) = lines.get(row) else {
        return (0, 0);
    };
    let col = doc.block(line.block).map_or(0, |paragraph| {
        paragraph
            .text()
            .chars()
            .skip(line.start)
            .take(pos.offset.saturating_sub(line.start))
            .map(char_width)
            .sum()
    });
    (row, col)
}

/// Document position under screen `row`/`col`, clamped to the row's text.
pub fn position_at(doc: &Document, lines: &[VisualLine], row: usize, col: usize) -> Pos {
    let Some(line) = lines.get(row).or_else(|| lines.last()) else {
        return doc.start();
    };
    let Some(paragraph) = doc.block(line.block) else {
        return doc.start();
    };
    let mut used = 0;
    let mut offset = line.start;
    for ch in paragraph
        .text()
        .chars()
        .skip(line.start)
        .take(line.end - line.start)
    {
        let w = char_width(ch);
        if used + w > col {
            break;
        }
        used += w;
        offset += 1;
    }
    Pos::new(line.block, offset)
}
