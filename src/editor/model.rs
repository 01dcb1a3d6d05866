//! Document tree: a root holding paragraphs of marked text runs.
//!
//! Positions address characters, not bytes. A [`Pos`] names a paragraph and a
//! char offset inside it; offsets range over `0..=paragraph.len()`.

use super::schema::{MarkSet, MarkType};

/// A position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    /// Zero-based paragraph index.
    pub block: usize,
    /// Char offset within the paragraph.
    pub offset: usize,
}

impl Pos {
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A run of text sharing one mark set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    text: String,
    marks: MarkSet,
}

impl TextRun {
    pub fn new(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn marks(&self) -> MarkSet {
        self.marks
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A block holding zero or more inline text runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    runs: Vec<TextRun>,
}

impl Paragraph {
    pub const fn empty() -> Self {
        Self { runs: Vec::new() }
    }

    pub fn from_text(text: &str, marks: MarkSet) -> Self {
        Self::from_runs(vec![TextRun::new(text, marks)])
    }

    /// Build a paragraph, dropping empty runs and merging equal neighbours.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        let mut paragraph = Self { runs };
        paragraph.normalize();
        paragraph
    }

    #[cfg(test)]
    pub(crate) const fn from_runs_unchecked(runs: Vec<TextRun>) -> Self {
        Self { runs }
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(TextRun::text).collect()
    }

    /// Every char paired with the marks of the run it belongs to.
    pub fn chars_with_marks(&self) -> impl Iterator<Item = (char, MarkSet)> + '_ {
        self.runs
            .iter()
            .flat_map(|run| run.text.chars().map(move |ch| (ch, run.marks)))
    }

    /// Marks that apply at `offset`.
    ///
    /// Inside a run this is that run's marks. On a run boundary the run
    /// before wins; at the very start the first run is used.
    pub fn marks_at(&self, offset: usize) -> MarkSet {
        let mut start = 0;
        for (idx, run) in self.runs.iter().enumerate() {
            let end = start + run.char_len();
            if offset < end {
                if offset > start || idx == 0 {
                    return run.marks;
                }
                return self.runs[idx - 1].marks;
            }
            start = end;
        }
        self.runs.last().map_or(MarkSet::EMPTY, TextRun::marks)
    }

    /// Marks of the char starting at `offset`, if there is one.
    pub fn marks_after(&self, offset: usize) -> Option<MarkSet> {
        let mut start = 0;
        for run in &self.runs {
            let end = start + run.char_len();
            if offset < end {
                return Some(run.marks);
            }
            start = end;
        }
        None
    }

    pub fn insert(&mut self, offset: usize, text: &str, marks: MarkSet) {
        if text.is_empty() {
            return;
        }
        let idx = self.split_run_at(offset);
        self.runs.insert(idx, TextRun::new(text, marks));
        self.normalize();
    }

    pub fn delete(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let start = self.split_run_at(from);
        let end = self.split_run_at(to);
        self.runs.drain(start..end);
        self.normalize();
    }

    /// Split at `offset`, keeping the head and returning the tail.
    pub fn split_off(&mut self, offset: usize) -> Self {
        let idx = self.split_run_at(offset);
        let tail = self.runs.split_off(idx);
        self.normalize();
        Self::from_runs(tail)
    }

    pub fn append(&mut self, other: Self) {
        self.runs.extend(other.runs);
        self.normalize();
    }

    /// Returns `true` if any run changed.
    pub fn add_mark(&mut self, from: usize, to: usize, mark: MarkType) -> bool {
        self.update_marks(from, to, |marks| marks.with(mark))
    }

    /// Returns `true` if any run changed.
    pub fn remove_mark(&mut self, from: usize, to: usize, mark: MarkType) -> bool {
        self.update_marks(from, to, |marks| marks.without(mark))
    }

    /// Whether any char in `from..to` carries `mark`.
    pub fn has_mark_in(&self, from: usize, to: usize, mark: MarkType) -> bool {
        self.overlapping_runs(from, to)
            .any(|run| run.marks.contains(mark))
    }

    /// Whether every char in `from..to` carries `mark`. Vacuously true when
    /// the range is empty.
    pub fn all_have_mark(&self, from: usize, to: usize, mark: MarkType) -> bool {
        self.overlapping_runs(from, to)
            .all(|run| run.marks.contains(mark))
    }

    fn overlapping_runs(&self, from: usize, to: usize) -> impl Iterator<Item = &TextRun> {
        let mut start = 0;
        self.runs.iter().filter(move |run| {
            let run_start = start;
            start += run.char_len();
            run_start < to && start > from
        })
    }

    fn update_marks(&mut self, from: usize, to: usize, f: impl Fn(MarkSet) -> MarkSet) -> bool {
        if from >= to {
            return false;
        }
        let start = self.split_run_at(from);
        let end = self.split_run_at(to);
        let mut changed = false;
        for run in &mut self.runs[start..end] {
            let next = f(run.marks);
            if next != run.marks {
                run.marks = next;
                changed = true;
            }
        }
        self.normalize();
        changed
    }

    /// Ensure a run boundary at `offset`; returns the index of the run that
    /// starts there (or `runs.len()` at the end).
    fn split_run_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for idx in 0..self.runs.len() {
            if offset == start {
                return idx;
            }
            let len = self.runs[idx].char_len();
            if offset < start + len {
                let at = byte_offset(&self.runs[idx].text, offset - start);
                let tail = self.runs[idx].text.split_off(at);
                let marks = self.runs[idx].marks;
                self.runs.insert(idx + 1, TextRun::new(tail, marks));
                return idx + 1;
            }
            start += len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        self.runs.retain(|run| !run.text.is_empty());
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

/// The document root. Always holds at least one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Paragraph>,
}

impl Document {
    /// One paragraph holding `seed`; an empty paragraph when the seed is
    /// empty or whitespace-only.
    pub fn from_seed(seed: &str) -> Self {
        let paragraph = if seed.trim().is_empty() {
            Paragraph::empty()
        } else {
            Paragraph::from_text(seed, MarkSet::EMPTY)
        };
        Self {
            blocks: vec![paragraph],
        }
    }

    pub fn from_blocks(mut blocks: Vec<Paragraph>) -> Self {
        if blocks.is_empty() {
            blocks.push(Paragraph::empty());
        }
        Self { blocks }
    }

    #[cfg(test)]
    pub(crate) const fn from_blocks_unchecked(blocks: Vec<Paragraph>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Paragraph] {
        &self.blocks
    }

    pub fn block(&self, idx: usize) -> Option<&Paragraph> {
        self.blocks.get(idx)
    }

    pub fn block_len(&self, idx: usize) -> usize {
        self.block(idx).map_or(0, Paragraph::len)
    }

    pub const fn start(&self) -> Pos {
        Pos::new(0, 0)
    }

    pub fn end(&self) -> Pos {
        let last = self.blocks.len().saturating_sub(1);
        Pos::new(last, self.block_len(last))
    }

    /// Clamp a position into the document.
    pub fn clamp(&self, pos: Pos) -> Pos {
        let block = pos.block.min(self.blocks.len().saturating_sub(1));
        Pos::new(block, pos.offset.min(self.block_len(block)))
    }

    /// Plain-text projection: each paragraph contributes a line break
    /// followed by its text, and the result is trimmed.
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        for paragraph in &self.blocks {
            out.push('\n');
            for run in &paragraph.runs {
                out.push_str(&run.text);
            }
        }
        out.trim().to_string()
    }

    pub fn marks_at(&self, pos: Pos) -> MarkSet {
        self.block(pos.block)
            .map_or(MarkSet::EMPTY, |p| p.marks_at(pos.offset))
    }

    /// Marks to use when replacing `from..to`: those of the first replaced
    /// char, falling back to the marks at `from`.
    pub fn marks_across(&self, from: Pos, to: Pos) -> MarkSet {
        if from == to {
            return self.marks_at(from);
        }
        self.block(from.block)
            .and_then(|p| p.marks_after(from.offset))
            .unwrap_or_else(|| self.marks_at(from))
    }

    pub fn insert_text(&mut self, at: Pos, text: &str, marks: MarkSet) {
        if let Some(paragraph) = self.blocks.get_mut(at.block) {
            paragraph.insert(at.offset, text, marks);
        }
    }

    /// Delete `from..to`, joining the boundary paragraphs when the range
    /// spans more than one.
    pub fn delete(&mut self, from: Pos, to: Pos) {
        if from >= to || to.block >= self.blocks.len() {
            return;
        }
        if from.block == to.block {
            self.blocks[from.block].delete(from.offset, to.offset);
            return;
        }
        let first_len = self.blocks[from.block].len();
        self.blocks[from.block].delete(from.offset, first_len);
        let mut last = self.blocks[to.block].clone();
        last.delete(0, to.offset);
        self.blocks.drain(from.block + 1..=to.block);
        self.blocks[from.block].append(last);
    }

    /// Split the paragraph at `at` into two.
    pub fn split(&mut self, at: Pos) {
        if let Some(paragraph) = self.blocks.get_mut(at.block) {
            let tail = paragraph.split_off(at.offset);
            self.blocks.insert(at.block + 1, tail);
        }
    }

    pub fn add_mark(&mut self, from: Pos, to: Pos, mark: MarkType) -> bool {
        let mut changed = false;
        for (block, start, end) in self.block_ranges(from, to) {
            changed |= self.blocks[block].add_mark(start, end, mark);
        }
        changed
    }

    pub fn remove_mark(&mut self, from: Pos, to: Pos, mark: MarkType) -> bool {
        let mut changed = false;
        for (block, start, end) in self.block_ranges(from, to) {
            changed |= self.blocks[block].remove_mark(start, end, mark);
        }
        changed
    }

    /// Whether any text in `from..to` carries `mark`.
    pub fn range_has_mark(&self, from: Pos, to: Pos, mark: MarkType) -> bool {
        self.block_ranges(from, to)
            .into_iter()
            .any(|(block, start, end)| self.blocks[block].has_mark_in(start, end, mark))
    }

    /// Whether `from..to` contains text and all of it carries `mark`.
    pub fn range_all_have_mark(&self, from: Pos, to: Pos, mark: MarkType) -> bool {
        let ranges: Vec<_> = self
            .block_ranges(from, to)
            .into_iter()
            .filter(|(_, start, end)| start < end)
            .collect();
        !ranges.is_empty()
            && ranges
                .into_iter()
                .all(|(block, start, end)| self.blocks[block].all_have_mark(start, end, mark))
    }

    /// Per-paragraph `(block, start, end)` slices covered by `from..to`.
    fn block_ranges(&self, from: Pos, to: Pos) -> Vec<(usize, usize, usize)> {
        if from >= to {
            return Vec::new();
        }
        let last = to.block.min(self.blocks.len().saturating_sub(1));
        (from.block..=last)
            .map(|block| {
                let start = if block == from.block { from.offset } else { 0 };
                let end = if block == to.block {
                    to.offset
                } else {
                    self.block_len(block)
                };
                (block, start, end.min(self.block_len(block)))
            })
            .collect()
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(idx, _)| idx)
}
