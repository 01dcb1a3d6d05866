use super::model::{Document, Pos};

/// A text selection. `anchor` stays put while `head` moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Pos,
    pub head: Pos,
}

impl Selection {
    /// A collapsed selection (cursor) at `pos`.
    pub const fn cursor(pos: Pos) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub const fn range(anchor: Pos, head: Pos) -> Self {
        Self { anchor, head }
    }

    /// Selection covering the whole document.
    pub fn all(doc: &Document) -> Self {
        Self::range(doc.start(), doc.end())
    }

    /// Lower bound of the selection.
    pub fn from(&self) -> Pos {
        self.anchor.min(self.head)
    }

    /// Upper bound of the selection.
    pub fn to(&self) -> Pos {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    #[must_use]
    pub fn clamped(self, doc: &Document) -> Self {
        Self::range(doc.clamp(self.anchor), doc.clamp(self.head))
    }

    /// Whether the char starting at `pos` is covered by the selection.
    pub fn covers(&self, pos: Pos) -> bool {
        !self.is_empty() && self.from() <= pos && pos < self.to()
    }
}
