//! The `TextInsertable` view of a document
//!
//! Cursors address one paragraph and carry an optional selection inside it.
//! Offsets count characters, not bytes.

use crate::document::{Anchor, DocumentHandle, DocumentState, ServiceError};
use crate::object::ObjectRef;

/// Insertion point in document text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCursor {
    paragraph: usize,
    start: usize,
    end: usize,
}

impl TextCursor {
    /// A cursor with no selection
    #[must_use]
    pub fn collapsed(paragraph: usize, offset: usize) -> Self {
        Self {
            paragraph,
            start: offset,
            end: offset,
        }
    }

    /// A cursor selecting `start..end` within one paragraph
    #[must_use]
    pub fn selecting(paragraph: usize, start: usize, end: usize) -> Self {
        Self {
            paragraph,
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Paragraph index
    #[inline]
    #[must_use]
    pub fn paragraph(&self) -> usize {
        self.paragraph
    }

    /// Selected character range
    #[inline]
    #[must_use]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Whether the cursor selects nothing
    #[inline]
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Text of one document
#[derive(Debug, Clone)]
pub struct Text {
    document: DocumentHandle,
}

impl Text {
    pub(crate) fn new(document: DocumentHandle) -> Self {
        Self { document }
    }

    /// Cursor at the current content-insertion point (end of text)
    pub fn create_cursor(&self) -> Result<TextCursor, ServiceError> {
        self.document.read_state(|state| {
            let last = state.paragraphs.len() - 1;
            TextCursor::collapsed(last, state.paragraphs[last].chars().count())
        })
    }

    /// Full text, paragraphs joined by `\n`
    pub fn string(&self) -> Result<String, ServiceError> {
        self.document.read_state(|state| state.paragraphs.join("\n"))
    }

    /// Number of paragraphs
    pub fn paragraph_count(&self) -> Result<usize, ServiceError> {
        self.document.read_state(|state| state.paragraphs.len())
    }

    /// Insert a string at the cursor; `\n` starts a new paragraph
    ///
    /// With `absorb`, the selection is replaced; otherwise the string goes
    /// after it. Returns a collapsed cursor behind the inserted text.
    pub fn insert_string(
        &self,
        cursor: &TextCursor,
        text: &str,
        absorb: bool,
    ) -> Result<TextCursor, ServiceError> {
        self.document.write_state(|state| {
            check_cursor(state, cursor)?;
            let offset = absorb_selection(state, cursor, absorb);
            Ok(insert_text(state, cursor.paragraph, offset, text))
        })
    }

    /// Anchor an embedded object at the cursor
    ///
    /// With `absorb`, the selection is removed first. Objects already owned
    /// by a document, or disposed, are rejected.
    pub fn insert_content(
        &self,
        cursor: &TextCursor,
        object: ObjectRef,
        absorb: bool,
    ) -> Result<(), ServiceError> {
        let document = self.document.id();
        self.document.write_state(|state| {
            check_cursor(state, cursor)?;
            object.adopt(document).map_err(|owner| match owner {
                Some(_) => ServiceError::InsertRejected("object is already inserted".to_string()),
                None => ServiceError::InsertRejected("object is disposed".to_string()),
            })?;
            let offset = absorb_selection(state, cursor, absorb);
            state.anchors.push(Anchor {
                paragraph: cursor.paragraph,
                offset,
                object,
            });
            Ok(())
        })
    }
}

fn check_cursor(state: &DocumentState, cursor: &TextCursor) -> Result<(), ServiceError> {
    let len = state
        .paragraphs
        .get(cursor.paragraph)
        .map(|p| p.chars().count())
        .ok_or_else(|| ServiceError::InsertRejected("cursor out of range".to_string()))?;
    if cursor.end > len {
        return Err(ServiceError::InsertRejected("cursor out of range".to_string()));
    }
    Ok(())
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

/// Removes the selection when absorbing; returns the insertion offset
fn absorb_selection(state: &mut DocumentState, cursor: &TextCursor, absorb: bool) -> usize {
    if !absorb {
        return cursor.end;
    }
    if cursor.is_collapsed() {
        return cursor.start;
    }
    let paragraph = &mut state.paragraphs[cursor.paragraph];
    let from = byte_index(paragraph, cursor.start);
    let to = byte_index(paragraph, cursor.end);
    paragraph.replace_range(from..to, "");

    let removed = cursor.end - cursor.start;
    for anchor in &mut state.anchors {
        if anchor.paragraph != cursor.paragraph || anchor.offset <= cursor.start {
            continue;
        }
        anchor.offset = anchor.offset.saturating_sub(removed).max(cursor.start);
    }
    cursor.start
}

fn insert_text(
    state: &mut DocumentState,
    paragraph: usize,
    offset: usize,
    text: &str,
) -> TextCursor {
    let split_at = byte_index(&state.paragraphs[paragraph], offset);
    let tail = state.paragraphs[paragraph].split_off(split_at);

    let mut parts = text.split('\n');
    if let Some(first) = parts.next() {
        state.paragraphs[paragraph].push_str(first);
    }
    let mut last = paragraph;
    for part in parts {
        last += 1;
        state.paragraphs.insert(last, part.to_string());
    }
    let end = state.paragraphs[last].chars().count();
    state.paragraphs[last].push_str(&tail);

    let added = last - paragraph;
    for anchor in &mut state.anchors {
        if anchor.paragraph > paragraph {
            anchor.paragraph += added;
        } else if anchor.paragraph == paragraph && anchor.offset >= offset {
            anchor.offset = end + (anchor.offset - offset);
            anchor.paragraph = last;
        }
    }
    TextCursor::collapsed(last, end)
}
