//! Slab page chunking.
//!
//! Splits a Slab page into paragraph-bounded pieces and emits one
//! [`ExternalRecord`] per piece for the `slab_document_chunks` store.
//! Each chunk record copies the parent's attributes and adds:
//!
//! | Attribute | Value |
//! |-----------|-------|
//! | `type` | `"slab_chunk"` |
//! | `chunk_index` | 0-based position |
//! | `parent_document_id` | parent's `document_id` |
//! | `content_hash` | SHA-256 of the chunk text |
//!
//! Chunk ids are `<document_id>_<index>`; when the parent has no
//! `document_id` the id is left unset and the chunk representation
//! generates one.
//!
//! # Algorithm
//!
//! 1. `max_chars = max_tokens × 4`, saturating at `usize::MAX`.
//! 2. Split on `\n\n`, accumulating paragraphs until the next one would
//!    overflow `max_chars`.
//! 3. Paragraphs longer than `max_chars` are hard-split at the last
//!    newline or space before the limit (or at the limit on a UTF-8
//!    boundary when there is none).
//! 4. Non-empty input always yields at least one piece.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::document::{Document, UNKNOWN_IDENTITY};
use crate::factory::ExternalRecord;
use crate::store::PARENT_ATTRIBUTE;

const CHARS_PER_TOKEN: usize = 4;

/// Split `text` into paragraph-bounded pieces of at most
/// `max_tokens × 4` bytes (oversized words excepted).
pub fn split_paragraphs(text: &str, max_tokens: usize) -> Vec<String> {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN).max(1);
    let mut pieces = Vec::new();
    let mut buf = String::new();

    for para in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let would_be = if buf.is_empty() {
            para.len()
        } else {
            buf.len() + 2 + para.len()
        };
        if would_be > max_chars && !buf.is_empty() {
            pieces.push(std::mem::take(&mut buf));
        }

        if para.len() > max_chars {
            hard_split(para, max_chars, &mut pieces);
        } else {
            if !buf.is_empty() {
                buf.push_str("\n\n");
            }
            buf.push_str(para);
        }
    }

    if !buf.is_empty() {
        pieces.push(buf);
    }
    if pieces.is_empty() && !text.trim().is_empty() {
        pieces.push(text.trim().to_string());
    }
    pieces
}

fn hard_split(mut remaining: &str, max_chars: usize, pieces: &mut Vec<String>) {
    while !remaining.is_empty() {
        let limit = snap_to_char_boundary(remaining, max_chars);
        let cut = if limit < remaining.len() {
            remaining[..limit]
                .rfind(['\n', ' '])
                .map(|pos| pos + 1)
                .unwrap_or(limit)
        } else {
            limit
        };
        let cut = if cut == 0 { first_char_len(remaining) } else { cut };

        let piece = remaining[..cut].trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
        remaining = &remaining[cut..];
    }
}

fn first_char_len(s: &str) -> usize {
    s.chars().next().map(char::len_utf8).unwrap_or(s.len())
}

/// Snap a byte index back to the nearest valid UTF-8 char boundary.
fn snap_to_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The id chunks of `doc` carry as `parent_document_id`: its
/// `document_id` attribute, else its resolved identity, else empty.
pub fn chunk_parent_id(doc: &dyn Document) -> String {
    Some(doc.attribute_str("document_id"))
        .filter(|id| !id.is_empty())
        .or_else(|| Some(doc.identity()).filter(|id| id != UNKNOWN_IDENTITY))
        .unwrap_or_default()
}

/// Build chunk records for a Slab page.
pub fn chunk_slab_document(doc: &dyn Document, max_tokens: usize) -> Vec<ExternalRecord> {
    let parent_id = chunk_parent_id(doc);

    split_paragraphs(doc.text(), max_tokens)
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let mut metadata = doc.attributes().clone();
            metadata.insert("type".into(), Value::from("slab_chunk"));
            metadata.insert("chunk_index".into(), Value::from(index as i64));
            metadata.insert(PARENT_ATTRIBUTE.into(), Value::from(parent_id.clone()));
            metadata.insert("content_hash".into(), Value::from(content_hash(&text)));

            let record = ExternalRecord::new(text, metadata);
            if parent_id.is_empty() {
                record
            } else {
                record.with_id(format!("{}_{}", parent_id, index))
            }
        })
        .collect()
}
