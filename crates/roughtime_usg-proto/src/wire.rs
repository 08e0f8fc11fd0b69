// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Classic Roughtime tag-value message codec.
//!
//! Messages are self-delimiting tag-value maps carried directly in UDP
//! payloads (the classic dialect has no outer envelope):
//!
//! ```text
//! num_tags: u32 LE
//! offsets:  [u32 LE; N-1]   (cumulative byte offsets into the value region)
//! tags:     [u32 LE; N]     (strictly ascending)
//! values:   [u8]            (concatenated; boundaries from offsets + total length)
//! ```
//!
//! Decoding is zero-copy: [`Message`] borrows the input buffer and every
//! value is a subslice of it, so views cannot outlive the buffer. Encoding
//! goes through [`MessageBuilder`], which enforces the tag-ordering invariant
//! at construction time.

use alloc::vec::Vec;

use crate::error::ProtocolError;
use crate::types::Tag;

/// Byte length of a message header holding `num_tags` tags:
/// 4 (count) + 4·(N−1) (offsets) + 4·N (tags) = 8·N.
pub const fn header_len(num_tags: usize) -> usize {
    num_tags * 8
}

/// A decoded tag-value message borrowing the underlying buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Message<'a> {
    num_tags: usize,
    offsets: &'a [u8],
    tags: &'a [u8],
    values: &'a [u8],
}

impl<'a> Message<'a> {
    /// Decode a message from raw bytes without copying values.
    ///
    /// Fails closed on every malformed shape: buffers shorter than the
    /// header, tag counts that would read past the buffer, tags out of
    /// order, and non-monotonic or out-of-range offsets.
    pub fn decode(buf: &'a [u8]) -> Result<Self, ProtocolError> {
        if buf.len() < 4 {
            return Err(ProtocolError::MessageTooShort {
                needed: 4,
                available: buf.len(),
            });
        }

        let num_tags = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;

        if num_tags == 0 {
            return Ok(Message {
                num_tags: 0,
                offsets: &[],
                tags: &[],
                values: &[],
            });
        }

        // 8·N overflows only for absurd declared counts; either way the
        // header cannot fit in the buffer.
        let header = match num_tags.checked_mul(8) {
            Some(len) if len <= buf.len() => len,
            _ => {
                return Err(ProtocolError::MessageTooShort {
                    needed: num_tags.saturating_mul(8),
                    available: buf.len(),
                });
            }
        };

        let offsets_len = (num_tags - 1) * 4;
        let msg = Message {
            num_tags,
            offsets: &buf[4..4 + offsets_len],
            tags: &buf[4 + offsets_len..header],
            values: &buf[header..],
        };

        for i in 1..num_tags {
            if msg.tag_at(i - 1) >= msg.tag_at(i) {
                return Err(ProtocolError::TagsOutOfOrder);
            }
        }

        let mut prev = 0usize;
        for i in 0..num_tags - 1 {
            let off = msg.offset_at(i);
            if off < prev || off > msg.values.len() {
                return Err(ProtocolError::OffsetOutOfBounds);
            }
            prev = off;
        }

        Ok(msg)
    }

    /// Number of tags in the message.
    pub fn num_tags(&self) -> usize {
        self.num_tags
    }

    /// Look up a tag's value. `None` if the tag is not present.
    pub fn get(&self, tag: Tag) -> Option<&'a [u8]> {
        // Tags are validated ascending, so binary search applies.
        let mut lo = 0;
        let mut hi = self.num_tags;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.tag_at(mid).cmp(&tag) {
                core::cmp::Ordering::Less => lo = mid + 1,
                core::cmp::Ordering::Greater => hi = mid,
                core::cmp::Ordering::Equal => return Some(self.value_at(mid)),
            }
        }
        None
    }

    /// Look up a required tag's value.
    pub fn require(&self, tag: Tag) -> Result<&'a [u8], ProtocolError> {
        self.get(tag).ok_or(ProtocolError::MissingTag { tag })
    }

    /// Decode a required tag's value as a nested message.
    ///
    /// Parse failures inside the value are reported as
    /// [`ProtocolError::BadNestedMessage`] naming `tag`, so a malformed CERT
    /// is distinguishable from a malformed outer message.
    pub fn nested(&self, tag: Tag) -> Result<Message<'a>, ProtocolError> {
        let data = self.require(tag)?;
        Message::decode(data).map_err(|_| ProtocolError::BadNestedMessage { tag })
    }

    fn tag_at(&self, idx: usize) -> Tag {
        let b = &self.tags[idx * 4..idx * 4 + 4];
        Tag::new(&[b[0], b[1], b[2], b[3]])
    }

    fn offset_at(&self, idx: usize) -> usize {
        let b = &self.offsets[idx * 4..idx * 4 + 4];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize
    }

    fn value_at(&self, idx: usize) -> &'a [u8] {
        let start = if idx == 0 { 0 } else { self.offset_at(idx - 1) };
        let end = if idx == self.num_tags - 1 {
            self.values.len()
        } else {
            self.offset_at(idx)
        };
        &self.values[start..end]
    }
}

/// Incremental encoder for tag-value messages.
///
/// Tags must be added in strictly ascending order and all values except the
/// last must be 4-byte aligned; both are construction-time contracts of the
/// wire format, so violations panic rather than surface as runtime errors.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    entries: Vec<(Tag, Vec<u8>)>,
}

impl MessageBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        MessageBuilder {
            entries: Vec::new(),
        }
    }

    /// Append a tag-value pair.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is not strictly greater than the previously added tag.
    pub fn add(&mut self, tag: Tag, value: &[u8]) -> &mut Self {
        if let Some((last, _)) = self.entries.last() {
            assert!(
                *last < tag,
                "tags must be added in strictly ascending order"
            );
        }
        self.entries.push((tag, value.to_vec()));
        self
    }

    /// Serialize the message.
    ///
    /// # Panics
    ///
    /// Panics if any value except the last is not 4-byte aligned.
    pub fn finish(&self) -> Vec<u8> {
        let num_tags = self.entries.len();
        if num_tags == 0 {
            return 0u32.to_le_bytes().to_vec();
        }

        for (tag, value) in self.entries.iter().take(num_tags - 1) {
            assert!(
                value.len() % 4 == 0,
                "value for tag {} must be 4-byte aligned",
                tag
            );
        }

        let values_len: usize = self.entries.iter().map(|(_, v)| v.len()).sum();
        let mut buf = Vec::with_capacity(header_len(num_tags) + values_len);

        buf.extend_from_slice(&(num_tags as u32).to_le_bytes());

        let mut cumulative = 0u32;
        for (_, value) in self.entries.iter().take(num_tags - 1) {
            cumulative += value.len() as u32;
            buf.extend_from_slice(&cumulative.to_le_bytes());
        }

        for (tag, _) in &self.entries {
            buf.extend_from_slice(&tag.to_bytes());
        }

        for (_, value) in &self.entries {
            buf.extend_from_slice(value);
        }

        buf
    }
}
