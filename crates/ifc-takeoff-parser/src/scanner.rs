// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast record scanner using SIMD-accelerated byte searching
//!
//! Finds record boundaries in a STEP file without decoding attributes, and
//! reads the few header records the take-off reports.

use crate::tokenizer::parse_record;
use ifc_takeoff_model::{EntityId, GraphError, IfcType, ModelMetadata, Result};
use memchr::{memchr, memchr2};
use rustc_hash::FxHashMap;

const MAGIC: &str = "ISO-10303-21";

/// Location of one data record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordSpan {
    /// Entity ID
    pub id: u32,
    /// Byte offset of the leading `#`
    pub start: usize,
    /// Byte offset one past the terminating `;`
    pub end: usize,
}

/// Record index: ID -> byte range, and type -> IDs in file order
#[derive(Debug, Default)]
pub struct EntityIndex {
    spans: FxHashMap<u32, (usize, usize)>,
    by_type: FxHashMap<IfcType, Vec<EntityId>>,
}

impl EntityIndex {
    /// Scan the DATA section of `content` and index every record
    pub fn build(content: &str) -> Self {
        let mut index = Self::default();
        let mut scanner = EntityScanner::new(content);

        while let Some((span, type_name)) = scanner.next_record() {
            index.spans.insert(span.id, (span.start, span.end));
            index
                .by_type
                .entry(IfcType::parse(type_name))
                .or_default()
                .push(EntityId(span.id));
        }

        index
    }

    /// Byte range of a record
    pub fn span(&self, id: EntityId) -> Option<(usize, usize)> {
        self.spans.get(&id.0).copied()
    }

    /// IDs of all records of the given type, in file order
    pub fn ids_of(&self, ifc_type: &IfcType) -> &[EntityId] {
        self.by_type.get(ifc_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// True when no record was found
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Streaming scanner over the DATA section
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner positioned after `DATA;` (or at the start when the
    /// section marker is missing)
    pub fn new(content: &'a str) -> Self {
        let pos = content.find("DATA;").map(|p| p + 5).unwrap_or(0);
        Self { content, pos }
    }

    /// Advance to the next `#id=TYPE(...);` record
    ///
    /// Returns the span and the raw type keyword.
    pub fn next_record(&mut self) -> Option<(RecordSpan, &'a str)> {
        let bytes = self.content.as_bytes();

        while self.pos < bytes.len() {
            let start = self.pos + memchr(b'#', &bytes[self.pos..])?;
            self.pos = start + 1;

            let id_end = skip_while(bytes, self.pos, |b| b.is_ascii_digit());
            if id_end == self.pos {
                continue;
            }
            let Ok(id) = self.content[self.pos..id_end].parse::<u32>() else {
                continue;
            };

            let eq = skip_while(bytes, id_end, |b| b == b' ' || b == b'\t');
            if bytes.get(eq) != Some(&b'=') {
                // A reference, not a definition
                self.pos = id_end;
                continue;
            }

            let type_start = skip_while(bytes, eq + 1, |b| b.is_ascii_whitespace());
            let type_end = skip_while(bytes, type_start, |b| {
                b.is_ascii_alphanumeric() || b == b'_'
            });
            if type_end == type_start {
                self.pos = type_start;
                continue;
            }

            let end = record_end(bytes, type_end)?;
            self.pos = end;

            let span = RecordSpan { id, start, end };
            return Some((span, &self.content[type_start..type_end]));
        }

        None
    }
}

fn skip_while(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Offset one past the `;` closing a record, ignoring `;` inside strings
fn record_end(bytes: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let hit = pos + memchr2(b'\'', b';', &bytes[pos..])?;
        if bytes[hit] == b';' {
            return Some(hit + 1);
        }
        // Skip the quoted run; '' inside a string is two adjacent quotes and
        // simply reopens it on the next iteration.
        let close = hit + 1 + memchr(b'\'', &bytes[hit + 1..])?;
        pos = close + 1;
    }
}

/// Read schema and file name from the HEADER section
///
/// Fails when the content is not a STEP physical file.
pub fn parse_header(content: &str) -> Result<ModelMetadata> {
    if !content
        .trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with(MAGIC)
    {
        return Err(GraphError::format(format!("missing {MAGIC} signature")));
    }
    if !content.contains("DATA;") {
        return Err(GraphError::format("missing DATA section"));
    }

    let start = content
        .find("HEADER;")
        .ok_or_else(|| GraphError::InvalidHeader("missing HEADER section".into()))?
        + "HEADER;".len();
    let end = content[start..]
        .find("ENDSEC;")
        .map(|e| start + e)
        .ok_or_else(|| GraphError::InvalidHeader("unterminated HEADER section".into()))?;
    let header = &content[start..end];
    let bytes = header.as_bytes();

    let mut metadata = ModelMetadata::default();
    let mut pos = 0;
    while pos < bytes.len() {
        let Some(stop) = record_end(bytes, pos) else {
            break;
        };
        let text = &header[pos..stop];
        pos = stop;

        let (name, attrs) = parse_record(text).map_err(GraphError::InvalidHeader)?;
        let text_at = |i: usize| {
            attrs
                .get(i)
                .and_then(|v| v.as_string())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        match name.to_ascii_uppercase().as_str() {
            "FILE_SCHEMA" => {
                metadata.schema_version = attrs
                    .first()
                    .and_then(|v| v.as_list())
                    .and_then(|l| l.first())
                    .and_then(|v| v.as_string())
                    .unwrap_or_default()
                    .to_string();
            }
            "FILE_NAME" => {
                metadata.file_name = text_at(0);
                metadata.timestamp = text_at(1);
                metadata.originating_system = text_at(5);
            }
            _ => {}
        }
    }

    Ok(metadata)
}
