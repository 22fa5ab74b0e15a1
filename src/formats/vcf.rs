//! VCF codec
//!
//! Splits VCF text into the verbatim header block and a [`VariantTable`],
//! and joins them back. Header lines are never reparsed, so a table without
//! edits serializes to the bytes it was parsed from.

use crate::core::{FormatError, FormatResult, Result};
use crate::core::io::{self, Compression};
use crate::core::table::{HeaderBlock, VariantTable};
use memchr::memchr_iter;

/// Prefix of meta-information lines
pub const META_PREFIX: &str = "##";

/// Prefix of the column definition line
pub const COLUMN_LINE_PREFIX: &str = "#CHROM";

/// Split a line on tabs without allocating per field
pub fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(16);
    let mut start = 0;
    for tab in memchr_iter(b'\t', bytes) {
        fields.push(&line[start..tab]);
        start = tab + 1;
    }
    fields.push(&line[start..]);
    fields
}

/// Parse raw upload bytes, decompressing first when gzip-framed
pub fn parse(bytes: &[u8], compression: Compression) -> Result<(HeaderBlock, VariantTable)> {
    let plain = io::unframe(bytes, compression)?;
    let text = std::str::from_utf8(&plain).map_err(|e| FormatError::InvalidUtf8(e.to_string()))?;
    Ok(parse_text(text)?)
}

/// Parse VCF text
pub fn parse_text(text: &str) -> FormatResult<(HeaderBlock, VariantTable)> {
    let mut meta = Vec::new();
    let mut header: Option<(HeaderBlock, VariantTable)> = None;
    let mut orphan_row: Option<usize> = None;

    for (i, raw) in text.split('\n').enumerate() {
        let line_no = i + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            if header.is_some() {
                return Err(if line.starts_with(COLUMN_LINE_PREFIX) {
                    FormatError::DuplicateColumnLine { line: line_no }
                } else {
                    FormatError::HeaderAfterColumns { line: line_no }
                });
            }
            if let Some(line) = orphan_row {
                return Err(FormatError::DataBeforeColumnLine { line });
            }
            if line.starts_with(META_PREFIX) {
                meta.push(line.to_string());
            } else if line.starts_with(COLUMN_LINE_PREFIX) {
                let block = HeaderBlock::new(std::mem::take(&mut meta), line.to_string());
                let table = VariantTable::new(block.column_names())?;
                header = Some((block, table));
            } else {
                return Err(FormatError::UnexpectedHeaderLine {
                    line: line_no,
                    content: line.to_string(),
                });
            }
            continue;
        }

        match header.as_mut() {
            Some((_, table)) => {
                let fields = split_fields(line).into_iter().map(str::to_string).collect();
                table.push_row(fields, line_no)?;
            }
            None => {
                orphan_row.get_or_insert(line_no);
            }
        }
    }

    let (block, table) = header.ok_or(FormatError::MissingColumnLine)?;
    log::debug!(
        "Parsed VCF: {} meta lines, {} columns, {} rows",
        block.meta.len(),
        table.columns().len(),
        table.len()
    );
    Ok((block, table))
}

/// Join header and rows back into VCF text
pub fn serialize(header: &HeaderBlock, table: &VariantTable) -> String {
    let mut output = String::with_capacity(64 * (table.len() + header.meta.len() + 1));

    for line in &header.meta {
        output.push_str(line);
        output.push('\n');
    }
    output.push_str(&header.column_line);
    output.push('\n');

    for row in table.rows() {
        for (i, field) in row.fields().iter().enumerate() {
            if i > 0 {
                output.push('\t');
            }
            output.push_str(field);
        }
        output.push('\n');
    }

    output
}

/// Serialize and gzip-frame in one step
pub fn serialize_compressed(header: &HeaderBlock, table: &VariantTable, level: u32) -> Result<Vec<u8>> {
    Ok(io::compress(&serialize(header, table), level)?)
}
