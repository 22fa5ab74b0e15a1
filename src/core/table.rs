//! In-memory VCF table
//!
//! Rows keep every field as the string found in the file, so that a table
//! serializes back to the same bytes unless a cell was edited.

use crate::core::error::{FormatError, FormatResult};
use std::collections::{BTreeSet, HashMap};

/// Column index of CHROM
pub const CHROM_COLUMN: usize = 0;

/// Number of fixed columns before the sample columns (CHROM..FORMAT)
pub const FIXED_COLUMNS: usize = 9;

/// Raw header lines, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderBlock {
    /// Lines starting with `##`, in file order
    pub meta: Vec<String>,
    /// The `#CHROM ...` line
    pub column_line: String,
}

impl HeaderBlock {
    pub fn new(meta: Vec<String>, column_line: String) -> Self {
        Self { meta, column_line }
    }

    /// Column names as named by the column line
    pub fn column_names(&self) -> Vec<String> {
        self.column_line
            .trim_start_matches('#')
            .split('\t')
            .map(str::to_string)
            .collect()
    }
}

/// One variant record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRow {
    fields: Vec<String>,
}

impl VariantRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Chromosome name
    pub fn chrom(&self) -> &str {
        &self.fields[CHROM_COLUMN]
    }

    /// Field by column index
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// All fields in column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

/// Parsed variant records with named columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    pos_column: usize,
    rows: Vec<VariantRow>,
}

impl VariantTable {
    /// Create an empty table, validating the column names
    pub fn new(columns: Vec<String>) -> FormatResult<Self> {
        if columns.get(CHROM_COLUMN).map(String::as_str) != Some("CHROM") {
            return Err(FormatError::MissingColumn("CHROM"));
        }
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(FormatError::DuplicateColumn(name.clone()));
            }
        }
        let pos_column = *index.get("POS").ok_or(FormatError::MissingColumn("POS"))?;

        Ok(Self {
            columns,
            index,
            pos_column,
            rows: Vec::new(),
        })
    }

    /// Append a row; `line` is the 1-based source line used in errors
    pub fn push_row(&mut self, fields: Vec<String>, line: usize) -> FormatResult<()> {
        if fields.len() != self.columns.len() {
            return Err(FormatError::FieldCountMismatch {
                line,
                expected: self.columns.len(),
                found: fields.len(),
            });
        }
        self.rows.push(VariantRow::new(fields));
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Sample columns (everything after FORMAT)
    pub fn samples(&self) -> &[String] {
        self.columns.get(FIXED_COLUMNS..).unwrap_or(&[])
    }

    pub fn is_sample(&self, name: &str) -> bool {
        self.column_index(name).is_some_and(|i| i >= FIXED_COLUMNS)
    }

    pub fn rows(&self) -> &[VariantRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&VariantRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `limit` rows
    pub fn head(&self, limit: usize) -> &[VariantRow] {
        &self.rows[..limit.min(self.rows.len())]
    }

    /// POS field of a row, as stored
    pub fn pos<'a>(&self, row: &'a VariantRow) -> &'a str {
        &row.fields[self.pos_column]
    }

    /// Distinct chromosome names, sorted
    pub fn chromosomes(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(VariantRow::chrom)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Indices of rows whose CHROM and POS equal the given strings
    pub fn rows_at<'a>(&'a self, chrom: &'a str, pos: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row.chrom() == chrom && self.pos(row) == pos)
            .map(|(i, _)| i)
    }

    /// Cell value by row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.field(col)
    }

    /// Overwrite a cell, returning true if the value changed
    pub fn set_cell(&mut self, row: usize, column: usize, value: &str) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.fields.get_mut(column)) {
            Some(cell) if cell.as_str() != value => {
                value.clone_into(cell);
                true
            }
            _ => false,
        }
    }
}
