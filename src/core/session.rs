//! Editing session
//!
//! A [`Session`] owns one uploaded file: the verbatim header, the table as
//! parsed (restore point), the working table that edits are applied to, and
//! the ledger of pending edits. Every request goes through `&self` or
//! `&mut self`, so requests against one session are serialized.
//!
//! ```text
//! Empty --upload--> Parsed --query/edit--> Editing --apply--> Applied
//!   ^                                         ^                  |
//!   +------- failed upload (from any) -       +---query/edit-----+
//! ```

use crate::core::error::{Result, SessionError, SessionResult};
use crate::core::io::{self, Compression, DEFAULT_COMPRESSION_LEVEL};
use crate::core::ledger::{self, ApplyReport, CellKey, EditLedger};
use crate::core::query::{self, PositionFilter, DEFAULT_PAGE_SIZE};
use crate::core::table::{HeaderBlock, VariantRow, VariantTable};
use crate::formats::vcf;
use std::fmt;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No file loaded
    Empty,
    /// File parsed, nothing viewed or edited yet
    Parsed,
    /// Views requested or edits recorded
    Editing,
    /// Ledger committed into the working table
    Applied,
}

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Page size used when a query asks for 0
    pub default_page_size: usize,
    /// Gzip level for compressed exports (0-9)
    pub compression_level: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// One page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantQuery {
    pub chrom: String,
    /// Raw position filter text; blank means none
    pub position: Option<String>,
    /// 1-based page number; clamped to the available pages
    pub page: usize,
    /// Rows per page; 0 selects the configured default
    pub page_size: usize,
}

impl VariantQuery {
    pub fn new(chrom: impl Into<String>) -> Self {
        Self {
            chrom: chrom.into(),
            position: None,
            page: 1,
            page_size: 0,
        }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// Non-fatal problems found while answering a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryWarning {
    /// Position filter rejected; rows are filtered by chromosome only
    InvalidPositionFilter { input: String, message: String },
    /// Rows excluded from a position filter because POS is not an integer
    MalformedPositions { count: usize },
}

impl fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryWarning::InvalidPositionFilter { input, message } => write!(
                f,
                "Invalid position filter '{}': {}. Use a number or a start-end range.",
                input, message
            ),
            QueryWarning::MalformedPositions { count } => {
                write!(f, "{} rows skipped: POS is not an integer", count)
            }
        }
    }
}

/// A row prepared for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Index in the working table
    pub index: usize,
    /// Field values, with pending edits shown in sample columns
    pub fields: Vec<String>,
}

/// Answer to [`Session::query_variants`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage {
    pub rows: Vec<DisplayRow>,
    /// Page served, after clamping
    pub page: usize,
    pub total_pages: usize,
    /// Rows matching the filter across all pages
    pub total_rows: usize,
    pub warnings: Vec<QueryWarning>,
}

#[derive(Debug, Clone)]
struct LoadedFile {
    name: String,
    compression: Compression,
    header: HeaderBlock,
    original: VariantTable,
    working: VariantTable,
}

/// One user's editing session
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    state: SessionState,
    file: Option<LoadedFile>,
    ledger: EditLedger,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Empty,
            file: None,
            ledger: EditLedger::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn ledger(&self) -> &EditLedger {
        &self.ledger
    }

    /// Name the file was uploaded as
    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name.as_str())
    }

    /// Framing the upload arrived in
    pub fn compression(&self) -> Option<Compression> {
        self.file.as_ref().map(|f| f.compression)
    }

    /// Replace the session contents with a new upload
    ///
    /// Gzip is chosen by the `.gz` suffix or the gzip magic bytes. On any
    /// error the session is left `Empty`.
    pub fn upload_file(&mut self, bytes: &[u8], name: &str) -> Result<()> {
        self.file = None;
        self.ledger = EditLedger::new();
        self.state = SessionState::Empty;

        let compression = Compression::detect(name, bytes);
        let (header, table) = vcf::parse(bytes, compression)?;
        log::info!(
            "Loaded {}: {} variants, {} samples",
            name,
            table.len(),
            table.samples().len()
        );
        if table.samples().is_empty() {
            log::warn!("{} has no sample columns after FORMAT", name);
        }

        self.file = Some(LoadedFile {
            name: name.to_string(),
            compression,
            header,
            working: table.clone(),
            original: table,
        });
        self.state = SessionState::Parsed;
        Ok(())
    }

    fn loaded(&self) -> SessionResult<&LoadedFile> {
        self.file.as_ref().ok_or(SessionError::NoFile)
    }

    fn begin_editing(&mut self) -> SessionResult<()> {
        if self.file.is_none() {
            return Err(SessionError::NoFile);
        }
        self.state = SessionState::Editing;
        Ok(())
    }

    /// Current working table
    pub fn table(&self) -> SessionResult<&VariantTable> {
        Ok(&self.loaded()?.working)
    }

    /// Table as parsed, before any edits
    pub fn original_table(&self) -> SessionResult<&VariantTable> {
        Ok(&self.loaded()?.original)
    }

    pub fn header(&self) -> SessionResult<&HeaderBlock> {
        Ok(&self.loaded()?.header)
    }

    /// Distinct chromosomes, sorted
    pub fn list_chromosomes(&self) -> SessionResult<Vec<String>> {
        Ok(self.loaded()?.working.chromosomes())
    }

    pub fn list_samples(&self) -> SessionResult<Vec<String>> {
        Ok(self.loaded()?.working.samples().to_vec())
    }

    /// First `limit` rows of the working table
    pub fn preview(&self, limit: usize) -> SessionResult<&[VariantRow]> {
        Ok(self.loaded()?.working.head(limit))
    }

    /// Filter, paginate and render one page of variants
    pub fn query_variants(&mut self, request: &VariantQuery) -> SessionResult<QueryPage> {
        let page_size = if request.page_size == 0 {
            self.config.default_page_size
        } else {
            request.page_size
        };
        self.begin_editing()?;
        let table = &self.loaded()?.working;
        let mut warnings = Vec::new();

        let raw_position = request.position.as_deref().unwrap_or("");
        let position = match PositionFilter::parse(raw_position) {
            Ok(position) => position,
            Err(e) => {
                log::warn!("Ignoring position filter '{}': {}", raw_position, e);
                warnings.push(QueryWarning::InvalidPositionFilter {
                    input: raw_position.to_string(),
                    message: e.to_string(),
                });
                None
            }
        };

        let filtered = query::filter(table, &request.chrom, position.as_ref());
        if filtered.malformed_positions > 0 {
            warnings.push(QueryWarning::MalformedPositions {
                count: filtered.malformed_positions,
            });
        }

        let window = query::paginate(filtered.len(), page_size, request.page);
        let rows = filtered.indices[window.range()]
            .iter()
            .map(|&index| self.display_row(table, index))
            .collect();

        Ok(QueryPage {
            rows,
            page: window.page,
            total_pages: window.total_pages,
            total_rows: filtered.len(),
            warnings,
        })
    }

    fn display_row(&self, table: &VariantTable, index: usize) -> DisplayRow {
        let row = &table.rows()[index];
        let pos = table.pos(row);
        let fields = table
            .columns()
            .iter()
            .zip(row.fields())
            .map(|(column, value)| {
                if self.ledger.is_empty() || !table.is_sample(column) {
                    return value.clone();
                }
                let key = CellKey::new(row.chrom(), pos, column.as_str());
                self.ledger.pending(&key).unwrap_or(value.as_str()).to_string()
            })
            .collect();
        DisplayRow { index, fields }
    }

    /// Pending value for a cell, else its current value
    pub fn get_cell_value(&self, chrom: &str, pos: impl ToString, sample: &str) -> SessionResult<Option<String>> {
        let file = self.loaded()?;
        let key = CellKey::new(chrom, pos, sample);
        Ok(self.ledger.get(&file.working, &key).map(str::to_string))
    }

    /// Record a pending edit for a sample cell
    pub fn set_cell_value(
        &mut self,
        chrom: &str,
        pos: impl ToString,
        sample: &str,
        value: impl Into<String>,
    ) -> SessionResult<()> {
        if !self.loaded()?.working.is_sample(sample) {
            return Err(SessionError::UnknownSample(sample.to_string()));
        }
        let value: String = value.into();
        if !ledger::is_valid_cell_value(&value) {
            return Err(SessionError::InvalidValue(value));
        }
        self.begin_editing()?;
        self.ledger.set(CellKey::new(chrom, pos, sample), value);
        Ok(())
    }

    /// Commit every pending edit into the working table
    pub fn apply_edits(&mut self) -> SessionResult<ApplyReport> {
        let file = self.file.as_mut().ok_or(SessionError::NoFile)?;
        let report = self.ledger.apply_all(&mut file.working);
        log::info!(
            "Applied {} edits ({} cells changed, {} skipped)",
            report.applied,
            report.cells_changed,
            report.skipped_count()
        );
        self.state = SessionState::Applied;
        Ok(report)
    }

    /// Reset the working table to the parsed original; the ledger is kept
    pub fn restore_original(&mut self) -> SessionResult<()> {
        let file = self.file.as_mut().ok_or(SessionError::NoFile)?;
        file.working = file.original.clone();
        self.state = SessionState::Editing;
        Ok(())
    }

    /// Serialize the working table
    pub fn export_text(&self) -> SessionResult<String> {
        let file = self.loaded()?;
        Ok(vcf::serialize(&file.header, &file.working))
    }

    /// Serialize and gzip the working table
    pub fn export_compressed(&self) -> Result<Vec<u8>> {
        let text = self.export_text()?;
        let bytes = io::compress(&text, self.config.compression_level)?;
        log::info!("Compressed export: {} -> {} bytes", text.len(), bytes.len());
        Ok(bytes)
    }

    /// Download name derived from the upload name, e.g. `calls.edited.vcf.gz`
    pub fn export_file_name(&self, compressed: bool) -> SessionResult<String> {
        let name = self.loaded()?.name.as_str();
        let stem = [".vcf.gz", ".vcf", ".gz"]
            .iter()
            .find_map(|suffix| strip_suffix_ignore_case(name, suffix))
            .unwrap_or(name);
        let compression = if compressed { Compression::Gzip } else { Compression::Plain };
        Ok(format!("{}.edited.{}", stem, compression.extension()))
    }
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    match name.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(suffix) => Some(&name[..split]),
        _ => None,
    }
}
