//! Core editing functionality
//!
//! This module contains the in-memory table, the position filter and
//! pagination, the edit ledger, and the session that sequences them.

mod error;
pub mod io;
pub mod ledger;
pub mod query;
pub mod session;
pub mod table;

pub use error::{
    CompressionError, EditListError, FilterError, FormatError, FormatResult, Result,
    SessionError, SessionResult, VcfEditError,
};
pub use io::{Compression, InputBytes, IoStrategy, DEFAULT_BUFFER_SIZE, DEFAULT_COMPRESSION_LEVEL, MMAP_THRESHOLD};
pub use ledger::{is_valid_cell_value, ApplyReport, CellKey, EditLedger, SkipReason};
pub use query::{filter, paginate, FilteredRows, PageWindow, PositionFilter, DEFAULT_PAGE_SIZE};
pub use session::{
    DisplayRow, QueryPage, QueryWarning, Session, SessionConfig, SessionState, VariantQuery,
};
pub use table::{HeaderBlock, VariantRow, VariantTable, FIXED_COLUMNS};
