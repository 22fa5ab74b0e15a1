//! VcfGenotypeEditor - browse and edit per-sample genotypes in VCF files
//!
//! Parses a VCF (plain or gzip) into an in-memory table, serves filtered and
//! paginated views of it, records cell edits keyed by (CHROM, POS, sample),
//! and writes the edited file back out byte-for-byte apart from those cells.
//!
//! # Example
//!
//! ```ignore
//! use vcf_editor::{Session, VariantQuery};
//!
//! let mut session = Session::new();
//! session.upload_file(&bytes, "calls.vcf.gz")?;
//!
//! let page = session.query_variants(&VariantQuery::new("1").with_position("100-200"))?;
//! session.set_cell_value("1", 150, "NA12878", "1/1")?;
//! let report = session.apply_edits()?;
//!
//! let gz = session.export_compressed()?;
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    ApplyReport, CellKey, Compression, EditLedger, FilterError, FormatError, HeaderBlock,
    PositionFilter, QueryPage, QueryWarning, Session, SessionConfig, SessionError, SessionState,
    VariantQuery, VariantTable, VcfEditError,
};
pub use formats::{edits, vcf};
