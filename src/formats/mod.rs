//! File format adapters
//!
//! The VCF codec and the tab-delimited edit lists read by the CLI.

pub mod edits;
pub mod vcf;

pub use edits::parse_edit_list;
pub use vcf::{parse, parse_text, serialize, serialize_compressed};
