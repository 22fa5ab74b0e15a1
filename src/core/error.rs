//! Error types for the VCF genotype editor
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for editor operations
#[derive(Debug, Error)]
pub enum VcfEditError {
    /// Malformed VCF content, fatal to the current upload
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Unparseable position filter
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Gzip framing errors
    #[error("Compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Malformed edit list
    #[error("Edit list error: {0}")]
    EditList(#[from] EditListError),

    /// Session misuse
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while splitting VCF text into header, columns and rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No line starting with `#CHROM`
    #[error("Missing column definition line (#CHROM ...)")]
    MissingColumnLine,

    /// More than one `#CHROM` line
    #[error("Duplicate column definition line at line {line}")]
    DuplicateColumnLine { line: usize },

    /// Header line found after the column definition line
    #[error("Header line after column definition at line {line}")]
    HeaderAfterColumns { line: usize },

    /// Data line found before the column definition line
    #[error("Data line before column definition at line {line}")]
    DataBeforeColumnLine { line: usize },

    /// Single-`#` line that is not the column definition
    #[error("Unexpected header line at line {line}: {content}")]
    UnexpectedHeaderLine { line: usize, content: String },

    /// Column name occurs twice
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// Required column absent from the column line
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    /// Data line with the wrong number of fields
    #[error("Invalid VCF format at line {line}: expected {expected} fields, found {found}")]
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Input is not valid UTF-8
    #[error("Invalid UTF-8 in input: {0}")]
    InvalidUtf8(String),
}

/// Errors raised while parsing a position filter expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Single position is not a non-negative integer
    #[error("Invalid position '{0}': use a number or a start-end range")]
    InvalidPosition(String),

    /// Range bounds are not two non-negative integers
    #[error("Invalid position range '{0}': use start-end")]
    InvalidRange(String),
}

/// Errors in gzip encoding or decoding
#[derive(Debug, Error)]
pub enum CompressionError {
    /// Malformed gzip stream
    #[error("Failed to decompress gzip stream: {0}")]
    Decode(#[source] std::io::Error),

    /// Encoder failure
    #[error("Failed to compress output: {0}")]
    Encode(#[source] std::io::Error),
}

/// Errors in a tab-delimited edit list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid edit list at line {line}: {message}")]
pub struct EditListError {
    pub line: usize,
    pub message: String,
}

/// Errors from requests made against a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Request needs a loaded file
    #[error("No VCF file loaded")]
    NoFile,

    /// Sample column does not exist
    #[error("Unknown sample: {0}")]
    UnknownSample(String),

    /// Cell value contains a tab or line break
    #[error("Invalid cell value {0:?}: tabs and line breaks are not allowed")]
    InvalidValue(String),
}

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, VcfEditError>;

/// Result type alias for VCF parsing
pub type FormatResult<T> = std::result::Result<T, FormatError>;

/// Result type alias for session requests
pub type SessionResult<T> = std::result::Result<T, SessionError>;
