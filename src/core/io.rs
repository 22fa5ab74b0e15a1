//! Input loading and gzip framing
//!
//! Reads uploaded files with a buffered or memory-mapped strategy and
//! converts between plain text and gzip-compressed bytes.

use crate::core::error::CompressionError;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::ops::Deref;
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Threshold for using memory mapping (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Default gzip level for exported files
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// I/O strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoStrategy {
    /// Use buffered reading with configurable buffer size
    Buffered(usize),
    /// Use memory mapping for the entire file
    MemoryMapped,
    /// Automatically select based on file size
    #[default]
    Auto,
}

/// Framing of an uploaded or exported VCF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Plain text (.vcf)
    #[default]
    Plain,
    /// Gzip compressed (.vcf.gz)
    Gzip,
}

impl Compression {
    /// Select framing by file-name suffix
    pub fn from_file_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".gz") {
            Compression::Gzip
        } else {
            Compression::Plain
        }
    }

    /// Select framing by suffix, falling back to the gzip magic bytes
    pub fn detect(name: &str, bytes: &[u8]) -> Self {
        match Self::from_file_name(name) {
            Compression::Gzip => Compression::Gzip,
            Compression::Plain if bytes.starts_with(&GZIP_MAGIC) => Compression::Gzip,
            Compression::Plain => Compression::Plain,
        }
    }

    /// File-name suffix for this framing
    pub fn extension(self) -> &'static str {
        match self {
            Compression::Plain => "vcf",
            Compression::Gzip => "vcf.gz",
        }
    }
}

/// Decompress a gzip stream, including multi-member (BGZF) files
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut decoder = MultiGzDecoder::new(bytes);
    let mut out = Vec::with_capacity(bytes.len() * 4);
    decoder
        .read_to_end(&mut out)
        .map_err(CompressionError::Decode)?;
    Ok(out)
}

/// Gzip-frame UTF-8 text
pub fn compress(text: &str, level: u32) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(text.len() / 4),
        flate2::Compression::new(level.min(9)),
    );
    encoder
        .write_all(text.as_bytes())
        .map_err(CompressionError::Encode)?;
    encoder.finish().map_err(CompressionError::Encode)
}

/// Return plain bytes for the given framing; plain input is borrowed as-is
pub fn unframe(bytes: &[u8], compression: Compression) -> Result<Cow<'_, [u8]>, CompressionError> {
    match compression {
        Compression::Gzip => decompress(bytes).map(Cow::Owned),
        Compression::Plain => Ok(Cow::Borrowed(bytes)),
    }
}

/// Contents of an input file, either mapped or read into memory
pub enum InputBytes {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl InputBytes {
    /// Get the entire file content as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            InputBytes::Mapped(mmap) => &mmap[..],
            InputBytes::Buffered(bytes) => bytes.as_slice(),
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, InputBytes::Mapped(_))
    }
}

impl Deref for InputBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Read a whole input file using the given strategy
pub fn read_input<P: AsRef<Path>>(path: P, strategy: IoStrategy) -> io::Result<InputBytes> {
    let file = File::open(path.as_ref())?;
    let file_size = file.metadata()?.len();

    let mapped = match strategy {
        IoStrategy::Buffered(_) => false,
        IoStrategy::MemoryMapped => true,
        IoStrategy::Auto => file_size >= MMAP_THRESHOLD,
    };

    if mapped {
        // SAFETY: We assume the file won't be modified while mapped
        let mmap = unsafe { Mmap::map(&file)? };
        log::debug!("Mapped {} bytes from {:?}", mmap.len(), path.as_ref());
        return Ok(InputBytes::Mapped(mmap));
    }

    let capacity = match strategy {
        IoStrategy::Buffered(size) => size,
        _ => DEFAULT_BUFFER_SIZE,
    };
    let mut reader = BufReader::with_capacity(capacity, file);
    let mut bytes = Vec::with_capacity(file_size as usize);
    reader.read_to_end(&mut bytes)?;
    Ok(InputBytes::Buffered(bytes))
}

/// Read a whole input file, picking the strategy by size
pub fn read_input_auto<P: AsRef<Path>>(path: P) -> io::Result<InputBytes> {
    read_input(path, IoStrategy::Auto)
}
