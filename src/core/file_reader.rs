//! Source file reading
//!
//! Reads the active file once into memory:
//! - files above the size limit are refused
//! - invalid UTF-8 is decoded lossily
//! - a leading byte-order mark is dropped

use log::{debug, warn};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::core::error::PreviewError;

/// Default maximum source size in bytes (8 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 8 * 1024 * 1024;

/// Configuration for file reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileReadConfig {
    /// Maximum file size to process (bytes)
    pub max_file_size: u64,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Read a source file into a string
pub fn read_source(path: &Path, config: &FileReadConfig) -> Result<String, PreviewError> {
    let io_error = |source: io::Error| PreviewError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_error)?;
    if metadata.is_dir() {
        return Err(io_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "is a directory",
        )));
    }
    if metadata.len() > config.max_file_size {
        return Err(io_error(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "file is {} bytes, larger than the {} byte limit",
                metadata.len(),
                config.max_file_size
            ),
        )));
    }

    // the handle is dropped as soon as the bytes are in memory
    let bytes = {
        let mut file = fs::File::open(path).map_err(io_error)?;
        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        file.read_to_end(&mut bytes).map_err(io_error)?;
        bytes
    };
    debug!("read {} bytes from {}", bytes.len(), path.display());

    Ok(decode(bytes, path))
}

fn decode(bytes: Vec<u8>, path: &Path) -> String {
    let mut content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            warn!("{} is not valid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    if content.starts_with('\u{feff}') {
        content.drain(..'\u{feff}'.len_utf8());
    }
    content
}
