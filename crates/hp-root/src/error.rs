//! Error types for ROOT file access.

use thiserror::Error;

/// Errors raised while reading a ROOT file.
#[derive(Error, Debug)]
pub enum RootError {
    /// I/O error opening or mapping the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the `root` magic.
    #[error("not a ROOT file (bad magic)")]
    BadMagic,

    /// A record claims more bytes than the buffer holds.
    #[error("unexpected end of buffer at offset {offset}, need {need} bytes, have {have}")]
    BufferUnderflow {
        /// Read position when the underflow happened.
        offset: usize,
        /// Bytes requested.
        need: usize,
        /// Bytes left.
        have: usize,
    },

    /// No key with this name in the directory.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A path component names something that is not a directory.
    #[error("'{name}' is not a directory (class: {class_name})")]
    NotADirectory {
        /// Offending path component.
        name: String,
        /// Its stored class name.
        class_name: String,
    },

    /// The object's class has no streamer here.
    #[error("unsupported class: {0}")]
    UnsupportedClass(String),

    /// Compressed block could not be inflated.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Streamed object does not match the expected layout.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Result alias for ROOT operations.
pub type Result<T> = std::result::Result<T, RootError>;
