//! Deserialization of stored objects, dispatched on class name.

mod hist;

use crate::error::{Result, RootError};
use crate::histogram::Histogram;

pub use hist::{ArrayKind, HistClass};

/// Decode a histogram payload stored under `class_name`.
pub fn read_histogram(payload: &[u8], class_name: &str) -> Result<Histogram> {
    let class = HistClass::parse(class_name)
        .ok_or_else(|| RootError::UnsupportedClass(class_name.to_string()))?;
    hist::read(payload, class, class_name)
}
