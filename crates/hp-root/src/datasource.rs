//! Byte storage behind an open [`RootFile`](crate::RootFile).

use std::ops::Deref;

/// Either a read-only memory map or an owned buffer.
///
/// Dropping the source unmaps the file, which is what releases the input
/// handle once a `RootFile` goes out of scope.
pub enum DataSource {
    /// Bytes owned in memory (`RootFile::from_bytes`, tests).
    Owned(Vec<u8>),
    /// Memory-mapped file on disk.
    Mmap(memmap2::Mmap),
}

impl Deref for DataSource {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match self {
            DataSource::Owned(v) => v,
            DataSource::Mmap(m) => m,
        }
    }
}
