//! TDirectory records and their key lists.

use crate::error::Result;
use crate::key::Key;
use crate::rbuffer::RBuffer;

/// Directory records written with 64-bit seeks carry `version > 1000`.
const LARGE_DIR_VERSION: u16 = 1000;

/// The fixed part of a streamed TDirectory.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryHeader {
    /// Record version.
    pub version: u16,
    /// Bytes in the key list record.
    pub nbytes_keys: u32,
    /// Bytes in the name record in front of this header.
    pub nbytes_name: u32,
    /// File offset of the directory's own key.
    pub seek_dir: u64,
    /// File offset of the parent directory.
    pub seek_parent: u64,
    /// File offset of the key list record (0 = empty directory).
    pub seek_keys: u64,
}

impl DirectoryHeader {
    /// Read a directory record at the cursor.
    pub fn read(r: &mut RBuffer) -> Result<Self> {
        let version = r.read_u16()?;
        let _datime_c = r.read_u32()?;
        let _datime_m = r.read_u32()?;
        let nbytes_keys = r.read_u32()?;
        let nbytes_name = r.read_u32()?;

        let large = version > LARGE_DIR_VERSION;
        let seek_dir = r.read_seek(large)?;
        let seek_parent = r.read_seek(large)?;
        let seek_keys = r.read_seek(large)?;

        Ok(Self { version, nbytes_keys, nbytes_name, seek_dir, seek_parent, seek_keys })
    }
}

/// The keys of one directory, in on-disk order.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    keys: Vec<Key>,
}

impl Directory {
    /// Load the key list a directory header points at.
    ///
    /// The list is itself stored behind a TKey header, followed by a u32 key
    /// count and that many key headers.
    pub fn read(file_data: &[u8], header: &DirectoryHeader, file_is_large: bool) -> Result<Self> {
        if header.seek_keys == 0 {
            return Ok(Self::default());
        }
        let mut r = RBuffer::new(file_data);
        r.set_pos(usize::try_from(header.seek_keys).unwrap_or(usize::MAX))?;

        let _list_key = Key::read(&mut r, file_is_large)?;
        let n_keys = r.read_u32()? as usize;

        let mut keys = Vec::with_capacity(n_keys.min(r.remaining()));
        for _ in 0..n_keys {
            keys.push(Key::read(&mut r, file_is_large)?);
        }
        tracing::debug!(seek_keys = header.seek_keys, n_keys, "read key list");
        Ok(Self { keys })
    }

    /// Parse a subdirectory from the payload of its TDirectoryFile key.
    pub fn from_payload(payload: &[u8], file_data: &[u8], file_is_large: bool) -> Result<Self> {
        let header = DirectoryHeader::read(&mut RBuffer::new(payload))?;
        Self::read(file_data, &header, file_is_large)
    }

    /// All keys, every cycle included.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Keys with only the highest cycle of each name, first-appearance order.
    pub fn latest_keys(&self) -> Vec<&Key> {
        let mut out: Vec<&Key> = Vec::with_capacity(self.keys.len());
        for key in &self.keys {
            match out.iter_mut().find(|k| k.name == key.name) {
                Some(slot) if slot.cycle < key.cycle => *slot = key,
                Some(_) => {}
                None => out.push(key),
            }
        }
        out
    }

    /// Find a key by name, highest cycle wins.
    pub fn find_key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().filter(|k| k.name == name).max_by_key(|k| k.cycle)
    }
}
