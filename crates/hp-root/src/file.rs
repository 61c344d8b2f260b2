//! The `RootFile` handle: header, directories and object payloads.

use std::fs;
use std::path::{Path, PathBuf};

use crate::datasource::DataSource;
use crate::decompress::decompress;
use crate::directory::{Directory, DirectoryHeader};
use crate::error::{Result, RootError};
use crate::histogram::Histogram;
use crate::key::{Key, KeyInfo};
use crate::objects;
use crate::rbuffer::RBuffer;
use crate::walk::{self, WalkEntry};

const ROOT_MAGIC: &[u8; 4] = b"root";

/// Files at or above this format version use 64-bit seek pointers.
const LARGE_FILE_VERSION: u32 = 1_000_000;

/// Smallest buffer that can hold a file header.
const MIN_FILE_LEN: usize = 64;

/// Parsed file header plus the top-level directory record.
#[derive(Debug, Clone, Copy)]
struct FileHeader {
    version: u32,
    is_large: bool,
    top_dir: DirectoryHeader,
}

/// A ROOT file opened for reading.
///
/// The underlying map is released when the handle is dropped.
pub struct RootFile {
    data: DataSource,
    header: FileHeader,
    path: PathBuf,
}

impl std::fmt::Debug for RootFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootFile")
            .field("path", &self.path)
            .field("version", &self.header.version)
            .field("len", &self.data.len())
            .finish()
    }
}

impl RootFile {
    /// Memory-map and parse a ROOT file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::open(&path)?;
        // SAFETY: the map is read-only; a concurrent writer truncating the file
        // is outside what this reader supports.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        tracing::debug!(path = %path.display(), bytes = mmap.len(), "opened ROOT file");
        Self::from_source(DataSource::Mmap(mmap), path)
    }

    /// Parse a ROOT file held in memory.
    pub fn from_bytes(data: Vec<u8>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::from_source(DataSource::Owned(data), path.into())
    }

    fn from_source(data: DataSource, path: PathBuf) -> Result<Self> {
        if data.len() < MIN_FILE_LEN || &data[..4] != ROOT_MAGIC {
            return Err(RootError::BadMagic);
        }
        let header = parse_header(&data)?;
        Ok(Self { data, header, path })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ROOT format version from the file header.
    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Whether the file uses 64-bit seek pointers.
    pub fn is_large(&self) -> bool {
        self.header.is_large
    }

    /// Keys of the top-level directory, every cycle included.
    pub fn list_keys(&self) -> Result<Vec<KeyInfo>> {
        Ok(self.top_directory()?.keys().iter().map(KeyInfo::from).collect())
    }

    /// Every non-directory object in the file, depth first.
    pub fn walk(&self) -> Result<Vec<WalkEntry>> {
        walk::walk(self)
    }

    /// Read a histogram by path, e.g. `"signal/h_pt"`.
    pub fn get_histogram(&self, path: &str) -> Result<Histogram> {
        let key = self.resolve_key(path)?;
        let payload = self.read_key_payload(&key)?;
        objects::read_histogram(&payload, &key.class_name)
    }

    /// Class name and metadata of the object at `path`.
    pub fn key_info(&self, path: &str) -> Result<KeyInfo> {
        self.resolve_key(path).map(|k| KeyInfo::from(&k))
    }

    pub(crate) fn top_directory(&self) -> Result<Directory> {
        Directory::read(&self.data, &self.header.top_dir, self.header.is_large)
    }

    pub(crate) fn subdirectory(&self, key: &Key) -> Result<Directory> {
        if !key.is_directory() {
            return Err(RootError::NotADirectory {
                name: key.name.clone(),
                class_name: key.class_name.clone(),
            });
        }
        let payload = self.read_key_payload(key)?;
        Directory::from_payload(&payload, &self.data, self.header.is_large)
    }

    fn resolve_key(&self, path: &str) -> Result<Key> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, dirs)) = parts.split_last() else {
            return Err(RootError::KeyNotFound(path.to_string()));
        };

        let mut dir = self.top_directory()?;
        for &part in dirs {
            let key = dir
                .find_key(part)
                .ok_or_else(|| RootError::KeyNotFound(format!("{part} (in path {path})")))?;
            dir = self.subdirectory(key)?;
        }
        dir.find_key(last)
            .cloned()
            .ok_or_else(|| RootError::KeyNotFound(format!("{last} (in path {path})")))
    }

    /// Object bytes behind `key`, inflated when stored compressed.
    pub(crate) fn read_key_payload(&self, key: &Key) -> Result<Vec<u8>> {
        let start = usize::try_from(key.seek_key).unwrap_or(usize::MAX);
        let record = start
            .checked_add(key.n_bytes as usize)
            .and_then(|end| self.data.get(start..end))
            .ok_or(RootError::BufferUnderflow {
                offset: start,
                need: key.n_bytes as usize,
                have: self.data.len().saturating_sub(start),
            })?;
        let body = record.get(usize::from(key.key_len)..).ok_or_else(|| {
            RootError::Deserialization(format!("key '{}' shorter than its header", key.name))
        })?;

        if key.is_compressed() {
            decompress(body, key.obj_len as usize)
        } else {
            Ok(body.to_vec())
        }
    }
}

/// Parse the fixed file header and the top-level TDirectory behind it.
///
/// ```text
/// offset  field
///    0    "root"
///    4    fVersion      u32
///    8    fBEGIN        u32
///   12    fEND, fSeekFree            u32 each (u64 when large)
///         fNbytesFree, nfree, fNbytesName  u32
///         fUnits u8, fCompress u32, fSeekInfo (u32|u64), fNbytesInfo u32, fUUID
/// ```
/// The directory record sits at `fBEGIN + fNbytesName`.
fn parse_header(data: &[u8]) -> Result<FileHeader> {
    let mut r = RBuffer::new(data);
    r.skip(4)?;
    let version = r.read_u32()?;
    let is_large = version >= LARGE_FILE_VERSION;
    let begin = r.read_u32()? as usize;
    let _end = r.read_seek(is_large)?;
    let _seek_free = r.read_seek(is_large)?;
    let _nbytes_free = r.read_u32()?;
    let _n_free = r.read_u32()?;
    let nbytes_name = r.read_u32()? as usize;

    let dir_offset = begin + nbytes_name;
    if dir_offset >= data.len() {
        return Err(RootError::Deserialization("top directory lies past end of file".into()));
    }
    r.set_pos(dir_offset)?;
    let top_dir = DirectoryHeader::read(&mut r)?;

    Ok(FileHeader { version, is_large, top_dir })
}
