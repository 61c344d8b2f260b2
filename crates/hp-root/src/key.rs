//! TKey records: the per-object header ROOT places in front of every payload.

use crate::error::Result;
use crate::rbuffer::RBuffer;

/// Keys written with 64-bit seek pointers carry `version > 1000`.
const LARGE_KEY_VERSION: u16 = 1000;

/// A parsed TKey header.
#[derive(Debug, Clone)]
pub struct Key {
    /// Bytes occupied on disk: key header plus (possibly compressed) payload.
    pub n_bytes: u32,
    /// Key class version.
    pub version: u16,
    /// Uncompressed payload length.
    pub obj_len: u32,
    /// Length of the key header.
    pub key_len: u16,
    /// Cycle number of this name within its directory.
    pub cycle: u16,
    /// File offset of this key.
    pub seek_key: u64,
    /// File offset of the owning directory.
    pub seek_pdir: u64,
    /// Class name of the stored object.
    pub class_name: String,
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
}

/// What callers outside the crate get to see of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Object name.
    pub name: String,
    /// Object class name, e.g. `TH1D` or `TDirectoryFile`.
    pub class_name: String,
    /// Object title.
    pub title: String,
    /// Cycle number.
    pub cycle: u16,
}

impl From<&Key> for KeyInfo {
    fn from(key: &Key) -> Self {
        Self {
            name: key.name.clone(),
            class_name: key.class_name.clone(),
            title: key.title.clone(),
            cycle: key.cycle,
        }
    }
}

impl KeyInfo {
    /// Whether the key holds a (sub)directory.
    pub fn is_directory(&self) -> bool {
        is_directory_class(&self.class_name)
    }
}

impl Key {
    /// Read a key header at the cursor.
    ///
    /// `file_is_large` forces 64-bit seek pointers for files whose header
    /// already announced them.
    pub fn read(r: &mut RBuffer, file_is_large: bool) -> Result<Self> {
        let n_bytes = r.read_u32()?;
        let version = r.read_u16()?;
        let obj_len = r.read_u32()?;
        let _datime = r.read_u32()?;
        let key_len = r.read_u16()?;
        let cycle = r.read_u16()?;

        let large = file_is_large || version > LARGE_KEY_VERSION;
        let seek_key = r.read_seek(large)?;
        let seek_pdir = r.read_seek(large)?;

        let class_name = r.read_string()?;
        let name = r.read_string()?;
        let title = r.read_string()?;

        Ok(Key {
            n_bytes,
            version,
            obj_len,
            key_len,
            cycle,
            seek_key,
            seek_pdir,
            class_name,
            name,
            title,
        })
    }

    /// Whether the payload is stored compressed.
    pub fn is_compressed(&self) -> bool {
        u64::from(self.obj_len) != u64::from(self.n_bytes).saturating_sub(u64::from(self.key_len))
    }

    /// Whether the key holds a (sub)directory.
    pub fn is_directory(&self) -> bool {
        is_directory_class(&self.class_name)
    }
}

/// `TDirectory`, `TDirectoryFile` and friends all nest further keys.
pub fn is_directory_class(class_name: &str) -> bool {
    class_name.starts_with("TDirectory")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Key of 120 bytes with a 40 byte header; `obj_len` other than 80 marks
    /// the payload as compressed.
    fn encode_key(version: u16, cycle: u16, obj_len: u32, class_name: &str, name: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&120u32.to_be_bytes());
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(&obj_len.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&40u16.to_be_bytes());
        out.extend_from_slice(&cycle.to_be_bytes());
        if version > LARGE_KEY_VERSION {
            out.extend_from_slice(&1_000u64.to_be_bytes());
            out.extend_from_slice(&100u64.to_be_bytes());
        } else {
            out.extend_from_slice(&1_000u32.to_be_bytes());
            out.extend_from_slice(&100u32.to_be_bytes());
        }
        for s in [class_name, name, "a title"] {
            out.push(s.len() as u8);
            out.extend_from_slice(s.as_bytes());
        }
        out
    }

    #[test]
    fn small_key() {
        let bytes = encode_key(4, 2, 80, "TH1D", "h_pt");
        let key = Key::read(&mut RBuffer::new(&bytes), false).unwrap();
        assert_eq!(key.class_name, "TH1D");
        assert_eq!(key.name, "h_pt");
        assert_eq!(key.title, "a title");
        assert_eq!(key.cycle, 2);
        assert_eq!(key.seek_key, 1_000);
        assert_eq!(key.seek_pdir, 100);
        assert!(!key.is_compressed());
        assert!(!key.is_directory());
    }

    #[test]
    fn payload_shorter_than_object_is_compressed() {
        let bytes = encode_key(4, 1, 250, "TH1F", "h_eta");
        let key = Key::read(&mut RBuffer::new(&bytes), false).unwrap();
        assert_eq!(key.obj_len, 250);
        assert!(key.is_compressed());
    }

    #[test]
    fn large_key_uses_64_bit_seeks() {
        let bytes = encode_key(1004, 1, 80, "TDirectoryFile", "sub");
        let key = Key::read(&mut RBuffer::new(&bytes), false).unwrap();
        assert_eq!(key.seek_key, 1_000);
        assert!(key.is_directory());
        assert!(KeyInfo::from(&key).is_directory());
    }
}
