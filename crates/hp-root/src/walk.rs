//! Recursive listing of everything stored in a file.

use crate::directory::Directory;
use crate::error::Result;
use crate::file::RootFile;
use crate::key::KeyInfo;

/// One object found while walking a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Key metadata (class name, cycle, title).
    pub key: KeyInfo,
    /// Slash-separated path from the top directory, e.g. `sr/mu/h_pt`.
    pub path: String,
}

/// Walk `file` depth first in on-disk key order.
///
/// Directories are descended into but not listed themselves. Only the
/// highest cycle of each name is reported.
pub fn walk(file: &RootFile) -> Result<Vec<WalkEntry>> {
    let mut out = Vec::new();
    walk_directory(file, &file.top_directory()?, "", &mut out)?;
    Ok(out)
}

fn walk_directory(
    file: &RootFile,
    dir: &Directory,
    prefix: &str,
    out: &mut Vec<WalkEntry>,
) -> Result<()> {
    for key in dir.latest_keys() {
        let path = join_path(prefix, &key.name);
        if key.is_directory() {
            tracing::debug!(%path, "descending into directory");
            let sub = file.subdirectory(key)?;
            walk_directory(file, &sub, &path, out)?;
        } else {
            out.push(WalkEntry { key: KeyInfo::from(key), path });
        }
    }
    Ok(())
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}/{name}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{FixtureHist, RootFileBuilder};

    fn listing(file: &RootFile) -> Vec<(String, String)> {
        file.walk()
            .unwrap()
            .into_iter()
            .map(|e| (e.path, e.key.class_name))
            .collect()
    }

    #[test]
    fn nested_directories_are_flattened() {
        let mut b = RootFileBuilder::new("walk.root");
        b.add_hist("", FixtureHist::th1d("top", &[0.0, 1.0], &[1.0]));
        b.add_hist("ee", FixtureHist::th1f("m_ll", &[0.0, 1.0], &[1.0]));
        b.add_hist("ee/jets", FixtureHist::th1d("n_jets", &[0.0, 1.0], &[1.0]));
        b.add_opaque("mm", "events", "TTree", b"payload");
        let f = RootFile::from_bytes(b.build(), "walk.root").unwrap();

        assert_eq!(
            listing(&f),
            vec![
                ("top".to_string(), "TH1D".to_string()),
                ("ee/m_ll".to_string(), "TH1F".to_string()),
                ("ee/jets/n_jets".to_string(), "TH1D".to_string()),
                ("mm/events".to_string(), "TTree".to_string()),
            ]
        );
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let mut b = RootFileBuilder::new("empty.root");
        b.add_directory("nothing_here");
        let f = RootFile::from_bytes(b.build(), "empty.root").unwrap();
        assert!(f.walk().unwrap().is_empty());
    }

    #[test]
    fn repeated_cycles_listed_once() {
        let mut b = RootFileBuilder::new("cycles.root");
        b.add_hist("", FixtureHist::th1d("h", &[0.0, 1.0], &[1.0]));
        b.add_hist("", FixtureHist::th1d("h", &[0.0, 1.0], &[2.0]));
        let f = RootFile::from_bytes(b.build(), "cycles.root").unwrap();
        let entries = f.walk().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key.cycle, 2);
    }

    #[test]
    fn join_paths() {
        assert_eq!(join_path("", "h"), "h");
        assert_eq!(join_path("a/b", "h"), "a/b/h");
    }
}
