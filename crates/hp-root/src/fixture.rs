//! Writer for small ROOT files, used to build test fixtures.
//!
//! Produces the on-disk layout the reader expects: file header, a `TFile`
//! key holding the top directory record, nested `TDirectoryFile` keys and
//! key lists, and histogram payloads in ROOT's streamer format. Payloads are
//! stored raw unless [`RootFileBuilder::compress`] is switched on, in which
//! case histogram payloads go through zlib. [`RootFileBuilder::large`] writes
//! the 64-bit seek layout ROOT uses for files past 2 GB.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::decompress::root_block;
use crate::histogram::UNSET_EXTREMUM;
use crate::objects::ArrayKind;

const BYTE_COUNT_MASK: u32 = 0x4000_0000;
const FILE_VERSION: u32 = 62_206;
/// Added to file, key and directory versions when seeks are 64 bits wide.
const LARGE_OFFSET: u32 = 1_000_000;
const LARGE_RECORD_OFFSET: u16 = 1000;
const BEGIN: usize = 100;
const KEY_VERSION: u16 = 4;
const DIR_VERSION: u16 = 5;
/// `kNotDeleted | kIsOnHeap`
const TOBJECT_BITS: u32 = 0x0300_0000;

/// Big-endian byte sink with ROOT byte-count bookkeeping.
#[derive(Default)]
struct WBuffer {
    buf: Vec<u8>,
}

impl WBuffer {
    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }
    fn i8(&mut self, v: i8) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    fn i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    fn f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    fn f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
    fn seek(&mut self, v: u64, large: bool) {
        if large {
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else {
            self.u32(v as u32);
        }
    }

    fn string(&mut self, s: &str) {
        if s.len() < 255 {
            self.u8(s.len() as u8);
        } else {
            self.u8(255);
            self.u32(s.len() as u32);
        }
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Open a streamed object; returns the offset to close it with.
    fn begin(&mut self, version: u16) -> usize {
        let at = self.buf.len();
        self.u32(0);
        self.u16(version);
        at
    }

    /// Patch the byte count of the object opened at `at`.
    fn end(&mut self, at: usize) {
        let count = (self.buf.len() - at - 4) as u32;
        self.buf[at..at + 4].copy_from_slice(&(count | BYTE_COUNT_MASK).to_be_bytes());
    }

    fn tobject(&mut self) {
        self.u16(1);
        self.u32(0);
        self.u32(TOBJECT_BITS);
    }

    fn tnamed(&mut self, name: &str, title: &str) {
        let at = self.begin(1);
        self.tobject();
        self.string(name);
        self.string(title);
        self.end(at);
    }

    fn tarray_d(&mut self, values: &[f64]) {
        self.i32(values.len() as i32);
        values.iter().for_each(|&v| self.f64(v));
    }
}

/// A histogram to be written into a fixture file.
#[derive(Debug, Clone)]
pub struct FixtureHist {
    name: String,
    title: String,
    kind: ArrayKind,
    /// Edges of every axis the histogram has (one to three).
    edges: Vec<Vec<f64>>,
    contents: Vec<f64>,
    sumw2: Option<Vec<f64>>,
    axis_titles: [String; 3],
    minimum: f64,
    maximum: f64,
}

impl FixtureHist {
    fn new(name: &str, kind: ArrayKind, edges: &[&[f64]], contents: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            title: name.to_string(),
            kind,
            edges: edges.iter().map(|e| e.to_vec()).collect(),
            contents: contents.to_vec(),
            sumw2: None,
            axis_titles: Default::default(),
            minimum: UNSET_EXTREMUM,
            maximum: UNSET_EXTREMUM,
        }
    }

    /// `TH1D` with the given edges and in-range contents.
    pub fn th1d(name: &str, x_edges: &[f64], contents: &[f64]) -> Self {
        Self::new(name, ArrayKind::F64, &[x_edges], contents)
    }

    /// `TH1F` with the given edges and in-range contents.
    pub fn th1f(name: &str, x_edges: &[f64], contents: &[f64]) -> Self {
        Self::new(name, ArrayKind::F32, &[x_edges], contents)
    }

    /// `TH2D`; `contents` lists in-range cells with x varying fastest.
    pub fn th2d(name: &str, edges: (&[f64], &[f64]), contents: &[f64]) -> Self {
        Self::new(name, ArrayKind::F64, &[edges.0, edges.1], contents)
    }

    /// `TH3D`; `contents` lists in-range cells with x fastest, then y.
    pub fn th3d(name: &str, edges: (&[f64], &[f64], &[f64]), contents: &[f64]) -> Self {
        Self::new(name, ArrayKind::F64, &[edges.0, edges.1, edges.2], contents)
    }

    /// Store contents as another array type, e.g. `TH2I` instead of `TH2D`.
    pub fn stored_as(mut self, kind: ArrayKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the object title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set x/y/z axis titles.
    pub fn with_axis_titles(mut self, x: &str, y: &str, z: &str) -> Self {
        self.axis_titles = [x.to_string(), y.to_string(), z.to_string()];
        self
    }

    /// Store per-bin squared weights (in-range order, flows written as zero).
    pub fn with_sumw2(mut self, sumw2: &[f64]) -> Self {
        self.sumw2 = Some(sumw2.to_vec());
        self
    }

    /// Store explicit `fMinimum`/`fMaximum`.
    pub fn with_extrema(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    fn dimension(&self) -> usize {
        self.edges.len()
    }

    /// Class name, e.g. `TH3F`.
    pub fn class_name(&self) -> String {
        let letter = match self.kind {
            ArrayKind::F64 => 'D',
            ArrayKind::F32 => 'F',
            ArrayKind::I32 => 'I',
            ArrayKind::I16 => 'S',
            ArrayKind::I8 => 'C',
        };
        format!("TH{}{letter}", self.dimension())
    }

    /// Spread in-range values over the full cell grid, flows set to zero.
    fn cells(&self, in_range: &[f64]) -> Vec<f64> {
        let bins: Vec<usize> = self.edges.iter().map(|e| e.len() - 1).collect();
        let total: usize = bins.iter().map(|n| n + 2).product();
        (0..total)
            .map(|global| {
                let (mut rest, mut inner, mut stride) = (global, 0, 1);
                for &n in &bins {
                    let i = rest % (n + 2);
                    rest /= n + 2;
                    if i == 0 || i > n {
                        return 0.0;
                    }
                    inner += (i - 1) * stride;
                    stride *= n;
                }
                in_range.get(inner).copied().unwrap_or(0.0)
            })
            .collect()
    }

    /// Serialize the histogram the way ROOT streams it.
    pub fn payload(&self) -> Vec<u8> {
        let dimension = self.dimension();
        let cells = self.cells(&self.contents);
        let mut w = WBuffer::default();

        let outer = w.begin(if dimension == 1 { 3 } else { 4 });
        let derived = match dimension {
            1 => None,
            2 => Some(w.begin(5)),
            _ => Some(w.begin(6)),
        };

        let th1 = w.begin(8);
        w.tnamed(&self.name, &self.title);
        let line = w.begin(2);
        w.i16(602);
        w.i16(1);
        w.i16(1);
        w.end(line);
        let fill = w.begin(2);
        w.i16(0);
        w.i16(1001);
        w.end(fill);
        let marker = w.begin(2);
        w.i16(1);
        w.i16(1);
        w.f32(1.0);
        w.end(marker);

        w.i32(cells.len() as i32);
        let unit = [0.0, 1.0];
        for (axis, name) in ["xaxis", "yaxis", "zaxis"].into_iter().enumerate() {
            let edges = self.edges.get(axis).map_or(&unit[..], Vec::as_slice);
            write_axis(&mut w, name, &self.axis_titles[axis], edges);
        }

        w.i16(0);
        w.i16(1000);
        let sum: f64 = self.contents.iter().sum();
        w.f64(sum);
        w.f64(sum);
        w.f64(sum);
        w.f64(0.0);
        w.f64(0.0);
        w.f64(self.maximum);
        w.f64(self.minimum);
        w.f64(0.0);
        w.tarray_d(&[]);
        match &self.sumw2 {
            Some(sw2) => w.tarray_d(&self.cells(sw2)),
            None => w.tarray_d(&[]),
        }
        w.string("");
        write_empty_list(&mut w);
        w.i32(0);
        w.i32(0);
        w.i32(2);
        w.end(th1);

        match derived {
            Some(at) if dimension == 2 => {
                // fScalefactor, fTsumwy, fTsumwy2, fTsumwxy
                (0..4).for_each(|i| w.f64(if i == 0 { 1.0 } else { 0.0 }));
                w.end(at);
            }
            Some(at) => {
                let att3d = w.begin(1);
                w.end(att3d);
                // fTsumwy .. fTsumwyz
                (0..7).for_each(|_| w.f64(0.0));
                w.end(at);
            }
            None => {}
        }

        w.i32(cells.len() as i32);
        for &v in &cells {
            match self.kind {
                ArrayKind::F64 => w.f64(v),
                ArrayKind::F32 => w.f32(v as f32),
                ArrayKind::I32 => w.i32(v as i32),
                ArrayKind::I16 => w.i16(v as i16),
                ArrayKind::I8 => w.i8(v as i8),
            }
        }
        w.end(outer);
        w.buf
    }
}

fn write_axis(w: &mut WBuffer, name: &str, title: &str, edges: &[f64]) {
    let n_bins = edges.len() - 1;
    let (min, max) = (edges[0], edges[n_bins]);
    let width = (max - min) / n_bins as f64;
    let uniform =
        edges.iter().enumerate().all(|(i, &e)| (e - (min + i as f64 * width)).abs() < 1e-12);

    let at = w.begin(10);
    w.tnamed(name, title);
    let att = w.begin(4);
    w.i32(510);
    w.i16(1);
    w.i16(1);
    w.i16(42);
    w.f32(0.005);
    w.f32(0.035);
    w.f32(0.03);
    w.f32(1.0);
    w.f32(0.035);
    w.i16(1);
    w.i16(42);
    w.end(att);
    w.i32(n_bins as i32);
    w.f64(min);
    w.f64(max);
    w.tarray_d(if uniform { &[] } else { edges });
    w.i32(0);
    w.i32(0);
    w.u16(0);
    w.u8(0);
    w.string("");
    w.u32(0);
    w.u32(0);
    w.end(at);
}

/// `fFunctions`: an empty TList behind a new-class tag.
fn write_empty_list(w: &mut WBuffer) {
    let at = w.buf.len();
    w.u32(0);
    w.u32(0xFFFF_FFFF);
    w.buf.extend_from_slice(b"TList\0");
    let list = w.begin(5);
    w.tobject();
    w.string("");
    w.i32(0);
    w.end(list);
    w.end(at);
}

enum Entry {
    Object { name: String, class_name: String, title: String, payload: Vec<u8> },
    Dir(DirNode),
}

#[derive(Default)]
struct DirNode {
    name: String,
    entries: Vec<Entry>,
}

impl DirNode {
    fn subdir_mut(&mut self, path: &str) -> &mut DirNode {
        let mut node = self;
        for part in path.split('/').filter(|s| !s.is_empty()) {
            let pos = node
                .entries
                .iter()
                .position(|e| matches!(e, Entry::Dir(d) if d.name == part))
                .unwrap_or_else(|| {
                    node.entries.push(Entry::Dir(DirNode { name: part.to_string(), ..Default::default() }));
                    node.entries.len() - 1
                });
            node = match &mut node.entries[pos] {
                Entry::Dir(d) => d,
                Entry::Object { .. } => unreachable!("position() only matches directories"),
            };
        }
        node
    }
}

/// Assembles an in-memory ROOT file.
pub struct RootFileBuilder {
    file_name: String,
    compress: bool,
    large: bool,
    root: DirNode,
}

impl RootFileBuilder {
    /// Empty file named `file_name`.
    pub fn new(file_name: &str) -> Self {
        Self { file_name: file_name.to_string(), compress: false, large: false, root: DirNode::default() }
    }

    /// Compress histogram payloads with zlib.
    pub fn compress(&mut self, on: bool) -> &mut Self {
        self.compress = on;
        self
    }

    /// Write 64-bit seeks in the header, directory records and keys.
    pub fn large(&mut self, on: bool) -> &mut Self {
        self.large = on;
        self
    }

    /// Create `path` (and parents) as directories.
    pub fn add_directory(&mut self, path: &str) -> &mut Self {
        self.root.subdir_mut(path);
        self
    }

    /// Add a histogram inside directory `dir` (`""` for the top level).
    pub fn add_hist(&mut self, dir: &str, hist: FixtureHist) -> &mut Self {
        let payload = hist.payload();
        let class_name = hist.class_name();
        self.root.subdir_mut(dir).entries.push(Entry::Object {
            name: hist.name,
            class_name,
            title: hist.title,
            payload,
        });
        self
    }

    /// Add an arbitrary object with a raw payload.
    pub fn add_opaque(&mut self, dir: &str, name: &str, class_name: &str, payload: &[u8]) -> &mut Self {
        self.root.subdir_mut(dir).entries.push(Entry::Object {
            name: name.to_string(),
            class_name: class_name.to_string(),
            title: String::new(),
            payload: payload.to_vec(),
        });
        self
    }

    /// Serialize the file.
    pub fn build(&self) -> Vec<u8> {
        let large = self.large;
        let mut out = vec![0u8; BEGIN];

        // TFile key: name and title strings, then the top directory record.
        let mut named = WBuffer::default();
        named.string(&self.file_name);
        named.string("");
        let mut top_payload = named.buf.clone();
        top_payload.extend(dir_record(BEGIN as u64, 0, large));
        let top = KeyWriter { out: &mut out, large, compress: false }.write(
            "TFile",
            &self.file_name,
            "",
            1,
            0,
            &top_payload,
        );
        let nbytes_name = top.key_len + named.buf.len();
        let top_record = BEGIN + nbytes_name;

        let children = self.write_children(&mut out, &self.root, BEGIN as u64);
        let (seek_keys, nbytes_keys) =
            write_key_list(&mut out, large, &children, "TFile", &self.file_name, BEGIN as u64);
        patch_dir_record(&mut out, top_record, nbytes_keys, nbytes_name as u32, seek_keys, large);

        let end = out.len() as u64;
        let mut h = WBuffer::default();
        h.buf.extend_from_slice(b"root");
        h.u32(if large { FILE_VERSION + LARGE_OFFSET } else { FILE_VERSION });
        h.u32(BEGIN as u32);
        h.seek(end, large);
        h.seek(end, large);
        h.u32(0);
        h.u32(0);
        h.u32(nbytes_name as u32);
        h.u8(if large { 8 } else { 4 });
        h.u32(if self.compress { 101 } else { 0 });
        h.seek(0, large);
        h.u32(0);
        h.buf.extend_from_slice(&[0u8; 18]);
        out[..h.buf.len()].copy_from_slice(&h.buf);
        out
    }

    fn write_children(&self, out: &mut Vec<u8>, node: &DirNode, dir_seek: u64) -> Vec<Vec<u8>> {
        let large = self.large;
        let mut headers = Vec::new();
        let mut cycles: Vec<(String, u16)> = Vec::new();
        for entry in &node.entries {
            match entry {
                Entry::Object { name, class_name, title, payload } => {
                    let cycle = next_cycle(&mut cycles, name);
                    let written = KeyWriter { out: &mut *out, large, compress: self.compress }
                        .write(class_name, name, title, cycle, dir_seek, payload);
                    headers.push(written.header);
                }
                Entry::Dir(sub) => {
                    let record = dir_record(0, dir_seek, large);
                    let key = KeyWriter { out: &mut *out, large, compress: false }.write(
                        "TDirectoryFile",
                        &sub.name,
                        &sub.name,
                        1,
                        dir_seek,
                        &record,
                    );
                    let record_at = key.seek + key.key_len;
                    let seek = key.seek as u64;
                    let children = self.write_children(out, sub, seek);
                    let (seek_keys, nbytes_keys) =
                        write_key_list(out, large, &children, "TDirectoryFile", &sub.name, seek);
                    patch_dir_record(out, record_at, nbytes_keys, key.key_len as u32, seek_keys, large);
                    patch_seek(out, record_at + 18, seek, large);
                    headers.push(key.header);
                }
            }
        }
        headers
    }
}

fn next_cycle(cycles: &mut Vec<(String, u16)>, name: &str) -> u16 {
    match cycles.iter_mut().find(|(n, _)| n == name) {
        Some((_, c)) => {
            *c += 1;
            *c
        }
        None => {
            cycles.push((name.to_string(), 1));
            1
        }
    }
}

struct WrittenKey {
    seek: usize,
    key_len: usize,
    header: Vec<u8>,
}

/// Appends keys with their payloads to the file image.
struct KeyWriter<'a> {
    out: &'a mut Vec<u8>,
    large: bool,
    compress: bool,
}

impl KeyWriter<'_> {
    fn write(
        self,
        class_name: &str,
        name: &str,
        title: &str,
        cycle: u16,
        seek_pdir: u64,
        payload: &[u8],
    ) -> WrittenKey {
        let stored =
            if self.compress { zlib_blocks(payload) } else { None }.unwrap_or_else(|| payload.to_vec());
        let seek_width = if self.large { 8 } else { 4 };
        let key_len = 18 + 2 * seek_width + 3 + class_name.len() + name.len() + title.len();
        let seek = self.out.len();

        let mut h = WBuffer::default();
        h.u32((key_len + stored.len()) as u32);
        h.u16(if self.large { KEY_VERSION + LARGE_RECORD_OFFSET } else { KEY_VERSION });
        h.u32(payload.len() as u32);
        h.u32(0);
        h.u16(key_len as u16);
        h.u16(cycle);
        h.seek(seek as u64, self.large);
        h.seek(seek_pdir, self.large);
        h.string(class_name);
        h.string(name);
        h.string(title);
        debug_assert_eq!(h.buf.len(), key_len);

        self.out.extend_from_slice(&h.buf);
        self.out.extend_from_slice(&stored);
        WrittenKey { seek, key_len, header: h.buf }
    }
}

/// zlib-compress `payload` into one ROOT block, unless that would not shrink it.
fn zlib_blocks(payload: &[u8]) -> Option<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(payload).ok()?;
    let compressed = enc.finish().ok()?;
    let block = root_block(b"ZL", 8, &compressed, payload.len());
    (block.len() < payload.len()).then_some(block)
}

fn write_key_list(
    out: &mut Vec<u8>,
    large: bool,
    headers: &[Vec<u8>],
    class_name: &str,
    name: &str,
    seek_pdir: u64,
) -> (u64, u32) {
    let mut body = WBuffer::default();
    body.u32(headers.len() as u32);
    headers.iter().for_each(|h| body.buf.extend_from_slice(h));
    let key = KeyWriter { out, large, compress: false }.write(class_name, name, "", 1, seek_pdir, &body.buf);
    (key.seek as u64, (key.key_len + body.buf.len()) as u32)
}

/// TDirectory record; key counts and the key list seek are patched in later.
///
/// Both layouts take 60 bytes: the small one pads its 32-bit seeks with
/// twelve spare bytes.
fn dir_record(seek_dir: u64, seek_parent: u64, large: bool) -> Vec<u8> {
    let mut w = WBuffer::default();
    w.u16(if large { DIR_VERSION + LARGE_RECORD_OFFSET } else { DIR_VERSION });
    w.u32(0);
    w.u32(0);
    w.u32(0);
    w.u32(0);
    w.seek(seek_dir, large);
    w.seek(seek_parent, large);
    w.seek(0, large);
    w.u16(1);
    w.buf.extend_from_slice(&[0u8; 16]);
    if !large {
        w.buf.extend_from_slice(&[0u8; 12]);
    }
    w.buf
}

fn patch_dir_record(out: &mut [u8], at: usize, nbytes_keys: u32, nbytes_name: u32, seek_keys: u64, large: bool) {
    out[at + 10..at + 14].copy_from_slice(&nbytes_keys.to_be_bytes());
    out[at + 14..at + 18].copy_from_slice(&nbytes_name.to_be_bytes());
    let seek_keys_at = if large { at + 34 } else { at + 26 };
    patch_seek(out, seek_keys_at, seek_keys, large);
}

fn patch_seek(out: &mut [u8], at: usize, value: u64, large: bool) {
    if large {
        out[at..at + 8].copy_from_slice(&value.to_be_bytes());
    } else {
        out[at..at + 4].copy_from_slice(&(value as u32).to_be_bytes());
    }
}
