//! TH1/TH2/TH3 streamers.
//!
//! Layout of a streamed `TH<dim><kind>` (all nested objects carry byte counts):
//! ```text
//! TH<dim><kind>        version header
//!   TH2 | TH3          version header (2D/3D only)
//!     TH1              version header
//!       TNamed         name, title
//!       TAttLine, TAttFill, TAttMarker
//!       fNcells        i32
//!       fXaxis, fYaxis, fZaxis   TAxis
//!       fBarOffset, fBarWidth    i16
//!       fEntries, fTsumw, fTsumw2, fTsumwx, fTsumwx2   f64
//!       fMaximum, fMinimum       f64 (v >= 2)
//!       fNormFactor              f64 (v >= 3)
//!       fContour, fSumw2         TArrayD
//!       ...                      skipped through the byte count
//!     TH2/TH3 moments            skipped through the byte count
//!   TArray<kind>       i32 length + fNcells values
//! ```

use crate::error::{Result, RootError};
use crate::histogram::{HistAxis, Histogram, UNSET_EXTREMUM};
use crate::rbuffer::RBuffer;

/// Element type of the bin-content array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// `TArrayD`
    F64,
    /// `TArrayF`
    F32,
    /// `TArrayI`
    I32,
    /// `TArrayS`
    I16,
    /// `TArrayC`
    I8,
}

/// A supported histogram class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistClass {
    /// 1, 2 or 3.
    pub dimension: usize,
    /// Storage type of the contents.
    pub kind: ArrayKind,
}

impl HistClass {
    /// Parse names like `TH1D`, `TH2F`, `TH3I`.
    pub fn parse(class_name: &str) -> Option<Self> {
        let rest = class_name.strip_prefix("TH")?;
        let mut chars = rest.chars();
        let dimension = match chars.next()? {
            '1' => 1,
            '2' => 2,
            '3' => 3,
            _ => return None,
        };
        let kind = match chars.next()? {
            'D' => ArrayKind::F64,
            'F' => ArrayKind::F32,
            'I' => ArrayKind::I32,
            'S' => ArrayKind::I16,
            'C' => ArrayKind::I8,
            _ => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Self { dimension, kind })
    }
}

/// Fields of the TH1 base that the plotting layer needs.
struct Th1Base {
    name: String,
    title: String,
    n_cells: usize,
    axes: [HistAxis; 3],
    entries: f64,
    maximum: f64,
    minimum: f64,
    sumw2: Vec<f64>,
}

pub(super) fn read(payload: &[u8], class: HistClass, class_name: &str) -> Result<Histogram> {
    let mut r = RBuffer::new(payload);
    let outer = r.read_version()?;

    let base = match class.dimension {
        1 => read_th1(&mut r)?,
        dim => {
            let derived = r.read_version()?;
            let base = read_th1(&mut r)?;
            require_byte_count(derived.end, if dim == 2 { "TH2" } else { "TH3" })?;
            r.seek_end(derived)?;
            base
        }
    };

    let contents = read_contents(&mut r, class.kind)?;
    if contents.len() != base.n_cells {
        return Err(RootError::Deserialization(format!(
            "{class_name} '{}': {} contents but fNcells = {}",
            base.name,
            contents.len(),
            base.n_cells
        )));
    }
    r.seek_end(outer)?;

    let [x_axis, y_axis, z_axis] = base.axes;
    let hist = Histogram {
        name: base.name,
        title: base.title,
        class_name: class_name.to_string(),
        dimension: class.dimension,
        x_axis,
        y_axis,
        z_axis,
        contents,
        sumw2: (!base.sumw2.is_empty()).then_some(base.sumw2),
        entries: base.entries,
        stored_minimum: explicit(base.minimum),
        stored_maximum: explicit(base.maximum),
    };
    if hist.expected_cells() != hist.contents.len() {
        return Err(RootError::Deserialization(format!(
            "{class_name} '{}': axes describe {} cells, found {}",
            hist.name,
            hist.expected_cells(),
            hist.contents.len()
        )));
    }
    tracing::debug!(name = %hist.name, class = class_name, cells = hist.contents.len(), "decoded histogram");
    Ok(hist)
}

fn explicit(value: f64) -> Option<f64> {
    (value != UNSET_EXTREMUM).then_some(value)
}

fn require_byte_count(end: Option<usize>, what: &str) -> Result<()> {
    match end {
        Some(_) => Ok(()),
        None => Err(RootError::Deserialization(format!("{what} streamed without byte count"))),
    }
}

fn read_th1(r: &mut RBuffer) -> Result<Th1Base> {
    let header = r.read_version()?;
    require_byte_count(header.end, "TH1")?;

    let (name, title) = r.read_tnamed()?;
    // TAttLine, TAttFill, TAttMarker
    for _ in 0..3 {
        r.skip_object()?;
    }

    let n_cells = r.read_len()?;
    let axes = [read_taxis(r)?, read_taxis(r)?, read_taxis(r)?];

    let _bar_offset = r.read_i16()?;
    let _bar_width = r.read_i16()?;
    let entries = r.read_f64()?;
    let _tsumw = r.read_f64()?;
    let _tsumw2 = r.read_f64()?;
    let _tsumwx = r.read_f64()?;
    let _tsumwx2 = r.read_f64()?;
    let (maximum, minimum) = if header.version >= 2 {
        (r.read_f64()?, r.read_f64()?)
    } else {
        (UNSET_EXTREMUM, UNSET_EXTREMUM)
    };
    if header.version >= 3 {
        let _norm_factor = r.read_f64()?;
    }
    let _contour = r.read_tarray_d()?;
    let sumw2 = r.read_tarray_d()?;

    // fOption, fFunctions, fBuffer and later additions are not needed.
    r.seek_end(header)?;

    Ok(Th1Base { name, title, n_cells, axes, entries, maximum, minimum, sumw2 })
}

fn read_taxis(r: &mut RBuffer) -> Result<HistAxis> {
    let header = r.read_version()?;
    require_byte_count(header.end, "TAxis")?;

    let (_name, title) = r.read_tnamed()?;
    // TAttAxis
    r.skip_object()?;

    let n_bins = r.read_len()?;
    let min = r.read_f64()?;
    let max = r.read_f64()?;
    let edges = r.read_tarray_d()?;
    if !edges.is_empty() && edges.len() != n_bins + 1 {
        return Err(RootError::Deserialization(format!(
            "axis with {n_bins} bins stores {} edges",
            edges.len()
        )));
    }

    r.seek_end(header)?;
    Ok(HistAxis { n_bins, min, max, edges, title })
}

fn read_contents(r: &mut RBuffer, kind: ArrayKind) -> Result<Vec<f64>> {
    let n = r.read_len()?;
    match kind {
        ArrayKind::F64 => r.read_f64_vec(n),
        ArrayKind::F32 => (0..n).map(|_| r.read_f32().map(f64::from)).collect(),
        ArrayKind::I32 => (0..n).map(|_| r.read_i32().map(f64::from)).collect(),
        ArrayKind::I16 => (0..n).map(|_| r.read_i16().map(f64::from)).collect(),
        ArrayKind::I8 => (0..n).map(|_| r.read_i8().map(f64::from)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names() {
        assert_eq!(HistClass::parse("TH1D"), Some(HistClass { dimension: 1, kind: ArrayKind::F64 }));
        assert_eq!(HistClass::parse("TH2F"), Some(HistClass { dimension: 2, kind: ArrayKind::F32 }));
        assert_eq!(HistClass::parse("TH3C"), Some(HistClass { dimension: 3, kind: ArrayKind::I8 }));
        assert_eq!(HistClass::parse("TH1K"), None);
        assert_eq!(HistClass::parse("TH2Poly"), None);
        assert_eq!(HistClass::parse("TTree"), None);
    }
}
