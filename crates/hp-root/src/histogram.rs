//! Histogram type returned by [`RootFile::get_histogram`](crate::RootFile::get_histogram).

use crate::error::{Result, RootError};

/// `fMinimum`/`fMaximum` value ROOT writes when no explicit extremum was set.
pub const UNSET_EXTREMUM: f64 = -1111.0;

/// One histogram axis.
#[derive(Debug, Clone, PartialEq)]
pub struct HistAxis {
    /// Number of in-range bins.
    pub n_bins: usize,
    /// Lower edge of the first bin.
    pub min: f64,
    /// Upper edge of the last bin.
    pub max: f64,
    /// Variable bin edges (`n_bins + 1` values), empty for uniform binning.
    pub edges: Vec<f64>,
    /// Axis title.
    pub title: String,
}

impl HistAxis {
    /// Uniformly binned axis.
    pub fn uniform(n_bins: usize, min: f64, max: f64) -> Self {
        Self { n_bins, min, max, edges: Vec::new(), title: String::new() }
    }

    /// Axis with explicit bin edges.
    pub fn variable(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(RootError::Deserialization("an axis needs at least two edges".into()));
        }
        if edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(RootError::Deserialization("axis edges must be strictly increasing".into()));
        }
        Ok(Self {
            n_bins: edges.len() - 1,
            min: edges[0],
            max: edges[edges.len() - 1],
            edges,
            title: String::new(),
        })
    }

    /// In-range bin edges (`n_bins + 1` values).
    pub fn bin_edges(&self) -> Vec<f64> {
        if !self.edges.is_empty() {
            return self.edges.clone();
        }
        let width = (self.max - self.min) / self.n_bins.max(1) as f64;
        (0..=self.n_bins).map(|i| self.min + i as f64 * width).collect()
    }

    /// Cells along this axis including under- and overflow.
    pub fn n_cells(&self) -> usize {
        self.n_bins + 2
    }
}

/// A 1-, 2- or 3-dimensional histogram read from a ROOT file.
///
/// `contents` keeps ROOT's global-bin layout: under/overflow cells included,
/// x varying fastest.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Stored class, e.g. `TH1D`.
    pub class_name: String,
    /// 1, 2 or 3.
    pub dimension: usize,
    /// X axis.
    pub x_axis: HistAxis,
    /// Y axis (a single dummy bin for 1D histograms).
    pub y_axis: HistAxis,
    /// Z axis (a single dummy bin below 3D).
    pub z_axis: HistAxis,
    /// Bin contents for every cell.
    pub contents: Vec<f64>,
    /// Sum of squared weights per cell, when stored.
    pub sumw2: Option<Vec<f64>>,
    /// Number of entries as recorded by ROOT.
    pub entries: f64,
    /// Explicit minimum set on the histogram (`fMinimum`).
    pub stored_minimum: Option<f64>,
    /// Explicit maximum set on the histogram (`fMaximum`).
    pub stored_maximum: Option<f64>,
}

impl Histogram {
    /// Build a 1D histogram from bin edges and in-range contents.
    pub fn from_bins_1d(name: &str, edges: Vec<f64>, contents: &[f64]) -> Result<Self> {
        let x_axis = HistAxis::variable(edges)?;
        if contents.len() != x_axis.n_bins {
            return Err(RootError::Deserialization(format!(
                "{} contents for {} bins",
                contents.len(),
                x_axis.n_bins
            )));
        }
        let mut cells = Vec::with_capacity(x_axis.n_cells());
        cells.push(0.0);
        cells.extend_from_slice(contents);
        cells.push(0.0);
        Ok(Self {
            name: name.to_string(),
            title: name.to_string(),
            class_name: "TH1D".into(),
            dimension: 1,
            x_axis,
            y_axis: HistAxis::uniform(1, 0.0, 1.0),
            z_axis: HistAxis::uniform(1, 0.0, 1.0),
            entries: contents.iter().sum(),
            contents: cells,
            sumw2: None,
            stored_minimum: None,
            stored_maximum: None,
        })
    }

    /// Number of cells the contents array must have for this dimension.
    pub fn expected_cells(&self) -> usize {
        match self.dimension {
            1 => self.x_axis.n_cells(),
            2 => self.x_axis.n_cells() * self.y_axis.n_cells(),
            _ => self.x_axis.n_cells() * self.y_axis.n_cells() * self.z_axis.n_cells(),
        }
    }

    /// Global cell index of `(ix, iy, iz)`; 0 is underflow, `n_bins + 1` overflow.
    pub fn global_bin(&self, ix: usize, iy: usize, iz: usize) -> usize {
        let nx = self.x_axis.n_cells();
        match self.dimension {
            1 => ix,
            2 => ix + nx * iy,
            _ => ix + nx * (iy + self.y_axis.n_cells() * iz),
        }
    }

    /// Content of cell `(ix, iy, iz)`; missing cells read as zero.
    pub fn bin_content(&self, ix: usize, iy: usize, iz: usize) -> f64 {
        self.contents.get(self.global_bin(ix, iy, iz)).copied().unwrap_or(0.0)
    }

    /// Statistical error of cell `(ix, iy, iz)`.
    pub fn bin_error(&self, ix: usize, iy: usize, iz: usize) -> f64 {
        let bin = self.global_bin(ix, iy, iz);
        match &self.sumw2 {
            Some(sw2) => sw2.get(bin).copied().unwrap_or(0.0).sqrt(),
            None => self.contents.get(bin).copied().unwrap_or(0.0).abs().sqrt(),
        }
    }

    /// Global indices of every in-range (non-flow) cell.
    pub fn in_range_bins(&self) -> Vec<usize> {
        let ny = if self.dimension >= 2 { self.y_axis.n_bins } else { 1 };
        let nz = if self.dimension >= 3 { self.z_axis.n_bins } else { 1 };
        let y_range = if self.dimension >= 2 { 1..=ny } else { 0..=0 };
        let mut out = Vec::with_capacity(self.x_axis.n_bins * ny * nz);
        let z_range = if self.dimension >= 3 { 1..=nz } else { 0..=0 };
        for iz in z_range {
            for iy in y_range.clone() {
                for ix in 1..=self.x_axis.n_bins {
                    out.push(self.global_bin(ix, iy, iz));
                }
            }
        }
        out
    }

    /// Smallest in-range content, or the explicit minimum when one was set.
    pub fn minimum(&self) -> f64 {
        if let Some(m) = self.stored_minimum {
            return m;
        }
        self.in_range_bins()
            .into_iter()
            .map(|b| self.contents.get(b).copied().unwrap_or(0.0))
            .fold(f64::MAX, f64::min)
    }

    /// Largest in-range content, or the explicit maximum when one was set.
    pub fn maximum(&self) -> f64 {
        if let Some(m) = self.stored_maximum {
            return m;
        }
        self.in_range_bins()
            .into_iter()
            .map(|b| self.contents.get(b).copied().unwrap_or(0.0))
            .fold(-f64::MAX, f64::max)
    }

    /// Sum of in-range contents.
    pub fn integral(&self) -> f64 {
        self.in_range_bins().into_iter().filter_map(|b| self.contents.get(b)).sum()
    }

    /// Multiply contents by `factor` and squared weights by `factor²`.
    pub fn scale(&mut self, factor: f64) {
        self.contents.iter_mut().for_each(|c| *c *= factor);
        if let Some(sw2) = &mut self.sumw2 {
            sw2.iter_mut().for_each(|w| *w *= factor * factor);
        }
        self.stored_minimum = self.stored_minimum.map(|m| m * factor);
        self.stored_maximum = self.stored_maximum.map(|m| m * factor);
    }

    /// In-range contents summed over z, indexed `[iy][ix]` (both 0-based).
    pub fn xy_projection(&self) -> Vec<Vec<f64>> {
        let ny = if self.dimension >= 2 { self.y_axis.n_bins } else { 1 };
        let nz = if self.dimension >= 3 { self.z_axis.n_bins } else { 1 };
        let mut out = vec![vec![0.0; self.x_axis.n_bins]; ny];
        for (row, iy) in out.iter_mut().zip(1..=ny) {
            for (cell, ix) in row.iter_mut().zip(1..=self.x_axis.n_bins) {
                *cell = if self.dimension >= 3 {
                    (1..=nz).map(|iz| self.bin_content(ix, iy, iz)).sum()
                } else if self.dimension == 2 {
                    self.bin_content(ix, iy, 0)
                } else {
                    self.bin_content(ix, 0, 0)
                };
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2() -> Histogram {
        let mut h = Histogram::from_bins_1d("h", vec![0.0, 1.0, 2.0], &[1.0, 2.0]).unwrap();
        h.dimension = 2;
        h.y_axis = HistAxis::uniform(3, -1.0, 2.0);
        h.contents = (0..h.expected_cells()).map(|i| i as f64).collect();
        h
    }

    #[test]
    fn uniform_edges() {
        let ax = HistAxis::uniform(4, 0.0, 2.0);
        assert_eq!(ax.bin_edges(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn variable_edges_must_increase() {
        assert!(HistAxis::variable(vec![0.0, 1.0, 1.0]).is_err());
        assert!(HistAxis::variable(vec![0.0]).is_err());
    }

    #[test]
    fn one_dimensional_extrema_ignore_flows() {
        let mut h = Histogram::from_bins_1d("h", vec![0.0, 1.0, 2.0, 3.0], &[4.0, -2.0, 7.0])
            .unwrap();
        h.contents[0] = -100.0;
        h.contents[4] = 100.0;
        assert_eq!(h.minimum(), -2.0);
        assert_eq!(h.maximum(), 7.0);
        assert_eq!(h.integral(), 9.0);
    }

    #[test]
    fn stored_extrema_win() {
        let mut h = Histogram::from_bins_1d("h", vec![0.0, 1.0], &[5.0]).unwrap();
        h.stored_minimum = Some(-3.0);
        h.stored_maximum = Some(30.0);
        assert_eq!(h.minimum(), -3.0);
        assert_eq!(h.maximum(), 30.0);
    }

    #[test]
    fn two_dimensional_layout() {
        let h = h2();
        assert_eq!(h.expected_cells(), 4 * 5);
        assert_eq!(h.global_bin(1, 1, 0), 5);
        assert_eq!(h.bin_content(2, 3, 0), 14.0);
        // in-range cells: ix 1..=2, iy 1..=3
        assert_eq!(h.in_range_bins(), vec![5, 6, 9, 10, 13, 14]);
        assert_eq!(h.minimum(), 5.0);
        assert_eq!(h.maximum(), 14.0);
        assert_eq!(h.xy_projection(), vec![vec![5.0, 6.0], vec![9.0, 10.0], vec![13.0, 14.0]]);
    }

    #[test]
    fn scale_updates_errors() {
        let mut h = Histogram::from_bins_1d("h", vec![0.0, 1.0, 2.0], &[4.0, 9.0]).unwrap();
        h.sumw2 = Some(vec![0.0, 4.0, 9.0, 0.0]);
        h.scale(0.5);
        assert_eq!(h.bin_content(1, 0, 0), 2.0);
        approx::assert_relative_eq!(h.bin_error(2, 0, 0), 1.5);
    }
}
