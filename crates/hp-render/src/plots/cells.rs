use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::att::FillAtt;

/// Two-dimensional binned data, `values[iy][ix]`.
#[derive(Debug, Clone, Copy)]
pub struct CellGrid<'a> {
    pub x_edges: &'a [f64],
    pub y_edges: &'a [f64],
    pub values: &'a [Vec<f64>],
}

/// Paint every non-empty cell with `cmap` applied to its position on `z_axis`.
///
/// Cells below the z range are left blank; cells above it saturate.
pub fn draw_cells(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    z_axis: &Axis,
    grid: &CellGrid<'_>,
    cmap: fn(f64) -> Color,
) {
    for (iy, row) in grid.values.iter().enumerate() {
        let (Some(&y_lo), Some(&y_hi)) = (grid.y_edges.get(iy), grid.y_edges.get(iy + 1)) else {
            break;
        };
        let top = y_axis.data_to_pixel(y_hi, area.bottom(), area.top);
        let bottom = y_axis.data_to_pixel(y_lo, area.bottom(), area.top);

        for (ix, &v) in row.iter().enumerate() {
            let (Some(&x_lo), Some(&x_hi)) = (grid.x_edges.get(ix), grid.x_edges.get(ix + 1)) else {
                break;
            };
            if v == 0.0 || (z_axis.log && v <= 0.0) {
                continue;
            }
            let t = z_axis.fraction(v);
            if t < 0.0 {
                continue;
            }
            let left = x_axis.data_to_pixel(x_lo, area.left, area.right());
            let right = x_axis.data_to_pixel(x_hi, area.left, area.right());
            canvas.rect(left, top, right - left, bottom - top, FillAtt::new(cmap(t.min(1.0))));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::viridis;

    #[test]
    fn empty_and_underflowing_cells_are_blank() {
        let mut canvas = Canvas::new(100.0, 100.0);
        let area = PlotArea::manual(0.0, 0.0, 100.0, 100.0);
        let x = Axis::linear(0.0, 2.0, 3);
        let y = Axis::linear(0.0, 2.0, 3);
        let z = Axis::linear(1.0, 4.0, 3);
        let values = vec![vec![0.0, 0.5], vec![4.0, 9.0]];
        let grid = CellGrid { x_edges: &[0.0, 1.0, 2.0], y_edges: &[0.0, 1.0, 2.0], values: &values };
        draw_cells(&mut canvas, &area, &x, &y, &z, &grid, viridis);
        let svg = canvas.finish_svg();

        // Only the two top-row cells are painted, both at the top of the scale.
        let top = viridis(1.0);
        assert_eq!(svg.matches("<rect x=").count(), 2);
        assert_eq!(svg.matches(&format!(r#"fill="{top}""#)).count(), 2);
        assert!(svg.contains(r#"<rect x="0.00" y="0.00" width="50.00" height="50.00""#));
    }
}
