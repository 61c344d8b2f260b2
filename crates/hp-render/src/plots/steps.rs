use crate::canvas::Canvas;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::att::LineAtt;

/// One-dimensional binned series.
#[derive(Debug, Clone, Copy)]
pub struct StepSeries<'a> {
    /// `values.len() + 1` bin edges.
    pub edges: &'a [f64],
    pub values: &'a [f64],
    /// Symmetric per-bin errors, drawn as vertical bars at bin centers.
    pub errors: Option<&'a [f64]>,
}

/// Draw a histogram outline: rising from the frame floor at the first edge,
/// one horizontal segment per bin, back down at the last edge.
///
/// Callers clip to `area`; values outside the y range are drawn past the frame.
pub fn draw_steps(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    series: &StepSeries<'_>,
    line: LineAtt,
) {
    let n = series.values.len().min(series.edges.len().saturating_sub(1));
    if n == 0 {
        return;
    }
    let px = |x: f64| x_axis.data_to_pixel(x, area.left, area.right());
    let py = |y: f64| {
        if y_axis.log && y <= 0.0 {
            area.bottom()
        } else {
            y_axis.data_to_pixel(y, area.bottom(), area.top)
        }
    };
    let floor = area.bottom();

    let mut points = Vec::with_capacity(2 * n + 2);
    points.push((px(series.edges[0]), floor));
    for (i, &v) in series.values.iter().take(n).enumerate() {
        let y = py(v);
        points.push((px(series.edges[i]), y));
        points.push((px(series.edges[i + 1]), y));
    }
    points.push((px(series.edges[n]), floor));
    canvas.polyline(&points, line);

    if let Some(errors) = series.errors {
        for (i, (&v, &e)) in series.values.iter().zip(errors).take(n).enumerate() {
            if e <= 0.0 {
                continue;
            }
            let center = px(0.5 * (series.edges[i] + series.edges[i + 1]));
            canvas.error_bar(center, py(v - e), py(v + e), 0.0, line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> (Canvas, PlotArea, Axis, Axis) {
        (
            Canvas::new(200.0, 200.0),
            PlotArea::manual(0.0, 0.0, 100.0, 100.0),
            Axis::linear(0.0, 4.0, 5),
            Axis::linear(0.0, 10.0, 5),
        )
    }

    #[test]
    fn outline_has_two_points_per_bin() {
        let (mut canvas, area, x, y) = frame();
        let series = StepSeries { edges: &[0.0, 1.0, 2.0, 4.0], values: &[5.0, 10.0, 0.0], errors: None };
        draw_steps(&mut canvas, &area, &x, &y, &series, LineAtt::default());
        let svg = canvas.finish_svg();
        assert!(svg.contains(
            r#"points="0.00,100.00 0.00,50.00 25.00,50.00 25.00,0.00 50.00,0.00 50.00,100.00 100.00,100.00 100.00,100.00""#
        ));
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn error_bars_skip_empty_bins() {
        let (mut canvas, area, x, y) = frame();
        let series = StepSeries {
            edges: &[0.0, 2.0, 4.0],
            values: &[5.0, 5.0],
            errors: Some(&[1.0, 0.0]),
        };
        draw_steps(&mut canvas, &area, &x, &y, &series, LineAtt::default());
        let svg = canvas.finish_svg();
        assert_eq!(svg.matches("<line").count(), 1);
        assert!(svg.contains(r#"<line x1="25.00" y1="60.00" x2="25.00" y2="40.00""#));
    }

    #[test]
    fn nonpositive_values_sit_on_log_floor() {
        let (mut canvas, area, x, _) = frame();
        let y = Axis::log(1.0, 100.0);
        let series = StepSeries { edges: &[0.0, 4.0], values: &[0.0], errors: None };
        draw_steps(&mut canvas, &area, &x, &y, &series, LineAtt::default());
        assert!(canvas.finish_svg().contains("0.00,100.00 100.00,100.00"));
    }
}
