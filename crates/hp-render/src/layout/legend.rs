use crate::canvas::Canvas;
use crate::color::Color;
use crate::att::{FillAtt, LineAtt, TextAtt};
use crate::layout::margins::PlotArea;

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

pub enum LegendKind {
    FilledRect,
    Line,
}

/// Draw a legend in the top-right corner of the plot area.
pub fn draw_legend(
    canvas: &mut Canvas,
    area: &PlotArea,
    entries: &[LegendEntry],
    font_size: f64,
    frame: bool,
) {
    if entries.is_empty() {
        return;
    }

    let row_height = font_size + 4.0;
    let swatch_w = 14.0;
    let swatch_h = font_size - 2.0;
    let gap = 6.0;
    let padding = 6.0;

    let label_text = TextAtt::sized(font_size * 0.85).align(12);

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, label_text).width)
        .fold(0.0_f64, f64::max);

    let legend_w = padding + swatch_w + gap + max_w + padding;
    let legend_h = padding + entries.len() as f64 * row_height + padding;

    let lx = area.right() - legend_w - 5.0;
    let ly = area.top + 5.0;

    let mut background = FillAtt::new(Color::rgb(255, 255, 255).with_alpha(0.9));
    if frame {
        background = background.border(LineAtt::new(Color::from_u32(0xc8c8c8), 0.5));
    }
    canvas.rect(lx, ly, legend_w, legend_h, background);

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + padding + i as f64 * row_height + row_height / 2.0;
        let sx = lx + padding;

        match entry.kind {
            LegendKind::FilledRect => {
                canvas.rect(sx, ey - swatch_h / 2.0, swatch_w, swatch_h, FillAtt::new(entry.color));
            }
            LegendKind::Line => {
                canvas.line(sx, ey, sx + swatch_w, ey, LineAtt::new(entry.color, 1.5));
            }
        }

        canvas.text(sx + swatch_w + gap, ey, &entry.label, label_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_entry() {
        let mut canvas = Canvas::new(300.0, 200.0);
        let area = PlotArea::manual(40.0, 20.0, 240.0, 150.0);
        let entries = ["data", "simulation"]
            .iter()
            .map(|l| LegendEntry { label: l.to_string(), color: Color::rgb(0, 0, 255), kind: LegendKind::Line })
            .collect::<Vec<_>>();
        draw_legend(&mut canvas, &area, &entries, 10.0, true);
        let svg = canvas.finish_svg();
        assert!(svg.contains(">data</text>"));
        assert!(svg.contains(">simulation</text>"));
        assert_eq!(svg.matches("<line").count(), 2);
    }

    #[test]
    fn empty_legend_draws_nothing() {
        let mut canvas = Canvas::new(300.0, 200.0);
        let area = PlotArea::manual(40.0, 20.0, 240.0, 150.0);
        draw_legend(&mut canvas, &area, &[], 10.0, true);
        assert!(!canvas.finish_svg().contains("<rect x="));
    }
}
