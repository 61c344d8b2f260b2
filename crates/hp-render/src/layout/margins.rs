use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::att::TextAtt;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Compute margins from axis labels and config.
    ///
    /// `has_title` reserves a line above the frame; `right_extra` reserves room
    /// on the right, e.g. for a color bar.
    pub fn auto(
        canvas: &Canvas,
        y_axis: &Axis,
        x_axis: &Axis,
        config: &VizConfig,
        has_title: bool,
        right_extra: f64,
    ) -> Self {
        let tick_style = TextAtt::sized(config.font.tick_size);
        let label_size = config.font.label_size;

        // Left margin: y-axis tick labels + axis label + padding
        let mut left = 15.0;
        left += max_label_width(canvas, &y_axis.tick_labels, tick_style) + 8.0;
        if !y_axis.label.is_empty() {
            left += label_size + 6.0;
        }

        // Bottom margin: x-axis tick labels + axis label + padding
        let mut bottom = 15.0 + tick_style.size + 6.0;
        if !x_axis.label.is_empty() {
            bottom += label_size + 6.0;
        }

        let top = if has_title { config.font.title_size * 1.3 + 14.0 } else { 15.0 };
        let right = 20.0 + right_extra;

        let width = canvas.width - left - right;
        let height = canvas.height - top - bottom;

        Self { left, top, width: width.max(50.0), height: height.max(50.0) }
    }

    /// Manual margins.
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Widest rendered label, 0 when there are none.
pub fn max_label_width(canvas: &Canvas, labels: &[String], style: TextAtt) -> f64 {
    labels.iter().map(|l| canvas.measure_text(l, style).width).fold(0.0_f64, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_title_shrink_the_frame() {
        let config = VizConfig::default();
        let canvas = Canvas::new(config.figure.width, config.figure.height);
        let x = Axis::linear(0.0, 10.0, 6);
        let y = Axis::linear(0.0, 1000.0, 6);

        let bare = PlotArea::auto(&canvas, &y, &x, &config, false, 0.0);
        let labelled = PlotArea::auto(
            &canvas,
            &y.clone().with_label("Events"),
            &x.clone().with_label("m [GeV]"),
            &config,
            true,
            40.0,
        );
        assert!(labelled.left > bare.left);
        assert!(labelled.top > bare.top);
        assert!(labelled.bottom() < bare.bottom());
        assert!(labelled.right() < bare.right());
        assert!(bare.right() <= canvas.width);
    }
}
