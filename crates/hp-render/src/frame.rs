use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::att::{FillAtt, LineAtt, LineKind, TextAtt};
use crate::layout::margins::{PlotArea, max_label_width};

/// Steps used to paint the color bar gradient.
const COLORBAR_STEPS: usize = 64;

/// Draw a standard box frame with axes, ticks, grid, and labels.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    let tick_line = LineAtt::new(Color::BLACK, 0.6);
    let minor_tick_line = LineAtt::new(Color::BLACK, 0.4);

    let inward = config.axes.tick_direction == "in";
    let tl = config.axes.tick_length;
    let mtl = config.axes.minor_tick_length;
    let grid_color = config.grid.color.with_alpha(config.grid.alpha);
    let grid_line = LineAtt::new(grid_color, 0.5).kind(LineKind::Dashed);

    // Sign of the tick offset: away from the frame edge or into it.
    let out = if inward { -1.0 } else { 1.0 };

    draw_frame(canvas, area);

    let x_tick_text = TextAtt::sized(config.font.tick_size).align(23);

    // --- X axis ticks ---
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }

        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), grid_line);
        }

        canvas.line(px, area.bottom(), px, area.bottom() + out * tl, tick_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - out * tl, tick_line);
        }

        if let Some(label) = x_axis.tick_labels.get(i) {
            let label_y = if inward { area.bottom() + 3.0 } else { area.bottom() + tl + 3.0 };
            canvas.text(px, label_y, label, x_tick_text);
        }
    }

    for &val in &x_axis.minor_ticks {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() + out * mtl, minor_tick_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - out * mtl, minor_tick_line);
        }
    }

    // --- Y axis ticks ---
    let y_tick_text = TextAtt::sized(config.font.tick_size).align(32);

    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }

        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, grid_line);
        }

        canvas.line(area.left, py, area.left - out * tl, py, tick_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() + out * tl, py, tick_line);
        }

        if let Some(label) = y_axis.tick_labels.get(i) {
            let label_x = if inward { area.left - 4.0 } else { area.left - tl - 4.0 };
            canvas.text(label_x, py, label, y_tick_text);
        }
    }

    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left - out * mtl, py, minor_tick_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() + out * mtl, py, minor_tick_line);
        }
    }

    // --- Axis labels ---
    // ROOT aligns axis titles with the far end of the axis.
    let title_text = TextAtt::sized(config.font.label_size).align(31);
    if !x_axis.label.is_empty() {
        let label_y = area.bottom()
            + if inward { 0.0 } else { tl }
            + config.font.tick_size
            + config.font.label_size
            + 8.0;
        canvas.text(area.right(), label_y, &x_axis.label, title_text);
    }

    if !y_axis.label.is_empty() {
        let tick_w = max_label_width(canvas, &y_axis.tick_labels, y_tick_text);
        let label_x = area.left - tick_w - if inward { 4.0 } else { tl + 4.0 } - 6.0;
        canvas.text_rotated(label_x, area.top, &y_axis.label, title_text, -90.0);
    }
}

/// Draw the frame rectangle only.
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea) {
    let edge = LineAtt::new(Color::BLACK, 0.8);
    canvas.line(area.left, area.top, area.right(), area.top, edge);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), edge);
    canvas.line(area.left, area.top, area.left, area.bottom(), edge);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), edge);
}

/// Vertical color bar to the right of `area`, mapping `z_axis` through `cmap`.
pub fn draw_color_bar(
    canvas: &mut Canvas,
    area: &PlotArea,
    z_axis: &Axis,
    cmap: fn(f64) -> Color,
    config: &VizConfig,
) {
    let bar = PlotArea::manual(area.right() + 8.0, area.top, config.histogram.colorbar_width, area.height);
    let step_h = bar.height / COLORBAR_STEPS as f64;
    for i in 0..COLORBAR_STEPS {
        let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        let y = bar.bottom() - (i + 1) as f64 * step_h;
        // Overlap neighbours slightly so no seams show after rasterization.
        canvas.rect(bar.left, y, bar.width, step_h + 0.3, FillAtt::new(cmap(t)));
    }
    draw_frame(canvas, &bar);

    let tick_line = LineAtt::new(Color::BLACK, 0.6);
    let label_text = TextAtt::sized(config.font.tick_size).align(12);
    for (i, &val) in z_axis.tick_positions.iter().enumerate() {
        let py = z_axis.data_to_pixel(val, bar.bottom(), bar.top);
        if py < bar.top - 0.5 || py > bar.bottom() + 0.5 {
            continue;
        }
        canvas.line(bar.right() - 4.0, py, bar.right(), py, tick_line);
        if let Some(label) = z_axis.tick_labels.get(i) {
            canvas.text(bar.right() + 3.0, py, label, label_text);
        }
    }

    if !z_axis.label.is_empty() {
        let tick_w = max_label_width(canvas, &z_axis.tick_labels, label_text);
        let title_text = TextAtt::sized(config.font.label_size).align(31);
        let x = bar.right() + 3.0 + tick_w + config.font.label_size + 2.0;
        canvas.text_rotated(x, bar.top, &z_axis.label, title_text, -90.0);
    }
}

/// Horizontal room [`draw_color_bar`] needs to the right of the frame.
pub fn color_bar_extent(canvas: &Canvas, z_axis: &Axis, config: &VizConfig) -> f64 {
    let label_text = TextAtt::sized(config.font.tick_size);
    let mut extent = 8.0
        + config.histogram.colorbar_width
        + 3.0
        + max_label_width(canvas, &z_axis.tick_labels, label_text);
    if !z_axis.label.is_empty() {
        extent += config.font.label_size + 4.0;
    }
    extent
}
