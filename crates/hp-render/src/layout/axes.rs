/// Upper bound on generated ticks; protects against degenerate steps.
const MAX_TICKS: usize = 500;

/// Axis configuration with tick generation and data→pixel mapping.
///
/// Unlike a "nice" auto-range, the range given to [`Axis::linear`] and
/// [`Axis::log`] is kept exactly; ticks are placed inside it.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Linear or logarithmic axis over `[min, max]`.
    pub fn new(min: f64, max: f64, log: bool, target_ticks: usize) -> Self {
        if log { Self::log(min, max) } else { Self::linear(min, max, target_ticks) }
    }

    /// Linear axis with "nice number" ticks inside `[min, max]`.
    pub fn linear(min: f64, max: f64, target_ticks: usize) -> Self {
        let (min, max) = widen_linear(min, max);
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let first = (min / step - 1e-9).ceil();
        for i in 0..MAX_TICKS {
            let v = (first + i as f64) * step;
            if v > max + step * 1e-9 {
                break;
            }
            ticks.push(v);
            labels.push(format_tick(v, step));
        }

        // Minor ticks: 5 subdivisions per major
        let minor_step = step / 5.0;
        let mut minor = Vec::new();
        let first_minor = (min / minor_step - 1e-9).ceil();
        for i in 0..MAX_TICKS {
            let mv = (first_minor + i as f64) * minor_step;
            if mv > max + minor_step * 1e-9 {
                break;
            }
            if !ticks.iter().any(|t| (t - mv).abs() < minor_step * 0.01) {
                minor.push(mv);
            }
        }

        Self {
            min,
            max,
            log: false,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// Logarithmic axis over `[min, max]`; both bounds must be positive.
    ///
    /// Decades inside the range get labelled ticks. Ranges spanning less than
    /// two decades also label the 2× and 5× ticks.
    pub fn log(min: f64, max: f64) -> Self {
        let (min, max) = widen_log(min, max);
        let lo_exp = min.log10().floor() as i32;
        let hi_exp = max.log10().ceil() as i32;
        let inside = |v: f64| v >= min * (1.0 - 1e-9) && v <= max * (1.0 + 1e-9);

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();
        for exp in lo_exp..=hi_exp {
            let v = 10.0_f64.powi(exp);
            if inside(v) {
                ticks.push(v);
                labels.push(format!("10{}", superscript(exp)));
            }
            for m in 2..=9 {
                let mv = m as f64 * v;
                if inside(mv) {
                    minor.push(mv);
                }
            }
        }

        if ticks.len() < 2 {
            let promoted: Vec<f64> =
                minor.iter().copied().filter(|v| is_leading(*v, 2.0) || is_leading(*v, 5.0)).collect();
            minor.retain(|v| !promoted.contains(v));
            ticks.extend(promoted);
            ticks.sort_by(f64::total_cmp);
            labels = ticks.iter().map(|&v| format_tick(v, 10.0_f64.powf(v.log10().floor()))).collect();
        }

        Self {
            min,
            max,
            log: true,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Position of `value` within the axis range: 0 at `min`, 1 at `max`.
    ///
    /// Non-positive values on a log axis map far below 0.
    pub fn fraction(&self, value: f64) -> f64 {
        if self.log {
            let log_val = value.max(1e-300).ln();
            let log_min = self.min.ln();
            let log_max = self.max.ln();
            (log_val - log_min) / (log_max - log_min)
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        px_min + self.fraction(value) * (px_max - px_min)
    }
}

/// Ensure `min < max` for a linear axis.
fn widen_linear(min: f64, max: f64) -> (f64, f64) {
    if max - min > f64::EPSILON * max.abs().max(min.abs()).max(1.0) {
        return (min, max);
    }
    let half = if min.abs() > 0.0 { min.abs() * 0.1 } else { 1.0 };
    (min - half, max + half)
}

/// Ensure `0 < min < max` for a log axis.
fn widen_log(min: f64, max: f64) -> (f64, f64) {
    let max = if max > 0.0 { max } else { 1.0 };
    let min = if min > 0.0 { min } else { max * 1e-3 };
    if max / min > 1.0 + 1e-9 { (min, max) } else { (min / 10.0, max * 10.0) }
}

fn is_leading(value: f64, digit: f64) -> bool {
    let mantissa = value / 10.0_f64.powf(value.log10().floor());
    (mantissa - digit).abs() < 1e-6
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", v, prec = decimals)
    }
}

fn superscript(n: i32) -> String {
    let s = n.to_string();
    s.chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            '9' => '\u{2079}',
            _ => c,
        })
        .collect()
}
