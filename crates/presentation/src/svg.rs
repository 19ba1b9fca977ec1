//! A minimal SVG canvas with the handful of plot types the charts need.

const PADDING: f64 = 36.0;
const TITLE_OFFSET: f64 = 18.0;
const AXIS_COLOR: &str = "#8c8c8c";

/// A rectangular plotting area inside a canvas.
#[derive(Debug, Clone, Copy)]
pub struct Panel {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Panel {
    /// Splits `(width, height)` into a `rows x cols` grid and returns cell `(row, col)`.
    pub fn grid(width: f64, height: f64, rows: usize, cols: usize, row: usize, col: usize) -> Self {
        let cell_w = width / cols as f64;
        let cell_h = height / rows as f64;
        Self {
            x: col as f64 * cell_w,
            y: row as f64 * cell_h,
            width: cell_w,
            height: cell_h,
        }
    }

    fn left(&self) -> f64 {
        self.x + PADDING
    }

    fn right(&self) -> f64 {
        self.x + self.width - PADDING / 2.0
    }

    fn top(&self) -> f64 {
        self.y + PADDING
    }

    fn bottom(&self) -> f64 {
        self.y + self.height - PADDING
    }

    fn inner_width(&self) -> f64 {
        (self.right() - self.left()).max(1.0)
    }

    fn inner_height(&self) -> f64 {
        (self.bottom() - self.top()).max(1.0)
    }
}

/// Finite min/max of `values`, widened when flat and optionally forced to include zero.
fn extent(values: &[f64], include_zero: bool) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for &v in values.iter().filter(|v| v.is_finite()) {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if !min_v.is_finite() || !max_v.is_finite() {
        return None;
    }
    if include_zero {
        min_v = min_v.min(0.0);
        max_v = max_v.max(0.0);
    }
    if min_v == max_v {
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
        min_v -= adjust;
        max_v += adjust;
    }
    Some((min_v, max_v))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub struct Canvas {
    width: f64,
    height: f64,
    body: String,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn finish(self) -> String {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif"><rect width="{w}" height="{h}" fill="#ffffff" />{body}</svg>"##,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }

    fn text(&mut self, x: f64, y: f64, size: f64, anchor: &str, text: &str) {
        self.body.push_str(&format!(
            r##"<text x="{x:.2}" y="{y:.2}" font-size="{size}" text-anchor="{anchor}">{}</text>"##,
            escape(text)
        ));
    }

    fn frame(&mut self, panel: &Panel, title: &str) {
        self.text(panel.x + panel.width / 2.0, panel.y + TITLE_OFFSET, 13.0, "middle", title);
        self.body.push_str(&format!(
            r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{AXIS_COLOR}" stroke-width="0.5" />"##,
            panel.left(),
            panel.top(),
            panel.inner_width(),
            panel.inner_height()
        ));
    }

    fn axis_labels(&mut self, panel: &Panel, min_v: f64, max_v: f64) {
        self.text(panel.left() - 4.0, panel.top() + 4.0, 9.0, "end", &format!("{:.2}", max_v));
        self.text(panel.left() - 4.0, panel.bottom(), 9.0, "end", &format!("{:.2}", min_v));
    }

    fn scale_y(panel: &Panel, value: f64, min_v: f64, max_v: f64) -> f64 {
        let norm = (value - min_v) / (max_v - min_v);
        panel.bottom() - norm * panel.inner_height()
    }

    /// Draws `values` as a polyline over evenly spaced x positions.
    pub fn line_series(&mut self, panel: &Panel, title: &str, values: &[f64], color: &str, zero_guide: bool) {
        self.frame(panel, title);
        let Some((min_v, max_v)) = extent(values, zero_guide) else {
            return;
        };
        self.axis_labels(panel, min_v, max_v);

        let step = if values.len() > 1 {
            panel.inner_width() / (values.len() - 1) as f64
        } else {
            0.0
        };
        let points: Vec<String> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| {
                format!(
                    "{:.2},{:.2}",
                    panel.left() + i as f64 * step,
                    Self::scale_y(panel, v, min_v, max_v)
                )
            })
            .collect();
        self.body.push_str(&format!(
            r##"<polyline points="{}" fill="none" stroke="{color}" stroke-width="1.5" />"##,
            points.join(" ")
        ));

        if zero_guide {
            let y = Self::scale_y(panel, 0.0, min_v, max_v);
            self.body.push_str(&format!(
                r##"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#d62728" stroke-dasharray="4 3" />"##,
                panel.left(),
                panel.right()
            ));
        }
    }

    /// Draws one bar per value, labelled underneath when `labels` is non-empty.
    pub fn bars(&mut self, panel: &Panel, title: &str, labels: &[String], values: &[f64], color: &str) {
        self.frame(panel, title);
        let Some((min_v, max_v)) = extent(values, true) else {
            return;
        };
        self.axis_labels(panel, min_v, max_v);

        let slot = panel.inner_width() / values.len() as f64;
        let zero_y = Self::scale_y(panel, 0.0, min_v, max_v);
        for (i, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let y = Self::scale_y(panel, value, min_v, max_v);
            let x = panel.left() + i as f64 * slot + slot * 0.1;
            self.body.push_str(&format!(
                r##"<rect x="{x:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{color}" fill-opacity="0.7" />"##,
                y.min(zero_y),
                slot * 0.8,
                (zero_y - y).abs()
            ));
            if let Some(label) = labels.get(i) {
                self.text(x + slot * 0.4, panel.bottom() + 14.0, 10.0, "middle", label);
            }
        }
    }

    /// Buckets `values` into `bins` equal-width bins and draws their counts.
    pub fn histogram(&mut self, panel: &Panel, title: &str, values: &[f64], bins: usize, color: &str) {
        let counts = histogram_counts(values, bins);
        self.bars(panel, title, &[], &counts, color);
    }

    /// Draws left-aligned lines of monospace text.
    pub fn text_block(&mut self, panel: &Panel, title: &str, lines: &[String]) {
        self.text(panel.x + panel.width / 2.0, panel.y + TITLE_OFFSET, 13.0, "middle", title);
        let mut y = panel.top() + 10.0;
        for line in lines {
            self.body.push_str(&format!(
                r##"<text x="{:.2}" y="{y:.2}" font-size="12" font-family="monospace">{}</text>"##,
                panel.left(),
                escape(line)
            ));
            y += 20.0;
        }
    }
}

/// Counts of finite `values` per equal-width bin between their min and max.
pub fn histogram_counts(values: &[f64], bins: usize) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min_v = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max_v = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min_v == max_v {
        return vec![finite.len() as f64];
    }

    let width = (max_v - min_v) / bins as f64;
    let mut counts = vec![0.0; bins];
    for v in finite {
        let idx = (((v - min_v) / width) as usize).min(bins - 1);
        counts[idx] += 1.0;
    }
    counts
}
