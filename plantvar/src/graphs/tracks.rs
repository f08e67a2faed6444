use svg::node::element::path::Data;
use svg::node::element::{Path, Rectangle};
use svg::Document;
use svg::Node;

use crate::args::GraphArgs;
use crate::graphs::{draw_axis_titles, draw_line, draw_text, new_document, tick_label, Frame};

/// Part of a track that a series is drawn into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    Full,
    Upper,
    Lower,
}

/// Horizontal tracks stacked from top to bottom sharing one x axis
#[derive(Debug)]
pub struct TrackGraph {
    pub document: Document,
    pub s: GraphArgs,
    frame: Frame,
    labels: Vec<String>,
    x_max: f64,
}

impl TrackGraph {
    pub fn new(s: GraphArgs, labels: Vec<String>, x_max: f64) -> Self {
        let x_max = if x_max > 0.0 { x_max } else { 1.0 };

        Self {
            document: new_document(&s),
            frame: Frame::new(&s),
            labels,
            x_max,
            s,
        }
    }

    pub fn ntracks(&self) -> usize {
        self.labels.len()
    }

    fn track_height(&self) -> f32 {
        self.frame.height() / self.ntracks().max(1) as f32
    }

    /// Top and bottom of a lane in px, with a small gap between tracks
    fn lane_px(&self, idx: usize, lane: Lane) -> (f32, f32) {
        let height = self.track_height();
        let top = self.frame.top + idx as f32 * height + height * 0.1;
        let bottom = self.frame.top + (idx + 1) as f32 * height;
        let middle = (top + bottom) / 2.0;

        match lane {
            Lane::Full => (top, bottom),
            Lane::Upper => (top, middle),
            Lane::Lower => (middle, bottom),
        }
    }

    fn x_px(&self, x: f64) -> f32 {
        self.frame.left + (x / self.x_max).clamp(0.0, 1.0) as f32 * self.frame.width()
    }

    fn y_px(&self, idx: usize, lane: Lane, value: f64, y_max: f64) -> f32 {
        let (top, bottom) = self.lane_px(idx, lane);
        let fraction = if y_max > 0.0 { (value / y_max).clamp(0.0, 1.0) } else { 0.0 };
        bottom - fraction as f32 * (bottom - top)
    }

    pub fn draw_labels(&mut self) {
        let font_size = (self.s.font_size * 0.6).min(self.track_height() * 0.8);
        for idx in 0..self.ntracks() {
            let (top, bottom) = self.lane_px(idx, Lane::Full);
            let y = (top + bottom) / 2.0 + font_size * 0.35;
            let label = draw_text(self.frame.left - font_size * 0.5, y, &self.labels[idx], font_size, &self.s.color, "end");
            self.document.append(label);
        }
    }

    /// Thin horizontal reference lines at `values` in every track, skipping values above `y_max`
    pub fn draw_guides(&mut self, values: &[f64], y_max: f64) {
        for idx in 0..self.ntracks() {
            for value in values.iter().filter(|v| **v <= y_max) {
                let y = self.y_px(idx, Lane::Full, *value, y_max);
                let line = draw_line((self.frame.left, y), (self.frame.right, y), "lightgray", 1.0);
                self.document.append(line);
            }
        }
    }

    /// Connected line through (x, value) points
    pub fn draw_series(&mut self, idx: usize, points: impl IntoIterator<Item = (f64, f64)>, y_max: f64, color: &str) {
        let mut points = points.into_iter();
        let Some((x, y)) = points.next() else {
            return;
        };

        let mut data = Data::new().move_to((self.x_px(x), self.y_px(idx, Lane::Full, y, y_max)));
        for (x, y) in points {
            data = data.line_to((self.x_px(x), self.y_px(idx, Lane::Full, y, y_max)));
        }

        let path = Path::new()
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", self.s.stroke_width)
            .set("d", data);
        self.document.append(path);
    }

    /// Bars as (left edge, height) pairs growing up from the bottom of the lane
    pub fn draw_bars(
        &mut self,
        idx: usize,
        lane: Lane,
        bars: impl IntoIterator<Item = (f64, f64)>,
        bar_width: f64,
        y_max: f64,
        color: &str,
    ) {
        let (_, bottom) = self.lane_px(idx, lane);

        for (x, height) in bars {
            if height <= 0.0 {
                continue;
            }

            let left = self.x_px(x);
            let right = self.x_px(x + bar_width);
            let top = self.y_px(idx, lane, height, y_max);

            let bar = Rectangle::new()
                .set("x", left)
                .set("y", top)
                .set("width", (right - left).max(0.5))
                .set("height", bottom - top)
                .set("fill", color);
            self.document.append(bar);
        }
    }

    pub fn draw_x_axis(&mut self, label: &str, ticks: usize) {
        let f = self.frame;
        let stroke = self.s.stroke_width as f32;
        let font_size = self.s.font_size * 0.75;

        self.document.append(draw_line((f.left, f.bottom), (f.right, f.bottom), &self.s.color, stroke));
        for i in 0..=ticks {
            let value = self.x_max * i as f64 / ticks.max(1) as f64;
            let x = self.x_px(value);
            self.document.append(draw_line((x, f.bottom), (x, f.bottom + font_size * 0.4), &self.s.color, stroke));
            self.document.append(draw_text(x, f.bottom + font_size * 1.5, &tick_label(value), font_size, &self.s.color, "middle"));
        }

        draw_axis_titles(&mut self.document, &self.s, &f, label, "");
    }
}
