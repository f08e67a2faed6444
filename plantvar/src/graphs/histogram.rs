use svg::node::element::Rectangle;
use svg::Document;
use svg::Node;

use crate::args::GraphArgs;
use crate::graphs::{draw_axis_titles, draw_line, draw_text, new_document, tick_label, Frame};

/// Vertical bars on a linear x axis, y axis starting from zero
#[derive(Debug)]
pub struct BarGraph {
    pub document: Document,
    pub s: GraphArgs,
    frame: Frame,
    x_range: (f64, f64),
    y_max: f64,
}

impl BarGraph {
    pub fn new(s: GraphArgs, x_range: (f64, f64), y_max: f64) -> Self {
        // An empty graph still gets a usable y axis
        let y_max = if y_max > 0.0 { y_max } else { 1.0 };

        Self {
            document: new_document(&s),
            frame: Frame::new(&s),
            x_range,
            y_max,
            s,
        }
    }

    fn x_px(&self, x: f64) -> f32 {
        let (start, end) = self.x_range;
        let fraction = ((x - start) / (end - start)).clamp(0.0, 1.0);
        self.frame.left + fraction as f32 * self.frame.width()
    }

    fn y_px(&self, y: f64) -> f32 {
        let fraction = (y / self.y_max).clamp(0.0, 1.0);
        self.frame.bottom - fraction as f32 * self.frame.height()
    }

    /// Bars as (left edge, height) pairs
    pub fn draw_bars(&mut self, bars: impl IntoIterator<Item = (f64, f64)>, bar_width: f64, color: &str) {
        for (x, height) in bars {
            if height <= 0.0 {
                continue;
            }

            let left = self.x_px(x);
            let right = self.x_px(x + bar_width);
            let top = self.y_px(height);

            let bar = Rectangle::new()
                .set("x", left)
                .set("y", top)
                .set("width", (right - left).max(0.5))
                .set("height", self.frame.bottom - top)
                .set("fill", color);

            self.document.append(bar);
        }
    }

    /// Full height reference line at `x`
    pub fn draw_marker(&mut self, x: f64) {
        let x = self.x_px(x);
        let line = draw_line(
            (x, self.frame.top),
            (x, self.frame.bottom),
            &self.s.color,
            self.s.stroke_width as f32,
        );
        self.document.append(line);
    }

    pub fn draw_axes(&mut self, x_label: &str, y_label: &str, x_ticks: usize) {
        let f = self.frame;
        let stroke = self.s.stroke_width as f32;
        let font_size = self.s.font_size * 0.75;

        self.document.append(draw_line((f.left, f.bottom), (f.right, f.bottom), &self.s.color, stroke));
        self.document.append(draw_line((f.left, f.top), (f.left, f.bottom), &self.s.color, stroke));

        let (start, end) = self.x_range;
        for i in 0..=x_ticks {
            let value = start + (end - start) * i as f64 / x_ticks.max(1) as f64;
            let x = self.x_px(value);
            self.document.append(draw_line((x, f.bottom), (x, f.bottom + font_size * 0.4), &self.s.color, stroke));
            self.document.append(draw_text(x, f.bottom + font_size * 1.5, &tick_label(value), font_size, &self.s.color, "middle"));
        }

        for value in [0.0, self.y_max / 2.0, self.y_max] {
            let y = self.y_px(value);
            self.document.append(draw_text(f.left - font_size * 0.5, y + font_size * 0.35, &tick_label(value), font_size, &self.s.color, "end"));
        }

        draw_axis_titles(&mut self.document, &self.s, &f, x_label, y_label);
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn bars_are_drawn() {
        let mut graph = BarGraph::new(GraphArgs::default(), (0.0, 30.5), 2.0);
        graph.draw_bars([(0.6, 1.0), (1.6, 0.0), (2.6, 2.0)], 0.8, "lime");
        graph.draw_axes("InDel length", "log10(number of InDels)", 6);

        let svg = graph.document.to_string();
        assert_eq!(2, svg.matches("<rect").count());
        assert!(svg.contains("InDel length"));
    }

    #[test]
    fn values_are_clamped_to_the_frame() {
        let graph = BarGraph::new(GraphArgs::default(), (0.0, 1.0), 0.0);
        assert_eq!(graph.frame.left, graph.x_px(-5.0));
        assert_eq!(graph.frame.right, graph.x_px(5.0));
        assert_eq!(graph.frame.top, graph.y_px(100.0));
        assert_eq!(graph.frame.bottom, graph.y_px(0.0));
    }
}
