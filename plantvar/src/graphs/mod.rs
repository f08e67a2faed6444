use svg::node::element::path::Data;
use svg::node::element::Element;
use svg::node::element::Path;
use svg::node::Text;
use svg::Document;
use svg::Node;

use crate::args::GraphArgs;

/// Histograms and bar charts
pub mod histogram;

/// Gene coverage heatmap over the chromosomes
pub mod heatmap;

/// One horizontal track per chromosome
pub mod tracks;

pub use heatmap::GeneHeatmap;
pub use histogram::BarGraph;
pub use tracks::TrackGraph;

/// Plot area inside the margins of a graph, in px
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Frame {
    pub fn new(s: &GraphArgs) -> Self {
        Self {
            left: s.width * 0.1,
            right: s.width * 0.97,
            top: s.height * 0.04,
            bottom: s.height * 0.88,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

pub fn new_document(s: &GraphArgs) -> Document {
    Document::new()
        .set("viewBox", (0.0, 0.0, s.width, s.height))
        .set("style", format!("background-color:{}", s.background_color))
}

pub fn draw_text(x: f32, y: f32, text: &str, font_size: f32, color: &str, anchor: &str) -> Element {
    let mut element = Element::new("text");
    element.assign("x", x);
    element.assign("y", y);
    element.assign("fill", color);
    element.assign("text-anchor", anchor);
    element.assign("font-size", format!("{font_size}px"));
    element.append(Text::new(text));
    element
}

pub fn draw_line(from: (f32, f32), to: (f32, f32), color: &str, stroke_width: f32) -> Path {
    let data = Data::new().move_to(from).line_to(to);

    Path::new()
        .set("fill", "none")
        .set("stroke", color)
        .set("stroke-width", stroke_width)
        .set("d", data)
}

/// Axis titles below and left of the frame
pub fn draw_axis_titles(document: &mut Document, s: &GraphArgs, frame: &Frame, x_label: &str, y_label: &str) {
    let x = frame.left + frame.width() / 2.0;
    let y = frame.bottom + (s.height - frame.bottom) * 0.75;
    document.append(draw_text(x, y, x_label, s.font_size, &s.color, "middle"));

    let x = s.width * 0.025;
    let y = frame.top + frame.height() / 2.0;
    let mut element = draw_text(x, y, y_label, s.font_size, &s.color, "middle");
    element.assign("transform", format!("rotate(-90 {x} {y})"));
    document.append(element);
}

/// Tick labels with at most three decimals and no trailing zeros
pub fn tick_label(value: f64) -> String {
    let label = format!("{value:.3}");
    let label = label.trim_end_matches('0').trim_end_matches('.');
    match label {
        "-0" => String::from("0"),
        l => l.to_string(),
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn test_tick_label() {
        assert_eq!("0", tick_label(0.0));
        assert_eq!("0.5", tick_label(0.5));
        assert_eq!("30", tick_label(30.0));
        assert_eq!("1.333", tick_label(4.0 / 3.0));
    }

    #[test]
    fn frame_is_inside_graph() {
        let s = GraphArgs::default();
        let frame = Frame::new(&s);
        assert!(frame.left > 0.0 && frame.right < s.width);
        assert!(frame.top > 0.0 && frame.bottom < s.height);
        assert!(frame.width() > 0.0 && frame.height() > 0.0);
    }
}
