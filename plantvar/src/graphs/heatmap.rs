use svg::node::element::Circle;
use svg::Document;
use svg::Node;

use crate::args::GraphArgs;
use crate::graphs::{draw_axis_titles, draw_line, draw_text, new_document, tick_label, Frame};
use crate::utils::cool_color;

/// One row of dots per chromosome, dots colored by mean gene coverage
#[derive(Debug)]
pub struct GeneHeatmap {
    pub document: Document,
    pub s: GraphArgs,
    frame: Frame,
    chromosomes: Vec<String>,
    x_max: f64,
    saturation: f64,
}

impl GeneHeatmap {
    pub fn new(s: GraphArgs, chromosomes: Vec<String>, x_max: f64, saturation: f64) -> Self {
        let x_max = if x_max > 0.0 { x_max } else { 1.0 };

        Self {
            document: new_document(&s),
            frame: Frame::new(&s),
            chromosomes,
            x_max,
            saturation,
            s,
        }
    }

    fn row_height(&self) -> f32 {
        self.frame.height() / (self.chromosomes.len() + 1) as f32
    }

    fn row_y(&self, idx: usize) -> f32 {
        self.frame.top + (idx + 1) as f32 * self.row_height()
    }

    fn x_px(&self, x: f64) -> f32 {
        self.frame.left + (x / self.x_max).clamp(0.0, 1.0) as f32 * self.frame.width()
    }

    fn color(&self, coverage: f64) -> String {
        cool_color(coverage.max(0.0).min(self.saturation) / self.saturation)
    }

    pub fn draw_row_labels(&mut self) {
        let font_size = self.s.font_size * 0.6;
        for idx in 0..self.chromosomes.len() {
            let y = self.row_y(idx);
            let label = draw_text(self.frame.left - font_size * 0.5, y + font_size * 0.35, &self.chromosomes[idx], font_size, &self.s.color, "end");
            self.document.append(label);
        }
    }

    /// Returns false if the chromosome has no row
    pub fn draw_gene(&mut self, chrom: &str, x: f64, coverage: f64) -> bool {
        let Some(idx) = self.chromosomes.iter().position(|c| c == chrom) else {
            return false;
        };

        let dot = Circle::new()
            .set("cx", self.x_px(x))
            .set("cy", self.row_y(idx))
            .set("r", (self.row_height() * 0.15).clamp(1.0, 4.0))
            .set("fill", self.color(coverage));
        self.document.append(dot);

        true
    }

    /// Legend dots with `<value>x` labels in the top right corner
    pub fn draw_legend(&mut self, values: &[f64]) {
        let font_size = self.s.font_size * 0.6;
        let x = self.frame.right - self.frame.width() * 0.08;

        for (i, value) in values.iter().enumerate() {
            let y = self.frame.top + i as f32 * font_size * 1.4;
            let dot = Circle::new()
                .set("cx", x)
                .set("cy", y)
                .set("r", font_size * 0.4)
                .set("fill", self.color(*value));
            self.document.append(dot);

            let label = format!("{}x", tick_label(*value));
            self.document.append(draw_text(x + font_size, y + font_size * 0.35, &label, font_size, &self.s.color, "start"));
        }
    }

    pub fn draw_x_axis(&mut self, label: &str) {
        let f = self.frame;
        let stroke = self.s.stroke_width as f32;
        let font_size = self.s.font_size * 0.75;

        self.document.append(draw_line((f.left, f.bottom), (f.right, f.bottom), &self.s.color, stroke));
        for i in 0..=5 {
            let value = self.x_max * i as f64 / 5.0;
            let x = self.x_px(value);
            self.document.append(draw_text(x, f.bottom + font_size * 1.5, &tick_label(value.round()), font_size, &self.s.color, "middle"));
        }

        draw_axis_titles(&mut self.document, &self.s, &f, label, "");
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn genes_on_known_chromosomes() {
        let chromosomes = vec![String::from("chr01"), String::from("chr02")];
        let mut heatmap = GeneHeatmap::new(GraphArgs::default(), chromosomes, 10.0, 300.0);

        assert!(heatmap.draw_gene("chr01", 1.5, 20.0));
        assert!(heatmap.draw_gene("chr02", 9.0, 500.0));
        assert!(!heatmap.draw_gene("chr03", 1.0, 20.0));

        heatmap.draw_legend(&[0.0, 100.0, 200.0, 300.0]);
        let svg = heatmap.document.to_string();
        assert_eq!(6, svg.matches("<circle").count());
        assert!(svg.contains("300x"));
        assert!(svg.contains("#ff00ff"));
    }
}
