use crate::shapes::ShapeSet;
use glyphometer_digits::DigitSequence;

/// Per-frame view parameters shared by all renderers.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Frames presented so far; animates the glyphs.
    pub frame: u64,
    /// Glyph line color, RGBA.
    pub line_color: [f32; 4],
    /// Canvas clear color, RGBA.
    pub clear_color: [f64; 4],
}

/// Yellow glyph lines on a dusty-rose canvas, set the same way every frame.
impl Default for RenderView {
    fn default() -> Self {
        Self {
            frame: 0,
            line_color: [1.0, 1.0, 0.0, 1.0],
            clear_color: [0.8, 0.6, 0.6, 1.0],
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the digit sequence and a view, then produces output.
/// It never mutates the digits.
pub trait GlyphRenderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given digits and view.
    fn render(&self, digits: &DigitSequence, view: &RenderView) -> Self::Output;
}

/// Text renderer for CLI output, logging and tests.
///
/// Lists the slots most-significant first, the way the row reads on screen.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    shapes: ShapeSet,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shapes(shapes: ShapeSet) -> Self {
        Self { shapes }
    }
}

impl GlyphRenderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, digits: &DigitSequence, view: &RenderView) -> String {
        let mut out = format!(
            "=== Digits (frame={}, slots={}) ===\n",
            view.frame,
            digits.len()
        );
        let row: Vec<String> = digits.iter().rev().map(|d| d.to_string()).collect();
        out.push_str(&format!("value: [{}]\n", row.join(" ")));
        for (slot, digit) in digits.iter().enumerate().rev() {
            let shape = self.shapes.resolve(digit);
            let name = self.shapes.get(shape).map_or("?", |s| s.name);
            out.push_str(&format!("  slot {slot}: {digit} -> {name}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence() {
        let output = DebugTextRenderer::new().render(&DigitSequence::new(0), &RenderView::default());
        assert!(output.contains("frame=0"));
        assert!(output.contains("slots=0"));
        assert!(output.contains("value: []"));
    }

    #[test]
    fn most_significant_first() {
        let digits = DigitSequence::from_slice(&[1, 0, 2]);
        let view = RenderView {
            frame: 12,
            ..RenderView::default()
        };
        let output = DebugTextRenderer::new().render(&digits, &view);
        assert!(output.contains("frame=12"));
        assert!(output.contains("value: [2 0 1]"));
        let slot2 = output.find("slot 2: 2 -> cross").unwrap();
        let slot0 = output.find("slot 0: 1 -> three-pointed line").unwrap();
        assert!(slot2 < slot0);
    }

    #[test]
    fn out_of_range_digit_draws_nearest_shape() {
        let digits = DigitSequence::from_slice(&[9]);
        let output = DebugTextRenderer::new().render(&digits, &RenderView::default());
        assert!(output.contains("slot 0: 9 -> cross"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.frame, 0);
        assert_eq!(view.line_color, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(view.clear_color, [0.8, 0.6, 0.6, 1.0]);
    }
}
