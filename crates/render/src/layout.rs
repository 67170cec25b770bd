use glam::{Mat4, Vec3};

/// Fraction of a slot's width a glyph's radius may occupy.
const GLYPH_FILL: f32 = 0.4;
/// Upper bound on a glyph's radius in normalized height units.
const MAX_GLYPH_RADIUS: f32 = 0.8;

/// Model transforms placing each digit slot in a row.
///
/// Slots span `[-aspect, aspect]` horizontally (the line shader divides x by
/// the aspect ratio) and are vertically centred. The least-significant digit,
/// slot 0, is the rightmost.
#[derive(Debug, Clone)]
pub struct SlotLayout {
    aspect: f32,
    transforms: Vec<Mat4>,
}

impl SlotLayout {
    pub fn new(count: usize, aspect: f32) -> Self {
        let aspect = if aspect > 0.0 { aspect } else { 1.0 };
        let mut transforms = Vec::with_capacity(count);
        if count > 0 {
            let cell = 2.0 * aspect / count as f32;
            let radius = (cell * GLYPH_FILL).min(MAX_GLYPH_RADIUS);
            for slot in 0..count {
                let column = (count - 1 - slot) as f32;
                let x = -aspect + cell * (column + 0.5);
                transforms.push(
                    Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
                        * Mat4::from_scale(Vec3::new(radius, radius, 1.0)),
                );
            }
        }
        Self { aspect, transforms }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transform(&self, slot: usize) -> Option<Mat4> {
        self.transforms.get(slot).copied()
    }

    /// Column-major matrices, ready for an instance buffer.
    pub fn columns(&self) -> Vec<[[f32; 4]; 4]> {
        self.transforms.iter().map(Mat4::to_cols_array_2d).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_significant_slot_is_rightmost() {
        let layout = SlotLayout::new(4, 1.0);
        let xs: Vec<f32> = (0..4)
            .map(|i| layout.transform(i).unwrap().w_axis.x)
            .collect();
        assert!(xs.windows(2).all(|w| w[0] > w[1]), "{xs:?}");
    }

    #[test]
    fn glyphs_stay_inside_their_row() {
        let aspect = 800.0 / 600.0;
        let layout = SlotLayout::new(8, aspect);
        for slot in 0..layout.len() {
            let m = layout.transform(slot).unwrap();
            for corner in [Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)] {
                let p = m.transform_point3(corner);
                assert!(p.x.abs() <= aspect + 1e-5, "slot {slot}: {p}");
                assert!(p.y.abs() <= 1.0, "slot {slot}: {p}");
            }
        }
    }

    #[test]
    fn single_slot_is_centred_and_capped() {
        let layout = SlotLayout::new(1, 1.0);
        let m = layout.transform(0).unwrap();
        assert_eq!(m.w_axis.x, 0.0);
        assert_eq!(m.x_axis.x, MAX_GLYPH_RADIUS);
    }

    #[test]
    fn bad_aspect_falls_back_to_square() {
        let layout = SlotLayout::new(2, 0.0);
        assert_eq!(layout.aspect(), 1.0);
        assert_eq!(layout.columns().len(), 2);
    }

    #[test]
    fn zero_slots() {
        let layout = SlotLayout::new(0, 1.5);
        assert!(layout.is_empty());
        assert!(layout.transform(0).is_none());
    }
}
