/// Line-drawn glyph: vertex positions plus index pairs, one pair per edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    pub name: &'static str,
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl ShapeGeometry {
    pub fn edge_count(&self) -> usize {
        self.indices.len() / 2
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// The fixed set of glyph shapes, addressed by shape index.
#[derive(Debug, Clone)]
pub struct ShapeSet {
    shapes: Vec<ShapeGeometry>,
}

impl ShapeSet {
    /// The built-in glyphs: 0 line, 1 three-pointed line, 2 cross.
    pub fn builtin() -> Self {
        let diag = std::f32::consts::FRAC_1_SQRT_2;
        #[rustfmt::skip]
        let shapes = vec![
            ShapeGeometry {
                name: "line",
                positions: vec![
                    [-1.0, 0.0, 0.0],
                    [ 1.0, 0.0, 0.0],
                ],
                indices: vec![0, 1],
            },
            ShapeGeometry {
                name: "three-pointed line",
                positions: vec![
                    [ 0.0,   0.0,  0.0],
                    [-1.0,   0.0,  0.0],
                    [ diag,  diag, 0.0],
                    [ diag, -diag, 0.0],
                ],
                indices: vec![0,1, 0,2, 0,3],
            },
            ShapeGeometry {
                name: "cross",
                positions: vec![
                    [ 0.0,  0.0, 0.0],
                    [-1.0,  0.0, 0.0],
                    [ 0.0,  1.0, 0.0],
                    [ 1.0,  0.0, 0.0],
                    [ 0.0, -1.0, 0.0],
                ],
                indices: vec![0,1, 0,2, 0,3, 0,4],
            },
        ];
        Self { shapes }
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Largest valid shape index, the upper bound of the clamp pass.
    pub fn max_index(&self) -> i32 {
        self.shapes.len().saturating_sub(1) as i32
    }

    pub fn get(&self, index: usize) -> Option<&ShapeGeometry> {
        self.shapes.get(index)
    }

    /// Shape index drawn for `digit`, clamped into range.
    pub fn resolve(&self, digit: i32) -> usize {
        digit.clamp(0, self.max_index()) as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeGeometry> {
        self.shapes.iter()
    }
}

impl Default for ShapeSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_three_shapes() {
        let set = ShapeSet::builtin();
        assert_eq!(set.len(), 3);
        assert_eq!(set.max_index(), 2);
        let edges: Vec<usize> = set.iter().map(ShapeGeometry::edge_count).collect();
        assert_eq!(edges, vec![1, 3, 4]);
    }

    #[test]
    fn indices_reference_existing_vertices() {
        for shape in ShapeSet::builtin().iter() {
            assert_eq!(shape.indices.len() % 2, 0, "{}", shape.name);
            assert!(
                shape
                    .indices
                    .iter()
                    .all(|&i| (i as usize) < shape.positions.len()),
                "{}",
                shape.name
            );
        }
    }

    #[test]
    fn positions_fit_unit_square() {
        for shape in ShapeSet::builtin().iter() {
            for p in &shape.positions {
                assert!(p[0].abs() <= 1.0 && p[1].abs() <= 1.0, "{}", shape.name);
            }
        }
    }

    #[test]
    fn resolve_clamps_digits() {
        let set = ShapeSet::builtin();
        assert_eq!(set.resolve(-4), 0);
        assert_eq!(set.resolve(1), 1);
        assert_eq!(set.resolve(17), 2);
    }
}
