//! Coordinate sets.

/// Whether a conformer carries layout (2D) or embedded (3D) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensionality {
    /// Planar layout, z is always 0.
    TwoD,
    /// Spatial embedding.
    ThreeD,
}

/// Per-atom coordinates for one molecule, tagged with dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    coords: Vec<[f64; 3]>,
    kind: Dimensionality,
}

impl Conformer {
    /// A 2D conformer from (x, y) pairs.
    pub fn planar(points: Vec<[f64; 2]>) -> Self {
        Conformer {
            coords: points.iter().map(|p| [p[0], p[1], 0.0]).collect(),
            kind: Dimensionality::TwoD,
        }
    }

    /// A 3D conformer.
    pub fn spatial(coords: Vec<[f64; 3]>) -> Self {
        Conformer {
            coords,
            kind: Dimensionality::ThreeD,
        }
    }

    /// Dimensionality tag.
    pub fn kind(&self) -> Dimensionality {
        self.kind
    }

    /// Number of positioned atoms.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the conformer has no positions.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Position of one atom.
    pub fn position(&self, idx: usize) -> [f64; 3] {
        self.coords[idx]
    }

    /// All positions.
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.coords
    }

    /// Mutable access for refinement stages.
    pub fn positions_mut(&mut self) -> &mut [[f64; 3]] {
        &mut self.coords
    }

    /// Euclidean distance between two atoms.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        let pa = self.coords[a];
        let pb = self.coords[b];
        let dx = pa[0] - pb[0];
        let dy = pa[1] - pb[1];
        let dz = pa[2] - pb[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Angle at `j` formed by the `i-j-k` chain, in radians. Degenerate
    /// geometries (coincident points) report 0.
    pub fn angle(&self, i: usize, j: usize, k: usize) -> f64 {
        let a = sub(self.coords[i], self.coords[j]);
        let b = sub(self.coords[k], self.coords[j]);
        let na = norm(a);
        let nb = norm(b);
        if na < 1e-12 || nb < 1e-12 {
            return 0.0;
        }
        (dot(a, b) / (na * nb)).clamp(-1.0, 1.0).acos()
    }

    /// Signed dihedral of the `i-j-k-l` chain, in radians.
    pub fn dihedral(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        let b1 = sub(self.coords[j], self.coords[i]);
        let b2 = sub(self.coords[k], self.coords[j]);
        let b3 = sub(self.coords[l], self.coords[k]);
        let n1 = cross(b1, b2);
        let n2 = cross(b2, b3);
        let nb2 = norm(b2);
        if nb2 < 1e-12 {
            return 0.0;
        }
        let m = cross(n1, [b2[0] / nb2, b2[1] / nb2, b2[2] / nb2]);
        let x = dot(n1, n2);
        let y = dot(m, n2);
        if x.abs() < 1e-15 && y.abs() < 1e-15 {
            return 0.0;
        }
        y.atan2(x)
    }

    /// Geometric center.
    pub fn centroid(&self) -> [f64; 3] {
        if self.coords.is_empty() {
            return [0.0, 0.0, 0.0];
        }
        let n = self.coords.len() as f64;
        let mut sum = [0.0, 0.0, 0.0];
        for p in &self.coords {
            sum[0] += p[0];
            sum[1] += p[1];
            sum[2] += p[2];
        }
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }

    /// Rigid rotation of a 2D conformer about its centroid, angle in
    /// degrees. Angles are normalized modulo 360 first.
    pub fn rotated_2d(&self, degrees: f64) -> Conformer {
        let normalized = degrees.rem_euclid(360.0);
        if normalized == 0.0 {
            return self.clone();
        }
        let theta = normalized.to_radians();
        let (sin, cos) = theta.sin_cos();
        let center = self.centroid();
        let coords = self
            .coords
            .iter()
            .map(|p| {
                let x = p[0] - center[0];
                let y = p[1] - center[1];
                [
                    center[0] + x * cos - y * sin,
                    center[1] + x * sin + y * cos,
                    p[2],
                ]
            })
            .collect();
        Conformer {
            coords,
            kind: self.kind,
        }
    }

    /// Axis-aligned bounding box as (min, max) over x and y.
    pub fn bounds_2d(&self) -> ([f64; 2], [f64; 2]) {
        let mut min = [f64::INFINITY, f64::INFINITY];
        let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        for p in &self.coords {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        if self.coords.is_empty() {
            return ([0.0, 0.0], [0.0, 0.0]);
        }
        (min, max)
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Conformer {
        Conformer::planar(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
    }

    #[test]
    fn centroid_of_square() {
        let c = square().centroid();
        assert!((c[0] - 0.5).abs() < 1e-12);
        assert!((c[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rotation_preserves_distances() {
        let original = square();
        let rotated = original.rotated_2d(73.0);
        for a in 0..4 {
            for b in (a + 1)..4 {
                assert!((original.distance(a, b) - rotated.distance(a, b)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn full_turn_is_identity() {
        let original = square();
        let turned = original.rotated_2d(360.0);
        for (a, b) in original.positions().iter().zip(turned.positions()) {
            assert!((a[0] - b[0]).abs() < 1e-9);
            assert!((a[1] - b[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn right_angle_at_corner() {
        let theta = square().angle(0, 1, 2);
        assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn planar_chain_dihedral_is_flat() {
        // Trans zigzag in the plane: dihedral of pi.
        let c = Conformer::spatial(vec![
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 1.0, 0.0],
        ]);
        assert!((c.dihedral(0, 1, 2, 3).abs() - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn perpendicular_dihedral() {
        let c = Conformer::spatial(vec![
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
        ]);
        assert!((c.dihedral(0, 1, 2, 3).abs() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn negative_angles_normalize() {
        let quarter = square().rotated_2d(90.0);
        let wrapped = square().rotated_2d(-270.0);
        for (a, b) in quarter.positions().iter().zip(wrapped.positions()) {
            assert!((a[0] - b[0]).abs() < 1e-9);
            assert!((a[1] - b[1]).abs() < 1e-9);
        }
    }
}
