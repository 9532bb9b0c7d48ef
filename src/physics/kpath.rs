// src/physics/kpath.rs
use crate::model::Crystal;

#[derive(Debug, Clone)]
pub struct KPoint {
    pub label: String,
    pub coords: [f64; 3], // Reduced reciprocal coordinates
}

impl KPoint {
    pub fn new(label: &str, coords: [f64; 3]) -> Self {
        Self { label: label.to_string(), coords }
    }
}

/// Piecewise-linear path through labelled high-symmetry points.
#[derive(Debug, Clone, Default)]
pub struct KPath {
    pub points: Vec<KPoint>,
}

/// Sampled path: Cartesian k-points plus the cumulative distance of each one,
/// and the distance at which every vertex sits (for axis ticks).
#[derive(Debug, Clone, Default)]
pub struct SampledPath {
    pub kpoints: Vec<[f64; 3]>,
    pub distances: Vec<f64>,
    pub ticks: Vec<(String, f64)>,
}

impl KPath {
    pub fn new(points: Vec<KPoint>) -> Self {
        Self { points }
    }

    /// Γ-X for a chain.
    pub fn chain() -> Self {
        Self::new(vec![KPoint::new("Γ", [0.0, 0.0, 0.0]), KPoint::new("X", [0.5, 0.0, 0.0])])
    }

    /// Γ-X-M-Γ for a square lattice.
    pub fn square() -> Self {
        let g = KPoint::new("Γ", [0.0, 0.0, 0.0]);
        Self::new(vec![
            g.clone(),
            KPoint::new("X", [0.5, 0.0, 0.0]),
            KPoint::new("M", [0.5, 0.5, 0.0]),
            g,
        ])
    }

    /// Γ-M-K-Γ for a hexagonal lattice with a 120° angle between a1 and a2.
    pub fn hexagonal() -> Self {
        let g = KPoint::new("Γ", [0.0, 0.0, 0.0]);
        Self::new(vec![
            g.clone(),
            KPoint::new("M", [0.5, 0.0, 0.0]),
            KPoint::new("K", [1.0 / 3.0, 1.0 / 3.0, 0.0]),
            g,
        ])
    }

    /// "Γ-X-M-Γ"
    pub fn path_string(&self) -> String {
        self.points
            .iter()
            .map(|p| p.label.as_str())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Samples `points_per_segment` k-points per segment (the segment's end
    /// vertex belongs to the next one), closing with the last vertex.
    ///
    /// Returns None for an empty path or a degenerate lattice.
    pub fn sample(&self, crystal: &Crystal, points_per_segment: usize) -> Option<SampledPath> {
        let vertices: Vec<[f64; 3]> = self
            .points
            .iter()
            .map(|p| crystal.reduced_to_cartesian_k(p.coords))
            .collect::<Option<_>>()?;
        let last = *vertices.last()?;
        let steps = points_per_segment.max(1);

        let mut path = SampledPath::default();
        let mut travelled = 0.0;

        for (i, pair) in vertices.windows(2).enumerate() {
            let (start, end) = (pair[0], pair[1]);
            path.ticks.push((self.points[i].label.clone(), travelled));

            let delta = [end[0] - start[0], end[1] - start[1], end[2] - start[2]];
            let length = (delta[0].powi(2) + delta[1].powi(2) + delta[2].powi(2)).sqrt();

            for s in 0..steps {
                let t = s as f64 / steps as f64;
                path.kpoints.push([
                    start[0] + t * delta[0],
                    start[1] + t * delta[1],
                    start[2] + t * delta[2],
                ]);
                path.distances.push(travelled + t * length);
            }
            travelled += length;
        }

        if let Some(p) = self.points.last() {
            path.ticks.push((p.label.clone(), travelled));
        }
        path.kpoints.push(last);
        path.distances.push(travelled);

        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Atom;
    use std::f64::consts::PI;

    fn square_crystal() -> Crystal {
        Crystal::new(
            vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![Atom::new([0.0, 0.0, 0.0], 0)],
            vec![[0.0, 0.0, 0.0]],
        )
    }

    #[test]
    fn test_square_path_geometry() {
        let path = KPath::square().sample(&square_crystal(), 10).unwrap();

        // 3 segments x 10 points + closing vertex
        assert_eq!(path.kpoints.len(), 31);
        assert_eq!(path.distances.len(), 31);

        // X = (π, 0), M = (π, π)
        let x = path.kpoints[10];
        assert!((x[0] - PI).abs() < 1e-12 && x[1].abs() < 1e-12);
        let m = path.kpoints[20];
        assert!((m[0] - PI).abs() < 1e-12 && (m[1] - PI).abs() < 1e-12);

        // Γ-X + X-M + M-Γ = π + π + π√2
        let total = PI * (2.0 + 2f64.sqrt());
        assert!((path.distances[30] - total).abs() < 1e-10);
        assert!(path.distances.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_vertices_emitted_once() {
        let path = KPath::square().sample(&square_crystal(), 4).unwrap();
        let x = [PI, 0.0, 0.0];
        let hits = path
            .kpoints
            .iter()
            .filter(|k| (k[0] - x[0]).abs() < 1e-12 && (k[1] - x[1]).abs() < 1e-12)
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_ticks() {
        let path = KPath::square().sample(&square_crystal(), 5).unwrap();
        let labels: Vec<&str> = path.ticks.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Γ", "X", "M", "Γ"]);
        assert!((path.ticks[1].1 - PI).abs() < 1e-12);
        assert_eq!(KPath::square().path_string(), "Γ-X-M-Γ");
    }

    #[test]
    fn test_hexagonal_k_point() {
        let crystal = Crystal::new(
            vec![[1.0, 0.0, 0.0], [-0.5, 3f64.sqrt() / 2.0, 0.0]],
            vec![Atom::new([0.0, 0.0, 0.0], 0)],
            vec![[0.0, 0.0, 0.0]],
        );
        let path = KPath::hexagonal().sample(&crystal, 8).unwrap();
        // |K| = 4π / 3a
        let k = path.kpoints[16];
        let norm = (k[0].powi(2) + k[1].powi(2)).sqrt();
        assert!((norm - 4.0 * PI / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_path() {
        assert!(KPath::default().sample(&square_crystal(), 10).is_none());
        let single = KPath::new(vec![KPoint::new("Γ", [0.0; 3])]).sample(&square_crystal(), 10).unwrap();
        assert_eq!(single.kpoints.len(), 1);
        assert_eq!(single.ticks.len(), 1);
    }
}
