//! 3D embedding by distance geometry.
//!
//! The classic pipeline: build a distance-bounds matrix from covalent
//! geometry, smooth it with the triangle inequality, sample a metric
//! matrix with a seeded RNG, project to three dimensions by power
//! iteration, then clean up with capped force-field refinement.

use tracing::warn;

use crate::types::bond::BondOrder;
use crate::types::conformer::Conformer;
use crate::types::element;
use crate::types::molecule::Molecule;

use super::forcefield::{self, MinimizeOptions};

/// Seed applied when the caller does not configure one.
pub const DEFAULT_EMBED_SEED: u64 = 42;

/// Refinement step ceiling applied when the caller does not configure
/// one.
pub const DEFAULT_MAX_REFINE_STEPS: usize = 200;

/// Options for one embedding run.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    /// RNG seed; the same seed and molecule always give the same conformer.
    pub seed: u64,
    /// Refinement step ceiling. Zero skips refinement entirely.
    pub max_minimize_steps: usize,
    /// Gradient norm below which refinement stops.
    pub gradient_threshold: f64,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        EmbedOptions {
            seed: DEFAULT_EMBED_SEED,
            max_minimize_steps: DEFAULT_MAX_REFINE_STEPS,
            gradient_threshold: 0.5,
        }
    }
}

/// Bonded-distance window accepted by the sanity check.
const BOND_DISTANCE_MIN: f64 = 0.5;
const BOND_DISTANCE_MAX: f64 = 3.0;

/// Embed explicit-hydrogen 3D coordinates for a molecule.
///
/// Hydrogens are made explicit first; the returned molecule includes them
/// and the conformer indexes into it. Returns `None` when the final
/// geometry is not sane (non-finite coordinates or bonded atoms at an
/// implausible distance). Refinement that merely fails to converge inside
/// the step ceiling is absorbed, not a failure.
pub fn embed_3d(mol: &Molecule, options: &EmbedOptions) -> Option<(Molecule, Conformer)> {
    let expanded = mol.with_explicit_hydrogens();
    let n = expanded.atom_count();
    if n == 0 {
        return Some((expanded, Conformer::spatial(Vec::new())));
    }
    if n == 1 {
        return Some((expanded, Conformer::spatial(vec![[0.0, 0.0, 0.0]])));
    }

    let (lower, upper) = bounds_matrix(&expanded);
    let (lower, upper) = smooth_bounds(lower, upper, n);

    let mut rng = XorShift64::new(options.seed);
    let raw = conformer_from_bounds(&lower, &upper, n, &mut rng);

    let refined = if options.max_minimize_steps > 0 {
        let outcome = forcefield::minimize(
            &expanded,
            &raw,
            &MinimizeOptions {
                max_steps: options.max_minimize_steps,
                gradient_threshold: options.gradient_threshold,
            },
        );
        if !outcome.converged {
            warn!(
                steps = outcome.n_steps,
                final_energy = outcome.final_energy,
                "refinement hit the step ceiling; keeping best coordinates"
            );
        }
        outcome.conformer
    } else {
        raw
    };

    if !geometry_is_sane(&expanded, &refined) {
        return None;
    }
    Some((expanded, refined))
}

fn geometry_is_sane(mol: &Molecule, conf: &Conformer) -> bool {
    for p in conf.positions() {
        if !(p[0].is_finite() && p[1].is_finite() && p[2].is_finite()) {
            return false;
        }
    }
    mol.bonds().iter().all(|bond| {
        let d = conf.distance(bond.atom1, bond.atom2);
        (BOND_DISTANCE_MIN..=BOND_DISTANCE_MAX).contains(&d)
    })
}

// ---------------------------------------------------------------------------
// Bounds matrix
// ---------------------------------------------------------------------------

fn bounds_matrix(mol: &Molecule) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let n = mol.atom_count();
    let mut lower = vec![vec![0.0_f64; n]; n];
    let mut upper = vec![vec![1000.0_f64; n]; n];

    // 1-2: covalent radii plus a bond-order contraction.
    for bond in mol.bonds() {
        let (a, b) = (bond.atom1, bond.atom2);
        let contraction = match bond.order {
            BondOrder::Single => 0.0,
            BondOrder::Aromatic => -0.04,
            BondOrder::Double => -0.10,
            BondOrder::Triple => -0.16,
        };
        let d = element::covalent_radius(mol.atom(a).atomic_number)
            + element::covalent_radius(mol.atom(b).atomic_number)
            + contraction;
        let margin = 0.05;
        lower[a][b] = d - margin;
        lower[b][a] = d - margin;
        upper[a][b] = d + margin;
        upper[b][a] = d + margin;
    }

    // 1-3: law of cosines through an angle estimated from the center
    // atom's degree and bond orders.
    for center in 0..n {
        let neighbors = mol.neighbors(center);
        if neighbors.len() < 2 {
            continue;
        }
        let angle = match neighbors.len() {
            2 => {
                let cumulated = neighbors.iter().any(|&(_, bi)| {
                    matches!(mol.bond(bi).order, BondOrder::Double | BondOrder::Triple)
                });
                if cumulated {
                    std::f64::consts::PI
                } else {
                    120.0_f64.to_radians()
                }
            }
            3 => {
                if is_sp2(mol, center) {
                    120.0_f64.to_radians()
                } else {
                    109.5_f64.to_radians()
                }
            }
            _ => 109.5_f64.to_radians(),
        };
        for a in 0..neighbors.len() {
            for b in (a + 1)..neighbors.len() {
                let i = neighbors[a].0;
                let k = neighbors[b].0;
                let d_ij = (lower[i][center] + upper[i][center]) / 2.0;
                let d_jk = (lower[center][k] + upper[center][k]) / 2.0;
                if d_ij < 0.01 || d_jk < 0.01 {
                    continue;
                }
                let d13 =
                    (d_ij * d_ij + d_jk * d_jk - 2.0 * d_ij * d_jk * angle.cos()).sqrt();
                let margin = 0.15;
                let new_lower = (d13 - margin).max(lower[i][k]);
                let new_upper = (d13 + margin).min(upper[i][k]);
                lower[i][k] = new_lower;
                lower[k][i] = new_lower;
                upper[i][k] = new_upper;
                upper[k][i] = new_upper;
            }
        }
    }

    // Everything else: keep non-bonded atoms apart at a fraction of the
    // van der Waals contact distance.
    for i in 0..n {
        for j in (i + 1)..n {
            if lower[i][j] < 0.01 {
                let contact = element::vdw_radius(mol.atom(i).atomic_number)
                    + element::vdw_radius(mol.atom(j).atomic_number);
                lower[i][j] = contact * 0.7;
                lower[j][i] = lower[i][j];
            }
        }
    }

    (lower, upper)
}

fn is_sp2(mol: &Molecule, idx: usize) -> bool {
    if mol.atom(idx).is_aromatic {
        return true;
    }
    mol.neighbors(idx).iter().any(|&(_, bi)| {
        matches!(
            mol.bond(bi).order,
            BondOrder::Double | BondOrder::Aromatic
        )
    })
}

/// Floyd-Warshall triangle smoothing over the bounds.
fn smooth_bounds(
    mut lower: Vec<Vec<f64>>,
    mut upper: Vec<Vec<f64>>,
    n: usize,
) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if i == j || i == k || j == k {
                    continue;
                }
                let through = upper[i][k] + upper[k][j];
                if through < upper[i][j] {
                    upper[i][j] = through;
                }
            }
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if i == j || i == k || j == k {
                    continue;
                }
                let floor = lower[i][k] - upper[k][j];
                if floor > lower[i][j] {
                    lower[i][j] = floor;
                }
            }
        }
    }
    for i in 0..n {
        for j in 0..n {
            if lower[i][j] > upper[i][j] {
                let mid = (lower[i][j] + upper[i][j]) / 2.0;
                lower[i][j] = mid;
                upper[i][j] = mid;
            }
            if lower[i][j] < 0.0 {
                lower[i][j] = 0.0;
            }
        }
    }
    (lower, upper)
}

// ---------------------------------------------------------------------------
// Metric-matrix projection
// ---------------------------------------------------------------------------

fn conformer_from_bounds(
    lower: &[Vec<f64>],
    upper: &[Vec<f64>],
    n: usize,
    rng: &mut XorShift64,
) -> Conformer {
    // Sample one distance per pair inside its bounds.
    let mut dist = vec![vec![0.0_f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let lo = lower[i][j].max(0.001);
            let hi = upper[i][j].max(lo + 0.001);
            let d = lo + rng.next_f64() * (hi - lo);
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }

    // Metric matrix relative to atom 0.
    let mut metric = vec![vec![0.0_f64; n]; n];
    for i in 0..n {
        for j in 0..n {
            metric[i][j] = 0.5
                * (dist[0][i] * dist[0][i] + dist[0][j] * dist[0][j]
                    - dist[i][j] * dist[i][j]);
        }
    }

    Conformer::spatial(project_to_3d(&metric, n))
}

/// Top three eigenpairs by power iteration with deflation; coordinates are
/// eigenvectors scaled by the square root of their eigenvalues.
fn project_to_3d(metric: &[Vec<f64>], n: usize) -> Vec<[f64; 3]> {
    let mut coords = vec![[0.0_f64; 3]; n];
    let mut deflated: Vec<Vec<f64>> = metric.to_vec();

    for dim in 0..3 {
        let mut v = vec![1.0_f64 / (n as f64).sqrt(); n];
        let mut eigenvalue = 0.0_f64;

        for _ in 0..100 {
            let mut mv = vec![0.0_f64; n];
            for i in 0..n {
                for j in 0..n {
                    mv[i] += deflated[i][j] * v[j];
                }
            }
            eigenvalue = mv.iter().zip(&v).map(|(a, b)| a * b).sum();
            let norm: f64 = mv.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm < 1e-15 {
                break;
            }
            for i in 0..n {
                v[i] = mv[i] / norm;
            }
        }

        let scale = if eigenvalue > 0.0 {
            eigenvalue.sqrt()
        } else {
            0.0
        };
        for i in 0..n {
            coords[i][dim] = v[i] * scale;
        }
        for i in 0..n {
            for j in 0..n {
                deflated[i][j] -= eigenvalue * v[i] * v[j];
            }
        }
    }
    coords
}

// ---------------------------------------------------------------------------
// Seeded RNG (xorshift64)
// ---------------------------------------------------------------------------

struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        XorShift64 {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
