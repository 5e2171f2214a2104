//! Deterministic 2D structure layout.
//!
//! Ring systems are placed first as fused regular polygons, then acyclic
//! substituents walk outward in an alternating zigzag at standard bond
//! angles. The result depends only on the molecular graph: the same input
//! always lays out identically, which the depiction tests rely on.

use std::collections::{BTreeMap, VecDeque};
use std::f64::consts::PI;

use crate::rings::RingInfo;
use crate::types::conformer::Conformer;
use crate::types::molecule::Molecule;

/// Standard depiction bond length, in layout units.
pub const BOND_LENGTH: f64 = 1.5;

/// Closer than this counts as a collision during nudging.
const COLLISION_DISTANCE: f64 = 0.5;

/// Compute planar coordinates for every atom.
pub fn layout_2d(mol: &Molecule) -> Conformer {
    if mol.atom_count() == 0 {
        return Conformer::planar(Vec::new());
    }
    let rings = RingInfo::perceive(mol);
    let mut engine = Engine::new(mol, &rings);
    let mut cursor_x = 0.0;
    for component in mol.components() {
        engine.place_component(&component);
        cursor_x = engine.shift_component(&component, cursor_x);
    }
    engine.resolve_overlaps();
    Conformer::planar(engine.pos)
}

struct Engine<'a> {
    mol: &'a Molecule,
    rings: &'a RingInfo,
    pos: Vec<[f64; 2]>,
    placed: Vec<bool>,
    /// Direction of the bond that reached each atom.
    heading: Vec<f64>,
    /// Signed turn applied at the parent to reach each atom; children
    /// alternate its sign to produce the zigzag.
    turn: Vec<f64>,
    /// Fused-system id per atom, if any.
    system_of: Vec<Option<usize>>,
    system_done: Vec<bool>,
    system_centroid: Vec<[f64; 2]>,
}

impl<'a> Engine<'a> {
    fn new(mol: &'a Molecule, rings: &'a RingInfo) -> Self {
        let n = mol.atom_count();
        let systems = rings.fused_systems();
        let mut system_of = vec![None; n];
        for (sys_idx, ring_ids) in systems.iter().enumerate() {
            for &ring_id in ring_ids {
                for &atom in &rings.rings()[ring_id] {
                    system_of[atom] = Some(sys_idx);
                }
            }
        }
        Engine {
            mol,
            rings,
            pos: vec![[0.0, 0.0]; n],
            placed: vec![false; n],
            heading: vec![0.0; n],
            turn: vec![0.0; n],
            system_of,
            system_done: vec![false; systems.len()],
            system_centroid: vec![[0.0, 0.0]; systems.len()],
        }
    }

    fn place_component(&mut self, atoms: &[usize]) {
        let start = match atoms.iter().copied().min() {
            Some(a) => a,
            None => return,
        };
        let mut queue = VecDeque::new();
        match self.system_of[start] {
            Some(sys) => {
                for atom in self.place_system(sys, None) {
                    queue.push_back(atom);
                }
            }
            None => {
                self.placed[start] = true;
                self.heading[start] = -PI / 6.0;
                self.turn[start] = -PI / 3.0;
                queue.push_back(start);
            }
        }
        while let Some(current) = queue.pop_front() {
            for &(neighbor, _) in self.mol.neighbors(current) {
                if self.placed[neighbor] {
                    continue;
                }
                match self.system_of[neighbor] {
                    Some(sys) if !self.system_done[sys] => {
                        for atom in self.place_system(sys, Some((current, neighbor))) {
                            queue.push_back(atom);
                        }
                    }
                    _ => {
                        self.place_chain_atom(neighbor, current);
                        queue.push_back(neighbor);
                    }
                }
            }
        }
    }

    /// Lay out one fused ring system and translate it so `entry` lands at
    /// the position a chain child of `parent` would take. Returns the atoms
    /// placed by this call.
    fn place_system(&mut self, sys: usize, anchor: Option<(usize, usize)>) -> Vec<usize> {
        self.system_done[sys] = true;
        let local = self.system_local_layout(sys);
        let shift = match anchor {
            Some((parent, entry)) => {
                let target = self.next_child_position(parent);
                let at = local.get(&entry).copied().unwrap_or([0.0, 0.0]);
                [target[0] - at[0], target[1] - at[1]]
            }
            None => [0.0, 0.0],
        };
        let mut newly = Vec::with_capacity(local.len());
        let mut sum = [0.0, 0.0];
        let mut count = 0.0;
        for (&atom, &p) in &local {
            let world = [p[0] + shift[0], p[1] + shift[1]];
            if !self.placed[atom] {
                self.pos[atom] = world;
                self.placed[atom] = true;
                newly.push(atom);
            }
            sum[0] += world[0];
            sum[1] += world[1];
            count += 1.0;
        }
        if count > 0.0 {
            self.system_centroid[sys] = [sum[0] / count, sum[1] / count];
        }
        newly.sort_unstable();
        newly
    }

    /// Local coordinates for every atom of a fused system: first ring as a
    /// regular polygon at the origin, each further ring attached across a
    /// shared edge (or shared spiro atom) on the side away from what is
    /// already placed.
    fn system_local_layout(&self, sys: usize) -> BTreeMap<usize, [f64; 2]> {
        let ring_ids = &self.rings.fused_systems()[sys];
        let all_rings = self.rings.rings();
        let mut local: BTreeMap<usize, [f64; 2]> = BTreeMap::new();

        let first = &all_rings[ring_ids[0]];
        let m = first.len() as f64;
        let radius = BOND_LENGTH / (2.0 * (PI / m).sin());
        for (k, &atom) in first.iter().enumerate() {
            let angle = 2.0 * PI * k as f64 / m - PI / 2.0;
            local.insert(atom, [radius * angle.cos(), radius * angle.sin()]);
        }

        let mut pending: Vec<usize> = ring_ids[1..].to_vec();
        while !pending.is_empty() {
            let mut progressed = false;
            pending.retain(|&ring_id| {
                if attach_ring(&all_rings[ring_id], &mut local) {
                    progressed = true;
                    false
                } else {
                    true
                }
            });
            if !progressed {
                break;
            }
        }
        local
    }

    fn place_chain_atom(&mut self, atom: usize, parent: usize) {
        let (direction, applied_turn) = self.next_child_direction(parent);
        let origin = self.pos[parent];
        self.pos[atom] = [
            origin[0] + BOND_LENGTH * direction.cos(),
            origin[1] + BOND_LENGTH * direction.sin(),
        ];
        self.placed[atom] = true;
        self.heading[atom] = direction;
        self.turn[atom] = if applied_turn.abs() < 1e-9 {
            PI / 3.0
        } else {
            applied_turn
        };
    }

    fn next_child_position(&self, parent: usize) -> [f64; 2] {
        let (direction, _) = self.next_child_direction(parent);
        let origin = self.pos[parent];
        [
            origin[0] + BOND_LENGTH * direction.cos(),
            origin[1] + BOND_LENGTH * direction.sin(),
        ]
    }

    /// Direction for the next substituent of `parent`: radially outward
    /// from the ring centroid for ring atoms, alternating zigzag turns for
    /// chain atoms. Falls back across a candidate fan when the preferred
    /// slot is already occupied.
    fn next_child_direction(&self, parent: usize) -> (f64, f64) {
        let (base, candidates): (f64, &[f64]) = match self.system_of[parent] {
            Some(sys) => {
                let centroid = self.system_centroid[sys];
                let dx = self.pos[parent][0] - centroid[0];
                let dy = self.pos[parent][1] - centroid[1];
                let outward = if dx.abs() < 1e-9 && dy.abs() < 1e-9 {
                    0.0
                } else {
                    dy.atan2(dx)
                };
                const RING_FAN: [f64; 7] = [
                    0.0,
                    PI / 6.0,
                    -PI / 6.0,
                    PI / 3.0,
                    -PI / 3.0,
                    PI / 2.0,
                    -PI / 2.0,
                ];
                (outward, &RING_FAN)
            }
            None => {
                let preferred = -self.turn[parent];
                let fan: &[f64] = if preferred >= 0.0 {
                    const POS: [f64; 5] = [
                        PI / 3.0,
                        -PI / 3.0,
                        2.0 * PI / 3.0,
                        -2.0 * PI / 3.0,
                        0.0,
                    ];
                    &POS
                } else {
                    const NEG: [f64; 5] = [
                        -PI / 3.0,
                        PI / 3.0,
                        -2.0 * PI / 3.0,
                        2.0 * PI / 3.0,
                        0.0,
                    ];
                    &NEG
                };
                (self.heading[parent], fan)
            }
        };
        for &turn in candidates {
            let direction = base + turn;
            let target = [
                self.pos[parent][0] + BOND_LENGTH * direction.cos(),
                self.pos[parent][1] + BOND_LENGTH * direction.sin(),
            ];
            if self.is_free(target) {
                return (direction, turn);
            }
        }
        (base + candidates[0], candidates[0])
    }

    fn is_free(&self, target: [f64; 2]) -> bool {
        (0..self.pos.len()).all(|i| {
            if !self.placed[i] {
                return true;
            }
            let dx = self.pos[i][0] - target[0];
            let dy = self.pos[i][1] - target[1];
            dx * dx + dy * dy > 0.49 * BOND_LENGTH * BOND_LENGTH
        })
    }

    /// Move a finished component into its own horizontal band and return
    /// the cursor for the next one.
    fn shift_component(&mut self, atoms: &[usize], cursor_x: f64) -> f64 {
        let mut min = [f64::INFINITY, f64::INFINITY];
        let mut max_x = f64::NEG_INFINITY;
        for &a in atoms {
            min[0] = min[0].min(self.pos[a][0]);
            min[1] = min[1].min(self.pos[a][1]);
            max_x = max_x.max(self.pos[a][0]);
        }
        for &a in atoms {
            self.pos[a][0] += cursor_x - min[0];
            self.pos[a][1] -= min[1];
        }
        cursor_x + (max_x - min[0]) + 2.0 * BOND_LENGTH
    }

    /// Deterministic nudging: any pair closer than the collision distance
    /// pushes the higher-indexed atom along a golden-angle direction.
    fn resolve_overlaps(&mut self) {
        const GOLDEN_ANGLE: f64 = 2.399963229728653;
        for pass in 0..8 {
            let mut collided = false;
            for i in 0..self.pos.len() {
                for j in (i + 1)..self.pos.len() {
                    let dx = self.pos[i][0] - self.pos[j][0];
                    let dy = self.pos[i][1] - self.pos[j][1];
                    if dx * dx + dy * dy < COLLISION_DISTANCE * COLLISION_DISTANCE {
                        collided = true;
                        let angle = GOLDEN_ANGLE * (j as f64 + 1.0) + pass as f64;
                        self.pos[j][0] += 0.4 * angle.cos();
                        self.pos[j][1] += 0.4 * angle.sin();
                    }
                }
            }
            if !collided {
                break;
            }
        }
    }
}

/// Attach one ring to already-placed atoms: across a shared edge when two
/// consecutive ring atoms are placed, or pivoting on a single shared spiro
/// atom. Returns false when the ring touches nothing placed yet.
fn attach_ring(path: &[usize], local: &mut BTreeMap<usize, [f64; 2]>) -> bool {
    let m = path.len();
    let shared_edge = (0..m).find(|&i| {
        local.contains_key(&path[i]) && local.contains_key(&path[(i + 1) % m])
    });
    if let Some(i) = shared_edge {
        let rotated: Vec<usize> = (0..m).map(|k| path[(i + k) % m]).collect();
        let a = local[&rotated[0]];
        let b = local[&rotated[1]];
        let exterior = 2.0 * PI / m as f64;
        let placed_centroid = centroid_of(local);

        let mut best: Option<(f64, Vec<[f64; 2]>)> = None;
        for side in [1.0_f64, -1.0] {
            let mut walk = Vec::with_capacity(m - 2);
            let mut theta = (b[1] - a[1]).atan2(b[0] - a[0]);
            let mut cursor = b;
            for _ in 2..m {
                theta += side * exterior;
                cursor = [
                    cursor[0] + BOND_LENGTH * theta.cos(),
                    cursor[1] + BOND_LENGTH * theta.sin(),
                ];
                walk.push(cursor);
            }
            let cx: f64 = walk.iter().map(|p| p[0]).sum::<f64>() / walk.len().max(1) as f64;
            let cy: f64 = walk.iter().map(|p| p[1]).sum::<f64>() / walk.len().max(1) as f64;
            let dist = (cx - placed_centroid[0]).powi(2) + (cy - placed_centroid[1]).powi(2);
            if best.as_ref().map_or(true, |(d, _)| dist > *d) {
                best = Some((dist, walk));
            }
        }
        if let Some((_, walk)) = best {
            for (offset, &atom) in rotated[2..].iter().enumerate() {
                local.entry(atom).or_insert(walk[offset]);
            }
        }
        return true;
    }

    // Spiro attachment on a single shared atom.
    let pivot = (0..m).find(|&i| local.contains_key(&path[i]));
    if let Some(i) = pivot {
        let rotated: Vec<usize> = (0..m).map(|k| path[(i + k) % m]).collect();
        let at = local[&rotated[0]];
        let placed_centroid = centroid_of(local);
        let mut dir = [at[0] - placed_centroid[0], at[1] - placed_centroid[1]];
        let len = (dir[0] * dir[0] + dir[1] * dir[1]).sqrt();
        if len < 1e-9 {
            dir = [1.0, 0.0];
        } else {
            dir = [dir[0] / len, dir[1] / len];
        }
        let radius = BOND_LENGTH / (2.0 * (PI / m as f64).sin());
        let center = [at[0] + radius * dir[0], at[1] + radius * dir[1]];
        let phi0 = (at[1] - center[1]).atan2(at[0] - center[0]);
        for (k, &atom) in rotated.iter().enumerate().skip(1) {
            let angle = phi0 + 2.0 * PI * k as f64 / m as f64;
            local
                .entry(atom)
                .or_insert([center[0] + radius * angle.cos(), center[1] + radius * angle.sin()]);
        }
        return true;
    }
    false
}

fn centroid_of(local: &BTreeMap<usize, [f64; 2]>) -> [f64; 2] {
    if local.is_empty() {
        return [0.0, 0.0];
    }
    let n = local.len() as f64;
    let sx: f64 = local.values().map(|p| p[0]).sum();
    let sy: f64 = local.values().map(|p| p[1]).sum();
    [sx / n, sy / n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_smiles;
    use crate::types::conformer::Dimensionality;

    fn layout(smiles: &str) -> Conformer {
        layout_2d(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn empty_molecule_gets_empty_conformer() {
        let conf = layout_2d(&Molecule::new(Vec::new(), Vec::new()));
        assert!(conf.is_empty());
        assert_eq!(conf.kind(), Dimensionality::TwoD);
    }

    #[test]
    fn single_atom_sits_at_origin() {
        let conf = layout("C");
        assert_eq!(conf.len(), 1);
        let p = conf.position(0);
        assert!(p[0].abs() < 1e-9 && p[1].abs() < 1e-9);
    }

    #[test]
    fn bonds_come_out_at_standard_length() {
        let mol = parse_smiles("CCO").unwrap();
        let conf = layout_2d(&mol);
        for bond in mol.bonds() {
            let d = conf.distance(bond.atom1, bond.atom2);
            assert!((d - BOND_LENGTH).abs() < 1e-6, "bond length {d}");
        }
    }

    #[test]
    fn butane_zigzags() {
        let conf = layout("CCCC");
        // 1-3 distance of a 120 degree zigzag.
        let expected = 2.0 * BOND_LENGTH * (PI / 6.0).cos();
        assert!((conf.distance(0, 2) - expected).abs() < 1e-6);
        assert!((conf.distance(1, 3) - expected).abs() < 1e-6);
        // Not collinear: end-to-end shorter than the path length.
        assert!(conf.distance(0, 3) < 3.0 * BOND_LENGTH - 1e-6);
    }

    #[test]
    fn benzene_is_a_regular_hexagon() {
        let conf = layout("c1ccccc1");
        let center = conf.centroid();
        for i in 0..6 {
            let p = conf.position(i);
            let r = ((p[0] - center[0]).powi(2) + (p[1] - center[1]).powi(2)).sqrt();
            assert!((r - BOND_LENGTH).abs() < 1e-6, "hexagon radius {r}");
        }
        for i in 0..6 {
            let d = conf.distance(i, (i + 1) % 6);
            assert!((d - BOND_LENGTH).abs() < 1e-6);
        }
    }

    #[test]
    fn naphthalene_atoms_stay_apart() {
        let conf = layout("c1ccc2ccccc2c1");
        assert_eq!(conf.len(), 10);
        for i in 0..10 {
            for j in (i + 1)..10 {
                assert!(
                    conf.distance(i, j) > COLLISION_DISTANCE,
                    "atoms {i} and {j} collide"
                );
            }
        }
    }

    #[test]
    fn toluene_methyl_points_outward() {
        let mol = parse_smiles("Cc1ccccc1").unwrap();
        let conf = layout_2d(&mol);
        // Ring atoms are 1..=6; the methyl carbon is 0.
        let mut ring_center = [0.0, 0.0];
        for i in 1..7 {
            ring_center[0] += conf.position(i)[0] / 6.0;
            ring_center[1] += conf.position(i)[1] / 6.0;
        }
        let methyl = conf.position(0);
        let r = ((methyl[0] - ring_center[0]).powi(2) + (methyl[1] - ring_center[1]).powi(2))
            .sqrt();
        assert!(r > BOND_LENGTH + 0.5, "methyl radius {r}");
    }

    #[test]
    fn fragments_get_separate_bands() {
        let mol = parse_smiles("CCO.CN").unwrap();
        let conf = layout_2d(&mol);
        let max_first = (0..3).map(|i| conf.position(i)[0]).fold(f64::MIN, f64::max);
        let min_second = (3..5).map(|i| conf.position(i)[0]).fold(f64::MAX, f64::min);
        assert!(min_second > max_first + BOND_LENGTH);
    }

    #[test]
    fn no_two_atoms_coincide() {
        for smiles in ["CC(C)(C)C", "c1ccc2ccccc2c1", "CC1CCC(C(C)C)CC1", "C1CC2(CC1)CCC2"] {
            let mol = parse_smiles(smiles).unwrap();
            let conf = layout_2d(&mol);
            for i in 0..conf.len() {
                for j in (i + 1)..conf.len() {
                    assert!(
                        conf.distance(i, j) > 0.1,
                        "{smiles}: atoms {i} and {j} coincide"
                    );
                }
            }
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let first = layout("CC1=CC(=O)C=CC1=O");
        for _ in 0..100 {
            let again = layout("CC1=CC(=O)C=CC1=O");
            assert_eq!(first, again);
        }
    }
}
