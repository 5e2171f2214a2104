//! Default backend: element-colored labels and a kekulized look for
//! aromatic rings.

use std::fmt::Write as _;

use crate::error::ChemError;
use crate::types::bond::BondOrder;
use crate::types::element;

use super::{
    atom_label, escape_xml, inner_segment, is_plain_carbon, line_el, offset_segment, trimmed,
    Palette, Renderer, Scene,
};

#[derive(Debug)]
pub struct StandardRenderer;

impl Renderer for StandardRenderer {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn render(&self, scene: &Scene<'_>, palette: &Palette) -> Result<String, ChemError> {
        let mol = scene.mol;
        let stroke = 2.0;
        let font = (0.42 * scene.bond_px).clamp(10.0, 24.0);
        let sep = 0.16 * scene.bond_px;

        // Plain chain carbons stay implicit; everything else gets a label,
        // and lines pull back from labeled ends so text stays readable.
        let labeled: Vec<bool> = (0..mol.atoms().len())
            .map(|i| !is_plain_carbon(mol, i) || mol.degree(i) == 0)
            .collect();
        let trim: Vec<f64> = labeled
            .iter()
            .map(|&shown| if shown { 0.30 * scene.bond_px } else { 0.0 })
            .collect();

        let mut svg = String::new();
        write!(
            svg,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\" font-family=\"Helvetica, Arial, sans-serif\">\n",
            scene.width, scene.height, scene.width, scene.height,
        )?;
        write!(
            svg,
            "  <rect width=\"100%\" height=\"100%\" fill=\"{}\" />\n",
            escape_xml(&palette.background)
        )?;

        let inner = kekulized_inner_bonds(scene);

        for (bond_idx, bond) in mol.bonds().iter().enumerate() {
            let a = scene.pos[bond.atom1];
            let b = scene.pos[bond.atom2];
            let (start, end) = trimmed(a, b, trim[bond.atom1], trim[bond.atom2]);
            match bond.order {
                BondOrder::Single | BondOrder::Aromatic => {
                    line_el(&mut svg, start, end, &palette.foreground, stroke)?;
                }
                BondOrder::Double if scene.rings.is_ring_bond(bond_idx) => {
                    line_el(&mut svg, start, end, &palette.foreground, stroke)?;
                    let (s, e) = inner_segment(scene, bond_idx, start, end, sep);
                    line_el(&mut svg, s, e, &palette.foreground, stroke)?;
                }
                BondOrder::Double => {
                    let (s, e) = offset_segment(start, end, 0.5 * sep);
                    line_el(&mut svg, s, e, &palette.foreground, stroke)?;
                    let (s, e) = offset_segment(start, end, -0.5 * sep);
                    line_el(&mut svg, s, e, &palette.foreground, stroke)?;
                }
                BondOrder::Triple => {
                    line_el(&mut svg, start, end, &palette.foreground, stroke)?;
                    let (s, e) = offset_segment(start, end, sep);
                    line_el(&mut svg, s, e, &palette.foreground, stroke)?;
                    let (s, e) = offset_segment(start, end, -sep);
                    line_el(&mut svg, s, e, &palette.foreground, stroke)?;
                }
            }
            if inner[bond_idx] {
                let (s, e) = inner_segment(scene, bond_idx, start, end, sep);
                line_el(&mut svg, s, e, &palette.foreground, stroke)?;
            }
        }

        for (idx, atom) in mol.atoms().iter().enumerate() {
            if !labeled[idx] {
                continue;
            }
            let color = palette.color_for(element::symbol(atom.atomic_number));
            let p = scene.pos[idx];
            write!(
                svg,
                "  <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{:.0}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
                p[0],
                p[1],
                color,
                font,
                escape_xml(&atom_label(mol, idx))
            )?;
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

/// Pick alternating aromatic ring bonds for a second inner line. Greedy
/// along each ring perimeter: a bond is chosen only when neither endpoint
/// is already consumed by a chosen bond, which yields the familiar
/// alternating pattern without a real kekulization pass.
fn kekulized_inner_bonds(scene: &Scene<'_>) -> Vec<bool> {
    let mol = scene.mol;
    let mut chosen = vec![false; mol.bonds().len()];
    let mut consumed = vec![false; mol.atoms().len()];
    for path in scene.aromatic_rings() {
        let m = path.len();
        for k in 0..m {
            let a = path[k];
            let b = path[(k + 1) % m];
            let Some(bond_idx) = mol.bond_between(a, b) else {
                continue;
            };
            if mol.bond(bond_idx).order != BondOrder::Aromatic {
                continue;
            }
            if chosen[bond_idx] || consumed[a] || consumed[b] {
                continue;
            }
            chosen[bond_idx] = true;
            consumed[a] = true;
            consumed[b] = true;
        }
    }
    chosen
}
