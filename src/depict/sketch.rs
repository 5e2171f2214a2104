//! Sketch backend: thin monochrome strokes, dashed inner circles for
//! aromatic rings, and terminal carbons written out.

use std::fmt::Write as _;

use crate::error::ChemError;
use crate::types::bond::BondOrder;

use super::{
    atom_label, escape_xml, inner_segment, is_plain_carbon, line_el, offset_segment, trimmed,
    Palette, Renderer, Scene,
};

#[derive(Debug)]
pub struct SketchRenderer;

impl Renderer for SketchRenderer {
    fn name(&self) -> &'static str {
        "sketch"
    }

    fn render(&self, scene: &Scene<'_>, palette: &Palette) -> Result<String, ChemError> {
        let mol = scene.mol;
        let stroke = 1.2;
        let font = (0.36 * scene.bond_px).clamp(9.0, 20.0);
        let sep = 0.15 * scene.bond_px;

        // Terminal carbons are written out here, unlike the standard
        // backend, so a bare chain still reads as a formula sketch.
        let labeled: Vec<bool> = (0..mol.atoms().len())
            .map(|i| !is_plain_carbon(mol, i) || mol.degree(i) <= 1)
            .collect();
        let trim: Vec<f64> = labeled
            .iter()
            .map(|&shown| if shown { 0.28 * scene.bond_px } else { 0.0 })
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

        for (bond_idx, bond) in mol.bonds().iter().enumerate() {
            let a = scene.pos[bond.atom1];
            let b = scene.pos[bond.atom2];
            let (start, end) = trimmed(a, b, trim[bond.atom1], trim[bond.atom2]);
            match bond.order {
                // Aromatic perimeters stay single; the ring circle below
                // carries the aromaticity.
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
        }

        for path in scene.aromatic_rings() {
            let c = scene.ring_centroid(path);
            let mut mean_r = 0.0;
            for &atom in path {
                let dx = scene.pos[atom][0] - c[0];
                let dy = scene.pos[atom][1] - c[1];
                mean_r += (dx * dx + dy * dy).sqrt();
            }
            mean_r /= path.len().max(1) as f64;
            write!(
                svg,
                "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.1}\" stroke-dasharray=\"{:.1} {:.1}\" />\n",
                c[0],
                c[1],
                0.62 * mean_r,
                palette.foreground,
                stroke,
                0.09 * scene.bond_px,
                0.07 * scene.bond_px,
            )?;
        }

        // Monochrome labels; element colors belong to the standard backend.
        for idx in 0..mol.atoms().len() {
            if !labeled[idx] {
                continue;
            }
            let p = scene.pos[idx];
            write!(
                svg,
                "  <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{:.0}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
                p[0],
                p[1],
                palette.foreground,
                font,
                escape_xml(&atom_label(mol, idx))
            )?;
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}
