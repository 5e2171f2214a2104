//! SVG depiction of 2D structures.
//!
//! [`depict`] lays the molecule out, rotates and fits it into the requested
//! canvas, then hands the positioned scene to one of two [`Renderer`]
//! backends. `standard` draws element-colored labels with kekulized-style
//! aromatic bonds; `sketch` draws thin monochrome strokes with inner
//! aromatic circles. Both emit plain SVG text, byte-identical for the same
//! input and options.

mod sketch;
mod standard;

pub use sketch::SketchRenderer;
pub use standard::StandardRenderer;

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::coords::{layout_2d, BOND_LENGTH};
use crate::error::ChemError;
use crate::rings::RingInfo;
use crate::types::conformer::Conformer;
use crate::types::element;
use crate::types::molecule::Molecule;

/// Version tag for the default color table.
pub const PALETTE_VERSION: &str = "palette/1";

/// Rendering options shared by every backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepictionOptions {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Clockwise rotation in degrees, normalized into [0, 360).
    pub rotate: f64,
    /// Restrict the palette to foreground on background.
    pub unicolor: bool,
    /// Backend name; see [`backend_by_name`].
    pub backend: String,
}

impl Default for DepictionOptions {
    fn default() -> Self {
        DepictionOptions {
            width: 512.0,
            height: 512.0,
            rotate: 0.0,
            unicolor: false,
            backend: "standard".to_string(),
        }
    }
}

/// A finished SVG depiction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument(String);

impl SvgDocument {
    /// MIME type for HTTP responses.
    pub const CONTENT_TYPE: &'static str = "image/svg+xml";

    /// The SVG text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw SVG text.
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Color table used by the backends.
///
/// The table is a versioned value: [`Palette::fingerprint`] hashes the
/// canonical serialization so logs and clients can pin the exact colors a
/// depiction was produced with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    /// Version tag, included in the fingerprint.
    pub version: String,
    /// Canvas fill.
    pub background: String,
    /// Stroke and label color for carbon and unlisted elements.
    pub foreground: String,
    /// Per-element label colors, keyed by symbol.
    pub elements: BTreeMap<String, String>,
}

impl Default for Palette {
    fn default() -> Self {
        let mut elements = BTreeMap::new();
        for (symbol, color) in [
            ("N", "#3050f8"),
            ("O", "#e00d0d"),
            ("S", "#b09a00"),
            ("P", "#ff8000"),
            ("F", "#4f9e0f"),
            ("Cl", "#1fa01f"),
            ("Br", "#a62929"),
            ("I", "#940094"),
            ("B", "#b5651d"),
        ] {
            elements.insert(symbol.to_string(), color.to_string());
        }
        Palette {
            version: PALETTE_VERSION.to_string(),
            background: "#ffffff".to_string(),
            foreground: "#000000".to_string(),
            elements,
        }
    }
}

impl Palette {
    /// `version:hash` fingerprint over the canonical serialization.
    pub fn fingerprint(&self) -> String {
        crate::canonical::table_fingerprint(&self.version, self)
    }

    /// Label color for an element symbol.
    pub fn color_for(&self, symbol: &str) -> &str {
        self.elements
            .get(symbol)
            .map(String::as_str)
            .unwrap_or(&self.foreground)
    }

    /// Collapse to foreground-on-background only.
    pub fn unicolor(mut self) -> Palette {
        self.elements.clear();
        self
    }
}

/// A positioned molecule ready to draw: canvas-space coordinates plus the
/// ring perception both backends consult.
pub struct Scene<'a> {
    pub mol: &'a Molecule,
    pub rings: RingInfo,
    /// Atom positions in canvas space, y growing downward.
    pub pos: Vec<[f64; 2]>,
    pub width: f64,
    pub height: f64,
    /// Pixel length of a standard bond after fitting.
    pub bond_px: f64,
}

impl<'a> Scene<'a> {
    /// Center the plane in the canvas, scaled to fit with a margin.
    fn fit(mol: &'a Molecule, plane: &Conformer, options: &DepictionOptions) -> Scene<'a> {
        let margin = 0.08 * options.width.min(options.height);
        let usable_w = (options.width - 2.0 * margin).max(1.0);
        let usable_h = (options.height - 2.0 * margin).max(1.0);

        let (min, max) = plane.bounds_2d();
        let (span_x, span_y, center) = if plane.is_empty() {
            (0.0, 0.0, [0.0, 0.0])
        } else {
            (
                max[0] - min[0],
                max[1] - min[1],
                [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0],
            )
        };

        // Cap the scale so lone atoms and tiny fragments do not blow up.
        let max_scale = 42.0;
        let scale_x = if span_x > 1e-9 { usable_w / span_x } else { max_scale };
        let scale_y = if span_y > 1e-9 { usable_h / span_y } else { max_scale };
        let scale = scale_x.min(scale_y).min(max_scale);

        let mut pos = Vec::with_capacity(plane.len());
        for i in 0..plane.len() {
            let p = plane.position(i);
            pos.push([
                options.width / 2.0 + (p[0] - center[0]) * scale,
                options.height / 2.0 - (p[1] - center[1]) * scale,
            ]);
        }

        Scene {
            mol,
            rings: RingInfo::perceive(mol),
            pos,
            width: options.width,
            height: options.height,
            bond_px: BOND_LENGTH * scale,
        }
    }

    /// Rings whose atoms and bonds are all aromatic, as perimeter paths.
    pub fn aromatic_rings(&self) -> Vec<&[usize]> {
        self.rings
            .rings()
            .iter()
            .enumerate()
            .filter(|(idx, path)| {
                path.iter().all(|&a| self.mol.atom(a).is_aromatic)
                    && self
                        .rings
                        .ring_bonds(*idx)
                        .iter()
                        .all(|&b| self.mol.bond(b).is_aromatic)
            })
            .map(|(_, path)| path.as_slice())
            .collect()
    }

    /// Perimeter path of the smallest ring containing a bond.
    pub fn ring_with_bond(&self, bond_idx: usize) -> Option<&[usize]> {
        (0..self.rings.ring_count())
            .filter(|&r| self.rings.ring_bonds(r).contains(&bond_idx))
            .min_by_key(|&r| self.rings.rings()[r].len())
            .map(|r| self.rings.rings()[r].as_slice())
    }

    /// Centroid of a ring path in canvas space.
    pub fn ring_centroid(&self, path: &[usize]) -> [f64; 2] {
        let mut c = [0.0, 0.0];
        for &a in path {
            c[0] += self.pos[a][0];
            c[1] += self.pos[a][1];
        }
        let n = path.len().max(1) as f64;
        [c[0] / n, c[1] / n]
    }
}

/// Stateless SVG backend, selected by name per request.
pub trait Renderer: Send + Sync + std::fmt::Debug {
    /// Name used by the backend selector.
    fn name(&self) -> &'static str;

    /// Draw the scene into SVG text.
    fn render(&self, scene: &Scene<'_>, palette: &Palette) -> Result<String, ChemError>;
}

static STANDARD: StandardRenderer = StandardRenderer;
static SKETCH: SketchRenderer = SketchRenderer;

/// Resolve a backend by name.
pub fn backend_by_name(name: &str) -> Result<&'static dyn Renderer, ChemError> {
    match name {
        "standard" => Ok(&STANDARD),
        "sketch" => Ok(&SKETCH),
        other => Err(ChemError::UnsupportedOption(format!(
            "unknown depiction backend '{other}', expected 'standard' or 'sketch'"
        ))),
    }
}

/// Lay out and render a molecule.
pub fn depict(mol: &Molecule, options: &DepictionOptions) -> Result<SvgDocument, ChemError> {
    let plane = layout_2d(mol);
    depict_with_layout(mol, &plane, options)
}

/// Render a molecule from an existing planar coordinate set.
pub fn depict_with_layout(
    mol: &Molecule,
    plane: &Conformer,
    options: &DepictionOptions,
) -> Result<SvgDocument, ChemError> {
    if options.width <= 0.0 || options.height <= 0.0 {
        return Err(ChemError::UnsupportedOption(format!(
            "canvas dimensions must be positive, got {}x{}",
            options.width, options.height
        )));
    }
    if plane.len() != mol.atoms().len() {
        return Err(ChemError::Render(format!(
            "coordinate set has {} positions for {} atoms",
            plane.len(),
            mol.atoms().len()
        )));
    }
    let backend = backend_by_name(&options.backend)?;

    let rotated = plane.rotated_2d(options.rotate);
    let scene = Scene::fit(mol, &rotated, options);

    let palette = if options.unicolor {
        Palette::default().unicolor()
    } else {
        Palette::default()
    };

    backend.render(&scene, &palette).map(SvgDocument)
}

/// Label text for an atom: optional isotope, symbol, hydrogen count, charge.
pub(crate) fn atom_label(mol: &Molecule, idx: usize) -> String {
    let atom = mol.atom(idx);
    let mut label = String::new();
    if let Some(mass) = atom.isotope {
        label.push_str(&mass.to_string());
    }
    label.push_str(element::symbol(atom.atomic_number));
    match atom.implicit_hydrogens {
        0 => {}
        1 => label.push('H'),
        h => {
            label.push('H');
            label.push_str(&h.to_string());
        }
    }
    match atom.formal_charge {
        0 => {}
        1 => label.push('+'),
        -1 => label.push('-'),
        c if c > 1 => label.push_str(&format!("{c}+")),
        c => label.push_str(&format!("{}-", -(c as i16))),
    }
    label
}

/// Whether an atom carries anything worth labeling besides plain carbon.
pub(crate) fn is_plain_carbon(mol: &Molecule, idx: usize) -> bool {
    let atom = mol.atom(idx);
    atom.atomic_number == 6 && atom.formal_charge == 0 && atom.isotope.is_none()
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shorten a segment at either end, keeping at least 30% of its length.
pub(crate) fn trimmed(
    a: [f64; 2],
    b: [f64; 2],
    trim_a: f64,
    trim_b: f64,
) -> ([f64; 2], [f64; 2]) {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-9 {
        return (a, b);
    }
    let ux = dx / len;
    let uy = dy / len;
    let ta = trim_a.min(0.35 * len);
    let tb = trim_b.min(0.35 * len);
    (
        [a[0] + ux * ta, a[1] + uy * ta],
        [b[0] - ux * tb, b[1] - uy * tb],
    )
}

/// Unit perpendicular of a segment, or zero when degenerate.
pub(crate) fn perpendicular(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-9 {
        return [0.0, 0.0];
    }
    [-dy / len, dx / len]
}

/// Shift both endpoints sideways by `offset` along the perpendicular.
pub(crate) fn offset_segment(a: [f64; 2], b: [f64; 2], offset: f64) -> ([f64; 2], [f64; 2]) {
    let p = perpendicular(a, b);
    (
        [a[0] + p[0] * offset, a[1] + p[1] * offset],
        [b[0] + p[0] * offset, b[1] + p[1] * offset],
    )
}

/// Write one `<line>` element.
pub(crate) fn line_el(
    svg: &mut String,
    a: [f64; 2],
    b: [f64; 2],
    color: &str,
    width: f64,
) -> Result<(), ChemError> {
    write!(
        svg,
        "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{:.1}\" stroke-linecap=\"round\" />\n",
        a[0], a[1], b[0], b[1], color, width,
    )?;
    Ok(())
}

/// Second line of a ring double or kekulized aromatic bond: offset toward
/// the ring interior and shortened at both ends.
pub(crate) fn inner_segment(
    scene: &Scene<'_>,
    bond_idx: usize,
    start: [f64; 2],
    end: [f64; 2],
    sep: f64,
) -> ([f64; 2], [f64; 2]) {
    let p = perpendicular(start, end);
    let sign = match scene.ring_with_bond(bond_idx) {
        Some(path) => {
            let c = scene.ring_centroid(path);
            let mid = [(start[0] + end[0]) / 2.0, (start[1] + end[1]) / 2.0];
            let to_center = [c[0] - mid[0], c[1] - mid[1]];
            if p[0] * to_center[0] + p[1] * to_center[1] >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        None => 1.0,
    };
    let (s, e) = offset_segment(start, end, sign * sep);
    let dx = e[0] - s[0];
    let dy = e[1] - s[1];
    let len = (dx * dx + dy * dy).sqrt();
    trimmed(s, e, 0.15 * len, 0.15 * len)
}
