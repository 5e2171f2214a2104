//! Golden tests for the structure pipeline.
//!
//! These tests verify determinism and correctness of canonicalization,
//! descriptors, and structure conversion end to end.

use structure_pipeline::{
    canonicalize, classify_sugars, depict, describe, embed_3d, enumerate_stereoisomers,
    generate_structures, layout_2d, parse_molblock, parse_smiles, remove_sugars, standardize,
    write_canonical_smiles, write_molblock, CanonicalForm, DepictionOptions, EmbedOptions,
    MolecularFormula, Molecule, StructurePipeline, SugarRemovalMode,
};

/// Two spellings of caffeine that must collapse to one canonical form.
const CAFFEINE: &str = "CN1C=NC2=C1C(=O)N(C)C(=O)N2C";
const CAFFEINE_ALT: &str = "CN1C(=O)C2=C(N=CN2C)N(C)C1=O";

const GLUCOSE: &str = "OCC1OC(O)C(O)C(O)C1O";
const PHENYL_GLUCOSIDE: &str = "OCC1OC(Oc2ccccc2)C(O)C(O)C1O";

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn mol(smiles: &str) -> Molecule {
    parse_smiles(smiles).unwrap()
}

fn canon(smiles: &str) -> String {
    write_canonical_smiles(&mol(smiles))
}

fn bundle(smiles: &str) -> CanonicalForm {
    canonicalize(&mol(smiles)).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// DETERMINISM TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_same_structure_same_identifier_key_100_runs() {
    let mut keys: Vec<String> = Vec::with_capacity(100);

    for _ in 0..100 {
        keys.push(bundle(CAFFEINE).identifier_key);
    }

    // All keys must be identical
    for i in 1..100 {
        assert_eq!(
            keys[0], keys[i],
            "Identifier key must be deterministic (run {} differs from run 0)",
            i
        );
    }

    eprintln!("Deterministic identifier key: {}", keys[0]);
}

#[test]
fn test_equivalent_spellings_share_one_bundle() {
    let a = bundle(CAFFEINE);
    let b = bundle(CAFFEINE_ALT);

    // Same molecule, same bundle, byte for byte
    assert_eq!(a, b, "Caffeine spellings must canonicalize identically");

    assert_eq!(canon("CCO"), canon("OCC"));
    assert_eq!(canon("CCO"), canon("C(O)C"));
    assert_eq!(canon("Oc1ccccc1"), canon("c1ccccc1O"));
}

#[test]
fn test_canonical_smiles_is_idempotent() {
    let inputs = [
        CAFFEINE,
        GLUCOSE,
        PHENYL_GLUCOSIDE,
        "CC(C)c1ccccc1",
        "C/C=C/C",
        "C[C@@H](N)C(=O)O",
    ];
    for smiles in inputs {
        let once = canon(smiles);
        let twice = write_canonical_smiles(&parse_smiles(&once).unwrap());
        assert_eq!(once, twice, "Canonical drift on {}", smiles);
    }
}

#[test]
fn test_conformer_byte_determinism_100_runs() {
    let ethanol = mol("CCO");
    let options = EmbedOptions::default();

    let mut blocks: Vec<String> = Vec::with_capacity(100);

    for _ in 0..100 {
        let (expanded, conformer) = embed_3d(&ethanol, &options).unwrap();
        blocks.push(write_molblock(&expanded, &conformer));
    }

    for i in 1..100 {
        assert_eq!(
            blocks[0], blocks[i],
            "Conformer must be byte-level deterministic (run {} differs from run 0)",
            i
        );
    }
}

#[test]
fn test_seed_change_changes_conformer() {
    let caffeine = mol(CAFFEINE);
    let reseeded = EmbedOptions {
        seed: 7,
        ..EmbedOptions::default()
    };

    let (base_mol, base_conf) = embed_3d(&caffeine, &EmbedOptions::default()).unwrap();
    let (other_mol, other_conf) = embed_3d(&caffeine, &reseeded).unwrap();

    assert_ne!(
        write_molblock(&base_mol, &base_conf),
        write_molblock(&other_mol, &other_conf),
        "Different seeds must produce different geometry"
    );
}

#[test]
fn test_descriptors_are_input_order_invariant() {
    // Both spellings parse to the same graph under different atom numbering.
    let a = describe(&mol(CAFFEINE));
    let b = describe(&mol(CAFFEINE_ALT));
    assert_eq!(a, b, "Descriptors must not depend on input atom order");
}

// ─────────────────────────────────────────────────────────────────────────────
// CANONICALIZATION TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_identifier_key_shape() {
    let key = bundle(CAFFEINE).identifier_key;

    let parts: Vec<&str> = key.split('-').collect();
    assert_eq!(parts.len(), 3, "Key must have three blocks: {}", key);
    assert_eq!(parts[0].len(), 14);
    assert_eq!(parts[1].len(), 10);
    assert_eq!(parts[2].len(), 1);
    assert!(
        key.chars().all(|c| c == '-' || c.is_ascii_uppercase()),
        "Key must be uppercase letters and dashes: {}",
        key
    );
}

#[test]
fn test_distinct_structures_get_distinct_keys() {
    assert_ne!(bundle("CCO").identifier_key, bundle("CCN").identifier_key);
    assert_ne!(
        bundle(CAFFEINE).identifier_key,
        bundle(GLUCOSE).identifier_key
    );
}

#[test]
fn test_bundle_molblock_reparses_to_the_same_structure() {
    for smiles in ["CCO", CAFFEINE, PHENYL_GLUCOSIDE] {
        let form = bundle(smiles);
        let (reparsed, _) = parse_molblock(&form.molblock).unwrap();
        assert_eq!(
            write_canonical_smiles(&reparsed),
            form.canonical_smiles,
            "Molblock disagrees with canonical SMILES for {}",
            smiles
        );
    }
}

#[test]
fn test_scaffold_strips_side_chains() {
    let ethylbenzene = bundle("CCc1ccccc1CC");
    assert_eq!(
        ethylbenzene.scaffold_smiles.as_deref(),
        Some(canon("c1ccccc1").as_str())
    );

    // Acyclic molecules have no scaffold at all.
    assert_eq!(bundle("CCO").scaffold_smiles, None);

    // Fused ring systems survive as one scaffold.
    assert!(bundle(CAFFEINE).scaffold_smiles.is_some());
}

#[test]
fn test_standardization_cleans_salts_and_charges() {
    let desalted = standardize(&mol("[Na+].CC(=O)[O-]"));
    assert_eq!(desalted.net_charge(), 0);

    assert_eq!(
        write_canonical_smiles(&standardize(&mol("O.CCO"))),
        canon("CCO")
    );
    assert_eq!(
        write_canonical_smiles(&standardize(&mol("CC[O-]"))),
        canon("CCO")
    );
    assert_eq!(
        write_canonical_smiles(&standardize(&mol("CC(O)=C"))),
        canon("CC(=O)C")
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// DESCRIPTOR TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ethanol_descriptor_anchors() {
    let d = describe(&mol("CCO"));
    assert_eq!(d.atom_count, 9);
    assert_eq!(d.heavy_atom_count, 3);
    assert_eq!(d.molecular_weight, 46.07);
    assert_eq!(d.exact_molecular_weight, 46.04);
    assert_eq!(d.topological_polar_surface_area, 20.23);
    assert_eq!(d.hydrogen_bond_donors, 1);
    assert_eq!(d.hydrogen_bond_acceptors, 1);
    assert_eq!(d.lipinski_violations, 0);
    assert_eq!(d.ring_count, 0);
}

#[test]
fn test_caffeine_descriptor_anchors() {
    let d = describe(&mol(CAFFEINE));
    assert_eq!(d.heavy_atom_count, 14);
    assert_eq!(d.atom_count, 24);
    assert_eq!(d.molecular_weight, 194.19);
    assert_eq!(d.ring_count, 2);
    assert_eq!(d.hydrogen_bond_donors, 0);
    assert_eq!(d.lipinski_violations, 0);
    assert_eq!(d.formal_charge, 0);
}

#[test]
fn test_descriptor_json_field_order() {
    let d = describe(&mol("CCO"));
    let json = serde_json::to_string(&d).unwrap();

    // Wire order is part of the contract; spot-check the ends.
    assert!(json.starts_with("{\"atom_count\":"));
    let weight_pos = json.find("\"molecular_weight\"").unwrap();
    let qed_pos = json.find("\"qed_weighted\"").unwrap();
    let ring_pos = json.find("\"ring_count\"").unwrap();
    assert!(weight_pos < qed_pos && qed_pos < ring_pos);
}

// ─────────────────────────────────────────────────────────────────────────────
// SUGAR TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sugar_classification_messages() {
    assert_eq!(
        classify_sugars(&mol(GLUCOSE)).message(),
        "The molecule contains only Circular sugar"
    );
    assert_eq!(
        classify_sugars(&mol("OCC(O)C(O)C(O)C(O)CO")).message(),
        "The molecule contains only Linear sugar"
    );
    assert_eq!(
        classify_sugars(&mol("CCO")).message(),
        "The molecule contains no sugar"
    );
}

#[test]
fn test_deglycosylation_keeps_the_aglycone() {
    let removed = remove_sugars(&mol(PHENYL_GLUCOSIDE), SugarRemovalMode::Circular)
        .unwrap()
        .unwrap();
    assert_eq!(write_canonical_smiles(&removed), canon("c1ccccc1"));
}

#[test]
fn test_whole_molecule_sugar_vanishes() {
    assert!(remove_sugars(&mol(GLUCOSE), SugarRemovalMode::Both)
        .unwrap()
        .is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// STEREOISOMER TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_butene_expands_to_both_geometries() {
    let isomers = enumerate_stereoisomers(&mol("CC=CC"), 10);
    assert_eq!(isomers.len(), 2);

    // Output is sorted and distinct
    for pair in isomers.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_two_centers_expand_to_four() {
    assert_eq!(enumerate_stereoisomers(&mol("CC(O)C(Br)CC"), 10).len(), 4);
}

#[test]
fn test_center_ceiling_caps_expansion() {
    assert_eq!(enumerate_stereoisomers(&mol("CC(O)C(Br)CC"), 1).len(), 2);
}

#[test]
fn test_assigned_stereo_is_preserved() {
    let out = enumerate_stereoisomers(&mol("C/C=C/C"), 10);
    assert_eq!(out, vec![canon("C/C=C/C")]);
}

// ─────────────────────────────────────────────────────────────────────────────
// GENERATION TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_butane_formula_generates_both_isomers() {
    let formula: MolecularFormula = "C4H10".parse().unwrap();
    let out = generate_structures(&formula, 10).unwrap();
    assert_eq!(out, vec!["CC(C)C".to_string(), "CCCC".to_string()]);
}

#[test]
fn test_generated_structures_are_canonical() {
    let formula: MolecularFormula = "C2H6O".parse().unwrap();
    for smiles in generate_structures(&formula, 10).unwrap() {
        assert_eq!(canon(&smiles), smiles, "Non-canonical member {}", smiles);
    }
}

#[test]
fn test_impossible_formula_generates_nothing() {
    let formula: MolecularFormula = "C2H8".parse().unwrap();
    assert!(generate_structures(&formula, 10).unwrap().is_empty());
}

#[test]
fn test_generation_is_deterministic() {
    let formula: MolecularFormula = "C4H8".parse().unwrap();
    let first = generate_structures(&formula, 10).unwrap();
    for _ in 0..10 {
        assert_eq!(generate_structures(&formula, 10).unwrap(), first);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DEPICTION TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_backends_draw_the_same_molecule_differently() {
    let pyridine = mol("c1ccncc1");
    let standard = depict(&pyridine, &DepictionOptions::default()).unwrap();
    let sketch_options = DepictionOptions {
        backend: "sketch".to_string(),
        ..DepictionOptions::default()
    };
    let sketch = depict(&pyridine, &sketch_options).unwrap();

    assert_ne!(standard, sketch, "Backends must not share output");

    // Both stay well-formed SVG on the same canvas.
    for svg in [standard.as_str(), sketch.as_str()] {
        assert!(svg.starts_with("<?xml version=\"1.0\""));
        assert!(svg.contains("viewBox=\"0 0 512 512\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}

#[test]
fn test_depiction_and_layout_agree_on_determinism() {
    let aspirin = mol("CC(=O)Oc1ccccc1C(=O)O");
    let first = depict(&aspirin, &DepictionOptions::default()).unwrap();
    for _ in 0..10 {
        assert_eq!(depict(&aspirin, &DepictionOptions::default()).unwrap(), first);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PIPELINE FACADE TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_pipeline_standardises_either_encoding() {
    let pipeline = StructurePipeline::default();
    let source = mol("CCO");
    let block = write_molblock(&source, &layout_2d(&source));

    let out = pipeline.standardise(&block).unwrap();
    assert_eq!(out.canonical_smiles, canon("CCO"));
    assert!(out.standardised_mol.contains("V2000"));
    assert_eq!(out.murcko_scaffold, None);

    let from_smiles = pipeline.standardise("CCO").unwrap();
    assert_eq!(from_smiles.identifier_key, out.identifier_key);
}

#[test]
fn test_pipeline_self_check_passes() {
    assert!(StructurePipeline::default().self_check().is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// PROPERTY TESTS
// ─────────────────────────────────────────────────────────────────────────────

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Linear chains over the organic subset; always valid input.
    fn chain_smiles() -> impl Strategy<Value = String> {
        let atoms = prop_oneof![Just("C"), Just("N"), Just("O"), Just("S")];
        proptest::collection::vec(atoms, 1..=12).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn canonicalization_is_idempotent(smi in chain_smiles()) {
            let once = canon(&smi);
            let twice = write_canonical_smiles(&parse_smiles(&once).unwrap());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn descriptors_ignore_atom_numbering(smi in chain_smiles()) {
            let forward = describe(&parse_smiles(&smi).unwrap());
            let reversed: String = smi.chars().rev().collect();
            let backward = describe(&parse_smiles(&reversed).unwrap());
            prop_assert_eq!(forward, backward);
        }
    }
}
