//! Performance benchmarks for the structure pipeline.
//!
//! Run with: `cargo bench --bench pipeline`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Parse + canonicalize | <1ms | Drug-sized molecules |
//! | Descriptor vector | <1ms | One perception pass |
//! | SVG depiction | <5ms | Layout plus render |
//! | 3D embedding | <50ms | Capped refinement loop |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use structure_pipeline::{
    canonicalize, depict, describe, embed_3d, generate_structures, parse_smiles,
    DepictionOptions, EmbedOptions, MolecularFormula,
};

const ETHANOL: &str = "CCO";
const ASPIRIN: &str = "CC(=O)Oc1ccccc1C(=O)O";
const CAFFEINE: &str = "CN1C=NC2=C1C(=O)N(C)C(=O)N2C";
const CHOLESTEROL: &str = "CC(C)CCCC(C)C1CCC2C1(CCC3C2CC=C4C3(CCC(C4)O)C)C";

/// Benchmark parsing plus the full canonical bundle.
fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    for (name, smiles) in [
        ("ethanol", ETHANOL),
        ("aspirin", ASPIRIN),
        ("caffeine", CAFFEINE),
        ("cholesterol", CHOLESTEROL),
    ] {
        group.throughput(Throughput::Bytes(smiles.len() as u64));
        group.bench_with_input(BenchmarkId::new("smiles", name), &smiles, |b, smiles| {
            b.iter(|| {
                let mol = parse_smiles(black_box(smiles)).unwrap();
                canonicalize(&mol).unwrap()
            })
        });
    }

    group.finish();
}

/// Benchmark the 17-field descriptor record.
fn bench_descriptors(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptors");

    for (name, smiles) in [("caffeine", CAFFEINE), ("cholesterol", CHOLESTEROL)] {
        let mol = parse_smiles(smiles).unwrap();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("molecule", name), &mol, |b, mol| {
            b.iter(|| describe(black_box(mol)))
        });
    }

    group.finish();
}

/// Benchmark both SVG backends on the same molecule.
fn bench_depict(c: &mut Criterion) {
    let mol = parse_smiles(CAFFEINE).unwrap();

    let mut group = c.benchmark_group("depict");

    for backend in ["standard", "sketch"] {
        let options = DepictionOptions {
            backend: backend.to_string(),
            ..DepictionOptions::default()
        };

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("backend", backend),
            &options,
            |b, options| {
                b.iter(|| {
                    let svg = depict(black_box(&mol), options).unwrap();
                    assert!(!svg.as_str().is_empty());
                    svg
                })
            },
        );
    }

    group.finish();
}

/// Benchmark seeded distance-geometry embedding.
fn bench_embed_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("embed_3d");
    group.sample_size(20);

    for (name, smiles) in [("ethanol", ETHANOL), ("caffeine", CAFFEINE)] {
        let mol = parse_smiles(smiles).unwrap();
        let options = EmbedOptions::default();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("molecule", name), &mol, |b, mol| {
            b.iter(|| {
                let embedded = embed_3d(black_box(mol), &options);
                assert!(embedded.is_some());
                embedded
            })
        });
    }

    group.finish();
}

/// Benchmark exhaustive isomer generation for small formulas.
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);

    for formula_text in ["C4H10", "C5H12", "C4H8O"] {
        let formula: MolecularFormula = formula_text.parse().unwrap();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("formula", formula_text),
            &formula,
            |b, formula| {
                b.iter(|| {
                    let isomers = generate_structures(black_box(formula), 10).unwrap();
                    assert!(!isomers.is_empty());
                    isomers
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_canonicalize,
    bench_descriptors,
    bench_depict,
    bench_embed_3d,
    bench_generate,
);
criterion_main!(benches);
