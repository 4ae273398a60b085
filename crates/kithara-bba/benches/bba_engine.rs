#![forbid(unsafe_code)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kithara_bba::{
    AdaptationEngine, BbaOptions, RateCatalogue, Representation, SizeCatalogue, TrackKind,
};

const BITRATES: [u64; 4] = [256_000, 512_000, 1_024_000, 2_048_000];

fn rows(segments: usize) -> Vec<Vec<u64>> {
    BITRATES
        .iter()
        .map(|&bps| {
            (0..segments as u64)
                // +-10% wobble around the nominal 4 s segment size
                .map(|i| bps / 2 * (90 + i % 21) / 100)
                .collect()
        })
        .collect()
}

fn rates() -> RateCatalogue {
    RateCatalogue::new(
        BITRATES
            .iter()
            .map(|&bps| Representation::new(bps, bps.to_string()))
            .collect(),
    )
    .unwrap()
}

fn bench_catalogue_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("bba_catalogue_build");

    for segments in [150_usize, 900, 3_600] {
        let table = rows(segments);
        group.bench_with_input(
            BenchmarkId::new("segments", segments),
            &table,
            |b, table| b.iter(|| black_box(SizeCatalogue::new(table.clone()).unwrap())),
        );
    }

    group.finish();
}

fn bench_engine_decide(c: &mut Criterion) {
    let mut group = c.benchmark_group("bba_engine_decide");
    let sizes = SizeCatalogue::new(rows(900)).unwrap();

    for (label, buffer_secs) in [
        ("below_reservoir", 5.0),
        ("cushion", 25.0),
        ("saturated", 60.0),
    ] {
        group.bench_with_input(
            BenchmarkId::new("decide", label),
            &buffer_secs,
            |b, &buffer_secs| {
                b.iter(|| {
                    let mut engine = AdaptationEngine::with_catalogues(
                        TrackKind::Video,
                        BbaOptions::default(),
                        sizes.clone(),
                        rates(),
                    )
                    .unwrap();
                    for segment in 0..32 {
                        black_box(engine.decide(buffer_secs, Some(segment)));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_catalogue_build, bench_engine_decide);
criterion_main!(benches);
