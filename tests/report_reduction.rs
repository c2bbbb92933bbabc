//! End-to-end reduction of a synthetic batch of room scans
//!
//! Mirrors what a report build does: extract measurement series and
//! detection tallies from every artifact, then reduce each chart's data
//! independently.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use scan_reduce::prelude::*;

struct Artifact {
    id: String,
    duration_s: f64,
    floor_area_m2: f64,
    detections: Vec<(&'static str, ConfidenceLevel)>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn synthetic_artifacts(n: usize, seed: u64) -> Vec<Artifact> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let duration = LogNormal::new(4.0, 0.5).unwrap();
    let area = Normal::new(18.0, 6.0).unwrap();
    let categories = ["door", "window", "table", "sofa"];
    let levels = ConfidenceLevel::ALL;

    (0..n)
        .map(|i| {
            let detections = (0..rng.gen_range(0..6))
                .map(|_| {
                    let category = categories[rng.gen_range(0..categories.len())];
                    let level = levels[rng.gen_range(0..levels.len())];
                    (category, level)
                })
                .collect();
            // Every tenth capture has a corrupt duration.
            let duration_s = if i % 10 == 9 {
                f64::NAN
            } else {
                duration.sample(&mut rng)
            };
            Artifact {
                id: format!("scan-{i:04}"),
                duration_s,
                floor_area_m2: area.sample(&mut rng),
                detections,
            }
        })
        .collect()
}

#[test]
fn test_full_report_reduction() {
    init_tracing();
    let artifacts = synthetic_artifacts(250, 11);

    let config = ReductionConfig::from_json_str(
        r#"{
            "kde": { "resolution": 120 },
            "histograms": {
                "duration": { "bin_size": 30.0, "min": 0.0, "max": 300.0, "hide_underflow": true }
            }
        }"#,
    )
    .unwrap();

    let durations: Vec<f64> = artifacts.iter().map(|a| a.duration_s).collect();
    let areas: Vec<f64> = artifacts.iter().map(|a| a.floor_area_m2).collect();

    // Histogram: every finite duration at or above 0 is counted.
    let histogram = config.binner("duration").unwrap().bin(&durations);
    let finite = durations.iter().filter(|d| d.is_finite()).count() as u64;
    assert_eq!(histogram.total(), finite);
    assert_eq!(histogram.len(), 11);
    assert_eq!(histogram.labels()[0], "0-30");

    // Density: a window near the data, well inside the guess cap.
    let engine = config.density_engine().unwrap();
    let density = engine.estimate(&areas, 0.0, 60.0);
    assert_eq!(density.series.len(), 120);
    assert!(density.bounds.min > -30.0 && density.bounds.max < 90.0);
    let peak = density.series.peak().unwrap();
    assert!(peak.x > 8.0 && peak.x < 28.0, "peak at {}", peak.x);

    // Apportionment: every category sums to its artifact count.
    let mut acc = TallyAccumulator::new();
    for artifact in &artifacts {
        acc.record_artifact(&artifact.id, artifact.detections.iter().copied());
    }
    let tallies = acc.finish();
    let counts = apportion_all(&tallies, config.apportion.deficit_policy);
    assert_eq!(counts.len(), tallies.len());
    for (category, tally) in &tallies {
        assert_eq!(counts[category].total(), tally.artifact_count, "{category}");
        assert!(tally.raw.total() >= tally.artifact_count);
    }
}

#[test]
fn test_units_run_concurrently() {
    let artifacts = synthetic_artifacts(120, 12);
    let areas: Vec<f64> = artifacts.iter().map(|a| a.floor_area_m2).collect();
    let reference = build_dynamic_kde(&areas, 0.0, 60.0, 80, 0.1);

    let results: Vec<DynamicKdeResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| build_dynamic_kde(&areas, 0.0, 60.0, 80, 0.1)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, reference);
    }
}

#[test]
fn test_one_bad_chart_does_not_block_others() {
    let presets: BTreeMap<&str, BinnerConfig> = [
        ("ok", BinnerConfig::new(1.0, 0.0, 10.0)),
        ("zero_bin", BinnerConfig::new(0.0, 0.0, 10.0)),
        ("inverted", BinnerConfig::new(1.0, 10.0, 0.0)),
        ("huge", BinnerConfig::new(1e-7, 0.0, 10.0)),
    ]
    .into_iter()
    .collect();

    let data = [1.0, 2.0, 3.0];
    let built: BTreeMap<&str, Result<Histogram>> = presets
        .iter()
        .map(|(name, preset)| (*name, preset.build().map(|b| b.bin(&data))))
        .collect();

    assert!(built["ok"].is_ok());
    assert!(matches!(built["zero_bin"], Err(Error::InvalidBinSize(_))));
    assert!(matches!(built["inverted"], Err(Error::EmptyRange { .. })));
    assert!(matches!(built["huge"], Err(Error::TooManyBins { .. })));
}
