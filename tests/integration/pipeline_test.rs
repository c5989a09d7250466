//! End to end: synthetic arrivals, configuration, training split, forecast

use rand::SeedableRng;
use rand::rngs::StdRng;
use triage_ml::synthetic::{GenerationMethod, cyclic};
use triage_ml::utils::logging::init_test_logging;
use triage_ml::{DatasetConfig, Prediction, Result, TimeUnit};

use crate::utils::date;

#[test]
fn test_synthetic_year_through_config() {
    init_test_logging();
    let mut rng = StdRng::seed_from_u64(2020);
    let collection = GenerationMethod::RandomCyclic
        .generate(date(2020, 1, 1), date(2020, 12, 31), &mut rng)
        .unwrap();
    assert!(collection.len() > 366 * 19);

    let config = DatasetConfig::default();
    let rv = config.radius_variance();
    let split = rv.prepare_training(&collection, config.validation_split).unwrap();

    // 366 days, 15 on each side, 30 for the first window
    let total = 366 - 2 * 15 - 30;
    assert_eq!(split.train.len() + split.validation.len(), total);
    assert_eq!(split.train.sequence_inputs()[0].dim().1, 30);
    assert_eq!(split.validation.outputs()[0].ncols(), 2);
}

#[test]
fn test_deterministic_cyclic_counts() {
    let mut rng = StdRng::seed_from_u64(1);
    let collection = cyclic(date(2020, 1, 1), date(2020, 1, 10), 0.0, &mut rng).unwrap();
    let counts = DatasetConfig::default()
        .radius_variance()
        .bucket_counts(&collection)
        .unwrap();

    assert_eq!(counts.len(), 10);
    assert!(counts.iter().all(|(_, c)| (20..=21).contains(c)));
}

#[test]
fn test_weekly_config_forecast() {
    let config = DatasetConfig::from_json_str(r#"{"seq_size": 4, "radius": 2, "unit": "week"}"#).unwrap();
    assert_eq!(config.unit, TimeUnit::Week);

    let mut rng = StdRng::seed_from_u64(9);
    let collection = GenerationMethod::Cyclic
        .generate(date(2020, 1, 6), date(2020, 6, 28), &mut rng)
        .unwrap();
    let rv = config.radius_variance();
    let dataset = rv.create_ml_dataset(&collection).unwrap();
    // 25 weeks, 2 on each side, 4 for the first window
    assert_eq!(dataset.len(), 25 - 4 - 4);

    let seed: Vec<f32> = dataset.sequence_inputs()[0]
        .slice(ndarray::s![dataset.len() - 1, .., 0])
        .to_vec();
    let mut model = |window: &[f32], _: &[f32]| -> Result<Prediction> {
        #[allow(clippy::cast_precision_loss)]
        let mean = window.iter().sum::<f32>() / window.len() as f32;
        Ok(Prediction {
            count: mean,
            variance: 0.0,
        })
    };
    let horizon = [date(2020, 7, 6), date(2020, 7, 13)];
    let predictions = rv.forecast(&mut model, &seed, &horizon).unwrap();
    assert_eq!(predictions.len(), 2);
    assert!(predictions.iter().all(|p| p.count > 100.0));
}
