use std::time::Instant;

use chrono::NaiveDate;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use triage_ml::synthetic::GenerationMethod;
use triage_ml::{DatasetConfig, Prediction, Result, init_logging};

fn main() -> Result<()> {
    // Setup logging
    init_logging();

    let config = DatasetConfig::default();
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(2020, 1, 1),
        NaiveDate::from_ymd_opt(2021, 12, 31),
    ) else {
        return Ok(());
    };

    // Two years of synthetic arrivals for a single clinic
    let mut rng = StdRng::seed_from_u64(0);
    let collection = GenerationMethod::RandomCyclic.generate(start, end, &mut rng)?;
    let severe = collection.filter_on("severity", |v| v.as_int() == Some(2))?;
    info!("Kept {} severity 2 arrivals", severe.len());

    let timer = Instant::now();
    let rv = config.radius_variance();
    let split = rv.prepare_training(&severe, config.validation_split)?;
    info!(
        "Train {:?} / validation {:?} sequence inputs in {:?}",
        split.train.sequence_inputs().first().map(|a| a.dim()),
        split.validation.sequence_inputs().first().map(|a| a.dim()),
        timer.elapsed()
    );

    let batch = split.train.to_record_batch()?;
    info!("Training batch: {} rows, {} columns", batch.num_rows(), batch.num_columns());

    // Persistence forecast over the 30 buckets after the data
    let Some(last) = split.validation.examples().last() else {
        warn!("No validation buckets, nothing to forecast");
        return Ok(());
    };
    let mut persistence = |window: &[f32], _: &[f32]| -> Result<Prediction> {
        Ok(Prediction {
            count: window.last().copied().unwrap_or_default(),
            variance: last.target_variance,
        })
    };
    let horizon_end = rv.unit().add_units(end, 30)?;
    let horizon: Vec<NaiveDate> = rv.unit().date_range(end, horizon_end).skip(1).collect();
    let predictions = rv.forecast(&mut persistence, &last.sequence_history, &horizon)?;
    info!("Forecast {} buckets after {end}", predictions.len());

    Ok(())
}
