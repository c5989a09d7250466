//! Tests for radius-variance dataset assembly

use ndarray::s;
use triage_ml::algorithm::population_variance;
use triage_ml::{ArrivalRecord, CalendarEncoding, RadiusVariance, RecordCollection, Schema, TimeUnit};

use crate::utils::{FIXTURE_COUNTS, assert_close, constant_collection, fixture_collection, jan};

#[test]
fn test_bucket_counts_fill_gaps() {
    let counts = RadiusVariance::default()
        .bucket_counts(&fixture_collection())
        .unwrap();

    assert_eq!(counts.len(), 11);
    assert_eq!(counts[0].0, jan(1));
    let values: Vec<_> = counts.iter().map(|(_, c)| *c).collect();
    assert_eq!(values, FIXTURE_COUNTS.to_vec());
}

#[test]
fn test_fixture_windows_seq2_radius3() {
    let dataset = RadiusVariance::new(2, 3)
        .create_ml_dataset(&fixture_collection())
        .unwrap();

    assert_eq!(dataset.len(), 3);
    let windows = &dataset.sequence_inputs()[0];
    assert_eq!(windows.dim(), (3, 2, 1));
    let rows: Vec<Vec<f32>> = (0..3)
        .map(|i| windows.slice(s![i, .., 0]).to_vec())
        .collect();
    assert_eq!(rows, vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 4.0]]);

    // Targets are 2020-01-06, 07 and 08
    let outputs = &dataset.outputs()[0];
    assert_eq!(outputs.column(0).to_vec(), vec![0.0, 4.0, 0.0]);
    assert_close(outputs[[0, 1]], 90.0 / 49.0);
    assert_close(
        outputs[[1, 1]],
        population_variance(&FIXTURE_COUNTS[3..10]) as f32,
    );
}

#[test]
fn test_fixture_row_counts() {
    let collection = fixture_collection();
    assert_eq!(RadiusVariance::new(1, 1).create_ml_dataset(&collection).unwrap().len(), 8);
    assert_eq!(RadiusVariance::new(3, 3).create_ml_dataset(&collection).unwrap().len(), 2);
    // Radius leaves fewer buckets than the window needs
    assert_eq!(RadiusVariance::new(6, 3).create_ml_dataset(&collection).unwrap().len(), 0);
    // Radius wider than the data
    assert_eq!(RadiusVariance::new(1, 6).create_ml_dataset(&collection).unwrap().len(), 0);
}

#[test]
fn test_three_days_radius_one() {
    let collection = constant_collection(jan(1), jan(3), 1);
    let observations = RadiusVariance::new(1, 1).observations(&collection).unwrap();

    assert_eq!(observations.len(), 1);
    let only = &observations[0];
    assert_eq!(only.date, jan(2));
    assert_eq!(only.count, 1);
    assert_eq!(only.variance, 0.0);
    assert_eq!(only.calendar, CalendarEncoding::MonthDay.encode(jan(2)));
}

#[test]
fn test_constant_series_has_zero_variance() {
    let collection = constant_collection(jan(1), jan(31), 3);
    let dataset = RadiusVariance::new(5, 4).create_ml_dataset(&collection).unwrap();

    assert_eq!(dataset.len(), 31 - 2 * 4 - 5);
    let outputs = &dataset.outputs()[0];
    assert!(outputs.column(0).iter().all(|c| *c == 3.0));
    assert!(outputs.column(1).iter().all(|v| *v == 0.0));
    assert!(dataset.sequence_inputs()[0].iter().all(|c| *c == 3.0));
}

#[test]
fn test_empty_collection_shapes() {
    let dataset = RadiusVariance::default()
        .create_ml_dataset(&RecordCollection::new(Schema::Basic))
        .unwrap();

    assert!(dataset.is_empty());
    assert_eq!(dataset.sequence_inputs()[0].dim(), (0, 30, 1));
    assert_eq!(dataset.feature_inputs()[0].dim(), (0, 43));
    assert_eq!(dataset.outputs()[0].dim(), (0, 2));
}

#[test]
fn test_unsorted_input_matches_sorted() {
    let collection = fixture_collection();
    let mut shuffled = collection.clone().into_records();
    shuffled.reverse();
    shuffled.swap(0, 5);
    let shuffled = RecordCollection::from_records(Schema::Basic, shuffled).unwrap();

    let rv = RadiusVariance::new(2, 2);
    assert_eq!(
        rv.create_ml_dataset(&collection).unwrap(),
        rv.create_ml_dataset(&shuffled).unwrap()
    );
}

#[test]
fn test_calendar_rows_match_target_dates() {
    let dataset = RadiusVariance::new(2, 3)
        .create_ml_dataset(&fixture_collection())
        .unwrap();
    let calendar = &dataset.feature_inputs()[0];
    assert_eq!(calendar.row(0), CalendarEncoding::MonthDay.encode(jan(6)));
    assert_eq!(calendar.row(2), CalendarEncoding::MonthDay.encode(jan(8)));
}

fn weekly_collection() -> RecordCollection {
    // 2020-01-02 is a Thursday; 06, 08 and 12 share the next ISO week
    let records = vec![
        ArrivalRecord::new(1, 1, jan(2)),
        ArrivalRecord::new(1, 1, jan(6)),
        ArrivalRecord::new(1, 1, jan(8)),
        ArrivalRecord::new(1, 1, jan(12)),
        ArrivalRecord::new(1, 1, jan(27)),
    ];
    RecordCollection::from_records(Schema::Basic, records).unwrap()
}

#[test]
fn test_weekly_bucket_counts_step_from_first_arrival() {
    let rv = RadiusVariance::new(1, 1).with_unit(TimeUnit::Week);
    let counts = rv.bucket_counts(&weekly_collection()).unwrap();

    let dates: Vec<_> = counts.iter().map(|(d, _)| *d).collect();
    assert_eq!(dates, vec![jan(2), jan(9), jan(16), jan(23), jan(30)]);
    let values: Vec<_> = counts.iter().map(|(_, c)| *c).collect();
    assert_eq!(values, vec![1, 3, 0, 0, 1]);
}

#[test]
fn test_weekly_eligible_range_is_radius_from_first_and_last_arrival() {
    let rv = RadiusVariance::new(1, 1).with_unit(TimeUnit::Week);
    let observations = rv.observations(&weekly_collection()).unwrap();

    // 2020-01-02 + 1 week through 2020-01-27 - 1 week
    let dates: Vec<_> = observations.iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![jan(9), jan(16)]);
    assert_eq!(observations[0].count, 3);
    assert!((observations[0].variance - 14.0 / 9.0).abs() < 1e-12);
    assert_eq!(observations[1].count, 0);
    assert!((observations[1].variance - 2.0).abs() < 1e-12);

    let dataset = rv.create_ml_dataset(&weekly_collection()).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.feature_inputs()[0].ncols(), 53);
    assert_eq!(dataset.outputs()[0].row(0).to_vec(), vec![0.0, 2.0]);
}

#[test]
fn test_weekly_month_day_encoding_uses_observation_dates() {
    let rv = RadiusVariance::new(1, 1)
        .with_unit(TimeUnit::Week)
        .with_encoding(CalendarEncoding::MonthDay);
    let dataset = rv.create_ml_dataset(&weekly_collection()).unwrap();
    assert_eq!(dataset.feature_inputs()[0].row(0), CalendarEncoding::MonthDay.encode(jan(16)));
}

#[test]
fn test_prepare_training_holds_back_latest_buckets() {
    let collection = constant_collection(jan(1), crate::utils::date(2020, 3, 31), 2);
    let rv = RadiusVariance::new(7, 3);
    let full = rv.create_ml_dataset(&collection).unwrap();
    let split = rv.prepare_training(&collection, 0.1).unwrap();

    assert_eq!(split.train.len() + split.validation.len(), full.len());
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let expected = (full.len() as f64 * 0.9).floor() as usize;
    assert_eq!(split.train.len(), expected);
    assert!(rv.prepare_training(&collection, 1.5).is_err());
}

#[test]
fn test_examples_match_rows() {
    let rv = RadiusVariance::new(2, 3);
    let examples = rv.time_series_examples(&fixture_collection()).unwrap();
    assert_eq!(examples.len(), 3);
    assert_eq!(examples[2].sequence_history, vec![0.0, 4.0]);
    assert_eq!(examples[2].target_count, 0.0);
    assert_eq!(examples[0].calendar_one_hot.len(), 43);
}

#[test]
fn test_zero_window_length_is_an_error() {
    let collection = constant_collection(jan(1), jan(10), 1);
    let result = RadiusVariance::new(0, 1).create_ml_dataset(&collection);
    assert!(matches!(result, Err(triage_ml::Error::InvalidParameter(_))));
}
