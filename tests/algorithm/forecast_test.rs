//! Tests for feeding predictions back through a model

use triage_ml::algorithm::SequenceWindow;
use triage_ml::{ArrivalModel, Error, Prediction, RadiusVariance, Result, forecast};

use crate::utils::jan;

/// Predicts the window mean and remembers every window it saw
struct MeanModel {
    seen: Vec<Vec<f32>>,
}

impl ArrivalModel for MeanModel {
    fn predict(&mut self, window: &[f32], calendar: &[f32]) -> Result<Prediction> {
        assert!(!calendar.is_empty());
        self.seen.push(window.to_vec());
        #[allow(clippy::cast_precision_loss)]
        let count = window.iter().sum::<f32>() / window.len() as f32;
        Ok(Prediction {
            count,
            variance: 0.0,
        })
    }
}

#[test]
fn test_predictions_feed_back_into_window() {
    let mut model = MeanModel { seen: Vec::new() };
    let calendars = vec![vec![1.0_f32; 4]; 3];
    let predictions = forecast(&mut model, &[3.0, 6.0, 9.0], &calendars).unwrap();

    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[0].count, 6.0);
    assert_eq!(model.seen[1], vec![6.0, 9.0, 6.0]);
    assert_eq!(model.seen[2], vec![9.0, 6.0, 7.0]);
}

#[test]
fn test_closure_models_and_empty_horizon() {
    let mut steps = 0;
    let mut model = |window: &[f32], _: &[f32]| -> Result<Prediction> {
        steps += 1;
        Ok(Prediction {
            count: window[window.len() - 1] + 1.0,
            variance: 1.0,
        })
    };

    let none: Vec<Vec<f32>> = Vec::new();
    assert!(forecast(&mut model, &[1.0], &none).unwrap().is_empty());

    let counts: Vec<f32> = forecast(&mut model, &[1.0], vec![vec![0.0]; 4])
        .unwrap()
        .iter()
        .map(|p| p.count)
        .collect();
    assert_eq!(counts, vec![2.0, 3.0, 4.0, 5.0]);
    drop(model);
    assert_eq!(steps, 4);
}

#[test]
fn test_model_errors_stop_the_loop() {
    let mut calls = 0;
    let mut model = |_: &[f32], _: &[f32]| -> Result<Prediction> {
        calls += 1;
        Err(anyhow::anyhow!("model unavailable").into())
    };
    let result = forecast(&mut model, &[1.0, 2.0], vec![vec![0.0]; 5]);
    assert!(matches!(result, Err(Error::Other(_))));
    drop(model);
    assert_eq!(calls, 1);
}

#[test]
fn test_empty_seed_rejected() {
    assert!(SequenceWindow::new(&[]).is_err());
}

#[test]
fn test_radius_variance_forecast_encodes_dates() {
    let rv = RadiusVariance::new(2, 1);
    let mut widths = Vec::new();
    let mut model = |_: &[f32], calendar: &[f32]| -> Result<Prediction> {
        widths.push(calendar.iter().filter(|v| **v > 0.0).count());
        Ok(Prediction {
            count: 1.0,
            variance: 0.0,
        })
    };

    let predictions = rv.forecast(&mut model, &[1.0, 2.0], &[jan(20), jan(21)]).unwrap();
    assert_eq!(predictions.len(), 2);
    assert!(rv.forecast(&mut model, &[1.0], &[jan(20)]).is_err());
    drop(model);
    assert_eq!(widths, vec![2, 2]);
}
