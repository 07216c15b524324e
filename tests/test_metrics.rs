use demand_forecast::error::ForecastError;
use demand_forecast::metrics::forecast_accuracy;

#[test]
fn test_perfect_forecast_scores_zero() {
    let actual = vec![100.0, 110.0, 120.0];
    let accuracy = forecast_accuracy(&actual, &actual).unwrap();

    assert_eq!(accuracy.mae, 0.0);
    assert_eq!(accuracy.mse, 0.0);
    assert_eq!(accuracy.rmse, 0.0);
    assert_eq!(accuracy.mape, 0.0);
    assert_eq!(accuracy.smape, 0.0);
}

#[test]
fn test_known_errors() {
    let forecast = vec![100.0, 110.0];
    let actual = vec![110.0, 100.0];
    let accuracy = forecast_accuracy(&forecast, &actual).unwrap();

    assert!((accuracy.mae - 10.0).abs() < 1e-9);
    assert!((accuracy.mse - 100.0).abs() < 1e-9);
    assert!((accuracy.rmse - 10.0).abs() < 1e-9);

    // (10/110 + 10/100) / 2 * 100
    let expected_mape = (10.0 / 110.0 + 10.0 / 100.0) / 2.0 * 100.0;
    assert!((accuracy.mape - expected_mape).abs() < 1e-9);

    // both points: 200 * 10 / 210
    let expected_smape = 200.0 * 10.0 / 210.0;
    assert!((accuracy.smape - expected_smape).abs() < 1e-9);
}

#[test]
fn test_zero_actuals_are_skipped_in_mape() {
    let forecast = vec![5.0, 100.0];
    let actual = vec![0.0, 110.0];
    let accuracy = forecast_accuracy(&forecast, &actual).unwrap();

    let expected_mape = 10.0 / 110.0 * 100.0;
    assert!((accuracy.mape - expected_mape).abs() < 1e-9);
}

#[test]
fn test_length_mismatch_is_rejected() {
    let result = forecast_accuracy(&[1.0], &[1.0, 2.0]);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));

    let result = forecast_accuracy(&[], &[]);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_display_lists_all_metrics() {
    let accuracy = forecast_accuracy(&[100.0], &[110.0]).unwrap();
    let text = accuracy.to_string();
    assert!(text.contains("MAE"));
    assert!(text.contains("RMSE"));
    assert!(text.contains("SMAPE"));
}
