//! Accuracy metrics for backtesting forecasts against held-out days

use crate::error::{ForecastError, Result};

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, over non-zero actuals
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;

    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    // MAPE is undefined where the actual is zero; average over the rest
    let nonzero = actual.iter().filter(|&&a| a != 0.0).count();
    let mape = if nonzero > 0 {
        actual
            .iter()
            .zip(errors.iter())
            .filter(|(&a, _)| a != 0.0)
            .map(|(&a, &e)| (e.abs() / a.abs()) * 100.0)
            .sum::<f64>()
            / nonzero as f64
    } else {
        0.0
    };

    let smape = actual
        .iter()
        .zip(forecast.iter())
        .map(|(&a, &f)| {
            let denom = a.abs() + f.abs();
            if denom == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / denom
            }
        })
        .sum::<f64>()
        / n;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        mape,
        smape,
    })
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        writeln!(f, "  SMAPE: {:.4}%", self.smape)?;
        Ok(())
    }
}
