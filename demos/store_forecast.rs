//! Build a small in-memory dataset and artifacts, backtest the frozen
//! model on the last week, then forecast the next 7 days for one store.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use demand_forecast::align::Schema;
use demand_forecast::data::{FeatureValue, SalesDataset, SalesRecord};
use demand_forecast::engine::{ForecastArtifacts, ForecastEngine, ForecastRequest};
use demand_forecast::metrics::forecast_accuracy;
use demand_forecast::predictor::LinearPredictor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();

    // Two stores, 60 days each, with a weekend bump so the weekly lag
    // features have something to pick up
    let mut records = Vec::new();
    for (store, store_type, base) in [("1", "a", 200.0), ("2", "b", 320.0)] {
        for day in 0..60 {
            let date = start + Duration::days(day);
            let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
            let sales = base + 1.5 * day as f64 + if weekend { 40.0 } else { 0.0 };
            records.push(
                SalesRecord::new(store, date, sales)
                    .with_extra("Promo", FeatureValue::Numeric((day % 2) as f64))
                    .with_extra(
                        "StoreType",
                        FeatureValue::Categorical(store_type.to_string()),
                    ),
            );
        }
    }
    let dataset = SalesDataset::from_records(records)?;

    // The schema and weights a training run would have exported
    let columns = [
        "Year",
        "Month",
        "Day",
        "DayOfWeek",
        "Lag_1",
        "Lag_7",
        "Rolling_Mean_7",
        "Rolling_Mean_14",
        "Rolling_Mean_30",
        "Promo",
        "StoreType_a",
        "StoreType_b",
    ];
    let schema = Schema::from_columns(columns.iter().map(|s| s.to_string()).collect())?;
    let weights = vec![0.0, 0.0, 0.0, 0.0, 0.45, 0.35, 0.2, 0.0, 0.0, 5.0, 0.0, 0.0];
    let predictor = LinearPredictor::new(weights, 2.0)?;
    let artifacts = ForecastArtifacts::new(schema, Box::new(predictor));
    let engine = ForecastEngine::new(&artifacts);

    // Backtest: forecast the last observed week and compare to reality
    let cutoff = start + Duration::days(52);
    let backtest = engine.forecast(
        &dataset,
        &ForecastRequest {
            store_id: "1".to_string(),
            start_date: cutoff,
        },
    )?;
    let actual: Vec<f64> = dataset
        .history("1")
        .unwrap()
        .iter()
        .filter(|r| r.date > cutoff)
        .map(|r| r.sales)
        .collect();
    println!("Backtest over the held-out week for store 1:");
    println!("{}", forecast_accuracy(&backtest.values(), &actual)?);

    // Forecast the 7 days after the latest observation
    let latest = start + Duration::days(59);
    let forecast = engine.forecast(
        &dataset,
        &ForecastRequest {
            store_id: "1".to_string(),
            start_date: latest,
        },
    )?;

    println!("Recent history and 7-day forecast for store 1:");
    for (date, sales) in dataset.recent_history("1", latest, 14).unwrap() {
        println!("  {}  {:>10.1}", date, sales);
    }
    println!("  ----------  ----------");
    for point in forecast.points() {
        println!("  {}  {:>10.1}  (forecast)", point.date, point.sales);
    }

    Ok(())
}
