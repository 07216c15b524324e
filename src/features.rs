//! Feature derivation for the next forecast step

use crate::data::{columns, FeatureRow, FeatureValue, SalesRecord};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Longest trailing window used by the rolling-mean features
const LONGEST_WINDOW: usize = 30;

/// Derives the feature snapshot for the day after the end of a working
/// history.
///
/// Callers must guarantee at least 30 records so every rolling window is
/// fully populated; the forecast engine validates this before the loop
/// starts. Shorter histories are not supported here.
#[derive(Debug)]
pub struct FeatureVectorBuilder;

impl FeatureVectorBuilder {
    /// Compute the feature snapshot for the next date.
    ///
    /// All lag and rolling-mean features read the history as it stands, so
    /// once synthetic records have been appended they feed back into later
    /// snapshots. That recursion is the point of the design, not an
    /// accident.
    pub fn next_snapshot(history: &[SalesRecord]) -> FeatureSnapshot {
        debug_assert!(
            history.len() >= LONGEST_WINDOW,
            "feature building requires at least {} records",
            LONGEST_WINDOW
        );

        let last = &history[history.len() - 1];
        let target = last.date + Duration::days(1);
        let sales: Vec<f64> = history.iter().map(|r| r.sales).collect();

        FeatureSnapshot {
            date: target,
            year: target.year(),
            month: target.month(),
            day: target.day(),
            day_of_week: target.weekday().num_days_from_monday(),
            lag_1: sales[sales.len() - 1],
            lag_7: sales[sales.len() - 7],
            rolling_mean_7: trailing_mean(&sales, 7),
            rolling_mean_14: trailing_mean(&sales, 14),
            rolling_mean_30: trailing_mean(&sales, 30),
            extras: last.extras.clone(),
        }
    }
}

/// Mean of the last `window` values
fn trailing_mean(values: &[f64], window: usize) -> f64 {
    let tail = &values[values.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

/// Features computed for one not-yet-predicted date
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSnapshot {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday = 0, matching the convention the model was trained with
    pub day_of_week: u32,
    pub lag_1: f64,
    pub lag_7: f64,
    pub rolling_mean_7: f64,
    pub rolling_mean_14: f64,
    pub rolling_mean_30: f64,
    /// Extra feature columns carried forward from the last record
    pub extras: BTreeMap<String, FeatureValue>,
}

impl FeatureSnapshot {
    /// The unlabeled raw feature row for this snapshot.
    ///
    /// The target column is never part of the row; the date itself is only
    /// represented through its calendar fields.
    pub fn feature_row(&self) -> FeatureRow {
        let mut row: FeatureRow = self.extras.clone();
        row.insert(
            columns::YEAR.to_string(),
            FeatureValue::Numeric(self.year as f64),
        );
        row.insert(
            columns::MONTH.to_string(),
            FeatureValue::Numeric(self.month as f64),
        );
        row.insert(
            columns::DAY.to_string(),
            FeatureValue::Numeric(self.day as f64),
        );
        row.insert(
            columns::DAY_OF_WEEK.to_string(),
            FeatureValue::Numeric(self.day_of_week as f64),
        );
        row.insert(columns::LAG_1.to_string(), FeatureValue::Numeric(self.lag_1));
        row.insert(columns::LAG_7.to_string(), FeatureValue::Numeric(self.lag_7));
        row.insert(
            columns::ROLLING_MEAN_7.to_string(),
            FeatureValue::Numeric(self.rolling_mean_7),
        );
        row.insert(
            columns::ROLLING_MEAN_14.to_string(),
            FeatureValue::Numeric(self.rolling_mean_14),
        );
        row.insert(
            columns::ROLLING_MEAN_30.to_string(),
            FeatureValue::Numeric(self.rolling_mean_30),
        );
        row
    }

    /// Turn this snapshot into the synthetic record appended after scoring
    pub fn into_record(self, store_id: String, sales: f64) -> SalesRecord {
        SalesRecord {
            store_id,
            date: self.date,
            sales,
            year: self.year,
            month: self.month,
            day: self.day,
            day_of_week: self.day_of_week,
            lag_1: self.lag_1,
            lag_7: self.lag_7,
            rolling_mean_7: self.rolling_mean_7,
            rolling_mean_14: self.rolling_mean_14,
            rolling_mean_30: self.rolling_mean_30,
            extras: self.extras,
        }
    }
}
