use chrono::{Datelike, Duration, NaiveDate};
use demand_forecast::data::{DataLoader, FeatureValue, SalesDataset, SalesRecord};
use demand_forecast::error::ForecastError;
use pretty_assertions::assert_eq;
use std::io::Write;

fn record(store: &str, date: NaiveDate, sales: f64) -> SalesRecord {
    SalesRecord::new(store, date, sales)
}

#[test]
fn test_from_records_groups_and_sorts_by_date() {
    let d = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let records = vec![
        record("2", d + Duration::days(1), 20.0),
        record("1", d + Duration::days(2), 12.0),
        record("1", d, 10.0),
        record("2", d, 19.0),
        record("1", d + Duration::days(1), 11.0),
    ];

    let dataset = SalesDataset::from_records(records).unwrap();

    assert_eq!(dataset.store_ids(), vec!["1", "2"]);
    assert_eq!(dataset.store_count(), 2);
    assert_eq!(dataset.len(), 5);

    let history = dataset.history("1").unwrap();
    let dates: Vec<NaiveDate> = history.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d, d + Duration::days(1), d + Duration::days(2)]);
    assert_eq!(history[2].sales, 12.0);

    assert!(dataset.history("3").is_none());
}

#[test]
fn test_from_records_rejects_duplicate_dates() {
    let d = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let records = vec![record("1", d, 10.0), record("1", d, 11.0)];

    let result = SalesDataset::from_records(records);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_from_records_rejects_empty_input() {
    let result = SalesDataset::from_records(Vec::new());
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_recent_history_tails_qualifying_records() {
    let d = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let records: Vec<SalesRecord> = (0..10)
        .map(|i| record("1", d + Duration::days(i), 100.0 + i as f64))
        .collect();
    let dataset = SalesDataset::from_records(records).unwrap();

    let cutoff = d + Duration::days(6);
    let recent = dataset.recent_history("1", cutoff, 3).unwrap();
    assert_eq!(
        recent,
        vec![
            (d + Duration::days(4), 104.0),
            (d + Duration::days(5), 105.0),
            (d + Duration::days(6), 106.0),
        ]
    );

    // Asking for more than exists returns everything qualifying
    let recent = dataset.recent_history("1", d, 5).unwrap();
    assert_eq!(recent, vec![(d, 100.0)]);

    assert!(dataset.recent_history("9", cutoff, 3).is_none());
}

fn write_csv_dataset(days: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Store,Date,Sales,Year,Month,Day,DayOfWeek,Lag_1,Lag_7,Rolling_Mean_7,Rolling_Mean_14,Rolling_Mean_30,Promo,StoreType"
    )
    .unwrap();
    let start = NaiveDate::from_ymd_opt(2015, 3, 1).unwrap();
    for i in 0..days {
        let date = start + Duration::days(i as i64);
        let sales = 100.0 + i as f64;
        writeln!(
            file,
            "1,{},{},{},{},{},{},{},{},{},{},{},{},a",
            date.format("%Y-%m-%d"),
            sales,
            date.year(),
            date.month(),
            date.day(),
            date.weekday().num_days_from_monday(),
            sales - 1.0,
            sales - 7.0,
            sales - 3.0,
            sales - 6.5,
            sales - 14.5,
            i % 2,
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_csv_loading_builds_typed_records() {
    let file = write_csv_dataset(35);
    let dataset = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(dataset.store_ids(), vec!["1"]);
    assert_eq!(dataset.len(), 35);

    let history = dataset.history("1").unwrap();
    let first = &history[0];
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2015, 3, 1).unwrap());
    assert_eq!(first.sales, 100.0);
    assert_eq!(first.year, 2015);
    assert_eq!(first.month, 3);
    assert_eq!(first.day_of_week, first.date.weekday().num_days_from_monday());
    assert_eq!(first.lag_1, 99.0);
    assert_eq!(first.rolling_mean_30, 85.5);

    // Non-core columns ride along as extras with their native kind
    assert_eq!(first.extras.get("Promo"), Some(&FeatureValue::Numeric(0.0)));
    assert_eq!(
        first.extras.get("StoreType"),
        Some(&FeatureValue::Categorical("a".to_string()))
    );

    let last = &history[34];
    assert_eq!(last.date, NaiveDate::from_ymd_opt(2015, 4, 4).unwrap());
    assert_eq!(last.sales, 134.0);
}

#[test]
fn test_csv_loading_reports_missing_required_column() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Store,Date").unwrap();
    writeln!(file, "1,2015-03-01").unwrap();
    file.flush().unwrap();

    let result = DataLoader::from_csv(file.path());
    match result {
        Err(ForecastError::DataError(msg)) => assert!(msg.contains("Sales")),
        other => panic!("expected data error, got {:?}", other),
    }
}
