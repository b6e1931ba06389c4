use approx::assert_abs_diff_eq;
use finance_splat::data::{DataLoader, LoaderError};
use finance_splat::export::{self, DatasetReport};
use finance_splat::{read_financial_data, ColumnSelection, DataError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE: &str = "NUMBER_POINTS 3\nX\n1 2 3\nY\n10 20 30\nZ\n0 0 0\nS\n5 5 5\n";

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn xyzs() -> ColumnSelection {
    ColumnSelection::new("X", "Y", "Z", "S")
}

/// A loan-like file with wrapped value lines and extra unselected columns.
fn loan_file(records: usize) -> String {
    let mut text = String::from("financial sample\n\nNUMBER_POINTS ");
    text.push_str(&records.to_string());
    text.push('\n');

    let columns: [(&str, fn(usize) -> f64); 5] = [
        ("TIME_LATE", |i| ((i * 7) % 11) as f64),
        ("MONTHLY_PAYMENT", |i| 250.0 + (i * 37 % 101) as f64 * 3.5),
        ("UNUSED", |i| -(i as f64)),
        ("INTEREST_RATE", |i| 5.25 + (i % 9) as f64 * 0.125),
        ("LOAN_AMOUNT", |i| 10_000.0 + (i * 13 % 29) as f64 * 1_000.0),
    ];
    for (name, value) in columns {
        text.push_str(name);
        text.push('\n');
        for chunk in (0..records).collect::<Vec<_>>().chunks(6) {
            let line: Vec<String> = chunk.iter().map(|&i| value(i).to_string()).collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }
    }
    text
}

#[test]
fn three_record_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "sample.txt", SAMPLE);

    let dataset = read_financial_data(&path, &xyzs()).unwrap();
    assert_eq!(
        dataset.points(),
        [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [1.0, 1.0, 0.0]]
    );
    assert_eq!(dataset.scalars(), [0.0, 0.0, 0.0]);
}

#[test]
fn point_count_matches_declaration() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "loans.txt", &loan_file(47));

    let dataset = read_financial_data(&path, &ColumnSelection::default()).unwrap();
    assert_eq!(dataset.len(), 47);
    assert_eq!(dataset.scalars().len(), 47);
}

#[test]
fn normalized_columns_span_unit_interval() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "loans.txt", &loan_file(60));
    let dataset = read_financial_data(&path, &ColumnSelection::default()).unwrap();

    let mut columns: Vec<Vec<f64>> = (0..3)
        .map(|axis| dataset.points().iter().map(|p| p[axis]).collect())
        .collect();
    columns.push(dataset.scalars().to_vec());

    for values in columns {
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_abs_diff_eq!(lo, 0.0);
        assert_abs_diff_eq!(hi, 1.0);
    }
}

#[test]
fn column_order_does_not_matter() {
    let dir = TempDir::new().unwrap();
    let forward = write_input(&dir, "forward.txt", SAMPLE);
    let shuffled = write_input(
        &dir,
        "shuffled.txt",
        "NUMBER_POINTS 3\nS\n5 5 5\nZ\n0 0 0\nX\n1 2\n3\nY\n10 20 30\n",
    );

    let a = read_financial_data(&forward, &xyzs()).unwrap();
    let b = read_financial_data(&shuffled, &xyzs()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn reparsing_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "loans.txt", &loan_file(25));

    let mut loader = DataLoader::new();
    let first = loader.load_file(&path).unwrap().clone();
    let second = loader.load_file(&path).unwrap().clone();
    assert_eq!(first, second);

    let selection = ColumnSelection::default();
    assert_eq!(
        read_financial_data(&path, &selection).unwrap(),
        read_financial_data(&path, &selection).unwrap()
    );
}

#[test]
fn missing_declaration_produces_no_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "bad.txt", "X\n1 2 3\nY\n4 5 6\n");

    let err = read_financial_data(&path, &xyzs()).unwrap_err();
    assert!(matches!(
        err,
        DataError::Loader(LoaderError::MissingRecordCount)
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.txt");

    let err = read_financial_data(&path, &xyzs()).unwrap_err();
    assert!(matches!(err, DataError::Loader(LoaderError::Open { .. })));
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn unknown_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "sample.txt", SAMPLE);

    let err = read_financial_data(&path, &ColumnSelection::new("X", "Y", "Z", "TIME_LATE"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Column TIME_LATE not found in input");
}

#[test]
fn csv_export_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "sample.txt", SAMPLE);
    let dataset = read_financial_data(&path, &xyzs()).unwrap();

    let csv_path = dir.path().join("points.csv");
    export::write_csv(&dataset, &csv_path).unwrap();

    let text = fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("x,y,z,scalar"));
    assert_eq!(lines.count(), 3);
}

#[test]
fn report_counts_late_records() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "late.txt",
        "NUMBER_POINTS 4\nX\n1 2 3 4\nY\n1 2 3 4\nZ\n1 2 3 4\nS\n0 0 2 4\n",
    );

    let mut loader = DataLoader::new();
    let table = loader.load_file(&path).unwrap();
    let dataset = finance_splat::data::DataProcessor::build_dataset(table, &xyzs()).unwrap();
    let report = DatasetReport::new(&path, table, &dataset, 0.0);
    assert_eq!(report.record_count, 4);
    assert_eq!(report.late_count, 2);
    assert_eq!(report.columns.len(), 4);
    assert_eq!(report.columns[3].max, 4.0);

    let report_path = dir.path().join("report.json");
    export::write_report(&report, &report_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["late_count"], 2);
    assert_eq!(json["selection"]["scalar"], "S");
}
