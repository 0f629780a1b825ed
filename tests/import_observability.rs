use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use auction_ingest::ImportError;
use auction_ingest::ingestion::{
    CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportOptions, ImportRequest, ImportSeverity,
    ImportStats, TracingObserver, import_property_auctions, import_vehicle_auctions,
};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(String, ImportStats)>>,
    failures: Mutex<Vec<ImportSeverity>>,
    alerts: Mutex<Vec<ImportSeverity>>,
}

impl ImportObserver for RecordingObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        self.successes.lock().unwrap().push((ctx.schema.to_string(), stats));
    }

    fn on_failure(&self, _ctx: &ImportContext, severity: ImportSeverity, _error: &ImportError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ImportContext, severity: ImportSeverity, _error: &ImportError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("auction-ingest-{name}-{nanos}.log"))
}

fn options_with(obs: Arc<dyn ImportObserver>, alert_at_or_above: ImportSeverity) -> ImportOptions {
    ImportOptions {
        observer: Some(obs),
        alert_at_or_above,
        ..Default::default()
    }
}

#[test]
fn success_reports_row_counts() {
    let obs = Arc::new(RecordingObserver::default());
    let request = ImportRequest::new(
        "yard.csv",
        b"Contract No,Make\nC1,Tata\n,\nC3,\n".to_vec(),
    );

    import_vehicle_auctions(&request, &options_with(obs.clone(), ImportSeverity::Critical)).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![(
            "vehicle".to_string(),
            ImportStats {
                total_rows: 3,
                successful_rows: 1,
                skipped_rows: 2,
                row_errors: 0,
            }
        )]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn too_few_rows_is_a_warning_without_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let request = ImportRequest::new("header_only.csv", b"Event No,Event Type\n".to_vec());

    let _ = import_property_auctions(&request, &options_with(obs.clone(), ImportSeverity::Critical)).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![ImportSeverity::Warning]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn alert_threshold_is_inclusive() {
    let obs = Arc::new(RecordingObserver::default());
    let request = ImportRequest::new("notice.pdf", vec![0x25, 0x50, 0x44, 0x46]);

    let _ = import_property_auctions(&request, &options_with(obs.clone(), ImportSeverity::Error)).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![ImportSeverity::Error]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![ImportSeverity::Error]);
}

#[test]
fn missing_file_is_critical() {
    let err = ImportRequest::from_path("tests/fixtures/does_not_exist.xlsx").unwrap_err();
    assert!(matches!(err, ImportError::Io(_)));
    assert_eq!(
        auction_ingest::ingestion::unified::severity_for_error(&err),
        ImportSeverity::Critical
    );
}

#[test]
fn composite_fans_out_and_file_observer_appends() {
    let log = tmp_file("observer");
    let recorder = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        recorder.clone(),
        Arc::new(FileObserver::new(&log)),
        Arc::new(TracingObserver),
    ]);
    let options = options_with(Arc::new(composite), ImportSeverity::Warning);

    let ok = ImportRequest::new("a.csv", b"Event No,Event Type\nE1,Sale\n".to_vec());
    let bad = ImportRequest::new("b.csv", b"Event No\n".to_vec());
    import_property_auctions(&ok, &options).unwrap();
    let _ = import_property_auctions(&bad, &options).unwrap_err();

    assert_eq!(recorder.successes.lock().unwrap().len(), 1);
    assert_eq!(recorder.alerts.lock().unwrap().clone(), vec![ImportSeverity::Warning]);

    let text = std::fs::read_to_string(&log).unwrap();
    let _ = std::fs::remove_file(&log);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3, "{text}");
    assert!(lines[0].contains(" ok schema=property file=a.csv total=1 ok=1"));
    assert!(lines[1].contains(" fail severity=Warning schema=property file=b.csv"));
    assert!(lines[2].contains(" ALERT severity=Warning"));
}
