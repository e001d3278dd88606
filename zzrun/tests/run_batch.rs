use std::f64::consts::PI;
use std::io::Write;

use serde_json::{json, Value};
use tempfile::NamedTempFile;

use zzcore::Region;
use zzrun::error::RunError;
use zzrun::{run, RunOptions};

fn muon(pt: f64, eta: f64, phi: f64, charge: i32) -> Value {
    json!({
        "flavor": "muon",
        "pt": pt,
        "eta": eta,
        "phi": phi,
        "charge": charge,
        "deco": {
            "id": true,
            "sip": 1.5,
            "comb_rel_iso": 0.05,
            "trigger_matched": true,
            "muon": { "is_global": true }
        }
    })
}

/// Four muons: a 91 GeV pair back to back in phi, a 25 GeV pair at phi = pi/2.
fn four_muon_event(event: u64) -> Value {
    let deta = (91.0_f64 * 91.0 / (2.0 * 40.0 * 35.0) - 1.0).acosh();
    let dphi = (1.0_f64 - 25.0 * 25.0 / (2.0 * 25.0 * 15.0)).acos();
    json!({
        "run": 1,
        "lumi": 1,
        "event": event,
        "objects": [
            muon(40.0, deta / 2.0, 0.0, 1),
            muon(35.0, -deta / 2.0, PI, -1),
            muon(25.0, 0.3, PI / 2.0 - dphi / 2.0, 1),
            muon(15.0, 0.3, PI / 2.0 + dphi / 2.0, -1),
        ],
        "trigger": { "HLT_IsoMu24": true },
        "met": { "px": 10.0, "py": -5.0 }
    })
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn options(events: &NamedTempFile) -> RunOptions {
    RunOptions {
        config: None,
        period: "2018".to_string(),
        events: events.path().to_path_buf(),
        output: None,
        threads: 2,
    }
}

#[test]
fn run_over_json_lines() {
    let lines = format!(
        "{}\n{}\n{}\n",
        four_muon_event(1),
        json!({"event": 2, "objects": []}),
        four_muon_event(3)
    );
    let events = write_temp(&lines);
    let output = NamedTempFile::new().unwrap();

    let mut opts = options(&events);
    opts.output = Some(output.path().to_path_buf());
    let yields = run(&opts).unwrap();

    assert_eq!(yields.events, 3);
    assert_eq!(yields.count(Region::SR), 2);
    assert_eq!(yields.full_sel, 2);
    assert_eq!(yields.zz_candidates, 4);

    let written: Value = serde_json::from_str(&std::fs::read_to_string(output.path()).unwrap()).unwrap();
    let results = written.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[1]["event"], json!(2));
    assert_eq!(results[0]["met"]["px"], json!(10.0));
}

#[test]
fn run_with_config_file() {
    let events = write_temp(&json!([four_muon_event(1)]).to_string());
    let config = write_temp(r#"{"run_period": "2018", "selection_setup": "allCutsAtOnce"}"#);
    let mut opts = options(&events);
    opts.config = Some(config.path().to_path_buf());
    let yields = run(&opts).unwrap();
    assert_eq!(yields.count(Region::SR), 1);
}

#[test]
fn configuration_errors_are_fatal() {
    let events = write_temp("[]");
    let config = write_temp(r#"{"run_period": "2018", "selection_setup": "Legacy"}"#);
    let mut opts = options(&events);
    opts.config = Some(config.path().to_path_buf());
    assert!(matches!(run(&opts), Err(RunError::Core(_))));

    let mut opts = options(&events);
    opts.period = "1999".to_string();
    assert!(matches!(run(&opts), Err(RunError::Core(_))));

    // misspelled keys are refused, not replaced by defaults
    let config = write_temp(r#"{"run_period": "2018", "selectionSetup": "Legacy"}"#);
    let mut opts = options(&events);
    opts.config = Some(config.path().to_path_buf());
    assert!(matches!(run(&opts), Err(RunError::Json(_))));
}

#[test]
fn missing_event_file() {
    let events = write_temp("[]");
    let mut opts = options(&events);
    opts.events = events.path().with_extension("does-not-exist");
    assert!(matches!(run(&opts), Err(RunError::Io { .. })));
}
