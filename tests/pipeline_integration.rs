//! Integration tests for config-driven pipeline runs
//!
//! These tests exercise end-to-end pipelines with real file I/O,
//! mirroring how the CLI wires configuration, registry, and stages.

use datapipe::config::PipelineConfig;
use datapipe::error::Stage;
use datapipe::etl::{Dataset, Pipeline, RunStatus, Transform};
use datapipe::registry::Registry;
use datapipe::storage::JsonReader;
use datapipe::{Extractor, Loader, Record};
use eyre::Result;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn configure_and_run(registry: &Registry, yaml: &str) -> datapipe::etl::RunReport {
    let config = PipelineConfig::from_yaml(yaml).unwrap();
    Pipeline::configure(registry, &config).unwrap().run()
}

fn read_json(path: &Path) -> Vec<Value> {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_csv_to_json_round_trip_with_uppercase() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "people.csv", "name,age\nada,36\ngrace,45\nradia,52\n");
    let output = dir.path().join("people.json");

    let yaml = format!(
        r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: uppercase
    params:
      field: name
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        output.display()
    );

    let report = configure_and_run(&Registry::builtin(), &yaml);

    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(report.extracted, 3);
    assert_eq!(report.transformed.len(), 1);
    assert_eq!(report.transformed[0].count, 3);
    assert_eq!(report.loaded, 3);

    let records = read_json(&output);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["name"], json!("ADA"));
    assert_eq!(records[1]["name"], json!("GRACE"));
    assert_eq!(records[2]["name"], json!("RADIA"));
    // ages keep their numeric type and value
    assert_eq!(records[0]["age"], json!(36));
    assert_eq!(records[1]["age"], json!(45));
    assert_eq!(records[2]["age"], json!(52));
}

#[test]
fn test_loaded_count_matches_last_transform() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "people.csv",
        "name,age\nada,36\nkid,9\ngrace,45\nteen,17\n",
    );
    let output = dir.path().join("adults.json");

    let yaml = format!(
        r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: filter
    params:
      field: age
      op: gt
      value: 18
  - name: head
    params:
      count: 1
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        output.display()
    );

    let report = configure_and_run(&Registry::builtin(), &yaml);

    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(report.extracted, 4);
    assert_eq!(report.transformed[0].count, 2);
    assert_eq!(report.transformed[1].count, 1);
    assert_eq!(report.loaded, report.transformed.last().unwrap().count);
}

#[test]
fn test_determinism_across_runs() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "in.csv", "city,temp\ntokyo,21\nparis,18\noslo,4\n");
    let out_a = dir.path().join("a.json");
    let out_b = dir.path().join("b.json");

    let yaml = |out: &Path| {
        format!(
            r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: normalize
    params:
      field: temp
  - name: lowercase
    params:
      field: city
destination:
  kind: json
  params:
    path: {}
"#,
            input.display(),
            out.display()
        )
    };

    let first = configure_and_run(&Registry::builtin(), &yaml(&out_a));
    let second = configure_and_run(&Registry::builtin(), &yaml(&out_b));

    assert_eq!(first.status, RunStatus::Succeeded);
    assert_eq!(second.status, RunStatus::Succeeded);
    assert_eq!(
        JsonReader::new(&out_a).extract().unwrap(),
        JsonReader::new(&out_b).extract().unwrap()
    );
}

/// Transform that always fails, for fail-fast assertions
struct ExplodingTransform;

impl Transform for ExplodingTransform {
    fn name(&self) -> &str {
        "explode"
    }

    fn apply(&self, _input: Dataset) -> Result<Dataset> {
        eyre::bail!("boom")
    }
}

/// Loader that counts invocations instead of writing anywhere
struct CountingLoader {
    calls: Arc<AtomicUsize>,
}

impl Loader for CountingLoader {
    fn load(&self, dataset: &[Record]) -> Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(dataset.len())
    }
}

#[test]
fn test_failing_transform_never_invokes_loader() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "in.csv", "n\n1\n2\n");

    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::builtin();
    registry.register_transform("explode", |_params| Ok(Box::new(ExplodingTransform)));
    let loader_calls = calls.clone();
    registry.register_loader("counting", move |_params| {
        Ok(Box::new(CountingLoader {
            calls: loader_calls.clone(),
        }))
    });

    let yaml = format!(
        r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: explode
destination:
  kind: counting
"#,
        input.display()
    );

    let report = configure_and_run(&registry, &yaml);

    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.failed_stage(), Some(Stage::Transform));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_transform_order_is_significant() {
    // filter on 'age' then rename 'age' keeps adults;
    // rename first leaves nothing for the filter to match.
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "in.csv", "name,age\nada,36\nkid,9\n");
    let filtered_first = dir.path().join("filtered_first.json");
    let renamed_first = dir.path().join("renamed_first.json");

    let yaml_filter_then_rename = format!(
        r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: filter
    params:
      field: age
      op: gt
      value: 18
  - name: rename_field
    params:
      from: age
      to: years
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        filtered_first.display()
    );

    let yaml_rename_then_filter = format!(
        r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: rename_field
    params:
      from: age
      to: years
  - name: filter
    params:
      field: age
      op: gt
      value: 18
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        renamed_first.display()
    );

    let registry = Registry::builtin();
    let first = configure_and_run(&registry, &yaml_filter_then_rename);
    let second = configure_and_run(&registry, &yaml_rename_then_filter);

    assert_eq!(first.status, RunStatus::Succeeded);
    assert_eq!(second.status, RunStatus::Succeeded);

    // filter-then-rename keeps the adult row with the renamed field
    let records = read_json(&filtered_first);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["years"], json!(36));

    // rename-then-filter drops every row: no record has 'age' anymore
    assert_eq!(read_json(&renamed_first).len(), 0);
    assert_eq!(second.loaded, 0);
}

#[test]
fn test_empty_source_succeeds_with_zero_counts() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "empty.csv", "name,age\n");
    let output = dir.path().join("out.json");

    let yaml = format!(
        r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: uppercase
    params:
      field: name
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        output.display()
    );

    let report = configure_and_run(&Registry::builtin(), &yaml);

    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(report.extracted, 0);
    assert_eq!(report.transformed[0].count, 0);
    assert_eq!(report.loaded, 0);
    assert_eq!(read_json(&output).len(), 0);
}

#[test]
fn test_empty_source_disallowed_fails_extract() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "empty.csv", "name,age\n");

    let yaml = format!(
        r#"
source:
  kind: csv
  allow_empty: false
  params:
    path: {}
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        dir.path().join("out.json").display()
    );

    let report = configure_and_run(&Registry::builtin(), &yaml);

    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.failed_stage(), Some(Stage::Extract));
}

#[test]
fn test_unknown_transform_fails_configure() {
    let yaml = r#"
source:
  kind: csv
  params:
    path: does-not-matter.csv
transforms:
  - name: pivot
destination:
  kind: json
  params:
    path: out.json
"#;
    let config = PipelineConfig::from_yaml(yaml).unwrap();
    let err = Pipeline::configure(&Registry::builtin(), &config).unwrap_err();

    assert_eq!(err.stage(), Stage::Configure);
    assert!(err.to_string().contains("pivot"));
}

#[test]
fn test_json_to_csv_pipeline() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "in.json",
        r#"[
            {"name": "ada", "age": 36, "city": "london"},
            {"name": "ada", "age": 36, "city": "london"},
            {"name": "grace", "age": 45, "city": "new york"}
        ]"#,
    );
    let output = dir.path().join("out.csv");

    let yaml = format!(
        r#"
source:
  kind: json
  params:
    path: {}
transforms:
  - name: dedupe
  - name: drop_fields
    params:
      fields: [city]
destination:
  kind: csv
  params:
    path: {}
"#,
        input.display(),
        output.display()
    );

    let report = configure_and_run(&Registry::builtin(), &yaml);

    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(report.extracted, 3);
    assert_eq!(report.transformed[0].count, 2);
    assert_eq!(report.loaded, 2);

    let content = std::fs::read_to_string(&output).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("name,age"));
    assert_eq!(lines.next(), Some("ada,36"));
    assert_eq!(lines.next(), Some("grace,45"));
}

#[test]
fn test_group_by_pipeline() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "salaries.csv",
        "city,salary\ntokyo,1000\ntokyo,\nparis,900\ntokyo,2000\n",
    );
    let output = dir.path().join("by_city.json");

    let yaml = format!(
        r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: fill_missing
    params:
      fields: [salary]
  - name: group_by
    params:
      by: [city]
      aggregate:
        salary: mean
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        output.display()
    );

    let report = configure_and_run(&Registry::builtin(), &yaml);

    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(report.extracted, 4);
    assert_eq!(report.transformed[0].count, 4);
    assert_eq!(report.transformed[1].count, 2);
    assert_eq!(report.loaded, 2);

    // the empty tokyo salary forward-fills to 1000 before grouping
    let records = read_json(&output);
    assert_eq!(records[0]["city"], json!("tokyo"));
    assert_eq!(records[0]["salary_mean"], json!((1000.0 + 1000.0 + 2000.0) / 3.0));
    assert_eq!(records[1]["city"], json!("paris"));
    assert_eq!(records[1]["salary_mean"], json!(900.0));
}

#[test]
fn test_large_integer_multiply_survives_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "big.json", r#"[{"n": 4000000000000000000}]"#);
    let output = dir.path().join("tripled.json");

    let yaml = format!(
        r#"
source:
  kind: json
  params:
    path: {}
transforms:
  - name: multiply
    params:
      field: n
      factor: 3
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        output.display()
    );

    let report = configure_and_run(&Registry::builtin(), &yaml);

    assert_eq!(report.status, RunStatus::Succeeded);
    let records = read_json(&output);
    assert_eq!(records[0]["n"], json!(1.2e19));
}

#[test]
fn test_transform_failure_names_step() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "in.csv", "name,salary\nada,lots\n");

    let yaml = format!(
        r#"
source:
  kind: csv
  params:
    path: {}
transforms:
  - name: uppercase
    params:
      field: name
  - name: multiply
    params:
      field: salary
      factor: 2
destination:
  kind: json
  params:
    path: {}
"#,
        input.display(),
        dir.path().join("out.json").display()
    );

    let report = configure_and_run(&Registry::builtin(), &yaml);

    assert_eq!(report.status, RunStatus::Failed);
    let failure = report.failure.unwrap();
    let message = failure.to_string();
    assert!(message.contains("step 1"));
    assert!(message.contains("multiply"));
    assert!(message.contains("not numeric"));
}
