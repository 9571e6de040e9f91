use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use matmul_plots::batch::{discover_folders, run_batch, BatchConfig};
use matmul_plots::charts::{ChartKind, ChartStyle, ImageFormat};
use matmul_plots::ingestion::PipelineObserver;
use matmul_plots::LoadFailureKind;

#[derive(Default)]
struct ChartLog {
    written: Mutex<Vec<String>>,
    skipped: Mutex<Vec<String>>,
}

impl PipelineObserver for ChartLog {
    fn on_chart_written(&self, chart: &str, _output: &Path) {
        self.written.lock().unwrap().push(chart.to_string());
    }

    fn on_chart_skipped(&self, chart: &str, _reason: &str) {
        self.skipped.lock().unwrap().push(chart.to_string());
    }
}

fn tmp_root(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("matmul_plots_{name}_{nanos}"))
}

fn seed(root: &Path, folder: &str, files: &[&str]) {
    let dir = root.join("data").join("chrono").join(folder);
    fs::create_dir_all(&dir).unwrap();
    for f in files {
        fs::copy(Path::new("tests/fixtures").join(f), dir.join(f)).unwrap();
    }
}

fn svg_config(root: &Path, folder: &str, charts: Vec<ChartKind>) -> BatchConfig {
    BatchConfig {
        root: root.to_path_buf(),
        folder: Some(folder.to_string()),
        charts,
        workers: Some(2),
        style: ChartStyle {
            width: 320,
            height: 240,
            format: ImageFormat::Svg,
            show_text: false,
            ..ChartStyle::default()
        },
        ..BatchConfig::default()
    }
}

#[test]
fn missing_inputs_are_skipped_and_the_rest_is_drawn() {
    let root = tmp_root("batch");
    seed(&root, "O3", &["serial_permutations.csv", "tiled.csv"]);
    let log = Arc::new(ChartLog::default());
    let config = svg_config(
        &root,
        "O3",
        vec![
            ChartKind::SerialPermutations,
            ChartKind::ScalingClassic,
            ChartKind::Tiled,
        ],
    );

    let report = run_batch(&config, Some(log.clone())).unwrap();

    let produced: Vec<ChartKind> = report.produced.iter().map(|p| p.chart).collect();
    assert_eq!(produced, vec![ChartKind::SerialPermutations, ChartKind::Tiled]);
    for p in &report.produced {
        assert!(p.output.starts_with(root.join("data").join("plots").join("O3")));
        let svg = fs::read_to_string(&p.output).unwrap();
        assert!(svg.contains("<svg"));
    }

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].chart, ChartKind::ScalingClassic);
    assert_eq!(report.skipped[0].load_failure, Some(LoadFailureKind::NotFound));
    assert_eq!(report.summary(), "Plots created: 2\nPlots skipped: 1");

    assert_eq!(log.written.lock().unwrap().len(), 2);
    assert_eq!(
        log.skipped.lock().unwrap().clone(),
        vec!["serial_parallel_scaling_classic".to_string()]
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn empty_data_directory_skips_every_chart() {
    let root = tmp_root("batch_empty");
    fs::create_dir_all(root.join("data").join("chrono")).unwrap();
    let config = svg_config(&root, "O0", ChartKind::ALL.to_vec());

    let report = run_batch(&config, None).unwrap();

    assert!(report.produced.is_empty());
    assert_eq!(report.skipped.len(), ChartKind::ALL.len());
    assert!(report
        .skipped
        .iter()
        .all(|s| s.load_failure == Some(LoadFailureKind::NotFound)));
    assert!(!root.join("data").join("plots").join("O0").exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn report_serializes_to_json() {
    let root = tmp_root("batch_json");
    seed(&root, "O2", &["serial_permutations.csv"]);
    let config = svg_config(
        &root,
        "O2",
        vec![ChartKind::SerialPermutations, ChartKind::Tiled],
    );

    let report = run_batch(&config, None).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["produced"][0]["chart"], "serial_permutations");
    assert_eq!(json["skipped"][0]["chart"], "tiled");
    assert_eq!(json["skipped"][0]["load_failure"], "NotFound");

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn parallel_charts_are_drawn_from_one_table() {
    let root = tmp_root("batch_parallel");
    seed(&root, "O3", &["parallel_permutations.csv"]);
    let config = svg_config(
        &root,
        "O3",
        vec![
            ChartKind::ParallelPermutations,
            ChartKind::ParallelPermutationsByThreads,
        ],
    );

    let report = run_batch(&config, None).unwrap();

    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    let outputs: Vec<String> = report
        .produced
        .iter()
        .map(|p| p.output.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        outputs,
        vec![
            "parallel_permutations.svg".to_string(),
            "parallel_permutations_by_threads.svg".to_string()
        ]
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn threads_filter_without_matching_rows_skips_the_chart() {
    let root = tmp_root("batch_threads");
    seed(&root, "O3", &["parallel_permutations.csv"]);
    let mut config = svg_config(&root, "O3", vec![ChartKind::ParallelPermutationsByThreads]);

    config.threads_filter = Some(4);
    let report = run_batch(&config, None).unwrap();
    assert_eq!(report.produced.len(), 1);

    config.threads_filter = Some(16);
    let report = run_batch(&config, None).unwrap();
    assert!(report.produced.is_empty());
    assert_eq!(report.skipped.len(), 1);
    // The table loaded fine; only the filtered chart came out empty.
    assert_eq!(report.skipped[0].load_failure, None);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn folders_are_discovered_in_name_order() {
    let root = tmp_root("discover");
    seed(&root, "O3", &[]);
    seed(&root, "O0", &[]);
    fs::write(root.join("data").join("chrono").join("notes.txt"), "x").unwrap();

    assert_eq!(discover_folders(&root), vec!["O0".to_string(), "O3".to_string()]);
    assert!(discover_folders(&root.join("missing")).is_empty());

    let _ = fs::remove_dir_all(&root);
}
