//! Сквозные сценарии пайплайна

use aqua_ml::dataset::{variables_targets_split, DatasetSplitter};
use aqua_ml::evaluation::Evaluator;
use aqua_ml::models::{ModelBank, ModelKind};
use aqua_ml::pipeline::{run_pipeline, PredictionOptions};
use aqua_ml::preprocessing::{
    AggregationStrategy, ForceProcessor, NormalizationStrategy, ProcessingOptions,
};
use aqua_ml::types::DataTable;

#[test]
fn single_trial_weight_normalized_mean_with_imbalance() {
    // Протокольный сценарий: ADD/L=20, ADD/R=10, Weight=50, Height=1.5, bb=7
    let raw = DataTable::from_columns(vec![
        ("ADD/L", vec![20.0]),
        ("ADD/R", vec![10.0]),
        ("Weight", vec![50.0]),
        ("Height", vec![1.5]),
        ("bb", vec![7.0]),
    ]);
    let options = ProcessingOptions {
        normalization: NormalizationStrategy::Weight,
        aggregation: AggregationStrategy::Mean,
        imbalance: true,
    };

    let processed = ForceProcessor::process(&raw, &options).unwrap();

    let mut names = processed.names();
    names.sort_unstable();
    assert_eq!(names, vec!["Height", "Imb ADD", "Mean ADD", "Weight", "bb"]);
    assert!((processed.column("Mean ADD").unwrap()[0] - 0.3).abs() < 1e-12);
    assert!((processed.column("Imb ADD").unwrap()[0] - 50.0).abs() < 1e-12);
    assert_eq!(processed.column("Height").unwrap(), &[1.5]);
    assert_eq!(processed.column("bb").unwrap(), &[7.0]);
}

fn synthetic_trials(n: usize) -> DataTable {
    let left: Vec<f64> = (0..n).map(|i| 30.0 + (i % 7) as f64).collect();
    let right: Vec<f64> = (0..n).map(|i| 28.0 + (i % 5) as f64).collect();
    let weight: Vec<f64> = (0..n).map(|i| 55.0 + (i % 4) as f64).collect();
    let bb: Vec<f64> = left
        .iter()
        .zip(&right)
        .map(|(l, r)| 0.5 * (l + r) + 1.0)
        .collect();
    let eb: Vec<f64> = left.iter().map(|l| 100.0 - l).collect();
    DataTable::from_columns(vec![
        ("ADD/L", left),
        ("ADD/R", right),
        ("Weight", weight),
        ("Height", vec![1.7; n]),
        ("bb", bb),
        ("eb mean force", eb),
    ])
}

#[test]
fn manual_stage_by_stage_run_matches_the_pipeline_contract() {
    let raw = synthetic_trials(20);
    let processing = ProcessingOptions {
        normalization: NormalizationStrategy::None,
        aggregation: AggregationStrategy::FScore,
        imbalance: true,
    };

    let processed = ForceProcessor::process(&raw, &processing).unwrap();
    let targets_list = vec!["bb".to_string(), "eb mean force".to_string()];
    let (targets, variables) = variables_targets_split(&processed, &targets_list).unwrap();

    // Цели не должны просачиваться в переменные
    assert!(!variables.has_column("bb"));
    assert!(!variables.has_column("eb mean force"));
    assert!(variables.has_column("F-score ADD"));
    assert!(variables.has_column("Imb ADD"));

    let split = DatasetSplitter::new(42).split(&variables, &targets, 30).unwrap();
    assert_eq!(split.x_train.n_rows() + split.x_test.n_rows(), 20);
    assert_eq!(split.x_test.n_rows(), 6); // ceil(0.3 * 20)

    let mut bank = ModelBank::new(ModelKind::GradientBoosting, 42);
    bank.fit(&split.x_train, &split.y_train).unwrap();
    assert_eq!(bank.n_models(), 2);

    let records = bank.predict(&split.x_test, &split.y_test).unwrap();
    assert_eq!(records.len(), 2 * 6);

    let evaluated = Evaluator::evaluate(&records);
    for prediction in &evaluated {
        assert!(prediction.absolute_error >= 0.0);
        assert!(prediction.absolute_error == (prediction.real - prediction.predicted).abs());
    }
}

#[test]
fn full_pipeline_compares_all_registered_model_kinds() {
    let raw = synthetic_trials(24);
    let processing = ProcessingOptions {
        normalization: NormalizationStrategy::Weight,
        aggregation: AggregationStrategy::Mean,
        imbalance: true,
    };
    let prediction = PredictionOptions {
        targets: vec!["bb".to_string()],
        test_size: 25,
        models: ModelKind::ALL.to_vec(),
        seed: 42,
    };

    let output = run_pipeline(&raw, &processing, &prediction).unwrap();

    assert_eq!(output.reports.len(), ModelKind::ALL.len());
    assert_eq!(output.test_rows, 6);
    for report in &output.reports {
        assert_eq!(report.predictions.len(), 6);
    }
    assert_eq!(output.comparison.len(), 6 * ModelKind::ALL.len());

    let linear = output
        .reports
        .iter()
        .find(|r| r.model == "Linear regression")
        .unwrap();
    for p in &linear.predictions {
        assert!(p.absolute_error.is_finite());
    }
}

#[test]
fn serialized_options_round_trip_through_their_ui_names() {
    let json = r#"{
        "normalization": "Weight x Height",
        "aggregation": "F-score",
        "imbalance": false
    }"#;
    let options: ProcessingOptions = serde_json::from_str(json).unwrap();
    assert_eq!(options.normalization, NormalizationStrategy::WeightHeight);
    assert_eq!(options.aggregation, AggregationStrategy::FScore);

    let kinds: Vec<ModelKind> =
        serde_json::from_str(r#"["Linear regression", "Random forest"]"#).unwrap();
    assert_eq!(kinds, vec![ModelKind::Linear, ModelKind::RandomForest]);

    assert!(serde_json::from_str::<ModelKind>(r#""Perceptron""#).is_err());
}
