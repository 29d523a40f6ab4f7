//! Prediction latency benchmarks
//!
//! Measures one full pipeline call (label + probabilities + label lookup)
//! for each estimator family on iris-shaped input.
//!
//! Run with: cargo bench -p florascope-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use florascope_classifiers::{LoadedModel, PredictionPipeline};
use florascope_core::{ClassLabelTable, FeatureVector};

const LOGISTIC: &str = r#"{
    "type": "logistic-regression",
    "coefficients": [
        [-0.423, 0.967, -2.517, -1.079],
        [0.534, -0.321, -0.207, -0.944],
        [-0.111, -0.646, 2.724, 2.023]
    ],
    "intercepts": [9.849, 2.238, -12.087]
}"#;

const TREE: &str = r#"{
    "type": "decision-tree",
    "n_features": 4,
    "nodes": [
        { "type": "split", "feature": 2, "threshold": 2.45, "left": 1, "right": 2 },
        { "type": "leaf", "counts": [50, 0, 0] },
        { "type": "split", "feature": 3, "threshold": 1.75, "left": 3, "right": 4 },
        { "type": "leaf", "counts": [0, 49, 5] },
        { "type": "leaf", "counts": [0, 1, 45] }
    ]
}"#;

const CENTROID: &str = r#"{
    "type": "nearest-centroid",
    "centroids": [
        [5.006, 3.428, 1.462, 0.246],
        [5.936, 2.770, 4.260, 1.326],
        [6.588, 2.974, 5.552, 2.026]
    ]
}"#;

fn benchmark_pipeline(c: &mut Criterion) {
    let pipeline = PredictionPipeline::new(ClassLabelTable::iris());
    let features = FeatureVector::from([5.5, 3.0, 4.0, 1.0]);

    let models = vec![
        ("logistic_regression", LOGISTIC),
        ("decision_tree", TREE),
        ("nearest_centroid", CENTROID),
    ];

    let mut group = c.benchmark_group("Prediction_Pipeline");
    group.sample_size(100);

    for (name, json) in models {
        let model = LoadedModel::from_json_str(json).expect("Failed to decode model");
        group.bench_with_input(BenchmarkId::new("predict", name), &model, |b, model| {
            b.iter(|| pipeline.predict(black_box(model), black_box(&features)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    c.bench_function("decode_logistic_regression", |b| {
        b.iter(|| LoadedModel::from_json_str(black_box(LOGISTIC)).unwrap());
    });
}

criterion_group!(benches, benchmark_pipeline, benchmark_decode);
criterion_main!(benches);
