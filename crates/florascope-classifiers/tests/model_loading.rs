//! Model loader integration tests
//!
//! Exercises the path-keyed cache against real files on disk.

use florascope_classifiers::{Classifier, ModelLoader};
use florascope_core::{Error, ModelError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};

const IRIS_JSON: &str = r#"{
    "name": "iris-logreg",
    "type": "logistic-regression",
    "coefficients": [
        [-0.423, 0.967, -2.517, -1.079],
        [0.534, -0.321, -0.207, -0.944],
        [-0.111, -0.646, 2.724, 2.023]
    ],
    "intercepts": [9.849, 2.238, -12.087]
}"#;

const IRIS_TREE_YAML: &str = r#"
name: iris-tree
type: decision-tree
n_features: 4
nodes:
  - { type: split, feature: 2, threshold: 2.45, left: 1, right: 2 }
  - { type: leaf, counts: [50, 0, 0] }
  - { type: split, feature: 3, threshold: 1.75, left: 3, right: 4 }
  - { type: leaf, counts: [0, 49, 5] }
  - { type: leaf, counts: [0, 1, 45] }
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_nonexistent_path_is_not_found() {
    let loader = ModelLoader::new();

    let err = loader.load("/nonexistent/model.bin").err().expect("missing file should fail");
    assert!(matches!(err, Error::NotFound { .. }));

    // missing paths leave nothing behind in the cache
    let err = loader.load("/nonexistent/model.bin").err().expect("missing file should fail");
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(loader.load_count(), 0);
    assert_eq!(loader.cached_count(), 0);
}

#[test]
fn test_load_json_and_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let json = write(dir.path(), "iris.json", IRIS_JSON);
    let yaml = write(dir.path(), "iris-tree.yaml", IRIS_TREE_YAML);
    let loader = ModelLoader::new();

    let logreg = loader.load(&json).unwrap();
    assert_eq!(logreg.name(), "iris-logreg");
    assert_eq!(logreg.kind(), "logistic-regression");

    let tree = loader.load(&yaml).unwrap();
    assert_eq!(tree.kind(), "decision-tree");
    assert_eq!(tree.n_features(), 4);
    assert_eq!(tree.predict(&[6.7, 3.0, 5.2, 2.3]).unwrap(), 2);

    assert_eq!(loader.cached_count(), 2);
    assert_eq!(loader.load_count(), 2);
}

#[test]
fn test_name_defaults_to_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "centroids.yml",
        "type: nearest-centroid\ncentroids: [[0.0], [1.0]]\n",
    );

    let model = ModelLoader::new().load(&path).unwrap();
    assert_eq!(model.name(), "centroids");
}

#[test]
fn test_repeated_loads_share_one_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "iris.json", IRIS_JSON);
    let loader = ModelLoader::new();

    let first = loader.load(&path).unwrap();
    let second = loader.load(&path).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(loader.load_count(), 1);
}

#[test]
fn test_concurrent_loads_deserialize_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "iris.json", IRIS_JSON);
    let loader = ModelLoader::new();
    let start = Barrier::new(8);

    let handles: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    start.wait();
                    loader.load(&path).unwrap()
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(handles.len(), 8);
    assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    assert_eq!(loader.load_count(), 1);
}

#[test]
fn test_corrupt_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "broken.json", "{ \"type\": \"logistic-regression\", ");
    let loader = ModelLoader::new();

    let err = loader.load(&path).err().expect("corrupt file should fail");
    assert!(matches!(err, Error::Load { .. }));
    assert!(matches!(err.model_error(), Some(ModelError::Json(_))));
}

#[test]
fn test_inconsistent_model_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "bad.json",
        r#"{ "type": "logistic-regression", "coefficients": [[1.0, 2.0]], "intercepts": [0.0, 1.0] }"#,
    );

    let err = ModelLoader::new()
        .load(&path)
        .err()
        .expect("inconsistent model should fail");
    assert!(matches!(err.model_error(), Some(ModelError::Malformed(_))));
}

#[test]
fn test_unsupported_extension_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "model_iris.pkl", "\u{80}\u{04}");

    let err = ModelLoader::new()
        .load(&path)
        .err()
        .expect("pickle file should fail");
    assert!(matches!(
        err.model_error(),
        Some(ModelError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_failed_load_is_terminal_until_invalidated() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "iris.json", "not json");
    let loader = ModelLoader::new();

    assert!(loader.load(&path).is_err());

    // fixing the file is not enough while the failure is cached
    write(dir.path(), "iris.json", IRIS_JSON);
    assert!(matches!(loader.load(&path), Err(Error::Load { .. })));
    assert_eq!(loader.load_count(), 1);

    assert!(loader.invalidate(&path));
    let model = loader.load(&path).unwrap();
    assert_eq!(model.name(), "iris-logreg");
    assert_eq!(loader.load_count(), 2);
}

#[test]
fn test_prediction_error_keeps_cached_handle() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "iris.json", IRIS_JSON);
    let loader = ModelLoader::new();

    let model = loader.load(&path).unwrap();
    assert!(model.predict(&[5.5, 3.0, 4.0]).is_err());

    assert!(loader.is_cached(&path));
    let again = loader.load(&path).unwrap();
    assert!(Arc::ptr_eq(&model, &again));
    assert_eq!(again.predict(&[5.5, 3.0, 4.0, 1.0]).unwrap(), 1);
}

#[test]
fn test_global_loader_is_shared() {
    assert!(std::ptr::eq(ModelLoader::global(), ModelLoader::global()));
}
