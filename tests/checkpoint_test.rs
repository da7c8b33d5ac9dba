use burn::backend::ndarray::{NdArray, NdArrayDevice};
use burn::tensor::Tensor;
use tempfile::TempDir;
use visionbake::checkpoint::{CheckpointStore, StateMap};
use visionbake::dataset::ClassVocab;
use visionbake::error::Error;
use visionbake::model::ClassifierConfig;

#[test]
fn test_state_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp_dir.path(), "checkpoint");

    let mut state = StateMap::new();
    state.insert("epochs".into(), serde_json::json!(5));
    state.insert("final_val_loss".into(), serde_json::json!(0.42));
    state.insert("run_name".into(), serde_json::json!("smoke"));

    let path = store.save_state(&state).unwrap();
    assert!(path.file_name().unwrap().to_str().unwrap().starts_with("checkpoint-"));

    let loaded = CheckpointStore::load_state(&path).unwrap();
    assert_eq!(loaded, state);
}

#[test]
fn test_load_state_missing_path() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope-state.json");

    match CheckpointStore::load_state(&missing) {
        Err(Error::CheckpointNotFound { path }) => assert_eq!(path, missing),
        other => panic!("expected CheckpointNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_model_round_trip_preserves_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp_dir.path(), "checkpoint");
    let device = NdArrayDevice::Cpu;

    let config = ClassifierConfig::new(3);
    let model = config.init::<NdArray>(&device);
    let input = Tensor::<NdArray, 4>::ones([1, 3, 8, 8], &device);
    let before = model.forward(input.clone()).into_data().to_vec::<f32>().unwrap();

    store.save_model(&model).unwrap();
    store.save_model_config(&config).unwrap();

    let restored = store.load_model::<NdArray>(&config, &device).unwrap();
    let after = restored.forward(input).into_data().to_vec::<f32>().unwrap();

    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        // CompactRecorder stores half precision; allow a small tolerance.
        assert!((b - a).abs() < 1e-2, "logit drifted: {} vs {}", b, a);
    }
}

#[test]
fn test_load_model_without_training() {
    let temp_dir = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp_dir.path(), "checkpoint");
    let device = NdArrayDevice::Cpu;

    assert!(!store.has_checkpoint());
    let result = store.load_model::<NdArray>(&ClassifierConfig::new(2), &device);
    assert!(matches!(result, Err(Error::CheckpointNotFound { .. })));
}

#[test]
fn test_vocab_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp_dir.path(), "checkpoint");

    let vocab = ClassVocab::from_classes(vec!["dog".into(), "cat".into()]);
    store.save_vocab(&vocab).unwrap();

    let loaded = store.load_vocab().unwrap();
    assert_eq!(loaded, vocab);
    assert_eq!(loaded.name_of(0), Some("cat"));
}
