//! Wire envelope and delta workflow.

use super::init_tracing;
use skc::{
    apply_delta, generate_delta, NamedTensor, PipelineConfig, Tensor, TensorCodec,
};

fn weights(n: usize, offset: f32) -> Tensor {
    let data = (0..n).map(|i| ((i % 13) as f32 - 6.0) * 0.05 + offset).collect();
    Tensor::new(vec![n / 8, 8], data).unwrap()
}

#[test]
fn test_envelope_survives_bincode() {
    init_tracing();
    let codec = TensorCodec::from_config(&PipelineConfig::default()).unwrap();
    let tensor = weights(256, 0.0);

    let envelope = codec.compress("fc1.weight", 12, &tensor, false).unwrap();
    let bytes = envelope.to_bytes().unwrap();
    let decoded = NamedTensor::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, envelope);

    let restored = codec.decompress(&decoded).unwrap();
    assert_eq!(restored.shape(), tensor.shape());
}

#[test]
fn test_envelope_from_other_codec_instance() {
    let config = PipelineConfig::from_json(r#"{ "sparsity_fraction": 0.25, "cluster_count": 4 }"#)
        .unwrap();
    let sender = TensorCodec::from_config(&config).unwrap();
    let receiver = TensorCodec::from_config(&config).unwrap();

    let tensor = weights(128, 0.1);
    let envelope = sender.compress("bias", 1, &tensor, true).unwrap();
    assert!(envelope.report);

    let restored = receiver.decompress(&envelope).unwrap();
    assert_eq!(restored, sender.decompress(&envelope).unwrap());
}

#[test]
fn test_tampered_metadata_rejected() {
    let codec = TensorCodec::from_config(&PipelineConfig::default()).unwrap();
    let mut envelope = codec.compress("w", 0, &weights(64, 0.0), false).unwrap();
    envelope.transformer_metadata.truncate(2);

    let err = codec.decompress(&envelope).unwrap_err();
    assert!(err.is_contract_violation());
}

#[test]
fn test_delta_update_flow() {
    init_tracing();
    let codec = TensorCodec::from_config(&PipelineConfig::new(0.0, 16, true)).unwrap();
    let base = weights(512, 0.0);
    let current = weights(512, 0.01);

    let delta = generate_delta(&current, &base).unwrap();
    let envelope = codec.compress("layer.delta", 4, &delta, false).unwrap();
    assert!(envelope.lossless);

    let received = codec.decompress(&envelope).unwrap();
    let rebuilt = apply_delta(&base, &received).unwrap();
    assert!(rebuilt.max_abs_diff(&current).unwrap() < 1e-6);
}
