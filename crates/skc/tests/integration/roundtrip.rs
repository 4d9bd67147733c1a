//! Forward/backward round trips through the standard pipeline.

use super::init_tracing;
use skc::{Error, Tensor, TransformationPipeline, TransformerMetadata};

/// Deterministic weight-like values in roughly [-0.5, 0.5].
fn synthetic_weights(n: usize, seed: u64) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let x = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(seed);
            let noise = ((x >> 40) as f32 / (1u64 << 24) as f32) - 0.5;
            let structured = (i as f32 * 0.05).sin() * 0.2;
            structured + noise * 0.6
        })
        .collect()
}

#[test]
fn test_sequential_32_scenario() {
    init_tracing();
    let pipeline = TransformationPipeline::skc(0.0, 8, true).unwrap();
    let tensor = Tensor::new(vec![1, 32], (0..32).map(|i| i as f32).collect()).unwrap();

    let (payload, metadata) = pipeline.forward(&tensor).unwrap();
    assert_eq!(metadata.len(), 3);
    assert!(payload.len() < 128, "payload was {} bytes", payload.len());

    let restored = pipeline.backward(&payload, metadata).unwrap();
    assert_eq!(restored.shape(), &[1, 32]);
    assert_eq!(restored.data()[0], 0.0);

    // Neighbouring inputs share a centroid, so reconstruction is monotone.
    for pair in restored.data().windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn test_shape_is_restored() {
    let pipeline = TransformationPipeline::skc(0.3, 6, true).unwrap();
    for shape in [vec![64], vec![8, 8], vec![2, 4, 8], vec![1, 1, 1, 64]] {
        let tensor = Tensor::new(shape.clone(), synthetic_weights(64, 3)).unwrap();
        let (payload, metadata) = pipeline.forward(&tensor).unwrap();
        let restored = pipeline.backward(&payload, metadata).unwrap();
        assert_eq!(restored.shape(), shape.as_slice());
    }
}

#[test]
fn test_error_bounded_by_cluster_spread() {
    let pipeline = TransformationPipeline::skc(0.0, 16, true).unwrap();
    let data = synthetic_weights(4096, 11);
    let tensor = Tensor::new(vec![64, 64], data).unwrap();

    let (payload, metadata) = pipeline.forward(&tensor).unwrap();
    assert!(payload.len() < tensor.byte_len() / 4);

    let restored = pipeline.backward(&payload, metadata).unwrap();
    let max_err = tensor.max_abs_diff(&restored).unwrap();
    assert!(max_err < 0.2, "max error {max_err}");
}

#[test]
fn test_zeros_and_surviving_values() {
    let pipeline = TransformationPipeline::skc(0.5, 64, true).unwrap();
    let data = vec![0.0, -4.0, 0.001, 3.0, 0.0, 2.5, -0.002, 0.003];
    let tensor = Tensor::new(vec![2, 4], data.clone()).unwrap();

    let output = pipeline.forward_report(&tensor).unwrap();
    let restored = pipeline
        .backward(&output.payload, output.metadata)
        .unwrap();

    // Four smallest magnitudes are zeroed, the rest are their own centroids.
    assert_eq!(
        restored.data(),
        &[0.0, -4.0, 0.0, 3.0, 0.0, 2.5, 0.0, 0.003]
    );
    assert!(!output.lossless);
}

#[test]
fn test_sparsity_fraction_counts() {
    let pipeline = TransformationPipeline::skc(0.7, 32, false).unwrap();
    let tensor = Tensor::new(vec![10], (1..=10).map(|i| i as f32).collect()).unwrap();

    let (payload, metadata) = pipeline.forward(&tensor).unwrap();
    let restored = pipeline.backward(&payload, metadata).unwrap();
    assert_eq!(restored.count_zeros(), 7);
    assert_eq!(&restored.data()[7..], &[8.0, 9.0, 10.0]);
}

#[test]
fn test_degenerate_cluster_count_is_exact() {
    let pipeline = TransformationPipeline::skc(0.0, 8, true).unwrap();
    let data = vec![0.25, -1.5, 0.25, 7.0, -1.5, 0.0, 7.0, 0.25, 3.125];
    let tensor = Tensor::new(vec![3, 3], data).unwrap();

    let output = pipeline.forward_report(&tensor).unwrap();
    assert!(output.lossless);

    let restored = pipeline
        .backward(&output.payload, output.metadata)
        .unwrap();
    assert_eq!(restored, tensor);
}

#[test]
fn test_all_zero_tensor() {
    let pipeline = TransformationPipeline::skc(0.1, 6, true).unwrap();
    let tensor = Tensor::zeros(vec![4, 4]).unwrap();

    let output = pipeline.forward_report(&tensor).unwrap();
    assert!(output.lossless);
    assert_eq!(output.metadata[1].scalar_map.len(), 1);

    let restored = pipeline
        .backward(&output.payload, output.metadata)
        .unwrap();
    assert_eq!(restored, tensor);
}

#[test]
fn test_forward_is_deterministic() {
    let pipeline = TransformationPipeline::skc(0.2, 6, true).unwrap();
    let tensor = Tensor::new(vec![32, 32], synthetic_weights(1024, 5)).unwrap();

    let first = pipeline.forward(&tensor).unwrap();
    let second = pipeline.forward(&tensor).unwrap();
    assert_eq!(first, second);

    let other = TransformationPipeline::skc(0.2, 6, true).unwrap();
    assert_eq!(other.forward(&tensor).unwrap(), first);
}

#[test]
fn test_metadata_count_mismatch() {
    init_tracing();
    let pipeline = TransformationPipeline::skc(0.1, 6, true).unwrap();
    let tensor = Tensor::new(vec![16], synthetic_weights(16, 1)).unwrap();
    let (payload, metadata) = pipeline.forward(&tensor).unwrap();

    for records in [0, 1, 2, 4] {
        let wrong = vec![TransformerMetadata::new(); records];
        let err = pipeline.backward(&payload, wrong).unwrap_err();
        assert!(
            matches!(err, Error::MetadataCountMismatch { expected: 3, actual } if actual == records)
        );
    }

    assert!(pipeline.backward(&payload, metadata).is_ok());
}

#[test]
fn test_non_finite_input_rejected() {
    let pipeline = TransformationPipeline::skc(0.0, 6, true).unwrap();
    for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        let tensor = Tensor::new(vec![3], vec![1.0, bad, 2.0]).unwrap();
        let err = pipeline.forward(&tensor).unwrap_err();
        assert_eq!(err.category(), "invalid_input");
    }
}

#[test]
fn test_compression_disabled_roundtrip() {
    let enabled = TransformationPipeline::skc(0.1, 6, true).unwrap();
    let disabled = TransformationPipeline::skc(0.1, 6, false).unwrap();
    let tensor = Tensor::new(vec![256], synthetic_weights(256, 9)).unwrap();

    let (raw, raw_meta) = disabled.forward(&tensor).unwrap();
    assert_eq!(raw_meta[2].bool_sequence, vec![false]);
    assert_eq!(raw.len(), 256);

    let (packed, packed_meta) = enabled.forward(&tensor).unwrap();
    assert!(packed.len() <= raw.len());

    assert_eq!(
        disabled.backward(&raw, raw_meta).unwrap(),
        enabled.backward(&packed, packed_meta).unwrap()
    );
}

#[test]
fn test_signed_zero_clears_lossless_flag() {
    let pipeline = TransformationPipeline::skc(0.0, 8, true).unwrap();
    let tensor = Tensor::new(vec![3], vec![-0.0, 1.0, 2.0]).unwrap();

    let output = pipeline.forward_report(&tensor).unwrap();
    let restored = pipeline
        .backward(&output.payload, output.metadata)
        .unwrap();

    let bit_identical = tensor
        .data()
        .iter()
        .zip(restored.data())
        .all(|(a, b)| a.to_bits() == b.to_bits());
    assert!(!bit_identical);
    assert!(!output.lossless);
    assert_eq!(&restored.data()[1..], &[1.0, 2.0]);
}
