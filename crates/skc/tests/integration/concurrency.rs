//! One pipeline shared across threads.

use super::init_tracing;
use skc::{Tensor, TransformationPipeline};
use std::thread;

#[test]
fn test_concurrent_calls_agree() {
    init_tracing();
    let pipeline = TransformationPipeline::skc(0.2, 8, true).unwrap();
    let tensors: Vec<Tensor> = (0..8)
        .map(|t| {
            let data = (0..512).map(|i| ((i * (t + 3)) % 97) as f32 / 97.0 - 0.5).collect();
            Tensor::new(vec![16, 32], data).unwrap()
        })
        .collect();

    let expected: Vec<_> = tensors.iter().map(|t| pipeline.forward(t).unwrap()).collect();

    thread::scope(|s| {
        let handles: Vec<_> = tensors
            .iter()
            .zip(&expected)
            .map(|(tensor, expected)| {
                let pipeline = &pipeline;
                s.spawn(move || {
                    for _ in 0..4 {
                        let (payload, metadata) = pipeline.forward(tensor).unwrap();
                        assert_eq!(&(payload.clone(), metadata.clone()), expected);
                        let restored = pipeline.backward(&payload, metadata).unwrap();
                        assert_eq!(restored.shape(), tensor.shape());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    });
}
