//! Statistics for pipeline passes.

/// Statistics from one forward pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressionStats {
    /// Raw `f32` size of the input tensor in bytes.
    pub original_size: usize,

    /// Size of the emitted payload in bytes.
    pub compressed_size: usize,

    /// Time taken in microseconds.
    pub time_us: u64,

    /// Number of stages applied.
    pub stages: usize,

    /// Number of tensors folded into these stats.
    pub tensors: usize,
}

impl CompressionStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create stats from a completed forward pass.
    pub fn from_operation(
        original_size: usize,
        compressed_size: usize,
        time_us: u64,
        stages: usize,
    ) -> Self {
        CompressionStats {
            original_size,
            compressed_size,
            time_us,
            stages,
            tensors: 1,
        }
    }

    /// Original size over compressed size; 1.0 when nothing was emitted.
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 1.0;
        }
        self.original_size as f64 / self.compressed_size as f64
    }

    /// Get space savings as percentage.
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.compressed_size as f64 / self.original_size as f64) * 100.0
    }

    /// Get throughput in MB/s.
    pub fn throughput_mbs(&self) -> f64 {
        if self.time_us == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.time_us as f64
    }

    /// Merge stats from multiple operations.
    pub fn merge(&mut self, other: &CompressionStats) {
        self.original_size += other.original_size;
        self.compressed_size += other.compressed_size;
        self.time_us += other.time_us;
        self.stages = self.stages.max(other.stages);
        self.tensors += other.tensors;
    }

    /// Get stats summary as string.
    pub fn summary(&self) -> String {
        format!(
            "Tensors: {}, Bytes: {} -> {} (ratio: {:.2}x), Throughput: {:.1} MB/s",
            self.tensors,
            self.original_size,
            self.compressed_size,
            self.ratio(),
            self.throughput_mbs(),
        )
    }
}
