//! Lossless compression stage

use crate::varint::{decode_codes, encode_codes};
use crate::DEFAULT_LEVEL;
use serde::{Deserialize, Serialize};
use skc_core::{Error, Result, StageData, StageOutput, TransformerMetadata, Transformer};
use tracing::debug;

/// Stage name used in logs and errors
pub const STAGE_NAME: &str = "lossless_compress";

/// Compression configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LosslessConfig {
    /// Try Zstandard at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Zstandard level
    #[serde(default = "default_level")]
    pub level: i32,
}

impl Default for LosslessConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            level: default_level(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_level() -> i32 {
    DEFAULT_LEVEL
}

impl LosslessConfig {
    /// Config that never compresses, only serializes.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Check the level against the linked Zstandard's range.
    pub fn validate(&self) -> Result<()> {
        let range = zstd::compression_level_range();
        if !range.contains(&self.level) {
            return Err(Error::config(format!(
                "zstd level {} outside [{}, {}]",
                self.level,
                range.start(),
                range.end()
            )));
        }
        Ok(())
    }
}

/// Serializes codes and compresses them when that saves space.
#[derive(Debug, Clone, Default)]
pub struct LosslessCompressTransformer {
    config: LosslessConfig,
}

impl LosslessCompressTransformer {
    /// Create a transformer; `enabled = false` only serializes.
    pub fn new(enabled: bool) -> Result<Self> {
        Self::from_config(LosslessConfig {
            enabled,
            ..Default::default()
        })
    }

    /// Create from a validated config.
    pub fn from_config(config: LosslessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration
    pub fn config(&self) -> &LosslessConfig {
        &self.config
    }

    /// Serialize `codes`, returning the payload and whether it is compressed.
    pub fn pack(&self, codes: &[u32]) -> Result<(Vec<u8>, bool)> {
        let raw = encode_codes(codes);
        if !self.config.enabled || raw.is_empty() {
            return Ok((raw, false));
        }

        let compressed = zstd::encode_all(raw.as_slice(), self.config.level)?;
        if compressed.len() < raw.len() {
            debug!(
                stage = STAGE_NAME,
                raw = raw.len(),
                compressed = compressed.len(),
                "compressed codes"
            );
            Ok((compressed, true))
        } else {
            debug!(
                stage = STAGE_NAME,
                raw = raw.len(),
                compressed = compressed.len(),
                "compression would not shrink payload, keeping raw layout"
            );
            Ok((raw, false))
        }
    }

    /// Inverse of [`pack`](Self::pack).
    pub fn unpack(&self, payload: &[u8], compressed: bool) -> Result<Vec<u32>> {
        if compressed {
            let raw = zstd::decode_all(payload)
                .map_err(|e| Error::corrupted(format!("zstd decode failed: {e}")))?;
            decode_codes(&raw)
        } else {
            decode_codes(payload)
        }
    }
}

impl Transformer for LosslessCompressTransformer {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn is_lossy(&self) -> bool {
        false
    }

    fn forward(&self, data: StageData) -> Result<StageOutput> {
        let codes = data.into_codes(STAGE_NAME)?;
        let (payload, compressed) = self.pack(&codes)?;
        let metadata = TransformerMetadata::new().with_flag(compressed);
        Ok(StageOutput::new(StageData::Bytes(payload), metadata, true))
    }

    fn backward(&self, data: StageData, metadata: &TransformerMetadata) -> Result<StageData> {
        let payload = data.into_bytes(STAGE_NAME)?;
        let compressed = metadata.flag(STAGE_NAME)?;
        Ok(StageData::Codes(self.unpack(&payload, compressed)?))
    }
}
