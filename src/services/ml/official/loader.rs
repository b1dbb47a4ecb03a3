//! GGUF loading using Candle patterns

use candle_core::quantized::gguf_file;
use candle_core::{Device, Result};
use candle_transformers::models::quantized_llama::ModelWeights;
use std::path::Path;

/// Positions the quantized llama implementation precomputes rotary tables for.
pub const MAX_CONTEXT: usize = 4096;

pub struct LoadedModel {
    pub weights: ModelWeights,
    pub context_length: usize,
}

pub struct OfficialLoader;

impl OfficialLoader {
    /// Load GGUF using official Candle patterns
    pub fn load_gguf<P: AsRef<Path>>(path: P, device: &Device) -> Result<LoadedModel> {
        let path = path.as_ref();
        tracing::info!("🚀 Loading GGUF from {:?}", path);

        let mut file = std::fs::File::open(path)?;
        let content = gguf_file::Content::read(&mut file).map_err(|e| e.with_path(path))?;

        tracing::info!(
            "📊 GGUF loaded: {} tensors, {} metadata entries",
            content.tensor_infos.len(),
            content.metadata.len()
        );

        let context_length = Self::context_length(&content);
        let weights = ModelWeights::from_gguf(content, &mut file, device)?;

        tracing::info!("✅ Model weights loaded, context length {}", context_length);
        Ok(LoadedModel {
            weights,
            context_length,
        })
    }

    /// Context length from metadata, capped at what the model code supports
    fn context_length(content: &gguf_file::Content) -> usize {
        content
            .metadata
            .get("llama.context_length")
            .and_then(|v| v.to_u32().ok())
            .map(|n| (n as usize).min(MAX_CONTEXT))
            .unwrap_or(MAX_CONTEXT)
    }

    /// Validate GGUF file before loading
    pub fn validate_gguf<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();

        if !path.exists() {
            candle_core::bail!("GGUF file not found: {:?}", path);
        }
        if !Self::is_gguf(path) {
            candle_core::bail!("not a GGUF file: {:?}", path);
        }

        let metadata = std::fs::metadata(path)?;
        let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
        tracing::info!("✅ GGUF validation passed: {:.1} MB", size_mb);
        Ok(())
    }

    /// Check if file is GGUF format
    pub fn is_gguf<P: AsRef<Path>>(path: P) -> bool {
        if let Ok(mut file) = std::fs::File::open(path) {
            let mut magic = [0u8; 4];
            if std::io::Read::read_exact(&mut file, &mut magic).is_ok() {
                // GGUF magic number: GGUF (0x47475546)
                return magic == [0x47, 0x47, 0x55, 0x46];
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_magic_detection() {
        let good = temp_file("good.gguf", b"GGUF\x03\x00\x00\x00");
        let bad = temp_file("bad.gguf", b"PK\x03\x04");

        assert!(OfficialLoader::is_gguf(&good));
        assert!(!OfficialLoader::is_gguf(&bad));
        assert!(OfficialLoader::validate_gguf(&good).is_ok());
        assert!(OfficialLoader::validate_gguf(&bad).is_err());

        let _ = std::fs::remove_file(good);
        let _ = std::fs::remove_file(bad);
    }

    #[test]
    fn test_missing_file() {
        assert!(OfficialLoader::validate_gguf("/definitely/not/here.gguf").is_err());
    }
}
