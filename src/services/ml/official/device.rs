//! Device management utilities

use crate::config::DeviceConfig;
use candle_core::{Device, Result};

pub struct DeviceManager;

impl DeviceManager {
    /// Resolve the configured device, falling back to CPU when the accelerator is missing
    pub fn from_config(config: &DeviceConfig) -> Result<Device> {
        match config {
            DeviceConfig::Auto => Self::detect_optimal_device(),
            DeviceConfig::Cpu => Ok(Device::Cpu),
            DeviceConfig::Cuda(idx) => Device::new_cuda(*idx).or_else(|e| {
                tracing::warn!("CUDA device {} unavailable ({}), using CPU", idx, e);
                Ok(Device::Cpu)
            }),
            DeviceConfig::Metal => Device::new_metal(0).or_else(|e| {
                tracing::warn!("Metal device unavailable ({}), using CPU", e);
                Ok(Device::Cpu)
            }),
        }
    }

    /// Detect optimal device based on availability
    pub fn detect_optimal_device() -> Result<Device> {
        if candle_core::utils::cuda_is_available() {
            if let Ok(device) = Device::new_cuda(0) {
                tracing::info!("🎮 Using CUDA device");
                return Ok(device);
            }
        }

        if candle_core::utils::metal_is_available() {
            if let Ok(device) = Device::new_metal(0) {
                tracing::info!("🎮 Using Metal device");
                return Ok(device);
            }
        }

        tracing::info!("💻 Using CPU device");
        Ok(Device::Cpu)
    }

    /// Get device info string
    pub fn device_info(device: &Device) -> String {
        match device {
            Device::Cpu => "CPU".to_string(),
            Device::Cuda(_) => "CUDA GPU".to_string(),
            Device::Metal(_) => "Metal GPU".to_string(),
        }
    }
}
