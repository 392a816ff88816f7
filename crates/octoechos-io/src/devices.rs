//! Output device enumeration via cpal.

use crate::{Error, Result};
use cpal::Device;
use cpal::traits::{DeviceTrait, HostTrait};

/// Fallback when a device does not report a default config.
const FALLBACK_SAMPLE_RATE: u32 = 48000;

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio output device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub channels: u16,
    /// Whether this is the host's default output.
    pub is_default: bool,
}

impl AudioDevice {
    fn describe(device: &Device, default_name: Option<&str>) -> Option<Self> {
        let name = device_name(device).ok()?;
        let (default_sample_rate, channels) = device
            .default_output_config()
            .map(|c| (c.sample_rate(), c.channels()))
            .unwrap_or((FALLBACK_SAMPLE_RATE, 2));
        Some(Self {
            is_default: default_name == Some(name.as_str()),
            name,
            default_sample_rate,
            channels,
        })
    }
}

/// List the output devices of the default host.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());

    let outputs = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;

    let mut devices: Vec<AudioDevice> = Vec::new();
    for device in outputs {
        if let Some(info) = AudioDevice::describe(&device, default_name.as_deref())
            && !devices.iter().any(|d| d.name == info.name)
        {
            devices.push(info);
        }
    }
    Ok(devices)
}

/// Default output device of the default host, if any.
pub fn default_output_device() -> Result<Option<AudioDevice>> {
    let host = cpal::default_host();
    Ok(host.default_output_device().and_then(|d| {
        let name = device_name(&d).ok();
        AudioDevice::describe(&d, name.as_deref())
    }))
}

/// Find an output device by partial name match (case-insensitive).
pub fn find_output_device_fuzzy(search: &str) -> Result<AudioDevice> {
    let search_lower = search.to_lowercase();
    list_devices()?
        .into_iter()
        .find(|d| d.name.to_lowercase().contains(&search_lower))
        .ok_or_else(|| Error::DeviceNotFound(format!("no output device matching '{}'", search)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_devices_does_not_panic() {
        // Device availability depends on the system.
        let _ = list_devices();
    }

    #[test]
    fn test_fuzzy_miss_is_device_not_found() {
        if let Err(e) = find_output_device_fuzzy("no-such-device-3f9a1c") {
            assert!(matches!(e, Error::DeviceNotFound(_) | Error::Stream(_)));
        }
    }
}
