//! Sensor types shared across the acquisition channels.

pub mod moisture;
pub mod opt3001;
pub mod shtc3;

pub use moisture::{moisture_percent, MoistureAdc};

/// One completed acquisition pass across all channels.
///
/// Created once per sampling cycle and never mutated afterwards. Each field
/// is independently sentinel-encoded: a failure on one channel never blocks
/// the values of the others (see [`crate::sampling::Sampler::run_cycle`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Raw soil-probe ADC count (12-bit), or [`Self::MOISTURE_FAILED`].
    pub moisture: i16,
    /// Ambient light in lux, or [`Self::LUX_FAILED`].
    pub lux: f32,
    /// Degrees Celsius, or [`Self::TEMPERATURE_FAILED`].
    pub temperature: f32,
}

impl SensorReading {
    /// Moisture channel failed this cycle.
    pub const MOISTURE_FAILED: i16 = -1;
    /// Light channel failed this cycle.
    pub const LUX_FAILED: f32 = -1.0;
    /// Temperature channel failed this cycle.
    pub const TEMPERATURE_FAILED: f32 = -1000.0;

    /// Reading with every channel failed.
    pub const fn failed() -> Self {
        Self {
            moisture: Self::MOISTURE_FAILED,
            lux: Self::LUX_FAILED,
            temperature: Self::TEMPERATURE_FAILED,
        }
    }

    pub fn has_moisture(&self) -> bool {
        self.moisture >= 0
    }

    pub fn has_lux(&self) -> bool {
        self.lux >= 0.0
    }

    pub fn has_temperature(&self) -> bool {
        self.temperature != Self::TEMPERATURE_FAILED
    }
}

impl core::fmt::Display for SensorReading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Temp: {:.2} C | Moisture: {} | Light: {:.2} lx",
            self.temperature, self.moisture, self.lux
        )
    }
}

/// Unified error type for all acquisition channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction failed (address nacked, bus busy, timeout).
    Bus,
    /// Analog conversion failed or the channel was not ready.
    Adc,
    /// Device did not identify at its address.
    NotDetected,
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorError::Bus => write!(f, "bus transaction failed"),
            SensorError::Adc => write!(f, "analog conversion failed"),
            SensorError::NotDetected => write!(f, "device not detected"),
        }
    }
}
