//! Soil-moisture analog channel.
//!
//! The probe is a plain resistive/capacitive voltage divider on a fixed ADC
//! channel; the platform supplies the converter behind [`MoistureAdc`].

use super::SensorError;

/// Converter resolution for the soil channel.
pub const ADC_RESOLUTION_BITS: u32 = 12;

/// Highest raw count the converter can report.
pub const ADC_FULL_SCALE: i32 = (1 << ADC_RESOLUTION_BITS) - 1;

/// Soil-moisture sampling capability, supplied by the platform.
///
/// The channel index, gain and resolution are fixed at adapter construction
/// time; one call performs one conversion.
pub trait MoistureAdc {
    async fn sample(&mut self) -> Result<i16, SensorError>;
}

/// Convert a raw probe count to a 0-100 % moisture level.
///
/// Counts outside the converter range are clamped first, so a sentinel
/// value maps to 0 %.
pub fn moisture_percent(raw: i16) -> u8 {
    let clamped = (raw as i32).clamp(0, ADC_FULL_SCALE);
    ((clamped * 100) / ADC_FULL_SCALE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_spans_converter_range() {
        assert_eq!(moisture_percent(0), 0);
        assert_eq!(moisture_percent(4095), 100);
        assert_eq!(moisture_percent(2048), 50);
    }

    #[test]
    fn percent_clamps_out_of_range_counts() {
        assert_eq!(moisture_percent(-1), 0);
        assert_eq!(moisture_percent(i16::MAX), 100);
    }
}
