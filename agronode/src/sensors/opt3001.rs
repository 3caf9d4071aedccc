//! OPT3001 ambient-light sensor.
//!
//! The result register packs a 12-bit mantissa and a 4-bit exponent;
//! lux is `mantissa * 0.01 * 2^exponent`. The driver runs the device in
//! continuous-conversion mode with automatic full-scale ranging, so a read
//! only fetches the latest result register.

use embedded_hal_async::i2c::I2c;

use super::SensorError;

const REG_RESULT: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;
const REG_MANUFACTURER_ID: u8 = 0x7E;

/// Continuous conversions, automatic full-scale range.
const CONFIG_CONTINUOUS: u16 = 0xC410;

/// "TI" in ASCII.
const MANUFACTURER_ID: u16 = 0x5449;

/// OPT3001 driver owning its bus handle.
pub struct Opt3001<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Opt3001<I2C> {
    /// Address with the ADDR pin tied to GND.
    pub const DEFAULT_ADDRESS: u8 = 0x44;

    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, Self::DEFAULT_ADDRESS)
    }

    /// ADDR pin strapping moves the device to 0x45..=0x47.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check the manufacturer-ID register before first use.
    pub async fn probe(&mut self) -> Result<(), SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_MANUFACTURER_ID], &mut buf)
            .await
            .map_err(|_| SensorError::Bus)?;
        if u16::from_be_bytes(buf) != MANUFACTURER_ID {
            return Err(SensorError::NotDetected);
        }
        Ok(())
    }

    /// Switch the device into continuous-conversion mode.
    ///
    /// Safe to call repeatedly; a failure leaves the device in its previous
    /// mode and does not affect later reads.
    pub async fn init(&mut self) -> Result<(), SensorError> {
        let cfg = CONFIG_CONTINUOUS.to_be_bytes();
        self.i2c
            .write(self.address, &[REG_CONFIG, cfg[0], cfg[1]])
            .await
            .map_err(|_| SensorError::Bus)
    }

    /// Fetch and decode the latest conversion result.
    pub async fn read_lux(&mut self) -> Result<f32, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_RESULT], &mut buf)
            .await
            .map_err(|_| SensorError::Bus)?;
        Ok(decode_lux(u16::from_be_bytes(buf)))
    }

    /// Release the underlying bus handle.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Decode a raw result-register word into lux.
///
/// Low 12 bits are the mantissa, high 4 bits the binary exponent.
pub fn decode_lux(raw: u16) -> f32 {
    let mantissa = (raw & 0x0FFF) as f32;
    let exponent = (raw >> 12) & 0x0F;
    mantissa * 0.01 * (1u32 << exponent) as f32
}
