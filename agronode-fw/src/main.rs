#![no_std]
#![no_main]

use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use esp_backtrace as _;
use esp_hal::{
    analog::adc::{Adc, AdcConfig, AdcPin, Attenuation},
    gpio::{GpioPin, Io},
    i2c::I2c,
    peripherals::{ADC1, I2C0},
    prelude::*,
    timer::timg::TimerGroup,
    Async,
};
use log::{error, info};
use static_cell::StaticCell;

use agronode::sensors::opt3001::Opt3001;
use agronode::sensors::shtc3::{Shtc3, TempConversion};
use agronode::{
    periodic_trigger, sampling_worker, LogSink, MoistureAdc, Sampler, SensorError, SAMPLE_PERIOD,
    SAMPLE_REQUESTS,
};

/// Soil probe on GPIO2 (ADC1), 12-bit conversions.
struct SoilProbe {
    adc: Adc<'static, ADC1>,
    pin: AdcPin<GpioPin<2>, ADC1>,
}

impl MoistureAdc for SoilProbe {
    async fn sample(&mut self) -> Result<i16, SensorError> {
        let raw = nb::block!(self.adc.read_oneshot(&mut self.pin)).map_err(|_| SensorError::Adc)?;
        Ok(raw as i16)
    }
}

type NodeBus = I2c<'static, I2C0, Async>;
type NodeI2c = I2cDevice<'static, NoopRawMutex, NodeBus>;
type NodeSampler = Sampler<SoilProbe, NodeI2c, NodeI2c, Delay>;

static I2C_BUS: StaticCell<Mutex<NoopRawMutex, NodeBus>> = StaticCell::new();
static SAMPLER: StaticCell<NodeSampler> = StaticCell::new();
static SINK: StaticCell<LogSink> = StaticCell::new();

#[embassy_executor::task]
async fn trigger_task() {
    periodic_trigger(&SAMPLE_REQUESTS, SAMPLE_PERIOD).await
}

#[embassy_executor::task]
async fn worker_task(sampler: &'static mut NodeSampler, sink: &'static mut LogSink) {
    sampling_worker(&SAMPLE_REQUESTS, sampler, sink).await
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_println::logger::init_logger_from_env();
    info!("agronode firmware starting");

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    let io = Io::new(peripherals.GPIO, peripherals.IO_MUX);

    // Soil probe channel.
    let mut adc_config = AdcConfig::new();
    let soil_pin = adc_config.enable_pin(io.pins.gpio2, Attenuation::Attenuation11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config);
    let probe = SoilProbe { adc, pin: soil_pin };

    // Both bus devices share the one I2C controller on this chip.
    let i2c = I2c::new_async(peripherals.I2C0, io.pins.gpio6, io.pins.gpio7, 100.kHz());
    let bus = I2C_BUS.init(Mutex::new(i2c));

    let mut light = Opt3001::new(I2cDevice::new(bus));
    let mut climate =
        Shtc3::new(I2cDevice::new(bus), Delay).with_conversion(TempConversion::FullRange);

    // A missing mandatory device halts the node outright; there is no
    // partial operation.
    if let Err(e) = light.probe().await {
        panic!("light sensor not ready: {}", e);
    }
    if let Err(e) = climate.wakeup().await {
        panic!("climate sensor not ready: {}", e);
    }
    if let Err(e) = climate.probe().await {
        panic!("climate sensor not ready: {}", e);
    }

    // A failed mode switch is reported but reads are still attempted.
    if let Err(e) = light.init().await {
        error!("light sensor init failed: {}", e);
    }

    let sampler = SAMPLER.init(Sampler::new(probe, light, climate));
    let sink = SINK.init(LogSink);

    spawner.spawn(worker_task(sampler, sink)).ok();
    spawner.spawn(trigger_task()).ok();

    info!("sampling every {} s", SAMPLE_PERIOD.as_secs());
}
