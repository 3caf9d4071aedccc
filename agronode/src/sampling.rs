//! Periodic sampling: a timer task requests work, a single deferred worker
//! drains it.
//!
//! The request queue has capacity one. An empty queue is the idle state, an
//! occupied queue means a cycle is pending. Timer expiries that land while
//! a request is still pending are coalesced instead of queued, so the
//! backlog is bounded by construction. The trigger side never touches the
//! bus; all device I/O, including the temperature settle delay, happens in
//! the worker task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use embedded_hal_async::{delay::DelayNs, i2c::I2c};
use log::{debug, warn};

use crate::sensors::opt3001::Opt3001;
use crate::sensors::shtc3::Shtc3;
use crate::sensors::{MoistureAdc, SensorReading};
use crate::sink::ReadingSink;

/// Reference cadence of the acquisition loop.
pub const SAMPLE_PERIOD: Duration = Duration::from_secs(2);

/// Marker for one requested acquisition pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRequest;

/// Single-slot request queue between the trigger and the worker.
pub type SampleRequests = Channel<CriticalSectionRawMutex, SampleRequest, 1>;

/// Queue instance shared by the trigger and worker tasks.
pub static SAMPLE_REQUESTS: SampleRequests = Channel::new();

/// Request one sampling cycle.
///
/// Returns `false` when a cycle is already pending and the request was
/// coalesced. Never blocks, so it is safe from timer context.
pub fn request_sample(requests: &SampleRequests) -> bool {
    requests.try_send(SampleRequest).is_ok()
}

/// Trigger task body: request a cycle on every period boundary.
pub async fn periodic_trigger(requests: &SampleRequests, period: Duration) -> ! {
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        if !request_sample(requests) {
            debug!("sample request coalesced, previous cycle still pending");
        }
    }
}

/// Running per-channel failure counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u32,
    pub moisture_errors: u32,
    pub light_errors: u32,
    pub temperature_errors: u32,
}

/// Owns the acquisition channels of one node.
///
/// All device handles are constructed at startup and passed in here; the
/// sampler is the only code that touches them afterwards, so bus access
/// needs no locking.
pub struct Sampler<A, LI, TI, D> {
    moisture: A,
    light: Opt3001<LI>,
    climate: Shtc3<TI, D>,
    stats: CycleStats,
}

impl<A, LI, TI, D> Sampler<A, LI, TI, D>
where
    A: MoistureAdc,
    LI: I2c,
    TI: I2c,
    D: DelayNs,
{
    pub fn new(moisture: A, light: Opt3001<LI>, climate: Shtc3<TI, D>) -> Self {
        Self {
            moisture,
            light,
            climate,
            stats: CycleStats::default(),
        }
    }

    /// One best-effort acquisition pass across all channels.
    ///
    /// A failed channel is logged and reported through its sentinel; it
    /// never aborts the pass and never suppresses the other channels. The
    /// cycle itself cannot fail.
    pub async fn run_cycle(&mut self) -> SensorReading {
        self.stats.cycles = self.stats.cycles.wrapping_add(1);

        let moisture = match self.moisture.sample().await {
            Ok(raw) => raw,
            Err(e) => {
                self.stats.moisture_errors += 1;
                warn!("moisture sample failed: {}", e);
                SensorReading::MOISTURE_FAILED
            }
        };

        let lux = match self.light.read_lux().await {
            Ok(lux) => lux,
            Err(e) => {
                self.stats.light_errors += 1;
                warn!("light read failed: {}", e);
                SensorReading::LUX_FAILED
            }
        };

        let temperature = match self.climate.read_celsius().await {
            Ok(celsius) => celsius,
            Err(e) => {
                self.stats.temperature_errors += 1;
                warn!("temperature read failed: {}", e);
                SensorReading::TEMPERATURE_FAILED
            }
        };

        SensorReading {
            moisture,
            lux,
            temperature,
        }
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }
}

/// Worker task body: drain requests, run cycles, dispatch readings.
///
/// Dequeuing happens before the cycle starts, so a timer expiry during a
/// slow cycle books exactly one follow-up pass. Sinks run synchronously in
/// this context; a slow sink delays the next cycle, nothing else.
pub async fn sampling_worker<A, LI, TI, D, S>(
    requests: &SampleRequests,
    sampler: &mut Sampler<A, LI, TI, D>,
    sink: &mut S,
) -> !
where
    A: MoistureAdc,
    LI: I2c,
    TI: I2c,
    D: DelayNs,
    S: ReadingSink,
{
    loop {
        requests.receive().await;
        let reading = sampler.run_cycle().await;
        sink.on_reading(&reading).await;
    }
}
