//! Sensor-acquisition core for an environmental/agriculture node.
//!
//! The node samples three channels per cycle: a soil-moisture analog probe,
//! an OPT3001 ambient-light sensor and an SHTC3-style temperature sensor on
//! an addressable bus. The core is transport-agnostic: completed readings
//! are handed to [`sink::ReadingSink`] implementations (debug text line,
//! wireless notifications), and all hardware access goes through
//! capability traits so the same logic runs against mock buses on the host.
//!
//! # Layout
//!
//! - [`sensors`]: reading/error types plus the per-device drivers
//! - [`sampling`]: the acquisition cycle and the coalescing scheduler
//! - [`sink`]: consumers of completed readings
//!
//! Device handles are constructed once at startup and passed explicitly
//! into [`sampling::Sampler`]; the crate holds no ambient device state.

#![cfg_attr(not(test), no_std)]

pub mod sampling;
pub mod sensors;
pub mod sink;

pub use sampling::{
    periodic_trigger, request_sample, sampling_worker, CycleStats, SampleRequest, SampleRequests,
    Sampler, SAMPLE_PERIOD, SAMPLE_REQUESTS,
};
pub use sensors::{moisture_percent, MoistureAdc, SensorError, SensorReading};
pub use sink::{CharacteristicId, LogSink, Notifier, NotifyMap, NotifySink, ReadingSink};
