//! Consumers of completed readings.
//!
//! A sink runs synchronously in the worker context, once per cycle. The
//! debug build ships [`LogSink`]; wireless deployments add a
//! [`NotifySink`] over whatever notification transport the platform
//! provides.

use log::{info, warn};

use crate::sensors::{SensorError, SensorReading};

/// Consumer of completed readings; invoked once per cycle.
pub trait ReadingSink {
    async fn on_reading(&mut self, reading: &SensorReading);
}

/// Debug text channel: one formatted line per reading.
///
/// Failed channels show up as their sentinel numbers; making them visible
/// is the point, alerting is not this layer's job.
pub struct LogSink;

impl ReadingSink for LogSink {
    async fn on_reading(&mut self, reading: &SensorReading) {
        info!("{}", reading);
    }
}

/// Wire destination for one reading field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacteristicId(pub u16);

/// Field-to-characteristic routing for the wireless transport.
///
/// Explicit per-field destinations rather than positional indices into an
/// attribute table, so reshaping the table cannot silently reroute a
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyMap {
    pub temperature: CharacteristicId,
    pub moisture: CharacteristicId,
    pub lux: CharacteristicId,
}

/// Notification transport supplied by the platform wireless stack.
pub trait Notifier {
    async fn notify(
        &mut self,
        characteristic: CharacteristicId,
        payload: &[u8],
    ) -> Result<(), SensorError>;
}

/// Wireless sink: three independent little-endian payloads per reading.
pub struct NotifySink<N> {
    notifier: N,
    map: NotifyMap,
}

impl<N: Notifier> NotifySink<N> {
    pub fn new(notifier: N, map: NotifyMap) -> Self {
        Self { notifier, map }
    }
}

impl<N: Notifier> ReadingSink for NotifySink<N> {
    async fn on_reading(&mut self, reading: &SensorReading) {
        // Each field is its own notification; a refused peer write must
        // not hold back the remaining fields.
        if let Err(e) = self
            .notifier
            .notify(self.map.temperature, &reading.temperature.to_le_bytes())
            .await
        {
            warn!("temperature notify failed: {}", e);
        }
        if let Err(e) = self
            .notifier
            .notify(self.map.moisture, &reading.moisture.to_le_bytes())
            .await
        {
            warn!("moisture notify failed: {}", e);
        }
        if let Err(e) = self
            .notifier
            .notify(self.map.lux, &reading.lux.to_le_bytes())
            .await
        {
            warn!("lux notify failed: {}", e);
        }
    }
}

/// Fan one reading out to two sinks, in order.
impl<A: ReadingSink, B: ReadingSink> ReadingSink for (A, B) {
    async fn on_reading(&mut self, reading: &SensorReading) {
        self.0.on_reading(reading).await;
        self.1.on_reading(reading).await;
    }
}
