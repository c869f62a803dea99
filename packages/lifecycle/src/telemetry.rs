//! Telemetry reading assembly and payload encoding.

use core::fmt::Write;

use heapless::String;

use crate::identity::DeviceId;

pub const PAYLOAD_MAX: usize = 96;
pub const PUBLISH_TOPIC: &str = "sensors/humidity";

/// One timestamped sensor sample, built and published once per telemetry
/// cycle, never persisted or queued.
#[derive(Clone, Copy, Debug)]
pub struct Reading {
    pub device_id: DeviceId,
    pub humidity_percent: f32,
    pub timestamp_ms: u64,
}

impl Reading {
    /// Encode the fixed JSON payload published to `sensors/humidity`.
    /// Humidity is emitted with one decimal; the value is already clamped
    /// to [0, 100] by the calibration mapping.
    pub fn encode(&self) -> String<PAYLOAD_MAX> {
        let mut payload = String::new();
        let _ = write!(
            payload,
            "{{\"id\":\"{}\",\"humidity\":{:.1},\"timestamp\":{}}}",
            self.device_id.as_str(),
            self.humidity_percent,
            self.timestamp_ms
        );
        payload
    }
}
