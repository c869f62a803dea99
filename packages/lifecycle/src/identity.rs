use core::fmt::Write;

use heapless::String;

pub const DEVICE_ID_LEN: usize = 12;
pub const AP_NAME_PREFIX: &str = "AgroFlowSensor";
pub const AP_NAME_MAX: usize = 32;
pub const COMMAND_TOPIC_MAX: usize = 40;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Stable device identity derived from the station MAC address.
///
/// Twelve uppercase hex characters, recomputed identically every boot; the
/// MAC is burned into efuse so the id is never persisted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DeviceId {
    bytes: [u8; DEVICE_ID_LEN],
}

impl DeviceId {
    pub fn from_mac(mac: [u8; 6]) -> Self {
        let mut bytes = [0u8; DEVICE_ID_LEN];
        for (index, byte) in mac.iter().enumerate() {
            bytes[index * 2] = HEX_UPPER[(byte >> 4) as usize];
            bytes[index * 2 + 1] = HEX_UPPER[(byte & 0x0F) as usize];
        }
        Self { bytes }
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes).unwrap_or("")
    }

    /// Last three MAC bytes as six hex characters, used in the AP name.
    pub fn ap_suffix(&self) -> &str {
        &self.as_str()[DEVICE_ID_LEN / 2..]
    }

    /// Access point name advertised while provisioning:
    /// `AgroFlowSensor-XXXXXX`.
    pub fn ap_name(&self) -> String<AP_NAME_MAX> {
        let mut name = String::new();
        let _ = write!(name, "{}-{}", AP_NAME_PREFIX, self.ap_suffix());
        name
    }

    /// Per-device command subscription topic: `sensors/<id>/command`.
    pub fn command_topic(&self) -> String<COMMAND_TOPIC_MAX> {
        let mut topic = String::new();
        let _ = write!(topic, "sensors/{}/command", self.as_str());
        topic
    }
}
