//! Network credentials and their durable record encoding.
//!
//! The record is a single fixed-length frame written to one flash sector:
//! magic, version, field lengths, field bytes, trailing checksum. Blank
//! flash (all 0xFF), a foreign magic, or a failed checksum all decode to
//! "unprovisioned" rather than an error.

pub const SSID_MAX: usize = 32;
pub const PASSWORD_MAX: usize = 64;

const RECORD_MAGIC: u32 = 0x4146_5343; // "AFSC"
const RECORD_VERSION: u8 = 1;
const HEADER_LEN: usize = 7; // magic + version + ssid_len + password_len
pub const CREDENTIALS_RECORD_LEN: usize = HEADER_LEN + SSID_MAX + PASSWORD_MAX + 1;

/// Wi-Fi join credentials. The SSID is always non-empty; an empty password
/// means an open network and is valid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Credentials {
    ssid: [u8; SSID_MAX],
    ssid_len: u8,
    password: [u8; PASSWORD_MAX],
    password_len: u8,
}

impl Credentials {
    pub fn from_parts(ssid: &str, password: &str) -> Result<Self, &'static str> {
        if ssid.is_empty() {
            return Err("empty ssid");
        }
        if ssid.len() > SSID_MAX || password.len() > PASSWORD_MAX {
            return Err("credentials field too long");
        }
        let mut result = Self {
            ssid: [0u8; SSID_MAX],
            ssid_len: ssid.len() as u8,
            password: [0u8; PASSWORD_MAX],
            password_len: password.len() as u8,
        };
        result.ssid[..ssid.len()].copy_from_slice(ssid.as_bytes());
        result.password[..password.len()].copy_from_slice(password.as_bytes());
        Ok(result)
    }

    pub fn ssid(&self) -> &str {
        core::str::from_utf8(&self.ssid[..self.ssid_len as usize]).unwrap_or("")
    }

    pub fn password(&self) -> &str {
        core::str::from_utf8(&self.password[..self.password_len as usize]).unwrap_or("")
    }

    pub fn encode(&self) -> [u8; CREDENTIALS_RECORD_LEN] {
        let mut record = [0u8; CREDENTIALS_RECORD_LEN];
        record[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
        record[4] = RECORD_VERSION;
        record[5] = self.ssid_len;
        record[6] = self.password_len;
        record[HEADER_LEN..HEADER_LEN + SSID_MAX].copy_from_slice(&self.ssid);
        record[HEADER_LEN + SSID_MAX..HEADER_LEN + SSID_MAX + PASSWORD_MAX]
            .copy_from_slice(&self.password);
        record[CREDENTIALS_RECORD_LEN - 1] = checksum8(&record[..CREDENTIALS_RECORD_LEN - 1]);
        record
    }

    pub fn decode(record: &[u8; CREDENTIALS_RECORD_LEN]) -> Option<Self> {
        if record.iter().all(|&byte| byte == 0xFF) {
            return None;
        }
        if u32::from_le_bytes([record[0], record[1], record[2], record[3]]) != RECORD_MAGIC {
            return None;
        }
        if record[4] != RECORD_VERSION {
            return None;
        }
        let expected = checksum8(&record[..CREDENTIALS_RECORD_LEN - 1]);
        if record[CREDENTIALS_RECORD_LEN - 1] != expected {
            return None;
        }
        let ssid_len = record[5] as usize;
        let password_len = record[6] as usize;
        if ssid_len == 0 || ssid_len > SSID_MAX || password_len > PASSWORD_MAX {
            return None;
        }
        let mut result = Self {
            ssid: [0u8; SSID_MAX],
            ssid_len: ssid_len as u8,
            password: [0u8; PASSWORD_MAX],
            password_len: password_len as u8,
        };
        result.ssid.copy_from_slice(&record[HEADER_LEN..HEADER_LEN + SSID_MAX]);
        result
            .password
            .copy_from_slice(&record[HEADER_LEN + SSID_MAX..HEADER_LEN + SSID_MAX + PASSWORD_MAX]);
        core::str::from_utf8(&result.ssid[..ssid_len]).ok()?;
        core::str::from_utf8(&result.password[..password_len]).ok()?;
        Some(result)
    }
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}
