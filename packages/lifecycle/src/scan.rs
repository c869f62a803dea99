//! Scan results and their JSON encoding for the portal's `/scan` route.

use core::fmt::Write;

use heapless::{String, Vec};

pub const SSID_DISPLAY_MAX: usize = 32;
pub const SCAN_RESULTS_MAX: usize = 16;
// Worst case: every SSID is 32 escapable characters, doubling to 64 on
// encode. With the per-entry framing that is 88 bytes an entry.
pub const SCAN_JSON_MAX: usize = 1536;
const SCAN_ENTRY_MAX: usize = 96;

/// One visible network from a portal scan. Ephemeral; produced per request
/// and never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedNetwork {
    pub ssid: String<SSID_DISPLAY_MAX>,
    pub rssi: i8,
}

/// Encode the scan response: a JSON array of `{ssid, rssi}` entries in scan
/// order. Hidden APs (empty SSID) are skipped; duplicates are kept as the
/// driver reported them. Zero networks is a valid `[]`, not an error.
///
/// Entries are staged one at a time and appended only when the whole entry
/// plus the closing bracket still fits, so the array stays well-formed even
/// if the buffer runs out.
pub fn encode_scan_json(
    networks: &Vec<ScannedNetwork, SCAN_RESULTS_MAX>,
) -> String<SCAN_JSON_MAX> {
    let mut json = String::new();
    let _ = json.push('[');
    let mut first = true;
    for network in networks {
        if network.ssid.is_empty() {
            continue;
        }
        let mut entry: String<SCAN_ENTRY_MAX> = String::new();
        if !first {
            let _ = entry.push(',');
        }
        let _ = write!(entry, "{{\"ssid\":\"");
        for c in network.ssid.chars() {
            // Keep the payload well-formed for SSIDs containing quotes or
            // backslashes; control characters are dropped.
            match c {
                '"' => {
                    let _ = entry.push_str("\\\"");
                }
                '\\' => {
                    let _ = entry.push_str("\\\\");
                }
                c if c.is_control() => {}
                c => {
                    let _ = entry.push(c);
                }
            }
        }
        let _ = write!(entry, "\",\"rssi\":{}}}", network.rssi);
        if json.len() + entry.len() + 1 > SCAN_JSON_MAX {
            break;
        }
        let _ = json.push_str(entry.as_str());
        first = false;
    }
    let _ = json.push(']');
    json
}
