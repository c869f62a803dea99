//! Minimal `application/x-www-form-urlencoded` body parsing for `/save`.

use heapless::String;

use crate::credentials::{PASSWORD_MAX, SSID_MAX};

/// Fields submitted by the portal configuration form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveForm {
    pub ssid: String<SSID_MAX>,
    pub password: String<PASSWORD_MAX>,
}

/// Extract `ssid` and `password` from a urlencoded body. Unknown fields are
/// skipped; a missing field stays empty. Returns `None` only when a value
/// overflows its buffer or decodes to invalid UTF-8.
pub fn parse_save_form(body: &[u8]) -> Option<SaveForm> {
    let mut form = SaveForm::default();
    for pair in body.split(|&b| b == b'&') {
        if pair.is_empty() {
            continue;
        }
        let mut halves = pair.splitn(2, |&b| b == b'=');
        let key = halves.next()?;
        let value = halves.next().unwrap_or(&[]);
        match key {
            b"ssid" => decode_into(value, &mut form.ssid)?,
            b"password" => decode_into(value, &mut form.password)?,
            _ => {}
        }
    }
    Some(form)
}

fn decode_into<const N: usize>(encoded: &[u8], out: &mut String<N>) -> Option<()> {
    let mut decoded = [0u8; N];
    let mut len = 0usize;
    let mut index = 0usize;
    while index < encoded.len() {
        let byte = match encoded[index] {
            b'+' => {
                index += 1;
                b' '
            }
            b'%' => {
                let high = hex_nibble(*encoded.get(index + 1)?)?;
                let low = hex_nibble(*encoded.get(index + 2)?)?;
                index += 3;
                (high << 4) | low
            }
            other => {
                index += 1;
                other
            }
        };
        if len == N {
            return None;
        }
        decoded[len] = byte;
        len += 1;
    }
    let text = core::str::from_utf8(&decoded[..len]).ok()?;
    out.clear();
    out.push_str(text).ok()?;
    Some(())
}

fn hex_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
