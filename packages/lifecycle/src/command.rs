//! Remote command channel payload parsing.

/// Commands accepted on `sensors/<id>/command`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Factory reset: clear stored credentials and restart.
    Reset,
}

/// Parse a raw command payload. The only recognized command is `RESET`,
/// compared case-insensitively after trimming ASCII whitespace. Anything
/// else, including empty or non-UTF-8 payloads, is ignored by the caller
/// and never an error.
pub fn parse(payload: &[u8]) -> Option<Command> {
    let text = core::str::from_utf8(payload).ok()?;
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("RESET") {
        Some(Command::Reset)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_matches_any_case() {
        assert_eq!(parse(b"RESET"), Some(Command::Reset));
        assert_eq!(parse(b"reset"), Some(Command::Reset));
        assert_eq!(parse(b"ReSeT"), Some(Command::Reset));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(parse(b"  Reset  "), Some(Command::Reset));
        assert_eq!(parse(b"\tRESET\n"), Some(Command::Reset));
    }

    #[test]
    fn non_reset_payloads_are_ignored() {
        assert_eq!(parse(b""), None);
        assert_eq!(parse(b"resetx"), None);
        assert_eq!(parse(b"stop"), None);
        assert_eq!(parse(b"RE SET"), None);
    }

    #[test]
    fn non_utf8_payloads_are_ignored() {
        assert_eq!(parse(&[0xFF, 0xFE, 0x52]), None);
    }
}
