//! Input normalization.
//!
//! First stage of every dispatch call: turn the raw line-framed bytes into a
//! canonical buffer the matcher and parsers can work on. This is a two-pass
//! style transform - the normalized bytes are appended to a fresh buffer, so
//! the rewrite of a bare CR into CRLF never writes past the live input the
//! way an in-place insertion would.
//!
//! Rules, in order per input byte:
//! - space (`0x20`) is dropped;
//! - backspace (`0x08`) removes the previously emitted byte;
//! - `a..z` is upper-cased until the first `=` of the physical line; bytes
//!   after `=` pass through unmodified (passwords and string payloads are
//!   case-sensitive);
//! - a bare `\r` becomes `\r\n`; an immediately following `\n` is absorbed,
//!   so `\r\n` stays `\r\n`. Either terminator resets the `=`-seen state for
//!   the next physical line.
//!
//! Output silently truncates at the buffer bound.

/// Normalize `raw` into `out`, returning the normalized length.
///
/// `out` is cleared first. Truncation at capacity is silent; the dispatch
/// loop simply sees a shorter buffer.
// TODO: Use C::MAX_INPUT when const generics stabilize
pub fn normalize(raw: &[u8], out: &mut heapless::Vec<u8, 256>) -> usize {
    out.clear();

    let mut seen_eq = false;
    let mut i = 0;

    while i < raw.len() {
        let byte = raw[i];
        i += 1;

        match byte {
            b' ' => {}

            0x08 => {
                out.pop();
            }

            b'\r' => {
                if out.push(b'\r').is_err() || out.push(b'\n').is_err() {
                    break;
                }
                // \r\n arrives as one terminator
                if i < raw.len() && raw[i] == b'\n' {
                    i += 1;
                }
                seen_eq = false;
            }

            b'\n' => {
                if out.push(b'\r').is_err() || out.push(b'\n').is_err() {
                    break;
                }
                seen_eq = false;
            }

            b'=' => {
                seen_eq = true;
                if out.push(b'=').is_err() {
                    break;
                }
            }

            b'a'..=b'z' if !seen_eq => {
                if out.push(byte - 0x20).is_err() {
                    break;
                }
            }

            _ => {
                if out.push(byte).is_err() {
                    break;
                }
            }
        }
    }

    out.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &[u8]) -> heapless::Vec<u8, 256> {
        let mut out = heapless::Vec::new();
        normalize(raw, &mut out);
        out
    }

    #[test]
    fn test_spaces_removed() {
        assert_eq!(run(b"TE MP = 25\r").as_slice(), b"TEMP=25\r\n");
    }

    #[test]
    fn test_uppercase_until_equals() {
        assert_eq!(run(b"temp=25\r").as_slice(), b"TEMP=25\r\n");
    }

    #[test]
    fn test_case_preserved_after_equals() {
        // Payload case matters (passwords, strings)
        assert_eq!(run(b"pass=aBc123\r").as_slice(), b"PASS=aBc123\r\n");
    }

    #[test]
    fn test_uppercase_state_resets_per_line() {
        let out = run(b"name=abc\rmode=xyz\r");
        assert_eq!(out.as_slice(), b"NAME=abc\r\nMODE=xyz\r\n");
    }

    #[test]
    fn test_bare_cr_becomes_crlf() {
        assert_eq!(run(b"TEMP?\r").as_slice(), b"TEMP?\r\n");
    }

    #[test]
    fn test_crlf_stays_crlf() {
        assert_eq!(run(b"TEMP?\r\n").as_slice(), b"TEMP?\r\n");
    }

    #[test]
    fn test_bare_lf_becomes_crlf() {
        assert_eq!(run(b"TEMP?\n").as_slice(), b"TEMP?\r\n");
    }

    #[test]
    fn test_backspace_edits() {
        assert_eq!(run(b"TEMQ\x08P=1\r").as_slice(), b"TEMP=1\r\n");
    }

    #[test]
    fn test_backspace_on_empty_output() {
        assert_eq!(run(b"\x08\x08TEMP?\r").as_slice(), b"TEMP?\r\n");
    }

    #[test]
    fn test_semicolon_passthrough() {
        assert_eq!(run(b"a=1;b=2").as_slice(), b"A=1;b=2");
    }

    #[test]
    fn test_truncation_is_silent() {
        let mut out = heapless::Vec::new();
        let big = [b'A'; 512];
        let n = normalize(&big, &mut out);
        assert_eq!(n, 256);
        assert_eq!(out.len(), 256);
    }

    #[test]
    fn test_returns_length() {
        let mut out = heapless::Vec::new();
        assert_eq!(normalize(b"AB=c\r", &mut out), 6);
    }
}
