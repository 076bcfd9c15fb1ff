//! Response formatting.
//!
//! All reply text goes through [`ResponseWriter`], a bounded writer over the
//! caller's buffer. Writes are atomic per call: a piece that does not fit is
//! dropped whole and the writer latches into the overflowed state, which the
//! dispatch loop turns into a trailing `ERR_BUFOVERFLOW` marker.

use core::fmt;

use crate::error::CmdError;
use crate::iface::Interface;
use crate::store::Value;
use crate::table::Flags;

/// Marker appended when the reply no longer fits the caller's buffer.
pub const OVERFLOW_MARK: &[u8] = b"ERR_BUFOVERFLOW\r\n";

/// Bounded writer over the caller's response buffer.
#[derive(Debug)]
pub struct ResponseWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    overflowed: bool,
}

impl<'a> ResponseWriter<'a> {
    /// Wrap a response buffer. Starts empty.
    pub fn new(buf: &'a mut [u8]) -> Self {
        ResponseWriter {
            buf,
            len: 0,
            overflowed: false,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space left in the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Whether any write has been dropped for lack of space.
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Append raw bytes. All-or-nothing: on a miss the writer latches
    /// overflowed and the buffer is left as it was.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> bool {
        if self.overflowed || bytes.len() > self.remaining() {
            self.overflowed = true;
            return false;
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        true
    }

    /// Append a string slice.
    pub fn push_str(&mut self, s: &str) -> bool {
        self.push_bytes(s.as_bytes())
    }

    /// Append a line terminator.
    pub fn push_crlf(&mut self) -> bool {
        self.push_bytes(b"\r\n")
    }

    /// Append a status suffix and terminator, e.g. `OK\r\n`.
    pub fn push_suffix(&mut self, suffix: &str) -> bool {
        self.push_str(suffix) && self.push_crlf()
    }

    /// Append an error suffix, honoring the interface's disclosure policy.
    ///
    /// An unauthenticated caller on the constrained interface gets silence
    /// instead of `ERR_PASS`.
    pub fn push_error(&mut self, err: CmdError, iface: Interface, authed: bool) -> bool {
        if err == CmdError::Password && !authed && !iface.reveals_pass_errors() {
            return true;
        }
        let mut line = heapless::String::<24>::new();
        // every error suffix fits in 24 bytes
        let _ = fmt::Write::write_fmt(&mut line, format_args!("{}", err));
        self.push_suffix(line.as_str())
    }

    /// Append a `NAME=value` reply line for a GET.
    ///
    /// Integers print as-is; floats print with two decimals unless the
    /// descriptor asks for integer truncation; empty values print as `NULL`.
    pub fn push_value_line(&mut self, name: &str, value: &Value, flags: Flags) -> bool {
        if !self.push_str(name) || !self.push_bytes(b"=") {
            return false;
        }

        let mut text = heapless::String::<80>::new();
        let ok = match value {
            Value::U8(v) => fmt::write(&mut text, format_args!("{}", v)).is_ok(),
            Value::I8(v) => fmt::write(&mut text, format_args!("{}", v)).is_ok(),
            Value::U16(v) => fmt::write(&mut text, format_args!("{}", v)).is_ok(),
            Value::I16(v) => fmt::write(&mut text, format_args!("{}", v)).is_ok(),
            Value::U32(v) => fmt::write(&mut text, format_args!("{}", v)).is_ok(),
            Value::I32(v) => fmt::write(&mut text, format_args!("{}", v)).is_ok(),
            Value::F32(v) => {
                if flags.contains(Flags::OUT_U32) {
                    fmt::write(&mut text, format_args!("{}", *v as u32)).is_ok()
                } else {
                    fmt::write(&mut text, format_args!("{:.2}", v)).is_ok()
                }
            }
            Value::Str(s) if !s.is_empty() => text.push_str(s.as_str()).is_ok(),
            Value::Str(_) | Value::Empty => text.push_str("NULL").is_ok(),
        };

        if !ok {
            self.overflowed = true;
            return false;
        }

        self.push_str(text.as_str()) && self.push_crlf()
    }

    /// Terminate an overflowed reply with the overflow marker.
    ///
    /// Rewinds just enough already-written text to make the marker fit, so
    /// the caller always sees it when the buffer itself is large enough.
    pub fn finish_overflow(&mut self) {
        if self.buf.len() < OVERFLOW_MARK.len() {
            self.len = 0;
            return;
        }
        if self.remaining() < OVERFLOW_MARK.len() {
            self.len = self.buf.len() - OVERFLOW_MARK.len();
        }
        self.buf[self.len..self.len + OVERFLOW_MARK.len()].copy_from_slice(OVERFLOW_MARK);
        self.len += OVERFLOW_MARK.len();
    }
}

impl fmt::Write for ResponseWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.push_str(s) { Ok(()) } else { Err(fmt::Error) }
    }
}
