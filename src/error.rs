//! Error and completion codes for command dispatch.
//!
//! Every layer returns a sentinel and the caller branches on it; there is no
//! panic path in library code. Errors are local to one sub-command - the
//! dispatch loop always continues to the next sub-command.

use core::fmt;

/// Command error code.
///
/// The `Display` text of each variant is the exact suffix appended to the
/// response line (without the `\r\n` terminator), so error reporting and wire
/// format cannot drift apart.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CmdError {
    /// Unrecognized leading syntax (maps to `WRNG CMD`)
    Wrong,

    /// Malformed parameter-name or index section (maps to the generic `ERROR`)
    Syntax,

    /// Numeric value out of range or not in canonical form
    Limit,

    /// String value too long, or empty where a value is required
    StrLength,

    /// Password required or password mismatch
    Password,

    /// Access denied (e.g. reading back a configured password)
    Access,

    /// Resource busy (surfaced verbatim from user-function handlers)
    Busy,

    /// Operation timed out (surfaced verbatim from user-function handlers)
    Timeout,

    /// Target does not exist, or command marked unsupported
    NotExists,

    /// Unknown failure (surfaced verbatim from user-function handlers)
    Unknown,

    /// Out of memory (surfaced verbatim from user-function handlers)
    Memory,
}

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmdError::Wrong => write!(f, "WRNG CMD"),
            CmdError::Syntax => write!(f, "ERROR"),
            CmdError::Limit => write!(f, "ERR_LIM"),
            CmdError::StrLength => write!(f, "ERR_LEN"),
            CmdError::Password => write!(f, "ERR_PASS"),
            CmdError::Access => write!(f, "ERR_ACCESS"),
            CmdError::Busy => write!(f, "ERR_BUSY"),
            CmdError::Timeout => write!(f, "ERR_TIMEOUT"),
            CmdError::NotExists => write!(f, "ERR_NOT_EXISTS"),
            CmdError::Unknown => write!(f, "ERR_UNKNOW"),
            CmdError::Memory => write!(f, "ERR_MEM"),
        }
    }
}

/// Successful (or deliberately silent) completion of one sub-command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Command completed; answer `OK`
    Ok,

    /// Password accepted; answer `PASS OK` and authenticate the rest of
    /// this dispatch call
    PassOk,

    /// Command completed but wrote its own reply (or none); stay silent
    Continue,

    /// Suppress the reply entirely
    NoAnswer,
}

impl Outcome {
    /// Wire suffix for this outcome, `None` for the silent variants.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Outcome::Ok => Some("OK"),
            Outcome::PassOk => Some("PASS OK"),
            Outcome::Continue | Outcome::NoAnswer => None,
        }
    }
}
