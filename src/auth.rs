//! Access control and password handling.
//!
//! Authentication is per dispatch call: it starts from the interface posture,
//! may be raised by an accepted `PASS=` sub-command, and is forgotten when the
//! call returns. Password comparison is constant-time via `subtle` so a
//! transport-level timing probe learns nothing about prefix matches.

use subtle::ConstantTimeEq;

use crate::error::CmdError;
use crate::table::Flags;

/// Access level the engine enforces commands at.
///
/// Levels select which password-gate flags apply; a deployment picks one
/// level per engine instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessLevel {
    /// Enforce [`Flags::PASS_LVL_0`] gates (the default posture).
    L0,
    /// Enforce [`Flags::PASS_LVL_1`] gates instead.
    L1,
    /// Enforce no write gates (maintenance builds).
    L2,
}

impl AccessLevel {
    /// Whether a SET or user-function command is allowed.
    pub fn set_allowed(self, flags: Flags, authed: bool) -> bool {
        match self {
            AccessLevel::L0 => authed || !flags.contains(Flags::PASS_LVL_0),
            AccessLevel::L1 => authed || !flags.contains(Flags::PASS_LVL_1),
            AccessLevel::L2 => true,
        }
    }
}

/// Whether a GET is allowed on this descriptor.
pub fn read_allowed(flags: Flags, authed: bool) -> Result<(), CmdError> {
    if flags.contains(Flags::READ_DIS) {
        return Err(CmdError::Access);
    }
    if flags.contains(Flags::READ_PASS) && !authed {
        return Err(CmdError::Password);
    }
    Ok(())
}

/// Whether `bytes` is non-empty ASCII alphanumeric (the only characters a
/// password may contain).
pub fn is_alphanumeric(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|b| b.is_ascii_alphanumeric())
}

/// Constant-time comparison of a candidate against the stored password.
///
/// Lengths must match exactly; the byte compare itself never early-exits.
pub fn verify_password(stored: &str, candidate: &[u8]) -> bool {
    let stored = stored.as_bytes();
    stored.len() == candidate.len() && bool::from(stored.ct_eq(candidate))
}

/// In-band pre-authentication scan for the constrained interface.
///
/// The SMS transport carries no session, so the message itself must contain
/// a `PASS=<password>` sub-command somewhere for the call to proceed at all.
/// Scans the normalized buffer for `PASS=` and compares the value up to the
/// next `;` (or end of buffer) against the stored password.
pub fn scan_inband_password(normalized: &[u8], stored: &str) -> bool {
    let needle = b"PASS=";

    let mut start = 0;
    while start + needle.len() <= normalized.len() {
        if &normalized[start..start + needle.len()] == needle {
            let value_start = start + needle.len();
            let value_end = normalized[value_start..]
                .iter()
                .position(|&b| b == b';')
                .map_or(normalized.len(), |p| value_start + p);

            if verify_password(stored, &normalized[value_start..value_end]) {
                return true;
            }
        }
        start += 1;
    }

    false
}
