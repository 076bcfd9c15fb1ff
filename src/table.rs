//! Command table data model and matcher.
//!
//! The command table is a static slice of [`Descriptor`] entries defined by
//! the host firmware. Table order is significant: the first matching entry
//! wins. All descriptors are const-initializable and live in ROM.

use crate::error::{CmdError, Outcome};
use crate::respond::ResponseWriter;
use crate::store::{NumType, SlotId};

/// Per-command behavior flags (bitmask).
///
/// Combine in const context with [`Flags::with`]:
///
/// ```ignore
/// const FLAGS: Flags = Flags::CFG_VAL.with(Flags::FLAG_OK);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Flags(u16);

impl Flags {
    /// No flags set
    pub const NONE: Flags = Flags(0);

    /// Echo the raw sub-command text before its result
    pub const ECHO: Flags = Flags(1 << 0);

    /// SET/user-function gated behind authentication at access level 0
    pub const PASS_LVL_0: Flags = Flags(1 << 1);

    /// SET/user-function gated behind authentication at access level 1
    pub const PASS_LVL_1: Flags = Flags(1 << 2);

    /// GET gated behind authentication
    pub const READ_PASS: Flags = Flags(1 << 3);

    /// GET disabled entirely
    pub const READ_DIS: Flags = Flags(1 << 4);

    /// Value belongs to persisted configuration
    pub const CFG_VAL: Flags = Flags(1 << 5);

    /// Value is RAM-only; suppresses persistence even with `CFG_VAL`
    pub const RAM_VAL: Flags = Flags(1 << 6);

    /// Answer `OK` on successful SET (without it, success is silent)
    pub const FLAG_OK: Flags = Flags(1 << 7);

    /// Prefix match allowed: the token may run on past the name
    /// (e.g. trailing index digits consumed by a user function)
    pub const USER_PROCESSING: Flags = Flags(1 << 8);

    /// Command refused on the constrained SMS-like interface
    pub const SMS_ACCESS_DIS: Flags = Flags(1 << 9);

    /// Command present in the table but not supported by this build
    pub const NOT_SUPPORTED: Flags = Flags(1 << 10);

    /// Numeric limits are enforced (with canonical digit-string check)
    pub const LIM: Flags = Flags(1 << 11);

    /// Display a float value as its integer truncation instead of `%.2f`
    pub const OUT_U32: Flags = Flags(1 << 12);

    /// Union of two flag sets (const-friendly `|`).
    pub const fn with(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        self.with(rhs)
    }
}

/// What kind of value a command carries.
///
/// Exactly one kind per descriptor; numeric and string validation paths are
/// mutually exclusive, and user commands bypass both.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ValueKind {
    /// Numeric value of the declared type. `limits` is `[lo, hi)` and only
    /// enforced when [`Flags::LIM`] is set.
    Numeric {
        /// Declared numeric type
        ty: NumType,
        /// Inclusive lower, exclusive upper bound
        limits: [f64; 2],
    },

    /// String value. `capacity` is the byte length of the string slot
    /// including its NUL slack; a value of length `n` fits when
    /// `n + 1 <= capacity`.
    Str {
        /// Slot capacity in bytes
        capacity: usize,
    },

    /// Parsing of the argument tail is deferred entirely to the host's
    /// [`UserHandlers`] collaborator.
    User,
}

/// Static metadata for one registered command.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Command mnemonic (matched case-insensitively; the normalizer
    /// upper-cases the input token before matching)
    pub name: &'static str,

    /// Behavior flags
    pub flags: Flags,

    /// Value kind and validation metadata
    pub kind: ValueKind,

    /// Parameter-store slot this command reads/writes
    pub slot: SlotId,

    /// Help text emitted for `NAME=?`
    pub help: &'static str,
}

/// Execution side of user-function commands.
///
/// Descriptors with [`ValueKind::User`] carry no parsing metadata; the
/// dispatch loop hands the whole argument tail (including any run-on suffix
/// consumed by the prefix match) to this collaborator, which writes its own
/// reply lines and returns a completion code.
pub trait UserHandlers {
    /// Handle the tail of a user-function command.
    ///
    /// `name` is the descriptor name the token matched; `tail` is everything
    /// after it up to the sub-command delimiter.
    fn handle(
        &mut self,
        name: &str,
        tail: &[u8],
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError>;
}

/// Find the best-matching descriptor for a command-name token.
///
/// Exact length+content match wins immediately. A `USER_PROCESSING`
/// descriptor also wins on prefix match when the token is longer than its
/// name. First match in table order wins; `None` when nothing matches.
pub fn find_command<'t>(table: &'t [Descriptor], token: &[u8]) -> Option<(usize, &'t Descriptor)> {
    for (index, descr) in table.iter().enumerate() {
        let name = descr.name.as_bytes();

        if token.len() == name.len() && token.eq_ignore_ascii_case(name) {
            return Some((index, descr));
        }

        if descr.flags.contains(Flags::USER_PROCESSING)
            && token.len() > name.len()
            && token[..name.len()].eq_ignore_ascii_case(name)
        {
            return Some((index, descr));
        }
    }

    None
}
