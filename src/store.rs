//! Collaborator traits and typed parameter values.
//!
//! The engine never owns device configuration. It reads and writes typed
//! values through `ParamStore`, checks and updates the access password
//! through `PasswordStore`, and reports committed changes through
//! `ChangeNotifier` (the hook downstream sync logic polls to learn that
//! configuration changed). The host firmware implements all three.

use crate::error::CmdError;

/// Numeric parameter type tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NumType {
    /// Unsigned 8-bit
    U8,
    /// Signed 8-bit
    I8,
    /// Unsigned 16-bit
    U16,
    /// Signed 16-bit
    I16,
    /// Unsigned 32-bit
    U32,
    /// Signed 32-bit
    I32,
    /// 32-bit float
    F32,
}

impl NumType {
    /// Committed byte width of a value of this type.
    pub const fn size(self) -> usize {
        match self {
            NumType::U8 | NumType::I8 => 1,
            NumType::U16 | NumType::I16 => 2,
            NumType::U32 | NumType::I32 | NumType::F32 => 4,
        }
    }

    /// Whether this is an integer type (floats skip the canonical
    /// digit-string round-trip check).
    pub const fn is_integer(self) -> bool {
        !matches!(self, NumType::F32)
    }
}

/// Key of one parameter slot in the host's store.
///
/// Replaces the raw memory address of the original descriptor table; the
/// store decides what lives behind each slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlotId(pub u16);

impl SlotId {
    /// Reserved slot id reported by the password-change command.
    pub const PASSWORD: SlotId = SlotId(u16::MAX);
}

/// A staged or stored parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unsigned 8-bit
    U8(u8),
    /// Signed 8-bit
    I8(i8),
    /// Unsigned 16-bit
    U16(u16),
    /// Signed 16-bit
    I16(i16),
    /// Unsigned 32-bit
    U32(u32),
    /// Signed 32-bit
    I32(i32),
    /// 32-bit float
    F32(f32),
    /// String value
    Str(heapless::String<64>), // TODO: Use C::MAX_STRING when const generics stabilize

    /// Cleared/empty slot (a string set to `NULL`, or an unpopulated slot)
    Empty,
}

/// Typed parameter storage the engine commits validated values to.
pub trait ParamStore {
    /// Read the current value of a slot.
    fn get(&self, slot: SlotId) -> Value;

    /// Write a validated value to a slot.
    fn set(&mut self, slot: SlotId, value: &Value);

    /// Persist configuration to non-volatile storage.
    ///
    /// Called after a successful SET on a descriptor flagged `CFG_VAL` and
    /// not `RAM_VAL`.
    fn persist(&mut self);
}

/// Access-password storage.
pub trait PasswordStore {
    /// Currently configured password, `None` when none is set.
    fn get(&self) -> Option<&str>;

    /// Replace the password. The engine validates length and character set
    /// before calling this; implementations may still refuse (storage full).
    fn set(&mut self, password: &str) -> Result<(), CmdError>;
}

/// Configuration-change notification.
///
/// Invoked once per successfully committed SET or user-function command with
/// the slot (or [`SlotId::PASSWORD`]) that changed.
pub trait ChangeNotifier {
    /// Record that `slot` changed during this dispatch call.
    fn notify(&mut self, slot: SlotId);
}
