//! Value conversion and validation.
//!
//! Converts a raw textual payload into a staged [`Value`] according to the
//! descriptor's declared kind. Nothing reaches the parameter store without
//! passing through here first.
//!
//! The numeric path is deliberately strict when limits are declared: the
//! typed digit string must be canonical (no leading zeros, no `+`, no
//! trailing garbage, no fractional part on integer types), verified by
//! formatting the parsed integer back and comparing it with what the user
//! typed.

use core::fmt::Write;

use crate::error::CmdError;
use crate::store::{NumType, Value};

/// Case-insensitive substring scan for the literal `NULL`.
///
/// A payload containing `NULL` anywhere clears the parameter instead of
/// being stored. This matches the original substring semantics, so a string
/// value cannot itself contain the word `NULL` in any casing.
pub fn contains_null_literal(raw: &[u8]) -> bool {
    raw.windows(4).any(|w| w.eq_ignore_ascii_case(b"NULL"))
}

/// Stage a parsed number at the declared type width.
///
/// Casts saturate at the type bounds; range enforcement beyond that is the
/// job of the declared limits.
fn stage(v: f64, ty: NumType) -> Value {
    match ty {
        NumType::U8 => Value::U8(v as u8),
        NumType::I8 => Value::I8(v as i8),
        NumType::U16 => Value::U16(v as u16),
        NumType::I16 => Value::I16(v as i16),
        NumType::U32 => Value::U32(v as u32),
        NumType::I32 => Value::I32(v as i32),
        NumType::F32 => Value::F32(v as f32),
    }
}

/// Convert and validate a numeric payload.
///
/// `limits` is `Some([lo, hi))` when the descriptor carries the `LIM` flag.
/// With limits active, integer types additionally require the payload to be
/// the canonical formatting of the parsed value.
pub fn convert_numeric(
    raw: &[u8],
    ty: NumType,
    limits: Option<[f64; 2]>,
) -> Result<Value, CmdError> {
    let s = core::str::from_utf8(raw).map_err(|_| CmdError::Limit)?;
    let v: f64 = s.parse().map_err(|_| CmdError::Limit)?;

    if let Some([lo, hi]) = limits {
        if ty.is_integer() {
            let n = v as i64;
            let mut canonical = heapless::String::<24>::new();
            // i64 always fits in 24 bytes
            let _ = write!(canonical, "{}", n);
            if canonical.as_str() != s {
                return Err(CmdError::Limit);
            }
        }

        // Written so NaN fails the check
        if !(v >= lo && v < hi) {
            return Err(CmdError::Limit);
        }
    }

    Ok(stage(v, ty))
}

/// Convert and validate a string payload.
///
/// `capacity` is the slot's byte length; a value of length `n` fits when
/// `n + 1 <= capacity` (the slack byte is the committed NUL terminator of
/// the original layout). The literal `NULL` clears instead of copies; bytes
/// are otherwise copied verbatim, preserving case.
pub fn convert_string(raw: &[u8], capacity: usize) -> Result<Value, CmdError> {
    if contains_null_literal(raw) {
        return Ok(Value::Empty);
    }

    if raw.is_empty() || raw.len() + 1 > capacity {
        return Err(CmdError::StrLength);
    }

    let s = core::str::from_utf8(raw).map_err(|_| CmdError::StrLength)?;

    let mut staged = heapless::String::new(); // TODO: Use C::MAX_STRING when const generics stabilize
    staged.push_str(s).map_err(|_| CmdError::StrLength)?;
    Ok(Value::Str(staged))
}
