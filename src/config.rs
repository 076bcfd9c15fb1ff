//! Configuration traits and implementations for buffer sizing.
//!
//! The `EngineConfig` trait allows compile-time configuration of buffer sizes
//! and validation limits without runtime overhead.

/// Engine configuration trait defining buffer sizes and validation limits.
///
/// All values are const (zero runtime cost). Implementations define bounds for
/// the normalized input buffer, staged string values, passwords, and the
/// response headroom reserve.
pub trait EngineConfig {
    /// Maximum normalized input length (default: 256)
    const MAX_INPUT: usize;

    /// Maximum staged string value length (default: 64)
    const MAX_STRING: usize;

    /// Minimum accepted password length, inclusive (default: 4)
    const MIN_PASSWORD: usize;

    /// Maximum accepted password length, exclusive (default: 16)
    const MAX_PASSWORD: usize;

    /// Response headroom reserved per sub-command (default: 20)
    ///
    /// Must cover the longest completion suffix (`ERR_BUFOVERFLOW\r\n`).
    /// When remaining capacity drops below this, the dispatch loop stops
    /// processing further sub-commands.
    const RESPONSE_RESERVE: usize;
}

/// Default configuration for typical device-configuration firmware.
///
/// - MAX_INPUT: 256 bytes
/// - MAX_STRING: 64 bytes
/// - MIN_PASSWORD: 4 / MAX_PASSWORD: 16
/// - RESPONSE_RESERVE: 20 bytes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl EngineConfig for DefaultConfig {
    const MAX_INPUT: usize = 256;
    const MAX_STRING: usize = 64;
    const MIN_PASSWORD: usize = 4;
    const MAX_PASSWORD: usize = 16;
    const RESPONSE_RESERVE: usize = 20;
}

/// Minimal configuration for resource-constrained targets.
///
/// - MAX_INPUT: 128 bytes
/// - MAX_STRING: 32 bytes
/// - MIN_PASSWORD: 4 / MAX_PASSWORD: 12
/// - RESPONSE_RESERVE: 20 bytes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinimalConfig;

impl EngineConfig for MinimalConfig {
    const MAX_INPUT: usize = 128;
    const MAX_STRING: usize = 32;
    const MIN_PASSWORD: usize = 4;
    const MAX_PASSWORD: usize = 12;
    const RESPONSE_RESERVE: usize = 20;
}
