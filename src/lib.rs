//! # cfg-shell
//!
//! AT-style configuration command parser and dispatcher for embedded devices,
//! with zero heap allocation.
//!
//! **Key features:**
//! - **Static allocation** - Command tables live in ROM, zero heap usage
//! - **Typed validation** - u8/i8/u16/i16/u32/i32/f32 and string parameters
//!   with declared limits, converted and range-checked before commit
//! - **Access control** - Password gating per command flag, with a constrained
//!   (SMS-like) interface that fails closed
//! - **Bounded responses** - Response formatting with truncation and an
//!   explicit overflow marker, never exceeding the caller's buffer
//! - **Pluggable storage** - Parameter store, password store and change
//!   notification are traits the host firmware implements
//!
//! The engine is synchronous and runs to completion: one call to
//! [`Engine::dispatch`] normalizes the raw line, walks its delimiter-bounded
//! sub-commands, validates and commits values, and builds the textual reply.
//! The host's line-framing layer (UART reader, socket, SMS transport) decides
//! when to call it.
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;
extern crate subtle;

// Re-export derive macro (same name as the trait, serde-style)
pub use cfg_shell_macros::ParamKeyword;

// ============================================================================
// Module Declarations
// ============================================================================

// Configuration and error handling
pub mod config;
pub mod error;

// Interface policy (delimiters, echo, authentication posture)
pub mod iface;

// Collaborator traits and typed values
pub mod store;

// Command table data model and matcher
pub mod table;

// Input normalization
pub mod normalize;

// Sub-command line parser (indexed/keyword parameter grammar)
pub mod parse;

// Value conversion and validation
pub mod convert;

// Access control and password handling
pub mod auth;

// Response formatting
pub mod respond;

// Dispatch loop
pub mod dispatch;

// Group parameter execution over the line parser
pub mod group;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Configuration
pub use config::{DefaultConfig, EngineConfig, MinimalConfig};

// Error types
pub use error::{CmdError, Outcome};

// Interface selection
pub use iface::Interface;

// Collaborators
pub use store::{ChangeNotifier, NumType, ParamStore, PasswordStore, SlotId, Value};

// Access control
pub use auth::AccessLevel;

// Command table
pub use table::{Descriptor, Flags, UserHandlers, ValueKind, find_command};

// Line parser
pub use parse::{CmdCode, ParamKey, ParamKeyword, ParsedCommand, parse_line};

// Response formatting
pub use respond::ResponseWriter;

// Dispatch engine
pub use dispatch::Engine;

// Group parameters
pub use group::{GroupDispatcher, GroupParams};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
