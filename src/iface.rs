//! Interface policy: delimiters, echo and authentication posture.
//!
//! The engine is invoked by an external line-framing layer that names the
//! transport the bytes arrived on. The transport decides which byte ends a
//! sub-command, whether echo is ever allowed, and how authentication starts.

/// Transport the command line arrived on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interface {
    /// Generic/local console (interface 0). CR or LF terminates a
    /// sub-command; authentication starts false.
    Console,

    /// Constrained SMS-like transport. `;` terminates; never echoes; fails
    /// closed without a configured, in-band-matched password; suppresses
    /// password errors while unauthenticated.
    Sms,

    /// Trusted server transport. `;` or CR terminates; forced
    /// pre-authenticated.
    Server,
}

impl Interface {
    /// Whether `byte` terminates a sub-command on this interface.
    pub fn is_delimiter(&self, byte: u8) -> bool {
        match self {
            Interface::Console => byte == b'\r' || byte == b'\n',
            Interface::Sms => byte == b';',
            Interface::Server => byte == b';' || byte == b'\r' || byte == b'\n',
        }
    }

    /// Whether command echo is ever emitted on this interface.
    ///
    /// The constrained interface never echoes, regardless of descriptor
    /// flags, to avoid confirming command existence to an SMS sender.
    pub fn echoes(&self) -> bool {
        !matches!(self, Interface::Sms)
    }

    /// Whether this interface starts a dispatch call already authenticated.
    pub fn preauthenticated(&self) -> bool {
        matches!(self, Interface::Server)
    }

    /// Whether password errors are reported while unauthenticated.
    ///
    /// On the constrained interface an unauthenticated caller gets an empty
    /// reply instead of `ERR_PASS`.
    pub fn reveals_pass_errors(&self) -> bool {
        !matches!(self, Interface::Sms)
    }
}
