//! Sub-command line parser for the indexed/keyword parameter grammar.
//!
//! User-processing commands (e.g. a group-parameter command `PRM`) defer the
//! tail after their name to this parser. The grammar is line-oriented: a `?`
//! only acts as a read/help marker at the very end of the sub-command, never
//! mid-token.
//!
//! Accepted forms (tail shown after the command name):
//!
//! | Tail            | Code          | Meaning                              |
//! |-----------------|---------------|--------------------------------------|
//! | `?`             | `GetHelp`     | usage text                           |
//! | `#?`            | `HelpPrm`     | parameter help, no element given     |
//! | `#3?`           | `HelpElement` | help for element 3                   |
//! | `#3=?`          | `GetConfig`   | dump element 3                       |
//! | `#3=NULL`       | `DelSomePrm`  | clear element 3                      |
//! | `#3=payload`    | `SetSomePrm`  | raw group payload for element 3      |
//! | `#3=CH=5`       | `SetPrm`      | set keyword `CH` of element 3        |
//! | `#3=CH=?`       | `GetPrm`      | read keyword `CH` of element 3       |
//! | `#3=CH=NULL`    | `DelPrm`      | clear keyword `CH` of element 3      |
//! | `=5` / `=?` ... | set/get/del with no keyword and no element           |
//!
//! The element index is at most 3 decimal digits. Keywords match
//! case-insensitively because they sit after a `=` where the normalizer no
//! longer upper-cases.

use crate::error::CmdError;

// The derive macro and the trait share a name (serde-style)
use cfg_shell_macros::ParamKeyword as DeriveParamKeyword;

/// Mapping between textual keywords and parameter-key enumerants.
///
/// Implemented via `#[derive(ParamKeyword)]` from `cfg-shell-macros`.
pub trait ParamKeyword: Sized + Copy {
    /// Resolve a keyword token (ASCII case-insensitive).
    fn from_keyword(token: &[u8]) -> Option<Self>;

    /// Canonical keyword for this key.
    fn keyword(&self) -> &'static str;
}

/// Parameter key addressed by a keyword inside a group command.
///
/// Aliases are intentional: a second mnemonic resolving to the same variant
/// reuses that parameter's slot in a different command context (`CMODE` and
/// `CH` both address the channel slot, `O` and `OUT` the output slot). Do
/// not deduplicate the keywords; call sites rely on both spellings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, DeriveParamKeyword)]
pub enum ParamKey {
    /// Digital output state
    #[keyword("O")]
    #[keyword("OUT")]
    Output,

    /// Digital input state
    #[keyword("IN")]
    Input,

    /// Channel number; `CMODE` (command mode) shares this slot
    #[keyword("CH")]
    #[keyword("CMODE")]
    Channel,

    /// Output power
    #[keyword("PWR")]
    Power,

    /// Access point name
    #[keyword("APN")]
    Apn,

    /// Operating mode
    #[keyword("MODE")]
    Mode,

    /// Element name
    #[keyword("NAME")]
    Name,

    /// Serial baud rate
    #[keyword("BAUD")]
    Baud,

    /// Network address
    #[keyword("ADDR")]
    Addr,

    /// Network mask
    #[keyword("MASK")]
    Mask,

    /// Measured temperature; read from the sensor on demand, so SET is
    /// rejected in the value-parse state machine
    #[keyword("TEMP")]
    SensorTemp,

    /// Signal or trigger level
    #[keyword("LEVEL")]
    Level,

    /// Activation delay
    #[keyword("DELAY")]
    Delay,

    /// Notification phone number
    #[keyword("PHONE")]
    Phone,

    /// Retry count
    #[keyword("RETRY")]
    Retry,

    /// Polling period
    #[keyword("PERIOD")]
    Period,

    /// Alarm threshold
    #[keyword("THRESHLD")]
    Threshold,

    /// Operation timeout
    #[keyword("TOUT")]
    Timeout,
}

impl ParamKey {
    /// Whether SET of this key is rejected (value is read from hardware on
    /// demand; the extended on-demand GET path is deliberately disabled).
    pub fn is_sensor_read(&self) -> bool {
        matches!(self, ParamKey::SensorTemp)
    }
}

/// Operation decoded from one sub-command tail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CmdCode {
    /// Nothing decoded yet
    None,
    /// Usage text for the whole command
    GetHelp,
    /// Parameter help without an element index
    HelpPrm,
    /// Help for one element
    HelpElement,
    /// Read one parameter
    GetPrm,
    /// Dump the configuration of one element
    GetConfig,
    /// Set one parameter
    SetPrm,
    /// Set a whole element from a raw group payload
    SetSomePrm,
    /// Clear one parameter
    DelPrm,
    /// Clear a whole element
    DelSomePrm,
}

/// One decoded sub-command.
///
/// `data` borrows from the normalized input buffer; nothing is copied until
/// the value has been validated. Stack-allocated per sub-command iteration
/// and discarded once the response has been appended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// Decoded operation
    pub code: CmdCode,

    /// Addressed parameter key, `None` for whole-group operations
    pub key: Option<ParamKey>,

    /// Raw value payload (empty for reads/help)
    pub data: &'a [u8],

    /// Element index, `None` when no index was given
    pub arg: Option<u16>,
}

/// Parser states, one per position in the grammar.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    /// Classify the leading byte
    Classify,
    /// Read the optional numeric element index
    Index,
    /// Classify the byte after the index
    PostIndex,
    /// Classify the group-level payload
    GroupLevel,
    /// Match the parameter-name keyword
    Keyword,
    /// Value, read marker, or delete
    Value,
}

/// Case-relaxed comparison against the literal `NULL`.
fn is_null_literal(payload: &[u8]) -> bool {
    payload.eq_ignore_ascii_case(b"NULL")
}

/// Parse the tail of a user-processing sub-command.
///
/// The slice ends where the sub-command delimiter was, so "`?` followed by
/// CR/LF" becomes "`?` at the end of the slice" here.
pub fn parse_line(tail: &[u8]) -> Result<ParsedCommand<'_>, CmdError> {
    let mut cmd = ParsedCommand {
        code: CmdCode::None,
        key: None,
        data: &[],
        arg: None,
    };

    let mut state = State::Classify;
    let mut i = 0;

    while cmd.code == CmdCode::None {
        match state {
            State::Classify => match tail.first() {
                Some(b'?') if tail.len() == 1 => cmd.code = CmdCode::GetHelp,
                Some(b'#') => {
                    i = 1;
                    state = State::Index;
                }
                Some(b'=') => {
                    i = 1;
                    state = State::Value;
                }
                _ => return Err(CmdError::Wrong),
            },

            State::Index => {
                let start = i;
                while i < tail.len() && i - start < 3 && tail[i].is_ascii_digit() {
                    i += 1;
                }
                if i > start {
                    let mut value: u16 = 0;
                    for &d in &tail[start..i] {
                        value = value * 10 + u16::from(d - b'0');
                    }
                    cmd.arg = Some(value);
                }
                state = State::PostIndex;
            }

            State::PostIndex => match tail.get(i) {
                Some(b'?') if i + 1 == tail.len() => {
                    cmd.code = if cmd.arg.is_some() {
                        CmdCode::HelpElement
                    } else {
                        CmdCode::HelpPrm
                    };
                }
                Some(b'#') => {
                    i += 1;
                    state = State::Index;
                }
                Some(b'=') => {
                    i += 1;
                    state = State::GroupLevel;
                }
                _ => return Err(CmdError::Syntax),
            },

            State::GroupLevel => {
                let payload = &tail[i..];
                if payload == b"?" {
                    cmd.code = CmdCode::GetConfig;
                } else if is_null_literal(payload) {
                    cmd.code = CmdCode::DelSomePrm;
                } else if payload.contains(&b'=') {
                    state = State::Keyword;
                } else if !payload.is_empty() {
                    cmd.code = CmdCode::SetSomePrm;
                    cmd.data = payload;
                } else {
                    return Err(CmdError::Syntax);
                }
            }

            State::Keyword => {
                let start = i;
                while i < tail.len() && tail[i] != b'=' {
                    i += 1;
                }
                match ParamKey::from_keyword(&tail[start..i]) {
                    Some(key) => cmd.key = Some(key),
                    None => {
                        cmd.key = None;
                        return Err(CmdError::Syntax);
                    }
                }
                i += 1; // past '='
                state = State::Value;
            }

            State::Value => {
                let payload = &tail[i..];
                if payload == b"?" {
                    cmd.code = CmdCode::GetPrm;
                } else if is_null_literal(payload) {
                    cmd.code = CmdCode::DelPrm;
                } else if payload.is_empty() {
                    return Err(CmdError::Syntax);
                } else if cmd.key.is_some_and(|k| k.is_sensor_read()) {
                    // On-demand sensor values cannot be written
                    return Err(CmdError::Syntax);
                } else {
                    cmd.code = CmdCode::SetPrm;
                    cmd.data = payload;
                }
            }
        }
    }

    Ok(cmd)
}
