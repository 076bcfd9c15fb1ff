//! Group parameter execution over the line parser.
//!
//! A group command (e.g. `PRM`) manages an array of configuration elements,
//! each with keyword-addressed fields. [`GroupDispatcher`] is the glue
//! between the engine's user-function hook and a host-side [`GroupParams`]
//! implementation: it parses the sub-command tail and routes the decoded
//! operation, so hosts only implement storage and formatting.

use crate::error::{CmdError, Outcome};
use crate::parse::{CmdCode, ParamKey, parse_line};
use crate::respond::ResponseWriter;
use crate::table::UserHandlers;

/// Host-side behavior of one group parameter command.
///
/// `element` is the decoded index (`None` when the command had no `#n`
/// section); implementations decide whether index-less operations address a
/// default element or are an error.
pub trait GroupParams {
    /// Usage text for the whole command (`?`).
    fn help(&self, out: &mut ResponseWriter<'_>) -> Result<Outcome, CmdError>;

    /// Parameter help (`#?` or `#n?`).
    fn param_help(
        &self,
        element: Option<u16>,
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError>;

    /// Read one field (`#n=KEY=?`, or `=?` without keyword).
    fn get(
        &self,
        element: Option<u16>,
        key: Option<ParamKey>,
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError>;

    /// Dump one element's configuration (`#n=?`).
    fn dump(
        &self,
        element: Option<u16>,
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError>;

    /// Write one field (`#n=KEY=value`, or `=value` without keyword).
    fn set(
        &mut self,
        element: Option<u16>,
        key: Option<ParamKey>,
        data: &[u8],
    ) -> Result<Outcome, CmdError>;

    /// Write a whole element from a raw payload (`#n=a,b,c`).
    fn set_group(&mut self, element: Option<u16>, data: &[u8]) -> Result<Outcome, CmdError>;

    /// Clear one field (`#n=KEY=NULL`).
    fn clear(&mut self, element: Option<u16>, key: Option<ParamKey>) -> Result<Outcome, CmdError>;

    /// Clear a whole element (`#n=NULL`).
    fn clear_group(&mut self, element: Option<u16>) -> Result<Outcome, CmdError>;
}

/// Adapter from the engine's user-function hook to a [`GroupParams`] host.
#[derive(Debug)]
pub struct GroupDispatcher<G> {
    params: G,
}

impl<G: GroupParams> GroupDispatcher<G> {
    /// Wrap a host implementation.
    pub fn new(params: G) -> Self {
        GroupDispatcher { params }
    }

    /// The wrapped host implementation.
    pub fn params(&self) -> &G {
        &self.params
    }

    /// Mutable access to the host implementation.
    pub fn params_mut(&mut self) -> &mut G {
        &mut self.params
    }
}

impl<G: GroupParams> UserHandlers for GroupDispatcher<G> {
    fn handle(
        &mut self,
        _name: &str,
        tail: &[u8],
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError> {
        let cmd = parse_line(tail)?;

        match cmd.code {
            CmdCode::GetHelp => self.params.help(out),
            CmdCode::HelpPrm | CmdCode::HelpElement => self.params.param_help(cmd.arg, out),
            CmdCode::GetPrm => self.params.get(cmd.arg, cmd.key, out),
            CmdCode::GetConfig => self.params.dump(cmd.arg, out),
            CmdCode::SetPrm => self.params.set(cmd.arg, cmd.key, cmd.data),
            CmdCode::SetSomePrm => self.params.set_group(cmd.arg, cmd.data),
            CmdCode::DelPrm => self.params.clear(cmd.arg, cmd.key),
            CmdCode::DelSomePrm => self.params.clear_group(cmd.arg),
            // parse_line never returns a command left in this state
            CmdCode::None => Err(CmdError::Syntax),
        }
    }
}
