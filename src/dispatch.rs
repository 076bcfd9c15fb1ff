//! The dispatch loop.
//!
//! [`Engine::dispatch`] is the single entry point: normalize the raw input,
//! establish the authentication posture for this call, then walk the
//! delimiter-bounded sub-commands left to right, executing each one and
//! appending its reply. Errors are local to one sub-command; the loop always
//! moves on to the next.

use core::marker::PhantomData;

use crate::auth::{self, AccessLevel};
use crate::config::EngineConfig;
use crate::convert;
use crate::error::{CmdError, Outcome};
use crate::iface::Interface;
use crate::normalize::normalize;
use crate::respond::ResponseWriter;
use crate::store::{ChangeNotifier, ParamStore, PasswordStore, SlotId};
use crate::table::{Descriptor, Flags, UserHandlers, ValueKind, find_command};

/// What one sub-command asks for, after splitting off the name token.
enum Op<'a> {
    /// `NAME?`
    Get,
    /// `NAME=?`
    Help,
    /// `NAME=<payload>`
    Set(&'a [u8]),
    /// Bare name with neither `?` nor `=`
    Bare,
}

/// Per-call mutable state. Replaces the static scratch of a classic firmware
/// parser, so concurrent engine instances never interfere.
struct Ctx {
    authed: bool,
    /// A sub-command completed silently on purpose; an empty reply is then
    /// legitimate and must not be rewritten into `WRNG CMD`.
    silent: bool,
}

/// Command dispatch engine.
///
/// Owns its collaborators and borrows the static command table. One call to
/// [`Engine::dispatch`] runs to completion; the engine keeps no state between
/// calls except what the collaborators store.
pub struct Engine<'t, S, P, N, U, C> {
    table: &'t [Descriptor],
    store: S,
    passwords: P,
    notifier: N,
    users: U,
    access_level: AccessLevel,
    _config: PhantomData<C>,
}

impl<'t, S, P, N, U, C> core::fmt::Debug for Engine<'t, S, P, N, U, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("commands", &self.table.len())
            .field("access_level", &self.access_level)
            .finish_non_exhaustive()
    }
}

impl<'t, S, P, N, U, C> Engine<'t, S, P, N, U, C>
where
    S: ParamStore,
    P: PasswordStore,
    N: ChangeNotifier,
    U: UserHandlers,
    C: EngineConfig,
{
    /// Create an engine over a command table, enforcing access level 0.
    pub fn new(table: &'t [Descriptor], store: S, passwords: P, notifier: N, users: U) -> Self {
        Engine {
            table,
            store,
            passwords,
            notifier,
            users,
            access_level: AccessLevel::L0,
            _config: PhantomData,
        }
    }

    /// Same, at an explicit access level.
    pub fn with_access_level(
        table: &'t [Descriptor],
        store: S,
        passwords: P,
        notifier: N,
        users: U,
        access_level: AccessLevel,
    ) -> Self {
        Engine {
            access_level,
            ..Engine::new(table, store, passwords, notifier, users)
        }
    }

    /// The parameter store (for host-side reads between dispatch calls).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the parameter store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The change notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The user-function collaborator.
    pub fn users(&self) -> &U {
        &self.users
    }

    /// Process one raw command line and build the reply in `response`.
    ///
    /// Returns the number of reply bytes written. A return of 0 on the
    /// constrained interface may mean the call was refused outright.
    pub fn dispatch(&mut self, raw: &[u8], response: &mut [u8], iface: Interface) -> usize {
        let mut line: heapless::Vec<u8, 256> = heapless::Vec::new(); // TODO: Use C::MAX_INPUT when const generics stabilize
        normalize(raw, &mut line);

        let mut out = ResponseWriter::new(response);
        let mut ctx = Ctx {
            authed: iface.preauthenticated(),
            silent: false,
        };

        if iface == Interface::Sms && !ctx.authed {
            // No session on this transport: the message itself must carry a
            // matching PASS= or the whole call is refused without a reply.
            match self.passwords.get() {
                Some(stored) if auth::scan_inband_password(&line, stored) => {
                    ctx.authed = true;
                }
                _ => return 0,
            }
        }

        if !ctx.authed && self.passwords.get().is_none() {
            // Nothing to authenticate against on an open device
            ctx.authed = true;
        }

        let mut rest = line.as_slice();
        while !rest.is_empty() {
            let end = rest
                .iter()
                .position(|&b| iface.is_delimiter(b))
                .unwrap_or(rest.len());
            let mut segment = &rest[..end];
            rest = &rest[(end + 1).min(rest.len())..];

            while let Some((&last, head)) = segment.split_last() {
                if last == b'\r' || last == b'\n' {
                    segment = head;
                } else {
                    break;
                }
            }
            if segment.is_empty() {
                continue;
            }

            if out.remaining() < C::RESPONSE_RESERVE {
                // Out of reply space: drop the remaining sub-commands
                ctx.silent = true;
                break;
            }

            self.run_subcommand(segment, &mut out, iface, &mut ctx);

            if out.is_overflowed() {
                out.finish_overflow();
                return out.len();
            }
        }

        if out.is_empty() && !ctx.silent {
            out.push_suffix("WRNG CMD");
        }

        out.len()
    }

    fn run_subcommand(
        &mut self,
        segment: &[u8],
        out: &mut ResponseWriter<'_>,
        iface: Interface,
        ctx: &mut Ctx,
    ) {
        let (name, op) = classify(segment);

        let result = if name.eq_ignore_ascii_case(b"PASS") {
            self.run_pass(&op, out)
        } else if name.eq_ignore_ascii_case(b"CHPASS") {
            self.run_chpass(&op, out, ctx)
        } else if let Some((_, descr)) = find_command(self.table, name) {
            self.run_table_command(descr, segment, &op, out, iface, ctx)
        } else if name.len() > 1 {
            if iface.echoes() {
                out.push_bytes(name);
                out.push_crlf();
            }
            Err(CmdError::Wrong)
        } else {
            out.push_suffix("NULL CMD");
            Ok(Outcome::Continue)
        };

        match result {
            Ok(Outcome::PassOk) => {
                ctx.authed = true;
                out.push_suffix("PASS OK");
            }
            Ok(Outcome::Ok) => {
                out.push_suffix("OK");
            }
            Ok(Outcome::Continue) | Ok(Outcome::NoAnswer) => {
                ctx.silent = true;
            }
            Err(err) => {
                let before = out.len();
                out.push_error(err, iface, ctx.authed);
                if out.len() == before && !out.is_overflowed() {
                    // Suppressed by interface policy
                    ctx.silent = true;
                }
            }
        }
    }

    fn run_pass(
        &mut self,
        op: &Op<'_>,
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError> {
        match op {
            Op::Help => {
                out.push_suffix("PASS=<password>");
                Ok(Outcome::Continue)
            }
            Op::Set(candidate) => {
                if !auth::is_alphanumeric(candidate) {
                    return Err(CmdError::Password);
                }
                match self.passwords.get() {
                    Some(stored) if auth::verify_password(stored, candidate) => {
                        Ok(Outcome::PassOk)
                    }
                    _ => Err(CmdError::Password),
                }
            }
            Op::Get => {
                if self.passwords.get().is_none() {
                    out.push_suffix("PASS=NULL");
                    Ok(Outcome::Continue)
                } else {
                    // Never read a configured password back
                    Err(CmdError::Access)
                }
            }
            Op::Bare => Err(CmdError::Wrong),
        }
    }

    fn run_chpass(
        &mut self,
        op: &Op<'_>,
        out: &mut ResponseWriter<'_>,
        ctx: &mut Ctx,
    ) -> Result<Outcome, CmdError> {
        match op {
            Op::Help => {
                out.push_suffix("CHPASS=<new password>");
                Ok(Outcome::Continue)
            }
            Op::Set(candidate) => {
                if self.passwords.get().is_some() && !ctx.authed {
                    return Err(CmdError::Password);
                }
                if candidate.len() < C::MIN_PASSWORD
                    || candidate.len() >= C::MAX_PASSWORD
                    || !auth::is_alphanumeric(candidate)
                {
                    return Err(CmdError::StrLength);
                }
                // Validated alphanumeric ASCII above
                let s = core::str::from_utf8(candidate).map_err(|_| CmdError::StrLength)?;
                self.passwords.set(s)?;
                self.notifier.notify(SlotId::PASSWORD);
                Ok(Outcome::Ok)
            }
            Op::Get | Op::Bare => Err(CmdError::Wrong),
        }
    }

    fn run_table_command(
        &mut self,
        descr: &Descriptor,
        segment: &[u8],
        op: &Op<'_>,
        out: &mut ResponseWriter<'_>,
        iface: Interface,
        ctx: &mut Ctx,
    ) -> Result<Outcome, CmdError> {
        if descr.flags.contains(Flags::NOT_SUPPORTED) {
            return Err(CmdError::NotExists);
        }
        if iface == Interface::Sms && descr.flags.contains(Flags::SMS_ACCESS_DIS) {
            return Err(CmdError::Access);
        }

        if descr.flags.contains(Flags::ECHO) && iface.echoes() {
            out.push_bytes(segment);
            out.push_crlf();
        }

        if let ValueKind::User = descr.kind {
            if !self.access_level.set_allowed(descr.flags, ctx.authed) {
                return Err(CmdError::Password);
            }
            // Hand over everything past the matched name, including any
            // run-on index digits the prefix match consumed
            let tail = &segment[descr.name.len()..];
            let outcome = self.users.handle(descr.name, tail, out)?;
            self.notifier.notify(descr.slot);
            return Ok(outcome);
        }

        match op {
            Op::Get => {
                auth::read_allowed(descr.flags, ctx.authed)?;
                let value = self.store.get(descr.slot);
                out.push_value_line(descr.name, &value, descr.flags);
                Ok(Outcome::Continue)
            }

            Op::Help => {
                out.push_suffix(descr.help);
                Ok(Outcome::Continue)
            }

            Op::Set(payload) => {
                if !self.access_level.set_allowed(descr.flags, ctx.authed) {
                    return Err(CmdError::Password);
                }

                let value = match descr.kind {
                    ValueKind::Numeric { ty, limits } => {
                        let limits = descr.flags.contains(Flags::LIM).then_some(limits);
                        convert::convert_numeric(payload, ty, limits)?
                    }
                    ValueKind::Str { capacity } => convert::convert_string(payload, capacity)?,
                    // User commands were dispatched above
                    ValueKind::User => return Err(CmdError::Syntax),
                };

                self.store.set(descr.slot, &value);
                if descr.flags.contains(Flags::CFG_VAL) && !descr.flags.contains(Flags::RAM_VAL) {
                    self.store.persist();
                }
                self.notifier.notify(descr.slot);

                if descr.flags.contains(Flags::FLAG_OK) {
                    Ok(Outcome::Ok)
                } else {
                    Ok(Outcome::Continue)
                }
            }

            Op::Bare => Err(CmdError::Wrong),
        }
    }
}

/// Split a sub-command into its name token and requested operation.
///
/// The name runs to the first `=`; without one, a trailing `?` selects a
/// read. `NAME=?` is the help form.
fn classify(segment: &[u8]) -> (&[u8], Op<'_>) {
    if let Some(eq) = segment.iter().position(|&b| b == b'=') {
        let name = &segment[..eq];
        let payload = &segment[eq + 1..];
        if payload == b"?" {
            (name, Op::Help)
        } else {
            (name, Op::Set(payload))
        }
    } else if let Some((b'?', name)) = segment.split_last() {
        (name, Op::Get)
    } else {
        (segment, Op::Bare)
    }
}
