//! Shared fixtures for the integration tests: mock collaborators, a
//! representative command table and a dispatch helper.

#![allow(dead_code)]

use core::fmt::Write as _;

use cfg_shell::{
    ChangeNotifier, CmdError, DefaultConfig, Descriptor, Engine, Flags, GroupDispatcher,
    GroupParams, Interface, NumType, Outcome, ParamKey, ParamStore, PasswordStore, ResponseWriter,
    SlotId, Value, ValueKind,
};

pub const SLOT_TEMP: SlotId = SlotId(0);
pub const SLOT_CNT: SlotId = SlotId(1);
pub const SLOT_RATIO: SlotId = SlotId(2);
pub const SLOT_RAW: SlotId = SlotId(3);
pub const SLOT_NAME: SlotId = SlotId(4);
pub const SLOT_SECRET: SlotId = SlotId(5);
pub const SLOT_PRM: SlotId = SlotId(6);
pub const SLOT_NOSMS: SlotId = SlotId(7);
pub const SLOT_OLD: SlotId = SlotId(8);
pub const SLOT_ECHOED: SlotId = SlotId(9);

pub const TABLE: &[Descriptor] = &[
    Descriptor {
        name: "TEMP",
        flags: Flags::LIM.with(Flags::CFG_VAL).with(Flags::FLAG_OK),
        kind: ValueKind::Numeric {
            ty: NumType::I16,
            limits: [-40.0, 126.0],
        },
        slot: SLOT_TEMP,
        help: "TEMP=<-40..125 deg C>",
    },
    Descriptor {
        name: "CNT",
        flags: Flags::FLAG_OK,
        kind: ValueKind::Numeric {
            ty: NumType::U32,
            limits: [0.0, 0.0],
        },
        slot: SLOT_CNT,
        help: "CNT=<count>",
    },
    Descriptor {
        name: "RATIO",
        flags: Flags::FLAG_OK,
        kind: ValueKind::Numeric {
            ty: NumType::F32,
            limits: [0.0, 0.0],
        },
        slot: SLOT_RATIO,
        help: "RATIO=<factor>",
    },
    Descriptor {
        name: "RAW",
        flags: Flags::OUT_U32.with(Flags::FLAG_OK),
        kind: ValueKind::Numeric {
            ty: NumType::F32,
            limits: [0.0, 0.0],
        },
        slot: SLOT_RAW,
        help: "RAW=<counts>",
    },
    Descriptor {
        name: "NAME",
        flags: Flags::CFG_VAL.with(Flags::FLAG_OK),
        kind: ValueKind::Str { capacity: 16 },
        slot: SLOT_NAME,
        help: "NAME=<device name>",
    },
    Descriptor {
        name: "SECRET",
        flags: Flags::PASS_LVL_0
            .with(Flags::READ_PASS)
            .with(Flags::FLAG_OK),
        kind: ValueKind::Str { capacity: 16 },
        slot: SLOT_SECRET,
        help: "SECRET=<key>",
    },
    Descriptor {
        name: "PRM",
        flags: Flags::USER_PROCESSING,
        kind: ValueKind::User,
        slot: SLOT_PRM,
        help: "PRM#<n>=<key>=<value>",
    },
    Descriptor {
        name: "NOSMS",
        flags: Flags::SMS_ACCESS_DIS.with(Flags::FLAG_OK),
        kind: ValueKind::Numeric {
            ty: NumType::U8,
            limits: [0.0, 0.0],
        },
        slot: SLOT_NOSMS,
        help: "NOSMS=<0|1>",
    },
    Descriptor {
        name: "OLD",
        flags: Flags::NOT_SUPPORTED,
        kind: ValueKind::Numeric {
            ty: NumType::U8,
            limits: [0.0, 0.0],
        },
        slot: SLOT_OLD,
        help: "",
    },
    Descriptor {
        name: "ECHOED",
        flags: Flags::ECHO.with(Flags::FLAG_OK),
        kind: ValueKind::Numeric {
            ty: NumType::U8,
            limits: [0.0, 0.0],
        },
        slot: SLOT_ECHOED,
        help: "ECHOED=<0|1>",
    },
];

/// In-memory parameter store over one `Value` per slot.
pub struct MockStore {
    pub values: Vec<Value>,
    pub persist_count: usize,
}

impl MockStore {
    pub fn new() -> Self {
        let mut values = vec![Value::Empty; 10];
        values[SLOT_TEMP.0 as usize] = Value::I16(21);
        values[SLOT_CNT.0 as usize] = Value::U32(0);
        values[SLOT_RATIO.0 as usize] = Value::F32(1.5);
        values[SLOT_RAW.0 as usize] = Value::F32(7.9);
        values[SLOT_SECRET.0 as usize] = {
            let mut s = heapless::String::new();
            let _ = s.push_str("s3cr3t");
            Value::Str(s)
        };
        MockStore {
            values,
            persist_count: 0,
        }
    }
}

impl ParamStore for MockStore {
    fn get(&self, slot: SlotId) -> Value {
        self.values
            .get(slot.0 as usize)
            .cloned()
            .unwrap_or(Value::Empty)
    }

    fn set(&mut self, slot: SlotId, value: &Value) {
        if let Some(v) = self.values.get_mut(slot.0 as usize) {
            *v = value.clone();
        }
    }

    fn persist(&mut self) {
        self.persist_count += 1;
    }
}

/// Password store over an optional in-memory string.
pub struct MockPasswords {
    pub password: Option<String>,
}

impl MockPasswords {
    pub fn none() -> Self {
        MockPasswords { password: None }
    }

    pub fn with(password: &str) -> Self {
        MockPasswords {
            password: Some(password.to_string()),
        }
    }
}

impl PasswordStore for MockPasswords {
    fn get(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn set(&mut self, password: &str) -> Result<(), CmdError> {
        self.password = Some(password.to_string());
        Ok(())
    }
}

/// Notifier recording every reported slot in order.
#[derive(Default)]
pub struct MockNotifier {
    pub slots: Vec<SlotId>,
}

impl ChangeNotifier for MockNotifier {
    fn notify(&mut self, slot: SlotId) {
        self.slots.push(slot);
    }
}

/// Group host managing four channels and a phone number.
#[derive(Default)]
pub struct DemoGroup {
    pub channels: [u8; 4],
    pub phone: String,
}

impl DemoGroup {
    fn index(element: Option<u16>) -> Result<usize, CmdError> {
        let i = element.unwrap_or(0) as usize;
        if i < 4 { Ok(i) } else { Err(CmdError::NotExists) }
    }
}

impl GroupParams for DemoGroup {
    fn help(&self, out: &mut ResponseWriter<'_>) -> Result<Outcome, CmdError> {
        out.push_suffix("PRM#<n>=<key>=<value>");
        Ok(Outcome::Continue)
    }

    fn param_help(
        &self,
        _element: Option<u16>,
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError> {
        out.push_suffix("keys: CH, PHONE");
        Ok(Outcome::Continue)
    }

    fn get(
        &self,
        element: Option<u16>,
        key: Option<ParamKey>,
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError> {
        let i = Self::index(element)?;
        match key {
            Some(ParamKey::Channel) => {
                let _ = write!(out, "CH={}\r\n", self.channels[i]);
            }
            Some(ParamKey::Phone) => {
                let text = if self.phone.is_empty() {
                    "NULL"
                } else {
                    self.phone.as_str()
                };
                let _ = write!(out, "PHONE={}\r\n", text);
            }
            _ => return Err(CmdError::NotExists),
        }
        Ok(Outcome::Continue)
    }

    fn dump(
        &self,
        element: Option<u16>,
        out: &mut ResponseWriter<'_>,
    ) -> Result<Outcome, CmdError> {
        let i = Self::index(element)?;
        let _ = write!(out, "PRM#{}: CH={}\r\n", i, self.channels[i]);
        Ok(Outcome::Continue)
    }

    fn set(
        &mut self,
        element: Option<u16>,
        key: Option<ParamKey>,
        data: &[u8],
    ) -> Result<Outcome, CmdError> {
        let i = Self::index(element)?;
        match key {
            Some(ParamKey::Channel) => {
                let s = core::str::from_utf8(data).map_err(|_| CmdError::Limit)?;
                self.channels[i] = s.parse().map_err(|_| CmdError::Limit)?;
                Ok(Outcome::Ok)
            }
            Some(ParamKey::Phone) => {
                let s = core::str::from_utf8(data).map_err(|_| CmdError::StrLength)?;
                self.phone = s.to_string();
                Ok(Outcome::Ok)
            }
            _ => Err(CmdError::NotExists),
        }
    }

    fn set_group(&mut self, element: Option<u16>, data: &[u8]) -> Result<Outcome, CmdError> {
        let i = Self::index(element)?;
        // raw payload: single channel byte
        let s = core::str::from_utf8(data).map_err(|_| CmdError::Limit)?;
        self.channels[i] = s.parse().map_err(|_| CmdError::Limit)?;
        Ok(Outcome::Ok)
    }

    fn clear(
        &mut self,
        element: Option<u16>,
        key: Option<ParamKey>,
    ) -> Result<Outcome, CmdError> {
        let i = Self::index(element)?;
        match key {
            Some(ParamKey::Channel) => self.channels[i] = 0,
            Some(ParamKey::Phone) => self.phone.clear(),
            _ => return Err(CmdError::NotExists),
        }
        Ok(Outcome::Ok)
    }

    fn clear_group(&mut self, element: Option<u16>) -> Result<Outcome, CmdError> {
        let i = Self::index(element)?;
        self.channels[i] = 0;
        Ok(Outcome::Ok)
    }
}

pub type TestEngine = Engine<
    'static,
    MockStore,
    MockPasswords,
    MockNotifier,
    GroupDispatcher<DemoGroup>,
    DefaultConfig,
>;

/// Engine over the fixture table with no password configured.
pub fn engine() -> TestEngine {
    Engine::new(
        TABLE,
        MockStore::new(),
        MockPasswords::none(),
        MockNotifier::default(),
        GroupDispatcher::new(DemoGroup::default()),
    )
}

/// Same, with `password` configured.
pub fn engine_with_password(password: &str) -> TestEngine {
    Engine::new(
        TABLE,
        MockStore::new(),
        MockPasswords::with(password),
        MockNotifier::default(),
        GroupDispatcher::new(DemoGroup::default()),
    )
}

/// Dispatch `input` and return the reply as a string.
pub fn dispatch(engine: &mut TestEngine, input: &str, iface: Interface) -> String {
    let mut buf = [0u8; 256];
    let n = engine.dispatch(input.as_bytes(), &mut buf, iface);
    String::from_utf8_lossy(&buf[..n]).into_owned()
}

/// Dispatch into a caller-sized buffer, returning the reply bytes written.
pub fn dispatch_into(
    engine: &mut TestEngine,
    input: &str,
    buf: &mut [u8],
    iface: Interface,
) -> usize {
    engine.dispatch(input.as_bytes(), buf, iface)
}
