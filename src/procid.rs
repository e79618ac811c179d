use std::fmt;

/// PROCIDs are usually numeric PIDs; on some systems they carry a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcId {
    Pid(i32),
    Name(String),
}

impl From<&str> for ProcId {
    fn from(s: &str) -> ProcId {
        match s.parse() {
            Ok(pid) => ProcId::Pid(pid),
            Err(_) => ProcId::Name(s.to_string()),
        }
    }
}

impl From<i32> for ProcId {
    fn from(pid: i32) -> ProcId {
        ProcId::Pid(pid)
    }
}

impl fmt::Display for ProcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcId::Pid(pid) => write!(f, "{pid}"),
            ProcId::Name(name) => f.write_str(name),
        }
    }
}
