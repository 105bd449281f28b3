use std::fmt;

/// Error taxonomy for this crate. Fallible operations (ROM loading, mapper
/// construction, bus writes that fall outside a mapper's register window)
/// return this; the CPU's own "unofficial opcode" and "unmapped address"
/// situations are not failures per the spec and are instead logged and
/// handled inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NesError {
    InvalidRom(String),
    UnsupportedMapper(u8),
    MapperBusFault { mapper: u8, address: u16 },
}

impl fmt::Display for NesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NesError::InvalidRom(msg) => write!(f, "invalid iNES ROM: {msg}"),
            NesError::UnsupportedMapper(id) => write!(f, "unsupported mapper number {id}"),
            NesError::MapperBusFault { mapper, address } => write!(
                f,
                "mapper {mapper} bus fault: write to unused register window at ${address:04X}"
            ),
        }
    }
}

impl std::error::Error for NesError {}

pub type NesResult<T> = Result<T, NesError>;
