use super::ConstantIndex;
use crate::util::Offset;
use std::fmt;
use std::io;

/// Ways decoding a class file can go wrong
#[derive(Debug)]
pub enum Error {
    /// Includes the class file being truncated
    IoError(io::Error),

    /// Class file doesn't start with `0xCAFEBABE`
    BadMagic(u32),

    UnknownConstantTag {
        tag: u8,
        index: ConstantIndex,
    },
    UnknownHandleKind(u8),

    /// Constant pool string isn't valid modified UTF-8
    MalformedUtf8(Vec<u8>),

    /// Index doesn't point to the start of a constant
    MissingConstant(ConstantIndex),

    /// Index points to a constant of the wrong kind
    UnexpectedConstant {
        index: ConstantIndex,
        expected: &'static str,
    },

    UnknownOpcode {
        offset: Offset,
        opcode: u8,
    },

    /// `wide` was followed by an opcode it cannot modify
    InvalidWideOpcode {
        offset: Offset,
        opcode: u8,
    },

    /// `tableswitch` with `high < low` or `lookupswitch` with a negative number of pairs
    MalformedSwitch(Offset),

    MissingMethod(String),

    /// Method exists, but is `abstract` or `native`
    MissingCode(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(err) => write!(f, "failed to read class file: {}", err),
            Error::BadMagic(magic) => write!(f, "bad class file magic {:#010x}", magic),
            Error::UnknownConstantTag { tag, index } => {
                write!(f, "unknown constant tag {} at #{}", tag, index.0)
            }
            Error::UnknownHandleKind(kind) => write!(f, "unknown method handle kind {}", kind),
            Error::MalformedUtf8(bytes) => write!(f, "malformed modified UTF-8 {:?}", bytes),
            Error::MissingConstant(index) => write!(f, "no constant at #{}", index.0),
            Error::UnexpectedConstant { index, expected } => {
                write!(f, "constant #{} is not a {}", index.0, expected)
            }
            Error::UnknownOpcode { offset, opcode } => {
                write!(f, "unknown opcode {:#04x} at offset {}", opcode, offset.0)
            }
            Error::InvalidWideOpcode { offset, opcode } => write!(
                f,
                "opcode {:#04x} cannot follow `wide` at offset {}",
                opcode, offset.0
            ),
            Error::MalformedSwitch(offset) => write!(f, "malformed switch at offset {}", offset.0),
            Error::MissingMethod(name) => write!(f, "no method named `{}`", name),
            Error::MissingCode(name) => write!(f, "method `{}` has no code", name),
        }
    }
}

impl std::error::Error for Error {}
