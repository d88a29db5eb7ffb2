use crate::jvm;
use crate::util::Offset;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Branch or switch lands somewhere that isn't the start of an instruction
    UnresolvedBranchTarget { at: Offset, relative: i32 },

    /// Exception table entry (by position in the table) references an offset that isn't the
    /// start of an instruction
    UnresolvedExceptionOffset { entry: usize, offset: Offset },

    /// Label was requested for an offset that analysis never saw as a target
    MissingLabel(Offset),

    /// Constant pool reference failed to resolve
    Constants(jvm::Error),
}

impl From<jvm::Error> for Error {
    fn from(err: jvm::Error) -> Error {
        Error::Constants(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnresolvedBranchTarget { at, relative } => write!(
                f,
                "jump by {} from offset {} does not land on an instruction",
                relative, at.0
            ),
            Error::UnresolvedExceptionOffset { entry, offset } => write!(
                f,
                "exception table entry {} references offset {}, which is not an instruction",
                entry, offset.0
            ),
            Error::MissingLabel(offset) => write!(f, "no label allocated for offset {}", offset.0),
            Error::Constants(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}
