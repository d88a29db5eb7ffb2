//! Decoded JVM bytecode instructions
//!
//! The representation keeps exactly what is needed to rebuild each instruction through a
//! builder-style API, grouped by the shape of the operands rather than by opcode:
//!
//!   - `wide` doesn't show up at all, but instead gets merged into the instruction it modifies
//!   - `ldc`, `ldc_w`, and `ldc2_w` all become [`Instruction::Constant`], with the constant
//!     index already widened
//!   - operands that a builder recomputes on its own (eg. the `count` of `invokeinterface` or
//!     switch padding) are dropped

use crate::jvm::class_file::Deserialize;
use crate::jvm::code::Opcode;
use crate::jvm::{ConstantIndex, Error};
use crate::util::Offset;
use byteorder::ReadBytesExt;
use std::fmt;
use std::io::Cursor;
use std::slice;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Instruction with no operand or a single immediate operand
    ///
    /// For `bipush`, `sipush`, and `newarray` the constant is the explicit operand. For opcodes
    /// like `iconst_2` it is the implied constant, and for everything else it is zero.
    Simple { opcode: Opcode, constant: i32 },

    /// Local variable access, including `iinc` and `ret`
    ///
    /// Slots implied by the opcode (eg. `aload_0`) are filled in.
    Variable {
        opcode: Opcode,
        slot: u16,
        increment: Option<i16>,
    },

    /// Instruction referencing the constant pool
    Constant {
        opcode: Opcode,
        index: ConstantIndex,

        /// Only for `multianewarray`
        dimensions: Option<u8>,
    },

    /// Conditional or unconditional jump, relative to the instruction's own offset
    Branch { opcode: Opcode, relative: i32 },

    /// `tableswitch` or `lookupswitch`
    ///
    /// Cases are `(match value, relative jump)` pairs. For a `tableswitch`, match values are
    /// consecutive from `low`.
    Switch {
        opcode: Opcode,
        default: i32,
        cases: Vec<(i32, i32)>,
    },
}

/// Relative offsets to which an instruction may jump
pub enum JumpTargets {
    None,
    Single(i32),
    Many(Vec<i32>),
}

impl JumpTargets {
    pub fn relative_offsets(&self) -> &[i32] {
        match self {
            JumpTargets::None => &[],
            JumpTargets::Single(relative) => slice::from_ref(relative),
            JumpTargets::Many(relatives) => relatives,
        }
    }
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Simple { opcode, .. }
            | Instruction::Variable { opcode, .. }
            | Instruction::Constant { opcode, .. }
            | Instruction::Branch { opcode, .. }
            | Instruction::Switch { opcode, .. } => *opcode,
        }
    }

    pub fn jump_targets(&self) -> JumpTargets {
        match self {
            Instruction::Branch { relative, .. } => JumpTargets::Single(*relative),
            Instruction::Switch { default, cases, .. } => JumpTargets::Many(
                std::iter::once(*default)
                    .chain(cases.iter().map(|(_, relative)| *relative))
                    .collect(),
            ),
            _ => JumpTargets::None,
        }
    }

    /// Decode a whole `Code` array, pairing every instruction with its offset
    pub fn decode_all(code: &[u8]) -> Result<Vec<(Offset, Instruction)>, Error> {
        let mut reader = Cursor::new(code);
        let mut instructions = vec![];
        while (reader.position() as usize) < code.len() {
            let at = Offset(reader.position() as usize);
            let instruction = Instruction::decode(&mut reader, at)?;
            instructions.push((at, instruction));
        }
        Ok(instructions)
    }

    /// Decode one instruction
    ///
    /// The offset is needed to skip the alignment padding in switches.
    pub fn decode<R: ReadBytesExt>(reader: &mut R, at: Offset) -> Result<Instruction, Error> {
        use Opcode::*;

        let byte = u8::deserialize(reader)?;
        let opcode = Opcode::from_byte(byte).ok_or(Error::UnknownOpcode {
            offset: at,
            opcode: byte,
        })?;

        let instruction = match opcode {
            BiPush => Instruction::Simple {
                opcode,
                constant: i8::deserialize(reader)? as i32,
            },
            SiPush => Instruction::Simple {
                opcode,
                constant: i16::deserialize(reader)? as i32,
            },
            NewArray => Instruction::Simple {
                opcode,
                constant: u8::deserialize(reader)? as i32,
            },

            IInc => Instruction::Variable {
                opcode,
                slot: u8::deserialize(reader)? as u16,
                increment: Some(i8::deserialize(reader)? as i16),
            },
            _ if opcode.takes_slot() => Instruction::Variable {
                opcode,
                slot: u8::deserialize(reader)? as u16,
                increment: None,
            },
            Wide => {
                let byte = u8::deserialize(reader)?;
                let invalid = Error::InvalidWideOpcode {
                    offset: at,
                    opcode: byte,
                };
                let opcode = Opcode::from_byte(byte).ok_or(invalid)?;
                match opcode {
                    IInc => Instruction::Variable {
                        opcode,
                        slot: u16::deserialize(reader)?,
                        increment: Some(i16::deserialize(reader)?),
                    },
                    _ if opcode.takes_slot() => Instruction::Variable {
                        opcode,
                        slot: u16::deserialize(reader)?,
                        increment: None,
                    },
                    _ => {
                        return Err(Error::InvalidWideOpcode {
                            offset: at,
                            opcode: byte,
                        })
                    }
                }
            }

            Ldc => Instruction::Constant {
                opcode,
                index: ConstantIndex(u8::deserialize(reader)? as u16),
                dimensions: None,
            },
            LdcW | Ldc2W | GetStatic | PutStatic | GetField | PutField | InvokeVirtual
            | InvokeSpecial | InvokeStatic | New | ANewArray | CheckCast | InstanceOf => {
                Instruction::Constant {
                    opcode,
                    index: ConstantIndex::deserialize(reader)?,
                    dimensions: None,
                }
            }
            InvokeInterface => {
                let index = ConstantIndex::deserialize(reader)?;
                let _count = u8::deserialize(reader)?;
                let _zero = u8::deserialize(reader)?;
                Instruction::Constant {
                    opcode,
                    index,
                    dimensions: None,
                }
            }
            InvokeDynamic => {
                let index = ConstantIndex::deserialize(reader)?;
                let _zero = u16::deserialize(reader)?;
                Instruction::Constant {
                    opcode,
                    index,
                    dimensions: None,
                }
            }
            MultiANewArray => Instruction::Constant {
                opcode,
                index: ConstantIndex::deserialize(reader)?,
                dimensions: Some(u8::deserialize(reader)?),
            },

            IfEq | IfNe | IfLt | IfGe | IfGt | IfLe | IfICmpEq | IfICmpNe | IfICmpLt | IfICmpGe
            | IfICmpGt | IfICmpLe | IfACmpEq | IfACmpNe | Goto | Jsr | IfNull | IfNonNull => {
                Instruction::Branch {
                    opcode,
                    relative: i16::deserialize(reader)? as i32,
                }
            }
            GotoW | JsrW => Instruction::Branch {
                opcode,
                relative: i32::deserialize(reader)?,
            },

            TableSwitch => {
                skip_switch_padding(reader, at)?;
                let default = i32::deserialize(reader)?;
                let low = i32::deserialize(reader)?;
                let high = i32::deserialize(reader)?;
                if high < low {
                    return Err(Error::MalformedSwitch(at));
                }
                let mut cases = vec![];
                for value in low..=high {
                    cases.push((value, i32::deserialize(reader)?));
                }
                Instruction::Switch {
                    opcode,
                    default,
                    cases,
                }
            }
            LookupSwitch => {
                skip_switch_padding(reader, at)?;
                let default = i32::deserialize(reader)?;
                let pairs = i32::deserialize(reader)?;
                if pairs < 0 {
                    return Err(Error::MalformedSwitch(at));
                }
                let mut cases = vec![];
                for _ in 0..pairs {
                    let value = i32::deserialize(reader)?;
                    cases.push((value, i32::deserialize(reader)?));
                }
                Instruction::Switch {
                    opcode,
                    default,
                    cases,
                }
            }

            _ => match opcode.implied_slot() {
                Some(slot) => Instruction::Variable {
                    opcode,
                    slot,
                    increment: None,
                },
                None => Instruction::Simple {
                    opcode,
                    constant: opcode.implied_constant().unwrap_or(0),
                },
            },
        };

        Ok(instruction)
    }
}

/// Switch operands start at the next offset that is a multiple of 4
fn skip_switch_padding<R: ReadBytesExt>(reader: &mut R, at: Offset) -> Result<(), Error> {
    let padding = (4 - (at.0 + 1) % 4) % 4;
    for _ in 0..padding {
        u8::deserialize(reader)?;
    }
    Ok(())
}

/// Renders in a `javap`-like format (mostly useful for logging)
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match self {
            Instruction::Simple { opcode, constant } if opcode.takes_immediate() => {
                write!(f, "{} {}", mnemonic, constant)
            }
            Instruction::Simple { .. } => f.write_str(mnemonic),
            Instruction::Variable {
                opcode,
                slot,
                increment,
            } => {
                f.write_str(mnemonic)?;
                if opcode.implied_slot().is_none() {
                    write!(f, " {}", slot)?;
                }
                if let Some(increment) = increment {
                    write!(f, ", {}", increment)?;
                }
                Ok(())
            }
            Instruction::Constant {
                index, dimensions, ..
            } => {
                write!(f, "{} #{}", mnemonic, index.0)?;
                if let Some(dimensions) = dimensions {
                    write!(f, ", {}", dimensions)?;
                }
                Ok(())
            }
            Instruction::Branch { relative, .. } => write!(f, "{} {:+}", mnemonic, relative),
            Instruction::Switch { default, cases, .. } => {
                write!(f, "{} {{ ", mnemonic)?;
                for (value, relative) in cases {
                    write!(f, "{}: {:+}, ", value, relative)?;
                }
                write!(f, "default: {:+} }}", default)
            }
        }
    }
}
