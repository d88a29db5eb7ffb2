use super::{ConstantRenderer, Error, LabelAllocator, Statement};
use crate::jvm::code::{Instruction, Opcode};
use crate::util::Offset;
use std::borrow::Cow;

/// Translates decoded instructions into builder statements
pub struct InstructionTranslator<'a> {
    labels: &'a LabelAllocator,
    constants: ConstantRenderer<'a>,
}

impl<'a> InstructionTranslator<'a> {
    pub fn new(labels: &'a LabelAllocator, constants: ConstantRenderer<'a>) -> Self {
        InstructionTranslator { labels, constants }
    }

    /// Statements for the instruction at an offset
    ///
    /// If the offset is a branch target, this starts with the label bind. Switches produce
    /// nothing else.
    pub fn translate(&self, at: Offset, instruction: &Instruction) -> Result<Vec<Statement>, Error> {
        let mut statements = vec![];
        if let Some(label) = self.labels.get(at) {
            statements.push(Statement::label(label));
        }

        let name = builder_name(instruction.opcode());
        let statement = match instruction {
            Instruction::Simple { opcode, constant } => {
                if opcode.takes_immediate() {
                    Statement::new(format!("{}({})", name, constant))
                } else {
                    Statement::new(format!("{}()", name))
                }
            }

            Instruction::Variable {
                opcode,
                slot,
                increment,
            } => {
                let mut arguments = vec![];
                if opcode.implied_slot().is_none() {
                    arguments.push(slot.to_string());
                }
                if let Some(increment) = increment {
                    arguments.push(increment.to_string());
                }
                Statement::new(format!("{}({})", name, arguments.join(", ")))
            }

            Instruction::Constant {
                opcode,
                index,
                dimensions,
            } => {
                let argument = self.constants.render(*index)?;
                let mut call = String::from(name);
                if argument.registers_class && opcode.mnemonic().starts_with("ldc") {
                    call.push('_');
                }
                call.push('(');
                call.push_str(&argument.text);
                if let Some(dimensions) = dimensions {
                    call.push_str(&format!(", {}", dimensions));
                }
                call.push(')');
                Statement {
                    call,
                    comment: argument.comment,
                }
            }

            Instruction::Branch { relative, .. } => {
                let target = at.jump(*relative).ok_or(Error::UnresolvedBranchTarget {
                    at,
                    relative: *relative,
                })?;
                let label = self.labels.get(target).ok_or(Error::MissingLabel(target))?;
                Statement::new(format!("{}({})", name, label))
            }

            Instruction::Switch { opcode, cases, .. } => {
                log::warn!(
                    "Skipping {} with {} cases at offset {}",
                    opcode.mnemonic(),
                    cases.len(),
                    at.0
                );
                return Ok(statements);
            }
        };

        statements.push(statement);
        Ok(statements)
    }
}

/// Builder method name for an opcode
///
/// Mnemonics that are Java keywords get a trailing underscore, and the comparison branches lose
/// their underscore (`if_icmpeq` becomes `ificmpeq`).
pub fn builder_name(opcode: Opcode) -> Cow<'static, str> {
    match opcode {
        Opcode::Ret
        | Opcode::Return
        | Opcode::Goto
        | Opcode::GotoW
        | Opcode::New
        | Opcode::InstanceOf => Cow::Owned(format!("{}_", opcode.mnemonic())),
        _ if opcode.is_comparison_branch() => Cow::Owned(opcode.mnemonic().replace('_', "")),
        _ => Cow::Borrowed(opcode.mnemonic()),
    }
}
