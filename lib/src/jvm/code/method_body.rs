use crate::jvm::class_file::{BootstrapMethod, ClassFile, Code, Method};
use crate::jvm::code::Instruction;
use crate::jvm::{ConstantPool, Error, MethodAccessFlags};
use crate::util::Offset;

/// Decoded method body, with everything resolved that a generator needs
///
/// Instructions are in ascending offset order and never overlap. Constants are not copied out
/// of the class: instructions refer to them by index into `constants`.
#[derive(Debug, Clone)]
pub struct MethodBody<'a> {
    /// Binary name of the class declaring the method
    pub class_name: &'a str,
    pub method_name: &'a str,
    pub descriptor: &'a str,
    pub access_flags: MethodAccessFlags,
    pub instructions: Vec<(Offset, Instruction)>,

    /// Length in bytes of the code array (one past the last instruction)
    pub code_length: Offset,
    pub constants: &'a ConstantPool,
    pub exception_table: Vec<ExceptionTableEntry<'a>>,
    pub bootstrap_methods: Vec<BootstrapMethod>,
}

/// Entry in the exception table of a method
///
/// Order within the table matters: the first matching entry handles the exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry<'a> {
    /// Start of the protected range (inclusive)
    pub start: Offset,

    /// End of the protected range (exclusive)
    pub end: Offset,

    pub handler: Offset,

    /// Binary name of the caught class, `None` for catch-all handlers
    pub catch_type: Option<&'a str>,
}

impl<'a> MethodBody<'a> {
    /// Decode the `Code` attribute of a method in a class
    pub fn decode(
        class: &'a ClassFile,
        method: &'a Method,
        code: &Code,
    ) -> Result<MethodBody<'a>, Error> {
        let constants = &class.constants;
        let instructions = Instruction::decode_all(&code.code_array.0)?;

        let mut exception_table = vec![];
        for handler in &code.exception_table {
            let catch_type = if handler.catches_everything() {
                None
            } else {
                Some(constants.class_name(handler.catch_type)?)
            };
            exception_table.push(ExceptionTableEntry {
                start: Offset(handler.start_pc.0 as usize),
                end: Offset(handler.end_pc.0 as usize),
                handler: Offset(handler.handler_pc.0 as usize),
                catch_type,
            });
        }

        Ok(MethodBody {
            class_name: class.class_name()?,
            method_name: constants.utf8(method.name_index)?,
            descriptor: constants.utf8(method.descriptor_index)?,
            access_flags: method.access_flags,
            instructions,
            code_length: Offset(code.code_array.0.len()),
            constants,
            exception_table,
            bootstrap_methods: class.bootstrap_methods()?.0,
        })
    }

    /// Instruction starting exactly at an offset
    ///
    /// Note: this uses binary search to find the offset
    pub fn instruction_at(&self, offset: Offset) -> Option<&Instruction> {
        self.instructions
            .binary_search_by_key(&offset, |(at, _)| *at)
            .ok()
            .map(|idx| &self.instructions[idx].1)
    }
}
