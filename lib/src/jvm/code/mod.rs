//! Bytecode decoding
//!
//! ### Structure
//!
//! Despite being pushed off into [just another method attribute](crate::jvm::class_file::Code),
//! the bytecode is arguably the most important part of the class file - it contains the actual
//! executable instructions. A decoded [`MethodBody`] keeps the [list of bytecode
//! instructions][0] as a sequence of `(offset, instruction)` pairs, since branches and the
//! exception table refer to instructions by offset.
//!
//! Instructions are grouped into five shapes (see [`Instruction`]), which is all a generator
//! needs to dispatch on. The exact opcode is always available through [`Opcode`].
//!
//! [0]: https://docs.oracle.com/javase/specs/jvms/se18/html/jvms-6.html#jvms-6.5

mod instructions;
mod method_body;
mod opcodes;

pub use instructions::*;
pub use method_body::*;
pub use opcodes::*;
