//! Read JVM classes
//!
//! ### Simple example
//!
//! Consider the following simple Java class:
//!
//! ```java,ignore,no_run
//! class Container {
//!     public static int twice(int x) {
//!         return x + x;
//!     }
//! }
//! ```
//!
//! Once compiled, the body of `twice` can be decoded as follows:
//!
//! ```no_run
//! use class2composer::jvm::class_file::ClassFile;
//! use class2composer::jvm::code::Instruction;
//! use class2composer::jvm::Error;
//!
//! # fn decode() -> Result<(), Error> {
//! let class = ClassFile::load_from_path("Container.class")?;
//! let body = class.method_body("twice")?;
//!
//! // `iload_0`, `iload_0`, `iadd`, `ireturn`
//! for (offset, instruction) in &body.instructions {
//!     println!("{}: {}", offset.0, instruction.opcode().mnemonic());
//! }
//! assert!(matches!(body.instructions[2].1, Instruction::Simple { .. }));
//! # Ok(())
//! # }
//! ```

mod access_flags;
pub mod class_file;
pub mod code;
mod errors;

pub use access_flags::*;
pub use class_file::{
    ClassConstantIndex, Constant, ConstantIndex, ConstantPool, HandleKind, MemberRef,
    NameAndTypeConstantIndex, Utf8ConstantIndex,
};
pub use errors::*;
