//! Turn JVM method bytecode into ProGuard `CompactCodeAttributeComposer` statements
//!
//!   - [`jvm`] decodes class files into method bodies
//!   - [`generate`] turns a method body into a script of builder calls
//!   - [`snippet`] compiles Java source first, then generates from the result

pub mod generate;
pub mod jvm;
pub mod snippet;
pub mod util;
