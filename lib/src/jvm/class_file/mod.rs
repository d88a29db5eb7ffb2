//! Decoding of the raw `class` file structure
//!
//! Everything here stays close to the layout described in the JVM specification: indices are not
//! resolved and attributes other than `Code` and `BootstrapMethods` are left as raw bytes.

mod attribute;
mod binary_format;
mod class;
mod constants;
mod field;
mod method;

pub use attribute::*;
pub use binary_format::*;
pub use class::*;
pub use constants::*;
pub use field::*;
pub use method::*;
