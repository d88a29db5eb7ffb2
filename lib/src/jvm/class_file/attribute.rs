use crate::jvm::class_file::{read_bytes, Deserialize};
use crate::jvm::{ClassConstantIndex, ConstantIndex, ConstantPool, Error, Utf8ConstantIndex};
use byteorder::ReadBytesExt;
use std::io::Cursor;

/// Attributes (used in classes, fields, methods, and even on some attributes)
///
/// Attributes are kept as raw bytes when the class file is read. Only the ones the generator
/// cares about get decoded further, on demand, through [`AttributeLike`].
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name_index: Utf8ConstantIndex,
    pub info: Vec<u8>,
}

impl Deserialize for Attribute {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        let name_index = Utf8ConstantIndex::deserialize(reader)?;

        // Attribute info length is 4 bytes
        let len = u32::deserialize(reader)?;
        let info = read_bytes(reader, len as usize)?;

        Ok(Attribute { name_index, info })
    }
}

/// Attributes are all stored in the same way (see `Attribute`), but internally
/// they represent very different things. This trait is implemented by things
/// which can be decoded out of attributes.
pub trait AttributeLike: Sized {
    /// Name of the attribute
    const NAME: &'static str;

    /// Decode the attribute's `info` bytes
    fn decode(info: &[u8]) -> Result<Self, Error>;

    /// Find and decode the first attribute with a matching name
    fn find(attributes: &[Attribute], constants: &ConstantPool) -> Result<Option<Self>, Error> {
        for attribute in attributes {
            if constants.utf8(attribute.name_index)? == Self::NAME {
                return Self::decode(&attribute.info).map(Some);
            }
        }
        Ok(None)
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.3
#[derive(Debug, Clone)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_array: BytecodeArray,
    pub exception_table: Vec<ExceptionHandler>,
    pub attributes: Vec<Attribute>,
}

impl Deserialize for Code {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Code {
            max_stack: u16::deserialize(reader)?,
            max_locals: u16::deserialize(reader)?,
            code_array: BytecodeArray::deserialize(reader)?,
            exception_table: Vec::deserialize(reader)?,
            attributes: Vec::deserialize(reader)?,
        })
    }
}

impl AttributeLike for Code {
    const NAME: &'static str = "Code";

    fn decode(info: &[u8]) -> Result<Self, Error> {
        Ok(Code::deserialize(&mut Cursor::new(info))?)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExceptionHandler {
    /// Start of exception handler range (inclusive)
    pub start_pc: BytecodeIndex,

    /// End of exception handler range (exclusive)
    pub end_pc: BytecodeIndex,

    /// Start of the exception handler
    pub handler_pc: BytecodeIndex,

    /// Zero means the handler catches everything (eg. `finally` blocks)
    pub catch_type: ClassConstantIndex,
}

impl ExceptionHandler {
    pub fn catches_everything(&self) -> bool {
        (self.catch_type.0).0 == 0
    }
}

impl Deserialize for ExceptionHandler {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        Ok(ExceptionHandler {
            start_pc: BytecodeIndex::deserialize(reader)?,
            end_pc: BytecodeIndex::deserialize(reader)?,
            handler_pc: BytecodeIndex::deserialize(reader)?,
            catch_type: ClassConstantIndex::deserialize(reader)?,
        })
    }
}

/// Encoded bytecode instructions
#[derive(Debug, Clone)]
pub struct BytecodeArray(pub Vec<u8>);

impl Deserialize for BytecodeArray {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        let len = u32::deserialize(reader)?;
        read_bytes(reader, len as usize).map(BytecodeArray)
    }
}

/// Index into `BytecodeArray`
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BytecodeIndex(pub u16);

impl Deserialize for BytecodeIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        u16::deserialize(reader).map(BytecodeIndex)
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.23
#[derive(Debug, Clone, Default)]
pub struct BootstrapMethods(pub Vec<BootstrapMethod>);

impl AttributeLike for BootstrapMethods {
    const NAME: &'static str = "BootstrapMethods";

    fn decode(info: &[u8]) -> Result<Self, Error> {
        Ok(BootstrapMethods(Vec::deserialize(&mut Cursor::new(info))?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapMethod {
    /// Points to a `MethodHandle` constant
    pub method_ref: ConstantIndex,

    /// Static arguments passed to the bootstrap method
    pub arguments: Vec<ConstantIndex>,
}

impl Deserialize for BootstrapMethod {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        Ok(BootstrapMethod {
            method_ref: ConstantIndex::deserialize(reader)?,
            arguments: Vec::deserialize(reader)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::Constant;

    #[test]
    fn decode_code_attribute() {
        let info: Vec<u8> = vec![
            0x00, 0x02, // max_stack
            0x00, 0x01, // max_locals
            0x00, 0x00, 0x00, 0x02, 0x03, 0xAC, // code: iconst_0; ireturn
            0x00, 0x01, // one exception handler
            0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, //
            0x00, 0x00, // no attributes
        ];
        let code = Code::decode(&info).unwrap();
        assert_eq!(code.max_stack, 2);
        assert_eq!(code.code_array.0, vec![0x03, 0xAC]);
        assert_eq!(code.exception_table.len(), 1);
        assert_eq!(code.exception_table[0].end_pc, BytecodeIndex(1));
        assert!(code.exception_table[0].catches_everything());
    }

    #[test]
    fn find_by_name() {
        let mut constants = ConstantPool::new();
        let name = constants.push(Constant::Utf8(String::from("BootstrapMethods")));
        let other = constants.push(Constant::Utf8(String::from("SourceFile")));
        let attributes = vec![
            Attribute {
                name_index: Utf8ConstantIndex(other),
                info: vec![0x00, 0x07],
            },
            Attribute {
                name_index: Utf8ConstantIndex(name),
                info: vec![0x00, 0x01, 0x00, 0x09, 0x00, 0x01, 0x00, 0x0A],
            },
        ];
        let methods = BootstrapMethods::find(&attributes, &constants)
            .unwrap()
            .unwrap();
        assert_eq!(
            methods.0,
            vec![BootstrapMethod {
                method_ref: ConstantIndex(9),
                arguments: vec![ConstantIndex(10)],
            }]
        );
        assert!(Code::find(&attributes, &constants).unwrap().is_none());
    }
}
