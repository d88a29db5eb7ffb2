use crate::jvm::class_file::{read_bytes, Deserialize};
use crate::jvm::Error;
use crate::util::{Offset, OffsetResult, OffsetVec, Width};
use byteorder::ReadBytesExt;
use std::fmt;

/// Class file constants pool, as decoded
///
/// Entries reference each other by index, exactly like in the class file. The helper methods
/// (eg. [`ConstantPool::class_name`]) chase those indices and check that each one points to the
/// expected kind of constant.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    constants: OffsetVec<Constant>,
}

impl ConstantPool {
    /// Make a fresh empty constants pool
    pub fn new() -> ConstantPool {
        ConstantPool {
            constants: OffsetVec::new_starting_at(Offset(1)),
        }
    }

    /// Read a constants pool (starting from the `constant_pool_count`)
    pub fn read<R: ReadBytesExt>(reader: &mut R) -> Result<ConstantPool, Error> {
        let count = u16::deserialize(reader)?;
        let mut pool = ConstantPool::new();
        while pool.constants.offset_len().0 < count as usize {
            let index = ConstantIndex(pool.constants.offset_len().0 as u16);
            let constant = Constant::read(reader, index)?;
            pool.push(constant);
        }
        Ok(pool)
    }

    /// Append a constant, returning its index
    pub fn push(&mut self, constant: Constant) -> ConstantIndex {
        ConstantIndex(self.constants.push(constant).0 as u16)
    }

    /// Number of constants (`long` and `double` count once)
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn get(&self, index: ConstantIndex) -> Result<&Constant, Error> {
        match self.constants.get_offset(Offset(index.0 as usize)) {
            OffsetResult::Ok(_, constant) => Ok(constant),
            OffsetResult::InvalidOffset(_) | OffsetResult::TooLarge => {
                Err(Error::MissingConstant(index))
            }
        }
    }

    pub fn utf8(&self, index: Utf8ConstantIndex) -> Result<&str, Error> {
        match self.get(index.0)? {
            Constant::Utf8(string) => Ok(string),
            _ => Err(Error::UnexpectedConstant {
                index: index.0,
                expected: "Utf8",
            }),
        }
    }

    /// Binary name of a class (eg. `java/lang/String` or `[I`)
    pub fn class_name(&self, index: ClassConstantIndex) -> Result<&str, Error> {
        match self.get(index.0)? {
            Constant::Class(name) => self.utf8(*name),
            _ => Err(Error::UnexpectedConstant {
                index: index.0,
                expected: "Class",
            }),
        }
    }

    /// Name and descriptor
    pub fn name_and_type(&self, index: NameAndTypeConstantIndex) -> Result<(&str, &str), Error> {
        match self.get(index.0)? {
            Constant::NameAndType { name, descriptor } => {
                Ok((self.utf8(*name)?, self.utf8(*descriptor)?))
            }
            _ => Err(Error::UnexpectedConstant {
                index: index.0,
                expected: "NameAndType",
            }),
        }
    }

    /// Resolve a field or method reference
    pub fn member(&self, index: ConstantIndex) -> Result<MemberRef<'_>, Error> {
        let (class, name_and_type, is_interface) = match self.get(index)? {
            Constant::FieldRef(class, name_and_type) => (class, name_and_type, false),
            Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            } => (class, name_and_type, *is_interface),
            _ => {
                return Err(Error::UnexpectedConstant {
                    index,
                    expected: "FieldRef or MethodRef",
                })
            }
        };
        let (name, descriptor) = self.name_and_type(*name_and_type)?;
        Ok(MemberRef {
            owner: self.class_name(*class)?,
            name,
            descriptor,
            is_interface,
        })
    }

    /// Best-effort human readable description of any constant
    ///
    /// References are followed where possible, falling back to the raw index representation
    /// whenever they don't resolve.
    pub fn describe(&self, index: ConstantIndex) -> String {
        let constant = match self.get(index) {
            Ok(constant) => constant,
            Err(_) => return format!("#{}", index.0),
        };
        let resolved: Result<String, Error> = match constant {
            Constant::Utf8(string) => Ok(string.clone()),
            Constant::Integer(integer) => Ok(integer.to_string()),
            Constant::Float(float) => Ok(float.to_string()),
            Constant::Long(long) => Ok(long.to_string()),
            Constant::Double(double) => Ok(double.to_string()),
            Constant::Class(name) | Constant::String(name) => self.utf8(*name).map(String::from),
            Constant::FieldRef(..) | Constant::MethodRef { .. } => self
                .member(index)
                .map(|member| format!("{}", member)),
            Constant::NameAndType { name, descriptor } => self
                .utf8(*name)
                .and_then(|name| Ok(format!("{}:{}", name, self.utf8(*descriptor)?))),
            Constant::MethodHandle {
                handle_kind,
                member,
            } => self
                .member(*member)
                .map(|member| format!("{:?} {}", handle_kind, member)),
            Constant::MethodType { descriptor } => self.utf8(*descriptor).map(String::from),
            Constant::Dynamic {
                bootstrap_method,
                name_and_type,
            } => self
                .name_and_type(*name_and_type)
                .map(|(name, desc)| format!("#{}:{}:{}", bootstrap_method, name, desc)),
            Constant::InvokeDynamic {
                bootstrap_method,
                method_descriptor,
            } => self
                .name_and_type(*method_descriptor)
                .map(|(name, desc)| format!("#{}:{}{}", bootstrap_method, name, desc)),
            Constant::Module(name) | Constant::Package(name) => {
                self.utf8(*name).map(String::from)
            }
        };
        resolved.unwrap_or_else(|_| constant.to_string())
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        ConstantPool::new()
    }
}

/// Resolved `CONSTANT_Fieldref_info`, `CONSTANT_Methodref_info`, or
/// `CONSTANT_InterfaceMethodref_info`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemberRef<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
    pub is_interface: bool,
}

impl fmt::Display for MemberRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.owner, self.name, self.descriptor)
    }
}

/// Constants as in the constant pool
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se17/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Class or an interface
    Class(Utf8ConstantIndex),

    /// Field
    FieldRef(ClassConstantIndex, NameAndTypeConstantIndex),

    /// Method (this combines `Methodref` and `InterfaceMethodref`
    MethodRef {
        class: ClassConstantIndex,
        name_and_type: NameAndTypeConstantIndex,
        is_interface: bool,
    },

    /// Constant object of type `java.lang.String`
    String(Utf8ConstantIndex),

    /// Constant primitive of type `int`
    Integer(i32),

    /// Constant primitive of type `float`
    Float(f32),

    /// Constant primitive of type `long`
    Long(i64),

    /// Constant primitive of type `double`
    Double(f64),

    /// Name and a type (eg. for a field or a method)
    NameAndType {
        name: Utf8ConstantIndex,
        descriptor: Utf8ConstantIndex,
    },

    /// Constant UTF-8 encoded raw string value
    ///
    /// Already decoded from the class file's modified UTF-8 (see [`decode_modified_utf8`]).
    Utf8(String),

    /// Constant object of type `java.lang.invoke.MethodHandle`
    MethodHandle {
        handle_kind: HandleKind,

        /// Depending on the method kind, this points to different things:
        ///
        ///   - `FieldRef` for `GetField`, `GetStatic`, `PutField`, `PutStatic`
        ///   - `MethodRef` for the rest
        member: ConstantIndex,
    },

    /// Method type
    MethodType { descriptor: Utf8ConstantIndex },

    /// Dynamically-computed constant
    Dynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        name_and_type: NameAndTypeConstantIndex,
    },

    /// Dynamically-computed call site
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        method_descriptor: NameAndTypeConstantIndex,
    },

    Module(Utf8ConstantIndex),
    Package(Utf8ConstantIndex),
}

impl Constant {
    /// Read one constant, including its leading tag
    ///
    /// The index is only used for error reporting.
    pub fn read<R: ReadBytesExt>(reader: &mut R, index: ConstantIndex) -> Result<Constant, Error> {
        let tag = u8::deserialize(reader)?;
        let constant = match tag {
            1 => {
                let len = u16::deserialize(reader)?;
                let bytes = read_bytes(reader, len as usize)?;
                Constant::Utf8(decode_modified_utf8(&bytes)?)
            }
            3 => Constant::Integer(i32::deserialize(reader)?),
            4 => Constant::Float(f32::deserialize(reader)?),
            5 => Constant::Long(i64::deserialize(reader)?),
            6 => Constant::Double(f64::deserialize(reader)?),
            7 => Constant::Class(Utf8ConstantIndex::deserialize(reader)?),
            8 => Constant::String(Utf8ConstantIndex::deserialize(reader)?),
            9 => Constant::FieldRef(
                ClassConstantIndex::deserialize(reader)?,
                NameAndTypeConstantIndex::deserialize(reader)?,
            ),
            10 | 11 => Constant::MethodRef {
                class: ClassConstantIndex::deserialize(reader)?,
                name_and_type: NameAndTypeConstantIndex::deserialize(reader)?,
                is_interface: tag == 11,
            },
            12 => Constant::NameAndType {
                name: Utf8ConstantIndex::deserialize(reader)?,
                descriptor: Utf8ConstantIndex::deserialize(reader)?,
            },
            15 => {
                let kind = u8::deserialize(reader)?;
                Constant::MethodHandle {
                    handle_kind: HandleKind::from_byte(kind).ok_or(Error::UnknownHandleKind(kind))?,
                    member: ConstantIndex::deserialize(reader)?,
                }
            }
            16 => Constant::MethodType {
                descriptor: Utf8ConstantIndex::deserialize(reader)?,
            },
            17 => Constant::Dynamic {
                bootstrap_method: u16::deserialize(reader)?,
                name_and_type: NameAndTypeConstantIndex::deserialize(reader)?,
            },
            18 => Constant::InvokeDynamic {
                bootstrap_method: u16::deserialize(reader)?,
                method_descriptor: NameAndTypeConstantIndex::deserialize(reader)?,
            },
            19 => Constant::Module(Utf8ConstantIndex::deserialize(reader)?),
            20 => Constant::Package(Utf8ConstantIndex::deserialize(reader)?),
            tag => return Err(Error::UnknownConstantTag { tag, index }),
        };
        Ok(constant)
    }
}

/// Raw rendering, with references left as `#index`
impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Class(name) => write!(f, "Class(#{})", (name.0).0),
            Constant::FieldRef(class, name_and_type) => {
                write!(f, "FieldRef(#{}, #{})", (class.0).0, (name_and_type.0).0)
            }
            Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            } => write!(
                f,
                "{}(#{}, #{})",
                if *is_interface {
                    "InterfaceMethodRef"
                } else {
                    "MethodRef"
                },
                (class.0).0,
                (name_and_type.0).0
            ),
            Constant::String(string) => write!(f, "String(#{})", (string.0).0),
            Constant::Integer(integer) => write!(f, "Integer({})", integer),
            Constant::Float(float) => write!(f, "Float({})", float),
            Constant::Long(long) => write!(f, "Long({})", long),
            Constant::Double(double) => write!(f, "Double({})", double),
            Constant::NameAndType { name, descriptor } => {
                write!(f, "NameAndType(#{}, #{})", (name.0).0, (descriptor.0).0)
            }
            Constant::Utf8(string) => write!(f, "Utf8({})", string),
            Constant::MethodHandle {
                handle_kind,
                member,
            } => write!(f, "MethodHandle({:?}, #{})", handle_kind, member.0),
            Constant::MethodType { descriptor } => write!(f, "MethodType(#{})", (descriptor.0).0),
            Constant::Dynamic {
                bootstrap_method,
                name_and_type,
            } => write!(f, "Dynamic({}, #{})", bootstrap_method, (name_and_type.0).0),
            Constant::InvokeDynamic {
                bootstrap_method,
                method_descriptor,
            } => write!(
                f,
                "InvokeDynamic({}, #{})",
                bootstrap_method,
                (method_descriptor.0).0
            ),
            Constant::Module(name) => write!(f, "Module(#{})", (name.0).0),
            Constant::Package(name) => write!(f, "Package(#{})", (name.0).0),
        }
    }
}

/// Almost all constants have width 1, except for `Constant::Long` and `Constant::Double`. From
/// the JVM documentation:
///
/// > All 8-byte constants take up two entries in the constant_pool table of the class file. If a
/// > CONSTANT_Long_info or CONSTANT_Double_info structure is the item in the constant_pool table
/// > at index n, then the next usable item in the pool is located at index n+2. The constant_pool
/// > index n+1 must be valid but is considered unusable.
/// >
/// > In retrospect, making 8-byte constants take two constant pool entries was a poor choice.
impl Width for Constant {
    fn width(&self) -> usize {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

/// Modified UTF-8 format used in class files.
///
/// See [this `DataInput` section for details][0]. Quoting from that section:
///
/// > The differences between this format and the standard UTF-8 format are the following:
/// >
/// >  * The null byte `\u0000` is encoded in 2-byte format rather than 1-byte, so that the encoded
/// >    strings never have embedded nulls.
/// >  * Only the 1-byte, 2-byte, and 3-byte formats are used.
/// >  * Supplementary characters are represented in the form of surrogate pairs.
///
/// Unpaired surrogates (legal in Java strings, but not in Rust ones) become `U+FFFD`.
///
/// [0]: https://docs.oracle.com/en/java/javase/17/docs/api/java.base/java/io/DataInput.html#modified-utf-8
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String, Error> {
    fn continuation(bytes: &[u8], at: usize) -> Option<u16> {
        bytes
            .get(at)
            .filter(|b| *b & 0b1100_0000 == 0b1000_0000)
            .map(|b| (*b & 0x3F) as u16)
    }

    let malformed = || Error::MalformedUtf8(bytes.to_vec());
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut at = 0;
    while at < bytes.len() {
        let lead = bytes[at];
        if lead & 0b1000_0000 == 0 {
            units.push(lead as u16);
            at += 1;
        } else if lead & 0b1110_0000 == 0b1100_0000 {
            let low = continuation(bytes, at + 1).ok_or_else(malformed)?;
            units.push(((lead & 0x1F) as u16) << 6 | low);
            at += 2;
        } else if lead & 0b1111_0000 == 0b1110_0000 {
            let mid = continuation(bytes, at + 1).ok_or_else(malformed)?;
            let low = continuation(bytes, at + 2).ok_or_else(malformed)?;
            units.push(((lead & 0x0F) as u16) << 12 | mid << 6 | low);
            at += 3;
        } else {
            return Err(malformed());
        }
    }

    Ok(char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}


#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct ConstantIndex(pub u16);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Utf8ConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct NameAndTypeConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ClassConstantIndex(pub ConstantIndex);

impl From<Utf8ConstantIndex> for ConstantIndex {
    fn from(index: Utf8ConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<NameAndTypeConstantIndex> for ConstantIndex {
    fn from(index: NameAndTypeConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<ClassConstantIndex> for ConstantIndex {
    fn from(index: ClassConstantIndex) -> ConstantIndex {
        index.0
    }
}

impl Deserialize for ConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        u16::deserialize(reader).map(ConstantIndex)
    }
}
impl Deserialize for Utf8ConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        ConstantIndex::deserialize(reader).map(Utf8ConstantIndex)
    }
}
impl Deserialize for NameAndTypeConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        ConstantIndex::deserialize(reader).map(NameAndTypeConstantIndex)
    }
}
impl Deserialize for ClassConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        ConstantIndex::deserialize(reader).map(ClassConstantIndex)
    }
}

/// Type of method handle
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-5.html#jvms-5.4.3.5-220
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl HandleKind {
    pub fn from_byte(byte: u8) -> Option<HandleKind> {
        Some(match byte {
            1 => HandleKind::GetField,
            2 => HandleKind::GetStatic,
            3 => HandleKind::PutField,
            4 => HandleKind::PutStatic,
            5 => HandleKind::InvokeVirtual,
            6 => HandleKind::InvokeStatic,
            7 => HandleKind::InvokeSpecial,
            8 => HandleKind::NewInvokeSpecial,
            9 => HandleKind::InvokeInterface,
            _ => return None,
        })
    }
}
