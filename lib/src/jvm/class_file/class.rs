use crate::jvm::class_file::{
    Attribute, AttributeLike, BootstrapMethods, Deserialize, Field, Method,
};
use crate::jvm::code::MethodBody;
use crate::jvm::{ClassAccessFlags, ClassConstantIndex, ConstantPool, Error};
use byteorder::ReadBytesExt;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Representation of the [`class` file format of the JVM][0]
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub version: Version,
    pub constants: ConstantPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: ClassConstantIndex,
    pub super_class: ClassConstantIndex,
    pub interfaces: Vec<ClassConstantIndex>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Magic header bytes that go at the front of the class file
    pub const MAGIC: u32 = 0xCAFEBABE;

    /// Decode a whole class file
    pub fn parse(bytes: &[u8]) -> Result<ClassFile, Error> {
        let mut reader = Cursor::new(bytes);
        ClassFile::read(&mut reader)
    }

    /// Read and decode a class file from disk
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ClassFile, Error> {
        let bytes = fs::read(path)?;
        ClassFile::parse(&bytes)
    }

    pub fn read<R: ReadBytesExt>(reader: &mut R) -> Result<ClassFile, Error> {
        let magic = u32::deserialize(reader)?;
        if magic != ClassFile::MAGIC {
            return Err(Error::BadMagic(magic));
        }

        let version = Version::deserialize(reader)?;
        let constants = ConstantPool::read(reader)?;
        Ok(ClassFile {
            version,
            constants,
            access_flags: ClassAccessFlags::deserialize(reader)?,
            this_class: ClassConstantIndex::deserialize(reader)?,
            super_class: ClassConstantIndex::deserialize(reader)?,
            interfaces: Vec::deserialize(reader)?,
            fields: Vec::deserialize(reader)?,
            methods: Vec::deserialize(reader)?,
            attributes: Vec::deserialize(reader)?,
        })
    }

    /// Binary name of this class
    pub fn class_name(&self) -> Result<&str, Error> {
        self.constants.class_name(self.this_class)
    }

    /// First method with a given name (overloads are not distinguished)
    pub fn find_method(&self, name: &str) -> Result<Option<&Method>, Error> {
        for method in &self.methods {
            if self.constants.utf8(method.name_index)? == name {
                return Ok(Some(method));
            }
        }
        Ok(None)
    }

    /// Contents of the `BootstrapMethods` attribute (empty if there is none)
    pub fn bootstrap_methods(&self) -> Result<BootstrapMethods, Error> {
        Ok(BootstrapMethods::find(&self.attributes, &self.constants)?.unwrap_or_default())
    }

    /// Decode the body of the first method with a given name
    pub fn method_body(&self, name: &str) -> Result<MethodBody<'_>, Error> {
        let method = self
            .find_method(name)?
            .ok_or_else(|| Error::MissingMethod(name.to_owned()))?;
        let code = method
            .code(&self.constants)?
            .ok_or_else(|| Error::MissingCode(name.to_owned()))?;
        MethodBody::decode(self, method, &code)
    }
}

/// Class file version
///
/// The major version is the one that matters (eg. 55 for Java 11, 61 for Java 17).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub minor: u16,
    pub major: u16,
}

impl Deserialize for Version {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        let minor = u16::deserialize(reader)?;
        let major = u16::deserialize(reader)?;
        Ok(Version { minor, major })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bad_magic() {
        let bytes = [0xCA, 0xFE, 0xD0, 0x0D, 0, 0, 0, 55];
        assert!(matches!(
            ClassFile::parse(&bytes),
            Err(Error::BadMagic(0xCAFED00D))
        ));
    }

    #[test]
    fn truncated_after_version() {
        let bytes = [0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 61];
        assert!(matches!(ClassFile::parse(&bytes), Err(Error::IoError(_))));
    }
}
