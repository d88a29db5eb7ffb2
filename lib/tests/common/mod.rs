//! Hand assembly of small class files

#![allow(dead_code)]

use byteorder::{BigEndian, WriteBytesExt};
use std::collections::HashMap;

/// Builds class file bytes with a single class and any number of methods
///
/// Strings must not contain NUL or supplementary characters, since they are written as plain
/// UTF-8 instead of modified UTF-8.
pub struct ClassAssembler {
    constants: Vec<u8>,
    next_index: u16,
    utf8s: HashMap<String, u16>,
    this_class: u16,
    super_class: u16,
    methods: Vec<u8>,
    method_count: u16,
    bootstrap_methods: Vec<(u16, Vec<u16>)>,
}

pub struct MethodCode {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,

    /// `(start, end, handler, catch type)` entries
    pub exception_table: Vec<(u16, u16, u16, u16)>,
}

impl MethodCode {
    pub fn new(code: Vec<u8>) -> MethodCode {
        MethodCode {
            max_stack: 4,
            max_locals: 4,
            code,
            exception_table: vec![],
        }
    }

    pub fn catching(mut self, start: u16, end: u16, handler: u16, catch_type: u16) -> MethodCode {
        self.exception_table.push((start, end, handler, catch_type));
        self
    }
}

impl ClassAssembler {
    pub fn new(class_name: &str) -> ClassAssembler {
        let mut assembler = ClassAssembler {
            constants: vec![],
            next_index: 1,
            utf8s: HashMap::new(),
            this_class: 0,
            super_class: 0,
            methods: vec![],
            method_count: 0,
            bootstrap_methods: vec![],
        };
        assembler.this_class = assembler.class(class_name);
        assembler.super_class = assembler.class("java/lang/Object");
        assembler
    }

    fn entry(&mut self, width: u16, bytes: &[u8]) -> u16 {
        let index = self.next_index;
        self.constants.extend_from_slice(bytes);
        self.next_index += width;
        index
    }

    pub fn utf8(&mut self, string: &str) -> u16 {
        if let Some(index) = self.utf8s.get(string) {
            return *index;
        }
        let mut bytes = vec![1];
        bytes.write_u16::<BigEndian>(string.len() as u16).unwrap();
        bytes.extend_from_slice(string.as_bytes());
        let index = self.entry(1, &bytes);
        self.utf8s.insert(string.to_owned(), index);
        index
    }

    fn tagged_indices(&mut self, tag: u8, indices: &[u16]) -> u16 {
        let mut bytes = vec![tag];
        for index in indices {
            bytes.write_u16::<BigEndian>(*index).unwrap();
        }
        self.entry(1, &bytes)
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name = self.utf8(name);
        self.tagged_indices(7, &[name])
    }

    pub fn string(&mut self, value: &str) -> u16 {
        let value = self.utf8(value);
        self.tagged_indices(8, &[value])
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        let mut bytes = vec![3];
        bytes.write_i32::<BigEndian>(value).unwrap();
        self.entry(1, &bytes)
    }

    pub fn float(&mut self, value: f32) -> u16 {
        let mut bytes = vec![4];
        bytes.write_f32::<BigEndian>(value).unwrap();
        self.entry(1, &bytes)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        let mut bytes = vec![5];
        bytes.write_i64::<BigEndian>(value).unwrap();
        self.entry(2, &bytes)
    }

    pub fn double(&mut self, value: f64) -> u16 {
        let mut bytes = vec![6];
        bytes.write_f64::<BigEndian>(value).unwrap();
        self.entry(2, &bytes)
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.tagged_indices(12, &[name, descriptor])
    }

    pub fn field_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let owner = self.class(owner);
        let name_and_type = self.name_and_type(name, descriptor);
        self.tagged_indices(9, &[owner, name_and_type])
    }

    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let owner = self.class(owner);
        let name_and_type = self.name_and_type(name, descriptor);
        self.tagged_indices(10, &[owner, name_and_type])
    }

    pub fn interface_method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let owner = self.class(owner);
        let name_and_type = self.name_and_type(name, descriptor);
        self.tagged_indices(11, &[owner, name_and_type])
    }

    pub fn method_type(&mut self, descriptor: &str) -> u16 {
        let descriptor = self.utf8(descriptor);
        self.tagged_indices(16, &[descriptor])
    }

    /// `REF_invokeStatic` handle
    pub fn static_method_handle(&mut self, member: u16) -> u16 {
        let mut bytes = vec![15, 6];
        bytes.write_u16::<BigEndian>(member).unwrap();
        self.entry(1, &bytes)
    }

    pub fn invoke_dynamic(&mut self, bootstrap_method: u16, name: &str, descriptor: &str) -> u16 {
        let name_and_type = self.name_and_type(name, descriptor);
        self.tagged_indices(18, &[bootstrap_method, name_and_type])
    }

    /// Returns the index of the new bootstrap method entry
    pub fn bootstrap_method(&mut self, handle: u16, arguments: Vec<u16>) -> u16 {
        self.bootstrap_methods.push((handle, arguments));
        (self.bootstrap_methods.len() - 1) as u16
    }

    pub fn method(&mut self, name: &str, descriptor: &str, code: Option<MethodCode>) {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let code_name = self.utf8("Code");

        let methods = &mut self.methods;
        methods.write_u16::<BigEndian>(0x0009).unwrap();
        methods.write_u16::<BigEndian>(name).unwrap();
        methods.write_u16::<BigEndian>(descriptor).unwrap();
        match code {
            None => methods.write_u16::<BigEndian>(0).unwrap(),
            Some(code) => {
                let mut info = vec![];
                info.write_u16::<BigEndian>(code.max_stack).unwrap();
                info.write_u16::<BigEndian>(code.max_locals).unwrap();
                info.write_u32::<BigEndian>(code.code.len() as u32).unwrap();
                info.extend_from_slice(&code.code);
                info.write_u16::<BigEndian>(code.exception_table.len() as u16)
                    .unwrap();
                for (start, end, handler, catch_type) in code.exception_table {
                    for value in [start, end, handler, catch_type] {
                        info.write_u16::<BigEndian>(value).unwrap();
                    }
                }
                info.write_u16::<BigEndian>(0).unwrap();

                methods.write_u16::<BigEndian>(1).unwrap();
                methods.write_u16::<BigEndian>(code_name).unwrap();
                methods.write_u32::<BigEndian>(info.len() as u32).unwrap();
                methods.extend_from_slice(&info);
            }
        }
        self.method_count += 1;
    }

    pub fn finish(mut self) -> Vec<u8> {
        let mut attributes = vec![];
        let mut attribute_count = 0u16;
        if !self.bootstrap_methods.is_empty() {
            let name = self.utf8("BootstrapMethods");
            let mut info = vec![];
            info.write_u16::<BigEndian>(self.bootstrap_methods.len() as u16)
                .unwrap();
            for (handle, arguments) in &self.bootstrap_methods {
                info.write_u16::<BigEndian>(*handle).unwrap();
                info.write_u16::<BigEndian>(arguments.len() as u16).unwrap();
                for argument in arguments {
                    info.write_u16::<BigEndian>(*argument).unwrap();
                }
            }
            attributes.write_u16::<BigEndian>(name).unwrap();
            attributes.write_u32::<BigEndian>(info.len() as u32).unwrap();
            attributes.extend_from_slice(&info);
            attribute_count += 1;
        }

        let mut bytes = vec![];
        bytes.write_u32::<BigEndian>(0xCAFEBABE).unwrap();
        bytes.write_u16::<BigEndian>(0).unwrap();
        bytes.write_u16::<BigEndian>(52).unwrap();
        bytes.write_u16::<BigEndian>(self.next_index).unwrap();
        bytes.extend_from_slice(&self.constants);
        bytes.write_u16::<BigEndian>(0x0021).unwrap();
        bytes.write_u16::<BigEndian>(self.this_class).unwrap();
        bytes.write_u16::<BigEndian>(self.super_class).unwrap();
        bytes.write_u16::<BigEndian>(0).unwrap(); // interfaces
        bytes.write_u16::<BigEndian>(0).unwrap(); // fields
        bytes.write_u16::<BigEndian>(self.method_count).unwrap();
        bytes.extend_from_slice(&self.methods);
        bytes.write_u16::<BigEndian>(attribute_count).unwrap();
        bytes.extend_from_slice(&attributes);
        bytes
    }
}

/// Big-endian bytes of a 2-byte operand
pub fn u2(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Big-endian bytes of a 4-byte operand
pub fn s4(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}
