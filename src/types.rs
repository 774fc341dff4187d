use std::io::{Cursor, Seek};

use binrw::{binrw, BinRead, BinResult, BinWrite};

use crate::constant_info::ConstantInfo;
use crate::error::{EnhanceError, EnhanceResult};

/// The leading part of a class file: everything up to and including the
/// interface table.
///
/// Fields, methods and attributes are never read. That keeps reading a
/// supertype cheap and never touches its method code.
#[derive(Clone, Debug)]
#[binrw]
#[brw(big, magic = b"\xca\xfe\xba\xbe")]
pub struct ClassHeader {
    pub minor_version: u16,
    pub major_version: u16,
    pub const_pool_size: u16,
    #[br(parse_with = parse_const_pool, args(const_pool_size))]
    #[bw(write_with = write_const_pool)]
    pub const_pool: Vec<ConstantInfo>,
    pub access_flags: ClassAccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces_count: u16,
    #[br(count = interfaces_count)]
    pub interfaces: Vec<u16>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[binrw]
pub struct ClassAccessFlags(u16);

bitflags::bitflags! {
    impl ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;     //	Declared public; may be accessed from outside its package.
        const FINAL = 0x0010;      //	Declared final; no subclasses allowed.
        const SUPER = 0x0020;      //	Treat superclass methods specially when invoked by the invokespecial instruction.
        const INTERFACE = 0x0200;  //	Is an interface, not a class.
        const ABSTRACT = 0x0400;   //	Declared abstract; must not be instantiated.
        const SYNTHETIC = 0x1000;  //	Declared synthetic; not present in the source code.
        const ANNOTATION = 0x2000; //	Declared as an annotation type.
        const ENUM = 0x4000;       //	Declared as an enum type.
        const MODULE = 0x8000;     //	Declared as a module type.
    }
}

/// Reads `count - 1` constant pool slots, inserting an `Unusable` slot after
/// every `Long` and `Double`. A wide entry in the last slot is an error.
#[binrw::parser(reader, endian)]
fn parse_const_pool(count: u16) -> BinResult<Vec<ConstantInfo>> {
    let count = u32::from(count);
    let mut pool = Vec::with_capacity(count as usize);
    let mut slot: u32 = 1;
    while slot < count {
        let pos = reader.stream_position()?;
        let entry = ConstantInfo::read_options(reader, endian, ())?;
        let wide = entry.is_wide();
        pool.push(entry);
        slot += 1;
        if wide {
            if slot >= count {
                return Err(binrw::Error::AssertFail {
                    pos,
                    message: format!("wide constant in last pool slot {}", slot - 1),
                });
            }
            pool.push(ConstantInfo::Unusable);
            slot += 1;
        }
    }
    Ok(pool)
}

#[binrw::writer(writer, endian)]
fn write_const_pool(pool: &Vec<ConstantInfo>) -> BinResult<()> {
    for entry in pool {
        entry.write_options(writer, endian, ())?;
    }
    Ok(())
}

impl ClassHeader {
    /// Parse the header of a complete class file.
    pub fn parse(bytes: &[u8]) -> EnhanceResult<ClassHeader> {
        let header = ClassHeader::read(&mut Cursor::new(bytes))?;
        Ok(header)
    }

    /// Serialize the header only. The result is not a complete class file.
    pub fn to_bytes(&self) -> EnhanceResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.write(&mut buf)?;
        Ok(buf.into_inner())
    }

    pub fn constant(&self, index: u16) -> Option<&ConstantInfo> {
        if index == 0 {
            return None;
        }
        self.const_pool.get((index - 1) as usize)
    }

    pub fn utf8(&self, index: u16) -> EnhanceResult<String> {
        match self.constant(index) {
            Some(ConstantInfo::Utf8(u)) => Ok(u.to_string_lossy()),
            _ => Err(EnhanceError::BadConstant {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Resolve a `Class` entry to its internal name, e.g. `java/util/List`.
    pub fn class_name(&self, index: u16) -> EnhanceResult<String> {
        match self.constant(index) {
            Some(ConstantInfo::Class(c)) => self.utf8(c.name_index),
            _ => Err(EnhanceError::BadConstant {
                index,
                expected: "Class",
            }),
        }
    }

    pub fn this_name(&self) -> EnhanceResult<String> {
        self.class_name(self.this_class)
    }

    /// `None` only for `java/lang/Object` (and module-info), where
    /// `super_class` is zero.
    pub fn super_name(&self) -> EnhanceResult<Option<String>> {
        if self.super_class == 0 {
            return Ok(None);
        }
        self.class_name(self.super_class).map(Some)
    }

    pub fn interface_names(&self) -> EnhanceResult<Vec<String>> {
        self.interfaces
            .iter()
            .map(|&index| self.class_name(index))
            .collect()
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }
}
