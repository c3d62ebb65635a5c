//! Declared data types
//!
//! Types as they stand after elaboration: parameters are resolved, ranges
//! are concrete. Packed shapes lay out contiguously in a bit vector;
//! unpacked shapes are distinct storage per element.

use serde::{Deserialize, Serialize};

/// Declared type of a signal or variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Unranged scalar (one bit)
    Bit,
    /// Packed vector `[msb:lsb]`; either bound may be the larger one
    Ranged { msb: i32, lsb: i32 },
    /// Floating point; not bit-decomposable
    Real,
    /// String; not bit-decomposable
    Str,
    /// Packed array `[lo..hi]` of a packed element
    PackedArray {
        elem: Box<DataType>,
        lo: i32,
        hi: i32,
    },
    /// Unpacked array `[lo..hi]`, distinct storage per element
    UnpackedArray {
        elem: Box<DataType>,
        lo: i32,
        hi: i32,
    },
    /// Struct, packed or unpacked
    Struct(Box<StructType>),
    /// Union; members share storage
    Union(Box<UnionType>),
}

/// Struct type with elaborated members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructType {
    /// Type name
    pub name: String,
    /// Whether members pack into one bit vector
    pub packed: bool,
    /// Members in declaration order
    pub members: Vec<StructMember>,
}

/// Union type with elaborated members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionType {
    /// Type name
    pub name: String,
    /// Members in declaration order
    pub members: Vec<StructMember>,
}

/// One member of a struct or union
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructMember {
    /// Member name
    pub name: String,
    /// Member type
    pub dtype: DataType,
}

impl DataType {
    /// A 32-bit unsigned counter type, used for generated temporaries
    pub fn uint32() -> Self {
        DataType::Ranged { msb: 31, lsb: 0 }
    }

    /// Packed bit width of this type
    ///
    /// Unpacked arrays report the width of one element; the element
    /// multiplicity is [`DataType::unpacked_elements`].
    pub fn width(&self) -> u32 {
        match self {
            DataType::Bit => 1,
            DataType::Ranged { msb, lsb } => msb.abs_diff(*lsb) + 1,
            DataType::Real => 64,
            DataType::Str => 0,
            DataType::PackedArray { elem, lo, hi } => elem.width() * (lo.abs_diff(*hi) + 1),
            DataType::UnpackedArray { elem, .. } => elem.width(),
            DataType::Struct(s) => s.members.iter().map(|m| m.dtype.width()).sum(),
            DataType::Union(u) => u.members.iter().map(|m| m.dtype.width()).max().unwrap_or(0),
        }
    }

    /// Number of unpacked elements this type fans out to (1 if none)
    pub fn unpacked_elements(&self) -> u32 {
        match self {
            DataType::UnpackedArray { elem, lo, hi } => {
                (lo.abs_diff(*hi) + 1) * elem.unpacked_elements()
            }
            _ => 1,
        }
    }
}

impl StructType {
    /// Least-significant-bit offset of each member, in declaration order
    ///
    /// Packed layout: the last-declared member sits at bit 0.
    pub fn member_lsbs(&self) -> Vec<u32> {
        let mut lsbs = vec![0u32; self.members.len()];
        let mut lsb = 0u32;
        for (i, member) in self.members.iter().enumerate().rev() {
            lsbs[i] = lsb;
            lsb += member.dtype.width();
        }
        lsbs
    }
}
