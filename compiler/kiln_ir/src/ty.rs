//! Type descriptors shared by the evaluator and the analysis passes.

use std::fmt;

use kiln_num::IntWidth;

/// Built-in primitive types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    Float32,
    Float64,
    Boolean,
    String,
    Void,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 15] = [
        PrimitiveType::Int8,
        PrimitiveType::Int16,
        PrimitiveType::Int32,
        PrimitiveType::Int64,
        PrimitiveType::Int128,
        PrimitiveType::UInt8,
        PrimitiveType::UInt16,
        PrimitiveType::UInt32,
        PrimitiveType::UInt64,
        PrimitiveType::UInt128,
        PrimitiveType::Float32,
        PrimitiveType::Float64,
        PrimitiveType::Boolean,
        PrimitiveType::String,
        PrimitiveType::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Int8 => "int8",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::Int128 => "int128",
            PrimitiveType::UInt8 => "uint8",
            PrimitiveType::UInt16 => "uint16",
            PrimitiveType::UInt32 => "uint32",
            PrimitiveType::UInt64 => "uint64",
            PrimitiveType::UInt128 => "uint128",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::String => "string",
            PrimitiveType::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Machine width of an integer primitive.
    pub fn int_width(self) -> Option<IntWidth> {
        Some(match self {
            PrimitiveType::Int8 => IntWidth::I8,
            PrimitiveType::Int16 => IntWidth::I16,
            PrimitiveType::Int32 => IntWidth::I32,
            PrimitiveType::Int64 => IntWidth::I64,
            PrimitiveType::Int128 => IntWidth::I128,
            PrimitiveType::UInt8 => IntWidth::U8,
            PrimitiveType::UInt16 => IntWidth::U16,
            PrimitiveType::UInt32 => IntWidth::U32,
            PrimitiveType::UInt64 => IntWidth::U64,
            PrimitiveType::UInt128 => IntWidth::U128,
            _ => return None,
        })
    }

    /// Primitive for an integer width, if one exists.
    pub fn from_int_width(width: IntWidth) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.int_width() == Some(width))
    }

    pub fn is_integer(self) -> bool {
        self.int_width().is_some()
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveType::Float32 | PrimitiveType::Float64)
    }

    pub fn is_signed(self) -> bool {
        self.int_width().map_or(self.is_float(), IntWidth::is_signed)
    }

    /// Storage size in bits; 0 for `string` and `void`.
    pub fn bits(self) -> u32 {
        match self {
            PrimitiveType::Float32 => 32,
            PrimitiveType::Float64 => 64,
            PrimitiveType::Boolean => 1,
            PrimitiveType::String | PrimitiveType::Void => 0,
            _ => self.int_width().map_or(0, IntWidth::bits),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A declaration's or expression's type as seen by compile-time code.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    /// Not yet inferred.
    Unresolved,
    Nil,
    Primitive(PrimitiveType),
    Function { params: Vec<Type>, ret: Box<Type> },
    List,
}

impl Type {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Type::Unresolved)
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }
}

impl From<PrimitiveType> for Type {
    fn from(p: PrimitiveType) -> Self {
        Type::Primitive(p)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unresolved => f.write_str("<unresolved>"),
            Type::Nil => f.write_str("nil"),
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Function { params, ret } => {
                f.write_str("fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::List => f.write_str("list"),
        }
    }
}
