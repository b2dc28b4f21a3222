use serde::Serialize;
use std::mem::size_of;

/// ABI-ready description of a C type: what a type spelling becomes once
/// every name has been chased through the registry.
///
/// Widths follow the LP64 convention of the supported targets (macOS and
/// Linux): `char` is 1 byte, `short` 2, `int` 4, `long` the width of
/// `core::ffi::c_long`, `long long` 8, `wchar_t` 4, pointers the target
/// pointer width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CType {
    /// the "no type" marker: a `void` return or a bare `void` parameter
    Void,
    Int { size: usize, signed: bool },
    Float { size: usize },
    /// pointer with no particular pointee (`void*`)
    OpaquePointer,
    /// nul-terminated narrow string (`char*`)
    CString,
    /// nul-terminated wide string (`wchar_t*`)
    WString,
    Pointer(Box<CType>),
    Struct {
        name: String,
        fields: Vec<StructField>,
    },
    /// callable signature: return type plus parameters in calling-convention
    /// order
    Function {
        return_type: Box<CType>,
        parameters: Vec<CType>,
    },
}

/// one member of an aggregate layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructField {
    pub name: String,
    pub ty: CType,
}

impl CType {
    /// size in bytes; 0 for void
    pub fn size(&self) -> usize {
        match self {
            CType::Void => 0,
            CType::Int { size, .. } => *size,
            CType::Float { size } => *size,
            CType::OpaquePointer
            | CType::CString
            | CType::WString
            | CType::Pointer(_)
            | CType::Function { .. } => size_of::<*const ()>(),
            CType::Struct { fields, .. } => {
                // usual C layout: each field at the next offset aligned for
                // it, total rounded up to the struct alignment
                let mut offset = 0usize;
                for field in fields {
                    let align = field.ty.alignment();
                    offset = offset.div_ceil(align) * align;
                    offset += field.ty.size();
                }
                let align = self.alignment();
                offset.div_ceil(align) * align
            }
        }
    }

    /// alignment in bytes. for scalars alignment equals size, matching the
    /// teacher targets' ABIs
    pub fn alignment(&self) -> usize {
        match self {
            CType::Void => 1,
            CType::Int { size, .. } => *size,
            CType::Float { size } => *size,
            CType::OpaquePointer
            | CType::CString
            | CType::WString
            | CType::Pointer(_)
            | CType::Function { .. } => size_of::<*const ()>(),
            CType::Struct { fields, .. } => {
                fields.iter().map(|f| f.ty.alignment()).max().unwrap_or(1)
            }
        }
    }
}
