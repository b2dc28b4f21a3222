use crate::ctype::{CType, StructField};
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use serde::Serialize;
use std::ffi::c_void;
use std::fmt;

/// one declared type with an optional declarator name (`UInt32* size`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    /// raw type spelling as written, pointer stars included (`void**`)
    pub type_name: String,
    /// declarator identifier; empty when the declaration is unnamed
    pub name: String,
}

impl TypeDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: String::new(),
        }
    }

    /// chase the spelling through the registry to an ABI-ready type
    pub fn resolve(&self, registry: &TypeRegistry) -> Result<CType> {
        registry.resolve(&self.type_name)
    }

    /// (field name, type) pair for embedding in an aggregate layout
    pub fn as_struct_field(&self, registry: &TypeRegistry) -> Result<StructField> {
        Ok(StructField {
            name: self.name.clone(),
            ty: self.resolve(registry)?,
        })
    }

    /// tag a raw foreign value with this descriptor's resolved type
    pub fn cast_value(&self, registry: &TypeRegistry, addr: *mut c_void) -> Result<TypedValue> {
        Ok(TypedValue {
            ty: self.resolve(registry)?,
            addr,
        })
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.type_name)
        } else {
            write!(f, "{} {}", self.type_name, self.name)
        }
    }
}

/// a parsed function or function-pointer declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDescriptor {
    pub return_type: TypeDescriptor,
    pub name: String,
    /// parameters in calling-convention order; each may carry a name
    pub param_list: Vec<TypeDescriptor>,
}

impl FunctionDescriptor {
    /// resolve to a callable signature type. a lone unnamed `void`
    /// parameter, as in `int f(void)`, resolves to an empty parameter list
    pub fn resolve(&self, registry: &TypeRegistry) -> Result<CType> {
        let return_type = self.return_type.resolve(registry)?;
        let mut parameters = Vec::with_capacity(self.param_list.len());
        for param in &self.param_list {
            let ty = param.resolve(registry)?;
            if ty == CType::Void && param.name.is_empty() {
                continue;
            }
            parameters.push(ty);
        }
        Ok(CType::Function {
            return_type: Box::new(return_type),
            parameters,
        })
    }

    /// (member name, function-pointer type) pair for a vtable-style struct
    pub fn as_struct_field(&self, registry: &TypeRegistry) -> Result<StructField> {
        Ok(StructField {
            name: self.name.clone(),
            ty: self.resolve(registry)?,
        })
    }

    /// look the declared name up as a symbol in `library` and attach the
    /// resolved signature
    pub fn bind_from_library(
        &self,
        registry: &TypeRegistry,
        library: &libloading::Library,
    ) -> Result<BoundFunction> {
        let signature = self.resolve(registry)?;
        let address = unsafe {
            let symbol = library
                .get::<unsafe extern "C" fn()>(self.name.as_bytes())
                .map_err(|source| Error::SymbolNotFound {
                    symbol: self.name.clone(),
                    source,
                })?;
            *symbol as *const c_void
        };
        log::debug!("{:>12} {} @ {:p}", "bound", self.name, address);
        Ok(BoundFunction {
            name: self.name.clone(),
            signature,
            address,
        })
    }
}

impl fmt::Display for FunctionDescriptor {
    /// C-style rendering, e.g. `IOReturn GetReport(void* self, UInt32* size)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = if self.param_list.is_empty() {
            "void".to_string()
        } else {
            self.param_list
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "{} {}({})", self.return_type.type_name, self.name, params)
    }
}

/// raw foreign value tagged with its resolved type. `addr` is only valid
/// for as long as the foreign allocation it points at
#[derive(Debug, Clone)]
pub struct TypedValue {
    pub ty: CType,
    pub addr: *mut c_void,
}

/// native symbol paired with its resolved calling signature. `address` is
/// only valid while the library it was bound from stays loaded
#[derive(Debug, Clone)]
pub struct BoundFunction {
    pub name: String,
    pub signature: CType,
    pub address: *const c_void,
}
