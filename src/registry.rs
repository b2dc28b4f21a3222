use crate::ctype::CType;
use crate::error::{Error, Result};
use crate::tokenizer::is_word_char;
use std::collections::{HashMap, HashSet};
use std::mem::size_of;

/// second argument of [`TypeRegistry::define`]: either a concrete type, or
/// the spelling of an already-registered one (trailing `*` allowed)
#[derive(Debug, Clone)]
pub enum TypeSpec {
    Concrete(CType),
    Named(String),
}

impl From<CType> for TypeSpec {
    fn from(ty: CType) -> Self {
        TypeSpec::Concrete(ty)
    }
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        TypeSpec::Named(name.to_string())
    }
}

impl From<String> for TypeSpec {
    fn from(name: String) -> Self {
        TypeSpec::Named(name)
    }
}

/// named-type table consulted during tokenization and resolution.
///
/// the registry is an explicit object handed to the tokenizer and parser,
/// not process-wide state; callers that share one across threads must
/// serialize `define` against readers themselves.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    names: HashMap<String, CType>,
    /// every word that has appeared in a registered name. adjacent keyword
    /// tokens merge into one token (`unsigned long long`)
    keywords: HashSet<String>,
}

impl TypeRegistry {
    /// registry pre-seeded with the standard C primitive spellings
    pub fn new() -> Self {
        let mut registry = Self {
            names: HashMap::new(),
            keywords: HashSet::new(),
        };
        registry.seed_primitives();
        registry
    }

    fn seed_primitives(&mut self) {
        use core::ffi::{c_int, c_long, c_longlong, c_short};

        self.insert("void", CType::Void);
        self.insert("void*", CType::OpaquePointer);
        self.insert(
            "char",
            CType::Int {
                size: 1,
                signed: true,
            },
        );
        self.insert(
            "wchar_t",
            CType::Int {
                size: 4,
                signed: true,
            },
        );
        self.insert(
            "unsigned char",
            CType::Int {
                size: 1,
                signed: false,
            },
        );
        self.insert(
            "short",
            CType::Int {
                size: size_of::<c_short>(),
                signed: true,
            },
        );
        self.insert(
            "unsigned short",
            CType::Int {
                size: size_of::<c_short>(),
                signed: false,
            },
        );
        self.insert(
            "int",
            CType::Int {
                size: size_of::<c_int>(),
                signed: true,
            },
        );
        self.insert(
            "unsigned int",
            CType::Int {
                size: size_of::<c_int>(),
                signed: false,
            },
        );
        self.insert(
            "long",
            CType::Int {
                size: size_of::<c_long>(),
                signed: true,
            },
        );
        self.insert(
            "unsigned long",
            CType::Int {
                size: size_of::<c_long>(),
                signed: false,
            },
        );
        self.insert(
            "long long",
            CType::Int {
                size: size_of::<c_longlong>(),
                signed: true,
            },
        );
        self.insert(
            "unsigned long long",
            CType::Int {
                size: size_of::<c_longlong>(),
                signed: false,
            },
        );
        self.insert("float", CType::Float { size: 4 });
        self.insert("double", CType::Float { size: 8 });
        self.insert("char*", CType::CString);
        self.insert("wchar_t*", CType::WString);
    }

    fn insert(&mut self, name: &str, ty: CType) {
        for word in name.split(|c: char| !is_word_char(c)) {
            if !word.is_empty() {
                self.keywords.insert(word.to_string());
            }
        }
        self.names.insert(name.to_string(), ty);
    }

    /// register `name`, overwriting any previous entry. a string spec is
    /// resolved eagerly against the current registry contents, so aliasing
    /// an unknown name fails here rather than at some later resolve.
    /// returns the stored concrete type.
    pub fn define(&mut self, name: &str, spec: impl Into<TypeSpec>) -> Result<CType> {
        let resolved = match spec.into() {
            TypeSpec::Concrete(ty) => ty,
            TypeSpec::Named(target) => self.resolve(&target)?,
        };
        self.insert(name, resolved.clone());
        log::trace!("{:>12} {}", "define", name);
        Ok(resolved)
    }

    /// map a type spelling to its concrete type: exact lookup first, then
    /// trailing-`*` stripping with a pointer wrap per level (`void**` is
    /// pointer to `void*`)
    pub fn resolve(&self, spelling: &str) -> Result<CType> {
        if let Some(ty) = self.names.get(spelling) {
            return Ok(ty.clone());
        }
        if let Some(inner) = spelling.strip_suffix('*') {
            return Ok(CType::Pointer(Box::new(self.resolve(inner)?)));
        }
        Err(Error::UnknownType(spelling.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// true if `token` has appeared as a word in any registered name
    pub fn is_keyword(&self, token: &str) -> bool {
        self.keywords.contains(token)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
