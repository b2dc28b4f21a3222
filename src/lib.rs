//! declffi - parse C type and function declarations into ABI-ready type
//! descriptions for FFI
//!
//! - declarations are parsed against an explicit [`TypeRegistry`] of named
//!   types; there is no process-wide state
//! - parsing records type spellings only; resolution against the registry
//!   is a separate, later step
//! - type widths follow the LP64 convention of the supported targets
//!   (macOS and Linux)
//! - arrays, qualifiers (`const`, `volatile`) and variadic parameter lists
//!   are not handled
//!
//! ```
//! use declffi::{DeclParser, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry.define("IOReturn", "int").unwrap();
//! registry.define("UInt32", "unsigned int").unwrap();
//!
//! let parser = DeclParser::new(&registry);
//! let decl = parser
//!     .parse("IOReturn (*GetReport)(void *self, UInt32 *size)")
//!     .unwrap();
//! let fn_desc = decl.into_function().unwrap();
//! assert_eq!(fn_desc.name, "GetReport");
//! fn_desc.resolve(&registry).unwrap();
//! ```

pub mod ctype;
mod error;
pub mod parser;
pub mod registry;
pub mod tokenizer;
pub mod types;

pub use ctype::{CType, StructField};
pub use error::{Error, Result};
pub use parser::{DeclParser, Declaration};
pub use registry::{TypeRegistry, TypeSpec};
pub use tokenizer::Tokenizer;
pub use types::{BoundFunction, FunctionDescriptor, TypeDescriptor, TypedValue};
