//! Marshalling Type Model
//!
//! This crate contains the core type model for the command-marshalling
//! generator. It provides pure data structures for C-like type
//! expressions and operation signatures without any file I/O or code
//! generation logic.

pub mod signature;
pub mod table;
pub mod typeexpr;

// Re-export commonly used types at the crate root
pub use signature::{
    CountSpec, Direction, MarshalFlavor, OperationSignature, ParameterSpec, ReturnType,
};
pub use table::TypeTable;
pub use typeexpr::{TypeExpression, TypeNode, TypeParseError};
