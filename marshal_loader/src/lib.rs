//! API Description Loading and Resolution
//!
//! This crate loads YAML API descriptions from disk and resolves them
//! into typed operation signatures, ready for classification and code
//! generation.

pub mod file;
pub mod resolver;

// Re-export commonly used types at the crate root
pub use file::{ApiFile, ApiMetadata, CountValue, ExtraTypeDef, FunctionDef, ParamDef};
pub use resolver::{load_api_file, resolve_api, ResolveError, ResolvedApi};

// Re-export marshal_types for convenience
pub use marshal_types;
