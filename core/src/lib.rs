//! WARP MDM Core Library
//!
//! This crate provides the configuration engine behind the WARP MDM
//! generator: the parameter registry, the configuration model, plist
//! serialization and import, and validation.

pub mod error;
pub mod model;
pub mod parser;
pub mod plist;
pub mod registry;
pub mod serializer;
pub mod session;
pub mod settings;
pub mod validation;

pub use error::{Error, ImportError, Result};
pub use model::*;
pub use parser::{parse, parse_file, ImportResult};
pub use registry::{describe, ParameterDescriptor, ValueKind};
pub use serializer::serialize;
pub use session::Session;
pub use settings::{Platform, Settings};
pub use validation::{validate, validate_field, ValidationResult};
