//! Opforge Core - Data model shared by the manifest marker compiler
//!
//! This crate provides the types the compiler accumulates into:
//! - `ApiField`: The API schema tree, rooted at a synthetic `Spec` node
//! - `AccessRules` / `OwnershipRules`: Deduplicated RBAC and ownership rules
//! - `ChildResource` / `SourceFile`: Compiled objects and their file grouping
//! - `naming`: Identifiers, plurals and collision-free file names
//! - `CompilerOptions` / `WorkloadApi`: Configuration and naming context

pub mod error;
pub mod field;
pub mod naming;
pub mod options;
pub mod ownership;
pub mod rbac;
pub mod resource;
pub mod workload;

pub use error::{CoreError, NamingError, Result, SchemaError, ValidationError};
pub use field::{ApiField, FieldDefinition, FieldType, ScalarType};
pub use naming::{FileNameRegistry, dedup_file_names, unique_resource_name};
pub use options::CompilerOptions;
pub use ownership::{OwnershipRule, OwnershipRules};
pub use rbac::{AccessRule, AccessRules, ResourceAccess};
pub use resource::{ChildResource, SourceFile, split_api_version};
pub use workload::{UnitKind, WorkloadApi};
