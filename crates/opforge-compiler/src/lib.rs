//! Opforge Compiler - Manifest marker compiler
//!
//! Compiles marker-annotated Kubernetes manifests into the inputs of an
//! operator generator:
//! - an API schema tree (`ApiField`), merged across a collection and its components
//! - deduplicated access and ownership rules
//! - one `SourceFile` per manifest, holding construction code for each object
//!
//! ```rust,ignore
//! use opforge_compiler::{Compiler, WorkloadUnit};
//! use opforge_core::{CompilerOptions, WorkloadApi};
//!
//! let unit = WorkloadUnit::new("web", api)
//!     .with_manifest("deployment.yaml", include_str!("deployment.yaml"));
//! let compiled = Compiler::new(CompilerOptions::default()).compile_standalone(&unit)?;
//! println!("{}", compiled.spec.sample_yaml());
//! ```

pub mod codegen;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod workload;

pub use codegen::generate_source;
pub use error::{CompileError, Result};
pub use manifest::{DecodedResource, ManifestSource, WorkloadUnit, decode_resource, split_documents};
pub use merge::merge_schemas;
pub use workload::{CompiledCollection, CompiledWorkload, Compiler};
