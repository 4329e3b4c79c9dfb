//! Compilation of workload units
//!
//! Each unit runs the same pipeline over its manifests, strictly in input
//! order: inspect markers, fold them into the schema, decode every cleaned
//! document into a child resource, aggregate access and ownership rules, and
//! finally assign collision-free source file names.

use std::collections::HashMap;

use serde::Serialize;

use opforge_core::error::SchemaError;
use opforge_core::field::ApiField;
use opforge_core::naming::{FileNameRegistry, source_file_name, unique_resource_name};
use opforge_core::options::CompilerOptions;
use opforge_core::ownership::{OwnershipRule, OwnershipRules};
use opforge_core::rbac::AccessRules;
use opforge_core::resource::{ChildResource, SourceFile};
use opforge_core::workload::{UnitKind, WorkloadApi};
use opforge_markers::inspect;

use crate::codegen::generate_source;
use crate::error::{CompileError, Result};
use crate::manifest::{WorkloadUnit, decode_resource, split_documents};
use crate::merge::merge_schemas;

/// Everything compiled from one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledWorkload {
    pub name: String,
    pub kind: UnitKind,
    pub api: WorkloadApi,
    /// API schema of the unit
    pub spec: ApiField,
    /// Fields a component contributes to its collection's schema
    pub collection_fields: ApiField,
    pub access_rules: AccessRules,
    pub ownership_rules: OwnershipRules,
    pub source_files: Vec<SourceFile>,
}

impl CompiledWorkload {
    pub fn child_resources(&self) -> impl Iterator<Item = &ChildResource> {
        self.source_files.iter().flat_map(|file| file.children.iter())
    }
}

/// A collection compiled together with its components
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledCollection {
    /// The collection unit; its `spec` is the merged collection schema
    pub collection: CompiledWorkload,
    pub components: Vec<CompiledWorkload>,
    /// Rules across the collection and all components
    pub access_rules: AccessRules,
    pub ownership_rules: OwnershipRules,
}

/// Per-unit accumulators, owned by a single compilation run
struct UnitState {
    spec: ApiField,
    collection_fields: ApiField,
    access_rules: AccessRules,
    ownership_rules: OwnershipRules,
    /// Unique resource name to the manifest that produced it
    unique_names: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a unit that belongs to no collection
    pub fn compile_standalone(&self, unit: &WorkloadUnit) -> Result<CompiledWorkload> {
        self.compile_unit(unit, UnitKind::Standalone, None)
    }

    /// Compile one component of the collection described by `collection`
    ///
    /// The component schema gains the synthetic `collection` reference field.
    pub fn compile_component(
        &self,
        unit: &WorkloadUnit,
        collection: &WorkloadApi,
    ) -> Result<CompiledWorkload> {
        self.compile_unit(unit, UnitKind::Component, Some(collection))
    }

    /// Compile a collection and its components
    ///
    /// The collection schema is merged with the collection fields contributed
    /// by every component, in component order. Nothing is returned unless
    /// every unit compiles.
    pub fn compile_collection(
        &self,
        collection: &WorkloadUnit,
        components: &[WorkloadUnit],
    ) -> Result<CompiledCollection> {
        let mut compiled = self.compile_unit(collection, UnitKind::Collection, None)?;

        let compiled_components = components
            .iter()
            .map(|component| self.compile_component(component, &collection.api))
            .collect::<Result<Vec<_>>>()?;

        let contributions: Vec<&ApiField> = compiled_components
            .iter()
            .map(|component| &component.collection_fields)
            .collect();

        compiled.spec = merge_schemas(&compiled.spec, &contributions).map_err(|source| {
            CompileError::Schema {
                manifest: collection.name.clone(),
                source,
            }
        })?;

        let mut access_rules = compiled.access_rules.clone();
        let mut ownership_rules = compiled.ownership_rules.clone();
        for component in &compiled_components {
            access_rules.extend(component.access_rules.iter().cloned());
            ownership_rules.extend(component.ownership_rules.iter().cloned());
        }

        tracing::debug!(
            collection = %collection.name,
            components = compiled_components.len(),
            fields = compiled.spec.children.len(),
            "compiled collection"
        );

        Ok(CompiledCollection {
            collection: compiled,
            components: compiled_components,
            access_rules,
            ownership_rules,
        })
    }

    fn compile_unit(
        &self,
        unit: &WorkloadUnit,
        kind: UnitKind,
        collection: Option<&WorkloadApi>,
    ) -> Result<CompiledWorkload> {
        unit.api
            .validate()
            .map_err(|source| CompileError::Validation {
                unit: unit.name.clone(),
                source,
            })?;

        let mut state = UnitState {
            spec: ApiField::spec_root(),
            collection_fields: ApiField::spec_root(),
            access_rules: AccessRules::new(),
            ownership_rules: OwnershipRules::new(),
            unique_names: HashMap::new(),
        };

        let mut registry = FileNameRegistry::new(self.options.reserved_file_names.iter().cloned());
        let mut source_files = Vec::with_capacity(unit.manifests.len());

        for manifest in &unit.manifests {
            tracing::debug!(unit = %unit.name, manifest = %manifest.name, "compiling manifest");

            let inspection = inspect(&manifest.name, &manifest.content, kind)?;

            for marker in &inspection.markers {
                let schema = if marker.is_collection() && kind == UnitKind::Component {
                    &mut state.collection_fields
                } else {
                    &mut state.spec
                };

                schema
                    .add_field(&marker.field().to_definition())
                    .map_err(|source| CompileError::Schema {
                        manifest: manifest.name.clone(),
                        source,
                    })?;
            }

            let children = self.compile_documents(&manifest.name, &inspection.document, &mut state)?;

            let candidate = source_file_name(&manifest.name, &self.options.source_extension);
            source_files.push(SourceFile {
                filename: registry.claim(&candidate)?,
                manifest: manifest.name.clone(),
                children,
            });
        }

        if let Some(collection) = collection {
            if state.spec.children.iter().any(|c| c.name == "Collection") {
                return Err(CompileError::Schema {
                    manifest: unit.name.clone(),
                    source: SchemaError::InvalidPath {
                        path: "collection".to_string(),
                        reason: "reserved for the collection reference".to_string(),
                    },
                });
            }
            state.spec.children.push(ApiField::collection_reference(
                &collection.kind,
                collection.cluster_scoped,
            ));
        }

        Ok(CompiledWorkload {
            name: unit.name.clone(),
            kind,
            api: unit.api.clone(),
            spec: state.spec,
            collection_fields: state.collection_fields,
            access_rules: state.access_rules,
            ownership_rules: state.ownership_rules,
            source_files,
        })
    }

    fn compile_documents(
        &self,
        manifest: &str,
        document: &str,
        state: &mut UnitState,
    ) -> Result<Vec<ChildResource>> {
        let mut children = Vec::new();

        for (index, text) in split_documents(document).into_iter().enumerate() {
            let Some(resource) = decode_resource(manifest, index + 1, text)? else {
                continue;
            };

            let access = resource.access(&self.options);
            state.access_rules.extend(
                AccessRules::for_object(resource.group(), &resource.kind, access, &resource.object)
                    .into_vec(),
            );
            state.ownership_rules.add_or_update(OwnershipRule::new(
                resource.group(),
                resource.version(),
                resource.kind.as_str(),
            ));

            let unique_name =
                unique_resource_name(&resource.kind, resource.namespace.as_deref(), &resource.name);
            if let Some(first) = state.unique_names.get(&unique_name) {
                return Err(CompileError::DuplicateResourceName {
                    name: unique_name,
                    first: first.clone(),
                    manifest: manifest.to_string(),
                    document: index + 1,
                });
            }
            state
                .unique_names
                .insert(unique_name.clone(), manifest.to_string());

            let static_content =
                serde_yaml::to_string(&resource.object).map_err(|source| CompileError::Decode {
                    manifest: manifest.to_string(),
                    document: index + 1,
                    source,
                })?;

            children.push(ChildResource {
                unique_name,
                group: resource.group().to_string(),
                version: resource.version().to_string(),
                source_code: generate_source(&resource.object, &self.options.object_var_name),
                static_content,
                access,
                name: resource.name,
                namespace: resource.namespace,
                kind: resource.kind,
            });
        }

        Ok(children)
    }
}
