//! Service graph and descriptors
//!
//! The loaded description is a mapping from unique service name to
//! [`ServiceDescriptor`]. Descriptors are created once from the document
//! and never mutated; all iteration is by sorted name so re-running on
//! unchanged input produces byte-identical output.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::ast::GoField;
use crate::error::{Error, Result};
use crate::expr::Expression;
use crate::types::TypeSignature;

/// Lifecycle policy for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Scope field absent; behaves as [`Scope::Container`].
    NotSet,
    /// Rebuilt on every accessor call.
    Prototype,
    /// Cached singleton, built at most once.
    Container,
}

impl Scope {
    /// Parses the raw scope string from the document. `None` for values
    /// outside the recognized set.
    pub fn parse(raw: &str) -> Option<Scope> {
        match raw {
            "" => Some(Scope::NotSet),
            "prototype" => Some(Scope::Prototype),
            "container" => Some(Scope::Container),
            _ => None,
        }
    }

    /// The effective policy: unset defaults to container.
    pub fn effective(self) -> Scope {
        match self {
            Scope::NotSet => Scope::Container,
            other => other,
        }
    }
}

/// One named node of the service graph: how to build and expose a single
/// dependency.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceDescriptor {
    /// Concrete produced type.
    #[serde(rename = "type")]
    pub ty: TypeSignature,
    /// Publicly exposed type, when it differs from the produced one.
    pub interface: TypeSignature,
    /// Raw scope string; validated by [`ServiceGraph::validate`].
    pub scope: String,
    /// Caller-supplied parameters, rendered name-sorted.
    pub arguments: BTreeMap<String, TypeSignature>,
    /// Post-construction field assignments, rendered name-sorted.
    pub properties: BTreeMap<String, Expression>,
    /// Construction statement.
    pub returns: Option<Expression>,
    /// Statement executed when construction yields a non-nil error.
    pub error: Option<String>,
    /// Explicit extra module paths to import.
    pub import: Vec<String>,
}

impl ServiceDescriptor {
    /// Declared scope, if recognized.
    pub fn scope(&self) -> Option<Scope> {
        Scope::parse(&self.scope)
    }

    /// The type an accessor returns: the interface when declared,
    /// otherwise the produced local entity type.
    pub fn interface_or_local_entity_type(&self) -> String {
        if !self.interface.is_empty() {
            self.interface.local_entity_type()
        } else {
            self.ty.local_entity_type()
        }
    }

    /// Pointer-or-interface form for a lazily-constructed slot:
    /// interfaces are nilable as-is, value types gain a pointer so
    /// "unset" is representable prior to first construction.
    pub fn interface_or_local_entity_pointer_type(&self) -> String {
        if !self.interface.is_empty() {
            self.interface.local_entity_type()
        } else {
            self.ty.local_entity_pointer_type()
        }
    }

    /// Module paths this service requires, as `(path, alias)` pairs:
    /// explicit `import` entries unaliased, the `type` and `interface`
    /// packages aliased with their local package names.
    pub fn imports(&self) -> BTreeMap<String, String> {
        let mut imports = BTreeMap::new();

        for path in &self.import {
            imports.insert(path.clone(), String::new());
        }

        for sig in [&self.ty, &self.interface] {
            let package = sig.package_name();
            if !package.is_empty() {
                imports.insert(package, sig.local_package_name());
            }
        }

        imports
    }

    /// Declared arguments as `name type` parameter fields, name-sorted.
    pub fn argument_fields(&self) -> Vec<GoField> {
        self.arguments
            .iter()
            .map(|(name, ty)| GoField::new(name, ty.local_entity_type()))
            .collect()
    }
}

/// The container slot type computed for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotType {
    /// Nilable storage for a cached singleton.
    Plain(String),
    /// A rebuildable factory: invoked with the service's dependencies and
    /// declared arguments, returns a fresh value.
    Function {
        /// Dependencies in first-seen order, then own arguments sorted by
        /// name.
        params: Vec<GoField>,
        /// Accessor return type.
        result: String,
    },
}

impl SlotType {
    /// True for function-typed slots.
    pub fn is_function(&self) -> bool {
        matches!(self, SlotType::Function { .. })
    }

    /// Go type text for the struct field.
    pub fn render(&self) -> String {
        match self {
            SlotType::Plain(ty) => ty.clone(),
            SlotType::Function { params, result } => {
                let params = params
                    .iter()
                    .map(|p| format!("{} {}", p.name, p.ty))
                    .collect::<Vec<_>>()
                    .join(", ");
                if result.is_empty() {
                    format!("func({params})")
                } else {
                    format!("func({params}) {result}")
                }
            }
        }
    }
}

/// Mapping from unique service name to descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ServiceGraph {
    services: BTreeMap<String, ServiceDescriptor>,
}

impl ServiceGraph {
    /// Builds a graph from `(name, descriptor)` pairs. Map semantics: a
    /// repeated name keeps the last descriptor.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, ServiceDescriptor)>,
    ) -> ServiceGraph {
        ServiceGraph {
            services: entries.into_iter().collect(),
        }
    }

    /// Service names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Looks up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name)
    }

    /// True when the graph holds a service with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Number of services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// True for an empty graph.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Services whose declared scope matches, in sorted-name order.
    pub fn with_scope(&self, scope: Scope) -> impl Iterator<Item = (&str, &ServiceDescriptor)> {
        self.services
            .iter()
            .filter(move |(_, d)| d.scope() == Some(scope))
            .map(|(n, d)| (n.as_str(), d))
    }

    /// Validates every descriptor's scope. Fails naming the first
    /// offending service, in sorted-name order.
    pub fn validate(&self) -> Result<()> {
        for (name, descriptor) in &self.services {
            if descriptor.scope().is_none() {
                return Err(Error::InvalidScope {
                    service: name.clone(),
                    scope: descriptor.scope.clone(),
                });
            }
        }
        Ok(())
    }

    /// Computes the container slot type for the named service.
    ///
    /// Container scope with zero declared arguments gets nilable storage
    /// in pointer-or-interface form. Everything else (prototype scope, or
    /// container scope with arguments) gets a function type whose
    /// parameters are the `returns` dependencies in first-seen order,
    /// each typed with its own accessor return type, followed by the
    /// service's declared arguments sorted by name.
    pub fn slot_type(&self, name: &str) -> Result<SlotType> {
        let descriptor = self.get(name).ok_or_else(|| Error::UnknownService {
            name: name.to_string(),
        })?;
        let scope = descriptor
            .scope()
            .ok_or_else(|| Error::InvalidScope {
                service: name.to_string(),
                scope: descriptor.scope.clone(),
            })?
            .effective();

        if scope == Scope::Container && descriptor.arguments.is_empty() {
            return Ok(SlotType::Plain(
                descriptor.interface_or_local_entity_pointer_type(),
            ));
        }

        let mut params = Vec::new();
        if let Some(returns) = &descriptor.returns {
            for dep in returns.dependency_names() {
                let dep_descriptor = self.get(&dep).ok_or_else(|| Error::UnknownService {
                    name: dep.clone(),
                })?;
                params.push(GoField::new(
                    dep,
                    dep_descriptor.interface_or_local_entity_type(),
                ));
            }
        }
        params.extend(descriptor.argument_fields());

        Ok(SlotType::Function {
            params,
            result: descriptor.interface_or_local_entity_type(),
        })
    }
}

/// Top-level input document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Description {
    /// The service graph.
    #[serde(default)]
    pub services: ServiceGraph,
}
