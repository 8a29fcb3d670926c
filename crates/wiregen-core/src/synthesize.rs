//! Container synthesis
//!
//! Walks the service graph in sorted-name order and assembles the output
//! file's declarations: the container struct, the lazily-initialized
//! default-instance handle, the root constructor, and one accessor per
//! service. Accessor bodies follow a state machine keyed on scope:
//! plain slots get the guarded lazy-singleton shape, function-typed slots
//! rebuild on every call.

use tracing::debug;

use crate::ast::{GoDecl, GoExpr, GoField, GoFile, GoStmt};
use crate::error::Result;
use crate::graph::{Scope, ServiceDescriptor, ServiceGraph, SlotType};

/// Comment lines placed above the package clause of every generated file.
const HEADER: [&str; 2] = [
    "// Code generated by wiregen; DO NOT EDIT.",
    "// Container-scoped slots are built lazily without locking; not safe for concurrent first use.",
];

/// Assembles the generated container file for one service graph.
pub struct ContainerSynthesizer<'a> {
    graph: &'a ServiceGraph,
    package: String,
}

impl<'a> ContainerSynthesizer<'a> {
    /// Creates a synthesizer for the graph, targeting the given package.
    pub fn new(graph: &'a ServiceGraph, package: impl Into<String>) -> Self {
        ContainerSynthesizer {
            graph,
            package: package.into(),
        }
    }

    /// Produces the complete syntax tree for the output file.
    pub fn synthesize(&self) -> Result<GoFile> {
        let mut file = GoFile::new(&self.package);
        file.header = HEADER.iter().map(ToString::to_string).collect();

        let container_struct = self.container_struct()?;
        let new_container = self.new_container()?;
        file.decls.push(container_struct);
        file.decls.push(GoDecl::Var {
            name: "defaultContainer".to_string(),
            ty: "*Container".to_string(),
        });
        file.decls.push(default_container());
        file.decls.push(new_container);

        for name in self.graph.names() {
            let Some(descriptor) = self.graph.get(name) else {
                continue;
            };
            debug!(service = %name, "synthesizing accessor");

            for (path, alias) in descriptor.imports() {
                file.add_import(path, alias);
            }

            let accessor = self.accessor(name, descriptor, &mut file)?;
            file.decls.push(accessor);
        }

        Ok(file)
    }

    /// `type Container struct { ... }` with one field per service, typed
    /// by the slot rule.
    fn container_struct(&self) -> Result<GoDecl> {
        let mut fields = Vec::new();
        for name in self.graph.names() {
            let slot = self.graph.slot_type(name)?;
            fields.push(GoField::new(name, slot.render()));
        }

        Ok(GoDecl::Struct {
            name: "Container".to_string(),
            fields,
        })
    }

    /// The root constructor: builds exactly one container value and
    /// pre-populates every prototype-scoped field with its forwarding
    /// closure, so those fields are never nil. Container-scoped fields
    /// start zero-valued, awaiting first access.
    fn new_container(&self) -> Result<GoDecl> {
        let mut body = vec![GoStmt::Define {
            lhs: "container".to_string(),
            rhs: GoExpr::Raw("&Container{}".to_string()),
        }];

        for (name, _) in self.graph.with_scope(Scope::Prototype) {
            let SlotType::Function { params, result } = self.graph.slot_type(name)? else {
                continue;
            };
            let forward_args = params
                .iter()
                .map(|p| p.name.clone())
                .collect::<Vec<_>>()
                .join(", ");

            body.push(GoStmt::Assign {
                lhs: format!("container.{name}"),
                rhs: GoExpr::FuncLit {
                    params,
                    result,
                    body: vec![GoStmt::Return(GoExpr::Raw(format!(
                        "container.Get{name}({forward_args})"
                    )))],
                },
            });
        }

        body.push(GoStmt::Return(GoExpr::Raw("container".to_string())));

        Ok(GoDecl::Func {
            name: "NewContainer".to_string(),
            receiver: None,
            params: Vec::new(),
            results: vec!["*Container".to_string()],
            body,
        })
    }

    /// One accessor method per service.
    fn accessor(
        &self,
        name: &str,
        descriptor: &ServiceDescriptor,
        file: &mut GoFile,
    ) -> Result<GoDecl> {
        let slot = self.graph.slot_type(name)?;
        let result = descriptor.interface_or_local_entity_type();

        let (params, body) = match &slot {
            SlotType::Function { params, .. } => {
                // Rebuilt every call: no guard, no caching, always a
                // fresh value. Dependencies are local parameters here.
                let mut body = self.construction(descriptor, file, true)?;
                body.push(GoStmt::Return(GoExpr::Raw("service".to_string())));
                (params.clone(), body)
            }
            SlotType::Plain(_) => {
                let mut guarded = self.construction(descriptor, file, false)?;
                guarded.push(store_stmt(name, descriptor));

                let body = vec![
                    GoStmt::If {
                        cond: format!("container.{name} == nil"),
                        body: guarded,
                    },
                    GoStmt::Return(GoExpr::Raw(return_expr(name, descriptor))),
                ];
                (Vec::new(), body)
            }
        };

        Ok(GoDecl::Func {
            name: format!("Get{name}"),
            receiver: Some(GoField::new("container", "*Container")),
            params,
            results: vec![result],
            body,
        })
    }

    /// Construction and property-assignment statements shared by both
    /// body shapes: resolve `returns` into a `service` temporary (zero
    /// value of the declared type when absent), run the `error` clause
    /// when the failure companion is non-nil, then apply every property
    /// name-sorted.
    fn construction(
        &self,
        descriptor: &ServiceDescriptor,
        file: &mut GoFile,
        emitting_dependency_params: bool,
    ) -> Result<Vec<GoStmt>> {
        let mut stmts = Vec::new();

        match &descriptor.returns {
            Some(returns) => {
                let resolved = returns.resolve(self.graph, file, emitting_dependency_params)?;
                match &descriptor.error {
                    Some(on_error) => {
                        stmts.push(GoStmt::Raw(format!("service, err := {resolved}")));
                        stmts.push(GoStmt::If {
                            cond: "err != nil".to_string(),
                            body: vec![GoStmt::Raw(on_error.clone())],
                        });
                    }
                    None => stmts.push(GoStmt::Define {
                        lhs: "service".to_string(),
                        rhs: GoExpr::Raw(resolved),
                    }),
                }
            }
            None => stmts.push(GoStmt::Define {
                lhs: "service".to_string(),
                rhs: GoExpr::Raw(format!("{}{{}}", descriptor.ty.create_local_entity_type())),
            }),
        }

        for (property, value) in &descriptor.properties {
            let resolved = value.resolve(self.graph, file, emitting_dependency_params)?;
            stmts.push(GoStmt::Assign {
                lhs: format!("service.{property}"),
                rhs: GoExpr::Raw(resolved),
            });
        }

        Ok(stmts)
    }
}

/// `func DefaultContainer() *Container` - the lazily-initialized
/// package-wide handle built by one bootstrap call.
fn default_container() -> GoDecl {
    GoDecl::Func {
        name: "DefaultContainer".to_string(),
        receiver: None,
        params: Vec::new(),
        results: vec!["*Container".to_string()],
        body: vec![
            GoStmt::If {
                cond: "defaultContainer == nil".to_string(),
                body: vec![GoStmt::Assign {
                    lhs: "defaultContainer".to_string(),
                    rhs: GoExpr::Raw("NewContainer()".to_string()),
                }],
            },
            GoStmt::Return(GoExpr::Raw("defaultContainer".to_string())),
        ],
    }
}

/// Writes the temporary into the slot, taking its address when the slot
/// is pointer-to-value.
fn store_stmt(name: &str, descriptor: &ServiceDescriptor) -> GoStmt {
    let value = if descriptor.interface.is_empty() && !descriptor.ty.is_pointer() {
        "&service"
    } else {
        "service"
    };

    GoStmt::Assign {
        lhs: format!("container.{name}"),
        rhs: GoExpr::Raw(value.to_string()),
    }
}

/// Returns the slot, dereferenced when the declared external type is a
/// non-pointer value.
fn return_expr(name: &str, descriptor: &ServiceDescriptor) -> String {
    if descriptor.interface.is_empty() && !descriptor.ty.is_pointer() {
        format!("*container.{name}")
    } else {
        format!("container.{name}")
    }
}
