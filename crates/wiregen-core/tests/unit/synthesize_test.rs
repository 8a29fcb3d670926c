//! Unit tests for container synthesis and emission

use std::collections::BTreeMap;
use wiregen_core::{generate, Description, Error, ServiceDescriptor, ServiceGraph};

fn description_of(entries: &[(&str, ServiceDescriptor)]) -> Description {
    Description {
        services: ServiceGraph::from_entries(
            entries
                .iter()
                .map(|(name, descriptor)| ((*name).to_string(), descriptor.clone())),
        ),
    }
}

#[test]
fn container_scope_accessor_constructs_once() {
    // Scenario: unset scope, pointer type, nothing else declared. The
    // body guards on the slot so the second call returns the stored
    // value.
    let description = description_of(&[("A", ServiceDescriptor {
        ty: "*Foo".into(),
        ..ServiceDescriptor::default()
    })]);

    let source = generate(&description, "main").unwrap();
    assert!(source.contains("func (container *Container) GetA() *Foo {\n"));
    assert!(source.contains("\tif container.A == nil {\n"));
    assert!(source.contains("\t\tservice := &Foo{}\n"));
    assert!(source.contains("\t\tcontainer.A = service\n"));
    assert!(source.contains("\treturn container.A\n"));
}

#[test]
fn value_type_slot_stores_address_and_dereferences() {
    let description = description_of(&[("A", ServiceDescriptor {
        ty: "SendEmail".into(),
        ..ServiceDescriptor::default()
    })]);

    let source = generate(&description, "main").unwrap();
    assert!(source.contains("\tA *SendEmail\n"));
    assert!(source.contains("func (container *Container) GetA() SendEmail {\n"));
    assert!(source.contains("\t\tcontainer.A = &service\n"));
    assert!(source.contains("\treturn *container.A\n"));
}

#[test]
fn prototype_accessor_takes_dependencies_then_arguments() {
    // Scenario: prototype A with argument x depending on container B.
    // The accessor signature is (B, x) and the body never caches.
    let description = description_of(&[
        ("A", ServiceDescriptor {
            ty: "*foo.Bar".into(),
            scope: "prototype".to_string(),
            returns: Some("@{B}".into()),
            arguments: BTreeMap::from([("x".to_string(), "int".into())]),
            ..ServiceDescriptor::default()
        }),
        ("B", ServiceDescriptor {
            ty: "foo.Baz".into(),
            scope: "container".to_string(),
            ..ServiceDescriptor::default()
        }),
    ]);

    let source = generate(&description, "main").unwrap();

    // Field is the rebuildable factory type.
    assert!(source.contains("\tA func(B foo.Baz, x int) *foo.Bar\n"));

    // External accessor: fresh construction, dependency used as a local
    // parameter, no guard and no store.
    assert!(source.contains(
        "func (container *Container) GetA(B foo.Baz, x int) *foo.Bar {\n\tservice := B\n\treturn service\n}\n"
    ));

    // Forwarding shim pre-populated by the constructor.
    assert!(source.contains(
        "\tcontainer.A = func(B foo.Baz, x int) *foo.Bar {\n\t\treturn container.GetA(B, x)\n\t}\n"
    ));
}

#[test]
fn environment_marker_imports_os_once_across_services() {
    let description = description_of(&[
        ("A", ServiceDescriptor {
            ty: "string".into(),
            returns: Some("${HOME}/data".into()),
            ..ServiceDescriptor::default()
        }),
        ("B", ServiceDescriptor {
            ty: "string".into(),
            returns: Some("${HOME}/cache".into()),
            ..ServiceDescriptor::default()
        }),
    ]);

    let source = generate(&description, "main").unwrap();
    assert!(source.contains("service := os.Getenv(\"HOME\")/data"));
    assert_eq!(source.matches("\"os\"").count(), 1);
}

#[test]
fn unknown_reference_aborts_naming_the_service() {
    let description = description_of(&[("A", ServiceDescriptor {
        ty: "*Foo".into(),
        returns: Some("@{Ghost}".into()),
        ..ServiceDescriptor::default()
    })]);

    let err = generate(&description, "main").unwrap_err();
    assert!(matches!(err, Error::UnknownService { ref name } if name == "Ghost"));
}

#[test]
fn invalid_scope_aborts_before_synthesis() {
    let description = description_of(&[("A", ServiceDescriptor {
        ty: "*Foo".into(),
        scope: "singleton".to_string(),
        ..ServiceDescriptor::default()
    })]);

    let err = generate(&description, "main").unwrap_err();
    assert_eq!(err.to_string(), "invalid scope for service A: singleton");
}

#[test]
fn error_clause_guards_construction_failure() {
    let description = description_of(&[("A", ServiceDescriptor {
        ty: "*Foo".into(),
        returns: Some("NewFoo()".into()),
        error: Some("panic(err)".to_string()),
        ..ServiceDescriptor::default()
    })]);

    let source = generate(&description, "main").unwrap();
    assert!(source.contains("\t\tservice, err := NewFoo()\n"));
    assert!(source.contains("\t\tif err != nil {\n\t\t\tpanic(err)\n\t\t}\n"));
}

#[test]
fn properties_assign_in_name_sorted_order() {
    let description = description_of(&[("A", ServiceDescriptor {
        ty: "*Foo".into(),
        properties: BTreeMap::from([
            ("Zeta".to_string(), "1".into()),
            ("Alpha".to_string(), "2".into()),
        ]),
        ..ServiceDescriptor::default()
    })]);

    let source = generate(&description, "main").unwrap();
    let alpha = source.find("service.Alpha = 2").unwrap();
    let zeta = source.find("service.Zeta = 1").unwrap();
    assert!(alpha < zeta);
}

#[test]
fn default_instance_is_lazily_initialized() {
    let description = description_of(&[]);
    let source = generate(&description, "main").unwrap();

    assert!(source.contains("var defaultContainer *Container\n"));
    assert!(source.contains(
        "func DefaultContainer() *Container {\n\tif defaultContainer == nil {\n\t\tdefaultContainer = NewContainer()\n\t}\n\treturn defaultContainer\n}\n"
    ));
}

#[test]
fn services_emit_in_name_sorted_order() {
    let description = description_of(&[
        ("Zebra", ServiceDescriptor {
            ty: "*Foo".into(),
            ..ServiceDescriptor::default()
        }),
        ("Alpha", ServiceDescriptor {
            ty: "*Foo".into(),
            ..ServiceDescriptor::default()
        }),
    ]);

    let source = generate(&description, "main").unwrap();
    let alpha = source.find("func (container *Container) GetAlpha()").unwrap();
    let zebra = source.find("func (container *Container) GetZebra()").unwrap();
    assert!(alpha < zebra);
}

#[test]
fn output_is_byte_identical_across_runs() {
    let description = description_of(&[
        ("A", ServiceDescriptor {
            ty: "*Foo".into(),
            returns: Some("NewFoo(@{B})".into()),
            ..ServiceDescriptor::default()
        }),
        ("B", ServiceDescriptor {
            ty: "github.com/acme/widgets.Widget".into(),
            ..ServiceDescriptor::default()
        }),
    ]);

    let first = generate(&description, "main").unwrap();
    let second = generate(&description, "main").unwrap();
    assert_eq!(first, second);
}
