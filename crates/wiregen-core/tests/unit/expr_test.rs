//! Unit tests for expression lexing and resolution

use std::collections::BTreeMap;
use wiregen_core::ast::GoFile;
use wiregen_core::expr::Token;
use wiregen_core::{Error, Expression, ServiceDescriptor, ServiceGraph};

fn graph_of(entries: &[(&str, ServiceDescriptor)]) -> ServiceGraph {
    ServiceGraph::from_entries(
        entries
            .iter()
            .map(|(name, descriptor)| ((*name).to_string(), descriptor.clone())),
    )
}

fn container_service(ty: &str) -> ServiceDescriptor {
    ServiceDescriptor {
        ty: ty.into(),
        ..ServiceDescriptor::default()
    }
}

fn prototype_service(ty: &str) -> ServiceDescriptor {
    ServiceDescriptor {
        ty: ty.into(),
        scope: "prototype".to_string(),
        ..ServiceDescriptor::default()
    }
}

#[test]
fn lexes_literals_and_markers() {
    let expr = Expression::new("${HOME}/data with @{Cache(5)}");
    assert_eq!(
        expr.tokens(),
        vec![
            Token::EnvRef("HOME".to_string()),
            Token::Literal("/data with ".to_string()),
            Token::ServiceRef {
                name: "Cache".to_string(),
                args: Some("5".to_string()),
            },
        ]
    );
}

#[test]
fn unterminated_marker_stays_literal() {
    let expr = Expression::new("prefix @{Broken");
    assert_eq!(expr.tokens(), vec![Token::Literal("prefix @{Broken".to_string())]);
}

#[test]
fn marker_args_may_contain_braces() {
    let expr = Expression::new("@{B(Config{Debug: true})}");
    assert_eq!(
        expr.tokens(),
        vec![Token::ServiceRef {
            name: "B".to_string(),
            args: Some("Config{Debug: true}".to_string()),
        }]
    );
}

#[test]
fn dependency_names_deduplicate_in_first_seen_order() {
    let expr = Expression::new("@{B} @{B} @{C}");
    assert_eq!(expr.dependency_names(), vec!["B", "C"]);
}

#[test]
fn dependency_names_strip_call_arguments() {
    let expr = Expression::new("NewThing(@{B(1, 2)}, @{C})");
    assert_eq!(expr.dependency_names(), vec!["B", "C"]);
}

#[test]
fn dependencies_keep_raw_reference_text() {
    let expr = Expression::new("@{B(1)} @{B(1)} @{C}");
    assert_eq!(expr.dependencies(), vec!["B(1)", "C"]);
}

#[test]
fn resolves_environment_markers_to_getenv() {
    let graph = ServiceGraph::default();
    let mut file = GoFile::new("main");

    let expr = Expression::new("${HOME}/data");
    let resolved = expr.resolve(&graph, &mut file, false).unwrap();

    assert_eq!(resolved, "os.Getenv(\"HOME\")/data");
    assert_eq!(file.imports().collect::<Vec<_>>(), vec![("os", "")]);
}

#[test]
fn environment_import_is_requested_once() {
    let graph = ServiceGraph::default();
    let mut file = GoFile::new("main");

    Expression::new("${HOME}")
        .resolve(&graph, &mut file, false)
        .unwrap();
    Expression::new("${USER}")
        .resolve(&graph, &mut file, false)
        .unwrap();

    assert_eq!(file.imports().count(), 1);
}

#[test]
fn resolves_plain_reference_to_accessor_call() {
    let graph = graph_of(&[("B", container_service("*Widget"))]);
    let mut file = GoFile::new("main");

    let resolved = Expression::new("NewThing(@{B})")
        .resolve(&graph, &mut file, false)
        .unwrap();
    assert_eq!(resolved, "NewThing(container.GetB())");
}

#[test]
fn resolves_call_arguments_to_direct_invocation() {
    let graph = ServiceGraph::default();
    let mut file = GoFile::new("main");

    let resolved = Expression::new("@{B(1, 2)}")
        .resolve(&graph, &mut file, false)
        .unwrap();
    assert_eq!(resolved, "container.GetB(1, 2)");
}

#[test]
fn resolves_function_slot_reference_to_field_access() {
    let graph = graph_of(&[("B", prototype_service("*Widget"))]);
    let mut file = GoFile::new("main");

    let resolved = Expression::new("@{B}")
        .resolve(&graph, &mut file, false)
        .unwrap();
    assert_eq!(resolved, "container.B");
}

#[test]
fn resolves_dependency_params_to_bare_names() {
    let graph = graph_of(&[("B", container_service("*Widget"))]);
    let mut file = GoFile::new("main");

    let resolved = Expression::new("NewThing(@{B(1)})")
        .resolve(&graph, &mut file, true)
        .unwrap();
    assert_eq!(resolved, "NewThing(B)");
}

#[test]
fn unknown_reference_fails_naming_the_service() {
    let graph = ServiceGraph::default();
    let mut file = GoFile::new("main");

    let err = Expression::new("@{Ghost}")
        .resolve(&graph, &mut file, false)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownService { ref name } if name == "Ghost"));
    assert_eq!(err.to_string(), "unknown service: Ghost");
}

#[test]
fn container_scope_with_arguments_resolves_as_function_slot() {
    let descriptor = ServiceDescriptor {
        ty: "*Widget".into(),
        arguments: BTreeMap::from([("size".to_string(), "int".into())]),
        ..ServiceDescriptor::default()
    };
    let graph = graph_of(&[("B", descriptor)]);
    let mut file = GoFile::new("main");

    let resolved = Expression::new("@{B}")
        .resolve(&graph, &mut file, false)
        .unwrap();
    assert_eq!(resolved, "container.B");
}
