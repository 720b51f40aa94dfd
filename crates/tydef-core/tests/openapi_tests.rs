use std::collections::BTreeSet;

use tydef_core::ir::{LiteralValue, NamespaceNode, QualifiedName, TypeExpr};
use tydef_core::{Document, OpenApiOptions, compile_openapi};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

fn compile(options: &OpenApiOptions) -> tydef_core::ir::DeclarationTree {
    let doc = Document::from_yaml(PETSTORE).expect("fixture should parse");
    compile_openapi(&doc, "Petstore", options).expect("fixture should compile")
}

fn operation<'a>(tree: &'a tydef_core::ir::DeclarationTree, path: &str, method: &str) -> &'a NamespaceNode {
    tree.root
        .child("Paths")
        .and_then(|p| p.child(path))
        .and_then(|p| p.child(method))
        .expect("operation namespace")
}

#[test]
fn input_and_output_shape_for_a_path_parameter_operation() {
    let tree = compile(&OpenApiOptions::default());
    let get_pet = operation(&tree, "PetsId", "Get");

    // Input: a single required `id` field referencing the parameter fragment.
    let input = get_pet.declaration("Input").expect("Input declaration");
    let obj = input.ty.as_object().expect("Input should be a record");
    assert_eq!(obj.fields.len(), 1);
    assert_eq!(obj.fields[0].name, "id");
    assert!(obj.fields[0].required);
    assert_eq!(
        obj.fields[0].ty,
        TypeExpr::Reference(QualifiedName(
            ["Paths", "PetsId", "Get", "Parameters", "Id"]
                .map(String::from)
                .to_vec()
        ))
    );

    // The referenced fragment is a guaranteed-non-null number.
    let id = get_pet
        .child("Parameters")
        .and_then(|p| p.declaration("Id"))
        .expect("Id fragment declaration");
    assert_eq!(id.ty, TypeExpr::NonNull(Box::new(TypeExpr::Number)));

    // Output: a single variant with status literal, optional headers, body.
    let output = get_pet.declaration("Output").expect("Output declaration");
    let variant = output.ty.as_object().expect("single variant, no union wrapper");
    assert_eq!(variant.fields.len(), 3);
    assert_eq!(variant.fields[0].name, "status");
    assert_eq!(
        variant.fields[0].ty,
        TypeExpr::Literal(LiteralValue::Number(200.0))
    );
    assert_eq!(variant.fields[1].name, "headers");
    assert!(!variant.fields[1].required);
    assert_eq!(variant.fields[2].name, "body");
    assert!(variant.fields[2].required);
    assert_eq!(
        variant.fields[2].ty,
        TypeExpr::Reference(QualifiedName(
            ["Paths", "PetsId", "Get", "Responses", "$200"]
                .map(String::from)
                .to_vec()
        ))
    );

    // The body fragment itself resolves to a non-null string.
    let body = get_pet
        .child("Responses")
        .and_then(|r| r.declaration("$200"))
        .expect("$200 fragment declaration");
    assert_eq!(body.ty, TypeExpr::NonNull(Box::new(TypeExpr::String)));
}

#[test]
fn response_headers_merge_into_one_object() {
    let tree = compile(&OpenApiOptions::default());
    let list_pets = operation(&tree, "Pets", "Get");

    let output = list_pets.declaration("Output").expect("Output declaration");
    let variants = match &output.ty {
        TypeExpr::Union(variants) => variants,
        other => panic!("expected a two-variant union, got {other:?}"),
    };
    assert_eq!(variants.len(), 2);

    let ok = variants[0].as_object().expect("200 variant");
    let headers = ok.fields[1].ty.as_object().expect("headers object");
    assert_eq!(headers.fields.len(), 1);
    assert_eq!(headers.fields[0].name, "x-next");
    assert!(!headers.fields[0].required);
}

#[test]
fn referenced_component_schemas_are_declared_once() {
    let tree = compile(&OpenApiOptions::default());
    let schemas = tree
        .root
        .child("Components")
        .and_then(|c| c.child("Schemas"))
        .expect("Components.Schemas namespace");

    for name in ["Pet", "NewPet", "Error"] {
        assert_eq!(
            schemas.declarations.iter().filter(|d| d.name == name).count(),
            1,
            "{name} should be declared exactly once",
        );
    }
    // Unreachable schemas stay undeclared by default.
    assert!(schemas.declaration("Unused").is_none());

    let pet = schemas.declaration("Pet").unwrap();
    let obj = pet.ty.as_object().unwrap();
    assert!(obj.fields[0].required);
    assert!(obj.fields[2].read_only);
}

#[test]
fn generate_unused_schemas_declares_the_whole_registry() {
    let options = OpenApiOptions {
        generate_unused_schemas: true,
        ..Default::default()
    };
    let tree = compile(&options);
    let schemas = tree
        .root
        .child("Components")
        .and_then(|c| c.child("Schemas"))
        .expect("Components.Schemas namespace");
    assert!(schemas.declaration("Unused").is_some());
}

#[test]
fn filter_statuses_restricts_output_variants_only() {
    let options = OpenApiOptions {
        filter_statuses: Some(BTreeSet::from([200])),
        ..Default::default()
    };
    let tree = compile(&options);
    let list_pets = operation(&tree, "Pets", "Get");

    // 404 dropped from Output: a single bare variant remains.
    let output = list_pets.declaration("Output").expect("Output declaration");
    let variant = output.ty.as_object().expect("single variant, no union wrapper");
    assert_eq!(
        variant.fields[0].ty,
        TypeExpr::Literal(LiteralValue::Number(200.0))
    );

    // The unselected status still gets its fragment declaration.
    assert!(
        list_pets
            .child("Responses")
            .and_then(|r| r.declaration("$404"))
            .is_some()
    );
}

#[test]
fn request_body_feeds_input_and_a_body_fragment() {
    let tree = compile(&OpenApiOptions::default());
    let create_pet = operation(&tree, "Pets", "Post");

    let input = create_pet.declaration("Input").expect("Input declaration");
    let obj = input.ty.as_object().unwrap();
    assert_eq!(obj.fields.len(), 1);
    assert_eq!(obj.fields[0].name, "body");
    assert!(obj.fields[0].required);

    let body = create_pet.declaration("Body").expect("Body fragment");
    assert_eq!(
        body.ty,
        TypeExpr::Reference(QualifiedName(
            ["Components", "Schemas", "NewPet"].map(String::from).to_vec()
        ))
    );

    // A bodyless 201 response still yields a variant with status and headers.
    let output = create_pet.declaration("Output").expect("Output declaration");
    let variant = output.ty.as_object().expect("single variant");
    assert_eq!(variant.fields.len(), 2);
    assert_eq!(
        variant.fields[0].ty,
        TypeExpr::Literal(LiteralValue::Number(201.0))
    );
}

#[test]
fn non_openapi_document_is_rejected() {
    let doc = Document::from_yaml("openapi: 2.0.0\ninfo:\n  title: Old\n  version: '1'\n").unwrap();
    assert!(compile_openapi(&doc, "Old", &OpenApiOptions::default()).is_err());
}
