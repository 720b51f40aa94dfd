use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};

use crate::compile::{
    CompileOptions, ExprBuilder, Resolver, assemble, collapse_union, member_identifier,
};
use crate::compile::ident::qualify;
use crate::error::{CompileError, ParseError};
use crate::ir::{
    Declaration, DeclarationTree, FieldDef, LiteralValue, ObjectType, TypeExpr,
};
use crate::schema::{Document, RefPath, Schema, SchemaNode};

use super::document::{
    Header, HeaderOrRef, MediaType, OpenApiDocument, Operation, Parameter, ParameterOrRef,
    RequestBody, RequestBodyOrRef, Response, ResponseOrRef,
};

/// Options recognized by [`compile_openapi`].
#[derive(Debug, Clone, Default)]
pub struct OpenApiOptions {
    /// Restrict which response status codes appear in synthesized `Output`
    /// unions. Fragments for unselected statuses are still declared.
    pub filter_statuses: Option<BTreeSet<u16>>,

    /// Also declare every schema in the document's schema registry, not
    /// only the reachable ones.
    pub generate_unused_schemas: bool,

    pub compile: CompileOptions,
}

/// Compile an OpenAPI document into a declaration tree named `base_name`.
///
/// The adapter walks every operation's request body, responses, and
/// parameters, writes a synthesized schema fragment for each into a
/// working copy of the document (the caller's input is never mutated), and
/// drives the ordinary reference resolution fixpoint over that overlay.
/// Per operation it additionally hand-assembles an `Input` record and an
/// `Output` union whose leaves are qualified references to the fragments.
pub fn compile_openapi(
    document: &Document,
    base_name: &str,
    options: &OpenApiOptions,
) -> Result<DeclarationTree, CompileError> {
    let api: OpenApiDocument =
        serde_json::from_value(document.root().clone()).map_err(ParseError::from)?;
    if !api.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(api.openapi).into());
    }

    let identifier = options.compile.identifier;
    let mut working = document.clone();
    let mut discovered: IndexSet<RefPath> = IndexSet::new();
    let mut synthesized: Vec<(RefPath, Declaration)> = Vec::new();

    for (url, item) in &api.paths {
        let mut path_params = Vec::new();
        for parameter in &item.parameters {
            path_params.push(lookup_parameter(&api, parameter)?);
        }
        for (method, op) in item.operations() {
            let base = RefPath::from_segments(vec![
                "paths".to_string(),
                identifier(url),
                method.to_string(),
            ]);
            log::debug!("synthesizing {} {}", method, url);
            synthesize_operation(
                &api,
                &mut working,
                &base,
                op,
                &path_params,
                options,
                &mut discovered,
                &mut synthesized,
            )?;
        }
    }

    if options.generate_unused_schemas {
        for name in working.keys_at(&["components", "schemas"]) {
            discovered.insert(RefPath::from_segments(vec![
                "components".to_string(),
                "schemas".to_string(),
                name,
            ]));
        }
    }

    let mut resolver = Resolver::new(&working, &options.compile);
    for (path, declaration) in synthesized {
        resolver.declare(path, declaration);
    }
    for path in discovered {
        resolver.discover(path);
    }
    resolver.run()?;

    Ok(DeclarationTree {
        name: identifier(base_name),
        root: assemble(resolver.into_declarations(), identifier),
    })
}

#[allow(clippy::too_many_arguments)]
fn synthesize_operation(
    api: &OpenApiDocument,
    working: &mut Document,
    base: &RefPath,
    op: &Operation,
    path_params: &[Parameter],
    options: &OpenApiOptions,
    discovered: &mut IndexSet<RefPath>,
    out: &mut Vec<(RefPath, Declaration)>,
) -> Result<(), CompileError> {
    let identifier = options.compile.identifier;
    let mut input_fields: Vec<FieldDef> = Vec::new();

    // Request body: the union of its media-type schemas under `Body`.
    if let Some(ref body_or_ref) = op.request_body {
        let body = lookup_request_body(api, body_or_ref)?;
        let schemas = media_schemas(&body.content);
        if !schemas.is_empty() {
            let path = base.join("Body");
            working.insert(&path, &union_of(schemas));
            discovered.insert(path.clone());
            input_fields.push(FieldDef {
                name: "body".to_string(),
                required: body.required,
                read_only: false,
                ty: TypeExpr::Reference(qualify(&path, identifier)),
            });
        }
    }

    // Parameters: path-level first, then operation-level, each schema
    // under `Parameters/<name>`.
    let mut parameters = path_params.to_vec();
    for parameter in &op.parameters {
        parameters.push(lookup_parameter(api, parameter)?);
    }
    for parameter in &parameters {
        let Some(ref schema) = parameter.schema else {
            continue;
        };
        let path = base.join("Parameters").join(&parameter.name);
        working.insert(&path, schema);
        discovered.insert(path.clone());
        input_fields.push(FieldDef {
            name: member_identifier(&parameter.name),
            required: parameter.required,
            read_only: false,
            ty: TypeExpr::Reference(qualify(&path, identifier)),
        });
    }

    // Responses: per status, the union of media-type schemas under
    // `Responses/$<code>`, plus one Output variant per selected status.
    let mut variants: Vec<TypeExpr> = Vec::new();
    for (code, response_or_ref) in &op.responses {
        let response = lookup_response(api, response_or_ref)?;

        let mut body_ref = None;
        let schemas = media_schemas(&response.content);
        if !schemas.is_empty() {
            let path = base.join("Responses").join(&format!("${code}"));
            working.insert(&path, &union_of(schemas));
            discovered.insert(path.clone());
            body_ref = Some(TypeExpr::Reference(qualify(&path, identifier)));
        }

        // Declared headers merge into one object; only the leaf schemas go
        // through the expression builder.
        let mut header_fields = Vec::new();
        for (name, header_or_ref) in &response.headers {
            let header = lookup_header(api, header_or_ref)?;
            let Some(ref schema) = header.schema else {
                continue;
            };
            let ty = ExprBuilder::new(identifier, discovered).build_one(schema)?;
            header_fields.push(FieldDef {
                name: name.clone(),
                required: header.required,
                read_only: false,
                ty,
            });
        }

        if !status_selected(code, options) {
            continue;
        }
        let mut fields = vec![
            FieldDef {
                name: "status".to_string(),
                required: true,
                read_only: false,
                ty: status_literal(code),
            },
            FieldDef {
                name: "headers".to_string(),
                required: false,
                read_only: false,
                ty: TypeExpr::Object(ObjectType {
                    fields: header_fields,
                    index: None,
                }),
            },
        ];
        if let Some(ty) = body_ref {
            fields.push(FieldDef {
                name: "body".to_string(),
                required: true,
                read_only: false,
                ty,
            });
        }
        variants.push(TypeExpr::Object(ObjectType {
            fields,
            index: None,
        }));
    }

    out.push((
        base.join("Input"),
        Declaration {
            name: "Input".to_string(),
            ambient: false,
            ty: TypeExpr::Object(ObjectType {
                fields: input_fields,
                index: None,
            }),
        },
    ));
    out.push((
        base.join("Output"),
        Declaration {
            name: "Output".to_string(),
            ambient: false,
            ty: collapse_union(variants),
        },
    ));
    Ok(())
}

fn media_schemas(content: &IndexMap<String, MediaType>) -> Vec<SchemaNode> {
    content
        .values()
        .filter_map(|media| media.schema.clone())
        .collect()
}

/// Combine media-type schemas into one synthetic node.
fn union_of(mut schemas: Vec<SchemaNode>) -> SchemaNode {
    if schemas.len() == 1 {
        return schemas.remove(0);
    }
    SchemaNode::Schema(Box::new(Schema {
        any_of: schemas,
        ..Default::default()
    }))
}

fn status_selected(code: &str, options: &OpenApiOptions) -> bool {
    match (&options.filter_statuses, code.parse::<u16>()) {
        (Some(filter), Ok(code)) => filter.contains(&code),
        // Non-numeric codes such as `default` are never filtered out.
        _ => true,
    }
}

fn status_literal(code: &str) -> TypeExpr {
    match code.parse::<f64>() {
        Ok(n) => TypeExpr::Literal(LiteralValue::Number(n)),
        Err(_) => TypeExpr::Number,
    }
}

// Component lookups. A reference that does not name an existing component
// is a precondition violation of the document author.

fn component_name(raw: &str, section: &str) -> Option<String> {
    let path = RefPath::parse(raw);
    match path.segments() {
        [first, second, name] if first.as_str() == "components" && second.as_str() == section => {
            Some(name.clone())
        }
        _ => None,
    }
}

fn lookup_parameter(
    api: &OpenApiDocument,
    parameter: &ParameterOrRef,
) -> Result<Parameter, CompileError> {
    match parameter {
        ParameterOrRef::Parameter(p) => Ok(p.clone()),
        ParameterOrRef::Ref { ref_path } => component_name(ref_path, "parameters")
            .and_then(|name| api.components.as_ref()?.parameters.get(&name).cloned())
            .and_then(|entry| match entry {
                ParameterOrRef::Parameter(p) => Some(p),
                ParameterOrRef::Ref { .. } => None,
            })
            .ok_or_else(|| CompileError::RefTargetNotFound(RefPath::parse(ref_path))),
    }
}

fn lookup_request_body(
    api: &OpenApiDocument,
    body: &RequestBodyOrRef,
) -> Result<RequestBody, CompileError> {
    match body {
        RequestBodyOrRef::RequestBody(b) => Ok(b.clone()),
        RequestBodyOrRef::Ref { ref_path } => component_name(ref_path, "requestBodies")
            .and_then(|name| api.components.as_ref()?.request_bodies.get(&name).cloned())
            .and_then(|entry| match entry {
                RequestBodyOrRef::RequestBody(b) => Some(b),
                RequestBodyOrRef::Ref { .. } => None,
            })
            .ok_or_else(|| CompileError::RefTargetNotFound(RefPath::parse(ref_path))),
    }
}

fn lookup_response(
    api: &OpenApiDocument,
    response: &ResponseOrRef,
) -> Result<Response, CompileError> {
    match response {
        ResponseOrRef::Response(r) => Ok(r.clone()),
        ResponseOrRef::Ref { ref_path } => component_name(ref_path, "responses")
            .and_then(|name| api.components.as_ref()?.responses.get(&name).cloned())
            .and_then(|entry| match entry {
                ResponseOrRef::Response(r) => Some(r),
                ResponseOrRef::Ref { .. } => None,
            })
            .ok_or_else(|| CompileError::RefTargetNotFound(RefPath::parse(ref_path))),
    }
}

fn lookup_header(api: &OpenApiDocument, header: &HeaderOrRef) -> Result<Header, CompileError> {
    match header {
        HeaderOrRef::Header(h) => Ok(h.clone()),
        HeaderOrRef::Ref { ref_path } => component_name(ref_path, "headers")
            .and_then(|name| api.components.as_ref()?.headers.get(&name).cloned())
            .and_then(|entry| match entry {
                HeaderOrRef::Header(h) => Some(h),
                HeaderOrRef::Ref { .. } => None,
            })
            .ok_or_else(|| CompileError::RefTargetNotFound(RefPath::parse(ref_path))),
    }
}
