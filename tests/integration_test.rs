use clap::Parser;
use openapi_type_schema::{
    any_value::{JsonToken, ScalarValue},
    cli::{self, CliArgs},
    descriptor::{EnumDef, FieldDef, StructDef, TypeDefinition},
    import_json_schema,
    naming::{camel_case, identity, NamingConvention},
    parser::AstParser,
    scanner::FileScanner,
    serializer::serialize_json,
    to_any, translate, AnyValue, Error, JsonSchema, SchemaGenerator, TypeInfo, TypeResolver,
    Visibility,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::thread;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

/// Scan and parse a project into a resolver
fn resolver_for_project(temp_dir: &TempDir) -> TypeResolver {
    let scan_result = FileScanner::new(temp_dir.path().to_path_buf())
        .scan()
        .expect("Failed to scan directory");
    let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .filter_map(Result::ok)
        .collect();
    TypeResolver::new(&parsed_files)
}

fn models_project() -> TempDir {
    create_test_project(vec![("src/models.rs", include_str!("fixtures/models.rs"))])
}

fn to_json(schema: &impl serde::Serialize) -> Value {
    serde_json::to_value(schema).expect("Failed to convert schema to JSON")
}

#[test]
fn test_person_with_camel_case_naming() {
    let person = StructDef::new("Person")
        .field(FieldDef::new("Name", TypeInfo::new("String")))
        .field(FieldDef::new("Age", TypeInfo::option(TypeInfo::new("i32"))));
    let type_resolver = TypeResolver::from_definitions([TypeDefinition::from(person)]);

    let schema = translate(&TypeInfo::new("Person"), &type_resolver, &camel_case, None).unwrap();

    assert_eq!(
        to_json(&schema),
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "format": "int32", "nullable": true}
            },
            "required": ["name"]
        })
    );
}

#[test]
fn test_string_enum_with_identity_naming() {
    let letter = EnumDef::new("Letter", ["A", "B"]).string_enum();
    let type_resolver = TypeResolver::from_definitions([TypeDefinition::from(letter)]);

    let schema = translate(&TypeInfo::new("Letter"), &type_resolver, &identity, None).unwrap();

    assert_eq!(to_json(&schema), json!({"type": "string", "enum": ["A", "B"]}));
}

#[test]
fn test_order_from_source_project() {
    let temp_dir = models_project();
    let type_resolver = resolver_for_project(&temp_dir);
    let generator = SchemaGenerator::new(&type_resolver, &identity);

    let schema = generator
        .generate_root_schema(&TypeInfo::new("Order"))
        .unwrap();

    assert_eq!(
        to_json(&schema),
        json!({
            "type": "object",
            "x-ms-visibility": "important",
            "properties": {
                "orderId": {"type": "string", "format": "uuid"},
                "customer": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer", "format": "int64"},
                        "display_name": {"type": "string"},
                        "internal_score": {
                            "type": "integer",
                            "format": "int32",
                            "nullable": true,
                            "x-ms-visibility": "advanced"
                        }
                    },
                    "required": ["id", "display_name"]
                },
                "lines": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "sku": {"type": "string"},
                            "quantity": {"type": "integer", "format": "int32"},
                            "unit_price": {"type": "number", "format": "double"}
                        },
                        "required": ["sku", "quantity", "unit_price"]
                    }
                },
                "status": {"type": "string", "enum": ["PENDING", "IN_TRANSIT", "done"]},
                "priority": {"type": "integer", "format": "int32"},
                "placedAt": {"type": "string", "format": "date-time"},
                "notes": {"type": "string", "nullable": true},
                "meta": {"type": "object", "additionalProperties": {"type": "string"}},
                "created_by": {"type": "string"},
                "revision": {"type": "integer", "format": "int64"}
            },
            "required": [
                "orderId",
                "customer",
                "lines",
                "status",
                "priority",
                "placedAt",
                "meta",
                "created_by",
                "revision"
            ]
        })
    );

    let names: Vec<_> = schema.properties.unwrap().keys().cloned().collect();
    assert_eq!(
        names,
        vec![
            "orderId",
            "customer",
            "lines",
            "status",
            "priority",
            "placedAt",
            "notes",
            "meta",
            "created_by",
            "revision"
        ]
    );
}

#[test]
fn test_generic_page_substitutes_element_type() {
    let temp_dir = models_project();
    let type_resolver = resolver_for_project(&temp_dir);
    let naming = NamingConvention::CamelCase.strategy();
    let generator = SchemaGenerator::new(&type_resolver, &*naming);

    let schema = generator
        .generate_schema(&TypeInfo::parse("Page<Money>").unwrap(), Some(Visibility::Internal))
        .unwrap();

    assert_eq!(
        to_json(&schema),
        json!({
            "type": "object",
            "x-ms-visibility": "internal",
            "properties": {
                "items": {"type": "array", "items": {"type": "number", "format": "double"}},
                "next": {"type": "string", "nullable": true}
            },
            "required": ["items"]
        })
    );
}

#[test]
fn test_self_referencing_type_is_rejected() {
    let temp_dir = models_project();
    let type_resolver = resolver_for_project(&temp_dir);

    let result = translate(&TypeInfo::new("Category"), &type_resolver, &identity, None);

    match result {
        Err(Error::CyclicSchema { type_name }) => assert_eq!(type_name, "Category"),
        other => panic!("Expected a cyclic schema error, got {:?}", other),
    }
}

#[test]
fn test_newtype_cycles_are_rejected() {
    let temp_dir = create_test_project(vec![(
        "src/tree.rs",
        r#"
            pub struct Tree(Vec<Tree>);

            pub struct Forest {
                pub groves: HashMap<String, Grove>,
            }

            pub struct Grove(Box<Forest>);
        "#,
    )]);
    let type_resolver = resolver_for_project(&temp_dir);

    for type_name in ["Tree", "Forest"] {
        let result = translate(&TypeInfo::new(type_name), &type_resolver, &identity, None);
        match result {
            Err(Error::CyclicSchema { type_name: cycle }) => assert_eq!(cycle, type_name),
            other => panic!("Expected a cyclic schema error, got {:?}", other),
        }
    }
}

#[test]
fn test_import_default_keeps_key_order() {
    let source = JsonSchema::from_json_str(
        r#"{"type": "object", "default": {"zeta": 1, "alpha": {"y": true, "b": false}}}"#,
    )
    .unwrap();

    let schema = import_json_schema(Some(&source)).unwrap().unwrap();
    let json = serialize_json(&schema).unwrap();

    assert!(json.find("\"zeta\"").unwrap() < json.find("\"alpha\"").unwrap());
    assert!(json.find("\"y\"").unwrap() < json.find("\"b\"").unwrap());
}

#[test]
fn test_broken_file_does_not_hide_other_types() {
    let temp_dir = create_test_project(vec![
        ("src/models.rs", include_str!("fixtures/models.rs")),
        ("src/broken.rs", "pub struct Broken {"),
    ]);
    let type_resolver = resolver_for_project(&temp_dir);

    assert!(type_resolver.find_definition("Order").is_some());
    assert!(type_resolver.find_definition("Broken").is_none());
}

#[test]
fn test_concurrent_translation_matches_sequential() {
    let temp_dir = models_project();
    let type_resolver = resolver_for_project(&temp_dir);
    let types: Vec<TypeInfo> = ["Order", "Customer", "Vec<OrderLine>", "Page<Audit>", "OrderStatus"]
        .iter()
        .map(|source| TypeInfo::parse(source).unwrap())
        .collect();

    let sequential: Vec<_> = types
        .iter()
        .map(|t| translate(t, &type_resolver, &camel_case, None).unwrap())
        .collect();

    let concurrent: Vec<Vec<_>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    types
                        .iter()
                        .map(|t| translate(t, &type_resolver, &camel_case, None).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for results in concurrent {
        assert_eq!(results, sequential);
    }
}

#[test]
fn test_import_json_schema_document() {
    let source = JsonSchema::from_json_str(
        r#"{
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Shipment",
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "string", "format": "uuid", "readOnly": true},
                "weight": {"type": "number", "exclusiveMinimum": 0, "maximum": 1000},
                "carrier": {"type": ["string", "null"], "enum": ["ups", "dhl", null]},
                "labels": {"type": "object", "additionalProperties": {"type": "string"}}
            }
        }"#,
    )
    .unwrap();

    let schema = import_json_schema(Some(&source)).unwrap().unwrap();

    assert_eq!(
        to_json(&schema),
        json!({
            "type": "object",
            "title": "Shipment",
            "properties": {
                "id": {"type": "string", "format": "uuid", "readOnly": true},
                "weight": {
                    "type": "number",
                    "minimum": 0.0,
                    "exclusiveMinimum": true,
                    "maximum": 1000.0
                },
                "carrier": {"type": "string", "nullable": true, "enum": ["ups", "dhl", null]},
                "labels": {"type": "object", "additionalProperties": {"type": "string"}}
            },
            "required": ["id"]
        })
    );
}

#[test]
fn test_any_conversion_of_scalars() {
    let guid = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().unwrap();
    assert_eq!(
        to_any(&JsonToken::Scalar(ScalarValue::Guid(guid))).unwrap(),
        AnyValue::String("3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string())
    );
    assert_eq!(
        to_any(&JsonToken::Scalar(ScalarValue::Int32(42))).unwrap(),
        AnyValue::Integer(42)
    );
    assert_eq!(to_any(&JsonToken::Null).unwrap(), AnyValue::Null);
}

#[test]
fn test_cli_schema_command_end_to_end() {
    let temp_dir = models_project();
    let output_dir = TempDir::new().unwrap();
    let output_path = output_dir.path().join("schemas.json");

    let args = CliArgs::try_parse_from([
        "openapi-type-schema",
        "schema",
        temp_dir.path().to_str().unwrap(),
        "-t",
        "OrderStatus",
        "-t",
        "Vec<Priority>",
        "-f",
        "json",
        "-o",
        output_path.to_str().unwrap(),
    ])
    .unwrap();
    let args = cli::parse_args_from_parsed(args).unwrap();
    cli::run(args).unwrap();

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({
            "OrderStatus": {"type": "string", "enum": ["PENDING", "IN_TRANSIT", "done"]},
            "Vec<Priority>": {"type": "array", "items": {"type": "integer", "format": "int32"}}
        })
    );
}

#[test]
fn test_cli_import_yaml_output() {
    let temp_dir = create_test_project(vec![(
        "tag.schema.json",
        r#"{"type": "string", "minLength": 1, "default": "misc"}"#,
    )]);
    let file = temp_dir.path().join("tag.schema.json");

    let args = CliArgs::try_parse_from(["openapi-type-schema", "import", file.to_str().unwrap()])
        .unwrap();
    let output = cli::render(&args).unwrap();

    assert_eq!(output, "type: string\ndefault: misc\nminLength: 1\n");
}

#[test]
fn test_schemas_serialize_in_request_order() {
    let temp_dir = models_project();
    let type_resolver = resolver_for_project(&temp_dir);
    let generator = SchemaGenerator::new(&type_resolver, &identity);
    let types = vec![TypeInfo::new("Priority"), TypeInfo::new("Audit")];

    let schemas = generator.generate_schemas(&types).unwrap();
    let json = serialize_json(&schemas).unwrap();

    assert!(json.find("\"Priority\"").unwrap() < json.find("\"Audit\"").unwrap());
}
