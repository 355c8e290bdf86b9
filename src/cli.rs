use crate::descriptor::{TypeInfo, Visibility};
use crate::json_schema::{import_json_schema, JsonSchema};
use crate::naming::NamingConvention;
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::schema::Schema;
use crate::schema_generator::SchemaGenerator;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::type_resolver::TypeResolver;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;

/// Generate OpenAPI schemas from Rust type declarations and JSON Schema documents
#[derive(Parser, Debug)]
#[command(name = "openapi-type-schema")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml", global = true)]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE", global = true)]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate types declared in a Rust project into schemas
    Schema {
        /// Path to the Rust project directory
        #[arg(value_name = "PROJECT_PATH")]
        project_path: PathBuf,

        /// Type expression to translate, e.g. `Order` or `Vec<Option<Order>>`
        #[arg(short = 't', long = "type", value_name = "TYPE", required = true)]
        types: Vec<String>,

        /// Naming convention for property and enum member names
        #[arg(short = 'n', long = "naming", value_enum, default_value = "none")]
        naming: NamingConvention,

        /// Visibility stamped on every root schema, overriding type annotations
        #[arg(long = "visibility", value_enum)]
        visibility: Option<Visibility>,

        /// Extra directory names to skip while scanning
        #[arg(short = 'x', long = "exclude", value_name = "DIR")]
        excludes: Vec<String>,
    },
    /// Import a JSON Schema document
    Import {
        /// Path to the JSON Schema file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    match &args.command {
        Command::Schema {
            project_path,
            types,
            naming,
            ..
        } => {
            if !project_path.exists() {
                anyhow::bail!("Project path does not exist: {}", project_path.display());
            }
            if !project_path.is_dir() {
                anyhow::bail!("Project path is not a directory: {}", project_path.display());
            }
            info!("Project path: {}", project_path.display());
            info!("Types: {}", types.join(", "));
            info!("Naming: {:?}", naming);
        }
        Command::Import { file } => {
            if !file.is_file() {
                anyhow::bail!("JSON Schema file does not exist: {}", file.display());
            }
            info!("JSON Schema file: {}", file.display());
        }
    }

    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Run the selected command and write its output
pub fn run(args: CliArgs) -> Result<()> {
    let content = render(&args)?;

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Run the selected command and return the serialized output
pub fn render(args: &CliArgs) -> Result<String> {
    match &args.command {
        Command::Schema {
            project_path,
            types,
            naming,
            visibility,
            excludes,
        } => {
            let scanner = excludes
                .iter()
                .fold(FileScanner::new(project_path.clone()), |scanner, name| {
                    scanner.exclude(name.as_str())
                });
            let schemas = generate_project_schemas(scanner, types, *naming, *visibility)?;
            serialize(&schemas, args.output_format)
        }
        Command::Import { file } => {
            info!("Importing JSON Schema...");
            let source = JsonSchema::from_file(file)
                .with_context(|| format!("Failed to read JSON Schema: {}", file.display()))?;
            let schema = import_json_schema(Some(&source))?;
            serialize(&schema, args.output_format)
        }
    }
}

fn generate_project_schemas(
    scanner: FileScanner,
    types: &[String],
    naming: NamingConvention,
    visibility: Option<Visibility>,
) -> Result<IndexMap<String, Schema>> {
    info!("Scanning project directory...");
    let scan_result = scanner.scan()?;
    info!("Found {} Rust files", scan_result.rust_files.len());
    if scan_result.rust_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    info!("Parsing Rust files...");
    let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .filter_map(|r| {
            r.inspect_err(|e| debug!("Skipping file due to parse error: {}", e))
                .ok()
        })
        .collect();
    info!("Successfully parsed {} files", parsed_files.len());

    let type_resolver = TypeResolver::new(&parsed_files);
    info!("Registered {} type definitions", type_resolver.len());

    let type_infos = types
        .iter()
        .map(|source| {
            TypeInfo::parse(source).with_context(|| format!("Invalid type expression: {}", source))
        })
        .collect::<Result<Vec<_>>>()?;

    let strategy = naming.strategy();
    let generator = SchemaGenerator::new(&type_resolver, &*strategy);
    let schemas = match visibility {
        Some(visibility) => {
            let mut schemas = IndexMap::new();
            for type_info in &type_infos {
                let schema = generator.generate_schema(type_info, Some(visibility))?;
                schemas.insert(type_info.to_string(), schema);
            }
            schemas
        }
        None => generator.generate_schemas(&type_infos)?,
    };
    info!("Generated {} schemas", schemas.len());

    Ok(schemas)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    info!("Serializing to {:?} format...", format);
    match format {
        OutputFormat::Yaml => serialize_yaml(value),
        OutputFormat::Json => serialize_json(value),
    }
}
