use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use tydef_core::config::{self, CONFIG_FILE_NAME, TydefConfig};
use tydef_core::ir::DeclarationTree;
use tydef_core::{
    CompileOptions, Document, GeneratedFile, OpenApiOptions, Printer, compile_openapi,
    compile_schema,
};
use tydef_typescript::{TypeScriptConfig, TypeScriptPrinter};

#[derive(Parser)]
#[command(name = "tydef", about = "JSON Schema / OpenAPI type declaration compiler", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema document and write type declarations
    Generate {
        /// Path to the schema document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory, overriding the config
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name for the root declaration / declaration tree
        #[arg(long)]
        root_name: Option<String>,

        /// Keep only these response status codes in Output unions
        #[arg(long = "status")]
        statuses: Vec<u16>,

        /// Also declare schemas never referenced from an operation
        #[arg(long)]
        all_schemas: bool,
    },

    /// Compile a schema document and report the outcome without writing
    Validate {
        /// Path to the schema document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the compiled declaration tree
    Inspect {
        /// Path to the schema document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new tydef configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            root_name,
            statuses,
            all_schemas,
        } => cmd_generate(input, output, root_name, statuses, all_schemas),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "tydef", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<TydefConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Load a document and compile it, routing OpenAPI documents through the
/// adapter and everything else through the plain schema entry point.
fn load_tree(path: &Path, cfg: &TydefConfig) -> Result<DeclarationTree> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    let document = match ext {
        "json" => Document::from_json(&content)?,
        _ => Document::from_yaml(&content)?,
    };

    let tree = if document.root().get("openapi").is_some() {
        let options = OpenApiOptions {
            filter_statuses: if cfg.openapi.statuses.is_empty() {
                None
            } else {
                Some(cfg.openapi.statuses.iter().copied().collect())
            },
            generate_unused_schemas: cfg.openapi.all_schemas,
            compile: CompileOptions::default(),
        };
        let base_name = cfg.root_name.clone().unwrap_or_else(|| "Api".to_string());
        compile_openapi(&document, &base_name, &options)?
    } else {
        compile_schema(&document, cfg.root_name.as_deref())?
    };

    Ok(tree)
}

fn cmd_generate(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    root_name: Option<String>,
    statuses: Vec<u16>,
    all_schemas: bool,
) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(name) = root_name {
        cfg.root_name = Some(name);
    }
    if !statuses.is_empty() {
        cfg.openapi.statuses = statuses;
    }
    if all_schemas {
        cfg.openapi.all_schemas = true;
    }

    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let tree = load_tree(&input, &cfg)?;
    log::info!(
        "compiled {} into {} declaration(s)",
        input.display(),
        tree.declaration_count()
    );

    let printer_config = TypeScriptConfig {
        file_name: cfg.file_name.clone(),
    };
    let files = TypeScriptPrinter.print(&tree, &printer_config)?;

    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    write_files(&output, &files)
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let tree = load_tree(&input, &cfg)?;
    println!(
        "OK: {} compiles to {} declaration(s)",
        input.display(),
        tree.declaration_count()
    );
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let tree = load_tree(&input, &cfg)?;
    let rendered = match format {
        InspectFormat::Yaml => serde_yaml_ng::to_string(&tree)?,
        InspectFormat::Json => serde_json::to_string_pretty(&tree)?,
    };
    println!("{rendered}");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    fs::write(&path, config::default_config_content())
        .with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("  wrote {}", path.display());
    Ok(())
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}
