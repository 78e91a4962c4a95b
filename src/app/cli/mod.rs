//! CLI Adapter.

mod logging;
mod wizard;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::app::api;
use crate::app::config::{LogConfig, ToolConfig};
use crate::domain::{AppError, PipelineKind};
use crate::ports::ConfigId;

#[derive(Parser)]
#[command(name = "confwiz")]
#[command(version)]
#[command(
    about = "Build, import and migrate wizard-driven application configurations",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default configuration of a pipeline
    #[clap(visible_alias = "d")]
    Defaults {
        /// Pipeline (preset, workflow, website)
        pipeline: PipelineKind,
    },
    /// Describe the fields of a pipeline
    Schema {
        pipeline: PipelineKind,
        /// One line per leaf field instead of the JSON tree
        #[arg(long)]
        flat: bool,
    },
    /// Report whether a file holds a legacy configuration
    Detect {
        pipeline: PipelineKind,
        /// JSON file, or `-` for stdin
        file: PathBuf,
    },
    /// Migrate or sanitize an imported configuration
    #[clap(visible_alias = "im")]
    Import {
        pipeline: PipelineKind,
        /// JSON file, or `-` for stdin
        file: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List wizard steps and their visibility
    Steps {
        pipeline: PipelineKind,
        /// Configuration to evaluate visibility against (defaults when omitted)
        file: Option<PathBuf>,
    },
    /// Ingest a configuration and store it
    Save {
        pipeline: PipelineKind,
        /// JSON file, or `-` for stdin
        file: PathBuf,
        /// Replace an existing stored configuration
        #[arg(long)]
        id: Option<ConfigId>,
    },
    /// Print a stored configuration
    Show {
        id: ConfigId,
        /// Fail unless the document belongs to this pipeline
        #[arg(short, long)]
        pipeline: Option<PipelineKind>,
        /// Print the bare configuration without `type` and `version`
        #[arg(long)]
        export: bool,
    },
    /// List stored configurations
    #[clap(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        pipeline: Option<PipelineKind>,
    },
    /// Walk through the configuration wizard interactively
    #[clap(visible_alias = "w")]
    Wizard {
        /// Pipeline (defaults to `wizard.default_pipeline`)
        pipeline: Option<PipelineKind>,
        /// Start from an existing configuration file
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();

    let config = api::tool_config();
    match &config {
        Ok(config) => logging::init(&config.log),
        Err(_) => logging::init(&LogConfig::default()),
    }

    let result = config.and_then(|config| dispatch(cli.command, &config));
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(command: Commands, config: &ToolConfig) -> Result<(), AppError> {
    match command {
        Commands::Defaults { pipeline } => print_json(&api::defaults(pipeline)?),
        Commands::Schema { pipeline, flat } => run_schema(pipeline, flat),
        Commands::Detect { pipeline, file } => run_detect(pipeline, &file),
        Commands::Import { pipeline, file, out } => run_import(pipeline, &file, out.as_deref()),
        Commands::Steps { pipeline, file } => run_steps(pipeline, file.as_deref()),
        Commands::Save { pipeline, file, id } => run_save(pipeline, &file, id.as_ref()),
        Commands::Show { id, pipeline, export } => run_show(&id, pipeline, export),
        Commands::List { pipeline } => run_list(pipeline),
        Commands::Wizard { pipeline, from } => wizard::run_wizard(pipeline, from.as_deref(), config),
    }
}

fn run_schema(pipeline: PipelineKind, flat: bool) -> Result<(), AppError> {
    if !flat {
        return print_json(&api::schema(pipeline)?);
    }
    for row in api::schema_rows(pipeline)? {
        println!("{}\t{}\t{}", row.path, row.kind, row.default);
    }
    Ok(())
}

fn run_detect(pipeline: PipelineKind, file: &Path) -> Result<(), AppError> {
    let raw = read_json(file)?;
    let report = api::detect(pipeline, &raw)?;
    println!("{}", report.detection);
    if let Some(tagged) = &report.tag.pipeline
        && report.tag.pipeline_kind() != Some(pipeline)
    {
        println!("⚠️  Document is tagged '{}', checked as '{}'", tagged, pipeline);
    }
    Ok(())
}

fn run_import(pipeline: PipelineKind, file: &Path, out: Option<&Path>) -> Result<(), AppError> {
    let raw = read_json(file)?;
    let report = api::import(pipeline, &raw)?;
    match out {
        Some(path) => {
            fs::write(path, to_pretty(&report.config)?)?;
            println!("✅ Imported {} configuration ({}) to {}", pipeline, report.route, path.display());
            Ok(())
        }
        None => {
            eprintln!("{} ({})", report.route, report.detection);
            print_json(&report.config)
        }
    }
}

fn run_steps(pipeline: PipelineKind, file: Option<&Path>) -> Result<(), AppError> {
    let raw = file.map(read_json).transpose()?;
    for step in api::steps(pipeline, raw.as_ref())? {
        let marker = if step.visible { "✓" } else { "·" };
        match (step.group, step.selector) {
            (Some(group), Some(selector)) => {
                println!("{} {:>2}. {} [{}: {}]", marker, step.ordinal, step.title, group, selector)
            }
            (Some(group), None) => println!("{} {:>2}. {} [{}]", marker, step.ordinal, step.title, group),
            _ => println!("{} {:>2}. {}", marker, step.ordinal, step.title),
        }
    }
    Ok(())
}

fn run_save(pipeline: PipelineKind, file: &Path, id: Option<&ConfigId>) -> Result<(), AppError> {
    let raw = read_json(file)?;
    let outcome = api::save(pipeline, &raw, id)?;
    if id.is_some() {
        println!("✅ Updated {} ({})", outcome.id, outcome.route);
    } else {
        println!("✅ Saved {} ({})", outcome.id, outcome.route);
    }
    Ok(())
}

fn run_show(id: &ConfigId, pipeline: Option<PipelineKind>, export: bool) -> Result<(), AppError> {
    let stored = api::show(id, pipeline)?;
    if export { print_json(&stored.export()) } else { print_json(&stored.to_document()?) }
}

fn run_list(pipeline: Option<PipelineKind>) -> Result<(), AppError> {
    let entries = api::list(pipeline)?;
    if entries.is_empty() {
        println!("No stored configurations");
        return Ok(());
    }
    for entry in entries {
        if entry.legacy {
            println!("{}\t{}\t{}\t(legacy)", entry.id, entry.pipeline, entry.version);
        } else {
            println!("{}\t{}\t{}", entry.id, entry.pipeline, entry.version);
        }
    }
    Ok(())
}

/// Read a JSON document from `path`, or stdin for `-`.
fn read_json(path: &Path) -> Result<Value, AppError> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&content)?)
}

fn to_pretty<T: Serialize>(value: &T) -> Result<String, AppError> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    print!("{}", to_pretty(value)?);
    Ok(())
}
