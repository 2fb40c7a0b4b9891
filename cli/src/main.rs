use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use marshal_config::{PermissionSet, TreeConfig};
use marshal_core::{ArgumentValue, CommandNode, CommandSyntaxError, NodeSnapshot, StringReader};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "MARSHAL_LOG";

/// Output encoding for structured results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

/// Reader operation exercised by `lex`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LexKind {
    Int,
    Long,
    Float,
    Double,
    Bool,
    String,
}

#[derive(Debug, Parser)]
#[command(name = "marshal")]
#[command(about = "Inspect string readers and command tree definitions")]
struct Cli {
    /// Enable debug logging (overrides MARSHAL_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one typed read against an input string.
    Lex(LexArgs),
    /// Load, validate and print a command tree definition.
    Tree(TreeArgs),
    /// List every executable path of a command tree definition.
    Paths(PathsArgs),
}

#[derive(Debug, Args)]
struct LexArgs {
    /// Value type to read.
    kind: LexKind,
    /// Input text.
    #[arg(allow_hyphen_values = true)]
    input: String,
    /// Byte offset to start reading from.
    #[arg(long, default_value_t = 0)]
    cursor: usize,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct TreeArgs {
    /// Definition file (.yaml, .yml or .json).
    file: PathBuf,
    /// Comma-separated permissions; only nodes usable with them are shown.
    #[arg(long = "as")]
    permissions: Option<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct PathsArgs {
    /// Definition file (.yaml, .yml or .json).
    file: PathBuf,
    /// Comma-separated permissions; only paths usable with them are listed.
    #[arg(long = "as")]
    permissions: Option<String>,
}

/// Result of a successful `lex` run.
#[derive(Debug, Serialize)]
struct LexOutput {
    value: ArgumentValue,
    cursor: usize,
    read: String,
    remaining: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Lex(args) => run_lex(args),
        Command::Tree(args) => run_tree(args),
        Command::Paths(args) => run_paths(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_lex(args: LexArgs) -> Result<(), String> {
    if args.cursor > args.input.len() || !args.input.is_char_boundary(args.cursor) {
        return Err(format!(
            "--cursor {} is not a character boundary of the input",
            args.cursor
        ));
    }

    let mut reader = StringReader::new(args.input.as_str());
    reader.set_cursor(args.cursor);
    let start = reader.cursor();

    let value = read_value(&mut reader, args.kind)
        .map_err(|err| format!("{err}: {}", err.context()))?;
    debug!(kind = ?args.kind, start, end = reader.cursor(), "Read value");

    let output = LexOutput {
        value,
        cursor: reader.cursor(),
        read: reader.string()[start..reader.cursor()].to_string(),
        remaining: reader.remaining().to_string(),
    };
    println!("{}", render(&output, args.format)?);
    Ok(())
}

fn read_value(reader: &mut StringReader, kind: LexKind) -> Result<ArgumentValue, CommandSyntaxError> {
    Ok(match kind {
        LexKind::Int => ArgumentValue::Integer(reader.read_int()?),
        LexKind::Long => ArgumentValue::Long(reader.read_long()?),
        LexKind::Float => ArgumentValue::Float(reader.read_float()?),
        LexKind::Double => ArgumentValue::Double(reader.read_double()?),
        LexKind::Bool => ArgumentValue::Bool(reader.read_boolean()?),
        LexKind::String => ArgumentValue::Word(reader.read_string()),
    })
}

fn run_tree(args: TreeArgs) -> Result<(), String> {
    let roots = load_roots(&args.file)?;
    let snapshots = snapshot_roots(&roots, args.permissions.as_deref());
    println!("{}", render(&snapshots, args.format)?);
    Ok(())
}

fn run_paths(args: PathsArgs) -> Result<(), String> {
    let roots = load_roots(&args.file)?;
    let mut paths: Vec<String> = snapshot_roots(&roots, args.permissions.as_deref())
        .iter()
        .flat_map(NodeSnapshot::paths)
        .collect();
    paths.sort();
    for path in paths {
        println!("{path}");
    }
    Ok(())
}

fn load_roots(file: &Path) -> Result<Vec<CommandNode<PermissionSet>>, String> {
    let config = TreeConfig::load(file)
        .map_err(|err| format!("Failed to load '{}': {err}", file.display()))?;
    config
        .build::<PermissionSet>()
        .map_err(|err| format!("Failed to build '{}': {err}", file.display()))
}

fn snapshot_roots(
    roots: &[CommandNode<PermissionSet>],
    permissions: Option<&str>,
) -> Vec<NodeSnapshot> {
    match permissions {
        Some(list) => {
            let granted = PermissionSet::from_csv(list);
            roots
                .iter()
                .filter_map(|root| NodeSnapshot::capture_visible(root, &granted))
                .collect()
        }
        None => roots.iter().map(NodeSnapshot::capture).collect(),
    }
}

fn render<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize JSON output: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map(|raw| raw.trim_end().to_string())
            .map_err(|err| format!("Failed to serialize YAML output: {err}")),
    }
}
