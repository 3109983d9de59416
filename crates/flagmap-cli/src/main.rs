mod schema_file;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser as CliParser, Subcommand, ValueEnum};
use flagmap::{
    FlagValue, LookupExt, ParseOutcome, ParseResult, Parser, Transcode, Utf16, WideString,
};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::schema_file::{load_schema, write_example_schema};

#[derive(CliParser)]
#[command(name = "flagmap")]
#[command(
    version,
    about = "Inspect flag schemas and run argv through the flagmap parser",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example flagmap.json
    Init(InitArgs),

    /// Print the usage text for a schema
    Usage(SchemaArgs),

    /// Parse tokens against a schema and print every recorded flag
    Parse(ParseArgs),

    /// Parse tokens and print one flag's typed value
    Get(GetArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Target directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing flagmap.json
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct SchemaArgs {
    /// Path to the flag schema (default: ./flagmap.json if present)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,
}

#[derive(Args)]
struct ParseArgs {
    #[command(flatten)]
    schema: SchemaArgs,

    /// Print JSON instead of `key = value` lines
    #[arg(long)]
    json: bool,

    /// Run the parse over UTF-16 tokens and convert the result back
    #[arg(long)]
    wide: bool,

    /// Tokens to parse, after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ValueType {
    String,
    Int,
    Float,
    Bool,
}

#[derive(Args)]
struct GetArgs {
    #[command(flatten)]
    schema: SchemaArgs,

    /// Spelling to look up; repeat to try several in order
    #[arg(short, long = "flag", value_name = "NAME", required = true, allow_hyphen_values = true)]
    flags: Vec<String>,

    /// Type to convert the value to
    #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
    value_type: ValueType,

    /// Value to use when the flag is absent or empty
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    default: Option<String>,

    /// Print the type's zero value instead of failing when the flag is absent
    #[arg(long)]
    lenient: bool,

    /// Run the parse over UTF-16 tokens and convert the result back
    #[arg(long)]
    wide: bool,

    /// Tokens to parse, after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

#[derive(Serialize)]
struct EntryReport<'a> {
    key: &'a str,
    seen: bool,
    raw: &'a str,
    source: &'static str,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Usage(args) => usage(args),
        Commands::Parse(args) => parse_command(args),
        Commands::Get(args) => get_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let path = write_example_schema(&dir, args.force)?;
    eprintln!("Created: {}", path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit flagmap.json to declare your flags");
    eprintln!("  2. Run: flagmap usage");
    eprintln!("  3. Run: flagmap parse -- -d 10ms -i 20");
    Ok(())
}

fn usage(args: SchemaArgs) -> Result<()> {
    let loaded = load_schema(args.schema.as_deref())?;
    let parser = loaded.schema.build_parser();
    if !loaded.schema.summary.trim().is_empty() {
        println!("{} - {}\n", loaded.schema.name, loaded.schema.summary.trim());
    }
    print!("{}", parser.help_text());
    Ok(())
}

/// Parse `tokens`, optionally through a UTF-16 copy of `parser`.
fn run_parser(
    mut parser: Parser,
    tokens: &[String],
    wide: bool,
) -> ParseResult<(ParseOutcome, Parser)> {
    if !wide {
        let outcome = parser.parse(tokens)?;
        return Ok((outcome, parser));
    }

    let mut wide_parser: Parser<WideString> = parser.convert(&Utf16);
    let tokens: Vec<WideString> = tokens.iter().map(|t| Utf16.encode(t)).collect();
    let outcome = wide_parser.parse(&tokens)?;
    tracing::debug!(flags = wide_parser.store().len(), "parsed wide tokens");
    Ok((outcome, wide_parser.convert(&Utf16)))
}

fn parse_command(args: ParseArgs) -> Result<()> {
    let loaded = load_schema(args.schema.schema.as_deref())?;
    let parser = loaded.schema.build_parser();
    let (outcome, parser) = run_parser(parser, &args.tokens, args.wide)
        .with_context(|| format!("failed to parse tokens against {}", loaded.path.display()))?;

    if let ParseOutcome::Help(text) = outcome {
        print!("{text}");
        return Ok(());
    }

    let mut report: Vec<EntryReport<'_>> = parser
        .store()
        .iter()
        .map(|(key, entry)| EntryReport {
            key: key.as_str(),
            seen: entry.seen,
            raw: entry.raw.as_str(),
            source: "argv",
        })
        .collect();
    for spec in parser.registry() {
        if parser.store().entry(spec.key()).is_none() && !spec.default_value.is_empty() {
            report.push(EntryReport {
                key: spec.key().as_str(),
                seen: false,
                raw: spec.default_value.as_str(),
                source: "default",
            });
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
        return Ok(());
    }

    for entry in &report {
        match (entry.source, entry.raw.is_empty()) {
            ("default", _) => println!("{} = {} (default)", entry.key, entry.raw),
            (_, true) => println!("{}", entry.key),
            (_, false) => println!("{} = {}", entry.key, entry.raw),
        }
    }
    Ok(())
}

fn get_command(args: GetArgs) -> Result<()> {
    let loaded = load_schema(args.schema.schema.as_deref())?;
    let parser = loaded.schema.build_parser();
    let (outcome, parser) = run_parser(parser, &args.tokens, args.wide)
        .with_context(|| format!("failed to parse tokens against {}", loaded.path.display()))?;

    if let ParseOutcome::Help(text) = outcome {
        print!("{text}");
        return Ok(());
    }

    let value = match args.value_type {
        ValueType::String => lookup::<String>(&parser, &args)?,
        ValueType::Int => lookup::<i64>(&parser, &args)?,
        ValueType::Float => lookup::<f64>(&parser, &args)?,
        ValueType::Bool => lookup::<bool>(&parser, &args)?,
    };
    println!("{value}");
    Ok(())
}

fn lookup<T>(parser: &Parser, args: &GetArgs) -> Result<String>
where
    T: FlagValue + Default + Display,
{
    let names = args.flags.as_slice();
    let result = match &args.default {
        Some(raw) => {
            let default =
                T::parse_flag(raw).map_err(|e| anyhow!("invalid --default '{raw}': {e}"))?;
            parser.get_or(default, names)
        }
        None => parser.get::<T, _>(names),
    };
    let value = if args.lenient {
        result.or_default_if_missing()
    } else {
        result
    };
    Ok(value?.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
