//! kql — render injection-safe Kusto statements
//!
//! # Usage
//!
//! ```bash
//! # Render a template
//! kql '{table:Storm Events} | where State == {dynamic:"TEXAS"} | take {int:10}'
//!
//! # With query parameters
//! kql 'StormEvents | take n' --param n:long=10 --json
//!
//! # Show how each placeholder is encoded
//! kql explain '{column:my col} > {real:2.5}'
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use kql::config::{KqlConfig, OutputFormat};
use kql::prelude::*;
use kql::template;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kql")]
#[command(version)]
#[command(about = "Render injection-safe Kusto statements", long_about = None)]
#[command(after_help = "EXAMPLES:
    kql '{table:T} | where x == {int:5}'
    kql '{database:Samples}.{table:StormEvents} | where StartTime > {datetime:2007-01-01T00:00:00Z}'
    kql 'T | take n' --param n:long=10 --json")]
struct Cli {
    /// The statement template to render
    template: Option<String>,

    /// Query parameter as NAME:KIND=VALUE (repeatable)
    #[arg(short, long = "param", value_name = "NAME:KIND=VALUE")]
    params: Vec<String>,

    /// Print the statement and parameters as JSON
    #[arg(long)]
    json: bool,

    /// Config file path
    #[arg(long, env = "KQL_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how each segment of a template is encoded
    Explain {
        /// The template to explain
        template: String,
    },
    /// Show the placeholder kind reference
    Kinds,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = KqlConfig::load(cli.config.as_deref()).context("failed to load config")?;
    init_logging(&config);

    if !config.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Some(Commands::Explain { template }) => explain_template(template),
        Some(Commands::Kinds) => {
            show_kinds();
            Ok(())
        }
        None => match &cli.template {
            Some(template) => render_template(template, cli, &config),
            None => {
                println!("{}", "KQL — injection-safe Kusto statements".cyan().bold());
                println!();
                println!("Usage: kql <TEMPLATE> [OPTIONS]");
                println!();
                println!("Try: kql --help");
                Ok(())
            }
        },
    }
}

fn init_logging(config: &KqlConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse `NAME:KIND=VALUE`.
fn parse_param(arg: &str) -> anyhow::Result<(&str, Literal)> {
    let (head, raw) = arg
        .split_once('=')
        .with_context(|| format!("parameter '{}' is missing '='", arg))?;
    let (name, kind) = head
        .split_once(':')
        .with_context(|| format!("parameter '{}' is missing ':KIND'", arg))?;
    let literal = template::parse_literal(kind, raw)?;
    Ok((name, literal))
}

fn render_template(template: &str, cli: &Cli, config: &KqlConfig) -> anyhow::Result<()> {
    if cli.verbose {
        println!("{} {}", "Template:".dimmed(), template.yellow());
    }

    let mut params = Parameters::new();
    for arg in &cli.params {
        let (name, literal) = parse_param(arg)?;
        params = params.add(name, literal)?;
    }

    let segments = template::parse(template)?;
    let stmt = segments
        .iter()
        .fold(Builder::new("").add_parameters(&params), |builder, segment| {
            segment.apply(builder)
        })
        .build();

    if cli.json || config.format == OutputFormat::Json {
        let out = serde_json::json!({
            "query": stmt,
            "parameters": params.to_json(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", stmt.query());
    if cli.verbose && !params.is_empty() {
        println!();
        println!("{}", "Parameters:".cyan());
        for (name, value) in params.values() {
            println!("  {} = {}", name, value.yellow());
        }
    }
    Ok(())
}

fn explain_template(template: &str) -> anyhow::Result<()> {
    println!("{}", "KQL Template Explanation".cyan().bold());
    println!();
    println!("{} {}", "Template:".dimmed(), template.yellow());
    println!();

    let segments = template::parse(template)?;

    println!("{}", "Segments:".green().bold());
    for segment in &segments {
        let label = match segment {
            Segment::Text(_) => "text".to_string(),
            Segment::Value(literal) => literal.type_name().to_string(),
            Segment::Ident(ident) => ident.kind.to_string(),
        };
        let encoded = segment.apply(Builder::default()).build().into_query();
        println!("  [{}] {}", label.cyan(), encoded.white());
    }

    let stmt = segments
        .iter()
        .fold(Builder::default(), |builder, segment| segment.apply(builder))
        .build();
    println!();
    println!("{}", "Statement:".green().bold());
    println!("  {}", stmt.query().white());
    Ok(())
}

fn show_kinds() {
    println!("{}", "KQL Placeholder Reference".cyan().bold());
    println!();

    let kinds = [
        ("int", "{int:32}", "int(32)"),
        ("long", "{long:32}", "long(32)"),
        ("real", "{real:32.5}", "real(32.5)"),
        ("bool", "{bool:true}", "bool(true)"),
        ("datetime", "{datetime:2019-01-02T03:04:05Z}", "datetime(2019-01-02T03:04:05.0000000Z)"),
        ("timespan", "{timespan:2.01:02:03}", "timespan(2.01:02:03.0000000)"),
        ("dynamic", "{dynamic:[1,2]}", "dynamic(\"[1,2]\")"),
        ("guid", "{guid:12345678-1234-1234-1234-123456789012}", "guid(12345678-...)"),
        ("string", "{string:foo}", "foo (verbatim, not quoted)"),
        ("database", "{database:db}", "database(\"db\")"),
        ("table", "{table:My Table}", "[\"My Table\"]"),
        ("column", "{column:col}", "col"),
        ("function", "{function:f}", "f"),
    ];

    println!(
        "{:10} {:48} {}",
        "Kind".white().bold(),
        "Placeholder".white().bold(),
        "Output".white().bold()
    );
    println!("{}", "─".repeat(100).dimmed());

    for (kind, placeholder, output) in kinds {
        println!(
            "{:10} {:48} {}",
            kind.cyan().bold(),
            placeholder.yellow(),
            output.dimmed()
        );
    }
}
