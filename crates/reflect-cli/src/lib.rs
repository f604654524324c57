//! # reflect-rs
//!
//! Resolves constructors, fields, and methods of a JSON type model by partial
//! signature and prints the closest declared member.
//!
//! ## Environment
//!
//! - `REFLECT_RS_LOG`: tracing filter for diagnostics on stderr (default `warn`).
//! - `REFLECT_RS_CACHE_CAPACITY`, `REFLECT_RS_EXACT_LOOKUP`, `REFLECT_RS_METRICS`:
//!   see [`ResolverConfig`].
use clap::{Parser, Subcommand};
use reflect_host::model::{load_registry, ModelError};
use reflect_resolver::{MemberCache, ReflectError, ReflectionService, ResolverConfig};
use reflect_types::{error::HostError, TypeDescriptor, TypeName};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Resolves the closest member of a type model for a partial signature"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,
    /// Print cache statistics after resolving
    #[arg(long)]
    pub stats: bool,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a constructor by its parameter types
    Constructor {
        owner: TypeName,
        /// Parameter type; `null` or `_` leaves the position unconstrained
        #[arg(short, long = "param", value_name = "TYPE", value_parser = parse_constraint)]
        params: Vec<Constraint>,
    },
    /// Resolve a field by name and/or type
    Field {
        owner: TypeName,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        field_type: Option<TypeDescriptor>,
    },
    /// Resolve a method by name, parameter types, and/or return type
    Method {
        owner: TypeName,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long = "param", value_name = "TYPE", value_parser = parse_constraint)]
        params: Vec<Constraint>,
        #[arg(short, long, value_name = "TYPE")]
        returns: Option<TypeDescriptor>,
    },
}

/// A parameter position given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint(pub Option<TypeDescriptor>);

fn parse_constraint(raw: &str) -> Result<Constraint, HostError> {
    match raw.trim() {
        "null" | "_" => Ok(Constraint(None)),
        other => other.parse().map(|ty| Constraint(Some(ty))),
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Error loading model: {0}")]
    Model(#[from] ModelError),
    #[error(transparent)]
    Reflect(#[from] ReflectError),
    #[error("Error encoding output: {0}")]
    Output(#[from] serde_json::Error),
}

fn constraints(params: &[Constraint]) -> Vec<Option<TypeDescriptor>> {
    params.iter().map(|c| c.0.clone()).collect()
}

/// Loads the model, resolves the requested member, and renders the output.
pub fn run(args: &Args) -> Result<String, CliError> {
    let registry = load_registry(&args.model)?;
    let service = ReflectionService::with_cache(Arc::new(registry), Arc::new(MemberCache::new()))
        .with_config(ResolverConfig::from_env());

    let (kind, member) = match &args.command {
        Command::Constructor { owner, params } => (
            "constructor",
            service
                .resolve_constructor(owner, &constraints(params))?
                .to_string(),
        ),
        Command::Field {
            owner,
            name,
            field_type,
        } => (
            "field",
            service
                .resolve_field(owner, name.as_deref(), field_type.as_ref())?
                .to_string(),
        ),
        Command::Method {
            owner,
            name,
            params,
            returns,
        } => (
            "method",
            service
                .resolve_method(owner, name.as_deref(), &constraints(params), returns.as_ref())?
                .to_string(),
        ),
    };
    debug!("resolved {} {}", kind, member);

    let stats = args.stats.then(|| service.stats());
    if args.json {
        let mut output = serde_json::json!({ "kind": kind, "member": member });
        if let Some(stats) = stats {
            output["stats"] = serde_json::to_value(stats)?;
        }
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    let mut output = member;
    if let Some(stats) = stats {
        output.push('\n');
        output.push_str(stats.to_string().trim_end());
    }
    Ok(output)
}

pub fn run_cli() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_env("REFLECT_RS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
