use anyhow::{Context, Result};
use std::{fmt::Display, path::PathBuf};

use log::*;

use mbl::*;
use mbl_ast::load::{dump_ast_to_string, write_ast_to_file};
use mbl_write::output::read_outputs_from_file;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Verbosity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verbosity::Trace => write!(f, "trace"),
            Verbosity::Debug => write!(f, "debug"),
            Verbosity::Info => write!(f, "info"),
            Verbosity::Warn => write!(f, "warn"),
            Verbosity::Error => write!(f, "error"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// The cimgui binding to Dear ImGui
    Cimgui,
    /// No filtering or renaming, default passes only
    Empty,
}

#[derive(Parser)]
struct Args {
    /// Verbosity of the output
    #[clap(short, long, arg_enum, value_parser)]
    verbosity: Option<Verbosity>,

    /// Configuration file. Overrides --preset.
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Built-in configuration to use when no file is given
    #[clap(short, long, arg_enum, value_parser, default_value = "cimgui")]
    preset: Preset,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter, rename and fix up a declaration tree dump
    Process {
        /// Tree dump from the header parser
        #[clap(value_parser)]
        input: PathBuf,

        /// Where to write the processed tree. Printed to stdout if not given.
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },
    /// Apply the configured substitutions to emitter output and write the files
    Rewrite {
        /// Emitter outputs as JSON
        #[clap(value_parser)]
        input: PathBuf,

        /// Directory to write the rewritten files to
        #[clap(short, long, value_parser)]
        output_dir: PathBuf,
    },
    /// Print the configuration as JSON, for use as a starting point with --config
    Config,
}

fn load_config(args: &Args) -> Result<BindConfig> {
    match &args.config {
        Some(path) => Ok(read_config(path)?),
        None => Ok(match args.preset {
            Preset::Cimgui => BindConfig::cimgui(),
            Preset::Empty => BindConfig::default(),
        }),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = args
        .verbosity
        .map(|v| v.to_string())
        .unwrap_or_else(|| "warn".to_string());
    mbl_util::init_log_with_level(&level);

    let config = load_config(&args)?;
    let pipeline = Pipeline::new(&config);

    match &args.command {
        Command::Process { input, output } => {
            let mut ast = JsonFrontEnd::new(input)
                .parse(&ParseOptions::from(&config))
                .with_context(|| format!("Failed to load \"{}\"", input.display()))?;

            let changes = pipeline.process(&mut ast)?;
            info!("Made {changes} change(s) to the tree");

            match output {
                Some(path) => write_ast_to_file(&ast, path)?,
                None => println!("{}", dump_ast_to_string(&ast)?),
            }
        }
        Command::Rewrite { input, output_dir } => {
            let mut outputs = read_outputs_from_file(input)
                .with_context(|| format!("Failed to load \"{}\"", input.display()))?;

            let changes = pipeline.postprocess(&mut outputs)?;
            info!("Rewrote {changes} block(s)");

            mbl_write::write_outputs(&outputs, output_dir)?;
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
