#![allow(dead_code)]
#![allow(unused_imports)]

use clap::{Parser, Subcommand};
use cmds::analyze::OutputFormat;
use std::path::PathBuf;

mod classify;
mod cmds;
mod codegen;
mod layout;
mod plan;

#[derive(Parser)]
#[command(name = "marshal-gen")]
#[command(about = "Command-queue marshalling generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate the C marshalling unit from API descriptions */
    Codegen {
        /* Input YAML files containing operation descriptions */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Output directory for the generated sources */
        #[arg(
            short = 'o',
            long = "output",
            value_name = "DIR",
            default_value = "generated"
        )]
        output_dir: PathBuf,

        /* Largest command record, in bytes, the queue accepts */
        #[arg(
            long = "max-cmd-size",
            value_name = "BYTES",
            default_value_t = crate::codegen::c::DEFAULT_MAX_CMD_SIZE
        )]
        max_cmd_size: u32,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Analyze descriptions and report classification and layout */
    Analyze {
        /* Input YAML files containing operation descriptions */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Report format */
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,

        /* Print the record layout for a specific operation */
        #[arg(long = "operation", value_name = "NAME")]
        operation: Option<String>,

        /* Largest command record, in bytes, the queue accepts */
        #[arg(
            long = "max-cmd-size",
            value_name = "BYTES",
            default_value_t = crate::codegen::c::DEFAULT_MAX_CMD_SIZE
        )]
        max_cmd_size: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Codegen {
            files,
            output_dir,
            max_cmd_size,
            verbose,
        } => {
            cmds::codegen::run(files, output_dir, max_cmd_size, verbose)?;
        }

        Commands::Analyze {
            files,
            format,
            operation,
            max_cmd_size,
        } => {
            cmds::analyze::run(files, format, operation, max_cmd_size)?;
        }
    }

    Ok(())
}
