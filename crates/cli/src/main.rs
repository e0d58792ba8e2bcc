use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use output::OutputFormat;

/// wasmdock - build WebAssembly modules and serve the artifacts
#[derive(Parser)]
#[command(name = "wasmdock")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile a source module and publish its artifact set
  Build {
    /// Path to the source file (.rs, .c or .cpp)
    source: PathBuf,

    /// Logical module name (default: the source file stem)
    name: Option<String>,

    /// Output format for the build summary
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
  },

  /// Serve published artifacts over HTTP
  Serve {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8088")]
    addr: SocketAddr,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };
  tracing_subscriber::fmt().with_env_filter(filter).without_time().init();

  match cli.command {
    Commands::Build { source, name, format } => cmd::cmd_build(&source, name.as_deref(), format),
    Commands::Serve { addr } => cmd::cmd_serve(addr),
  }
}
