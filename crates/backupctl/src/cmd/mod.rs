//! Command-line surface of `backupctl`.

use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    config::Config,
    kubernetes::{ClientSettings, KubeFactory},
    Result,
};

pub mod list;

use list::{IoStreams, ListArgs, ListOptions};

#[derive(Debug, Parser)]
#[command(author, version, about = "Inspect database backup jobs on Kubernetes", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags every subcommand inherits.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Namespace scope for this request
    #[arg(short = 'n', long, global = true)]
    pub namespace: Option<String>,

    /// Look in every namespace, ignoring --namespace
    #[arg(short = 'A', long, global = true)]
    pub all_namespaces: bool,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins if set
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all database backup jobs.
    #[command(name = "list")]
    List(ListArgs),
}

pub async fn run(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Command::List(args) => {
            let factory = KubeFactory::new(&cli.global.client_settings()).await?;
            let options = ListOptions::complete(&factory, &cli.global, args, config)?;

            let mut out = io::stdout();
            let mut err_out = io::stderr();
            options.run(&mut IoStreams::new(&mut out, &mut err_out)).await
        }
    }
}
