use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wkspc::config::META_DIR_NAME_ENV;
use wkspc::{FileConfig, Layout, WorkspaceContext, WorkspaceReader, WorkspaceWriter};

#[derive(Parser)]
#[command(name = "wkspc")]
#[command(about = "Locate and bootstrap .dvln workspaces", long_about = None)]
struct Cli {
    /// TOML settings file read at startup
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the workspace root enclosing PATH (default: current directory)
    Root { path: Option<PathBuf> },
    /// Like `root`, but never uses a cached value
    Find { path: Option<PathBuf> },
    /// Make PATH (default: current directory) a workspace root and create its metadata tree
    Init { path: Option<PathBuf> },
    /// Print the workspace paths enclosing PATH as JSON
    Info { path: Option<PathBuf> },
    /// Print the registered settings as JSON
    Settings,
}

fn load_layout(config: Option<&PathBuf>) -> Result<Layout> {
    let mut layout = match config {
        Some(path) => FileConfig::load(path)?.apply(Layout::default()),
        None => Layout::default(),
    };
    if let Ok(name) = std::env::var(META_DIR_NAME_ENV)
        && !name.is_empty()
    {
        layout.meta_dir_name = name;
    }
    Ok(layout)
}

fn print_root(root: Option<PathBuf>) {
    if let Some(root) = root {
        println!("{}", root.display());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    wkspc::tracing::init(cli.verbose);

    let layout = load_layout(cli.config.as_ref()).context("Failed to load settings")?;
    let mut ctx = WorkspaceContext::with_layout(layout);

    match cli.command {
        Commands::Root { path } => print_root(ctx.root_dir(path.as_deref())?),
        Commands::Find { path } => print_root(ctx.find_root(path.as_deref())?),
        Commands::Init { path } => {
            let root = match path {
                Some(path) => path,
                None => std::env::current_dir().context("Failed to get current directory")?,
            };
            ctx.set_root_dir(&root)
                .with_context(|| format!("Failed to initialize workspace at {}", root.display()))?;
            println!("{}", serde_json::to_string_pretty(&ctx.info())?);
        }
        Commands::Info { path } => {
            ctx.root_dir(path.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&ctx.workspace_info()?)?);
        }
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(&ctx.store().describe())?);
        }
    }

    Ok(())
}
