//! xplugin inspection CLI.
//!
//! Commands:
//! - `xplugin inspect <path>` - List the functions a plugin library advertises
//! - `xplugin check <path>` - Validate a plugin library's descriptor table
//! - `xplugin scan [--libs-dir <dir>]` - Load every plugin in a directory

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xplugin_host::{default_libs_dir, Plugin, PluginSet, TypeTag};

#[derive(Parser)]
#[command(name = "xplugin")]
#[command(about = "Inspect xplugin native plugin libraries", long_about = None)]
struct Cli {
    /// Log loader activity at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the functions a plugin library advertises
    Inspect {
        /// Path to the dynamic library
        path: PathBuf,
    },

    /// Validate a plugin library's descriptor table
    Check {
        /// Path to the dynamic library
        path: PathBuf,
    },

    /// Load every plugin in a directory and list the registered functions
    Scan {
        /// Plugin directory (default: libs/ beside this executable)
        #[arg(long)]
        libs_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { path } => cmd_inspect(&path),
        Commands::Check { path } => cmd_check(&path),
        Commands::Scan { libs_dir } => cmd_scan(&libs_dir.unwrap_or_else(default_libs_dir)),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open(path: &Path) -> Result<Plugin> {
    Plugin::open(path).with_context(|| format!("cannot use {} as a plugin", path.display()))
}

/// Print every advertised function.
fn cmd_inspect(path: &Path) -> Result<()> {
    let plugin = open(path)?;
    println!("{} ({} functions)", plugin.path().display(), plugin.len());
    for info in plugin.functions() {
        println!("  {}", info);
    }
    if !plugin.can_release_strings() {
        println!("  note: FreePluginString is not exported; returned strings will leak");
    }
    Ok(())
}

/// Load and validate; any problem is an error.
fn cmd_check(path: &Path) -> Result<()> {
    let plugin = open(path)?;
    let returns_strings = plugin
        .functions()
        .any(|info| info.ret == TypeTag::String);
    if returns_strings && !plugin.can_release_strings() {
        anyhow::bail!(
            "{} returns strings but does not export FreePluginString",
            path.display()
        );
    }
    println!("ok: {} functions", plugin.len());
    Ok(())
}

/// Load a whole plugin directory the way a host does at startup.
fn cmd_scan(dir: &Path) -> Result<()> {
    tracing::debug!("scanning {} for plugins", dir.display());
    let set = PluginSet::load_dir(dir)?;
    println!(
        "{}: {} plugins, {} failed",
        dir.display(),
        set.plugins().len(),
        set.failures().len()
    );
    for name in set.names() {
        if let Some((plugin, info)) = set.resolve(name) {
            let file = plugin
                .path()
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("  {:<24} {}  [{}]", name, info, file);
        }
    }
    for (path, err) in set.failures() {
        println!("  failed: {}: {}", path.display(), err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_with_dir() {
        let cli = Cli::try_parse_from(["xplugin", "-v", "scan", "--libs-dir", "plugins"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Scan { libs_dir } => assert_eq!(libs_dir, Some(PathBuf::from("plugins"))),
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_empty_dir() {
        let dir = std::env::temp_dir().join("xplugin-cli-test-missing-libs");
        assert!(cmd_scan(&dir).is_ok());
    }

    #[test]
    fn test_inspect_missing_library_fails() {
        let err = cmd_inspect(Path::new("/no/such/plugin.so")).unwrap_err();
        assert!(format!("{:#}", err).contains("cannot use /no/such/plugin.so as a plugin"));
    }
}
