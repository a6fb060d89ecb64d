//! PermWatch Daemon
//!
//! Keeps every entry under a directory tree at a fixed permission policy:
//! one normalizing sweep at startup, then a per-directory watch that
//! corrects new files and extends coverage into new subdirectories.

use anyhow::Result;
use clap::Parser;
use permwatch_core::{sweep, Policy};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Permission-policy enforcement daemon for a directory tree
#[derive(Parser, Debug)]
#[command(name = "permwatchd")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory tree to supervise
    root: PathBuf,

    /// Octal mode applied to directories
    #[arg(long, default_value = "755", value_parser = parse_mode)]
    dir_mode: u32,

    /// Octal mode applied to regular files
    #[arg(long, default_value = "755", value_parser = parse_mode)]
    file_mode: u32,

    /// OR the set-group-ID bit into both modes
    #[arg(long)]
    setgid: bool,

    /// OR the set-user-ID bit into both modes
    #[arg(long)]
    setuid: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_mode(s: &str) -> std::result::Result<u32, String> {
    u32::from_str_radix(s, 8).map_err(|e| format!("invalid octal mode '{s}': {e}"))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("permwatch=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("permwatch=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn build_policy(cli: &Cli) -> Policy {
    let mut policy = Policy::new(cli.dir_mode, cli.file_mode);
    if cli.setgid {
        policy = policy.with_setgid();
    }
    if cli.setuid {
        policy = policy.with_setuid();
    }
    policy
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let policy = build_policy(&cli);
    info!(
        "Supervising {} (directory mode {:04o}, file mode {:04o})",
        cli.root.display(),
        policy.directory_mode,
        policy.file_mode
    );

    sweep(&cli.root, &policy);

    // Watches run until the process is killed; there is no shutdown path.
    std::future::pending::<()>().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_common_permissions() {
        let cli = Cli::try_parse_from(["permwatchd", "/srv/data"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("/srv/data"));
        assert_eq!(cli.dir_mode, 0o755);
        assert_eq!(cli.file_mode, 0o755);
        assert!(!cli.setgid);
        assert!(!cli.setuid);
    }

    #[test]
    fn test_modes_are_parsed_as_octal() {
        let cli = Cli::try_parse_from([
            "permwatchd",
            "--dir-mode",
            "2775",
            "--file-mode",
            "664",
            "/srv/data",
        ])
        .unwrap();
        assert_eq!(cli.dir_mode, 0o2775);
        assert_eq!(cli.file_mode, 0o664);
    }

    #[test]
    fn test_non_octal_mode_is_rejected() {
        let result = Cli::try_parse_from(["permwatchd", "--dir-mode", "78x", "/srv/data"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_root_is_a_usage_error() {
        let result = Cli::try_parse_from(["permwatchd"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_setuid_setgid_fold_into_both_modes() {
        let cli = Cli::try_parse_from([
            "permwatchd",
            "--dir-mode",
            "755",
            "--file-mode",
            "644",
            "--setuid",
            "--setgid",
            "/srv/data",
        ])
        .unwrap();
        let policy = build_policy(&cli);
        assert_eq!(policy.directory_mode, 0o6755);
        assert_eq!(policy.file_mode, 0o6644);
    }
}
