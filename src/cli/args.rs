//! CLI argument parsing

use super::{DEFAULT_INTERVAL_SECS, RunPlan};
use crate::{BackupOptions, SnapshotFormat};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub help: bool,
    pub version: bool,
    pub auto: bool,
    pub interval_secs: u64,
    pub backup_path: Option<String>,
    pub zip: bool,
    pub source: Option<String>,
    /// Explicit `--config` path; `None` means the default `config.json`.
    pub config: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            help: false,
            version: false,
            auto: false,
            interval_secs: DEFAULT_INTERVAL_SECS,
            backup_path: None,
            zip: false,
            source: None,
            config: None,
            json: false,
            quiet: false,
        }
    }
}

impl CliArgs {
    /// Build the run plan these flags describe.
    #[must_use]
    pub fn to_plan(&self) -> RunPlan {
        RunPlan {
            options: BackupOptions {
                source: self.source.as_ref().map(PathBuf::from),
                destination_root: self.backup_path.as_ref().map(PathBuf::from),
                format: SnapshotFormat::from_zip_flag(self.zip),
            },
            schedule: self
                .auto
                .then(|| Duration::from_secs(self.interval_secs)),
        }
    }
}

fn take_value<'a>(args: &'a [String], i: &mut usize, flag: &str, what: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires {what}"))
}

/// Parse command line arguments (`args[0]` is the program name)
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut i = 1;

    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => cli.help = true,
            "-v" | "--version" => cli.version = true,
            "-a" | "-auto" | "--auto" => cli.auto = true,
            "-z" | "-zip" | "--zip" => cli.zip = true,
            "--json" => cli.json = true,
            "-q" | "--quiet" => cli.quiet = true,
            "-t" | "--interval" => {
                let secs: u64 = take_value(args, &mut i, arg, "a value")?
                    .parse()
                    .map_err(|_| format!("{arg} must be a positive integer"))?;
                if secs == 0 {
                    return Err(format!("{arg} must be greater than zero"));
                }
                cli.interval_secs = secs;
            }
            "-b" | "--backup-path" => {
                cli.backup_path = Some(take_value(args, &mut i, arg, "a directory")?.to_string());
            }
            "-s" | "--source" => {
                cli.source = Some(take_value(args, &mut i, arg, "a directory")?.to_string());
            }
            "-c" | "--config" => {
                cli.config = Some(take_value(args, &mut i, arg, "a file path")?.to_string());
            }
            _ if arg.starts_with('-') => return Err(format!("Unknown option: {arg}")),
            _ => return Err(format!("Unexpected argument: {arg}")),
        }
        i += 1;
    }

    Ok(cli)
}
