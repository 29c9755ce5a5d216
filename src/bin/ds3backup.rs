//! Dark Souls III save backup (ds3backup) - Main binary entry point

use ds3_backup::cli::args::{CliArgs, parse_args};
use ds3_backup::cli::config::load_config;
use ds3_backup::cli::output::{format_json, format_text};
use ds3_backup::cli::{DEFAULT_CONFIG_FILE, RunPlan};
use ds3_backup::{CancellationToken, Error, SnapshotResult, run_schedule, run_snapshot};
use std::path::Path;
use std::process;
use std::time::Duration;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug ds3backup --zip
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    if cli_args.help {
        print_help();
        return;
    }
    if cli_args.version {
        println!("ds3backup {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let plan = match resolve_plan(&cli_args) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let exit_code = match plan.schedule {
        None => handle_single(&plan, &cli_args),
        Some(interval) => handle_auto(&plan, interval, &cli_args),
    };

    process::exit(exit_code);
}

/// A config file that loads takes over entirely; otherwise the flags apply.
fn resolve_plan(args: &CliArgs) -> ds3_backup::Result<RunPlan> {
    let explicit = args.config.is_some();
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

    match load_config(Path::new(config_path)) {
        Ok(config) => {
            if !args.quiet {
                eprintln!("Loaded configuration from {config_path}");
            }
            config.to_plan()
        }
        Err(Error::Io(e)) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No {config_path}; using command-line flags");
            Ok(args.to_plan())
        }
        Err(e) if explicit => Err(e),
        Err(e) => {
            log::warn!("Ignoring {config_path}: {e}");
            Ok(args.to_plan())
        }
    }
}

fn report(result: &SnapshotResult, args: &CliArgs) {
    if args.json {
        println!("{}", format_json(result));
    } else if !args.quiet {
        eprint!("{}", format_text(result));
    }
}

fn exit_code_for(err: &Error) -> i32 {
    match err {
        Error::InvalidInput(_) | Error::Config(_) => 2,
        _ => 4,
    }
}

fn handle_single(plan: &RunPlan, args: &CliArgs) -> i32 {
    match run_snapshot(&plan.options) {
        Ok(result) => {
            report(&result, args);
            if result.is_complete() { 0 } else { 3 }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

fn handle_auto(plan: &RunPlan, interval: Duration, args: &CliArgs) -> i32 {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("Could not install Ctrl-C handler: {e}");
    }

    if !args.quiet {
        eprintln!(
            "Automatic backup every {}s; press Ctrl-C to stop",
            interval.as_secs()
        );
    }

    let outcome = run_schedule(interval, &token, || {
        let result = run_snapshot(&plan.options)?;
        report(&result, args);
        Ok(())
    });

    match outcome {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

fn print_help() {
    println!("ds3backup - Back up Dark Souls III save data into timestamped snapshots");
    println!();
    println!("USAGE:");
    println!("    ds3backup [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!("    -a, --auto                 Keep running and back up every interval");
    println!("    -t, --interval <SECS>      Seconds between automatic backups (default: 300)");
    println!("    -b, --backup-path <DIR>    Destination root (default: %APPDATA%\\DarkSouls3Backup)");
    println!("    -z, --zip                  Write <timestamp>.zip instead of a <timestamp>/ folder");
    println!("    -s, --source <DIR>         Back up DIR instead of the game's save folder");
    println!("    -c, --config <FILE>        Read settings from FILE (default: config.json)");
    println!("        --json                 Print each result as JSON");
    println!("    -q, --quiet                Suppress the backup summary");
    println!();
    println!("CONFIG FILE:");
    println!("    When config.json loads, its settings replace all flags above except");
    println!("    --config, --json and --quiet. Keys: auto_enable, auto_time_interval,");
    println!("    backup_path, zip_enable, source_path, keep_number (ignored).");
    println!();
    println!("EXAMPLES:");
    println!("    ds3backup --zip");
    println!("    ds3backup --auto --interval 600 --backup-path D:\\Saves");
    println!("    RUST_LOG=debug ds3backup --source ./test-saves --backup-path ./out");
}
