//! Command surface for scripting and interactive use
//!
//! Usage:
//!   autorun list [--json]              Show the reconciled inventory
//!   autorun enable <name>              Enable a startup item
//!   autorun disable <name>             Disable a startup item (reversible)
//!   autorun delete <name>              Permanently remove a startup item
//!   autorun add <name> <target>        Add a new enabled item
//!   autorun backup [--to <path>]       Snapshot the inventory
//!   autorun restore [--from <path>]    Replay a snapshot
//!   autorun export <path>              Export the inventory to CSV
//!   autorun watch [--interval <secs>]  Re-poll the inventory periodically
//!
//! Options:
//!   --scope <scope>    Scope for add: user, system64, system32
//!   --json             Output in JSON format

use std::path::PathBuf;
use std::time::Duration;

use autorun_core::{Scope, Settings, StartupItem, StartupManager};

/// CLI command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    List,
    Enable { name: String },
    Disable { name: String },
    Delete { name: String },
    Add { name: String, target: String, scope: Scope },
    Backup { to: Option<PathBuf> },
    Restore { from: Option<PathBuf> },
    Export { path: PathBuf },
    Watch { interval_secs: u64 },
}

/// CLI options
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub json: bool,
}

/// Parse CLI arguments and return command + options
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), String> {
    let mut options = CliOptions::default();
    let mut command: Option<CliCommand> = None;
    let mut scope = Scope::User;
    let mut interval_secs: u64 = 60;
    let mut to: Option<PathBuf> = None;
    let mut from: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--json" => options.json = true,
            "--scope" => {
                i += 1;
                if i >= args.len() {
                    return Err("--scope requires a value".to_string());
                }
                scope = parse_scope(&args[i])?;
            }
            "--interval" => {
                i += 1;
                if i >= args.len() {
                    return Err("--interval requires a value".to_string());
                }
                interval_secs = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid interval: {}", args[i]))?;
            }
            "--to" => {
                i += 1;
                if i >= args.len() {
                    return Err("--to requires a path".to_string());
                }
                to = Some(PathBuf::from(&args[i]));
            }
            "--from" => {
                i += 1;
                if i >= args.len() {
                    return Err("--from requires a path".to_string());
                }
                from = Some(PathBuf::from(&args[i]));
            }
            "list" => command = Some(CliCommand::List),
            "enable" | "disable" | "delete" => {
                let verb = arg.clone();
                i += 1;
                if i >= args.len() {
                    return Err(format!("{} requires an item name", verb));
                }
                if args[i].starts_with('-') {
                    return Err(format!("{} requires an item name", verb));
                }
                let name = args[i].clone();
                command = Some(match verb.as_str() {
                    "enable" => CliCommand::Enable { name },
                    "disable" => CliCommand::Disable { name },
                    _ => CliCommand::Delete { name },
                });
            }
            "add" => {
                if i + 2 >= args.len()
                    || args[i + 1].starts_with('-')
                    || args[i + 2].starts_with('-')
                {
                    return Err("add requires a name and a target".to_string());
                }
                let name = args[i + 1].clone();
                let target = args[i + 2].clone();
                i += 2;
                command = Some(CliCommand::Add {
                    name,
                    target,
                    scope: Scope::User,
                });
            }
            "backup" => command = Some(CliCommand::Backup { to: None }),
            "restore" => command = Some(CliCommand::Restore { from: None }),
            "export" => {
                i += 1;
                if i >= args.len() || args[i].starts_with('-') {
                    return Err("export requires an output path".to_string());
                }
                command = Some(CliCommand::Export {
                    path: PathBuf::from(&args[i]),
                });
            }
            "watch" => command = Some(CliCommand::Watch { interval_secs: 0 }),
            _ => {
                if arg.starts_with('-') {
                    return Err(format!("Unknown option: {}", arg));
                }
                if command.is_none() {
                    return Err(format!("Unknown command: {}", arg));
                }
            }
        }
        i += 1;
    }

    // Apply collected flag values to the command
    let command = match command {
        Some(CliCommand::Add { name, target, .. }) => CliCommand::Add { name, target, scope },
        Some(CliCommand::Watch { .. }) => CliCommand::Watch { interval_secs },
        Some(CliCommand::Backup { .. }) => CliCommand::Backup { to },
        Some(CliCommand::Restore { .. }) => CliCommand::Restore { from },
        Some(cmd) => cmd,
        None => {
            return Err(
                "No command specified. Use: list, enable, disable, delete, add, backup, restore, export, or watch"
                    .to_string(),
            )
        }
    };

    Ok((command, options))
}

fn parse_scope(s: &str) -> Result<Scope, String> {
    match s.to_lowercase().as_str() {
        "user" => Ok(Scope::User),
        "system" | "system64" => Ok(Scope::System64),
        "system32" => Ok(Scope::System32),
        _ => Err(format!(
            "Invalid scope '{}'. Use: user, system64, or system32",
            s
        )),
    }
}

/// Run CLI command
pub fn run(command: CliCommand, options: CliOptions) -> anyhow::Result<()> {
    let manager = build_manager()?;
    let settings = Settings::load_default();

    match command {
        CliCommand::List => run_list(&manager, &options),
        CliCommand::Enable { name } => {
            manager.enable(&name)?;
            println!("'{}' has been enabled.", name);
            Ok(())
        }
        CliCommand::Disable { name } => {
            manager.disable(&name)?;
            println!("'{}' has been disabled.", name);
            Ok(())
        }
        CliCommand::Delete { name } => {
            manager.delete(&name)?;
            println!("'{}' has been deleted.", name);
            Ok(())
        }
        CliCommand::Add { name, target, scope } => {
            manager.add(&name, &target, scope)?;
            println!("'{}' added to startup ({}).", name, scope);
            Ok(())
        }
        CliCommand::Backup { to } => {
            let path = to.unwrap_or_else(|| PathBuf::from(&settings.backup_location));
            let snapshot = manager.backup_to(&path)?;
            println!("Backed up {} items to {}", snapshot.len(), path.display());
            Ok(())
        }
        CliCommand::Restore { from } => {
            let path = from.unwrap_or_else(|| PathBuf::from(&settings.backup_location));
            let report = manager.restore_from(&path)?;
            println!(
                "Restore complete: {} applied, {} skipped, {} failed",
                report.applied,
                report.skipped,
                report.failures.len()
            );
            for failure in &report.failures {
                eprintln!("  failed: {} ({})", failure.name, failure.message);
            }
            Ok(())
        }
        CliCommand::Export { path } => {
            let items = manager.inventory()?;
            autorun_core::export_csv(&items, &path)?;
            println!("Startup items exported to {}", path.display());
            Ok(())
        }
        CliCommand::Watch { interval_secs } => run_watch(&manager, interval_secs, &options),
    }
}

fn build_manager() -> anyhow::Result<StartupManager> {
    #[cfg(windows)]
    {
        Ok(StartupManager::system_default()?)
    }
    #[cfg(not(windows))]
    {
        anyhow::bail!("autorun manages Windows autostart stores and must run on Windows")
    }
}

fn run_list(manager: &StartupManager, options: &CliOptions) -> anyhow::Result<()> {
    let items = manager.inventory()?;
    print_inventory(&items, options);
    Ok(())
}

fn run_watch(
    manager: &StartupManager,
    interval_secs: u64,
    options: &CliOptions,
) -> anyhow::Result<()> {
    let interval = Duration::from_secs(interval_secs.max(1));
    loop {
        let items = manager.inventory()?;
        print_inventory(&items, options);
        println!();
        std::thread::sleep(interval);
    }
}

fn print_inventory(items: &[StartupItem], options: &CliOptions) {
    if options.json {
        let records: Vec<serde_json::Value> = items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "name": item.name,
                    "target": item.target,
                    "status": item.status.to_string(),
                    "scope": item.scope.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(records));
        return;
    }

    if items.is_empty() {
        println!("No startup items found.");
        return;
    }

    for item in items {
        let marker = if item.is_conflict() { " (conflict)" } else { "" };
        println!(
            "{:<40} {:<10} {:<18} {}{}",
            item.name, item.status, item.scope, item.target, marker
        );
    }
}

/// Print CLI help text
pub fn print_help() {
    println!("autorun v{}", env!("CARGO_PKG_VERSION"));
    println!("Manage Windows startup items (registry run keys + startup folder)");
    println!();
    println!("USAGE:");
    println!("    autorun <command> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    list                 Show the reconciled inventory");
    println!("    enable <name>        Enable a startup item");
    println!("    disable <name>       Disable a startup item (reversible)");
    println!("    delete <name>        Permanently remove a startup item");
    println!("    add <name> <target>  Add a new enabled item");
    println!("    backup               Snapshot the inventory");
    println!("    restore              Replay a snapshot (additive)");
    println!("    export <path>        Export the inventory to CSV");
    println!("    watch                Re-poll the inventory periodically");
    println!();
    println!("OPTIONS:");
    println!("    --scope <scope>      Scope for add: user, system64, system32");
    println!("    --to <path>          Backup destination (default: settings)");
    println!("    --from <path>        Restore source (default: settings)");
    println!("    --interval <secs>    Watch interval (default: 60)");
    println!("    --json               Output in JSON format");
}
