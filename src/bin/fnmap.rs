// Fnmap CLI
// Config validation, table inspection, and two-stream trace replay

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use fnmap_core::settings::default_settings_content;
use fnmap_core::{
    CorrelationPolicy, DeviceSignal, LogicalKey, RemapEngine, Settings, SystemKeyEvent, Verdict,
};

/// Device-conditional number-row to function-key remapper
#[derive(Parser, Debug)]
#[command(name = "fnmap")]
#[command(version = "0.2.0")]
#[command(about = "Device-conditional number-row to function-key remapper", long_about = None)]
struct Args {
    /// TOML settings file (default: ~/.config/fnmap/settings.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the correlation policy (time-window or device-tracked)
    #[arg(long, value_name = "POLICY")]
    policy: Option<String>,

    /// Override the correlation window in milliseconds
    #[arg(long, value_name = "MS")]
    window_ms: Option<u64>,

    /// Validate settings and exit
    #[arg(long)]
    check_config: bool,

    /// Print the static remap table and exit
    #[arg(long)]
    print_table: bool,

    /// Print default settings content and exit
    #[arg(long)]
    print_default_config: bool,

    /// Replay a recorded two-stream trace through the engine
    #[arg(long, value_name = "TRACE")]
    replay: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.print_table {
        print_table();
        return Ok(());
    }

    if args.print_default_config {
        print!("{}", default_settings_content());
        return Ok(());
    }

    let settings = load_settings(&args)?;

    if args.check_config {
        println!(
            "Configuration is valid: policy={} window_ms={} enabled={}",
            settings.policy(),
            settings.window_ms(),
            settings.enabled()
        );
        return Ok(());
    }

    if let Some(ref trace_path) = args.replay {
        let engine = RemapEngine::from_settings(&settings);
        info!(
            "replaying {} (policy={}, window={}ms)",
            trace_path.display(),
            engine.policy(),
            engine.window_ms()
        );
        return replay_trace(&engine, trace_path);
    }

    bail!("nothing to do: pass --replay, --check-config, --print-table, or --print-default-config");
}

/// Load settings, applying CLI overrides on top of the file.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match args.config {
        Some(ref path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load_default().context("failed to load default settings")?,
    };

    if let Some(ref policy) = args.policy {
        let policy: CorrelationPolicy = policy.parse()?;
        settings.set_policy(policy);
    }
    if let Some(window_ms) = args.window_ms {
        if window_ms == 0 {
            bail!("--window-ms must be greater than zero");
        }
        settings.set_window_ms(window_ms);
    }

    Ok(settings)
}

/// Dump the static twelve-entry mapping.
fn print_table() {
    use strum::IntoEnumIterator;

    println!("key     usage   system  target");
    for key in LogicalKey::iter() {
        println!(
            "{:<7} 0x{:02X}    {:<7} {} (F{})",
            key.to_string(),
            key.usage(),
            key.system_code(),
            key.target_code(),
            key.function_number()
        );
    }
}

/// Replay a recorded trace file through the engine.
///
/// One event per line, blank lines and `#` comments skipped:
///   device <usage_page> <usage> <value> <timestamp>
///   system <key_code> press|release <timestamp>
///   enable
///   disable
///
/// Numbers accept an optional 0x prefix. Each system line prints the
/// verdict the interception callback would apply.
fn replay_trace(engine: &RemapEngine, path: &PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trace {}", path.display()))?;

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        replay_line(engine, line).with_context(|| format!("trace line {}", lineno + 1))?;
    }

    Ok(())
}

fn replay_line(engine: &RemapEngine, line: &str) -> Result<()> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        ["device", usage_page, usage, value, timestamp] => {
            let signal = DeviceSignal {
                usage_page: parse_u16(usage_page)?,
                usage: parse_u16(usage)?,
                value: parse_i64(value)?,
                timestamp: parse_u64(timestamp)?,
            };
            engine.handle_device(&signal);
        }
        ["system", key_code, phase, timestamp] => {
            let is_press = match *phase {
                "press" => true,
                "release" => false,
                other => bail!("expected press or release, got {:?}", other),
            };
            let event = SystemKeyEvent {
                key_code: parse_u16(key_code)?,
                is_press,
                timestamp: parse_u64(timestamp)?,
            };
            let original = event.key_code;
            let verdict = engine.handle_system(&event);
            match verdict {
                Verdict::Rewrite(code) => {
                    println!("t={} {} {} -> rewrite {}", event.timestamp, phase, original, code)
                }
                Verdict::PassThrough => {
                    println!("t={} {} {} -> pass", event.timestamp, phase, original)
                }
            }
        }
        ["enable"] => engine.set_enabled(true),
        ["disable"] => engine.set_enabled(false),
        _ => bail!("unrecognized trace line: {:?}", line),
    }
    Ok(())
}

fn parse_u16(s: &str) -> Result<u16> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).with_context(|| format!("invalid hex number {:?}", s))
    } else {
        s.parse().with_context(|| format!("invalid number {:?}", s))
    }
}

fn parse_u64(s: &str) -> Result<u64> {
    s.parse().with_context(|| format!("invalid timestamp {:?}", s))
}

fn parse_i64(s: &str) -> Result<i64> {
    s.parse().with_context(|| format!("invalid value {:?}", s))
}
