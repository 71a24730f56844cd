//! Vellum options CLI
//!
//! Entry point for the `vellum-opts` command-line tool.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;
use vellum_options::options::normalize_plugins;
use vellum_options::{
    normalize_options, DeviceClass, DeviceContext, NormalizedOptions, RawOptions,
};

#[derive(Parser)]
#[command(name = "vellum-opts")]
#[command(about = "Inspect normalized Vellum editor options", version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an option document for a device
    Normalize {
        /// Path to the option document (JSON, or TOML by extension)
        input: PathBuf,

        /// Path to an integration override document
        #[arg(long = "override", short = 'o')]
        override_file: Option<PathBuf>,

        /// Device class: desktop, tablet, phone
        #[arg(long, short = 'd', default_value = "desktop")]
        device: String,

        /// Treat the device as touch-capable
        #[arg(long)]
        touch: bool,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,
    },

    /// Show how the plugin list resolves for a device
    Plugins {
        /// Path to the option document (JSON, or TOML by extension)
        input: PathBuf,

        /// Path to an integration override document
        #[arg(long = "override", short = 'o')]
        override_file: Option<PathBuf>,

        /// Device class: desktop, tablet, phone
        #[arg(long, short = 'd', default_value = "desktop")]
        device: String,

        /// Treat the device as touch-capable
        #[arg(long)]
        touch: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "vellum_options={}",
            log_level
        )))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Normalize {
            input,
            override_file,
            device,
            touch,
            human,
        } => {
            run_normalize(&input, override_file.as_deref(), &device, touch, human);
        }
        Commands::Plugins {
            input,
            override_file,
            device,
            touch,
            json,
        } => {
            run_plugins(&input, override_file.as_deref(), &device, touch, json);
        }
    }
}

fn run_normalize(input: &Path, override_path: Option<&Path>, device: &str, touch: bool, human: bool) {
    let (override_options, user) = load_inputs(input, override_path);
    let device_ctx = parse_device(device, touch);

    let normalized = normalize_options(&device_ctx, &override_options, user);

    if human {
        print_human(&normalized);
    } else {
        let doc = match normalized.to_json() {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        };
        match serde_json::to_string_pretty(&doc) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Per-device plugin resolution, as reported by the `plugins` subcommand.
#[derive(Serialize)]
struct PluginReport {
    device: String,
    touch: bool,
    forced: Vec<String>,
    desktop: Vec<String>,
    has_mobile_section: bool,
    mobile: Option<Vec<String>>,
    plugins: String,
    external_plugins: BTreeMap<String, String>,
}

fn run_plugins(input: &Path, override_path: Option<&Path>, device: &str, touch: bool, json: bool) {
    let (override_options, user) = load_inputs(input, override_path);
    let device_ctx = parse_device(device, touch);

    // Capture the per-layer lists before normalization consumes the document
    let forced = normalize_plugins(override_options.forced_plugins.as_ref());
    let desktop = normalize_plugins(user.plugins.as_ref());
    let mobile = user
        .mobile
        .as_ref()
        .and_then(|section| section.plugins.as_ref())
        .map(|spec| normalize_plugins(Some(spec)));
    let has_mobile_section = user.mobile.is_some();

    let normalized = normalize_options(&device_ctx, &override_options, user);

    let report = PluginReport {
        device: device_ctx.class().as_str().to_string(),
        touch: device_ctx.touch(),
        forced,
        desktop,
        has_mobile_section,
        mobile,
        plugins: normalized.plugins,
        external_plugins: normalized.external_plugins,
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_plugin_report(&report);
    }
}

fn parse_device(device: &str, touch: bool) -> DeviceContext {
    let class = match device.to_lowercase().as_str() {
        "desktop" => DeviceClass::Desktop,
        "tablet" => DeviceClass::Tablet,
        "phone" => DeviceClass::Phone,
        _ => {
            eprintln!("Invalid device '{}'. Valid: desktop, tablet, phone", device);
            process::exit(1);
        }
    };
    DeviceContext::new(class, touch)
}

fn load_inputs(input: &Path, override_path: Option<&Path>) -> (RawOptions, RawOptions) {
    let user = match load_options(input) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error loading options: {}", e);
            process::exit(1);
        }
    };

    let override_options = match override_path {
        Some(path) => match load_options(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error loading override options: {}", e);
                process::exit(1);
            }
        },
        None => RawOptions::default(),
    };

    (override_options, user)
}

fn load_options(path: &Path) -> Result<RawOptions, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("reading {}: {}", path.display(), e))?;

    if path.extension().is_some_and(|ext| ext == "toml") {
        let doc: toml::Value =
            toml::from_str(&text).map_err(|e| format!("parsing {}: {}", path.display(), e))?;
        Ok(RawOptions::from_toml(doc))
    } else {
        let doc: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| format!("parsing {}: {}", path.display(), e))?;
        Ok(RawOptions::from_json(doc))
    }
}

fn print_human(normalized: &NormalizedOptions) {
    let plugins = if normalized.plugins.is_empty() {
        "(none)"
    } else {
        normalized.plugins.as_str()
    };
    println!("Plugins: {}", plugins);
    println!("Toolbar mode: {}", normalized.toolbar_mode.as_str());
    if !normalized.forced_plugins.is_empty() {
        println!("Forced plugins: {}", normalized.forced_plugins.join(" "));
    }
    if !normalized.external_plugins.is_empty() {
        println!("External plugins:");
        for (name, url) in &normalized.external_plugins {
            println!("  {} -> {}", name, url);
        }
    }
    if let Some(sticky) = normalized.toolbar_sticky {
        println!("Toolbar sticky: {}", sticky);
    }
    if let Some(grid) = normalized.table_grid {
        println!("Table grid: {}", grid);
    }
    if let Some(resize) = normalized.resize {
        println!("Resize: {}", resize.as_str());
    }
    if let Some(ref menubar) = normalized.menubar {
        println!("Menubar: {}", menubar.as_str());
    }
    if !normalized.extra.is_empty() {
        println!("Other options:");
        for (name, value) in &normalized.extra {
            println!("  {}: {}", name, value.kind());
        }
    }
}

fn print_plugin_report(report: &PluginReport) {
    println!("Device: {} (touch: {})", report.device, report.touch);
    println!("  Forced:  {}", join_or_none(&report.forced));
    println!("  Desktop: {}", join_or_none(&report.desktop));
    match &report.mobile {
        Some(mobile) => println!("  Mobile:  {}", join_or_none(mobile)),
        None if report.has_mobile_section => println!("  Mobile:  (inherits desktop)"),
        None => println!("  Mobile:  (no mobile section)"),
    }
    println!();
    let final_plugins = if report.plugins.is_empty() {
        "(none)"
    } else {
        report.plugins.as_str()
    };
    println!("Final: {}", final_plugins);
    if !report.external_plugins.is_empty() {
        println!("External:");
        for (name, url) in &report.external_plugins {
            println!("  {} -> {}", name, url);
        }
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(" ")
    }
}
