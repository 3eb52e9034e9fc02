//! Command line interface
//!
//! | Command | Description |
//! |---------|-------------|
//! | `swidget mount --url U --name N --unique-id I` | Mount one swidget and print the region |
//! | `swidget demo` | Run the two-toggle host page against an in-memory bundle |
//! | `swidget config` | Print the effective configuration as TOML |

use crate::demo::{HostHome, Toggle, demo_runtime};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use swidget_application::MountDirective;
use swidget_domain::value_objects::Props;
use swidget_infrastructure::config::{AppConfig, ConfigLoader, to_toml};
use swidget_infrastructure::constants::DEFAULT_MOUNT_REGION;
use swidget_infrastructure::init_host;
use swidget_infrastructure::logging::{init_logging, log_config_loaded};

/// Command line interface for the swidget host
#[derive(Parser, Debug)]
#[command(name = "swidget")]
#[command(about = "Swidget - Runtime composition of independently built UI fragments")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mount a swidget into a host region and print what it rendered
    Mount(MountArgs),
    /// Run the two-toggle demo host
    Demo,
    /// Print the effective configuration
    Config,
}

/// Arguments of `swidget mount`
#[derive(Args, Debug)]
pub struct MountArgs {
    /// Bundle URL (http, https, file or a plain path)
    #[arg(long)]
    pub url: String,

    /// Swidget name the bundle must export
    #[arg(long)]
    pub name: String,

    /// Logical instance identifier
    #[arg(long = "unique-id")]
    pub unique_id: String,

    /// Prop passed to the swidget, as `key=value` (value parsed as JSON when possible)
    #[arg(long = "prop", value_parser = parse_prop)]
    pub props: Vec<(String, Value)>,

    /// Route path to render
    #[arg(long)]
    pub path: Option<String>,

    /// Host region to mount into
    #[arg(long, default_value = DEFAULT_MOUNT_REGION)]
    pub region: String,

    /// Print markup instead of text
    #[arg(long)]
    pub markup: bool,
}

/// Parse a `key=value` prop
///
/// The value is read as JSON, falling back to a plain string.
pub fn parse_prop(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty prop name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("loading configuration")?;

    if let Command::Config = cli.command {
        println!("{}", to_toml(&config)?);
        return Ok(());
    }

    init_logging(config.logging.clone()).context("initializing logging")?;
    if let Some(path) = loader.config_path() {
        log_config_loaded(path, true);
    }

    match cli.command {
        Command::Mount(args) => mount(config, args).await,
        Command::Demo => demo(config).await,
        Command::Config => Ok(()),
    }
}

async fn mount(config: AppConfig, args: MountArgs) -> anyhow::Result<()> {
    let runtime = init_host(config)?;
    runtime.mounts().create_region(args.region.clone());

    let props = args
        .props
        .into_iter()
        .fold(Props::new(), |props, (key, value)| props.with_value(key, value));
    let mut directive =
        MountDirective::new(args.url.clone(), args.name.clone(), args.unique_id).with_props(props);
    if let Some(path) = args.path {
        directive = directive.with_path(path);
    }

    let mounted = runtime
        .loader()
        .mount(&args.region, directive)
        .await
        .with_context(|| format!("mounting '{}' from {}", args.name, args.url))?;

    let output = if args.markup {
        runtime.mounts().region_markup(&args.region)?
    } else {
        runtime.mounts().region_text(&args.region)?
    };
    println!("{output}");
    if let Some(metadata) = runtime.loader().metadata(mounted.key()) {
        println!("# {}", metadata.description);
    }
    runtime.loader().unmount(mounted);
    Ok(())
}

async fn demo(config: AppConfig) -> anyhow::Result<()> {
    let (runtime, source) = demo_runtime(config)?;
    let mut home = HostHome::for_runtime(&runtime);

    println!("[initial] {}", home.render()?);
    for toggle in [Toggle::First, Toggle::Second, Toggle::First, Toggle::Second] {
        let shown = home.toggle(toggle).await?;
        let label = if shown { "show" } else { "hide" };
        println!("[{label} {toggle:?}] {}", home.render()?);
        println!("    context: {}", serde_json::to_string(home.context().get().fields())?);
    }

    for key in runtime.cache().keys() {
        if let Some(record) = runtime.cache().record(&key) {
            println!(
                "module {key}: state={:?} refs={} fetches={}",
                record.state, record.ref_count, record.fetch_count
            );
        }
    }
    println!("bundle fetches: {}", source.total_fetches());
    Ok(())
}
