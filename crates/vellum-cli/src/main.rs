//! `vellum`: render a template set from the command line.
//!
//! ```text
//! vellum render --config site.yaml --template home --name home --data page.json
//! ```
//!
//! On failure the error goes to stderr and the fallback error page to stdout.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vellum::{RenderData, TemplateError, TemplateManager, TemplateManagerConfig, ROOT_TEMPLATE};

#[derive(Parser, Debug)]
#[command(name = "vellum", version, about = "Render layout-based HTML templates")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load templates and render one of them to stdout
    Render(RenderArgs),
    /// Print the fallback error page
    ErrorPage {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// YAML manager configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory, overriding the configuration
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Layout template, overriding the configuration
    #[arg(long)]
    layout: Option<String>,

    /// Template to load (repeatable)
    #[arg(short, long = "template")]
    templates: Vec<String>,

    /// Template to render; defaults to the layout
    #[arg(short, long)]
    name: Option<String>,

    /// JSON file with per-render data
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Global data entry as key=value (repeatable)
    #[arg(long = "set", value_parser = parse_key_value)]
    set: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn build_manager(args: &RenderArgs) -> Result<TemplateManager> {
    let mut config = match &args.config {
        Some(path) => TemplateManagerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TemplateManagerConfig::default(),
    };
    if let Some(dir) = &args.dir {
        config.template_dir = dir.clone();
    }
    if let Some(layout) = &args.layout {
        config.layout = Some(layout.clone());
    }

    let mut manager = TemplateManager::from_config(config);
    for (key, value) in &args.set {
        manager.set_data(key, value);
    }
    Ok(manager)
}

fn read_data(path: Option<&PathBuf>) -> Result<RenderData> {
    let Some(path) = path else {
        return Ok(RenderData::new());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))? {
        serde_json::Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}

fn render(args: &RenderArgs, out: &mut impl Write) -> Result<()> {
    let data = read_data(args.data.as_ref())?;
    let mut manager = build_manager(args)?;
    let target = args.name.as_deref().unwrap_or(ROOT_TEMPLATE);

    let mut page = Vec::new();
    let rendered = manager
        .add_templates(&args.templates)
        .and_then(|()| manager.execute_named(&mut page, target, &data));

    if let Err(err) = rendered {
        page.clear();
        err.render_fallback(&mut page)?;
        out.write_all(&page)?;
        return Err(err.into());
    }
    out.write_all(&page)?;
    Ok(())
}

fn error_page(
    title: Option<String>,
    message: Option<String>,
    out: &mut impl Write,
) -> Result<(), TemplateError> {
    let mut data = RenderData::new();
    if let Some(title) = title {
        data.insert("title".into(), title.into());
    }
    if let Some(message) = message {
        data.insert("message".into(), message.into());
    }
    vellum::ErrorTemplate::new().execute(out, &data)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut stdout = io::stdout().lock();
    let result = match cli.command {
        Command::Render(args) => render(&args, &mut stdout),
        Command::ErrorPage { title, message } => {
            error_page(title, message, &mut stdout).map_err(anyhow::Error::from)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "render failed");
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
