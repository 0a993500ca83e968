//! `themeswitch`: preview theme switching on a page fixture.
//!
//! Boots a page described in YAML or JSON, replays scripted events (control
//! clicks, OS preference changes, reloads), and prints the resulting document
//! state.

mod event;
mod report;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use themeswitch::{
    detect_appearance, Appearance, FileStore, ManualScheme, MemoryStore, PreferenceStore,
    ThemeConfig, Variant,
};

use crate::event::Event;
use crate::session::{PageSource, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SystemPreference {
    Dark,
    Light,
}

/// Preview light/dark theme switching on a page fixture
#[derive(Parser, Debug)]
#[command(name = "themeswitch", version)]
#[command(after_help = "EVENTS:\n  \
    click:<id>      click the element with this id\n  \
    system:dark     the OS switches to dark (or system:light)\n  \
    ready           the document finishes parsing\n  \
    reload          load the page again over the same store")]
struct Cli {
    /// Page fixture (YAML or JSON)
    #[arg(value_name = "PAGE")]
    page: PathBuf,

    /// Markup configuration (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stylesheet providing the root custom properties
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Control layout, overriding the config file
    #[arg(long, value_name = "VARIANT")]
    variant: Option<Variant>,

    /// Persist preferences in this JSON file instead of in memory
    #[arg(short, long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Initial OS color-scheme preference [default: detected]
    #[arg(long, value_enum)]
    system: Option<SystemPreference>,

    /// Event to replay after boot; repeatable, applied in order
    #[arg(short, long = "event", value_name = "EVENT")]
    events: Vec<Event>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => ThemeConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ThemeConfig::default(),
    };
    if let Some(variant) = cli.variant {
        config.variant = variant;
    }

    let mut source = PageSource::new(&cli.page);
    if let Some(css) = &cli.css {
        source = source.with_css_file(css)?;
    }

    let appearance = match cli.system {
        Some(SystemPreference::Dark) => Appearance::Dark,
        Some(SystemPreference::Light) => Appearance::Light,
        None => detect_appearance(),
    };
    let scheme = ManualScheme::new(appearance.is_dark());

    let output = match &cli.store {
        Some(path) => preview(config, source, FileStore::new(path), scheme, &cli)?,
        None => preview(config, source, MemoryStore::new(), scheme, &cli)?,
    };
    print!("{}", output);
    Ok(())
}

fn preview<S>(
    config: ThemeConfig,
    source: PageSource,
    store: S,
    scheme: ManualScheme,
    cli: &Cli,
) -> Result<String>
where
    S: PreferenceStore + Clone,
{
    let mut session = Session::start(config, source, store, scheme)?;
    session.run(&cli.events)?;

    let report = session.report();
    match cli.output {
        OutputFormat::Text => {
            let use_color = console::Term::stdout().features().colors_supported();
            report.to_text(use_color).context("failed to render report")
        }
        OutputFormat::Json => {
            let mut json = report.to_json().context("failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
