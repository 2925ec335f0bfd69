//! Folio CLI
//!
//! Check portfolio content, print the hero typewriter's timeline, play it
//! live, and simulate a scroll pass to see which sections reveal where.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use folio_app::{Content, FolioConfig, NavTarget, Portfolio, SectionId, View};
use folio_core::{TimerScheduler, Viewport};
use folio_motion::{Typewriter, TypewriterFrame};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_CONFIG: &str = "folio.toml";

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Portfolio page tooling", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./folio.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Content file (defaults to the bundled portfolio)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a content file and the configuration
    Check {
        /// Content file to check instead of --content
        path: Option<PathBuf>,
    },

    /// Print the hero typewriter's transitions on a virtual clock
    Timeline {
        /// Number of transitions to print
        #[arg(short, long, default_value = "40")]
        frames: usize,
    },

    /// Play the hero typewriter in the terminal
    Play {
        /// How long to play
        #[arg(short, long, default_value = "10")]
        seconds: f32,
    },

    /// Scroll through a view and report where each section reveals
    Scroll {
        /// View to scroll through
        #[arg(long, value_enum, default_value = "home")]
        view: ViewArg,

        /// Scroll increment in pixels
        #[arg(short, long, default_value = "200")]
        step: f32,

        /// Window width
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Window height
        #[arg(long, default_value = "800")]
        height: f32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Home,
    Projects,
    Outdoors,
}

impl From<ViewArg> for View {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Home => View::Home,
            ViewArg::Projects => View::Projects,
            ViewArg::Outdoors => View::Outdoors,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { path } => cmd_check(&config, path.or(cli.content).as_deref()),
        Commands::Timeline { frames } => {
            cmd_timeline(&config, &load_content(cli.content.as_deref())?, frames)
        }
        Commands::Play { seconds } => {
            cmd_play(&config, &load_content(cli.content.as_deref())?, seconds)
        }
        Commands::Scroll {
            view,
            step,
            width,
            height,
        } => cmd_scroll(
            config,
            load_content(cli.content.as_deref())?,
            view.into(),
            step,
            width,
            height,
        ),
    }
}

fn load_config(path: Option<&Path>) -> Result<FolioConfig> {
    match path {
        Some(path) => FolioConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => FolioConfig::load_or_default(Path::new(DEFAULT_CONFIG))
            .context("failed to load ./folio.toml"),
    }
}

fn load_content(path: Option<&Path>) -> Result<Content> {
    match path {
        Some(path) => Content::load(path)
            .with_context(|| format!("failed to load content {}", path.display())),
        None => Content::bundled().context("bundled content is invalid"),
    }
}

fn cmd_check(config: &FolioConfig, path: Option<&Path>) -> Result<()> {
    let content = load_content(path)?;
    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "bundled content".to_string());

    info!("Checking {}", source);
    println!("{} ({})", content.profile.name, content.profile.headline);
    println!("  phrases:     {}", content.phrases.len());
    println!(
        "  timeline:    {} education, {} experience",
        content.education.len(),
        content.experience.len()
    );
    println!("  projects:    {}", content.projects.len());
    println!("  expeditions: {}", content.expeditions.len());
    println!(
        "  skills:      {} in {} categories",
        content.skills.iter().map(|c| c.items.len()).sum::<usize>(),
        content.skills.len()
    );

    let timing = config.typewriter.timing();
    println!(
        "  typewriter:  type {}ms, delete {}ms, pause {}ms, blink {}ms",
        timing.type_delay.as_millis(),
        timing.delete_delay.as_millis(),
        timing.pause.as_millis(),
        timing.blink_interval.as_millis()
    );

    if content.phrases.is_empty() {
        warn!("No hero phrases: the typewriter will stay blank");
    }
    println!("OK");
    Ok(())
}

fn render(frame: &TypewriterFrame) -> String {
    format!("{}{}", frame.text, if frame.caret_visible { "|" } else { " " })
}

fn cmd_timeline(config: &FolioConfig, content: &Content, frames: usize) -> Result<()> {
    let scheduler = TimerScheduler::new();
    let typewriter = Typewriter::start(
        scheduler.handle(),
        content.phrases.iter().cloned(),
        config.typewriter.timing(),
    );

    println!("{:>8}  {}", "0ms", render(&typewriter.frame()));
    for _ in 0..frames {
        if !scheduler.advance_to_next() {
            info!("No timers pending, timeline ends");
            break;
        }
        let state = typewriter.state();
        println!(
            "{:>8}  {:<32} phrase {} {:?}",
            format!("{}ms", scheduler.now().as_millis()),
            render(&typewriter.frame()),
            state.phrase_index(),
            state.direction()
        );
    }
    Ok(())
}

fn play_duration(seconds: f32) -> Result<Duration> {
    match Duration::try_from_secs_f32(seconds) {
        Ok(duration) => Ok(duration),
        Err(err) => anyhow::bail!("--seconds {} is not a usable duration: {}", seconds, err),
    }
}

fn cmd_play(config: &FolioConfig, content: &Content, seconds: f32) -> Result<()> {
    let duration = play_duration(seconds)?;

    let mut scheduler = TimerScheduler::new();
    let typewriter = Typewriter::start(
        scheduler.handle(),
        content.phrases.iter().cloned(),
        config.typewriter.timing(),
    );
    typewriter.on_frame(|frame| {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r\x1b[2K{}", render(frame));
        let _ = out.flush();
    });

    scheduler.start_background(Duration::from_millis(10));
    thread::sleep(duration);
    scheduler.stop_background();

    drop(typewriter);
    println!();
    Ok(())
}

fn cmd_scroll(
    config: FolioConfig,
    content: Content,
    view: View,
    step: f32,
    width: f32,
    height: f32,
) -> Result<()> {
    if !(step.is_finite() && step > 0.0) {
        anyhow::bail!("--step must be positive, got {}", step);
    }

    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(height);
    let mut portfolio = Portfolio::new(content, config, scheduler.handle(), viewport, width);
    if view != View::Home {
        portfolio.navigate(NavTarget::view(view));
        scheduler.advance(portfolio.config().nav.scroll_settle());
        portfolio.apply_scroll_requests();
    }

    let revealed = |portfolio: &Portfolio| -> HashSet<SectionId> {
        portfolio
            .sections()
            .into_iter()
            .filter(|s| s.visible)
            .map(|s| s.id)
            .collect()
    };

    let mut seen = revealed(&portfolio);
    let bottom = (portfolio.layout().height() - height).max(0.0);
    let mut y = 0.0;
    println!("{} view, {:.0}px tall", view, portfolio.layout().height());

    loop {
        portfolio.scroll_to(y);
        scheduler.advance(Duration::from_millis(16));

        let now = revealed(&portfolio);
        let mut fresh: Vec<SectionId> = now.difference(&seen).copied().collect();
        fresh.sort_by(|a, b| {
            let top = |id: &SectionId| portfolio.layout().section(*id).map(|s| s.bounds.y);
            top(a).partial_cmp(&top(b)).unwrap_or(std::cmp::Ordering::Equal)
        });
        for id in fresh {
            println!("{:>7.0}px  revealed {:?}", y, id);
        }
        seen = now;

        if y >= bottom {
            break;
        }
        y = (y + step).min(bottom);
    }

    let hidden: Vec<SectionId> = portfolio
        .sections()
        .into_iter()
        .filter(|s| !s.visible)
        .map(|s| s.id)
        .collect();
    if hidden.is_empty() {
        println!("All sections revealed");
    } else {
        warn!("Never revealed: {:?}", hidden);
    }
    Ok(())
}
