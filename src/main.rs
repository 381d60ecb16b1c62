use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use podstatic::{
    BuildOptions, DurationProbe, FfprobeDuration, NoDurationProbe, NoopReporter, ProgressEvent,
    ProgressReporter, ReqwestClient, SharedProgressReporter, SiteConfig, build_site,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static PAGE: Emoji<'_, '_> = Emoji("📄 ", "[i] ");
static FETCH: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");

/// Render a static podcast page and RSS feed
#[derive(Parser, Debug)]
#[command(name = "podstatic")]
#[command(about = "Render a static podcast page and RSS feed from a YAML episode list")]
#[command(version)]
struct Args {
    /// YAML file with one document per episode
    content: PathBuf,

    /// Output directory for index.html and feed.xml
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Directory with local copies of the media files, enables durations in the feed
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Site configuration file
    #[arg(short, long, default_value = "podcast.yaml")]
    config: PathBuf,

    /// List episodes in content file order instead of newest first
    #[arg(long)]
    oldest_first: bool,

    /// Audio variant used as feed enclosure
    #[arg(long, default_value = "0")]
    audio_index: usize,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using an indicatif spinner for terminal output
struct IndicatifReporter {
    bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { bar }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::LoadingContent { path } => {
                self.bar.set_message(format!(
                    "{SEARCH}Reading {}",
                    path.display().to_string().cyan()
                ));
            }

            ProgressEvent::ContentLoaded { episode_count } => {
                self.bar.set_message(format!(
                    "{PAGE}{} episodes loaded",
                    episode_count.to_string().cyan()
                ));
            }

            ProgressEvent::PageRendered { episode_count } => {
                self.bar.set_message(format!(
                    "{PAGE}Rendered page with {} episodes",
                    episode_count.to_string().cyan()
                ));
            }

            ProgressEvent::FetchingMedia {
                episode_title,
                episode_index,
                total_episodes,
                ..
            } => {
                self.bar.set_message(format!(
                    "{FETCH}[{}/{}] {}",
                    (episode_index + 1).to_string().cyan(),
                    total_episodes.to_string().cyan(),
                    truncate_title(&episode_title, 40)
                ));
            }

            ProgressEvent::DurationUnavailable {
                episode_title,
                reason,
                ..
            } => {
                self.bar.println(format!(
                    "  {WARNING}{} - {}",
                    truncate_title(&episode_title, 30).yellow(),
                    reason.dimmed()
                ));
            }

            ProgressEvent::OutputWritten { path } => {
                self.bar.println(format!(
                    "  {SUCCESS}{}",
                    path.display().to_string().green()
                ));
            }

            ProgressEvent::BuildCompleted { episode_count } => {
                self.bar.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} episodes published",
                    "Build complete:".bold().green(),
                    episode_count.to_string().green().bold(),
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let cut: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podstatic".bold().magenta(),
            "- Static Podcast Publisher".dimmed()
        );
    }

    let config = SiteConfig::from_file(&args.config).context("Failed to load site configuration")?;

    let options = BuildOptions {
        output_dir: args.output_dir,
        data_dir: args.data_dir,
        newest_first: !args.oldest_first,
        audio_index: args.audio_index,
    };

    let probe: Box<dyn DurationProbe> = if options.data_dir.is_some() {
        Box::new(FfprobeDuration::new())
    } else {
        Box::new(NoDurationProbe)
    };

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let client = ReqwestClient::new();

    build_site(
        &client,
        probe.as_ref(),
        &args.content,
        &config,
        &options,
        reporter,
    )
    .await
    .context("Failed to build podcast site")?;

    Ok(())
}
