//! songscout - vocal melody analysis and authoring mode recommendation

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use scoutconf::ScoutConfig;
use songscout::{telemetry, AnalysisFailure, AnalysisReport, AnalysisRequest, ErrorKind, SongScout};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "songscout")]
#[command(about = "Find the vocal melody in a MIDI file and recommend an authoring mode")]
#[command(version)]
struct Cli {
    /// MIDI file to analyze
    midi_file: PathBuf,

    /// Lyric text file with optional [Section] headers
    #[arg(long)]
    lyrics: Option<PathBuf>,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Also write the selected vocal track as a MIDI file
    #[arg(long, value_name = "PATH")]
    export_melody: Option<PathBuf>,

    /// Config file, replacing ./songscout.toml
    #[arg(long, env = "SONGSCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = match ScoutConfig::load_with_sources_from(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            let failure = AnalysisFailure::new(ErrorKind::ConfigError, e.to_string());
            println!("{}", AnalysisReport::from(failure).to_json(cli.pretty)?);
            return Err(anyhow::Error::new(e).context("loading configuration"));
        }
    };

    let directive = telemetry::filter_directive(cli.verbose, &config.logging.level);
    telemetry::init(&directive)?;
    debug!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    let request = AnalysisRequest {
        midi_path: cli.midi_file,
        lyrics_path: cli.lyrics,
        export_melody: cli.export_melody,
    };

    let report = SongScout::new().analyze(&request);

    let pretty = cli.pretty || config.output.pretty;
    let json = report.to_json(pretty).context("serializing report")?;

    match cli.output.or(config.output.path) {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            println!("Analysis written to: {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
