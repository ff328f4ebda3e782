use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use indicatif::MultiProgress;

mod error;
mod genre;
mod logger;
mod musicbrainz;
mod tags;
mod updater;

use error::RetagError;
use musicbrainz::MusicBrainzClient;
use updater::{RunSummary, UpdateOptions};

/// Update MP3 tags (Release date, Genre, Comment) from MusicBrainz.
#[derive(Parser)]
#[command(name = "retag", version, about)]
struct Cli {
    /// Directory path containing MP3 files
    #[arg(short, long)]
    path: PathBuf,

    /// Default genre to apply where no genre information is found
    #[arg(short = 'g', long = "default_genre")]
    default_genre: Option<String>,

    /// Comment to apply to all MP3 files
    #[arg(short, long)]
    comment: Option<String>,

    /// File that warnings and errors are appended to
    #[arg(long = "log_file", default_value = "retag.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let multi = MultiProgress::new();
    if let Err(e) = logger::init(&cli.log_file, multi.clone()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli, &multi).await {
        Ok(summary) => {
            println!(
                "{} updated, {} skipped, {} failed",
                summary.updated, summary.skipped, summary.failed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, multi: &MultiProgress) -> Result<RunSummary, RetagError> {
    if !cli.path.exists() {
        return Err(RetagError::PathNotFound(cli.path.clone()));
    }

    let client = MusicBrainzClient::new()?;
    let opts = UpdateOptions {
        default_genre: cli.default_genre.clone(),
        comment: cli.comment.clone(),
    };
    updater::update_directory(&cli.path, &client, &opts, multi).await
}
