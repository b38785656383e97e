use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use qs_rankings::resolve::ResolverChain;
use qs_rankings::{display, filter, merge, report, translate, untranslated, Settings};

#[derive(Parser)]
#[command(name = "qs_rankings", about = "QS ranking merge/filter/translate/display pipeline")]
struct Cli {
    /// Sectioned settings file
    #[arg(short, long, global = true, default_value = "config.ini")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge scraped fragments into one file per year
    Merge,
    /// Keep Mainland China, Hong Kong, Macau and Taiwan records
    Filter,
    /// Attach Chinese names (table lookup, then online provider)
    Translate,
    /// Build display/rank.json, or report on it
    Display(DisplayArgs),
    /// List records left without a Chinese name
    Untranslated {
        /// Write the de-duplicated list to untranslated_universities.txt
        #[arg(long)]
        export: bool,
    },
    /// merge + filter + translate + display
    Run,
}

#[derive(Args)]
struct DisplayArgs {
    /// Show the top N scored entries of the latest year
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "5")]
    preview: Option<usize>,
    /// Per-year counts, score/logo coverage and latest top 10
    #[arg(long, conflicts_with = "preview")]
    analyze: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(Some(cli.config.as_path()))?;
    let layout = settings.layout();
    info!(data_dir = ?layout.root(), provider = ?settings.translate.provider, "Settings loaded");

    let result: anyhow::Result<()> = match cli.command {
        Commands::Merge => {
            println!("Merging fragments from {:?}", layout.slice_dir());
            merge::run(&layout)?.print();
            Ok(())
        }
        Commands::Filter => {
            println!("Filtering domestic universities in {:?}", layout.merge_dir());
            filter::run(&layout)?.print();
            Ok(())
        }
        Commands::Translate => {
            let mut chain = ResolverChain::from_settings(&settings)?;
            println!("Translating names (tiers: {})", chain.tiers().join(" -> "));
            translate::run(&layout, &mut chain)?.print();
            Ok(())
        }
        Commands::Display(args) => {
            if let Some(limit) = args.preview {
                report::print_preview(&layout, limit)?;
            } else if args.analyze {
                report::print_analysis(&layout)?;
            } else {
                display::run(&layout)?.print();
                println!("Output: {:?}", layout.rank_file());
            }
            Ok(())
        }
        Commands::Untranslated { export } => {
            let found = untranslated::scan(&layout)?;
            untranslated::print(&found);
            if export {
                untranslated::export(&layout, &found)?;
            } else {
                println!("\nUse --export to write the list to a file.");
            }
            Ok(())
        }
        Commands::Run => {
            println!("Stage 1: merge");
            merge::run(&layout)?.print();

            println!("\nStage 2: filter");
            filter::run(&layout)?.print();

            println!("\nStage 3: translate");
            let mut chain = ResolverChain::from_settings(&settings)?;
            translate::run(&layout, &mut chain)?.print();

            println!("\nStage 4: display");
            display::run(&layout)?.print();
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
