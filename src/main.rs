use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ecosort::cli::Args;
use ecosort::labels::LabelTable;
use ecosort::ledger::Ledger;
use ecosort::model::OnnxClassifier;
use ecosort::preprocess::{PreprocessConfig, Processor};
use ecosort::service::ClassificationEngine;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let labels = LabelTable::load(&args.labels)
        .with_context(|| format!("loading label table from {}", args.labels))?;
    info!(classes = labels.len(), "label table loaded");

    let classifier = OnnxClassifier::load(&args.model, args.cuda)
        .with_context(|| format!("loading classifier from {}", args.model))?;
    info!(model = %args.model, cuda = args.cuda, "classifier ready");

    let ledger = Ledger::open(&args.db)
        .with_context(|| format!("opening leaderboard ledger at {}", args.db))?;

    let engine = ClassificationEngine::new(
        classifier,
        Processor::new(PreprocessConfig::default()),
        labels,
        ledger,
    );

    let image_bytes =
        std::fs::read(&args.image).with_context(|| format!("reading image {}", args.image))?;
    let result = engine.classify_and_score(&image_bytes, &args.user)?;

    println!(
        "Prediction: {} ({:.1}% confidence)",
        result.label,
        result.confidence * 100.0
    );
    println!("Waste type: {}", result.category);
    println!("How to recycle: {}", result.instruction);
    println!("Dustbin: {}", result.bin);
    println!("Points earned: {}", result.points);
    if !result.recorded {
        println!("(score could not be saved this time)");
    }

    println!();
    println!("Leaderboard:");
    for (rank, entry) in engine.top_n(args.top)?.iter().enumerate() {
        println!(
            "{:>3}. {:<20} {:>6} pts  ({} classified)",
            rank + 1,
            entry.username,
            entry.points,
            entry.correct_classifications
        );
    }

    Ok(())
}
