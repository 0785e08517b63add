//! Command implementations for the complaint-triage CLI.

use anyhow::Result;

use crate::cli::args::{ClassifyArgs, CheckSpamArgs, Command, OutputFormat, TrainArgs, TriageArgs};
use crate::classifier::ensemble::{DisasterClassifier, TrainingConfig};
use crate::dataset;
use crate::model_store::ModelStore;
use crate::pipeline::{TriagePipeline, TriageOutcome};
use crate::spam;

/// Execute a CLI command.
pub fn execute_command(args: TriageArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args.clone(), &args),
        Command::Classify(classify_args) => classify(classify_args.clone(), &args),
        Command::CheckSpam(spam_args) => check_spam(spam_args.clone(), &args),
    }
}

/// Train the ensemble and persist the artifact set.
fn train(args: TrainArgs, cli_args: &TriageArgs) -> Result<()> {
    let examples = match &args.dataset {
        Some(path) => dataset::load_csv(path)?,
        None => dataset::sample_corpus(),
    };

    let stats = dataset::corpus_stats(&examples);
    if cli_args.verbosity() > 0 {
        eprintln!(
            "Loaded {} samples ({} verified, {} not_verified)",
            stats.total, stats.verified, stats.not_verified
        );
    }

    let config = TrainingConfig::default();
    let (classifier, report) = DisasterClassifier::train(&examples, &config)?;

    let store = ModelStore::new(&args.model_dir);
    store.save(&classifier, &config)?;

    match cli_args.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => {
            println!(
                "Trained on {} samples, {} held out",
                report.train_size, report.holdout_size
            );
            println!(
                "Forest hold-out accuracy: {:.3}",
                report.forest_holdout_accuracy
            );
            println!("SVM hold-out accuracy: {:.3}", report.svm_holdout_accuracy);
            if let (Some(forest_cv), Some(svm_cv)) =
                (report.forest_cv_accuracy, report.svm_cv_accuracy)
            {
                println!("Forest CV accuracy: {forest_cv:.3}");
                println!("SVM CV accuracy: {svm_cv:.3}");
            }
            println!("Artifacts written to {}", store.directory().display());
        }
    }

    Ok(())
}

/// Gate one complaint and print the primary label.
///
/// The primary label goes to stdout; per-model detail goes to stderr under
/// `-v` so upstream callers reading stdout stay unaffected. Inference
/// failures never propagate: the pipeline substitutes the `not_verified`
/// fail-safe.
fn classify(args: ClassifyArgs, cli_args: &TriageArgs) -> Result<()> {
    let store = ModelStore::new(&args.model_dir);
    let classifier = match store.load()? {
        Some(classifier) => classifier,
        None => {
            // No trained artifacts yet: train on the built-in corpus and
            // persist, so the first call works out of the box.
            if cli_args.verbosity() > 0 {
                eprintln!("No trained models found, training on the sample corpus");
            }
            let config = TrainingConfig::default();
            let (classifier, _) =
                DisasterClassifier::train(&dataset::sample_corpus(), &config)?;
            store.save(&classifier, &config)?;
            classifier
        }
    };

    let pipeline = TriagePipeline::new(classifier);
    let outcome = pipeline.triage(&args.text);

    match cli_args.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Human => {
            println!("{}", outcome.primary_label());
            if cli_args.verbosity() > 1 {
                if let TriageOutcome::Classified(prediction) = &outcome {
                    eprintln!("confidence: {:.3}", prediction.confidence);
                    eprintln!(
                        "forest: {} ({:.3})",
                        prediction.breakdown.forest_label, prediction.breakdown.forest_confidence
                    );
                    eprintln!(
                        "svm: {} ({:.3})",
                        prediction.breakdown.svm_label, prediction.breakdown.svm_confidence
                    );
                }
            }
        }
    }

    Ok(())
}

/// Run only the spam gate.
fn check_spam(args: CheckSpamArgs, cli_args: &TriageArgs) -> Result<()> {
    let verdict = spam::is_spam(&args.text);
    match cli_args.output_format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "spam": verdict })),
        OutputFormat::Human => {
            println!("{}", if verdict { "spam" } else { "not_spam" });
        }
    }
    Ok(())
}
