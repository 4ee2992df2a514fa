use clap::{Arg, Command};
use log::LevelFilter;
use spamsift::{corpus, Config, EvalReport, SpamDetector, SpamModel};
use std::process;

fn main() {
    let matches = Command::new("spamsift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Hybrid spam classifier blending a trained model with phrase heuristics")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("spamsift.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and report what it points at")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("classify")
                .long("classify")
                .value_name("TEXT")
                .help("Classify one text and print the result as JSON")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("train")
                .long("train")
                .help("Retrain from the corpus and overwrite the model artifact")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("evaluate")
                .long("evaluate")
                .help("Score the current model against the held-out split")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Train on the built-in sample corpus and classify example texts")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logger based on verbose flag
    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config_path = matches.get_one::<String>("config").unwrap();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        test_config(&config);
        return;
    }

    if matches.get_flag("demo") {
        run_demo(&config);
        return;
    }

    if matches.get_flag("train") {
        run_train(&config);
        return;
    }

    if matches.get_flag("evaluate") {
        run_evaluate(&config);
        return;
    }

    if let Some(text) = matches.get_one::<String>("classify") {
        run_classify(&config, text);
        return;
    }

    eprintln!("No command given. Try --classify, --train, --evaluate, or --demo.");
    process::exit(1);
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path)
    } else {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Ok(Config::default())
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn test_config(config: &Config) {
    println!("🔍 Testing configuration...");
    println!();

    if let Err(e) = config.validate() {
        println!("❌ Configuration validation failed:");
        println!("Error: {e}");
        process::exit(1);
    }

    println!("Spam phrases: {}", config.spam_patterns.len());
    if std::path::Path::new(&config.model_path).exists() {
        println!("Model artifact: {} (present)", config.model_path);
    } else {
        println!(
            "Model artifact: {} (absent, first run will train)",
            config.model_path
        );
    }
    if std::path::Path::new(&config.corpus_path).exists() {
        println!("Training corpus: {} (present)", config.corpus_path);
    } else {
        println!("Training corpus: {} (absent)", config.corpus_path);
    }
    println!("✅ Configuration is valid");
}

fn initialize_detector(config: &Config) -> SpamDetector {
    match SpamDetector::initialize(config) {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("❌ Failed to initialize detector: {e}");
            process::exit(1);
        }
    }
}

fn run_classify(config: &Config, text: &str) {
    let detector = initialize_detector(config);
    let result = match detector.classify(text) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("❌ Classification failed: {e}");
            process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("❌ Failed to encode result: {e}");
            process::exit(1);
        }
    }
}

fn run_train(config: &Config) {
    println!("🧠 Training model from {}...", config.corpus_path);
    match SpamDetector::train_and_persist(config) {
        Ok((model, report)) => {
            println!("✅ Model trained and written to {}", config.model_path);
            println!("   Vocabulary terms: {}", model.vocabulary_size());
            print_report(&report);
        }
        Err(e) => {
            eprintln!("❌ Training failed: {e}");
            process::exit(1);
        }
    }
}

fn run_evaluate(config: &Config) {
    let detector = initialize_detector(config);
    match detector.evaluate_holdout(config) {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("❌ Evaluation failed: {e}");
            process::exit(1);
        }
    }
}

fn print_report(report: &EvalReport) {
    println!("📊 Held-out validation ({} examples)", report.examples);
    println!("   Accuracy:       {:.1}%", report.accuracy() * 100.0);
    println!("   Spam precision: {:.1}%", report.spam_precision() * 100.0);
    println!("   Spam recall:    {:.1}%", report.spam_recall() * 100.0);
}

fn run_demo(config: &Config) {
    println!("🧪 Demo mode: training on the built-in sample corpus");
    println!();

    let mut examples = corpus::sample_messages();
    corpus::augment_with_patterns(&mut examples, &config.spam_patterns);
    let (train, holdout) = corpus::split_corpus(
        examples,
        config.training.holdout_fraction,
        config.training.shuffle_seed,
    );
    let model = match SpamModel::train(&train, &config.training) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("❌ Demo training failed: {e}");
            process::exit(1);
        }
    };
    print_report(&model.evaluate(&holdout));
    println!();

    let detector = SpamDetector::from_parts(model, config.spam_patterns.clone());
    let samples = [
        "URGENT! You have won a free cash prize, call now!",
        "Hi, when will you be home for dinner?",
        "Limited offer: earn money from home with no experience",
        "The meeting moved to 3pm tomorrow",
    ];
    for text in samples {
        match detector.classify(text) {
            Ok(result) => {
                let marker = if result.is_spam { "🚨" } else { "✅" };
                println!("{marker} {text:?}");
                println!("   {} ({:.2}% confidence)", result.prediction, result.confidence);
                if let Some(ref indicators) = result.spam_indicators {
                    println!("   Indicators: {}", indicators.join(", "));
                }
            }
            Err(e) => {
                eprintln!("❌ Demo classification failed: {e}");
                process::exit(1);
            }
        }
        println!();
    }
}
