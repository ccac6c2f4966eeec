use clap::{command, Parser};
use seval::{
    config::EvaluatorConfig, provider::InMemorySheets, ClientLanguage, Error, Evaluator,
    LocalParameter,
};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON sheet fixture
    #[arg(short, long)]
    sheets: Option<PathBuf>,

    /// Output language (ja, en, de, fr)
    #[arg(short, long)]
    language: Option<ClientLanguage>,

    /// Local number parameters, in order
    #[arg(long = "lnum", allow_hyphen_values = true)]
    numbers: Vec<i32>,

    /// Local string parameters in macro-string notation, in order after the
    /// numbers
    #[arg(long = "lstr")]
    strings: Vec<String>,

    /// Print extracted plain text instead of macro-string notation
    #[arg(short, long)]
    text: bool,

    /// Text to evaluate, in macro-string notation
    macro_string: String,
}

fn run(cli: &Cli) -> Result<String, Error> {
    let config = match &cli.config {
        Some(path) => EvaluatorConfig::from_file(path)?,
        None => EvaluatorConfig::default(),
    };
    debug!("config: {:?}", config);

    let sheets = match &cli.sheets {
        Some(path) => InMemorySheets::from_file(path)?,
        None => InMemorySheets::new(),
    };
    info!("sheets loaded.");

    let evaluator = Evaluator::builder(Arc::new(sheets)).config(config).build();

    let mut params: Vec<LocalParameter> = cli.numbers.iter().map(|n| (*n).into()).collect();
    for text in &cli.strings {
        params.push(LocalParameter::String(seval::text::macro_string::parse(text)?));
    }

    let result = evaluator.evaluate_macro_string(&cli.macro_string, &params, cli.language)?;
    Ok(if cli.text {
        result.extract_text()
    } else {
        result.to_string()
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
