use rusty_id3::data::loader::{load_testing, load_training};
use rusty_id3::error::Id3Error;
use rusty_id3::trees::classifier::DecisionTreeClassifier;
use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn filenames() -> io::Result<(String, String)> {
    let mut args = env::args().skip(1);
    let training = match args.next() {
        Some(name) => name,
        None => prompt("Enter the name of the training file: ")?,
    };
    let testing = match args.next() {
        Some(name) => name,
        None => prompt("Enter the name of the testing file: ")?,
    };
    Ok((training, testing))
}

fn run() -> Result<(), Id3Error> {
    let (training_file, testing_file) = filenames()?;
    let train_dataset = load_training(&training_file)?;
    let test_dataset = load_testing(&testing_file, train_dataset.attributes())?;

    let mut classifier = DecisionTreeClassifier::new();
    classifier.fit(&train_dataset)?;

    print!("{}", classifier.report(&train_dataset, &test_dataset)?);
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Could not read input: {}", err);
            ExitCode::FAILURE
        }
    }
}
