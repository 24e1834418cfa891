use clap::Parser;
use serde::Serialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use voidtools_css::{run_pipeline, ConversionResult, ConvertError, PipelineConfig, RuleConverter, Status};

#[derive(Parser, Debug)]
#[command(name = "css2tw", version, about = "Convert CSS declarations to Tailwind classes")]
struct Cli {
    /// CSS files to convert. Reads stdin when empty or `-`.
    files: Vec<PathBuf>,

    /// YAML pipeline config (debounceMs, timeoutMs, wrapperSelector)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print one JSON object per input instead of the class list
    #[arg(long)]
    json: bool,

    /// Log pipeline stages
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a str,
    #[serde(flatten)]
    result: &'a ConversionResult,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match PipelineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("✗ {}", e);
                process::exit(2);
            }
        },
        None => PipelineConfig::default(),
    };

    let inputs: Vec<PathBuf> = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files.clone()
    };

    let converter = RuleConverter::new();
    let mut exit_code = 0;

    for path in &inputs {
        let name = path.display().to_string();
        let css = match read_input(path) {
            Ok(css) => css,
            Err(e) => {
                eprintln!("✗ {}: {}", name, e);
                exit_code = 1;
                continue;
            }
        };

        let result = run_pipeline(&converter, &css, &config).await;
        if result.status == Status::Error {
            exit_code = 1;
        }

        if cli.json {
            let report = FileReport {
                file: &name,
                result: &result,
            };
            match serde_json::to_string(&report) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    eprintln!("✗ {}: {}", name, e);
                    exit_code = 1;
                }
            }
        } else {
            print_human(&name, &result, inputs.len() > 1);
        }
    }

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("voidtools_css=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<String, ConvertError> {
    if path.as_os_str() == "-" {
        let mut css = String::new();
        io::stdin().read_to_string(&mut css)?;
        return Ok(css);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn print_human(name: &str, result: &ConversionResult, show_name: bool) {
    if show_name {
        println!("{}:", name);
    }
    match result.status {
        Status::Error => {
            eprintln!("✗ {}: {}", name, result.error.as_deref().unwrap_or("Error"));
        }
        Status::Idle => {
            eprintln!("{}: empty input", name);
        }
        _ => {
            println!("{}", result.output);
            for line in &result.unsupported_props {
                eprintln!("warning: unsupported: {}", line);
            }
        }
    }
}
