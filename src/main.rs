//! `hufflock` command-line front end.

use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use zeroize::Zeroizing;

use hufflock::config::{Config, DEFAULT_LOG_FILE};
use hufflock::crypto::{XorKeystream, XorReader};
use hufflock::error::InputError;
use hufflock::walker::{self, BatchReport, OnError};
use hufflock::{logger, utils, Inspection, Operation, Report};

#[derive(Parser)]
#[command(name = "hufflock", version)]
#[command(about = "Huffman compression with optional XOR encryption for files and folders.", long_about = None)]
struct Cli {
    /// Operation log file (JSON lines)
    #[arg(long, global = true, env = "HUFFLOCK_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Do not write the operation log
    #[arg(long, global = true)]
    no_log: bool,

    /// What to do when one file of a folder fails
    #[arg(long, global = true, value_enum, default_value_t = OnErrorArg::Continue)]
    on_error: OnErrorArg,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum OnErrorArg {
    #[clap(help = "Log the failure and keep going (Default).")]
    Continue,
    #[clap(help = "Stop at the first failure.")]
    Abort,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file or folder (.cmp)
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encrypt a file or folder (.enc)
    Encrypt {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Compress then encrypt a file or folder (.ec)
    Pack {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Restore originals from .cmp, .enc or .ec files
    Recover {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show the header and code table of a .cmp or .ec file
    Inspect {
        input: PathBuf,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Print the operation log
    Log,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config {
        log_file: (!cli.no_log).then(|| cli.log_file.clone()),
        on_error: match cli.on_error {
            OnErrorArg::Continue => OnError::Continue,
            OnErrorArg::Abort => OnError::Abort,
        },
        verbosity: cli.verbose,
    };
    logger::init(config.verbosity);

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match cli.command {
        Commands::Compress { input, output } => process(&config, Operation::Compress, &input, output, None),
        Commands::Encrypt { input, output, password } => {
            process(&config, Operation::Encrypt, &input, output, password)
        }
        Commands::Pack { input, output, password } => {
            process(&config, Operation::CompressAndEncrypt, &input, output, password)
        }
        Commands::Recover { input, output, password } => recover(&config, &input, output, password),
        Commands::Inspect { input, password } => inspect(&input, password),
        Commands::Log => show_log(&config),
    }
}

fn process(
    config: &Config,
    operation: Operation,
    input: &Path,
    output: Option<PathBuf>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = if operation.encrypts() {
        Some(obtain_password(password)?)
    } else {
        None
    };
    let password = password.as_ref().map(|p| p.as_str());
    let processor = config.processor();

    if input.is_dir() {
        let output = output.unwrap_or_else(|| with_suffix(input, operation.extension()));
        let batch = config
            .walker(&processor)
            .process_folder(input, &output, operation, password)?;
        summarize(&batch, &output)
    } else {
        let output = output.unwrap_or_else(|| with_suffix(input, operation.extension()));
        let report = processor.process_file(input, &output, operation, password)?;
        print_report(&report);
        Ok(())
    }
}

fn recover(
    config: &Config,
    input: &Path,
    output: Option<PathBuf>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let needs_password = if input.is_dir() {
        walker::contains_encrypted(input)?
    } else {
        Operation::from_path(input).is_some_and(Operation::encrypts)
    };
    let password = if needs_password {
        Some(obtain_password(password)?)
    } else {
        None
    };
    let password = password.as_ref().map(|p| p.as_str());
    let processor = config.processor();

    if input.is_dir() {
        let output = output.unwrap_or_else(|| with_suffix(input, "recovered"));
        let batch = config.walker(&processor).recover_folder(input, &output, password)?;
        summarize(&batch, &output)
    } else {
        let output = output.unwrap_or_else(|| input.with_file_name(walker::original_name(input)));
        if output == input {
            bail!("{}", InputError::UnrecognizedExtension(input.to_path_buf()));
        }
        let report = processor.recover_file(input, &output, password)?;
        print_report(&report);
        Ok(())
    }
}

fn inspect(input: &Path, password: Option<String>) -> anyhow::Result<()> {
    let file = BufReader::new(File::open(input).with_context(|| format!("opening {}", input.display()))?);
    let info = match Operation::from_path(input) {
        Some(Operation::Compress) => hufflock::inspect(file)?,
        Some(Operation::CompressAndEncrypt) => {
            let password = obtain_password(password)?;
            hufflock::inspect(XorReader::new(file, XorKeystream::new(&password)?))?
        }
        Some(Operation::Encrypt) => bail!("{} is encrypted but not compressed", input.display()),
        None => bail!("{}", InputError::UnrecognizedExtension(input.to_path_buf())),
    };
    print_inspection(input, &info);
    Ok(())
}

fn show_log(config: &Config) -> anyhow::Result<()> {
    let Some(log) = config.operation_log() else {
        bail!("operation log is disabled");
    };
    let entries = log
        .entries()
        .with_context(|| format!("reading {}", log.path().display()))?;
    if entries.is_empty() {
        println!("Operation log is empty: {}", log.path().display());
    }
    for entry in entries {
        println!("{}\n", entry.render());
    }
    Ok(())
}

fn obtain_password(given: Option<String>) -> anyhow::Result<Zeroizing<String>> {
    let password = match given {
        Some(p) => Zeroizing::new(p),
        None => utils::read_password_prompt("Password: ")?,
    };
    if password.is_empty() {
        bail!("{}", InputError::EmptyPassword);
    }
    Ok(password)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn print_report(report: &Report) {
    println!(
        "{}: {} -> {} ({} -> {}, {} ms)",
        report.name(),
        report.input.display(),
        report.output.display(),
        utils::format_bytes(report.original_size),
        utils::format_bytes(report.final_size),
        report.elapsed.as_millis()
    );
    if let Some(ratio) = report.compression_ratio() {
        println!("Compression ratio: {ratio:.2}:1");
    }
}

fn summarize(batch: &BatchReport, output: &Path) -> anyhow::Result<()> {
    println!(
        "Processed {} file(s) into {} ({} -> {})",
        batch.completed.len(),
        output.display(),
        utils::format_bytes(batch.original_bytes()),
        utils::format_bytes(batch.final_bytes())
    );
    for (path, err) in &batch.failures {
        println!("Error: {}: {}", path.display(), err);
    }
    if !batch.is_success() {
        bail!("{} file(s) failed", batch.failures.len());
    }
    Ok(())
}

fn print_inspection(input: &Path, info: &Inspection) {
    println!("{}", input.display());
    println!("  symbols:        {}", info.table.total());
    println!("  distinct bytes: {}", info.table.len());
    println!("  header:         {}", utils::format_bytes(info.header_bytes));
    println!("  bitstream:      {}", utils::format_bytes(info.bitstream_bytes()));
    println!("  bits per byte:  {:.3}", info.mean_code_len());
    let Some(codes) = &info.codes else {
        return;
    };
    println!("  byte  frequency  code");
    for (byte, code) in codes.iter() {
        println!("  {:#04x} {:>10}  {}", byte, info.table.get(byte), code);
    }
}
