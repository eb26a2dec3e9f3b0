//! Per-file processing: compress, encrypt, or both, and the way back.
//!
//! The cipher runs as a stream stage around the codec (after encoding,
//! before decoding), so no intermediate file is ever written. Output goes to
//! a sibling `.tmp` file that is renamed into place only once everything
//! succeeded, and removed on every failure path.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::crypto::{XorKeystream, XorReader, XorWriter};
use crate::decoder;
use crate::encoder;
use crate::error::{Error, InputError, Result};
use crate::oplog::OperationLog;

const TEMP_EXT: &str = "tmp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Encrypt,
    CompressAndEncrypt,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::Compress,
        Operation::Encrypt,
        Operation::CompressAndEncrypt,
    ];

    /// Extension of produced files, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Operation::Compress => "cmp",
            Operation::Encrypt => "enc",
            Operation::CompressAndEncrypt => "ec",
        }
    }

    pub fn compresses(self) -> bool {
        matches!(self, Operation::Compress | Operation::CompressAndEncrypt)
    }

    pub fn encrypts(self) -> bool {
        matches!(self, Operation::Encrypt | Operation::CompressAndEncrypt)
    }

    /// The operation that produced `path`, judged by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|op| op.extension() == ext)
    }

    pub fn name(self, direction: Direction) -> &'static str {
        match (direction, self) {
            (Direction::Process, Operation::Compress) => "compress",
            (Direction::Process, Operation::Encrypt) => "encrypt",
            (Direction::Process, Operation::CompressAndEncrypt) => "compress+encrypt",
            (Direction::Recover, Operation::Compress) => "decompress",
            (Direction::Recover, Operation::Encrypt) => "decrypt",
            (Direction::Recover, Operation::CompressAndEncrypt) => "decrypt+decompress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Process,
    Recover,
}

/// Outcome of one successful file operation.
#[derive(Debug, Clone)]
pub struct Report {
    pub operation: Operation,
    pub direction: Direction,
    pub input: PathBuf,
    pub output: PathBuf,
    pub original_size: u64,
    pub final_size: u64,
    pub elapsed: Duration,
}

impl Report {
    pub fn name(&self) -> &'static str {
        self.operation.name(self.direction)
    }

    /// original : final, only for operations that compress.
    pub fn compression_ratio(&self) -> Option<f64> {
        if self.direction == Direction::Process
            && self.operation.compresses()
            && self.final_size > 0
        {
            Some(self.original_size as f64 / self.final_size as f64)
        } else {
            None
        }
    }

    pub fn size_reduction_percent(&self) -> Option<f64> {
        self.compression_ratio()?;
        if self.original_size == 0 {
            return None;
        }
        let saved = self.original_size as f64 - self.final_size as f64;
        Some(saved / self.original_size as f64 * 100.0)
    }
}

/// Runs file operations and records each outcome in the operation log.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    log: Option<OperationLog>,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: OperationLog) -> Self {
        Self { log: Some(log) }
    }

    pub fn log(&self) -> Option<&OperationLog> {
        self.log.as_ref()
    }

    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        operation: Operation,
        password: Option<&str>,
    ) -> Result<Report> {
        let started = Instant::now();
        let outcome = run_process(input, output, operation, password.unwrap_or_default())
            .and_then(|()| {
                build_report(input, output, operation, Direction::Process, started)
            });
        self.finish(outcome, operation.name(Direction::Process), input)
    }

    /// Undo whatever produced `input`, chosen by its extension.
    pub fn recover_file(
        &self,
        input: &Path,
        output: &Path,
        password: Option<&str>,
    ) -> Result<Report> {
        let started = Instant::now();
        let Some(operation) = Operation::from_path(input) else {
            let err: Error = InputError::UnrecognizedExtension(input.to_path_buf()).into();
            return self.finish(Err(err), "recover", input);
        };
        let outcome = run_recover(input, output, operation, password.unwrap_or_default())
            .and_then(|()| {
                build_report(input, output, operation, Direction::Recover, started)
            });
        self.finish(outcome, operation.name(Direction::Recover), input)
    }

    fn finish(&self, outcome: Result<Report>, name: &str, input: &Path) -> Result<Report> {
        match &outcome {
            Ok(report) => {
                info!(
                    operation = name,
                    input = %report.input.display(),
                    output = %report.output.display(),
                    original_size = report.original_size,
                    final_size = report.final_size,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "operation complete"
                );
                if let Some(log) = &self.log {
                    if let Err(e) = log.record_success(report) {
                        warn!(error = %e, log = %log.path().display(), "could not append to operation log");
                    }
                }
            }
            Err(err) => {
                warn!(operation = name, input = %input.display(), error = %err, "operation failed");
                if let Some(log) = &self.log {
                    if let Err(e) = log.record_failure(name, input, err) {
                        warn!(error = %e, log = %log.path().display(), "could not append to operation log");
                    }
                }
            }
        }
        outcome
    }
}

fn run_process(input: &Path, output: &Path, operation: Operation, password: &str) -> Result<()> {
    let source = open_input(input)?;
    match operation {
        Operation::Compress => write_staged(output, |sink| {
            encoder::encode(source, sink)?;
            Ok(())
        }),
        Operation::Encrypt => {
            let keystream = XorKeystream::new(password)?;
            write_staged(output, |sink| {
                let mut source = source;
                io::copy(&mut source, &mut XorWriter::new(sink, keystream))?;
                Ok(())
            })
        }
        Operation::CompressAndEncrypt => {
            let keystream = XorKeystream::new(password)?;
            write_staged(output, |sink| {
                encoder::encode(source, XorWriter::new(sink, keystream))?;
                Ok(())
            })
        }
    }
}

fn run_recover(input: &Path, output: &Path, operation: Operation, password: &str) -> Result<()> {
    let source = open_input(input)?;
    match operation {
        Operation::Compress => write_staged(output, |sink| {
            decoder::decode(source, sink)?;
            Ok(())
        }),
        Operation::Encrypt => {
            let keystream = XorKeystream::new(password)?;
            write_staged(output, |sink| {
                io::copy(&mut XorReader::new(source, keystream), sink)?;
                Ok(())
            })
        }
        Operation::CompressAndEncrypt => {
            let keystream = XorKeystream::new(password)?;
            write_staged(output, |sink| {
                decoder::decode(XorReader::new(source, keystream), sink)?;
                Ok(())
            })
        }
    }
}

fn open_input(input: &Path) -> Result<BufReader<File>> {
    if !fs::metadata(input)?.is_file() {
        return Err(InputError::NotAFile(input.to_path_buf()).into());
    }
    Ok(BufReader::new(File::open(input)?))
}

fn build_report(
    input: &Path,
    output: &Path,
    operation: Operation,
    direction: Direction,
    started: Instant,
) -> Result<Report> {
    Ok(Report {
        operation,
        direction,
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        original_size: fs::metadata(input)?.len(),
        final_size: fs::metadata(output)?.len(),
        elapsed: started.elapsed(),
    })
}

/// Removes the staged file unless disarmed.
struct TempGuard {
    path: PathBuf,
    armed: bool,
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".");
    name.push(TEMP_EXT);
    PathBuf::from(name)
}

fn write_staged<F>(target: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let temp = temp_path(target);
    let mut guard = TempGuard {
        path: temp.clone(),
        armed: true,
    };

    let mut sink = BufWriter::new(File::create(&temp)?);
    write(&mut sink)?;
    sink.flush()?;
    drop(sink);

    fs::rename(&temp, target)?;
    guard.armed = false;
    Ok(())
}
