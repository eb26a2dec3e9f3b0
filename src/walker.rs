//! Recursive folder processing.
//!
//! Mirrors the input tree under the output folder and hands every regular
//! file to the [`Processor`]. A symbolic link to a file is processed like the
//! file itself. Links to directories are not followed; they are recorded as
//! failures, as are dangling links.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, InputError, Result};
use crate::pipeline::{Operation, Processor, Report};

/// What a folder run does when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Record the failure and move on to the next file
    #[default]
    Continue,
    /// Stop and return the failure
    Abort,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<Report>,
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn original_bytes(&self) -> u64 {
        self.completed.iter().map(|r| r.original_size).sum()
    }

    pub fn final_bytes(&self) -> u64 {
        self.completed.iter().map(|r| r.final_size).sum()
    }
}

pub struct Walker<'a> {
    processor: &'a Processor,
    on_error: OnError,
}

impl<'a> Walker<'a> {
    pub fn new(processor: &'a Processor, on_error: OnError) -> Self {
        Self {
            processor,
            on_error,
        }
    }

    /// Process every file under `input_dir`, writing `<name>.<ext>` files.
    pub fn process_folder(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        operation: Operation,
        password: Option<&str>,
    ) -> Result<BatchReport> {
        self.run(input_dir, output_dir, &mut |file: &Path, out_dir: &Path| {
            let mut name = file.file_name().map(OsString::from).unwrap_or_default();
            name.push(".");
            name.push(operation.extension());
            self.processor
                .process_file(file, &out_dir.join(name), operation, password)
        })
    }

    /// Recover every file under `input_dir`, dropping the `.cmp`/`.enc`/`.ec` extension.
    pub fn recover_folder(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        password: Option<&str>,
    ) -> Result<BatchReport> {
        self.run(input_dir, output_dir, &mut |file: &Path, out_dir: &Path| {
            self.processor
                .recover_file(file, &out_dir.join(original_name(file)), password)
        })
    }

    fn run<F>(&self, input_dir: &Path, output_dir: &Path, visit: &mut F) -> Result<BatchReport>
    where
        F: FnMut(&Path, &Path) -> Result<Report>,
    {
        if !input_dir.is_dir() {
            return Err(InputError::NotADirectory(input_dir.to_path_buf()).into());
        }
        fs::create_dir_all(output_dir)?;
        // output may live inside the input tree
        let skip = fs::canonicalize(output_dir)?;

        let mut report = BatchReport::default();
        self.walk(input_dir, output_dir, &skip, visit, &mut report)?;
        Ok(report)
    }

    fn walk<F>(
        &self,
        dir: &Path,
        out_dir: &Path,
        skip: &Path,
        visit: &mut F,
        report: &mut BatchReport,
    ) -> Result<()>
    where
        F: FnMut(&Path, &Path) -> Result<Report>,
    {
        let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if fs::canonicalize(&path)? == skip {
                    debug!(dir = %path.display(), "skipping output folder");
                    continue;
                }
                let sub_out = out_dir.join(entry.file_name());
                fs::create_dir_all(&sub_out)?;
                self.walk(&path, &sub_out, skip, visit, report)?;
            } else if file_type.is_file() {
                let result = visit(&path, out_dir);
                self.settle(path, result, report)?;
            } else if file_type.is_symlink() {
                let result = match fs::metadata(&path) {
                    Ok(target) if target.is_file() => visit(&path, out_dir),
                    Ok(target) if target.is_dir() => {
                        Err(InputError::SymlinkedDirectory(path.clone()).into())
                    }
                    Ok(_) => Err(InputError::NotAFile(path.clone()).into()),
                    Err(err) => Err(err.into()),
                };
                self.settle(path, result, report)?;
            } else {
                debug!(path = %path.display(), "skipping non-regular entry");
            }
        }
        Ok(())
    }

    /// Record one file's outcome, or return the error under [`OnError::Abort`].
    fn settle(&self, path: PathBuf, result: Result<Report>, report: &mut BatchReport) -> Result<()> {
        match result {
            Ok(done) => report.completed.push(done),
            Err(err) => match self.on_error {
                OnError::Abort => return Err(err),
                OnError::Continue => {
                    warn!(file = %path.display(), error = %err, "continuing after failure");
                    report.failures.push((path, err));
                }
            },
        }
        Ok(())
    }
}

/// File name with a known operation extension removed.
pub fn original_name(file: &Path) -> OsString {
    match (Operation::from_path(file), file.file_stem()) {
        (Some(_), Some(stem)) => stem.to_os_string(),
        _ => file.file_name().map(OsString::from).unwrap_or_default(),
    }
}

/// True if any file under `dir` needs a password to recover.
pub fn contains_encrypted(dir: &Path) -> std::io::Result<bool> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if contains_encrypted(&path)? {
                return Ok(true);
            }
        } else if (file_type.is_file() || file_type.is_symlink())
            && Operation::from_path(&path).is_some_and(Operation::encrypts)
        {
            return Ok(true);
        }
    }
    Ok(false)
}
