//! Runtime settings shared by the CLI commands.

use std::path::PathBuf;

use crate::oplog::OperationLog;
use crate::pipeline::Processor;
use crate::walker::{OnError, Walker};

pub const DEFAULT_LOG_FILE: &str = "hufflock.log";

/// Runtime settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Operation log path; `None` disables the log
    pub log_file: Option<PathBuf>,
    pub on_error: OnError,
    /// 0 = info, 1 = debug, 2+ = trace
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            on_error: OnError::default(),
            verbosity: 0,
        }
    }
}

impl Config {
    pub fn operation_log(&self) -> Option<OperationLog> {
        self.log_file.as_ref().map(OperationLog::new)
    }

    pub fn processor(&self) -> Processor {
        match self.operation_log() {
            Some(log) => Processor::with_log(log),
            None => Processor::new(),
        }
    }

    pub fn walker<'a>(&self, processor: &'a Processor) -> Walker<'a> {
        Walker::new(processor, self.on_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_log_and_continue() {
        let config = Config::default();
        assert_eq!(config.on_error, OnError::Continue);
        assert_eq!(
            config.operation_log().unwrap().path(),
            std::path::Path::new(DEFAULT_LOG_FILE)
        );
        assert!(config.processor().log().is_some());
    }

    #[test]
    fn no_log_file_means_no_log() {
        let config = Config {
            log_file: None,
            ..Config::default()
        };
        assert!(config.processor().log().is_none());
    }
}
