// assetcrew-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::*;
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawn consumes the first expectation whose pattern is a substring of
/// any argument. With `create_dummy_output` the last argument is created as
/// an empty file, standing in for ffmpeg's output.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    /// `exit_code` is a raw wait status; `256` means exit code 1.
    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(exit_code),
        };
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
        };

        let expectation = expectations.remove(index);
        log::debug!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        let process = expectation.result?;
        if expectation.create_dummy_output {
            if let Some(output_path) = args.last().map(PathBuf::from) {
                if let Some(parent) = output_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::File::create(&output_path)?;
            }
        }
        Ok(process)
    }
}

/// Mock implementation of FfprobeExecutor keyed by input path.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    duration_results: Rc<RefCell<HashMap<PathBuf, Result<f64, String>>>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers the duration returned for `input_path`.
    pub fn expect_duration(&self, input_path: &Path, duration: f64) {
        self.duration_results
            .borrow_mut()
            .insert(input_path.to_path_buf(), Ok(duration));
    }

    /// Registers a probe failure for `input_path`.
    pub fn expect_failure(&self, input_path: &Path, message: &str) {
        self.duration_results
            .borrow_mut()
            .insert(input_path.to_path_buf(), Err(message.to_string()));
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn get_duration(&self, input_path: &Path) -> CoreResult<f64> {
        match self.duration_results.borrow().get(input_path) {
            Some(Ok(duration)) => Ok(*duration),
            Some(Err(message)) => Err(CoreError::FfprobeParse(message.clone())),
            None => Err(CoreError::FfprobeParse(format!(
                "MockFfprobeExecutor: No expectation set for path {}",
                input_path.display()
            ))),
        }
    }
}

/// Mock implementation of GitExecutor.
///
/// Subcommands listed with `fail_on` return a `CommandFailed` error carrying
/// the given message; everything else succeeds with empty output.
#[derive(Clone, Default)]
pub struct MockGitExecutor {
    failures: Rc<RefCell<HashMap<String, String>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockGitExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn fail_on(&self, subcommand: &str, message: &str) {
        self.failures
            .borrow_mut()
            .insert(subcommand.to_string(), message.to_string());
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl GitExecutor for MockGitExecutor {
    fn run(&self, _cwd: &Path, args: &[&str]) -> CoreResult<GitOutput> {
        self.received_calls
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());

        let subcommand = args.first().copied().unwrap_or_default();
        match self.failures.borrow().get(subcommand) {
            Some(message) => Err(crate::error::command_failed_error(
                format!("git {subcommand}"),
                ExitStatus::from_raw(256),
                message.clone(),
            )),
            None => Ok(GitOutput::default()),
        }
    }
}
