// ============================================================================
// assetcrew-core/src/orchestration/mod.rs
// ============================================================================
//
// ORCHESTRATION: Agents, Tasks and the Crew That Runs Them
//
// The agent runtime itself is external. This module holds what is handed to
// it (agent profiles, the task catalogue, the tool registry) and a `Crew`
// that feeds tasks to a `TaskDispatcher` in order, no faster than the
// configured rate.
//
// KEY COMPONENTS:
// - TaskDispatcher: (task, agent) -> result string
// - DryRunDispatcher: dispatcher that calls no model
// - RecordingDispatcher: test double behind the test-mocks feature
// - RateLimiter: at most N dispatches per window
// - Crew / CrewSummary: sequential pipeline and its outcome

pub mod agents;
pub mod tasks;
pub mod tools;

pub use agents::{AgentKind, AgentProfile, ToolRef, roster};
pub use tasks::{DEFAULT_EXPECTED_OUTPUT, TaskDescriptor, all_tasks};
pub use tools::{AssetTool, ToolOutput, Toolbox};

use crate::config::{AssetConfig, DEFAULT_MAX_RPM};
use crate::error::{CoreError, CoreResult};
use crate::logging::log_section;
use log::{debug, info};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Hands a task to an agent runtime and returns its final answer.
pub trait TaskDispatcher {
    fn dispatch(&mut self, task: &TaskDescriptor, agent: &AgentProfile) -> CoreResult<String>;
}

/// Logs each task and answers with its expected output.
#[derive(Debug, Default)]
pub struct DryRunDispatcher {
    dispatched: usize,
}

impl DryRunDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched
    }
}

impl TaskDispatcher for DryRunDispatcher {
    fn dispatch(&mut self, task: &TaskDescriptor, agent: &AgentProfile) -> CoreResult<String> {
        self.dispatched += 1;
        info!("[dry-run] {} <- {}", agent.name, task.description);
        debug!("[dry-run] tools: {}", agent.tool_names().join(", "));
        Ok(task.expected_output.clone())
    }
}

/// Records every dispatch and replays canned answers; fails on request.
#[cfg(any(test, feature = "test-mocks"))]
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub calls: Vec<(String, String)>,
    fail_at: Option<usize>,
}

#[cfg(any(test, feature = "test-mocks"))]
impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `index`-th dispatch (0-based) fail.
    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(index),
        }
    }
}

#[cfg(any(test, feature = "test-mocks"))]
impl TaskDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, task: &TaskDescriptor, agent: &AgentProfile) -> CoreResult<String> {
        let index = self.calls.len();
        self.calls.push((agent.name.clone(), task.description.clone()));
        if self.fail_at == Some(index) {
            return Err(CoreError::Dispatch(format!("runtime rejected task {index}")));
        }
        Ok(format!("done: {}", task.expected_output))
    }
}

/// Sliding-window limiter: at most `max_per_window` acquisitions per `window`.
#[derive(Debug)]
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    recent: VecDeque<Instant>,
}

impl RateLimiter {
    /// `max_per_window == 0` disables limiting.
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            recent: VecDeque::new(),
        }
    }

    pub fn per_minute(max_rpm: u32) -> Self {
        Self::new(max_rpm, Duration::from_secs(60))
    }

    /// Blocks until another acquisition fits in the window and returns how
    /// long it waited.
    pub fn acquire(&mut self) -> Duration {
        if self.max_per_window == 0 {
            return Duration::ZERO;
        }

        let mut waited = Duration::ZERO;
        if self.recent.len() >= self.max_per_window as usize {
            if let Some(oldest) = self.recent.pop_front() {
                let ready_at = oldest + self.window;
                let now = Instant::now();
                if ready_at > now {
                    waited = ready_at - now;
                    debug!("Rate limit reached, waiting {:.1}s", waited.as_secs_f64());
                    std::thread::sleep(waited);
                }
            }
        }
        self.recent.push_back(Instant::now());
        waited
    }
}

/// Result of one dispatched task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub agent: String,
    pub description: String,
    pub output: String,
}

/// What a crew run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewSummary {
    pub outcomes: Vec<TaskOutcome>,
    pub elapsed: Duration,
}

impl fmt::Display for CrewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            writeln!(f, "{}. [{}] {}", i + 1, outcome.agent, outcome.output)?;
        }
        write!(
            f,
            "{} tasks in {:.1}s",
            self.outcomes.len(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Agents plus an ordered task list.
pub struct Crew {
    agents: Vec<AgentProfile>,
    tasks: Vec<TaskDescriptor>,
    limiter: RateLimiter,
}

impl Crew {
    pub fn new(agents: Vec<AgentProfile>, tasks: Vec<TaskDescriptor>) -> Self {
        Self {
            agents,
            tasks,
            limiter: RateLimiter::per_minute(DEFAULT_MAX_RPM),
        }
    }

    /// The full asset crew: roster and catalogue for `config`.
    pub fn standard(config: &AssetConfig) -> Self {
        Self::new(roster(config), all_tasks())
    }

    pub fn with_max_rpm(mut self, max_rpm: u32) -> Self {
        self.limiter = RateLimiter::per_minute(max_rpm);
        self
    }

    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn agents(&self) -> &[AgentProfile] {
        &self.agents
    }

    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    /// Dispatches every task in order. The first failure aborts the run.
    pub fn kickoff<D: TaskDispatcher>(&mut self, dispatcher: &mut D) -> CoreResult<CrewSummary> {
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        log_section(&format!(
            "Asset crew: {} agents, {} tasks",
            self.agents.len(),
            self.tasks.len()
        ));

        for (index, task) in self.tasks.iter().enumerate() {
            let agent = find_agent(&self.agents, task.agent)?;
            self.limiter.acquire();
            info!("Task {}/{} -> {}", index + 1, self.tasks.len(), agent.name);

            let output = dispatcher.dispatch(task, agent).map_err(|e| {
                CoreError::Dispatch(format!("task {} ({}): {}", index + 1, agent.name, e))
            })?;
            outcomes.push(TaskOutcome {
                agent: agent.name.clone(),
                description: task.description.clone(),
                output,
            });
        }

        Ok(CrewSummary {
            outcomes,
            elapsed: start.elapsed(),
        })
    }
}

fn find_agent(agents: &[AgentProfile], kind: AgentKind) -> CoreResult<&AgentProfile> {
    agents
        .iter()
        .find(|a| a.kind == kind)
        .ok_or_else(|| CoreError::Dispatch(format!("No {kind} agent in the crew")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_returns_expected_outputs() {
        let mut crew = Crew::standard(&AssetConfig::default()).with_max_rpm(0);
        let mut dispatcher = DryRunDispatcher::new();

        let summary = crew.kickoff(&mut dispatcher).unwrap();

        assert_eq!(dispatcher.dispatched(), 8);
        assert_eq!(summary.outcomes.len(), 8);
        assert_eq!(summary.outcomes[0].agent, "ImageAssetAgent");
        assert_eq!(summary.outcomes[3].output, "assets/audio/bgm/chiptune_loop.ogg");
        assert_eq!(summary.outcomes[7].agent, "AssetIntegrationAgent");
    }

    #[test]
    fn test_stops_at_first_failure() {
        let mut crew = Crew::standard(&AssetConfig::default()).with_max_rpm(0);
        let mut dispatcher = RecordingDispatcher::failing_at(2);

        let result = crew.kickoff(&mut dispatcher);
        assert!(matches!(result, Err(CoreError::Dispatch(msg)) if msg.starts_with("task 3")));
        assert_eq!(dispatcher.calls.len(), 3);
    }

    #[test]
    fn test_missing_agent_is_dispatch_error() {
        let config = AssetConfig::default();
        let mut crew = Crew::new(
            vec![AgentProfile::for_kind(AgentKind::Image, &config)],
            tasks::audio_tasks(),
        )
        .with_max_rpm(0);

        let mut dispatcher = RecordingDispatcher::new();
        assert!(matches!(crew.kickoff(&mut dispatcher), Err(CoreError::Dispatch(_))));
        assert!(dispatcher.calls.is_empty());
    }

    #[test]
    fn test_rate_limiter_waits_for_window() {
        let mut limiter = RateLimiter::new(2, Duration::from_millis(50));
        assert_eq!(limiter.acquire(), Duration::ZERO);
        assert_eq!(limiter.acquire(), Duration::ZERO);

        let start = Instant::now();
        limiter.acquire();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_rate_limiter_disabled() {
        let mut limiter = RateLimiter::per_minute(0);
        for _ in 0..10 {
            assert_eq!(limiter.acquire(), Duration::ZERO);
        }
    }

    #[test]
    fn test_summary_display() {
        let summary = CrewSummary {
            outcomes: vec![TaskOutcome {
                agent: "AudioAssetAgent".to_string(),
                description: "x".to_string(),
                output: "assets/audio/a.ogg".to_string(),
            }],
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(
            summary.to_string(),
            "1. [AudioAssetAgent] assets/audio/a.ogg\n1 tasks in 1.5s"
        );
    }
}
