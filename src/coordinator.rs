//! Operation coordinators
//!
//! One coordinator per user-facing action (analyze / summarize / fact). A
//! coordinator owns the action's busy flag and result/error slots, validates
//! input before any network traffic, drives the retry runner, and fires an
//! optional post-success hook. An atomic in-flight guard enforces what the
//! UI's disabled-button convention only suggested: a coordinator never runs
//! two overlapping invocations, so the state slots never see interleaved
//! writers. Distinct coordinators share nothing and may run concurrently.

use crate::backoff::BackoffPolicy;
use crate::error::{Error, Result};
use crate::gemini::{GeminiClient, GenerateClient, GenerateRequest, GenerationConfig};
use crate::interpret::{ExpectedShape, Payload};
use crate::runner::{self, OperationRequest};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Delay between a successful outcome and the success hook, so the result
/// can render before the hook (e.g. scroll-into-view) runs
const SUCCESS_HOOK_DELAY: Duration = Duration::from_millis(100);

/// User-facing action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Assess the credibility of a claim (structured response)
    Analyze,
    /// Summarize user-supplied text (plain response)
    Summarize,
    /// Fetch a trivia fact, no input required (plain response)
    Fact,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Analyze => write!(f, "analyze"),
            Action::Summarize => write!(f, "summarize"),
            Action::Fact => write!(f, "fact"),
        }
    }
}

impl Action {
    /// Whether the action needs non-empty input before dispatch
    #[must_use]
    pub fn requires_input(&self) -> bool {
        !matches!(self, Action::Fact)
    }

    /// Shape the response payload must take
    #[must_use]
    pub fn expected_shape(&self) -> ExpectedShape {
        match self {
            Action::Analyze => ExpectedShape::StructuredJson,
            Action::Summarize | Action::Fact => ExpectedShape::PlainText,
        }
    }

    /// Fixed message surfaced on terminal failure
    #[must_use]
    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::Analyze => "Failed to get a response. Please try again.",
            Action::Summarize => "Failed to get a summary. Please try again.",
            Action::Fact => "Failed to get a fact. Please try again.",
        }
    }

    /// Fixed message surfaced when required input is blank.
    ///
    /// Fact has no input precondition, so its message is never surfaced.
    #[must_use]
    pub fn validation_message(&self) -> &'static str {
        match self {
            Action::Analyze => "Please enter a claim to analyze.",
            Action::Summarize => "Please enter some text to summarize.",
            Action::Fact => "Please enter some text.",
        }
    }

    fn validate(&self, input: &str) -> Result<()> {
        if self.requires_input() && input.trim().is_empty() {
            return Err(Error::Validation(self.validation_message().to_string()));
        }
        Ok(())
    }

    fn prompt(&self, input: &str) -> String {
        match self {
            Action::Analyze => format!(
                "You are a meticulous fact-checker. Assess the credibility of the \
                 following claim. Respond with a JSON object containing \
                 \"credibilityScore\" (a number from 0 for implausible to 100 for \
                 well-supported) and \"breakdown\" (a short explanation of the \
                 assessment).\n\nClaim: {input}"
            ),
            Action::Summarize => {
                format!("Summarize the following text in a few clear sentences:\n\n{input}")
            }
            Action::Fact => {
                "Share one surprising, verifiable trivia fact in one or two sentences."
                    .to_string()
            }
        }
    }

    /// Build the immutable request for one invocation
    #[must_use]
    pub fn build_request(&self, input: &str) -> OperationRequest {
        let config = match self.expected_shape() {
            ExpectedShape::StructuredJson => GenerationConfig::structured_json(),
            ExpectedShape::PlainText => GenerationConfig::plain_text(),
        };
        let body = GenerateRequest::from_prompt(self.prompt(input)).with_generation_config(config);
        OperationRequest::new(body, self.expected_shape())
    }
}

/// UI-visible state of one coordinator.
///
/// After an operation completes, `result` and `error` are mutually
/// exclusive; starting a new operation clears both.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorState {
    /// An operation is in flight
    pub busy: bool,
    /// Payload of the last successful operation
    pub result: Option<Payload>,
    /// Message of the last failed operation
    pub error: Option<String>,
}

/// Hook invoked with the payload after a successful outcome
pub type SuccessHook = Box<dyn Fn(&Payload) + Send + Sync>;

/// Coordinator for one user-facing action
pub struct Coordinator {
    action: Action,
    client: Arc<dyn GenerateClient>,
    policy: BackoffPolicy,
    state: Mutex<CoordinatorState>,
    in_flight: AtomicBool,
    on_success: Option<SuccessHook>,
}

impl Coordinator {
    /// Create a coordinator in the idle state
    #[must_use]
    pub fn new(action: Action, client: Arc<dyn GenerateClient>, policy: BackoffPolicy) -> Self {
        Self {
            action,
            client,
            policy,
            state: Mutex::new(CoordinatorState::default()),
            in_flight: AtomicBool::new(false),
            on_success: None,
        }
    }

    /// Attach a hook fired (after a short render delay) on success
    #[must_use]
    pub fn with_success_hook(mut self, hook: impl Fn(&Payload) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    /// The action this coordinator drives
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Snapshot of the UI-visible state
    pub fn state(&self) -> CoordinatorState {
        let guard = match self.state.lock() {
            Ok(guard) => guard,
            // A poisoned lock only means a writer panicked; the slots themselves are still valid
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone()
    }

    fn update_state(&self, update: impl FnOnce(&mut CoordinatorState)) {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        update(&mut guard);
    }

    /// Run one invocation to a terminal outcome.
    ///
    /// Returns `false` when another invocation of this coordinator is
    /// already in flight; the call is dropped without touching any state.
    /// Blank required input records the fixed validation message and issues
    /// no network call. Otherwise the runner drives the attempt chain and
    /// the terminal outcome lands in the result or error slot.
    #[instrument(skip(self, input), fields(action = %self.action))]
    pub async fn invoke(&self, input: &str) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("invocation dropped, another is already in flight");
            return false;
        }

        if let Err(err) = self.action.validate(input) {
            debug!(error = %err, "input rejected before dispatch");
            self.update_state(|state| {
                state.busy = false;
                state.result = None;
                state.error = Some(err.to_string());
            });
            self.in_flight.store(false, Ordering::Release);
            return true;
        }

        self.update_state(|state| {
            state.busy = true;
            state.result = None;
            state.error = None;
        });

        let request = self.action.build_request(input);
        match runner::run(self.client.as_ref(), &request, &self.policy).await {
            Ok(payload) => {
                self.update_state(|state| {
                    state.busy = false;
                    state.result = Some(payload.clone());
                    state.error = None;
                });
                self.in_flight.store(false, Ordering::Release);
                if let Some(hook) = &self.on_success {
                    tokio::time::sleep(SUCCESS_HOOK_DELAY).await;
                    hook(&payload);
                }
            }
            Err(err) => {
                warn!(error = %err, "operation failed");
                self.update_state(|state| {
                    state.busy = false;
                    state.result = None;
                    state.error = Some(self.action.failure_message().to_string());
                });
                self.in_flight.store(false, Ordering::Release);
            }
        }
        true
    }
}

/// The three coordinators of the app, sharing one endpoint client.
///
/// Coordinators are independent: any subset may be in flight at once.
pub struct Coordinators {
    /// Claim credibility analysis
    pub analyze: Coordinator,
    /// Text summarization
    pub summarize: Coordinator,
    /// Trivia fact lookup
    pub fact: Coordinator,
}

impl Coordinators {
    /// Build all three coordinators over a shared client and policy
    #[must_use]
    pub fn new(client: Arc<dyn GenerateClient>, policy: BackoffPolicy) -> Self {
        Self {
            analyze: Coordinator::new(Action::Analyze, Arc::clone(&client), policy),
            summarize: Coordinator::new(Action::Summarize, Arc::clone(&client), policy),
            fact: Coordinator::new(Action::Fact, client, policy),
        }
    }

    /// Build from environment configuration with the default backoff policy
    pub fn from_env() -> Result<Self> {
        let client = Arc::new(GeminiClient::from_env()?);
        Ok(Self::new(client, BackoffPolicy::default()))
    }

    /// Attach a post-success hook to the analyze coordinator
    #[must_use]
    pub fn with_analyze_hook(mut self, hook: impl Fn(&Payload) + Send + Sync + 'static) -> Self {
        self.analyze = self.analyze.with_success_hook(hook);
        self
    }
}
