//! Scripted in-memory backend for tests
//!
//! Available to other crates through the `test-helpers` feature.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use promptlab_core::prelude::*;
use promptlab_core::types::QUESTION_VARIABLE;
use promptlab_core::{
    render_template, MetricsSummary, Prompt, PromptId, TestInput, TestResult, TestRun, TestRunId,
    Version, VersionId,
};

use crate::client::PromptApi;
use crate::requests::{CreatePromptRequest, QuickTestRequest, TestRunRequest, VersionMutation};

/// Backend operation, used to switch failures on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListPrompts,
    GetPrompt,
    CreatePrompt,
    CreateVersion,
    RunTest,
    QuickTest,
    History,
    GetTestRun,
}

/// What `create_version` answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionEcho {
    #[default]
    Aggregate,
    Version,
    Nothing,
}

/// A recorded call, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListPrompts,
    GetPrompt(PromptId),
    CreatePrompt(CreatePromptRequest),
    CreateVersion(PromptId, String),
    RunTest {
        request: TestRunRequest,
        api_key: Option<String>,
    },
    QuickTest {
        request: QuickTestRequest,
        api_key: Option<String>,
    },
    History(VersionId),
    GetTestRun(TestRunId),
}

impl ApiCall {
    fn api_key(&self) -> Option<Option<&str>> {
        match self {
            ApiCall::RunTest { api_key, .. } | ApiCall::QuickTest { api_key, .. } => {
                Some(api_key.as_deref())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    prompts: Vec<Prompt>,
    runs: Vec<TestRun>,
    calls: Vec<ApiCall>,
    failing: HashSet<Endpoint>,
    failing_versions: HashSet<VersionId>,
    echo: VersionEcho,
    next_id: u64,
}

impl FakeState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, endpoint: Endpoint) -> Result<()> {
        if self.failing.contains(&endpoint) {
            return Err(Error::http(500, format!("simulated {:?} failure", endpoint)));
        }
        Ok(())
    }

    fn find_version(&self, id: VersionId) -> Option<&Version> {
        self.prompts.iter().find_map(|p| p.version(id))
    }
}

/// In-memory [`PromptApi`] with per-endpoint failure switches and a call log
#[derive(Debug, Default)]
pub struct FakePromptApi {
    state: Mutex<FakeState>,
}

impl FakePromptApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 1000,
                ..Default::default()
            }),
        }
    }

    pub fn with_prompt(self, prompt: Prompt) -> Self {
        self.lock().prompts.push(prompt);
        self
    }

    pub fn with_run(self, run: TestRun) -> Self {
        self.lock().runs.push(run);
        self
    }

    pub fn with_version_echo(self, echo: VersionEcho) -> Self {
        self.lock().echo = echo;
        self
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.lock().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.lock().failing.remove(&endpoint);
    }

    /// Make test runs against one version fail
    pub fn fail_version(&self, id: VersionId) {
        self.lock().failing_versions.insert(id);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls to one endpoint
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| endpoint_of(c) == endpoint)
            .count()
    }

    /// API keys attached to test submissions, in order
    pub fn api_keys_seen(&self) -> Vec<Option<String>> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| c.api_key().map(|k| k.map(str::to_string)))
            .collect()
    }

    pub fn prompt(&self, id: PromptId) -> Option<Prompt> {
        self.lock().prompts.iter().find(|p| p.id == id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn endpoint_of(call: &ApiCall) -> Endpoint {
    match call {
        ApiCall::ListPrompts => Endpoint::ListPrompts,
        ApiCall::GetPrompt(_) => Endpoint::GetPrompt,
        ApiCall::CreatePrompt(_) => Endpoint::CreatePrompt,
        ApiCall::CreateVersion(..) => Endpoint::CreateVersion,
        ApiCall::RunTest { .. } => Endpoint::RunTest,
        ApiCall::QuickTest { .. } => Endpoint::QuickTest,
        ApiCall::History(_) => Endpoint::History,
        ApiCall::GetTestRun(_) => Endpoint::GetTestRun,
    }
}

/// Deterministic results: the rendered prompt echoed back per input
fn fake_results(template: &str, inputs: &[TestInput]) -> Vec<TestResult> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let mut vars = BTreeMap::new();
            vars.insert(QUESTION_VARIABLE.to_string(), input.question.clone());
            let rendered = render_template(template, &vars);
            let tokens = rendered.split_whitespace().count() as u64 + 5;
            TestResult {
                id: Some(i as u64 + 1),
                input_variables: vars,
                ai_response: format!("echo: {}", rendered),
                response_time_ms: 100 + 10 * i as u64,
                token_count: tokens,
                cost_usd: tokens as f64 * 0.0001,
                quality_score: 0.8,
            }
        })
        .collect()
}

/// Prompt fixture with `versions` versions; ids are `id * 10 + n`
pub fn sample_prompt(id: u64, versions: u32) -> Prompt {
    Prompt {
        id: PromptId(id),
        name: format!("Prompt {id}"),
        description: Some(format!("Fixture prompt {id}")),
        created_at: None,
        updated_at: None,
        versions: (1..=versions)
            .map(|n| Version {
                id: VersionId(id * 10 + n as u64),
                prompt_id: Some(PromptId(id)),
                version_number: n,
                content: format!("v{n}: answer {{{{question}}}}"),
                created_at: None,
            })
            .collect(),
    }
}

impl PromptApi for FakePromptApi {
    async fn list_prompts(&self) -> Result<Vec<Prompt>> {
        let mut state = self.lock();
        state.calls.push(ApiCall::ListPrompts);
        state.check(Endpoint::ListPrompts)?;
        Ok(state.prompts.clone())
    }

    async fn get_prompt(&self, id: PromptId) -> Result<Prompt> {
        let mut state = self.lock();
        state.calls.push(ApiCall::GetPrompt(id));
        state.check(Endpoint::GetPrompt)?;
        state
            .prompts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Error::http(404, format!("Prompt {id} not found")))
    }

    async fn create_prompt(&self, request: &CreatePromptRequest) -> Result<Prompt> {
        let mut state = self.lock();
        state.calls.push(ApiCall::CreatePrompt(request.clone()));
        state.check(Endpoint::CreatePrompt)?;

        let prompt_id = PromptId(state.allocate_id());
        let version_id = VersionId(state.allocate_id());
        let prompt = Prompt {
            id: prompt_id,
            name: request.name.clone(),
            description: Some(request.description.clone()),
            created_at: None,
            updated_at: None,
            versions: vec![Version {
                id: version_id,
                prompt_id: Some(prompt_id),
                version_number: 1,
                content: request.initial_content.clone(),
                created_at: None,
            }],
        };
        state.prompts.push(prompt.clone());
        Ok(prompt)
    }

    async fn create_version(&self, id: PromptId, content: &str) -> Result<VersionMutation> {
        let mut state = self.lock();
        state
            .calls
            .push(ApiCall::CreateVersion(id, content.to_string()));
        state.check(Endpoint::CreateVersion)?;

        let version_id = VersionId(state.allocate_id());
        let echo = state.echo;
        let prompt = state
            .prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::http(404, format!("Prompt {id} not found")))?;

        let version = Version {
            id: version_id,
            prompt_id: Some(id),
            version_number: prompt.versions.len() as u32 + 1,
            content: content.to_string(),
            created_at: None,
        };
        prompt.push_version(version.clone());

        Ok(match echo {
            VersionEcho::Aggregate => VersionMutation::Aggregate(prompt.clone()),
            VersionEcho::Version => VersionMutation::Version(version),
            VersionEcho::Nothing => VersionMutation::Unrecognized,
        })
    }

    async fn run_test(&self, request: &TestRunRequest, api_key: Option<&str>) -> Result<TestRun> {
        let mut state = self.lock();
        state.calls.push(ApiCall::RunTest {
            request: request.clone(),
            api_key: api_key.map(str::to_string),
        });
        state.check(Endpoint::RunTest)?;
        if state.failing_versions.contains(&request.prompt_version_id) {
            return Err(Error::http(502, "provider rejected the request"));
        }

        let content = state
            .find_version(request.prompt_version_id)
            .map(|v| v.content.clone())
            .ok_or_else(|| {
                Error::http(404, format!("Version {} not found", request.prompt_version_id))
            })?;

        let results = fake_results(&content, &request.test_inputs);
        let run = TestRun {
            id: Some(TestRunId(state.allocate_id())),
            prompt_version_id: Some(request.prompt_version_id),
            prompt_content: None,
            ai_provider: request.ai_provider.as_str().to_string(),
            model_name: request.model_name.clone(),
            started_at: None,
            completed_at: None,
            status: Some("COMPLETED".to_string()),
            metrics: Some(MetricsSummary::summarize(&results)),
            results,
        };
        state.runs.push(run.clone());
        Ok(run)
    }

    async fn quick_test(
        &self,
        request: &QuickTestRequest,
        api_key: Option<&str>,
    ) -> Result<TestRun> {
        let mut state = self.lock();
        state.calls.push(ApiCall::QuickTest {
            request: request.clone(),
            api_key: api_key.map(str::to_string),
        });
        state.check(Endpoint::QuickTest)?;

        let results = fake_results(&request.prompt_content, &request.test_inputs);
        Ok(TestRun {
            prompt_content: Some(request.prompt_content.clone()),
            ai_provider: request.ai_provider.as_str().to_string(),
            model_name: request.model_name.clone(),
            status: Some("COMPLETED".to_string()),
            metrics: Some(MetricsSummary::summarize(&results)),
            results,
            ..Default::default()
        })
    }

    async fn test_run_history(&self, version_id: VersionId) -> Result<Vec<TestRun>> {
        let mut state = self.lock();
        state.calls.push(ApiCall::History(version_id));
        state.check(Endpoint::History)?;
        Ok(state
            .runs
            .iter()
            .rev()
            .filter(|r| r.prompt_version_id == Some(version_id))
            .cloned()
            .collect())
    }

    async fn get_test_run(&self, id: TestRunId) -> Result<TestRun> {
        let mut state = self.lock();
        state.calls.push(ApiCall::GetTestRun(id));
        state.check(Endpoint::GetTestRun)?;
        state
            .runs
            .iter()
            .find(|r| r.id == Some(id))
            .cloned()
            .ok_or_else(|| Error::http(404, format!("Test run {id} not found")))
    }
}
