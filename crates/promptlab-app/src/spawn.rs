//! Background task spawning for backend requests
//!
//! Each function spawns one tokio task, awaits the API and reports the
//! outcome as a `Message` tagged with the identity the request was issued
//! for. A closed channel means the app is shutting down; send errors are
//! ignored.

use std::path::PathBuf;
use std::sync::Arc;

use promptlab_api::{
    read_api_key, CreatePromptRequest, CredentialStore, PromptApi, QuickTestRequest,
    TestRunRequest,
};
use promptlab_core::prelude::*;
use promptlab_core::{write_csv, AiProvider, PromptId, TestInput, TestResult, VersionId};
use tokio::sync::mpsc;

use crate::message::{Message, PromptTarget};

/// Spawn `GET /api/prompts`
pub fn spawn_fetch_prompts<A>(msg_tx: mpsc::Sender<Message>, api: Arc<A>)
where
    A: PromptApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match api.list_prompts().await {
            Ok(prompts) => Message::PromptsLoaded(prompts),
            Err(e) => Message::PromptsLoadFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Spawn `GET /api/prompts/{id}` for the detail screen or the comparator
pub fn spawn_fetch_prompt<A>(
    msg_tx: mpsc::Sender<Message>,
    api: Arc<A>,
    prompt_id: PromptId,
    target: PromptTarget,
    generation: u64,
) where
    A: PromptApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match api.get_prompt(prompt_id).await {
            Ok(prompt) => Message::PromptLoaded {
                target,
                generation,
                prompt,
            },
            Err(e) => Message::PromptLoadFailed {
                target,
                generation,
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub fn spawn_create_prompt<A>(
    msg_tx: mpsc::Sender<Message>,
    api: Arc<A>,
    request: CreatePromptRequest,
) where
    A: PromptApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match api.create_prompt(&request).await {
            Ok(prompt) => Message::PromptCreated(prompt),
            Err(e) => Message::PromptCreateFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub fn spawn_create_version<A>(
    msg_tx: mpsc::Sender<Message>,
    api: Arc<A>,
    prompt_id: PromptId,
    content: String,
) where
    A: PromptApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match api.create_version(prompt_id, &content).await {
            Ok(mutation) => Message::VersionSaved {
                prompt_id,
                mutation,
            },
            Err(e) => Message::VersionSaveFailed {
                prompt_id,
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Read the submission key on the blocking pool
async fn submission_key(credentials: Arc<dyn CredentialStore>) -> Option<String> {
    match tokio::task::spawn_blocking(move || read_api_key(credentials.as_ref())).await {
        Ok(key) => key,
        Err(e) => {
            warn!("API key read task failed: {e}");
            None
        }
    }
}

/// Spawn a test run; the API key is read from the store when the task runs
pub fn spawn_run_test<A>(
    msg_tx: mpsc::Sender<Message>,
    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
    sequence: u64,
    request: TestRunRequest,
) where
    A: PromptApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let version_id = request.prompt_version_id;
        let api_key = submission_key(credentials).await;
        info!(
            "Running test on version {version_id} with {} input(s)",
            request.test_inputs.len()
        );
        let msg = match api.run_test(&request, api_key.as_deref()).await {
            Ok(run) => Message::TestRunCompleted {
                sequence,
                version_id,
                run,
            },
            Err(e) => Message::TestRunFailed {
                sequence,
                version_id,
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub fn spawn_fetch_history<A>(msg_tx: mpsc::Sender<Message>, api: Arc<A>, version_id: VersionId)
where
    A: PromptApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match api.test_run_history(version_id).await {
            Ok(runs) => Message::HistoryLoaded { version_id, runs },
            Err(e) => Message::HistoryLoadFailed {
                version_id,
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Everything one comparison run needs
#[derive(Debug, Clone)]
pub struct ComparisonJob {
    pub sequence: u64,
    pub version_a: VersionId,
    pub version_b: VersionId,
    pub ai_provider: AiProvider,
    pub model_name: String,
    pub input: TestInput,
}

impl ComparisonJob {
    fn request(&self, version_id: VersionId) -> TestRunRequest {
        TestRunRequest {
            prompt_version_id: version_id,
            ai_provider: self.ai_provider,
            model_name: self.model_name.clone(),
            test_inputs: vec![self.input.clone()],
        }
    }
}

/// Run both sides concurrently; the first failure fails the whole comparison
pub fn spawn_comparison<A>(
    msg_tx: mpsc::Sender<Message>,
    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
    job: ComparisonJob,
) where
    A: PromptApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let api_key = submission_key(credentials).await;
        let request_a = job.request(job.version_a);
        let request_b = job.request(job.version_b);
        let sequence = job.sequence;

        let outcome = tokio::try_join!(
            api.run_test(&request_a, api_key.as_deref()),
            api.run_test(&request_b, api_key.as_deref()),
        );
        let msg = match outcome {
            Ok((a, b)) => Message::ComparisonCompleted { sequence, a, b },
            Err(e) => Message::ComparisonFailed {
                sequence,
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub fn spawn_quick_test<A>(
    msg_tx: mpsc::Sender<Message>,
    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
    request: QuickTestRequest,
) where
    A: PromptApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let api_key = submission_key(credentials).await;
        let msg = match api.quick_test(&request, api_key.as_deref()).await {
            Ok(run) => Message::QuickTestCompleted(run),
            Err(e) => Message::QuickTestFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Write a result set as CSV on the blocking pool
pub fn spawn_export(msg_tx: mpsc::Sender<Message>, path: PathBuf, results: Vec<TestResult>) {
    tokio::spawn(async move {
        let target = path.clone();
        let outcome = tokio::task::spawn_blocking(move || write_csv(&target, &results)).await;
        let msg = match outcome {
            Ok(Ok(())) => Message::ExportCompleted(path),
            Ok(Err(e)) => Message::ExportFailed(e.to_string()),
            Err(e) => Message::ExportFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub fn spawn_load_api_key(msg_tx: mpsc::Sender<Message>, credentials: Arc<dyn CredentialStore>) {
    tokio::spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || credentials.load()).await;
        let msg = match outcome {
            Ok(Ok(key)) => Message::ApiKeyLoaded(key.filter(|k| !k.trim().is_empty())),
            Ok(Err(e)) => Message::ApiKeyLoadFailed(e.to_string()),
            Err(e) => Message::ApiKeyLoadFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Store a key, or remove it when blank
pub fn spawn_save_api_key(
    msg_tx: mpsc::Sender<Message>,
    credentials: Arc<dyn CredentialStore>,
    key: String,
) {
    tokio::spawn(async move {
        let stored = !key.trim().is_empty();
        let outcome = tokio::task::spawn_blocking(move || {
            if stored {
                credentials.save(&key)
            } else {
                credentials.clear()
            }
        })
        .await;
        let msg = match outcome {
            Ok(Ok(())) => Message::ApiKeySaved { stored },
            Ok(Err(e)) => Message::ApiKeySaveFailed(e.to_string()),
            Err(e) => Message::ApiKeySaveFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}
