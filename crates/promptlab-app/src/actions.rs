//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;

use promptlab_api::{CredentialStore, PromptApi};
use tokio::sync::mpsc;

use crate::handler::UpdateAction;
use crate::message::Message;
use crate::spawn::{self, ComparisonJob};

/// Execute an action by spawning a background task
pub fn handle_action<A>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
) where
    A: PromptApi + Send + Sync + 'static,
{
    match action {
        UpdateAction::FetchPrompts => spawn::spawn_fetch_prompts(msg_tx, api),

        UpdateAction::FetchPrompt {
            prompt_id,
            target,
            generation,
        } => spawn::spawn_fetch_prompt(msg_tx, api, prompt_id, target, generation),

        UpdateAction::CreatePrompt(request) => spawn::spawn_create_prompt(msg_tx, api, request),

        UpdateAction::CreateVersion { prompt_id, content } => {
            spawn::spawn_create_version(msg_tx, api, prompt_id, content)
        }

        UpdateAction::RunTest { sequence, request } => {
            spawn::spawn_run_test(msg_tx, api, credentials, sequence, request)
        }

        UpdateAction::FetchHistory { version_id } => {
            spawn::spawn_fetch_history(msg_tx, api, version_id)
        }

        UpdateAction::RunComparison {
            sequence,
            version_a,
            version_b,
            ai_provider,
            model_name,
            input,
        } => spawn::spawn_comparison(
            msg_tx,
            api,
            credentials,
            ComparisonJob {
                sequence,
                version_a,
                version_b,
                ai_provider,
                model_name,
                input,
            },
        ),

        UpdateAction::RunQuickTest(request) => {
            spawn::spawn_quick_test(msg_tx, api, credentials, request)
        }

        UpdateAction::ExportCsv { path, results } => spawn::spawn_export(msg_tx, path, results),

        UpdateAction::LoadApiKey => spawn::spawn_load_api_key(msg_tx, credentials),

        UpdateAction::SaveApiKey { key } => spawn::spawn_save_api_key(msg_tx, credentials, key),
    }
}
