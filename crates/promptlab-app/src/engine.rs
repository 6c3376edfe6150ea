//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the TEA state, the message channel, the loaded settings
//! and the two side-effect seams: the backend API and the credential store.

use std::sync::Arc;
use std::time::Duration;

use promptlab_api::{CredentialStore, FileCredentialStore, HttpPromptApi, PromptApi};
use promptlab_core::prelude::*;
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::message::Message;
use crate::process;
use crate::state::AppState;

/// Capacity of the unified message channel
pub const CHANNEL_CAPACITY: usize = 256;

/// Orchestration engine for promptlab.
///
/// Generic over the backend so tests can drive the real reducers against a
/// scripted API.
pub struct Engine<A> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Loaded settings (cached from config)
    pub settings: Settings,

    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
}

impl Engine<HttpPromptApi> {
    /// Engine talking to the configured backend, with the key file in the
    /// user data directory.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let api = HttpPromptApi::new(&settings.api.base_url, settings.api.timeout())?;
        info!("Using backend at {}", api.base_url());
        Ok(Self::new(
            settings,
            Arc::new(api),
            Arc::new(FileCredentialStore::in_default_location()),
        ))
    }
}

impl<A> Engine<A>
where
    A: PromptApi + Send + Sync + 'static,
{
    pub fn new(settings: Settings, api: Arc<A>, credentials: Arc<dyn CredentialStore>) -> Self {
        let state = AppState::with_settings(settings.clone());
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);

        Self {
            state,
            msg_tx,
            msg_rx,
            settings,
            api,
            credentials,
        }
    }

    /// Replace the credential store (e.g. a one-off key from the command line)
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.api,
            &self.credentials,
        );
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed. Used by the TUI runner
    /// which needs to drain all pending messages before rendering.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Process channel messages until `done` holds for the state.
    ///
    /// Fails with [`Error::Timeout`] when `done` is still false after
    /// `timeout`.
    pub async fn run_until<F>(&mut self, mut done: F, timeout: Duration) -> Result<()>
    where
        F: FnMut(&AppState) -> bool,
    {
        let wait = async {
            while !done(&self.state) {
                let Some(msg) = self.msg_rx.recv().await else {
                    return Err(Error::ChannelClosed);
                };
                self.process_message(msg);
            }
            Ok(())
        };
        match tokio::time::timeout(timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                secs: timeout.as_secs(),
            }),
        }
    }

    /// Process a message, then wait until no request is outstanding
    pub async fn dispatch_and_settle(&mut self, msg: Message, timeout: Duration) -> Result<()> {
        self.process_message(msg);
        self.run_until(|state| !state.is_busy(), timeout).await
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_api::test_utils::{sample_prompt, Endpoint, FakePromptApi, VersionEcho};
    use promptlab_api::MemoryCredentialStore;
    use promptlab_core::{PromptId, VersionId};

    use crate::state::UiMode;

    const WAIT: Duration = Duration::from_secs(5);

    fn engine(api: FakePromptApi) -> Engine<FakePromptApi> {
        Engine::new(
            Settings::default(),
            Arc::new(api),
            Arc::new(MemoryCredentialStore::with_key("sk-test")),
        )
    }

    #[tokio::test]
    async fn test_open_prompt_loads_aggregate_and_history() {
        let mut engine = engine(FakePromptApi::new().with_prompt(sample_prompt(1, 2)));

        engine
            .dispatch_and_settle(Message::OpenPrompt(PromptId(1)), WAIT)
            .await
            .unwrap();

        assert_eq!(engine.state.ui_mode, UiMode::Detail);
        assert_eq!(engine.state.detail.selected_version_id, Some(VersionId(12)));
        assert_eq!(engine.api().call_count(Endpoint::History), 1);
    }

    #[tokio::test]
    async fn test_run_test_end_to_end() {
        let mut engine = engine(FakePromptApi::new().with_prompt(sample_prompt(1, 1)));
        engine
            .dispatch_and_settle(Message::OpenPrompt(PromptId(1)), WAIT)
            .await
            .unwrap();
        engine.process_message(Message::EditTestInput {
            index: 0,
            value: "ownership".into(),
        });

        engine
            .dispatch_and_settle(Message::RunTest, WAIT)
            .await
            .unwrap();

        let run = engine.state.detail.current_result.as_ref().unwrap();
        assert_eq!(run.results[0].ai_response, "echo: v1: answer ownership");
        assert!(!engine.state.detail.testing);
        assert_eq!(
            engine.api().api_keys_seen(),
            vec![Some("sk-test".to_string())]
        );
        // The run shows up in the refreshed history
        assert_eq!(engine.state.detail.history.len(), 1);
    }

    #[tokio::test]
    async fn test_save_version_with_version_echo() {
        let api = FakePromptApi::new()
            .with_prompt(sample_prompt(1, 1))
            .with_version_echo(VersionEcho::Version);
        let mut engine = engine(api);
        engine
            .dispatch_and_settle(Message::OpenPrompt(PromptId(1)), WAIT)
            .await
            .unwrap();
        engine.process_message(Message::EditDraft("Second {{question}}".into()));

        engine
            .dispatch_and_settle(Message::SaveVersion, WAIT)
            .await
            .unwrap();

        let prompt = engine.state.detail.prompt.as_ref().unwrap();
        assert_eq!(prompt.versions.len(), 2);
        assert!(!engine.state.detail.is_modified());
        assert_eq!(engine.state.detail.draft, "Second {{question}}");
    }

    #[tokio::test]
    async fn test_save_version_with_unrecognized_echo_reloads() {
        let api = FakePromptApi::new()
            .with_prompt(sample_prompt(1, 1))
            .with_version_echo(VersionEcho::Nothing);
        let mut engine = engine(api);
        engine
            .dispatch_and_settle(Message::OpenPrompt(PromptId(1)), WAIT)
            .await
            .unwrap();
        engine.process_message(Message::EditDraft("Second".into()));

        engine
            .dispatch_and_settle(Message::SaveVersion, WAIT)
            .await
            .unwrap();

        assert_eq!(engine.api().call_count(Endpoint::GetPrompt), 2);
        let selected = engine.state.detail.selected_version().unwrap();
        assert_eq!(selected.content, "Second");
    }

    #[tokio::test]
    async fn test_failed_list_load_surfaces_notification() {
        let api = FakePromptApi::new();
        api.fail(Endpoint::ListPrompts);
        let mut engine = engine(api);

        engine
            .dispatch_and_settle(Message::ShowPromptList, WAIT)
            .await
            .unwrap();

        assert!(engine.state.prompt_list.prompts.is_empty());
        assert!(engine.state.notifications.latest_error().is_some());
    }

    #[tokio::test]
    async fn test_run_until_times_out() {
        let mut engine = engine(FakePromptApi::new());
        let result = engine
            .run_until(|_| false, Duration::from_millis(20))
            .await;
        assert!(matches!(result, Err(Error::Timeout { .. })));
    }
}
