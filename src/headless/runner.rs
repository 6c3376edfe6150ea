//! Headless command runner
//!
//! Every command is a short script of [`Message`]s fed through the engine.
//! After each step the runner waits for outstanding requests to settle and
//! turns an error toast into a command failure.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::Duration;

use promptlab_api::PromptApi;
use promptlab_app::config;
use promptlab_app::screens::CompareSlot;
use promptlab_app::{Engine, Message};
use promptlab_core::prelude::*;
use promptlab_core::{AiProvider, Field, Prompt, PromptId, TestRunId, VersionId};

use super::HeadlessEvent;
use crate::cli::Command;

/// Run one headless command and print its events
pub async fn run_command<A>(engine: &mut Engine<A>, command: Command, json: bool) -> Result<()>
where
    A: PromptApi + Send + Sync + 'static,
{
    info!("Running headless command {:?}", command);
    for event in execute(engine, command).await? {
        event.emit(json);
    }
    Ok(())
}

/// Write the default config file; needs no engine
pub fn init_config(path: &Path, json: bool) -> Result<()> {
    let created = config::init_config_file(path)?;
    HeadlessEvent::config_initialized(path.to_path_buf(), created).emit(json);
    Ok(())
}

/// Execute a command and collect the events it produced
pub async fn execute<A>(engine: &mut Engine<A>, command: Command) -> Result<Vec<HeadlessEvent>>
where
    A: PromptApi + Send + Sync + 'static,
{
    let event = match command {
        Command::List => {
            step(engine, Message::ShowPromptList).await?;
            HeadlessEvent::prompt_list(engine.state.prompt_list.prompts.clone())
        }
        Command::Show { id } => {
            let prompt = open_prompt(engine, PromptId(id)).await?;
            HeadlessEvent::prompt_detail(prompt, engine.state.detail.history.clone())
        }
        Command::Create {
            name,
            description,
            content,
        } => create_prompt(engine, name, description, content).await?,
        Command::AddVersion { id, content } => add_version(engine, PromptId(id), content).await?,
        Command::Test {
            prompt_id,
            version,
            inputs,
            provider,
            model,
            csv,
        } => {
            return run_test(engine, PromptId(prompt_id), version, inputs, provider, model, csv)
                .await;
        }
        Command::QuickTest {
            content,
            inputs,
            provider,
            model,
        } => quick_test(engine, content, inputs, provider, model).await?,
        Command::Compare {
            prompt_id,
            a,
            b,
            input,
        } => compare(engine, PromptId(prompt_id), a, b, input).await?,
        Command::History { prompt_id, version } => {
            let prompt = open_prompt(engine, PromptId(prompt_id)).await?;
            let version_id = select_version(engine, &prompt, version).await?;
            HeadlessEvent::history(version_id, engine.state.detail.history.clone())
        }
        Command::Run { id } => {
            let run = engine
                .api()
                .get_test_run(TestRunId(id))
                .await
                .with_context(|| format!("Failed to fetch test run {id}"))?;
            HeadlessEvent::test_run(run.prompt_version_id, run)
        }
        Command::SetKey { key } => {
            let key = match key {
                Some(key) => key,
                None => read_key_from_stdin()?,
            };
            step(engine, Message::OpenSettings).await?;
            engine.process_message(Message::EditApiKey(key));
            step(engine, Message::SaveApiKey).await?;
            HeadlessEvent::api_key(engine.state.settings_screen.has_stored_key)
        }
        Command::ClearKey => {
            step(engine, Message::OpenSettings).await?;
            step(engine, Message::ClearApiKey).await?;
            HeadlessEvent::api_key(engine.state.settings_screen.has_stored_key)
        }
        Command::InitConfig => {
            return Err(Error::command("init-config does not need a backend"));
        }
    };
    Ok(vec![event])
}

// ─────────────────────────────────────────────────────────────────────────────
// Steps
// ─────────────────────────────────────────────────────────────────────────────

/// Longest wait for one step; a step can chain up to three requests
fn settle_timeout<A>(engine: &Engine<A>) -> Duration {
    engine.settings.api.timeout() * 3
}

/// Dispatch a message, wait for it to settle and fail on an error toast
async fn step<A>(engine: &mut Engine<A>, msg: Message) -> Result<()>
where
    A: PromptApi + Send + Sync + 'static,
{
    engine.state.notifications.clear();
    let timeout = settle_timeout(engine);
    engine.dispatch_and_settle(msg, timeout).await?;
    take_error(engine)
}

fn take_error<A>(engine: &mut Engine<A>) -> Result<()> {
    let failure = engine
        .state
        .notifications
        .latest_error()
        .map(|n| n.message.clone());
    engine.state.notifications.clear();
    match failure {
        Some(message) => Err(Error::command(message)),
        None => Ok(()),
    }
}

async fn open_prompt<A>(engine: &mut Engine<A>, id: PromptId) -> Result<Prompt>
where
    A: PromptApi + Send + Sync + 'static,
{
    step(engine, Message::OpenPrompt(id)).await?;
    engine
        .state
        .detail
        .prompt
        .clone()
        .ok_or_else(|| Error::command(format!("Prompt {id} could not be loaded")))
}

/// Select version `number` (or keep the latest) in the detail screen
async fn select_version<A>(
    engine: &mut Engine<A>,
    prompt: &Prompt,
    number: Option<u32>,
) -> Result<VersionId>
where
    A: PromptApi + Send + Sync + 'static,
{
    if let Some(number) = number {
        let id = version_id(prompt, number)?;
        step(engine, Message::SelectVersion(id)).await?;
    }
    engine
        .state
        .detail
        .selected_version_id
        .ok_or_else(|| Error::command(format!("Prompt {} has no versions", prompt.id)))
}

fn version_id(prompt: &Prompt, number: u32) -> Result<VersionId> {
    prompt
        .versions
        .iter()
        .find(|v| v.version_number == number)
        .map(|v| v.id)
        .ok_or_else(|| Error::command(format!("Prompt {} has no version {number}", prompt.id)))
}

/// Replace the form's inputs: the first edits the existing row, the rest append
fn input_messages(
    inputs: Vec<String>,
    add: Message,
    edit: fn(usize, String) -> Message,
) -> Vec<Message> {
    let mut messages = Vec::new();
    for (index, value) in inputs.into_iter().enumerate() {
        if index > 0 {
            messages.push(add.clone());
        }
        messages.push(edit(index, value));
    }
    messages
}

fn read_key_from_stdin() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

async fn create_prompt<A>(
    engine: &mut Engine<A>,
    name: String,
    description: String,
    content: String,
) -> Result<HeadlessEvent>
where
    A: PromptApi + Send + Sync + 'static,
{
    engine.process_message(Message::OpenCreatePrompt);
    for (field, value) in [
        (Field::Name, name),
        (Field::Description, description),
        (Field::InitialContent, content),
    ] {
        engine.process_message(Message::EditCreateField { field, value });
    }
    step(engine, Message::SubmitCreatePrompt).await?;

    if !engine.state.create.errors.is_empty() {
        return Err(Error::Validation(engine.state.create.errors.clone()));
    }
    let prompt = engine
        .state
        .detail
        .prompt
        .clone()
        .ok_or_else(|| Error::command("Prompt was created but could not be opened"))?;
    Ok(HeadlessEvent::prompt_created(prompt))
}

async fn add_version<A>(
    engine: &mut Engine<A>,
    prompt_id: PromptId,
    content: String,
) -> Result<HeadlessEvent>
where
    A: PromptApi + Send + Sync + 'static,
{
    let before = open_prompt(engine, prompt_id).await?.versions.len();
    engine.process_message(Message::EditDraft(content));
    step(engine, Message::SaveVersion).await?;

    let detail = &engine.state.detail;
    let prompt = detail
        .prompt
        .as_ref()
        .ok_or_else(|| Error::command(format!("Prompt {prompt_id} could not be loaded")))?;
    if prompt.versions.len() == before {
        return Err(Error::command(
            "No changes to save: content matches the latest version",
        ));
    }
    let version = detail
        .selected_version()
        .or_else(|| prompt.latest_version())
        .cloned()
        .ok_or_else(|| Error::command("Saved version is missing from the prompt"))?;
    Ok(HeadlessEvent::version_saved(prompt_id, version))
}

async fn run_test<A>(
    engine: &mut Engine<A>,
    prompt_id: PromptId,
    version: Option<u32>,
    inputs: Vec<String>,
    provider: Option<AiProvider>,
    model: Option<String>,
    csv: Option<PathBuf>,
) -> Result<Vec<HeadlessEvent>>
where
    A: PromptApi + Send + Sync + 'static,
{
    let prompt = open_prompt(engine, prompt_id).await?;
    let version_id = select_version(engine, &prompt, version).await?;

    for msg in input_messages(inputs, Message::AddTestInput, |index, value| {
        Message::EditTestInput { index, value }
    }) {
        engine.process_message(msg);
    }
    if let Some(provider) = provider {
        engine.process_message(Message::SetProvider(provider));
    }
    if let Some(model) = model {
        engine.process_message(Message::SetModel(model));
    }
    step(engine, Message::RunTest).await?;

    let run = engine
        .state
        .detail
        .current_result
        .clone()
        .ok_or_else(|| Error::command("Test run finished without results"))?;
    let mut events = vec![HeadlessEvent::test_run(Some(version_id), run)];

    if let Some(path) = csv {
        engine.state.notifications.clear();
        engine.process_message(Message::ExportResults(Some(path.clone())));
        let timeout = settle_timeout(engine);
        engine
            .run_until(|state| !state.notifications.is_empty(), timeout)
            .await?;
        take_error(engine)?;
        events.push(HeadlessEvent::exported(path));
    }
    Ok(events)
}

async fn quick_test<A>(
    engine: &mut Engine<A>,
    content: String,
    inputs: Vec<String>,
    provider: Option<AiProvider>,
    model: Option<String>,
) -> Result<HeadlessEvent>
where
    A: PromptApi + Send + Sync + 'static,
{
    engine.process_message(Message::OpenQuickTest);
    engine.process_message(Message::EditQuickContent(content));
    for msg in input_messages(inputs, Message::AddQuickInput, |index, value| {
        Message::EditQuickInput { index, value }
    }) {
        engine.process_message(msg);
    }
    if let Some(provider) = provider {
        engine.process_message(Message::SetQuickProvider(provider));
    }
    if let Some(model) = model {
        engine.process_message(Message::SetQuickModel(model));
    }
    step(engine, Message::RunQuickTest).await?;

    let run = engine
        .state
        .quick_test
        .result
        .clone()
        .ok_or_else(|| Error::command("Quick test finished without results"))?;
    Ok(HeadlessEvent::test_run(None, run))
}

async fn compare<A>(
    engine: &mut Engine<A>,
    prompt_id: PromptId,
    a: Option<u32>,
    b: Option<u32>,
    input: Option<String>,
) -> Result<HeadlessEvent>
where
    A: PromptApi + Send + Sync + 'static,
{
    step(engine, Message::OpenCompare(prompt_id)).await?;
    let prompt = engine
        .state
        .compare
        .prompt
        .clone()
        .ok_or_else(|| Error::command(format!("Prompt {prompt_id} could not be loaded")))?;

    for (slot, number) in [(CompareSlot::A, a), (CompareSlot::B, b)] {
        if let Some(number) = number {
            let version_id = version_id(&prompt, number)?;
            engine.process_message(Message::SetCompareSlot { slot, version_id });
        }
    }
    if let Some(input) = input {
        engine.process_message(Message::EditCompareInput(input));
    }
    step(engine, Message::RunComparison).await?;

    let compare = &engine.state.compare;
    let (Some(result_a), Some(result_b)) = (compare.result_a.clone(), compare.result_b.clone())
    else {
        return Err(Error::command("Comparison finished without results"));
    };
    Ok(HeadlessEvent::comparison(
        compare.version_label(CompareSlot::A),
        compare.version_label(CompareSlot::B),
        result_a,
        result_b,
    ))
}
