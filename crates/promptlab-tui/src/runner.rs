//! Main TUI runner - entry point and event loop

use promptlab_api::PromptApi;
use promptlab_app::{signals, Engine, Message};
use promptlab_core::prelude::*;
use ratatui::DefaultTerminal;

use crate::{event, render, terminal};

/// Run the TUI until the user quits or a termination signal arrives
pub async fn run<A>(mut engine: Engine<A>) -> Result<()>
where
    A: PromptApi + Send + Sync + 'static,
{
    let mut term = terminal::enter();

    signals::spawn_signal_handler(engine.msg_sender());

    // Start screen; kicks off the first list fetch
    engine.process_message(Message::ShowPromptList);

    let result = run_loop(&mut term, &mut engine);

    terminal::leave();
    if let Err(ref e) = result {
        error!("TUI loop failed: {e}");
    }
    result
}

/// Main event loop: apply finished background work, draw, then read input
fn run_loop<A>(term: &mut DefaultTerminal, engine: &mut Engine<A>) -> Result<()>
where
    A: PromptApi + Send + Sync + 'static,
{
    while !engine.should_quit() {
        engine.drain_pending_messages();
        if engine.should_quit() {
            break;
        }

        term.draw(|frame| render::view(frame, &engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }

    info!("Leaving TUI");
    Ok(())
}
