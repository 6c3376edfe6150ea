//! Terminal setup and restoration

use ratatui::DefaultTerminal;

/// Enter raw mode and the alternate screen.
///
/// The panic hook is installed first so a panic while drawing never leaves
/// the user's shell in raw mode.
pub fn enter() -> DefaultTerminal {
    install_panic_hook();
    ratatui::init()
}

/// Leave the alternate screen and restore the cooked terminal
pub fn leave() {
    ratatui::restore();
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}
