//! Terminal setup and restoration

use adx_core::prelude::*;
use ratatui::DefaultTerminal;

/// Install a panic hook that restores the terminal
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::try_restore();
        original_hook(panic_info);
    }));
}

/// Enter the alternate screen in raw mode
pub fn init() -> Result<DefaultTerminal> {
    ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))
}

/// Leave raw mode; failures are logged since the process is exiting anyway
pub fn restore() {
    if let Err(e) = ratatui::try_restore() {
        warn!("{}", Error::TerminalRestore(e.to_string()));
    }
}

/// Hand the terminal to a foreground child (the editor) and take it back
///
/// The returned terminal replaces the old one; its first draw repaints
/// the whole screen.
pub fn suspend_for<T>(terminal: DefaultTerminal, f: impl FnOnce() -> T) -> Result<(DefaultTerminal, T)> {
    drop(terminal);
    ratatui::try_restore().map_err(|e| Error::TerminalRestore(e.to_string()))?;

    let value = f();

    let mut terminal = init()?;
    terminal.clear()?;
    Ok((terminal, value))
}
