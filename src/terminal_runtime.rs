use std::io;
use std::panic;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen,
    disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Raw mode plus alternate screen for as long as the game is on screen.
///
/// Dropping the session restores the terminal; [`TerminalSession::restore`]
/// does the same but reports failures.
pub struct TerminalSession {
    terminal: AppTerminal,
    restored: bool,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, DisableLineWrap, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(error) => {
                let _ = leave_terminal();
                return Err(error);
            }
        };
        terminal.clear()?;
        log::debug!("terminal entered, size {:?}", terminal.size()?);

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }

    /// Leaves the alternate screen and raw mode.
    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        leave_terminal()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(error) = leave_terminal() {
            log::warn!("terminal restore failed: {error}");
        }
    }
}

/// Restores the terminal before the default panic message is printed.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = leave_terminal();
        log::error!("panic: {panic_info}");
        default_hook(panic_info);
    }));
}

fn leave_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    execute!(io::stdout(), Show, EnableLineWrap, LeaveAlternateScreen)?;
    raw
}
