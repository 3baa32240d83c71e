// src/term.rs

//! Terminal helpers.

use std::io::{self, IsTerminal};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

/// Clear the screen and home the cursor. No-op when stdout is not a terminal.
pub fn clear_screen() -> io::Result<()> {
    let mut stdout = io::stdout();
    if !stdout.is_terminal() {
        return Ok(());
    }
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))
}
