//! ConsoleView: the interactive terminal viewer of a contest.
//!
//! Renders through [`ContestScreen`], flushes with [`TerminalRenderer`] and
//! paces frames. `q`, `Esc` or `Ctrl-C` ask the contest to stop.
//!
//! While the view owns the screen the panic hook only records the message.
//! Routine panics surface as faults; a panic that escapes the contest is
//! printed once the terminal is restored.

use std::panic;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use tetcon_engine::{ContestView, Entry, ViewConfig};

use crate::contest_view::ContestScreen;
use crate::renderer::TerminalRenderer;

/// Target time between two drawn frames.
pub const FRAME_MS: u64 = 16;

pub struct ConsoleView {
    screen: ContestScreen,
    renderer: TerminalRenderer,
    frame: Duration,
    last_frame: Instant,
    quit: bool,
    last_panic: Arc<Mutex<Option<String>>>,
}

impl ConsoleView {
    /// Take over the terminal. It is restored when the view is dropped.
    pub fn enter(view: &ViewConfig) -> Result<Self> {
        let mut renderer = TerminalRenderer::new();
        renderer.enter()?;
        Ok(Self {
            screen: ContestScreen::from_config(view),
            renderer,
            frame: Duration::from_millis(FRAME_MS),
            last_frame: Instant::now(),
            quit: false,
            last_panic: silence_panics(),
        })
    }

    /// Wait out the rest of the frame, handling keys meanwhile.
    fn pace(&mut self) -> Result<()> {
        loop {
            let timeout = self
                .frame
                .checked_sub(self.last_frame.elapsed())
                .unwrap_or(Duration::ZERO);
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press && should_quit(key) => {
                    self.quit = true;
                    break;
                }
                Event::Resize(..) => self.renderer.invalidate(),
                _ => {}
            }
        }
        self.last_frame = Instant::now();
        Ok(())
    }
}

impl ContestView for ConsoleView {
    fn round_started(&mut self, _round: u32) {
        self.screen.start_round_effect();
    }

    fn is_animating(&self) -> bool {
        self.screen.is_animating()
    }

    fn draw(&mut self, round: u32, entries: &[Entry<'_>]) -> Result<()> {
        self.screen.render(round, entries);
        self.renderer.draw_swap(self.screen.framebuffer_mut())?;
        self.pace()
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

impl Drop for ConsoleView {
    fn drop(&mut self) {
        let _ = self.renderer.exit();
        // The hook can't be swapped while unwinding.
        if !std::thread::panicking() {
            let _ = panic::take_hook();
        } else if let Ok(mut last) = self.last_panic.lock() {
            if let Some(message) = last.take() {
                eprintln!("[Contest] {message}");
            }
        }
    }
}

/// Replace the panic hook with one that only remembers the latest message.
fn silence_panics() -> Arc<Mutex<Option<String>>> {
    let last = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&last);
    panic::set_hook(Box::new(move |info| {
        if let Ok(mut slot) = slot.lock() {
            *slot = Some(info.to_string());
        }
    }));
    last
}

pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Left)));
    }

    #[test]
    fn test_silenced_hook_keeps_last_message() {
        let last = silence_panics();
        let caught = panic::catch_unwind(|| panic!("routine exploded"));
        let _ = panic::take_hook();
        assert!(caught.is_err());
        let message = last.lock().unwrap().clone().unwrap_or_default();
        assert!(message.contains("routine exploded"), "{message}");
    }
}
