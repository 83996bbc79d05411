//! Curses session management
//!
//! [`Screen`] brings curses up with `initscr`, applies the input options in
//! [`ScreenOptions`], and shuts it down with `endwin` when dropped.

use std::ffi::c_int;

use crate::{
    backend::{Curses, ERR},
    error::{CursesError, CursesResult},
    window::Window,
};

/// Terminal input modes applied at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenOptions {
    /// Deliver keys without waiting for a newline
    pub cbreak: bool,
    /// Echo typed characters
    pub echo: bool,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            cbreak: true,
            echo: false,
        }
    }
}

impl ScreenOptions {
    /// Sets whether keys arrive without waiting for a newline.
    pub fn cbreak(mut self, on: bool) -> Self {
        self.cbreak = on;
        self
    }

    /// Sets whether typed characters are echoed.
    pub fn echo(mut self, on: bool) -> Self {
        self.echo = on;
        self
    }
}

/// An initialized curses session.
///
/// Windows created from it borrow the screen, so they are released before
/// `endwin` runs. A window cannot outlive its session:
///
/// ```compile_fail,E0515
/// fn leak<B: ncwindow::Curses>(screen: ncwindow::Screen<B>) -> ncwindow::Window<'static, B> {
///     screen.new_window(1, 1, 0, 0).unwrap()
/// }
/// ```
pub struct Screen<B: Curses> {
    /// Library the session runs on
    backend: B,
    /// The standard screen, owned by curses itself
    stdscr: B::Handle,
}

impl<B: Curses> Screen<B> {
    /// Initializes curses with default options.
    pub fn init(backend: B) -> CursesResult<Self> {
        Self::with_options(backend, ScreenOptions::default())
    }

    /// Initializes curses and applies `options`.
    pub fn with_options(backend: B, options: ScreenOptions) -> CursesResult<Self> {
        // Check if we're in a real terminal
        if !backend.has_terminal() {
            return Err(CursesError::terminal(
                "terminal check",
                (0, 0),
                "Not a real terminal or terminal capabilities not available",
            )
            .into());
        }

        let stdscr = backend.initscr().ok_or_else(|| {
            CursesError::screen_init("initscr()", (0, 9), "initscr returned NULL")
        })?;
        let screen = Self { backend, stdscr };

        if screen.backend.cbreak(options.cbreak) == ERR {
            return Err(CursesError::screen_init(
                "cbreak()",
                (0, 8),
                "Failed to set cbreak mode",
            )
            .into());
        }
        if screen.backend.echo(options.echo) == ERR {
            return Err(
                CursesError::screen_init("echo()", (0, 6), "Failed to set echo mode").into(),
            );
        }

        log::debug!("curses initialized with {:?}", options);
        Ok(screen)
    }

    /// Allocates a window on this screen.
    pub fn new_window(
        &self,
        nlines: c_int,
        ncols: c_int,
        begin_y: c_int,
        begin_x: c_int,
    ) -> CursesResult<Window<'_, B>> {
        Window::new(self.backend.clone(), nlines, ncols, begin_y, begin_x)
    }

    /// Pushes the virtual screen to the terminal.
    pub fn update(&self) -> c_int {
        self.backend.doupdate()
    }

    /// The standard screen. It belongs to curses, so it must never be
    /// adopted with [`Window::from_handle`].
    pub fn stdscr(&self) -> B::Handle {
        self.stdscr
    }

    /// The library this session runs on.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: Curses> Drop for Screen<B> {
    fn drop(&mut self) {
        if self.backend.endwin() == ERR {
            log::warn!("Failed to restore terminal: endwin reported failure");
        }
    }
}

/// Whether stdout is a tty on a terminal other than `dumb`.
pub fn is_real_terminal() -> bool {
    if !atty::is(atty::Stream::Stdout) {
        return false;
    }

    match std::env::var("TERM") {
        Ok(term) if term == "dumb" => false,
        Ok(_) => true,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::OK,
        testing::{Call, RecordingCurses},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_terminal_not_available() {
        let curses = RecordingCurses::new(24, 80).without_terminal();

        let result = Screen::init(curses.clone());
        assert!(result.is_err(), "Expected screen init to fail without a terminal");

        if let Err(e) = result {
            let err_msg = e.to_string().to_lowercase();
            assert!(
                err_msg.contains("terminal"),
                "Expected terminal-related error, got: {}",
                err_msg
            );
        }
        assert!(curses.calls().is_empty());
    }

    #[test]
    fn test_screen_lifecycle() {
        let curses = RecordingCurses::new(24, 80);

        {
            let screen = Screen::init(curses.clone()).unwrap();
            assert!(curses.is_live(screen.stdscr()));
            assert_eq!(screen.update(), OK);
        }

        assert_eq!(
            curses.calls(),
            vec![
                Call::InitScr,
                Call::Cbreak(true),
                Call::Echo(false),
                Call::DoUpdate,
                Call::EndWin,
            ]
        );
    }

    #[test]
    fn test_screen_options() {
        let curses = RecordingCurses::new(24, 80);
        let options = ScreenOptions::default().cbreak(false).echo(true);

        let screen = Screen::with_options(curses.clone(), options).unwrap();
        drop(screen);

        assert_eq!(curses.calls()[1..3], [Call::Cbreak(false), Call::Echo(true)]);
    }

    #[test]
    fn test_windows_release_before_endwin() {
        let curses = RecordingCurses::new(24, 80);
        let screen = Screen::init(curses.clone()).unwrap();

        let win = screen.new_window(5, 5, 2, 2).unwrap();
        let raw = win.handle();
        assert!(screen.new_window(5, 5, 22, 0).is_err());

        drop(win);
        drop(screen);

        let calls = curses.calls();
        let released = calls.iter().position(|c| *c == Call::Delwin(raw));
        let ended = calls.iter().position(|c| *c == Call::EndWin);
        assert!(released < ended);
        assert_eq!(curses.releases_of(raw), 1);
    }
}
