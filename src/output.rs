//! Output forwarding: characters, strings, cell runs, insertion and deletion.

use std::{ffi::c_int, fmt};

use crate::{
    backend::{chtype, Curses},
    window::{native, native_at, Window},
};

/// Formats into a window like `wprintw`.
///
/// ```rust,ignore
/// printw!(win, "{} of {}", done, total);
/// ```
#[macro_export]
macro_rules! printw {
    ($win:expr, $($arg:tt)*) => {
        $win.printw(::std::format_args!($($arg)*))
    };
}

/// Moves, then formats into a window like `mvwprintw`.
#[macro_export]
macro_rules! mvprintw {
    ($win:expr, $y:expr, $x:expr, $($arg:tt)*) => {
        $win.mvprintw($y, $x, ::std::format_args!($($arg)*))
    };
}

impl<B: Curses> Window<'_, B> {
    /// Adds `ch` at the cursor and advances it.
    pub fn addch(&mut self, ch: chtype) -> c_int {
        native!(self, waddch(ch))
    }

    /// Adds `ch` at (`y`, `x`).
    pub fn mvaddch(&mut self, y: c_int, x: c_int, ch: chtype) -> c_int {
        native_at!(self, y, x, waddch(ch))
    }

    /// Adds `ch` and refreshes the window immediately.
    pub fn echochar(&mut self, ch: chtype) -> c_int {
        native!(self, wechochar(ch))
    }

    /// Writes formatted text. Output stops at an embedded NUL.
    pub fn printw(&mut self, args: fmt::Arguments<'_>) -> c_int {
        let text = fmt::format(args);
        native!(self, wprintw(&text))
    }

    /// Writes formatted text at (`y`, `x`).
    pub fn mvprintw(&mut self, y: c_int, x: c_int, args: fmt::Arguments<'_>) -> c_int {
        let text = fmt::format(args);
        native_at!(self, y, x, wprintw(&text))
    }

    /// Writes `text` at the cursor, wrapping at the right edge.
    pub fn addstr(&mut self, text: &str) -> c_int {
        native!(self, waddnstr(text.as_bytes()))
    }

    /// Writes at most `n` bytes of `text`.
    pub fn addnstr(&mut self, text: &str, n: usize) -> c_int {
        native!(self, waddnstr(prefix(text.as_bytes(), n)))
    }

    /// Writes `text` at (`y`, `x`).
    pub fn mvaddstr(&mut self, y: c_int, x: c_int, text: &str) -> c_int {
        native_at!(self, y, x, waddnstr(text.as_bytes()))
    }

    /// Writes at most `n` bytes of `text` at (`y`, `x`).
    pub fn mvaddnstr(&mut self, y: c_int, x: c_int, text: &str, n: usize) -> c_int {
        native_at!(self, y, x, waddnstr(prefix(text.as_bytes(), n)))
    }

    /// Copies cells without moving the cursor or wrapping.
    pub fn addchstr(&mut self, cells: &[chtype]) -> c_int {
        native!(self, waddchnstr(cells))
    }

    /// Copies at most `n` cells.
    pub fn addchnstr(&mut self, cells: &[chtype], n: usize) -> c_int {
        native!(self, waddchnstr(prefix(cells, n)))
    }

    /// Copies cells to (`y`, `x`).
    pub fn mvaddchstr(&mut self, y: c_int, x: c_int, cells: &[chtype]) -> c_int {
        native_at!(self, y, x, waddchnstr(cells))
    }

    /// Copies at most `n` cells to (`y`, `x`).
    pub fn mvaddchnstr(&mut self, y: c_int, x: c_int, cells: &[chtype], n: usize) -> c_int {
        native_at!(self, y, x, waddchnstr(prefix(cells, n)))
    }

    /// Inserts `ch` before the cursor, shifting the line right.
    pub fn insch(&mut self, ch: chtype) -> c_int {
        native!(self, winsch(ch))
    }

    /// Inserts `ch` at (`y`, `x`).
    pub fn mvinsch(&mut self, y: c_int, x: c_int, ch: chtype) -> c_int {
        native_at!(self, y, x, winsch(ch))
    }

    /// Inserts `text` before the cursor; characters pushed off the line are lost.
    pub fn insstr(&mut self, text: &str) -> c_int {
        native!(self, winsnstr(text.as_bytes()))
    }

    /// Inserts at most `n` bytes of `text`.
    pub fn insnstr(&mut self, text: &str, n: usize) -> c_int {
        native!(self, winsnstr(prefix(text.as_bytes(), n)))
    }

    /// Inserts `text` at (`y`, `x`).
    pub fn mvinsstr(&mut self, y: c_int, x: c_int, text: &str) -> c_int {
        native_at!(self, y, x, winsnstr(text.as_bytes()))
    }

    /// Inserts at most `n` bytes of `text` at (`y`, `x`).
    pub fn mvinsnstr(&mut self, y: c_int, x: c_int, text: &str, n: usize) -> c_int {
        native_at!(self, y, x, winsnstr(prefix(text.as_bytes(), n)))
    }

    // Deletion

    /// Deletes the character under the cursor, shifting the line left.
    pub fn delch(&mut self) -> c_int {
        native!(self, wdelch())
    }

    /// Deletes the character at (`y`, `x`).
    pub fn mvdelch(&mut self, y: c_int, x: c_int) -> c_int {
        native_at!(self, y, x, wdelch())
    }

    /// Inserts `n` blank lines above the cursor line, or deletes `-n` lines
    /// when negative.
    pub fn insdelln(&mut self, n: c_int) -> c_int {
        native!(self, winsdelln(n))
    }
}

fn prefix<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}
