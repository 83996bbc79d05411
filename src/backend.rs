//! The native curses boundary.
//!
//! [`Curses`] names every windowing entry point a [`Window`](crate::Window)
//! forwards to. Each method keeps the parameter meaning and sentinel
//! convention of the C function it is named after, so a backend is a thin
//! shim and nothing more.

use std::{ffi::c_int, fmt::Debug};

/// A rendered cell: character, attributes and color pair packed together.
#[allow(non_camel_case_types)]
pub type chtype = u32;

/// Native success value.
pub const OK: c_int = 0;

/// Native failure value.
pub const ERR: c_int = -1;

/// Capacity of the line buffer used by formatted scans (the C `BUFSIZ`).
pub const SCAN_BUFFER_LEN: usize = 8192;

/// Return types that carry a native failure value.
pub trait Sentinel: Copy {
    const FAILURE: Self;
}

impl Sentinel for c_int {
    const FAILURE: Self = ERR;
}

impl Sentinel for chtype {
    const FAILURE: Self = ERR as chtype;
}

/// The windowing API of a curses implementation.
///
/// Bounded reads receive a vector whose `len()` is the capacity to read; an
/// implementation may use spare capacity for a terminator but must leave the
/// length untouched. Writes receive slices whose length is the count to
/// write.
///
/// # Safety
///
/// Every method taking a window is `unsafe`: `win` must be a window returned
/// by [`newwin`](Curses::newwin) or [`initscr`](Curses::initscr) on this
/// backend and not yet passed to [`delwin`](Curses::delwin). A
/// [`Window`](crate::Window) upholds this for the handle it owns.
pub trait Curses: Clone {
    /// Opaque window reference. Never null: absence is `None` at call sites.
    type Handle: Copy + Eq + Debug;

    /// Whether a usable terminal is attached to this process.
    fn has_terminal(&self) -> bool {
        crate::screen::is_real_terminal()
    }

    // Session

    fn initscr(&self) -> Option<Self::Handle>;
    fn endwin(&self) -> c_int;
    fn doupdate(&self) -> c_int;
    fn cbreak(&self, on: bool) -> c_int;
    fn echo(&self, on: bool) -> c_int;

    // Lifetime

    fn newwin(&self, nlines: c_int, ncols: c_int, begin_y: c_int, begin_x: c_int)
        -> Option<Self::Handle>;
    unsafe fn delwin(&self, win: Self::Handle) -> c_int;

    // Options

    unsafe fn notimeout(&self, win: Self::Handle, on: bool) -> c_int;
    unsafe fn wtimeout(&self, win: Self::Handle, delay: c_int);
    unsafe fn clearok(&self, win: Self::Handle, on: bool) -> c_int;
    unsafe fn wsetscrreg(&self, win: Self::Handle, top: c_int, bot: c_int) -> c_int;

    // Input

    unsafe fn wgetch(&self, win: Self::Handle) -> c_int;
    unsafe fn wgetnstr(&self, win: Self::Handle, buf: &mut Vec<u8>) -> c_int;
    unsafe fn winch(&self, win: Self::Handle) -> chtype;
    unsafe fn winnstr(&self, win: Self::Handle, buf: &mut Vec<u8>) -> c_int;
    unsafe fn winchnstr(&self, win: Self::Handle, buf: &mut Vec<chtype>) -> c_int;

    // Output

    unsafe fn waddch(&self, win: Self::Handle, ch: chtype) -> c_int;
    unsafe fn wechochar(&self, win: Self::Handle, ch: chtype) -> c_int;
    /// `wprintw(win, "%s", text)`; text stops at its first NUL.
    unsafe fn wprintw(&self, win: Self::Handle, text: &str) -> c_int;
    unsafe fn waddnstr(&self, win: Self::Handle, text: &[u8]) -> c_int;
    unsafe fn waddchnstr(&self, win: Self::Handle, cells: &[chtype]) -> c_int;
    unsafe fn winsch(&self, win: Self::Handle, ch: chtype) -> c_int;
    unsafe fn winsnstr(&self, win: Self::Handle, text: &[u8]) -> c_int;

    // Deletion

    unsafe fn wdelch(&self, win: Self::Handle) -> c_int;
    unsafe fn winsdelln(&self, win: Self::Handle, n: c_int) -> c_int;

    // Misc

    unsafe fn wmove(&self, win: Self::Handle, y: c_int, x: c_int) -> c_int;
    unsafe fn werase(&self, win: Self::Handle) -> c_int;
    unsafe fn wclear(&self, win: Self::Handle) -> c_int;
    unsafe fn wclrtobot(&self, win: Self::Handle) -> c_int;
    unsafe fn wclrtoeol(&self, win: Self::Handle) -> c_int;
    unsafe fn wrefresh(&self, win: Self::Handle) -> c_int;
    unsafe fn wnoutrefresh(&self, win: Self::Handle) -> c_int;
    unsafe fn redrawwin(&self, win: Self::Handle) -> c_int;
    unsafe fn wredrawln(&self, win: Self::Handle, beg_line: c_int, num_lines: c_int) -> c_int;
    unsafe fn wscrl(&self, win: Self::Handle, n: c_int) -> c_int;
}
