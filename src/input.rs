//! Input forwarding: key reads, line reads and screen read-back.
//!
//! Bounded reads resize the destination to exactly the requested capacity
//! before the native call, so the library writes into the caller's storage.
//! The unbounded forms use the destination's current length as capacity.

use std::{ffi::c_int, str::FromStr};

use crate::{
    backend::{chtype, Curses, ERR, SCAN_BUFFER_LEN},
    window::{native, native_at, Window},
};

impl<B: Curses> Window<'_, B> {
    /// Reads one key. Blocks according to [`timeout`](Window::timeout).
    pub fn getch(&mut self) -> c_int {
        native!(self, wgetch())
    }

    /// Reads one key at (`y`, `x`).
    pub fn mvgetch(&mut self, y: c_int, x: c_int) -> c_int {
        native_at!(self, y, x, wgetch())
    }

    /// Reads a line and parses it into `value`.
    ///
    /// Returns `ERR` when the read fails, `0` when the text does not parse
    /// (leaving `value` untouched) and `1` once `value` is stored.
    pub fn scanw<T: FromStr>(&mut self, value: &mut T) -> c_int {
        // SAFETY: `forward` only passes the live window this value owns.
        self.forward(|b, w| unsafe { scan_into(b, w, value) })
    }

    /// Reads a line at (`y`, `x`) and parses it into `value`.
    pub fn mvscanw<T: FromStr>(&mut self, y: c_int, x: c_int, value: &mut T) -> c_int {
        // SAFETY: `forward_at` only passes the live window this value owns.
        self.forward_at(y, x, |b, w| unsafe { scan_into(b, w, value) })
    }

    /// Reads a line of at most `buf.len()` bytes into `buf`.
    pub fn getstr(&mut self, buf: &mut Vec<u8>) -> c_int {
        let n = buf.len();
        self.getnstr(buf, n)
    }

    /// Reads a line of at most `n` bytes; `buf` ends up exactly `n` long.
    pub fn getnstr(&mut self, buf: &mut Vec<u8>, n: usize) -> c_int {
        native!(self, wgetnstr(resized(buf, n)))
    }

    /// Reads a line at (`y`, `x`), up to `buf.len()` bytes.
    pub fn mvgetstr(&mut self, y: c_int, x: c_int, buf: &mut Vec<u8>) -> c_int {
        let n = buf.len();
        self.mvgetnstr(y, x, buf, n)
    }

    /// Reads a line at (`y`, `x`). `buf` is left alone when the move fails.
    pub fn mvgetnstr(&mut self, y: c_int, x: c_int, buf: &mut Vec<u8>, n: usize) -> c_int {
        native_at!(self, y, x, wgetnstr(resized(buf, n)))
    }

    /// The cell under the cursor.
    pub fn inch(&mut self) -> chtype {
        native!(self, winch())
    }

    /// The cell at (`y`, `x`), or `ERR as chtype`.
    pub fn mvinch(&mut self, y: c_int, x: c_int) -> chtype {
        native_at!(self, y, x, winch())
    }

    /// Reads back text from the cursor, up to `buf.len()` bytes.
    pub fn instr(&mut self, buf: &mut Vec<u8>) -> c_int {
        let n = buf.len();
        self.innstr(buf, n)
    }

    /// Reads back at most `n` bytes of text from the cursor to the end of
    /// the line. Returns the count read.
    pub fn innstr(&mut self, buf: &mut Vec<u8>, n: usize) -> c_int {
        native!(self, winnstr(resized(buf, n)))
    }

    /// Reads back text from (`y`, `x`), up to `buf.len()` bytes.
    pub fn mvinstr(&mut self, y: c_int, x: c_int, buf: &mut Vec<u8>) -> c_int {
        let n = buf.len();
        self.mvinnstr(y, x, buf, n)
    }

    /// Reads back at most `n` bytes of text from (`y`, `x`).
    pub fn mvinnstr(&mut self, y: c_int, x: c_int, buf: &mut Vec<u8>, n: usize) -> c_int {
        native_at!(self, y, x, winnstr(resized(buf, n)))
    }

    /// Reads back cells from the cursor, up to `buf.len()` of them.
    pub fn inchstr(&mut self, buf: &mut Vec<chtype>) -> c_int {
        let n = buf.len();
        self.inchnstr(buf, n)
    }

    /// Reads back at most `n` cells, attributes included.
    pub fn inchnstr(&mut self, buf: &mut Vec<chtype>, n: usize) -> c_int {
        native!(self, winchnstr(resized(buf, n)))
    }

    /// Reads back cells from (`y`, `x`), up to `buf.len()` of them.
    pub fn mvinchstr(&mut self, y: c_int, x: c_int, buf: &mut Vec<chtype>) -> c_int {
        let n = buf.len();
        self.mvinchnstr(y, x, buf, n)
    }

    /// Reads back at most `n` cells from (`y`, `x`).
    pub fn mvinchnstr(&mut self, y: c_int, x: c_int, buf: &mut Vec<chtype>, n: usize) -> c_int {
        native_at!(self, y, x, winchnstr(resized(buf, n)))
    }
}

/// Sizes `buf` to exactly `n` elements for the library to fill.
fn resized<T: Clone + Default>(buf: &mut Vec<T>, n: usize) -> &mut Vec<T> {
    buf.resize(n, T::default());
    buf
}

/// # Safety
///
/// `win` must be a live window of `backend`.
unsafe fn scan_into<B: Curses, T: FromStr>(backend: &B, win: B::Handle, value: &mut T) -> c_int {
    let mut line = vec![0; SCAN_BUFFER_LEN];
    if unsafe { backend.wgetnstr(win, &mut line) } == ERR {
        return ERR;
    }
    let end = line.iter().position(|&b| b == 0).unwrap_or(line.len());
    let parsed = std::str::from_utf8(&line[..end])
        .ok()
        .and_then(|text| text.trim().parse().ok());

    match parsed {
        Some(parsed) => {
            *value = parsed;
            1
        }
        None => 0,
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

    fn window(curses: &RecordingCurses) -> Window<'static, RecordingCurses> {
        Window::new(curses.clone(), 4, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_getch_passes_keys_through() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        curses.push_key(0x41);

        assert_eq!(win.getch(), 0x41);
        assert_eq!(win.getch(), ERR);
    }

    #[test]
    fn test_mvgetch_out_of_bounds_skips_read() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        let raw = win.handle();
        curses.push_key(0x41);
        curses.clear_calls();

        assert_eq!(win.mvgetch(4, 0), ERR);
        assert_eq!(curses.calls(), vec![Call::Move(raw, 4, 0)]);

        assert_eq!(win.mvgetch(3, 9), 0x41);
        assert_eq!(
            curses.calls()[1..],
            [Call::Move(raw, 3, 9), Call::GetCh(raw)]
        );
    }

    #[test]
    fn test_getnstr_resizes_to_capacity() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        let raw = win.handle();

        for n in [0, 1, 5, 64] {
            let mut buf = vec![b'x'; 3];
            curses.push_line("hello");
            curses.clear_calls();

            assert_eq!(win.getnstr(&mut buf, n), OK);
            assert_eq!(buf.len(), n);
            assert_eq!(curses.calls(), vec![Call::GetNStr(raw, n)]);
            assert_eq!(buf[..n.min(5)], b"hello"[..n.min(5)]);
        }
    }

    #[test]
    fn test_getstr_uses_current_length() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        curses.push_line("abcdef");

        let mut buf = vec![0; 3];
        assert_eq!(win.getstr(&mut buf), OK);
        assert_eq!(buf, b"abc");
    }

    #[test]
    fn test_mvgetnstr_failed_move_leaves_buffer() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        curses.push_line("abc");

        let mut buf = vec![7; 2];
        assert_eq!(win.mvgetnstr(-1, 0, &mut buf, 8), ERR);
        assert_eq!(buf, vec![7, 7]);

        assert_eq!(win.mvgetnstr(1, 1, &mut buf, 8), OK);
        assert_eq!(buf, b"abc\0\0\0\0\0");
    }

    #[test]
    fn test_scanw_parses_line() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        let raw = win.handle();
        curses.push_line(" 42 ");
        curses.push_line("forty-two");
        curses.clear_calls();

        let mut value = 0i32;
        assert_eq!(win.scanw(&mut value), 1);
        assert_eq!(value, 42);
        assert_eq!(curses.calls(), vec![Call::GetNStr(raw, SCAN_BUFFER_LEN)]);

        assert_eq!(win.scanw(&mut value), 0);
        assert_eq!(value, 42);

        assert_eq!(win.scanw(&mut value), ERR);
    }

    #[test]
    fn test_mvscanw_short_circuits() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        curses.push_line("7");

        let mut value = 0u8;
        assert_eq!(win.mvscanw(0, 10, &mut value), ERR);
        assert_eq!(value, 0);
        assert_eq!(win.mvscanw(0, 9, &mut value), 1);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_inch_reads_cell() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        win.addstr("hey");

        assert_eq!(win.mvinch(0, 1), chtype::from(b'e'));
        assert_eq!(win.inch(), chtype::from(b'e'));
        assert_eq!(win.mvinch(9, 9), ERR as chtype);
    }

    #[test]
    fn test_innstr_reads_rest_of_line() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        win.addstr("hello");

        let mut buf = Vec::new();
        assert_eq!(win.mvinnstr(0, 1, &mut buf, 3), 3);
        assert_eq!(buf, b"ell");

        assert_eq!(win.mvinnstr(0, 0, &mut buf, 0), 0);
        assert!(buf.is_empty());

        let mut buf = vec![0; 4];
        assert_eq!(win.mvinstr(0, 0, &mut buf), 4);
        assert_eq!(buf, b"hell");
        assert_eq!(win.instr(&mut buf), 4);
        assert_eq!(win.innstr(&mut buf, 20), 10);
        assert_eq!(buf.len(), 20);
    }

    #[test]
    fn test_inchnstr_resizes_and_reads() {
        let curses = RecordingCurses::new(24, 80);
        let mut win = window(&curses);
        let raw = win.handle();
        win.addstr("ab");
        curses.clear_calls();

        let mut cells = vec![1; 9];
        assert_eq!(win.mvinchnstr(0, 0, &mut cells, 2), 2);
        assert_eq!(cells, vec![chtype::from(b'a'), chtype::from(b'b')]);
        assert_eq!(curses.calls()[1], Call::InChNStr(raw, 2));

        assert_eq!(win.mvinchstr(5, 0, &mut cells), ERR);
        assert_eq!(win.inchstr(&mut cells), 2);
        assert_eq!(win.inchnstr(&mut cells, 0), 0);
        assert!(cells.is_empty());
    }
}
