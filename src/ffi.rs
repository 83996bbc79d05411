//! Bindings to the system `libncurses` and the [`Ncurses`] backend.

use std::{
    ffi::{c_char, c_int, CString},
    marker::{PhantomData, PhantomPinned},
    ptr::NonNull,
};

use crate::{
    backend::{chtype, Curses, ERR},
    window::Window,
};

/// The opaque `WINDOW` structure owned by ncurses.
#[repr(C)]
pub struct WINDOW {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

#[link(name = "ncurses")]
extern "C" {
    fn initscr() -> *mut WINDOW;
    fn endwin() -> c_int;
    fn doupdate() -> c_int;
    fn cbreak() -> c_int;
    fn nocbreak() -> c_int;
    fn echo() -> c_int;
    fn noecho() -> c_int;

    fn newwin(nlines: c_int, ncols: c_int, begin_y: c_int, begin_x: c_int) -> *mut WINDOW;
    fn delwin(win: *mut WINDOW) -> c_int;

    fn notimeout(win: *mut WINDOW, bf: bool) -> c_int;
    fn wtimeout(win: *mut WINDOW, delay: c_int);
    fn clearok(win: *mut WINDOW, bf: bool) -> c_int;
    fn wsetscrreg(win: *mut WINDOW, top: c_int, bot: c_int) -> c_int;

    fn wgetch(win: *mut WINDOW) -> c_int;
    fn wgetnstr(win: *mut WINDOW, s: *mut c_char, n: c_int) -> c_int;
    fn winch(win: *mut WINDOW) -> chtype;
    fn winnstr(win: *mut WINDOW, s: *mut c_char, n: c_int) -> c_int;
    fn winchnstr(win: *mut WINDOW, chstr: *mut chtype, n: c_int) -> c_int;

    fn waddch(win: *mut WINDOW, ch: chtype) -> c_int;
    fn wechochar(win: *mut WINDOW, ch: chtype) -> c_int;
    fn wprintw(win: *mut WINDOW, fmt: *const c_char, ...) -> c_int;
    fn waddnstr(win: *mut WINDOW, s: *const c_char, n: c_int) -> c_int;
    fn waddchnstr(win: *mut WINDOW, chstr: *const chtype, n: c_int) -> c_int;
    fn winsch(win: *mut WINDOW, ch: chtype) -> c_int;
    fn winsnstr(win: *mut WINDOW, s: *const c_char, n: c_int) -> c_int;

    fn wdelch(win: *mut WINDOW) -> c_int;
    fn winsdelln(win: *mut WINDOW, n: c_int) -> c_int;

    fn wmove(win: *mut WINDOW, y: c_int, x: c_int) -> c_int;
    fn werase(win: *mut WINDOW) -> c_int;
    fn wclear(win: *mut WINDOW) -> c_int;
    fn wclrtobot(win: *mut WINDOW) -> c_int;
    fn wclrtoeol(win: *mut WINDOW) -> c_int;
    fn wrefresh(win: *mut WINDOW) -> c_int;
    fn wnoutrefresh(win: *mut WINDOW) -> c_int;
    fn redrawwin(win: *mut WINDOW) -> c_int;
    fn wredrawln(win: *mut WINDOW, beg_line: c_int, num_lines: c_int) -> c_int;
    fn wscrl(win: *mut WINDOW, n: c_int) -> c_int;
}

/// A live ncurses window.
///
/// Only this module builds one, from a pointer ncurses returned, so safe code
/// cannot forge a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWindow(NonNull<WINDOW>);

impl NativeWindow {
    /// The underlying pointer. Ownership is unchanged.
    pub fn as_ptr(self) -> *mut WINDOW {
        self.0.as_ptr()
    }
}

/// Lengths above `c_int::MAX` are capped; the library never reads past it.
fn native_len(len: usize) -> c_int {
    c_int::try_from(len).unwrap_or(c_int::MAX)
}

/// The system ncurses library.
///
/// Handles wrap raw `WINDOW` pointers, which keeps every [`Window`] built on
/// this backend `!Send` and `!Sync`: ncurses is not thread-safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ncurses;

impl Curses for Ncurses {
    type Handle = NativeWindow;

    fn initscr(&self) -> Option<Self::Handle> {
        NonNull::new(unsafe { initscr() }).map(NativeWindow)
    }

    fn endwin(&self) -> c_int {
        unsafe { endwin() }
    }

    fn doupdate(&self) -> c_int {
        unsafe { doupdate() }
    }

    fn cbreak(&self, on: bool) -> c_int {
        unsafe {
            if on {
                cbreak()
            } else {
                nocbreak()
            }
        }
    }

    fn echo(&self, on: bool) -> c_int {
        unsafe {
            if on {
                echo()
            } else {
                noecho()
            }
        }
    }

    fn newwin(
        &self,
        nlines: c_int,
        ncols: c_int,
        begin_y: c_int,
        begin_x: c_int,
    ) -> Option<Self::Handle> {
        NonNull::new(unsafe { newwin(nlines, ncols, begin_y, begin_x) }).map(NativeWindow)
    }

    unsafe fn delwin(&self, win: Self::Handle) -> c_int {
        unsafe { delwin(win.0.as_ptr()) }
    }

    unsafe fn notimeout(&self, win: Self::Handle, on: bool) -> c_int {
        unsafe { notimeout(win.0.as_ptr(), on) }
    }

    unsafe fn wtimeout(&self, win: Self::Handle, delay: c_int) {
        unsafe { wtimeout(win.0.as_ptr(), delay) }
    }

    unsafe fn clearok(&self, win: Self::Handle, on: bool) -> c_int {
        unsafe { clearok(win.0.as_ptr(), on) }
    }

    unsafe fn wsetscrreg(&self, win: Self::Handle, top: c_int, bot: c_int) -> c_int {
        unsafe { wsetscrreg(win.0.as_ptr(), top, bot) }
    }

    unsafe fn wgetch(&self, win: Self::Handle) -> c_int {
        unsafe { wgetch(win.0.as_ptr()) }
    }

    unsafe fn wgetnstr(&self, win: Self::Handle, buf: &mut Vec<u8>) -> c_int {
        // Room for the terminating NUL, outside the visible length.
        buf.reserve(1);
        unsafe { wgetnstr(win.0.as_ptr(), buf.as_mut_ptr().cast(), native_len(buf.len())) }
    }

    unsafe fn winch(&self, win: Self::Handle) -> chtype {
        unsafe { winch(win.0.as_ptr()) }
    }

    unsafe fn winnstr(&self, win: Self::Handle, buf: &mut Vec<u8>) -> c_int {
        buf.reserve(1);
        unsafe { winnstr(win.0.as_ptr(), buf.as_mut_ptr().cast(), native_len(buf.len())) }
    }

    unsafe fn winchnstr(&self, win: Self::Handle, buf: &mut Vec<chtype>) -> c_int {
        buf.reserve(1);
        unsafe { winchnstr(win.0.as_ptr(), buf.as_mut_ptr(), native_len(buf.len())) }
    }

    unsafe fn waddch(&self, win: Self::Handle, ch: chtype) -> c_int {
        unsafe { waddch(win.0.as_ptr(), ch) }
    }

    unsafe fn wechochar(&self, win: Self::Handle, ch: chtype) -> c_int {
        unsafe { wechochar(win.0.as_ptr(), ch) }
    }

    unsafe fn wprintw(&self, win: Self::Handle, text: &str) -> c_int {
        let text = match text.find('\0') {
            Some(end) => &text[..end],
            None => text,
        };
        match CString::new(text) {
            Ok(text) => unsafe { wprintw(win.0.as_ptr(), c"%s".as_ptr(), text.as_ptr()) },
            Err(_) => ERR,
        }
    }

    unsafe fn waddnstr(&self, win: Self::Handle, text: &[u8]) -> c_int {
        unsafe { waddnstr(win.0.as_ptr(), text.as_ptr().cast(), native_len(text.len())) }
    }

    unsafe fn waddchnstr(&self, win: Self::Handle, cells: &[chtype]) -> c_int {
        unsafe { waddchnstr(win.0.as_ptr(), cells.as_ptr(), native_len(cells.len())) }
    }

    unsafe fn winsch(&self, win: Self::Handle, ch: chtype) -> c_int {
        unsafe { winsch(win.0.as_ptr(), ch) }
    }

    unsafe fn winsnstr(&self, win: Self::Handle, text: &[u8]) -> c_int {
        unsafe { winsnstr(win.0.as_ptr(), text.as_ptr().cast(), native_len(text.len())) }
    }

    unsafe fn wdelch(&self, win: Self::Handle) -> c_int {
        unsafe { wdelch(win.0.as_ptr()) }
    }

    unsafe fn winsdelln(&self, win: Self::Handle, n: c_int) -> c_int {
        unsafe { winsdelln(win.0.as_ptr(), n) }
    }

    unsafe fn wmove(&self, win: Self::Handle, y: c_int, x: c_int) -> c_int {
        unsafe { wmove(win.0.as_ptr(), y, x) }
    }

    unsafe fn werase(&self, win: Self::Handle) -> c_int {
        unsafe { werase(win.0.as_ptr()) }
    }

    unsafe fn wclear(&self, win: Self::Handle) -> c_int {
        unsafe { wclear(win.0.as_ptr()) }
    }

    unsafe fn wclrtobot(&self, win: Self::Handle) -> c_int {
        unsafe { wclrtobot(win.0.as_ptr()) }
    }

    unsafe fn wclrtoeol(&self, win: Self::Handle) -> c_int {
        unsafe { wclrtoeol(win.0.as_ptr()) }
    }

    unsafe fn wrefresh(&self, win: Self::Handle) -> c_int {
        unsafe { wrefresh(win.0.as_ptr()) }
    }

    unsafe fn wnoutrefresh(&self, win: Self::Handle) -> c_int {
        unsafe { wnoutrefresh(win.0.as_ptr()) }
    }

    unsafe fn redrawwin(&self, win: Self::Handle) -> c_int {
        unsafe { redrawwin(win.0.as_ptr()) }
    }

    unsafe fn wredrawln(&self, win: Self::Handle, beg_line: c_int, num_lines: c_int) -> c_int {
        unsafe { wredrawln(win.0.as_ptr(), beg_line, num_lines) }
    }

    unsafe fn wscrl(&self, win: Self::Handle, n: c_int) -> c_int {
        unsafe { wscrl(win.0.as_ptr(), n) }
    }
}

impl<'s> Window<'s, Ncurses> {
    /// Takes ownership of a window allocated by ncurses. A null pointer yields
    /// an empty `Window`.
    ///
    /// # Safety
    ///
    /// `win` must be null or a live window that nothing else will `delwin`;
    /// the returned `Window` releases it on drop.
    pub unsafe fn from_raw(win: *mut WINDOW) -> Self {
        // SAFETY: the caller hands over sole ownership of `win`.
        unsafe { Window::from_handle(Ncurses, NonNull::new(win).map(NativeWindow)) }
    }

    /// The managed pointer, or null when empty. Ownership is unchanged.
    pub fn as_raw(&self) -> *mut WINDOW {
        self.try_handle()
            .map_or(std::ptr::null_mut(), NativeWindow::as_ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OK;
    use pretty_assertions::assert_eq;
    use std::{fs, path::PathBuf};

    #[repr(C)]
    struct SCREEN {
        _data: [u8; 0],
        _marker: PhantomData<(*mut u8, PhantomPinned)>,
    }

    #[repr(C)]
    struct FILE {
        _data: [u8; 0],
        _marker: PhantomData<(*mut u8, PhantomPinned)>,
    }

    extern "C" {
        fn fopen(path: *const c_char, mode: *const c_char) -> *mut FILE;
        fn fclose(stream: *mut FILE) -> c_int;
    }

    #[link(name = "ncurses")]
    extern "C" {
        fn newterm(term: *const c_char, out: *mut FILE, input: *mut FILE) -> *mut SCREEN;
        fn delscreen(screen: *mut SCREEN);
    }

    /// A curses screen writing to /dev/null and reading `input` from a file.
    /// The terminal description is `dumb`, which every terminfo install ships.
    struct NullTerminal {
        screen: *mut SCREEN,
        out: *mut FILE,
        input: *mut FILE,
        input_path: PathBuf,
    }

    impl NullTerminal {
        fn open(input: &[u8]) -> Option<Self> {
            let input_path = std::env::temp_dir()
                .join(format!("ncwindow-input-{}", std::process::id()));
            fs::write(&input_path, input).ok()?;
            let path = CString::new(input_path.to_str()?).ok()?;

            unsafe {
                let out = fopen(c"/dev/null".as_ptr(), c"w".as_ptr());
                let input = fopen(path.as_ptr(), c"r".as_ptr());
                if out.is_null() || input.is_null() {
                    return None;
                }
                let screen = newterm(c"dumb".as_ptr(), out, input);
                if screen.is_null() {
                    fclose(out);
                    fclose(input);
                    return None;
                }
                Some(Self {
                    screen,
                    out,
                    input,
                    input_path,
                })
            }
        }
    }

    impl Drop for NullTerminal {
        fn drop(&mut self) {
            unsafe {
                endwin();
                delscreen(self.screen);
                fclose(self.out);
                fclose(self.input);
            }
            let _ = fs::remove_file(&self.input_path);
        }
    }

    fn text(buf: &[u8]) -> &str {
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        std::str::from_utf8(&buf[..end]).unwrap()
    }

    #[test]
    fn test_native_len_caps_at_c_int_max() {
        assert_eq!(native_len(0), 0);
        assert_eq!(native_len(80), 80);
        assert_eq!(native_len(c_int::MAX as usize), c_int::MAX);
        assert_eq!(native_len(c_int::MAX as usize + 1), c_int::MAX);
        assert_eq!(native_len(usize::MAX), c_int::MAX);
    }

    #[test]
    fn test_empty_raw_window() {
        let win = unsafe { Window::from_raw(std::ptr::null_mut()) };
        assert!(win.is_empty());
        assert!(win.as_raw().is_null());
    }

    // ncurses keeps global state, so every native call runs in this one test.
    #[test]
    fn test_native_screen_round_trip() {
        let Some(_terminal) = NullTerminal::open(b"typed line\n") else {
            // No `dumb` terminfo entry on this machine: nothing to drive.
            return;
        };

        let mut win = Window::new(Ncurses, 3, 12, 0, 0).unwrap();
        assert!(!win.as_raw().is_null());

        // Output stops at the embedded NUL.
        assert_eq!(win.mvprintw(0, 0, format_args!("ab{}cd", '\0')), OK);
        let mut buf = Vec::new();
        assert_eq!(win.mvinnstr(0, 0, &mut buf, 4), 4);
        assert_eq!(buf.len(), 4);
        assert!(buf.capacity() > buf.len());
        assert_eq!(text(&buf), "ab  ");

        // Reading back a zero-length run still leaves room for the NUL.
        assert_eq!(win.mvinnstr(0, 0, &mut buf, 0), 0);
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 1);

        let mut cells = Vec::new();
        assert_eq!(win.mvinchnstr(0, 0, &mut cells, 2), 2);
        assert_eq!(cells.len(), 2);
        assert!(cells.capacity() > cells.len());
        assert_eq!(cells[0] & 0xff, chtype::from(b'a'));

        assert_eq!(win.mvaddch(5, 0, chtype::from(b'x')), ERR);

        let mut line = Vec::new();
        assert_eq!(win.mvgetnstr(1, 0, &mut line, 32), OK);
        assert_eq!(line.len(), 32);
        assert!(line.capacity() > line.len());
        assert_eq!(text(&line), "typed line");
    }
}
