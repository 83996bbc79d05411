//! In-memory curses backend for tests.
//!
//! [`RecordingCurses`] keeps a small model of each window (geometry, cursor
//! and cell contents), logs every call it receives, and counts releases per
//! handle. Clones share the same state, so a test keeps one clone for
//! inspection and gives others to the code under test.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    ffi::c_int,
    rc::Rc,
};

use crate::backend::{chtype, Curses, ERR, OK};

const BLANK: chtype = b' ' as chtype;
const CHARTEXT: chtype = 0xff;

/// Identifier of a simulated window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

/// One call received by [`RecordingCurses`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InitScr,
    EndWin,
    DoUpdate,
    Cbreak(bool),
    Echo(bool),
    NewWin(c_int, c_int, c_int, c_int),
    Delwin(WindowId),
    NoTimeout(WindowId, bool),
    Timeout(WindowId, c_int),
    ClearOk(WindowId, bool),
    SetScrReg(WindowId, c_int, c_int),
    GetCh(WindowId),
    /// Records the buffer length seen at call time.
    GetNStr(WindowId, usize),
    InCh(WindowId),
    InNStr(WindowId, usize),
    InChNStr(WindowId, usize),
    AddCh(WindowId, chtype),
    EchoChar(WindowId, chtype),
    Printw(WindowId, String),
    AddNStr(WindowId, Vec<u8>),
    AddChNStr(WindowId, Vec<chtype>),
    InsCh(WindowId, chtype),
    InsNStr(WindowId, Vec<u8>),
    DelCh(WindowId),
    InsDelLn(WindowId, c_int),
    Move(WindowId, c_int, c_int),
    Erase(WindowId),
    Clear(WindowId),
    ClrToBot(WindowId),
    ClrToEol(WindowId),
    Refresh(WindowId),
    OutRefresh(WindowId),
    Redraw(WindowId),
    RedrawLn(WindowId, c_int, c_int),
    Scroll(WindowId, c_int),
}

#[derive(Debug)]
struct SimWindow {
    nlines: usize,
    ncols: usize,
    cur_y: usize,
    cur_x: usize,
    cells: Vec<chtype>,
}

impl SimWindow {
    fn new(nlines: usize, ncols: usize) -> Self {
        Self {
            nlines,
            ncols,
            cur_y: 0,
            cur_x: 0,
            cells: vec![BLANK; nlines * ncols],
        }
    }

    fn index(&self, y: usize, x: usize) -> usize {
        y * self.ncols + x
    }

    fn cursor(&self) -> usize {
        self.index(self.cur_y, self.cur_x)
    }

    fn line_rest(&self) -> std::ops::Range<usize> {
        let start = self.cursor();
        start..self.index(self.cur_y, 0) + self.ncols
    }

    fn put(&mut self, ch: chtype) -> c_int {
        if self.cells.is_empty() {
            return ERR;
        }
        let at = self.cursor();
        self.cells[at] = ch;
        self.cur_x += 1;
        if self.cur_x == self.ncols {
            self.cur_x = 0;
            if self.cur_y + 1 == self.nlines {
                // Wrote the bottom-right cell without scrolling.
                self.cur_x = self.ncols - 1;
                return ERR;
            }
            self.cur_y += 1;
        }
        OK
    }

    fn insert(&mut self, cells: &[chtype]) {
        let range = self.line_rest();
        let line = &mut self.cells[range];
        for &ch in cells.iter().rev() {
            if line.is_empty() {
                break;
            }
            line.rotate_right(1);
            line[0] = ch;
        }
    }

    fn blank(&mut self, from: usize, to: usize) {
        self.cells[from..to].fill(BLANK);
    }

    fn shift_lines(&mut self, from_line: usize, n: isize) {
        let width = self.ncols;
        let region = &mut self.cells[from_line * width..];
        let count = n.unsigned_abs().min(region.len() / width.max(1)) * width;
        if n > 0 {
            region.rotate_right(count);
            region[..count].fill(BLANK);
        } else {
            region.rotate_left(count);
            let len = region.len();
            region[len - count..].fill(BLANK);
        }
    }
}

#[derive(Debug)]
struct State {
    lines: usize,
    cols: usize,
    terminal: bool,
    next_id: u32,
    windows: HashMap<WindowId, SimWindow>,
    releases: HashMap<WindowId, usize>,
    calls: Vec<Call>,
    keys: VecDeque<c_int>,
    lines_in: VecDeque<Vec<u8>>,
}

impl State {
    fn allocate(&mut self, nlines: usize, ncols: usize) -> WindowId {
        self.next_id += 1;
        let id = WindowId(self.next_id);
        self.windows.insert(id, SimWindow::new(nlines, ncols));
        id
    }
}

/// Recording, in-memory [`Curses`] backend.
#[derive(Debug, Clone)]
pub struct RecordingCurses {
    state: Rc<RefCell<State>>,
}

impl RecordingCurses {
    /// A terminal of `lines` rows and `cols` columns.
    pub fn new(lines: usize, cols: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                lines,
                cols,
                terminal: true,
                next_id: 0,
                windows: HashMap::new(),
                releases: HashMap::new(),
                calls: Vec::new(),
                keys: VecDeque::new(),
                lines_in: VecDeque::new(),
            })),
        }
    }

    /// Behave as if no terminal were attached.
    pub fn without_terminal(self) -> Self {
        self.state.borrow_mut().terminal = false;
        self
    }

    /// Queues a key for `wgetch`.
    pub fn push_key(&self, key: c_int) {
        self.state.borrow_mut().keys.push_back(key);
    }

    /// Queues a line for `wgetnstr`.
    pub fn push_line(&self, line: impl Into<Vec<u8>>) {
        self.state.borrow_mut().lines_in.push_back(line.into());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn is_live(&self, win: WindowId) -> bool {
        self.state.borrow().windows.contains_key(&win)
    }

    pub fn live_count(&self) -> usize {
        self.state.borrow().windows.len()
    }

    /// Number of `delwin` calls received for `win`.
    pub fn releases_of(&self, win: WindowId) -> usize {
        self.state.borrow().releases.get(&win).copied().unwrap_or(0)
    }

    pub fn delwin_count(&self) -> usize {
        self.state.borrow().releases.values().sum()
    }

    /// Text of row `y`, attributes stripped. Empty for an unknown window or
    /// a row outside it.
    pub fn row_text(&self, win: WindowId, y: usize) -> String {
        let state = self.state.borrow();
        match state.windows.get(&win) {
            Some(w) if y < w.nlines => {
                let start = w.index(y, 0);
                w.cells[start..start + w.ncols]
                    .iter()
                    .map(|&c| char::from((c & CHARTEXT) as u8))
                    .collect()
            }
            _ => String::new(),
        }
    }

    pub fn cursor(&self, win: WindowId) -> Option<(usize, usize)> {
        let state = self.state.borrow();
        state.windows.get(&win).map(|w| (w.cur_y, w.cur_x))
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn with_window<R>(&self, win: WindowId, failure: R, op: impl FnOnce(&mut SimWindow) -> R) -> R {
        let mut state = self.state.borrow_mut();
        match state.windows.get_mut(&win) {
            Some(w) => op(w),
            None => failure,
        }
    }
}

impl Curses for RecordingCurses {
    type Handle = WindowId;

    fn has_terminal(&self) -> bool {
        self.state.borrow().terminal
    }

    fn initscr(&self) -> Option<Self::Handle> {
        self.record(Call::InitScr);
        let mut state = self.state.borrow_mut();
        let (lines, cols) = (state.lines, state.cols);
        Some(state.allocate(lines, cols))
    }

    fn endwin(&self) -> c_int {
        self.record(Call::EndWin);
        OK
    }

    fn doupdate(&self) -> c_int {
        self.record(Call::DoUpdate);
        OK
    }

    fn cbreak(&self, on: bool) -> c_int {
        self.record(Call::Cbreak(on));
        OK
    }

    fn echo(&self, on: bool) -> c_int {
        self.record(Call::Echo(on));
        OK
    }

    fn newwin(
        &self,
        nlines: c_int,
        ncols: c_int,
        begin_y: c_int,
        begin_x: c_int,
    ) -> Option<Self::Handle> {
        self.record(Call::NewWin(nlines, ncols, begin_y, begin_x));
        let mut state = self.state.borrow_mut();
        let (lines, cols) = (state.lines as c_int, state.cols as c_int);
        if nlines < 0 || ncols < 0 || begin_y < 0 || begin_x < 0 {
            return None;
        }
        // Zero extends to the edge of the terminal.
        let nlines = if nlines == 0 { lines - begin_y } else { nlines };
        let ncols = if ncols == 0 { cols - begin_x } else { ncols };
        if nlines <= 0 || ncols <= 0 || begin_y + nlines > lines || begin_x + ncols > cols {
            return None;
        }
        Some(state.allocate(nlines as usize, ncols as usize))
    }

    unsafe fn delwin(&self, win: Self::Handle) -> c_int {
        self.record(Call::Delwin(win));
        let mut state = self.state.borrow_mut();
        *state.releases.entry(win).or_default() += 1;
        match state.windows.remove(&win) {
            Some(_) => OK,
            None => ERR,
        }
    }

    unsafe fn notimeout(&self, win: Self::Handle, on: bool) -> c_int {
        self.record(Call::NoTimeout(win, on));
        self.with_window(win, ERR, |_| OK)
    }

    unsafe fn wtimeout(&self, win: Self::Handle, delay: c_int) {
        self.record(Call::Timeout(win, delay));
    }

    unsafe fn clearok(&self, win: Self::Handle, on: bool) -> c_int {
        self.record(Call::ClearOk(win, on));
        self.with_window(win, ERR, |_| OK)
    }

    unsafe fn wsetscrreg(&self, win: Self::Handle, top: c_int, bot: c_int) -> c_int {
        self.record(Call::SetScrReg(win, top, bot));
        self.with_window(win, ERR, |w| {
            let maxy = w.nlines as c_int - 1;
            if top >= 0 && bot <= maxy && bot > top {
                OK
            } else {
                ERR
            }
        })
    }

    unsafe fn wgetch(&self, win: Self::Handle) -> c_int {
        self.record(Call::GetCh(win));
        self.state.borrow_mut().keys.pop_front().unwrap_or(ERR)
    }

    unsafe fn wgetnstr(&self, win: Self::Handle, buf: &mut Vec<u8>) -> c_int {
        self.record(Call::GetNStr(win, buf.len()));
        let Some(line) = self.state.borrow_mut().lines_in.pop_front() else {
            return ERR;
        };
        let n = line.len().min(buf.len());
        buf[..n].copy_from_slice(&line[..n]);
        buf[n..].fill(0);
        OK
    }

    unsafe fn winch(&self, win: Self::Handle) -> chtype {
        self.record(Call::InCh(win));
        self.with_window(win, ERR as chtype, |w| w.cells[w.cursor()])
    }

    unsafe fn winnstr(&self, win: Self::Handle, buf: &mut Vec<u8>) -> c_int {
        self.record(Call::InNStr(win, buf.len()));
        self.with_window(win, ERR, |w| {
            let line = &w.cells[w.line_rest()];
            let n = line.len().min(buf.len());
            for (dst, &cell) in buf.iter_mut().zip(&line[..n]) {
                *dst = (cell & CHARTEXT) as u8;
            }
            buf[n..].fill(0);
            n as c_int
        })
    }

    unsafe fn winchnstr(&self, win: Self::Handle, buf: &mut Vec<chtype>) -> c_int {
        self.record(Call::InChNStr(win, buf.len()));
        self.with_window(win, ERR, |w| {
            let line = &w.cells[w.line_rest()];
            let n = line.len().min(buf.len());
            buf[..n].copy_from_slice(&line[..n]);
            buf[n..].fill(0);
            n as c_int
        })
    }

    unsafe fn waddch(&self, win: Self::Handle, ch: chtype) -> c_int {
        self.record(Call::AddCh(win, ch));
        self.with_window(win, ERR, |w| w.put(ch))
    }

    unsafe fn wechochar(&self, win: Self::Handle, ch: chtype) -> c_int {
        self.record(Call::EchoChar(win, ch));
        self.with_window(win, ERR, |w| w.put(ch))
    }

    unsafe fn wprintw(&self, win: Self::Handle, text: &str) -> c_int {
        self.record(Call::Printw(win, text.to_owned()));
        let text = text.split('\0').next().unwrap_or_default();
        self.with_window(win, ERR, |w| {
            text.bytes()
                .map(|b| w.put(chtype::from(b)))
                .fold(OK, |acc, r| if r == ERR { ERR } else { acc })
        })
    }

    unsafe fn waddnstr(&self, win: Self::Handle, text: &[u8]) -> c_int {
        self.record(Call::AddNStr(win, text.to_vec()));
        self.with_window(win, ERR, |w| {
            text.iter()
                .take_while(|&&b| b != 0)
                .map(|&b| w.put(chtype::from(b)))
                .fold(OK, |acc, r| if r == ERR { ERR } else { acc })
        })
    }

    unsafe fn waddchnstr(&self, win: Self::Handle, cells: &[chtype]) -> c_int {
        self.record(Call::AddChNStr(win, cells.to_vec()));
        self.with_window(win, ERR, |w| {
            let range = w.line_rest();
            let dst = &mut w.cells[range];
            for (d, &c) in dst.iter_mut().zip(cells.iter().take_while(|&&c| c != 0)) {
                *d = c;
            }
            OK
        })
    }

    unsafe fn winsch(&self, win: Self::Handle, ch: chtype) -> c_int {
        self.record(Call::InsCh(win, ch));
        self.with_window(win, ERR, |w| {
            w.insert(&[ch]);
            OK
        })
    }

    unsafe fn winsnstr(&self, win: Self::Handle, text: &[u8]) -> c_int {
        self.record(Call::InsNStr(win, text.to_vec()));
        self.with_window(win, ERR, |w| {
            let cells: Vec<chtype> = text
                .iter()
                .take_while(|&&b| b != 0)
                .map(|&b| chtype::from(b))
                .collect();
            w.insert(&cells);
            OK
        })
    }

    unsafe fn wdelch(&self, win: Self::Handle) -> c_int {
        self.record(Call::DelCh(win));
        self.with_window(win, ERR, |w| {
            let range = w.line_rest();
            let line = &mut w.cells[range];
            line.rotate_left(1);
            if let Some(last) = line.last_mut() {
                *last = BLANK;
            }
            OK
        })
    }

    unsafe fn winsdelln(&self, win: Self::Handle, n: c_int) -> c_int {
        self.record(Call::InsDelLn(win, n));
        self.with_window(win, ERR, |w| {
            w.shift_lines(w.cur_y, n as isize);
            OK
        })
    }

    unsafe fn wmove(&self, win: Self::Handle, y: c_int, x: c_int) -> c_int {
        self.record(Call::Move(win, y, x));
        self.with_window(win, ERR, |w| {
            if y < 0 || x < 0 || y as usize >= w.nlines || x as usize >= w.ncols {
                return ERR;
            }
            w.cur_y = y as usize;
            w.cur_x = x as usize;
            OK
        })
    }

    unsafe fn werase(&self, win: Self::Handle) -> c_int {
        self.record(Call::Erase(win));
        self.with_window(win, ERR, |w| {
            let len = w.cells.len();
            w.blank(0, len);
            w.cur_y = 0;
            w.cur_x = 0;
            OK
        })
    }

    unsafe fn wclear(&self, win: Self::Handle) -> c_int {
        self.record(Call::Clear(win));
        self.with_window(win, ERR, |w| {
            let len = w.cells.len();
            w.blank(0, len);
            w.cur_y = 0;
            w.cur_x = 0;
            OK
        })
    }

    unsafe fn wclrtobot(&self, win: Self::Handle) -> c_int {
        self.record(Call::ClrToBot(win));
        self.with_window(win, ERR, |w| {
            let (from, len) = (w.cursor(), w.cells.len());
            w.blank(from, len);
            OK
        })
    }

    unsafe fn wclrtoeol(&self, win: Self::Handle) -> c_int {
        self.record(Call::ClrToEol(win));
        self.with_window(win, ERR, |w| {
            let range = w.line_rest();
            w.blank(range.start, range.end);
            OK
        })
    }

    unsafe fn wrefresh(&self, win: Self::Handle) -> c_int {
        self.record(Call::Refresh(win));
        self.with_window(win, ERR, |_| OK)
    }

    unsafe fn wnoutrefresh(&self, win: Self::Handle) -> c_int {
        self.record(Call::OutRefresh(win));
        self.with_window(win, ERR, |_| OK)
    }

    unsafe fn redrawwin(&self, win: Self::Handle) -> c_int {
        self.record(Call::Redraw(win));
        self.with_window(win, ERR, |_| OK)
    }

    unsafe fn wredrawln(&self, win: Self::Handle, beg_line: c_int, num_lines: c_int) -> c_int {
        self.record(Call::RedrawLn(win, beg_line, num_lines));
        self.with_window(win, ERR, |w| {
            match beg_line.checked_add(num_lines) {
                Some(end) if beg_line >= 0 && num_lines >= 0 && end as usize <= w.nlines => OK,
                _ => ERR,
            }
        })
    }

    unsafe fn wscrl(&self, win: Self::Handle, n: c_int) -> c_int {
        self.record(Call::Scroll(win, n));
        self.with_window(win, ERR, |w| {
            // Scrolling up by n deletes n lines at the top.
            w.shift_lines(0, -(n as isize));
            OK
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_put_wraps_and_fails_at_corner() {
        let curses = RecordingCurses::new(2, 2);
        let win = curses.newwin(0, 0, 0, 0).unwrap();

        unsafe {
            assert_eq!(curses.waddnstr(win, b"abc"), OK);
            assert_eq!(curses.row_text(win, 0), "ab");
            assert_eq!(curses.cursor(win), Some((1, 1)));
            assert_eq!(curses.waddch(win, chtype::from(b'd')), ERR);
        }
        assert_eq!(curses.row_text(win, 1), "cd");
    }

    #[test]
    fn test_insert_and_delete_shift_line() {
        let curses = RecordingCurses::new(1, 5);
        let win = curses.newwin(0, 0, 0, 0).unwrap();

        unsafe {
            curses.waddnstr(win, b"abcd");
            curses.wmove(win, 0, 1);
            curses.winsch(win, chtype::from(b'X'));
        }
        assert_eq!(curses.row_text(win, 0), "aXbcd");

        unsafe {
            curses.wdelch(win);
            curses.wdelch(win);
        }
        assert_eq!(curses.row_text(win, 0), "acd  ");
    }

    #[test]
    fn test_scroll_moves_lines_up() {
        let curses = RecordingCurses::new(3, 2);
        let win = curses.newwin(0, 0, 0, 0).unwrap();

        unsafe {
            curses.waddnstr(win, b"aabbc");
            curses.wscrl(win, 1);
        }
        assert_eq!(curses.row_text(win, 0), "bb");
        assert_eq!(curses.row_text(win, 1), "c ");
        assert_eq!(curses.row_text(win, 2), "  ");
    }

    #[test]
    fn test_delwin_unknown_handle() {
        let curses = RecordingCurses::new(3, 3);
        let win = curses.newwin(1, 1, 0, 0).unwrap();

        // The model tolerates stale handles so tests can observe misuse.
        assert_eq!(unsafe { curses.delwin(win) }, OK);
        assert_eq!(unsafe { curses.delwin(win) }, ERR);
        assert_eq!(curses.releases_of(win), 2);
    }

    #[test]
    fn test_row_text_outside_window_is_empty() {
        let curses = RecordingCurses::new(4, 4);
        let win = curses.newwin(2, 3, 0, 0).unwrap();

        assert_eq!(curses.row_text(win, 1), "   ");
        assert_eq!(curses.row_text(win, 2), "");
        assert_eq!(curses.row_text(win, usize::MAX), "");
        assert_eq!(curses.row_text(WindowId(99), 0), "");
    }

    #[test]
    fn test_redrawln_rejects_overflowing_range() {
        let curses = RecordingCurses::new(4, 4);
        let win = curses.newwin(3, 3, 0, 0).unwrap();

        unsafe {
            assert_eq!(curses.wredrawln(win, 0, 3), OK);
            assert_eq!(curses.wredrawln(win, 1, 3), ERR);
            assert_eq!(curses.wredrawln(win, c_int::MAX, 1), ERR);
            assert_eq!(curses.wredrawln(win, 1, c_int::MAX), ERR);
            assert_eq!(curses.wredrawln(win, -1, 1), ERR);
        }
    }
}
