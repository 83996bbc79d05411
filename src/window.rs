//! Window ownership
//!
//! A [`Window`] owns at most one curses window and releases it exactly once:
//! on drop, on [`Window::destroy`], or when [`Window::assign`] replaces it.
//! There is no `Clone`; ownership only moves.

use std::{ffi::c_int, fmt, marker::PhantomData};

use crate::{
    backend::{Curses, Sentinel, ERR},
    error::{CursesError, CursesResult},
};

/// Calls a window method of the backend on the managed window.
macro_rules! native {
    ($win:expr, $op:ident($($arg:expr),* $(,)?)) => {
        // SAFETY: `forward` only passes the live window this value owns.
        $win.forward(|b, w| unsafe { b.$op(w, $($arg),*) })
    };
}

/// Like `native!`, after moving the cursor to (`y`, `x`).
macro_rules! native_at {
    ($win:expr, $y:expr, $x:expr, $op:ident($($arg:expr),* $(,)?)) => {
        // SAFETY: `forward_at` only passes the live window this value owns.
        $win.forward_at($y, $x, |b, w| unsafe { b.$op(w, $($arg),*) })
    };
}

pub(crate) use {native, native_at};

/// Owner of one curses window.
///
/// Every operation except [`assign`](Window::assign),
/// [`destroy`](Window::destroy), [`take`](Window::take) and the emptiness
/// queries requires a managed window and panics otherwise.
///
/// A window made by [`Screen::new_window`](crate::Screen::new_window)
/// borrows the screen for `'s`, so it cannot outlive the session.
///
/// Adopting a handle is `unsafe`, since two owners would release it twice:
///
/// ```compile_fail,E0133
/// fn adopt<B: ncwindow::Curses>(backend: B, handle: B::Handle) -> ncwindow::Window<'static, B> {
///     ncwindow::Window::from_handle(backend, Some(handle))
/// }
/// ```
///
/// and so is calling the backend on a bare handle:
///
/// ```compile_fail,E0133
/// fn release<B: ncwindow::Curses>(backend: &B, handle: B::Handle) {
///     backend.delwin(handle);
/// }
/// ```
pub struct Window<'s, B: Curses> {
    /// Library the handle belongs to
    backend: B,
    /// Managed window, `None` when empty
    handle: Option<B::Handle>,
    /// Session the window was created on
    _screen: PhantomData<&'s ()>,
}

impl<'s, B: Curses> Window<'s, B> {
    /// Takes ownership of an existing window. `None` creates an empty
    /// `Window`.
    ///
    /// # Safety
    ///
    /// `handle` must be `None` or a live window of `backend` that no other
    /// owner will release: the returned `Window` calls `delwin` on it.
    pub unsafe fn from_handle(backend: B, handle: Option<B::Handle>) -> Self {
        if let Some(handle) = handle {
            log::debug!("adopting window {:?}", handle);
        }
        Self {
            backend,
            handle,
            _screen: PhantomData,
        }
    }

    /// Allocates a new `nlines` x `ncols` window at (`begin_y`, `begin_x`).
    pub fn new(
        backend: B,
        nlines: c_int,
        ncols: c_int,
        begin_y: c_int,
        begin_x: c_int,
    ) -> CursesResult<Self> {
        let handle = backend
            .newwin(nlines, ncols, begin_y, begin_x)
            .ok_or_else(|| CursesError::window_init(nlines, ncols, begin_y, begin_x))?;

        log::debug!(
            "allocated window {:?} ({}x{} at {},{})",
            handle,
            nlines,
            ncols,
            begin_y,
            begin_x
        );
        Ok(Self {
            backend,
            handle: Some(handle),
            _screen: PhantomData,
        })
    }

    /// Releases the managed window, if any, then adopts `handle`.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_handle`](Window::from_handle). The current
    /// window is released first, so passing it back in leaves this `Window`
    /// holding a released handle.
    pub unsafe fn assign(&mut self, handle: Option<B::Handle>) {
        self.destroy();
        if let Some(handle) = handle {
            log::debug!("adopting window {:?}", handle);
        }
        self.handle = handle;
    }

    /// Releases the managed window, if any. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.handle.take() {
            log::debug!("releasing window {:?}", handle);
            // SAFETY: the handle was live and owned, and is no longer stored.
            if unsafe { self.backend.delwin(handle) } == ERR {
                log::warn!("delwin reported failure for window {:?}", handle);
            }
        }
    }

    /// Moves the managed window into a new `Window`, leaving this one empty.
    pub fn take(&mut self) -> Self {
        Self {
            backend: self.backend.clone(),
            handle: self.handle.take(),
            _screen: PhantomData,
        }
    }

    /// Gives up ownership without releasing the window.
    pub fn into_handle(mut self) -> Option<B::Handle> {
        self.handle.take()
    }

    /// The managed window.
    ///
    /// # Panics
    ///
    /// If the `Window` is empty.
    pub fn handle(&self) -> B::Handle {
        match self.handle {
            Some(handle) => handle,
            None => panic!("Window doesn't manage any window"),
        }
    }

    /// The managed window, or `None` when empty.
    pub fn try_handle(&self) -> Option<B::Handle> {
        self.handle
    }

    /// Whether no window is managed.
    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// Returns a reference to the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Forwards `op` to the managed window.
    #[inline]
    pub(crate) fn forward<R>(&self, op: impl FnOnce(&B, B::Handle) -> R) -> R {
        let handle = self.handle();
        op(&self.backend, handle)
    }

    /// Moves the cursor to (`y`, `x`), then forwards `op` only if the move
    /// succeeded. A failed move yields the failure sentinel of `R`.
    #[inline]
    pub(crate) fn forward_at<R: Sentinel>(
        &self,
        y: c_int,
        x: c_int,
        op: impl FnOnce(&B, B::Handle) -> R,
    ) -> R {
        let handle = self.handle();
        // SAFETY: `handle()` returned the live window this value owns.
        if unsafe { self.backend.wmove(handle, y, x) } == ERR {
            log::trace!("move to ({}, {}) failed on window {:?}", y, x, handle);
            return R::FAILURE;
        }
        op(&self.backend, handle)
    }

    // Input options

    /// Whether escape sequences are read without an inter-key timer.
    pub fn notimeout(&mut self, on: bool) -> c_int {
        native!(self, notimeout(on))
    }

    /// Blocking mode for reads: negative blocks, zero never blocks, positive
    /// waits that many milliseconds.
    pub fn timeout(&mut self, delay: c_int) {
        native!(self, wtimeout(delay))
    }

    // Output options

    /// Whether the next refresh repaints the whole screen.
    pub fn clearok(&mut self, on: bool) -> c_int {
        native!(self, clearok(on))
    }

    /// Sets the scrolling region to lines `top` through `bot`.
    pub fn setscrreg(&mut self, top: c_int, bot: c_int) -> c_int {
        native!(self, wsetscrreg(top, bot))
    }

    // Misc

    /// Moves the cursor (the C `move`).
    pub fn mv(&mut self, y: c_int, x: c_int) -> c_int {
        native!(self, wmove(y, x))
    }

    /// Blanks the window.
    pub fn erase(&mut self) -> c_int {
        native!(self, werase())
    }

    /// Blanks the window and repaints it from scratch on the next refresh.
    pub fn clear(&mut self) -> c_int {
        native!(self, wclear())
    }

    /// Blanks from the cursor to the bottom of the window.
    pub fn clrtobot(&mut self) -> c_int {
        native!(self, wclrtobot())
    }

    /// Blanks from the cursor to the end of the line.
    pub fn clrtoeol(&mut self) -> c_int {
        native!(self, wclrtoeol())
    }

    /// Copies the window to the terminal.
    pub fn refresh(&mut self) -> c_int {
        native!(self, wrefresh())
    }

    /// Copies the window to the virtual screen without updating the terminal.
    pub fn outrefresh(&mut self) -> c_int {
        native!(self, wnoutrefresh())
    }

    /// Marks the whole window for repainting.
    pub fn redraw(&mut self) -> c_int {
        native!(self, redrawwin())
    }

    /// Marks `num_lines` lines from `beg_line` for repainting.
    pub fn redrawln(&mut self, beg_line: c_int, num_lines: c_int) -> c_int {
        native!(self, wredrawln(beg_line, num_lines))
    }

    /// Scrolls up one line.
    pub fn scroll(&mut self) -> c_int {
        self.scroll_by(1)
    }

    /// Scrolls up `n` lines, or down when `n` is negative.
    pub fn scroll_by(&mut self, n: c_int) -> c_int {
        native!(self, wscrl(n))
    }
}

impl<B: Curses> Drop for Window<'_, B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<B: Curses> fmt::Debug for Window<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
