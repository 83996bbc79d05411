#![deny(unsafe_op_in_unsafe_fn)]

//! # ncwindow
//!
//! Ownership-safe windows over the ncurses C API.
//!
//! ## Overview
//!
//! The crate is a thin layer with a few main concepts:
//!
//! - **Single Ownership**: a [`Window`] owns one curses window and releases it exactly once
//! - **Move-Only Transfer**: no `Clone`; [`Window::take`] moves a window out and leaves the source empty
//! - **Faithful Forwarding**: every operation forwards unchanged and returns the native `OK`/`ERR` sentinel
//! - **Checked Positioning**: `mv*` operations only act when the cursor move succeeded
//! - **Scoped Sessions**: a [`Window`] borrows the [`Screen`] it came from and cannot outlive it
//!
//! ## Core Components
//!
//! - [`Window`]: Owner of one curses window, with all window operations
//! - [`Screen`]: Session guard pairing `initscr` with `endwin`
//! - [`Curses`]: The native boundary a backend implements
//! - [`CursesError`]: Errors raised while acquiring windows or the screen
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use ncwindow::{printw, Ncurses, Screen};
//!
//! fn main() -> ncwindow::CursesResult<()> {
//!     let screen = Screen::init(Ncurses)?;
//!     let mut win = screen.new_window(5, 30, 2, 4)?;
//!
//!     win.mvaddstr(1, 2, "Hello, curses!");
//!     printw!(win, " ({} key to quit)", "any");
//!     win.refresh();
//!     win.getch();
//!
//!     // `win` borrows `screen`, so it is released first
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `backend`: The curses boundary trait and native sentinels
//! - `error`: Error types and handling
//! - `ffi`: System ncurses bindings (feature `ncurses`)
//! - `input`: Key, line and read-back operations
//! - `output`: Character, string and cell-run output
//! - `screen`: Session lifecycle
//! - `testing`: Recording backend (feature `test-helpers`)
//! - `window`: Window ownership and forwarding
//!
//! ## Error Handling
//!
//! Acquiring a window or the screen returns [`CursesResult`], with
//! [`CursesError`] diagnostics via `miette`. Every other operation returns
//! the library's own sentinel, exactly as the C call would. Using an empty
//! [`Window`] is a programming error and panics.
//!
//! ## Threading
//!
//! ncurses is not thread-safe. Windows on the native backend hold raw
//! pointers and are neither `Send` nor `Sync`.

/// Re-exports of core components
pub use backend::{chtype, Curses, Sentinel, ERR, OK, SCAN_BUFFER_LEN};
pub use error::{CursesError, CursesResult};
#[cfg(feature = "ncurses")]
pub use ffi::{NativeWindow, Ncurses, WINDOW};
pub use screen::{Screen, ScreenOptions};
pub use window::Window;

/// Curses boundary
pub mod backend;
/// Error types and handling
pub mod error;
/// System ncurses bindings
#[cfg(feature = "ncurses")]
pub mod ffi;
/// Input operations
pub mod input;
/// Output operations
pub mod output;
/// Session lifecycle
pub mod screen;
/// Recording backend for tests
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
/// Window ownership
pub mod window;
