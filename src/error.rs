use miette::{Diagnostic, SourceSpan};
use std::{
    error::Error,
    fmt::{Display, Formatter, Result},
};

/// Failures raised while acquiring curses resources.
///
/// Forwarded window operations never produce these; they return the native
/// `OK`/`ERR` sentinels instead.
#[derive(Debug, Diagnostic)]
pub enum CursesError {
    /// `newwin` returned NULL for the requested geometry.
    #[diagnostic(
        code(ncwindow::window_init),
        url(docsrs),
        help("the geometry must fit inside the terminal and be non-negative")
    )]
    WindowInit {
        nlines: i32,
        ncols: i32,
        begin_y: i32,
        begin_x: i32,
        #[source_code]
        src: String,
        #[label("allocation failed here")]
        err_span: SourceSpan,
    },

    #[diagnostic(code(ncwindow::screen_init), url(docsrs))]
    ScreenInit {
        #[source_code]
        src: String,
        #[label("initialization failed here")]
        err_span: SourceSpan,
        msg: String,
    },

    #[diagnostic(code(ncwindow::terminal), url(docsrs))]
    Terminal {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        err_span: SourceSpan,
        msg: String,
    },
}

pub type CursesResult<T> = miette::Result<T>;

impl Display for CursesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CursesError::WindowInit {
                nlines,
                ncols,
                begin_y,
                begin_x,
                ..
            } => write!(
                f,
                "Window initialization error: cannot allocate {}x{} window at ({}, {})",
                nlines, ncols, begin_y, begin_x
            ),
            CursesError::ScreenInit { msg, .. } => write!(f, "Screen initialization error: {}", msg),
            CursesError::Terminal { msg, .. } => write!(f, "Terminal error: {}", msg),
        }
    }
}

impl Error for CursesError {}

impl CursesError {
    /// Builds the error for a failed `newwin` call, labelling the call itself.
    pub fn window_init(nlines: i32, ncols: i32, begin_y: i32, begin_x: i32) -> Self {
        let src = format!("newwin({}, {}, {}, {})", nlines, ncols, begin_y, begin_x);
        let err_span = (0, src.len()).into();
        Self::WindowInit {
            nlines,
            ncols,
            begin_y,
            begin_x,
            src,
            err_span,
        }
    }

    pub fn screen_init(
        src: impl Into<String>,
        err_span: impl Into<SourceSpan>,
        msg: impl Into<String>,
    ) -> Self {
        Self::ScreenInit {
            src: src.into(),
            err_span: err_span.into(),
            msg: msg.into(),
        }
    }

    pub fn terminal(
        src: impl Into<String>,
        err_span: impl Into<SourceSpan>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Terminal {
            src: src.into(),
            err_span: err_span.into(),
            msg: msg.into(),
        }
    }
}
