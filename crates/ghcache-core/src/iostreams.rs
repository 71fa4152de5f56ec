//! Terminal output with capture support.
//!
//! Commands write report lines through [`IOStreams`] instead of `println!()`,
//! so tests can swap the real terminal for in-memory buffers.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

use console::{Style, StyledObject};

type Buffer = Arc<Mutex<Vec<u8>>>;

/// Destination of one output stream.
enum Sink {
    Stdout,
    Stderr,
    Captured(Buffer),
}

impl Sink {
    fn write_line(&self, args: fmt::Arguments<'_>) {
        // A closed pipe must not abort a cleaning run halfway through.
        let _ = match self {
            Self::Stdout => writeln!(io::stdout().lock(), "{args}"),
            Self::Stderr => writeln!(io::stderr().lock(), "{args}"),
            Self::Captured(buf) => {
                writeln!(buf.lock().unwrap_or_else(PoisonError::into_inner), "{args}")
            }
        };
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stderr => f.write_str("Stderr"),
            Self::Captured(_) => f.write_str("Captured"),
        }
    }
}

/// Output captured by [`IOStreams::test_with_output`].
#[derive(Debug, Clone)]
pub struct TestOutput {
    out: Buffer,
    err: Buffer,
}

impl TestOutput {
    /// Everything written to stdout so far.
    pub fn stdout(&self) -> String {
        read_buffer(&self.out)
    }

    /// Everything written to stderr so far.
    pub fn stderr(&self) -> String {
        read_buffer(&self.err)
    }
}

fn read_buffer(buf: &Buffer) -> String {
    String::from_utf8_lossy(&buf.lock().unwrap_or_else(PoisonError::into_inner)).into_owned()
}

/// Output streams of the running process.
#[derive(Debug)]
pub struct IOStreams {
    out: Sink,
    err: Sink,
    stdout_is_tty: bool,
    color: bool,
}

impl IOStreams {
    /// Streams bound to the real terminal.
    ///
    /// Colors are used when stdout is a terminal and `NO_COLOR` is unset.
    pub fn system() -> Self {
        let stdout_is_tty = io::stdout().is_terminal();
        Self {
            out: Sink::Stdout,
            err: Sink::Stderr,
            stdout_is_tty,
            color: stdout_is_tty && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Streams writing to in-memory buffers, without TTY or colors.
    pub fn test_with_output() -> (Self, TestOutput) {
        let output = TestOutput {
            out: Buffer::default(),
            err: Buffer::default(),
        };
        let ios = Self {
            out: Sink::Captured(output.out.clone()),
            err: Sink::Captured(output.err.clone()),
            stdout_is_tty: false,
            color: false,
        };
        (ios, output)
    }

    /// Pretend stdout is (or is not) a terminal. Colors stay as they are.
    pub fn set_stdout_tty(&mut self, is_tty: bool) {
        self.stdout_is_tty = is_tty;
    }

    /// Write formatted output and a newline to stdout.
    pub fn writeln_out(&self, args: fmt::Arguments<'_>) {
        self.out.write_line(args);
    }

    /// Write formatted output and a newline to stderr.
    pub fn writeln_err(&self, args: fmt::Arguments<'_>) {
        self.err.write_line(args);
    }

    /// Whether stdout is connected to a terminal.
    pub fn is_stdout_tty(&self) -> bool {
        self.stdout_is_tty
    }

    /// Color scheme matching these streams.
    pub fn color_scheme(&self) -> ColorScheme {
        ColorScheme {
            enabled: self.color,
        }
    }
}

/// Styling for report lines; a no-op when colors are off.
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    enabled: bool,
}

impl ColorScheme {
    fn paint(self, text: &str, style: fn(StyledObject<String>) -> StyledObject<String>) -> String {
        if self.enabled {
            style(Style::new().apply_to(text.to_string())).to_string()
        } else {
            text.to_string()
        }
    }

    /// Bold text.
    pub fn bold(self, text: &str) -> String {
        self.paint(text, StyledObject::bold)
    }

    /// Dimmed text.
    pub fn gray(self, text: &str) -> String {
        self.paint(text, StyledObject::dim)
    }

    /// Green check mark.
    pub fn success_icon(self) -> String {
        self.paint("✓", StyledObject::green)
    }

    /// Yellow exclamation mark.
    pub fn warning_icon(self) -> String {
        self.paint("!", StyledObject::yellow)
    }
}

/// Write to IOStreams stdout with newline, similar to `println!()`.
#[macro_export]
macro_rules! ios_println {
    ($ios:expr, $($arg:tt)*) => {
        $ios.writeln_out(format_args!($($arg)*))
    };
}

/// Write to IOStreams stderr with newline, similar to `eprintln!()`.
#[macro_export]
macro_rules! ios_eprintln {
    ($ios:expr, $($arg:tt)*) => {
        $ios.writeln_err(format_args!($($arg)*))
    };
}
