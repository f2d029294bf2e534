//! Console mirror written to `run.log`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only log file whose writes are echoed to stdout.
///
/// Opened once per run. Meant as the pipe target of the process logger so
/// every reported line reaches both the console and the file.
#[derive(Debug)]
pub struct RunLog {
    file: File,
    path: PathBuf,
    echo: bool,
}

impl RunLog {
    /// Open (or create) the log in append mode, echoing to stdout.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            file,
            path,
            echo: true,
        })
    }

    /// Disable the stdout echo.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one line to both sinks.
    pub fn cprint(&mut self, line: &str) -> io::Result<()> {
        writeln!(self, "{}", line)?;
        self.flush()
    }
}

impl Write for RunLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.echo {
            io::stdout().write_all(buf)?;
        }
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.echo {
            io::stdout().flush()?;
        }
        self.file.flush()
    }
}
