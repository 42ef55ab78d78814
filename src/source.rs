use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Where the producer reads lines from.
pub enum Input {
    Path(PathBuf),
    Reader {
        name: String,
        reader: Box<dyn BufRead + Send>,
    },
}

impl Input {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Input::Path(path.into())
    }

    pub fn reader(name: impl Into<String>, reader: impl BufRead + Send + 'static) -> Self {
        Input::Reader {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// In-memory input, mostly for tests and benches.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut text = String::new();
        for line in lines {
            text.push_str(line.as_ref());
            text.push('\n');
        }
        Self::reader("<memory>", io::Cursor::new(text.into_bytes()))
    }

    pub fn name(&self) -> String {
        match self {
            Input::Path(path) => path.display().to_string(),
            Input::Reader { name, .. } => name.clone(),
        }
    }

    pub fn open(self) -> Result<(String, Box<dyn BufRead + Send>), SourceError> {
        match self {
            Input::Path(path) => {
                let name = path.display().to_string();
                match File::open(&path) {
                    Ok(file) => {
                        let reader: Box<dyn BufRead + Send> =
                            Box::new(BufReader::with_capacity(1 << 16, file));
                        Ok((name, reader))
                    }
                    Err(source) => Err(SourceError::open(name, source)),
                }
            }
            Input::Reader { name, reader } => Ok((name, reader)),
        }
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Input({})", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Open,
    Read,
}

/// The input could not be opened, or stopped being readable part way.
#[derive(Debug)]
pub struct SourceError {
    pub name: String,
    pub kind: SourceErrorKind,
    pub source: io::Error,
}

impl SourceError {
    pub fn open(name: String, source: io::Error) -> Self {
        Self {
            name,
            kind: SourceErrorKind::Open,
            source,
        }
    }

    pub fn read(name: String, source: io::Error) -> Self {
        Self {
            name,
            kind: SourceErrorKind::Read,
            source,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SourceErrorKind::Open => write!(f, "No se pudo abrir el archivo: {}", self.name),
            SourceErrorKind::Read => {
                write!(f, "Error leyendo el archivo {}: {}", self.name, self.source)
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Reads the next line without its `\n` or `\r\n` terminator.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the read,
/// so a corrupt line reaches the classifier (and is rejected there) instead
/// of ending the input.
pub fn next_line<R: BufRead + ?Sized>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}
