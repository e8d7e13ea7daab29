//! Output sinks for formatted text.

use std::io::{self, Write};

/// Destination for formatted output.
///
/// `printf` hands a sink the whole rendered text in one call, and only when
/// formatting succeeded.
pub trait Sink {
    fn accept(&mut self, text: &str) -> io::Result<()>;
}

impl Sink for String {
    fn accept(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }
}

impl<F> Sink for F
where
    F: FnMut(&str),
{
    fn accept(&mut self, text: &str) -> io::Result<()> {
        self(text);
        Ok(())
    }
}

/// Adapts any [`io::Write`] into a [`Sink`].
///
/// ```
/// use chime_core::printf::IoSink;
///
/// let mut sink = IoSink::new(Vec::new());
/// chime_core::printf!(&mut sink, "%d-%s", 7, "up").unwrap();
/// assert_eq!(sink.into_inner(), b"7-up");
/// ```
#[derive(Debug)]
pub struct IoSink<W> {
    writer: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl IoSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl IoSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Sink for IoSink<W> {
    fn accept(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }
}
