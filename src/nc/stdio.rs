//! Local input/output streams for listen mode

use std::io;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Provider of the process-local input and output streams
///
/// Every accepted connection takes its own handles. All handles refer to
/// the same underlying streams, so concurrent relays compete for input
/// chunks and interleave their output.
pub trait LocalIo: Send + Sync + 'static {
    /// Local input stream type
    type Input: AsyncRead + Unpin + Send + 'static;
    /// Local output stream type
    type Output: AsyncWrite + Unpin + Send + 'static;

    /// A handle on the local input
    fn input(&self) -> Self::Input;

    /// A handle on the local output
    fn output(&self) -> Self::Output;
}

/// The process's standard input and output
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdio;

impl LocalIo for Stdio {
    type Input = tokio::io::Stdin;
    type Output = tokio::io::Stdout;

    fn input(&self) -> Self::Input {
        tokio::io::stdin()
    }

    fn output(&self) -> Self::Output {
        tokio::io::stdout()
    }
}

/// Write one status line in a single write and flush it
pub async fn write_line<W>(out: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    out.write_all(buf.as_bytes()).await?;
    out.flush().await
}
