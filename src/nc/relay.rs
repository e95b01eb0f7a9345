//! Bidirectional relay between an accepted socket and the local streams
//!
//! Each accepted connection gets one relay made of two pumps:
//!
//! - local input -> socket runs on its own task and ends on input EOF or
//!   any read/write error, without telling the other direction;
//! - socket -> local output runs inline and decides the relay's lifetime.
//!
//! When the socket -> output pump ends, the input pump is aborted and the
//! socket is closed, so neither pump outlives the connection.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Byte counts of a finished relay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes copied from the local input to the socket
    pub sent: u64,
    /// Bytes copied from the socket to the local output
    pub received: u64,
}

/// Relay between `socket` and the local `input`/`output` until the socket
/// side ends
pub async fn relay<S, I, O>(socket: S, input: I, mut output: O, buffer_size: usize) -> RelayStats
where
    S: AsyncRead + AsyncWrite + Send + 'static,
    I: AsyncRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin,
{
    let (mut sock_read, mut sock_write) = tokio::io::split(socket);
    let sent = Arc::new(AtomicU64::new(0));
    let received = AtomicU64::new(0);

    let upstream = {
        let sent = sent.clone();
        tokio::spawn(async move {
            let mut input = input;
            match pump(&mut input, &mut sock_write, buffer_size, &sent).await {
                Ok(()) => debug!("local input -> socket finished"),
                Err(e) => debug!("local input -> socket error: {}", e),
            }
        })
    };

    match pump(&mut sock_read, &mut output, buffer_size, &received).await {
        Ok(()) => debug!("socket -> local output finished"),
        Err(e) => debug!("socket -> local output error: {}", e),
    }

    // The input pump may still be parked on a read; it must not outlive the
    // socket it writes to.
    upstream.abort();
    let _ = upstream.await;

    RelayStats {
        sent: sent.load(Ordering::Relaxed),
        received: received.load(Ordering::Relaxed),
    }
}

/// Copy `reader` into `writer` chunk by chunk until EOF, flushing after
/// every chunk and adding each chunk's size to `transferred`
pub async fn pump<R, W>(
    reader: &mut R,
    writer: &mut W,
    buffer_size: usize,
    transferred: &AtomicU64,
) -> io::Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; buffer_size.max(1)];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        writer.write_all(&buf[..n]).await?;
        writer.flush().await?;
        transferred.fetch_add(n as u64, Ordering::Relaxed);
    }
}
