//! Datagram echo handler for UDP listen mode

use crate::error::{NetroError, Result};
use crate::nc::stdio::write_line;
use crate::transport::display_addr;
use std::convert::Infallible;
use tokio::io::AsyncWrite;
use tokio::net::UdpSocket;
use tracing::warn;

/// Answer every datagram on `socket` with `ack`, logging each one to `out`
///
/// Datagrams longer than `buffer_size` are truncated. Any receive or send
/// error ends the handler.
pub async fn echo_datagrams<W>(
    socket: &UdpSocket,
    out: &mut W,
    buffer_size: usize,
    ack: &[u8],
) -> Result<Infallible>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; buffer_size.max(1)];

    loop {
        let (n, from) = socket
            .recv_from(&mut buf)
            .await
            .map_err(NetroError::DatagramRecv)?;
        let peer = display_addr(from);

        if n == buf.len() {
            warn!(
                "Datagram from {} filled the {}-byte buffer and may have been truncated",
                peer, n
            );
        }

        let payload = String::from_utf8_lossy(&buf[..n]);
        write_line(
            out,
            &format!("Received {} bytes from {}: {}", n, peer, payload.trim_end()),
        )
        .await?;

        socket
            .send_to(ack, from)
            .await
            .map_err(|source| NetroError::DatagramSend {
                peer: peer.to_string(),
                source,
            })?;
    }
}
