//! Connection listener
//!
//! Binds on all interfaces and either relays every accepted TCP connection
//! to the local streams or runs the datagram echo handler for UDP.

use super::relay::relay;
use super::stdio::{write_line, LocalIo};
use super::udp::echo_datagrams;
use super::{ListenOptions, ListenRequest};
use crate::error::{NetroError, Result};
use crate::transport::{bind_tcp, bind_udp, display_addr, Acceptor, Protocol};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Run the listener described by `request` until it fails
///
/// Never returns successfully: a TCP listener ends only on the first accept
/// error and a UDP listener only on the first datagram error.
pub async fn listen<L: LocalIo>(
    request: &ListenRequest,
    options: &ListenOptions,
    local: Arc<L>,
) -> Result<Infallible> {
    match request.protocol {
        Protocol::Tcp => {
            let listener = bind_tcp(request.port).await?;
            announce(&*local, listener.local_addr()?, Protocol::Tcp).await?;
            serve_tcp(listener, local, options.relay_buffer_size).await
        }
        Protocol::Udp => {
            let socket = bind_udp(request.port).await?;
            announce(&*local, socket.local_addr()?, Protocol::Udp).await?;
            let mut out = local.output();
            echo_datagrams(&socket, &mut out, options.udp_buffer_size, &options.udp_ack).await
        }
    }
}

async fn announce<L: LocalIo>(local: &L, addr: SocketAddr, protocol: Protocol) -> Result<()> {
    info!("Listening on {} ({})", addr, protocol.label());
    let mut out = local.output();
    write_line(&mut out, &format!("Listening on {} ({})", addr, protocol.label())).await?;
    Ok(())
}

/// Accept connections forever, relaying each one on its own task
///
/// There is no limit on concurrent connections. The first accept error
/// ends the loop.
pub async fn serve_tcp<A, L>(mut acceptor: A, local: Arc<L>, buffer_size: usize) -> Result<Infallible>
where
    A: Acceptor,
    L: LocalIo,
{
    loop {
        let (stream, peer) = match acceptor.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Accept failed, stopping listener: {}", e);
                return Err(NetroError::Accept(e));
            }
        };

        let local = local.clone();
        tokio::spawn(async move {
            handle_connection(stream, display_addr(peer), &*local, buffer_size).await;
        });
    }
}

async fn handle_connection<S, L>(stream: S, peer: SocketAddr, local: &L, buffer_size: usize)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Send + 'static,
    L: LocalIo,
{
    let mut output = local.output();
    if let Err(e) = write_line(&mut output, &format!("Accepted connection from {}", peer)).await {
        warn!("Failed to write to local output: {}", e);
    }
    debug!("Relaying connection from {}", peer);

    let stats = relay(stream, local.input(), output, buffer_size).await;
    debug!(
        "Connection from {} closed: {} bytes sent, {} bytes received",
        peer, stats.sent, stats.received
    );
}
