//! Test utilities and mocks for Netro
//!
//! This module provides common test utilities used across integration tests.

#![allow(dead_code)]

use netro::nc::LocalIo;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{duplex, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Create a test TCP listener on an available port
pub async fn create_test_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// A port nothing listens on
pub async fn closed_port() -> u16 {
    let (listener, addr) = create_test_listener().await;
    drop(listener);
    addr.port()
}

/// Output sink shared by every relay, readable from the test
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    /// Everything written so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Wait until the output contains `needle`
    pub async fn wait_for(&self, needle: &str) -> String {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let contents = self.contents();
            if contents.contains(needle) {
                return contents;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for {needle:?}, output so far: {contents:?}"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Port from the `Listening on <addr> (...)` line
    pub async fn listening_port(&self) -> u16 {
        let contents = self.wait_for("Listening on ").await;
        let line = contents
            .lines()
            .find(|l| l.starts_with("Listening on "))
            .unwrap();
        let addr = line
            .trim_start_matches("Listening on ")
            .split(' ')
            .next()
            .unwrap();
        addr.parse::<SocketAddr>().unwrap().port()
    }
}

impl AsyncWrite for SharedOutput {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// In-memory local streams: one input pipe per relay, one shared output
#[derive(Default)]
pub struct ScriptedIo {
    pub output: SharedOutput,
    inputs: Mutex<Vec<Option<DuplexStream>>>,
}

impl ScriptedIo {
    pub fn new() -> Arc<Self> {
        Arc::new(ScriptedIo::default())
    }

    /// Number of relays that opened their input so far
    pub fn inputs_opened(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }

    /// Wait until `n` relays have opened their input
    pub async fn wait_for_inputs(&self, n: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while self.inputs_opened() < n {
            assert!(tokio::time::Instant::now() < deadline, "relay {n} never started");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// The writing end of the `index`-th relay's input
    pub fn take_input(&self, index: usize) -> DuplexStream {
        self.inputs.lock().unwrap()[index].take().unwrap()
    }
}

impl LocalIo for ScriptedIo {
    type Input = DuplexStream;
    type Output = SharedOutput;

    fn input(&self) -> Self::Input {
        let (writer, reader) = duplex(8192);
        self.inputs.lock().unwrap().push(Some(writer));
        reader
    }

    fn output(&self) -> Self::Output {
        self.output.clone()
    }
}

/// Start a one-shot HTTP proxy that answers the first CONNECT with
/// `response` and returns the request head it received
pub async fn spawn_fake_proxy(response: &'static [u8]) -> (SocketAddr, JoinHandle<String>) {
    let (listener, addr) = create_test_listener().await;
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut byte = [0u8; 1];
        while !head.ends_with(b"\r\n\r\n") {
            if stream.read(&mut byte).await.unwrap() == 0 {
                break;
            }
            head.push(byte[0]);
        }
        stream.write_all(response).await.unwrap();

        // Hold the tunnel open until the client lets go
        let mut rest = Vec::new();
        let _ = stream.read_to_end(&mut rest).await;
        String::from_utf8(head).unwrap()
    });
    (addr, handle)
}

/// Start a proxy that accepts one connection and never answers
pub async fn spawn_silent_proxy() -> (SocketAddr, JoinHandle<()>) {
    let (listener, addr) = create_test_listener().await;
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let _ = stream.read_to_end(&mut request).await;
    });
    (addr, handle)
}
