//! Inbound OSC pump.
//!
//! A dedicated thread receives datagrams continuously, decodes them and
//! appends the messages to a shared FIFO. The tick loop empties the FIFO with
//! [`InboundTransport::drain`]. [`InboundTransport::stop`] joins the thread,
//! so the port is free again once it returns.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use parking_lot::Mutex;
use rosc::OscMessage;

use super::error::TransportResult;
use super::queue::{BoundedQueue, SharedQueue};
use super::socket;
use crate::codec;
use crate::core::constants::RECV_BUFFER_SIZE;

/// A live receive socket and the thread that owns it.
#[derive(Debug)]
struct Receiver {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl Receiver {
    /// Signal the thread and wait for it to drop the socket.
    fn shutdown(self) {
        self.running.store(false, Ordering::SeqCst);
        if self.thread.join().is_err() {
            warn!("VMC receive thread panicked");
        }
    }
}

/// UDP receiver feeding the protocol router.
#[derive(Debug)]
pub struct InboundTransport {
    queue: SharedQueue<OscMessage>,
    receiver: Option<Receiver>,
}

impl Default for InboundTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl InboundTransport {
    /// Create a stopped transport.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(BoundedQueue::unbounded())),
            receiver: None,
        }
    }

    /// Replace any existing receiver with one bound to `port`.
    ///
    /// The old socket is closed before the new one is bound, so restarting on
    /// the same port succeeds. On error the transport is left stopped.
    pub fn start(&mut self, port: u16) -> TransportResult<SocketAddr> {
        self.stop();

        let socket = socket::bind_receiver(port)?;
        let local_addr = socket.local_addr()?;
        let running = Arc::new(AtomicBool::new(true));

        let thread = {
            let running = Arc::clone(&running);
            let queue = Arc::clone(&self.queue);
            thread::Builder::new()
                .name("vmc-recv".into())
                .spawn(move || receive_loop(socket, queue, running))?
        };

        info!("receiving VMC on {local_addr}");
        self.receiver = Some(Receiver {
            local_addr,
            running,
            thread,
        });
        Ok(local_addr)
    }

    /// Close the socket. Safe to call when already stopped.
    ///
    /// Blocks for at most one receive poll interval.
    pub fn stop(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            let local_addr = receiver.local_addr;
            receiver.shutdown();
            info!("stopped receiving on {local_addr}");
        }
    }

    /// Take every message received since the last drain, in wire order.
    pub fn drain(&mut self) -> Vec<OscMessage> {
        if self
            .receiver
            .as_ref()
            .is_some_and(|receiver| receiver.thread.is_finished())
        {
            warn!("receive loop ended, inbound socket closed");
            if let Some(receiver) = self.receiver.take() {
                receiver.shutdown();
            }
        }
        self.queue.lock().take_all()
    }

    /// Whether a receive socket is live.
    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }

    /// Address of the live receive socket.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.receiver.as_ref().map(|receiver| receiver.local_addr)
    }
}

impl Drop for InboundTransport {
    fn drop(&mut self) {
        self.stop();
    }
}

fn receive_loop(socket: UdpSocket, queue: SharedQueue<OscMessage>, running: Arc<AtomicBool>) {
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];
    while running.load(Ordering::Relaxed) {
        match socket.recv_from(&mut buf) {
            Ok((len, from)) => match codec::decode(&buf[..len]) {
                Ok(messages) => {
                    queue.lock().extend(messages);
                }
                Err(e) => debug!("dropping datagram from {from}: {e}"),
            },
            // Read timeout, check the flag again
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {}
            Err(e) => {
                warn!("VMC receive failed: {e}");
                return;
            }
        }
    }
}
