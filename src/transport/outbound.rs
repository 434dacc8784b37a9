//! Outbound OSC pump.
//!
//! Packets are queued from any thread into a bounded FIFO and flushed once
//! per tick by [`OutboundTransport::pump`]. Delivery is best-effort: sends
//! are non-blocking, unacknowledged and never retried.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, trace, warn};
use parking_lot::Mutex;
use rosc::OscPacket;
use tokio::net::UdpSocket;
use tokio::runtime::Handle;

use super::error::TransportResult;
use super::queue::{BoundedQueue, SharedQueue};
use super::socket;
use crate::codec;
use crate::core::constants::OUTBOUND_QUEUE_CAPACITY;

/// Cloneable handle for queueing packets from other threads.
#[derive(Debug, Clone)]
pub struct OutboundSender {
    queue: SharedQueue<OscPacket>,
}

impl OutboundSender {
    /// Queue a packet, evicting the oldest queued packets past capacity.
    pub fn enqueue(&self, packet: OscPacket) {
        let evicted = self.queue.lock().push(packet);
        if evicted > 0 {
            trace!("outbound queue full, evicted {evicted} oldest packet(s)");
        }
    }

    /// Number of packets waiting to be sent.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

/// A live send socket and its destination.
#[derive(Debug)]
struct Link {
    socket: UdpSocket,
    remote: SocketAddr,
}

/// UDP sender for the Mop consumer.
#[derive(Debug)]
pub struct OutboundTransport {
    runtime: Handle,
    sender: OutboundSender,
    link: Option<Link>,
}

impl OutboundTransport {
    /// Create a stopped transport whose socket will be registered on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self::with_capacity(runtime, OUTBOUND_QUEUE_CAPACITY)
    }

    /// Create a stopped transport with a custom queue capacity.
    pub fn with_capacity(runtime: Handle, capacity: usize) -> Self {
        Self {
            runtime,
            sender: OutboundSender {
                queue: Arc::new(Mutex::new(BoundedQueue::bounded(capacity))),
            },
            link: None,
        }
    }

    /// Create a stopped transport on the caller's runtime.
    pub fn with_current_runtime() -> TransportResult<Self> {
        Ok(Self::new(socket::current_runtime()?))
    }

    /// Replace any existing socket with one targeting `host:port`.
    ///
    /// On error the transport is left stopped and `pump` discards the queue
    /// until the next successful start.
    pub fn start(&mut self, host: &str, port: u16) -> TransportResult<SocketAddr> {
        self.stop();

        let (socket, remote) = socket::open_sender(&self.runtime, host, port)?;
        info!("sending Mop to {remote}");
        self.link = Some(Link { socket, remote });
        Ok(remote)
    }

    /// Close the socket. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(link) = self.link.take() {
            info!("stopped sending to {}", link.remote);
        }
    }

    /// Queue a packet for the next pump.
    pub fn enqueue(&self, packet: OscPacket) {
        self.sender.enqueue(packet);
    }

    /// Handle for queueing from other threads.
    pub fn sender(&self) -> OutboundSender {
        self.sender.clone()
    }

    /// Encode and send every queued packet. Returns the number sent.
    ///
    /// Any encode or send failure other than a full socket buffer closes the
    /// socket and abandons the rest of the queue.
    pub fn pump(&mut self) -> usize {
        let mut sent = 0;
        while let Some(link) = &self.link {
            let Some(packet) = self.sender.queue.lock().pop() else {
                break;
            };
            match send_packet(link, &packet) {
                Ok(()) => sent += 1,
                Err(e) if !e.is_fatal() => debug!("dropping datagram to {}: {e}", link.remote),
                Err(e) => {
                    warn!("send to {} failed, closing socket: {e}", link.remote);
                    self.stop();
                }
            }
        }

        if self.link.is_none() {
            let dropped = self.sender.queue.lock().clear();
            if dropped > 0 {
                trace!("no outbound socket, discarded {dropped} packet(s)");
            }
        }
        sent
    }

    /// Whether a send socket is live.
    pub fn is_running(&self) -> bool {
        self.link.is_some()
    }

    /// Current destination.
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.link.as_ref().map(|link| link.remote)
    }

    /// Number of packets waiting to be sent.
    pub fn pending(&self) -> usize {
        self.sender.pending()
    }
}

fn send_packet(link: &Link, packet: &OscPacket) -> TransportResult<()> {
    let bytes = codec::encode(packet)?;
    link.socket.try_send_to(&bytes, link.remote)?;
    Ok(())
}
