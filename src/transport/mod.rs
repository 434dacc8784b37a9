//! Transport layer.
//!
//! Two independent UDP pumps connect the tick loop to the network:
//!
//! - **Inbound**: [`InboundTransport`] receives on a dedicated thread and
//!   hands decoded messages to the tick loop through a locked FIFO
//! - **Outbound**: [`OutboundTransport`] accepts packets from any thread into
//!   a bounded drop-oldest FIFO and flushes it once per tick
//!
//! ```text
//! ┌──────────────┐  datagram  ┌─────────────┐  drain()  ┌──────────────┐
//! │ VMC sender   │ ─────────► │ recv thread │ ────────► │              │
//! └──────────────┘            └─────────────┘   FIFO    │  tick loop   │
//! ┌──────────────┐  datagram  ┌─────────────┐  pump()   │              │
//! │ Mop consumer │ ◄───────── │ send socket │ ◄──────── │              │
//! └──────────────┘            └─────────────┘ FIFO ≤100 └──────────────┘
//! ```
//!
//! A transport's socket is either fully live or absent; every failure
//! leaves it absent until the next `start`.

mod error;
mod inbound;
mod outbound;
mod queue;
mod socket;

pub use error::*;
pub use inbound::InboundTransport;
pub use outbound::{OutboundSender, OutboundTransport};
pub use queue::{BoundedQueue, SharedQueue};
