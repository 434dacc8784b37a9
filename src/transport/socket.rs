//! UDP socket setup for the two pumps.
//!
//! The receive socket stays blocking with a short read timeout and is owned
//! by the receive thread. The send socket is created with `std::net`,
//! switched to non-blocking mode and registered with the supplied tokio
//! runtime, so that the tick loop can open it synchronously without awaiting.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};

use tokio::net::UdpSocket;
use tokio::runtime::Handle;

use super::error::{TransportError, TransportResult};
use crate::core::constants::RECV_POLL_INTERVAL;

/// Bind a receive socket on every interface.
///
/// Reads time out after [`RECV_POLL_INTERVAL`] so the owning thread can
/// notice a stop request.
pub fn bind_receiver(port: u16) -> TransportResult<std::net::UdpSocket> {
    let bind_err = |source| TransportError::Bind { port, source };

    let socket = std::net::UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
        .map_err(bind_err)?;
    socket
        .set_read_timeout(Some(RECV_POLL_INTERVAL))
        .map_err(bind_err)?;
    Ok(socket)
}

/// Resolve a destination to its first socket address.
pub fn resolve(host: &str, port: u16) -> TransportResult<SocketAddr> {
    let resolve_err = || TransportError::Resolve {
        host: host.to_string(),
        port,
    };
    (host, port)
        .to_socket_addrs()
        .map_err(|_| resolve_err())?
        .next()
        .ok_or_else(resolve_err)
}

/// Open an ephemeral send socket in the destination's address family.
pub fn open_sender(runtime: &Handle, host: &str, port: u16) -> TransportResult<(UdpSocket, SocketAddr)> {
    let remote = resolve(host, port)?;
    let connect_err = |source| TransportError::Connect {
        host: host.to_string(),
        port,
        source,
    };

    let local: SocketAddr = if remote.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = std::net::UdpSocket::bind(local).map_err(connect_err)?;
    socket.set_nonblocking(true).map_err(connect_err)?;

    let _guard = runtime.enter();
    let socket = UdpSocket::from_std(socket).map_err(connect_err)?;
    Ok((socket, remote))
}

/// Handle of the runtime the caller is running on.
pub fn current_runtime() -> TransportResult<Handle> {
    Handle::try_current().map_err(|_| TransportError::NoRuntime)
}
