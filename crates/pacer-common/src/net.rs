//! Datagram-socket helpers shared by all three peers: thin wrappers over
//! `std::net` for binding and addressing on the loopback interface.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

/// Binds a UDP socket on the loopback interface at `port`.
pub fn bind_loopback(port: u16) -> std::io::Result<UdpSocket> {
    UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))
}

/// The loopback destination address for `port`.
pub fn loopback_addr(port: u16) -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))
}
