//! Best-effort discovery of local network details for user-facing output.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream, UdpSocket};
use std::time::Duration;

/// Returns the address of the interface that carries the default route.
///
/// Connecting a UDP socket sends no packets; it only makes the OS pick the
/// outbound interface, whose address is then read back.
pub fn lan_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

/// Host to print in URLs: the bind address if it is specific, else the LAN
/// address, else `localhost`.
pub fn display_host(bind: IpAddr) -> String {
    if !bind.is_unspecified() {
        return bind.to_string();
    }
    lan_ip().map_or_else(|| "localhost".to_string(), |ip| ip.to_string())
}

/// `true` if something on this machine already accepts connections on `port`.
pub fn port_in_use(port: u16) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpStream::connect_timeout(&addr, Duration::from_millis(500)).is_ok()
}
