use crate::transceiver::{Transceiver, TransceiverError};
use rustknx_core::cemi::MAX_FRAME_LEN;
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default KNXnet/IP routing multicast group.
pub const DEFAULT_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(224, 0, 23, 12);
/// Default KNXnet/IP port.
pub const DEFAULT_PORT: u16 = 3671;

/// UDP multicast transceiver carrying raw cEMI frames.
///
/// Every member of the multicast group sees every frame, including (with
/// multicast loopback enabled, the OS default) the sender itself.
pub struct UdpTransceiver {
    socket: UdpSocket,
    group: SocketAddrV4,
    closed: AtomicBool,
}

impl UdpTransceiver {
    /// Joins the default routing group `224.0.23.12:3671`.
    pub fn multicast_default() -> Result<Self, TransceiverError> {
        Self::multicast(SocketAddrV4::new(DEFAULT_MULTICAST_ADDR, DEFAULT_PORT))
    }

    /// Joins `group` on all interfaces.
    pub fn multicast(group: SocketAddrV4) -> Result<Self, TransceiverError> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, group.port()))?;
        socket.join_multicast_v4(group.ip(), &Ipv4Addr::UNSPECIFIED)?;
        Ok(Self {
            socket,
            group,
            closed: AtomicBool::new(false),
        })
    }

    pub fn group(&self) -> SocketAddrV4 {
        self.group
    }
}

impl Transceiver for UdpTransceiver {
    fn send(&self, frame: &[u8]) -> Result<(), TransceiverError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransceiverError::Closed);
        }
        self.socket.send_to(frame, self.group)?;
        Ok(())
    }

    fn recv(&self, timeout: Duration) -> Result<Option<Vec<u8>>, TransceiverError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransceiverError::Closed);
        }
        self.socket.set_read_timeout(Some(timeout))?;
        let mut buf = [0u8; MAX_FRAME_LEN];
        match self.socket.recv_from(&mut buf) {
            Ok((len, _peer)) => Ok(Some(buf[..len].to_vec())),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(TransceiverError::Io(e)),
        }
    }

    fn cleanup(&self) {
        self.closed.store(true, Ordering::Release);
        let _ = self.socket.leave_multicast_v4(self.group.ip(), &Ipv4Addr::UNSPECIFIED);
    }
}
