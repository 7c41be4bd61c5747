use crate::transceiver::{Transceiver, TransceiverError};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// In-process medium: every sent frame is echoed back to the receiver.
///
/// Stands in for a bus in tests and single-process demos. A stack wired to a
/// loopback hears its own transmissions, so a group write comes back as a
/// group indication on the same stack.
#[derive(Default)]
pub struct LoopbackTransceiver {
    frames: Mutex<VecDeque<Vec<u8>>>,
    arrived: Condvar,
}

impl LoopbackTransceiver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transceiver for LoopbackTransceiver {
    fn send(&self, frame: &[u8]) -> Result<(), TransceiverError> {
        let mut frames = self.frames.lock().unwrap_or_else(|e| e.into_inner());
        frames.push_back(frame.to_vec());
        self.arrived.notify_one();
        Ok(())
    }

    fn recv(&self, timeout: Duration) -> Result<Option<Vec<u8>>, TransceiverError> {
        let deadline = Instant::now() + timeout;
        let mut frames = self.frames.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(frame) = frames.pop_front() {
                return Ok(Some(frame));
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            let (guard, _) = self
                .arrived
                .wait_timeout(frames, remaining)
                .unwrap_or_else(|e| e.into_inner());
            frames = guard;
        }
    }

    fn cleanup(&self) {
        self.arrived.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_sent_frames_in_order() {
        let t = LoopbackTransceiver::new();
        t.send(&[0x01]).unwrap();
        t.send(&[0x02]).unwrap();
        assert_eq!(
            t.recv(Duration::from_millis(10)).unwrap(),
            Some(vec![0x01])
        );
        assert_eq!(
            t.recv(Duration::from_millis(10)).unwrap(),
            Some(vec![0x02])
        );
        assert_eq!(t.recv(Duration::from_millis(10)).unwrap(), None);
    }
}
