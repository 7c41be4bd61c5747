use crate::queue::PriorityQueue;
use crate::transceiver::{Transceiver, TransceiverError};
use crate::DataLinkError;
use log::{debug, error, warn};
use rustknx_core::cemi::MAX_FRAME_LEN;
use rustknx_core::encoding::{Reader, Writer};
use rustknx_core::{CemiFrame, IndividualAddress};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Upward callback for frames arriving from the bus.
pub trait LinkListener: Send + Sync {
    fn data_ind(&self, frame: CemiFrame);
}

const PUMP_POLL: Duration = Duration::from_millis(100);

/// The data-link service: owns the transceiver, the priority send queue,
/// and the two pump threads moving frames in each direction.
///
/// Outbound frames are accepted by [`data_req`](Self::data_req) at any time
/// between [`start`](Self::start) and [`stop`](Self::stop); the send pump
/// drains them in weighted priority order. Inbound frames are decoded on the
/// receive pump thread and handed to the registered [`LinkListener`]
/// synchronously on that thread.
pub struct DataLinkService {
    address: IndividualAddress,
    transceiver: Arc<dyn Transceiver>,
    queue: Arc<PriorityQueue<CemiFrame>>,
    listener: Arc<Mutex<Option<Arc<dyn LinkListener>>>>,
    running: Arc<AtomicBool>,
    pumps: Mutex<Option<(JoinHandle<()>, JoinHandle<()>)>>,
}

impl DataLinkService {
    pub fn new(
        address: IndividualAddress,
        transceiver: Arc<dyn Transceiver>,
        distribution: [i8; 4],
    ) -> Self {
        Self {
            address,
            transceiver,
            queue: Arc::new(PriorityQueue::new(distribution)),
            listener: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            pumps: Mutex::new(None),
        }
    }

    pub fn address(&self) -> IndividualAddress {
        self.address
    }

    /// Registers the layer above. Replaces any previous listener.
    pub fn set_listener(&self, listener: Arc<dyn LinkListener>) {
        let mut slot = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(listener);
    }

    /// Accepts an outbound frame. A null source address is stamped with the
    /// service's own individual address before queueing.
    pub fn data_req(&self, mut frame: CemiFrame) -> Result<(), DataLinkError> {
        if !self.running.load(Ordering::Acquire) {
            return Err(DataLinkError::NotStarted);
        }
        if frame.source() == IndividualAddress::NULL {
            frame.set_source(self.address);
        }
        let priority = frame.priority();
        self.queue.push(frame, priority);
        Ok(())
    }

    /// Spawns the receive and send pumps. Idempotent.
    pub fn start(&self) -> Result<(), DataLinkError> {
        let mut pumps = self.pumps.lock().unwrap_or_else(|e| e.into_inner());
        if pumps.is_some() {
            return Ok(());
        }
        self.running.store(true, Ordering::Release);

        let recv = {
            let transceiver = Arc::clone(&self.transceiver);
            let listener = Arc::clone(&self.listener);
            let running = Arc::clone(&self.running);
            std::thread::Builder::new()
                .name("knx-recv".into())
                .spawn(move || recv_pump(&*transceiver, &listener, &running))?
        };
        let send = {
            let transceiver = Arc::clone(&self.transceiver);
            let queue = Arc::clone(&self.queue);
            let running = Arc::clone(&self.running);
            std::thread::Builder::new()
                .name("knx-send".into())
                .spawn(move || send_pump(&*transceiver, &queue, &running))?
        };
        *pumps = Some((recv, send));
        Ok(())
    }

    /// Stops both pumps, draining frames already accepted for sending.
    /// Idempotent; safe to call before [`start`](Self::start).
    pub fn stop(&self) {
        let handles = {
            let mut pumps = self.pumps.lock().unwrap_or_else(|e| e.into_inner());
            self.running.store(false, Ordering::Release);
            pumps.take()
        };
        if let Some((recv, send)) = handles {
            if recv.join().is_err() {
                error!("receive pump panicked");
            }
            if send.join().is_err() {
                error!("send pump panicked");
            }
        }
        self.transceiver.cleanup();
    }
}

fn recv_pump(
    transceiver: &dyn Transceiver,
    listener: &Mutex<Option<Arc<dyn LinkListener>>>,
    running: &AtomicBool,
) {
    while running.load(Ordering::Acquire) {
        let bytes = match transceiver.recv(PUMP_POLL) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => continue,
            Err(TransceiverError::Closed) => break,
            Err(e) => {
                error!("transceiver receive failed: {e}");
                continue;
            }
        };
        let frame = match CemiFrame::decode(&mut Reader::new(&bytes)) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("dropping undecodable frame ({} bytes): {e}", bytes.len());
                continue;
            }
        };
        let upward = {
            let slot = listener.lock().unwrap_or_else(|e| e.into_inner());
            slot.clone()
        };
        match upward {
            Some(l) => l.data_ind(frame),
            None => debug!("no link listener registered, dropping frame"),
        }
    }
}

fn send_pump(
    transceiver: &dyn Transceiver,
    queue: &PriorityQueue<CemiFrame>,
    running: &AtomicBool,
) {
    while running.load(Ordering::Acquire) {
        if let Some(frame) = queue.pop_timeout(PUMP_POLL) {
            transmit(transceiver, &frame);
        }
    }
    // Frames accepted before stop still go out.
    while let Some(frame) = queue.try_pop() {
        transmit(transceiver, &frame);
    }
}

fn transmit(transceiver: &dyn Transceiver, frame: &CemiFrame) {
    let mut buf = [0u8; MAX_FRAME_LEN];
    let mut w = Writer::new(&mut buf);
    if let Err(e) = frame.encode(&mut w) {
        error!("failed to encode outbound frame: {e}");
        return;
    }
    if let Err(e) = transceiver.send(w.as_written()) {
        error!("transceiver send failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackTransceiver;
    use rustknx_core::{DestinationAddress, GroupAddress, MessageCode, Priority};
    use std::sync::mpsc;

    struct ChannelListener(Mutex<mpsc::Sender<CemiFrame>>);

    impl LinkListener for ChannelListener {
        fn data_ind(&self, frame: CemiFrame) {
            let tx = self.0.lock().unwrap();
            let _ = tx.send(frame);
        }
    }

    fn test_frame(sub: u8) -> CemiFrame {
        CemiFrame::new(
            MessageCode::LDataInd,
            Priority::Normal,
            6,
            IndividualAddress::NULL,
            DestinationAddress::Group(GroupAddress::from(0x0900 | u16::from(sub))),
            vec![0x01, 0x00, 0x81],
        )
        .unwrap()
    }

    #[test]
    fn round_trips_over_loopback_and_stamps_source() {
        let link = DataLinkService::new(
            "1.1.1".parse().unwrap(),
            Arc::new(LoopbackTransceiver::new()),
            [-1, 3, 2, 1],
        );
        let (tx, rx) = mpsc::channel();
        link.set_listener(Arc::new(ChannelListener(Mutex::new(tx))));
        link.start().unwrap();

        link.data_req(test_frame(1)).unwrap();
        let echoed = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(echoed.source(), "1.1.1".parse().unwrap());
        assert_eq!(echoed.tpdu(), &[0x00, 0x81]);

        link.stop();
    }

    #[test]
    fn data_req_before_start_is_rejected() {
        let link = DataLinkService::new(
            "1.1.1".parse().unwrap(),
            Arc::new(LoopbackTransceiver::new()),
            [-1, 3, 2, 1],
        );
        assert!(matches!(
            link.data_req(test_frame(1)),
            Err(DataLinkError::NotStarted)
        ));
    }

    #[test]
    fn stop_is_idempotent() {
        let link = DataLinkService::new(
            "1.1.1".parse().unwrap(),
            Arc::new(LoopbackTransceiver::new()),
            [-1, 3, 2, 1],
        );
        link.stop();
        link.start().unwrap();
        link.stop();
        link.stop();
    }

    #[test]
    fn undecodable_frames_are_dropped_not_fatal() {
        let transceiver = Arc::new(LoopbackTransceiver::new());
        let link = DataLinkService::new(
            "1.1.1".parse().unwrap(),
            Arc::clone(&transceiver) as Arc<dyn Transceiver>,
            [-1, 3, 2, 1],
        );
        let (tx, rx) = mpsc::channel();
        link.set_listener(Arc::new(ChannelListener(Mutex::new(tx))));
        link.start().unwrap();

        transceiver.send(&[0xFF, 0xFF]).unwrap();
        link.data_req(test_frame(2)).unwrap();
        let frame = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            frame.destination(),
            DestinationAddress::Group(GroupAddress::from(0x0902))
        );

        link.stop();
    }
}
