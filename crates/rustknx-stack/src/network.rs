use crate::StackError;
use log::{debug, warn};
use rustknx_core::{
    AddressError, CemiFrame, DestinationAddress, GroupAddress, IndividualAddress, MessageCode,
    Priority,
};
use rustknx_datalink::{DataLinkService, LinkListener};
use std::sync::{Arc, Mutex};

/// Upward callback for group-addressed data arriving from the link.
pub trait NetworkListener: Send + Sync {
    fn group_data_ind(
        &self,
        source: IndividualAddress,
        group: GroupAddress,
        priority: Priority,
        tsdu: &[u8],
    );
}

/// Network layer for group communication.
///
/// Downward it wraps a TSDU into a cEMI frame and hands it to the link;
/// upward it filters for group-addressed frames and strips the NPDU length
/// octet. Individually-addressed and broadcast traffic is dropped here.
pub struct NetworkGroupService {
    link: Arc<DataLinkService>,
    hop_count: u8,
    listener: Mutex<Option<Arc<dyn NetworkListener>>>,
}

impl NetworkGroupService {
    pub fn new(link: Arc<DataLinkService>, hop_count: u8) -> Result<Self, StackError> {
        if !(1..=6).contains(&hop_count) {
            return Err(StackError::InvalidHopCount(hop_count));
        }
        Ok(Self {
            link,
            hop_count,
            listener: Mutex::new(None),
        })
    }

    pub fn set_listener(&self, listener: Arc<dyn NetworkListener>) {
        let mut slot = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(listener);
    }

    /// Sends `tsdu` to `group`. The source address is left null for the
    /// link to stamp.
    pub fn group_data_req(
        &self,
        priority: Priority,
        group: GroupAddress,
        tsdu: &[u8],
    ) -> Result<(), StackError> {
        if group.is_null() {
            return Err(StackError::Address(AddressError::NullDestination));
        }
        if tsdu.is_empty() {
            return Err(StackError::EmptyPayload);
        }
        let mut npdu = Vec::with_capacity(1 + tsdu.len());
        npdu.push((tsdu.len() - 1) as u8);
        npdu.extend_from_slice(tsdu);
        // Outbound group requests are framed as L_Data.ind, the code peers
        // expect on the routing multicast.
        let frame = CemiFrame::new(
            MessageCode::LDataInd,
            priority,
            self.hop_count,
            IndividualAddress::NULL,
            DestinationAddress::Group(group),
            npdu,
        )?;
        self.link.data_req(frame)?;
        Ok(())
    }
}

impl LinkListener for NetworkGroupService {
    fn data_ind(&self, frame: CemiFrame) {
        let group = match frame.destination() {
            DestinationAddress::Group(group) if !group.is_null() => group,
            other => {
                debug!("ignoring non-group frame to {other}");
                return;
            }
        };
        let upward = {
            let slot = self.listener.lock().unwrap_or_else(|e| e.into_inner());
            slot.clone()
        };
        match upward {
            Some(l) => l.group_data_ind(frame.source(), group, frame.priority(), frame.tpdu()),
            None => warn!("no network listener registered, dropping frame for {group}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustknx_datalink::LoopbackTransceiver;

    fn link() -> Arc<DataLinkService> {
        Arc::new(DataLinkService::new(
            "1.1.1".parse().unwrap(),
            Arc::new(LoopbackTransceiver::new()),
            [-1, 3, 2, 1],
        ))
    }

    #[test]
    fn rejects_hop_count_outside_range() {
        assert!(matches!(
            NetworkGroupService::new(link(), 0),
            Err(StackError::InvalidHopCount(0))
        ));
        assert!(matches!(
            NetworkGroupService::new(link(), 7),
            Err(StackError::InvalidHopCount(7))
        ));
        assert!(NetworkGroupService::new(link(), 6).is_ok());
    }

    #[test]
    fn rejects_null_group_destination() {
        let network = NetworkGroupService::new(link(), 6).unwrap();
        assert!(matches!(
            network.group_data_req(Priority::Low, GroupAddress::NULL, &[0x00, 0x81]),
            Err(StackError::Address(AddressError::NullDestination))
        ));
    }

    #[test]
    fn rejects_empty_tsdu() {
        let network = NetworkGroupService::new(link(), 6).unwrap();
        assert!(matches!(
            network.group_data_req(Priority::Low, "1/1/1".parse().unwrap(), &[]),
            Err(StackError::EmptyPayload)
        ));
    }
}
