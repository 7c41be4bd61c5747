use crate::network::{NetworkGroupService, NetworkListener};
use crate::StackError;
use log::warn;
use rustknx_core::{GroupAddress, IndividualAddress, Priority};
use std::sync::{Arc, Mutex};

/// TPCI for unnumbered data, the only transport service used on group
/// addresses.
pub const TPCI_UNNUMBERED_DATA: u8 = 0x00;
/// TPCI for numbered (connection-oriented) data.
pub const TPCI_NUMBERED_DATA: u8 = 0x40;
const TPCI_MASK: u8 = 0xC0;

/// Upward callback carrying an ASDU with the TPCI bits already cleared.
pub trait TransportListener: Send + Sync {
    fn group_data_ind(
        &self,
        source: IndividualAddress,
        group: GroupAddress,
        priority: Priority,
        asdu: &[u8],
    );
}

/// Transport layer for group communication.
///
/// Group traffic is connectionless: downward the layer stamps the unnumbered
/// data TPCI onto the first ASDU octet, upward it accepts only unnumbered
/// data and masks the TPCI out before forwarding. Numbered and control TPDUs
/// belong to point-to-point connections and are dropped with a warning.
pub struct TransportGroupService {
    network: Arc<NetworkGroupService>,
    listener: Mutex<Option<Arc<dyn TransportListener>>>,
}

impl TransportGroupService {
    pub fn new(network: Arc<NetworkGroupService>) -> Self {
        Self {
            network,
            listener: Mutex::new(None),
        }
    }

    pub fn set_listener(&self, listener: Arc<dyn TransportListener>) {
        let mut slot = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(listener);
    }

    pub fn group_data_req(
        &self,
        priority: Priority,
        group: GroupAddress,
        asdu: &[u8],
    ) -> Result<(), StackError> {
        if asdu.is_empty() {
            return Err(StackError::EmptyPayload);
        }
        let mut tsdu = asdu.to_vec();
        tsdu[0] = (tsdu[0] & !TPCI_MASK) | TPCI_UNNUMBERED_DATA;
        self.network.group_data_req(priority, group, &tsdu)
    }
}

impl NetworkListener for TransportGroupService {
    fn group_data_ind(
        &self,
        source: IndividualAddress,
        group: GroupAddress,
        priority: Priority,
        tsdu: &[u8],
    ) {
        let Some(&tpci_octet) = tsdu.first() else {
            warn!("empty TSDU for {group} from {source}");
            return;
        };
        match tpci_octet & TPCI_MASK {
            TPCI_UNNUMBERED_DATA => {}
            TPCI_NUMBERED_DATA => {
                warn!("numbered data TPDU for group {group} from {source}, dropping");
                return;
            }
            other => {
                warn!("unsupported TPCI 0x{other:02x} for group {group} from {source}, dropping");
                return;
            }
        }
        let mut asdu = tsdu.to_vec();
        asdu[0] &= !TPCI_MASK;
        let upward = {
            let slot = self.listener.lock().unwrap_or_else(|e| e.into_inner());
            slot.clone()
        };
        match upward {
            Some(l) => l.group_data_ind(source, group, priority, &asdu),
            None => warn!("no transport listener registered, dropping frame for {group}"),
        }
    }
}
