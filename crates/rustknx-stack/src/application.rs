use crate::transport::{TransportGroupService, TransportListener};
use crate::StackError;
use log::{debug, warn};
use rustknx_core::{AddressError, Flags, GroupAddress, IndividualAddress, Priority};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// APCI for A_GroupValue_Read.
pub const APCI_GROUP_READ: u8 = 0x00;
/// APCI for A_GroupValue_Response.
pub const APCI_GROUP_RESPONSE: u8 = 0x40;
/// APCI for A_GroupValue_Write.
pub const APCI_GROUP_WRITE: u8 = 0x80;
const APCI_MASK: u8 = 0xC0;

/// Callbacks for group services arriving on one group address.
///
/// Handlers run synchronously on the receive pump thread; a handler error is
/// logged and does not stop delivery to the remaining listeners.
pub trait GroupListener: Send + Sync {
    fn on_write(&self, source: IndividualAddress, data: &[u8]) -> Result<(), StackError>;
    fn on_read(&self, source: IndividualAddress) -> Result<(), StackError>;
    fn on_response(&self, source: IndividualAddress, data: &[u8]) -> Result<(), StackError>;

    /// Communication flags the listener operates under, if any.
    fn flags(&self) -> Option<Flags> {
        None
    }
}

/// One subscribed group address: the sending surface for its subscribers
/// and the fan-out point for indications.
pub struct Group {
    gad: GroupAddress,
    transport: Arc<TransportGroupService>,
    listeners: Mutex<Vec<Arc<dyn GroupListener>>>,
}

impl Group {
    fn new(gad: GroupAddress, transport: Arc<TransportGroupService>) -> Self {
        Self {
            gad,
            transport,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn gad(&self) -> GroupAddress {
        self.gad
    }

    fn add_listener(&self, listener: Arc<dyn GroupListener>) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.push(listener);
    }

    /// Sends A_GroupValue_Write. A `type_size` of zero packs the single
    /// payload byte into the low six bits of the APCI octet.
    pub fn write(
        &self,
        priority: Priority,
        frame: &[u8],
        type_size: usize,
    ) -> Result<(), StackError> {
        self.send_value(priority, APCI_GROUP_WRITE, frame, type_size)
    }

    /// Sends A_GroupValue_Read.
    pub fn read(&self, priority: Priority) -> Result<(), StackError> {
        self.transport
            .group_data_req(priority, self.gad, &[0x00, APCI_GROUP_READ])
    }

    /// Sends A_GroupValue_Response.
    pub fn response(
        &self,
        priority: Priority,
        frame: &[u8],
        type_size: usize,
    ) -> Result<(), StackError> {
        self.send_value(priority, APCI_GROUP_RESPONSE, frame, type_size)
    }

    fn send_value(
        &self,
        priority: Priority,
        apci: u8,
        frame: &[u8],
        type_size: usize,
    ) -> Result<(), StackError> {
        let apdu = if type_size == 0 {
            let inline = frame.first().copied().unwrap_or(0) & 0x3F;
            vec![0x00, apci | inline]
        } else {
            let mut apdu = Vec::with_capacity(2 + frame.len());
            apdu.push(0x00);
            apdu.push(apci);
            apdu.extend_from_slice(frame);
            apdu
        };
        self.transport.group_data_req(priority, self.gad, &apdu)
    }

    /// True when any listener carries the init flag and so wants a read
    /// issued at stack start.
    pub fn wants_init(&self) -> bool {
        let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners
            .iter()
            .any(|l| l.flags().is_some_and(|f| f.init()))
    }

    fn snapshot(&self) -> Vec<Arc<dyn GroupListener>> {
        let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.clone()
    }

    fn notify_write(&self, source: IndividualAddress, data: &[u8]) {
        for listener in self.snapshot() {
            if let Err(e) = listener.on_write(source, data) {
                warn!("group {} write handler failed: {e}", self.gad);
            }
        }
    }

    fn notify_read(&self, source: IndividualAddress) {
        for listener in self.snapshot() {
            if let Err(e) = listener.on_read(source) {
                warn!("group {} read handler failed: {e}", self.gad);
            }
        }
    }

    fn notify_response(&self, source: IndividualAddress, data: &[u8]) {
        for listener in self.snapshot() {
            if let Err(e) = listener.on_response(source, data) {
                warn!("group {} response handler failed: {e}", self.gad);
            }
        }
    }
}

/// Application layer: the subscription registry keyed by group address.
pub struct ApplicationGroupService {
    transport: Arc<TransportGroupService>,
    groups: Mutex<HashMap<GroupAddress, Arc<Group>>>,
}

impl ApplicationGroupService {
    pub fn new(transport: Arc<TransportGroupService>) -> Self {
        Self {
            transport,
            groups: Mutex::new(HashMap::new()),
        }
    }

    /// Adds `listener` to the group for `gad`, creating the group on first
    /// use. Returns the group so the caller can send on it.
    pub fn subscribe(
        &self,
        gad: GroupAddress,
        listener: Arc<dyn GroupListener>,
    ) -> Result<Arc<Group>, StackError> {
        if gad.is_null() {
            return Err(StackError::Address(AddressError::NullDestination));
        }
        let group = {
            let mut groups = self.groups.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(
                groups
                    .entry(gad)
                    .or_insert_with(|| Arc::new(Group::new(gad, Arc::clone(&self.transport)))),
            )
        };
        group.add_listener(listener);
        Ok(group)
    }

    pub fn group(&self, gad: GroupAddress) -> Option<Arc<Group>> {
        let groups = self.groups.lock().unwrap_or_else(|e| e.into_inner());
        groups.get(&gad).cloned()
    }

    pub fn groups(&self) -> Vec<Arc<Group>> {
        let groups = self.groups.lock().unwrap_or_else(|e| e.into_inner());
        groups.values().cloned().collect()
    }
}

impl TransportListener for ApplicationGroupService {
    fn group_data_ind(
        &self,
        source: IndividualAddress,
        gad: GroupAddress,
        _priority: Priority,
        asdu: &[u8],
    ) {
        let Some(group) = self.group(gad) else {
            debug!("no subscription for {gad}, ignoring");
            return;
        };
        if asdu.len() < 2 {
            warn!("short ASDU ({} bytes) for {gad} from {source}", asdu.len());
            return;
        }
        // Small values ride inside the APCI octet itself.
        let data: Vec<u8> = if asdu.len() > 2 {
            asdu[2..].to_vec()
        } else {
            vec![asdu[1] & 0x3F]
        };
        match asdu[1] & APCI_MASK {
            APCI_GROUP_WRITE => group.notify_write(source, &data),
            APCI_GROUP_READ => group.notify_read(source),
            APCI_GROUP_RESPONSE => group.notify_response(source, &data),
            other => warn!("unsupported APCI 0x{other:02x} for {gad} from {source}"),
        }
    }
}
