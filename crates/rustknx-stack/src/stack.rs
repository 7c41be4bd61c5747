use crate::application::ApplicationGroupService;
use crate::network::NetworkGroupService;
use crate::transport::TransportGroupService;
use crate::StackError;
use log::info;
use rustknx_core::{IndividualAddress, Priority};
use rustknx_datalink::{DataLinkService, LinkListener, Transceiver, UdpTransceiver};
use std::sync::Arc;
use std::time::Duration;

/// Send-queue credits per priority rank (system, urgent, normal, low).
pub const PRIORITY_DISTRIBUTION: [i8; 4] = [-1, 3, 2, 1];

const DEFAULT_HOP_COUNT: u8 = 6;
const LINK_SETTLE: Duration = Duration::from_millis(250);
const INIT_READ_SPACING: Duration = Duration::from_millis(100);

/// The assembled stack: all four layers wired together over one transceiver.
pub struct Stack {
    link: Arc<DataLinkService>,
    application: Arc<ApplicationGroupService>,
}

impl Stack {
    /// Builds a stack over `transceiver` with the default hop count.
    pub fn new(
        address: IndividualAddress,
        transceiver: Arc<dyn Transceiver>,
    ) -> Result<Self, StackError> {
        Self::with_hop_count(address, transceiver, DEFAULT_HOP_COUNT)
    }

    /// Builds a stack joined to the default KNXnet/IP routing multicast.
    pub fn multicast(address: IndividualAddress) -> Result<Self, StackError> {
        let transceiver = UdpTransceiver::multicast_default()
            .map_err(rustknx_datalink::DataLinkError::Transceiver)?;
        Self::new(address, Arc::new(transceiver))
    }

    pub fn with_hop_count(
        address: IndividualAddress,
        transceiver: Arc<dyn Transceiver>,
        hop_count: u8,
    ) -> Result<Self, StackError> {
        let link = Arc::new(DataLinkService::new(
            address,
            transceiver,
            PRIORITY_DISTRIBUTION,
        ));
        let network = Arc::new(NetworkGroupService::new(Arc::clone(&link), hop_count)?);
        let transport = Arc::new(TransportGroupService::new(Arc::clone(&network)));
        let application = Arc::new(ApplicationGroupService::new(Arc::clone(&transport)));

        link.set_listener(Arc::clone(&network) as Arc<dyn LinkListener>);
        network.set_listener(Arc::clone(&transport) as _);
        transport.set_listener(Arc::clone(&application) as _);

        Ok(Self { link, application })
    }

    pub fn address(&self) -> IndividualAddress {
        self.link.address()
    }

    pub fn application(&self) -> &Arc<ApplicationGroupService> {
        &self.application
    }

    /// Starts the link pumps, then issues a group read for every group
    /// whose listeners ask for initialisation.
    pub fn start(&self) -> Result<(), StackError> {
        self.link.start().map_err(StackError::DataLink)?;
        info!("stack {} started", self.address());
        std::thread::sleep(LINK_SETTLE);
        for group in self.application.groups() {
            if group.wants_init() {
                group.read(Priority::Low)?;
                std::thread::sleep(INIT_READ_SPACING);
            }
        }
        Ok(())
    }

    /// Stops the link pumps. Idempotent.
    pub fn stop(&self) {
        self.link.stop();
        info!("stack {} stopped", self.address());
    }
}
