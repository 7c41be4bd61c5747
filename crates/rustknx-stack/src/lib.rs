//! The KNX group-communication stack.
//!
//! Layers are wired bottom-up: the data-link service pumps cEMI frames, the
//! network layer filters for group traffic, the transport layer handles the
//! TPCI, and the application layer dispatches group services to subscribed
//! [`Group`]s. [`Datapoint`] and [`GroupObject`] sit on top and give device
//! logic a typed, flag-gated view of a group address.

pub mod application;
pub mod datapoint;
pub mod error;
pub mod group_object;
pub mod network;
pub mod stack;
pub mod transport;

pub use application::{ApplicationGroupService, Group, GroupListener};
pub use datapoint::{Datapoint, DatapointAccess, DatapointObserver};
pub use error::StackError;
pub use group_object::GroupObject;
pub use network::{NetworkGroupService, NetworkListener};
pub use stack::{Stack, PRIORITY_DISTRIBUTION};
pub use transport::{TransportGroupService, TransportListener};
