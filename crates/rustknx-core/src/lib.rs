//! KNX protocol types, frame codec, and Datapoint Type translators in pure Rust.
//!
//! `rustknx-core` provides the value types of the KNX group-communication
//! model (group and individual addresses, priorities, communication flags),
//! the cEMI L_Data frame codec exchanged with the bus transceiver, and the
//! Datapoint Type (DPT) translator registry that converts between typed
//! application values, their fixed-width encoded representation, and the
//! on-wire bit layout. It has no I/O and spawns no threads; it forms the
//! foundation of the rustknx crate family.
//!
//! # Feature flags
//!
//! - **`serde`** — derives `Serialize`/`Deserialize` on the value types.

/// KNX group and individual bus addresses.
pub mod addr;
/// cEMI L_Data frame representation and its exact byte codec.
pub mod cemi;
/// Datapoint Type registry and value/data/frame translators.
pub mod dpt;
/// Bounds-checked byte reader and writer used by the frame codec.
pub mod encoding;
/// Error types shared across the crate.
pub mod error;
/// Communication flags (`CRWTUIS`) attached to group objects.
pub mod flags;
/// Frame priority and its send-scheduling order.
pub mod priority;

pub use addr::{GroupAddress, IndividualAddress};
pub use cemi::{CemiFrame, DestinationAddress, MessageCode};
pub use error::{AddressError, FlagsError, FrameError, PriorityError};
pub use flags::Flags;
pub use priority::Priority;
