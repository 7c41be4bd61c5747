mod group;
mod individual;

pub use group::GroupAddress;
pub use individual::IndividualAddress;
