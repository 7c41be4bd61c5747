use crate::application::{ApplicationGroupService, Group, GroupListener};
use crate::datapoint::{Datapoint, DatapointObserver};
use crate::StackError;
use log::error;
use rustknx_core::dpt::DptValue;
use rustknx_core::{Flags, GroupAddress, IndividualAddress, Priority};
use std::sync::{Arc, OnceLock};

/// The bridge between a [`Datapoint`] and a group address.
///
/// As a [`GroupListener`] it applies bus traffic to the datapoint; as a
/// [`DatapointObserver`] it transmits application-side changes onto the bus.
/// The communication [`Flags`] gate each direction:
///
/// * `W` — incoming writes update the datapoint
/// * `R` — incoming reads are answered from the cache
/// * `U` — incoming responses update the datapoint
/// * `T` — local value changes are written to the group
/// * `I` — a read is issued at stack start
pub struct GroupObject {
    datapoint: Arc<Datapoint>,
    flags: Flags,
    priority: Priority,
    group: OnceLock<Arc<Group>>,
}

impl GroupObject {
    /// Wraps `datapoint` and registers as its subscriber. Flags and priority
    /// fall back to the defaults (`CWU`, low) when the datapoint does not
    /// carry its own.
    pub fn new(datapoint: Arc<Datapoint>) -> Arc<Self> {
        let object = Arc::new(Self {
            flags: datapoint.flags().unwrap_or_default(),
            priority: datapoint.priority().unwrap_or_default(),
            datapoint,
            group: OnceLock::new(),
        });
        object
            .datapoint
            .add_subscriber(Arc::clone(&object) as Arc<dyn DatapointObserver>);
        object
    }

    /// Binds the object to `gad`, subscribing it for indications. The first
    /// binding wins; later calls still subscribe but do not change the send
    /// target.
    pub fn attach(
        self: &Arc<Self>,
        application: &ApplicationGroupService,
        gad: GroupAddress,
    ) -> Result<Arc<Group>, StackError> {
        let group = application.subscribe(gad, Arc::clone(self) as Arc<dyn GroupListener>)?;
        let _ = self.group.set(Arc::clone(&group));
        Ok(group)
    }

    pub fn datapoint(&self) -> &Arc<Datapoint> {
        &self.datapoint
    }

    pub fn group_flags(&self) -> Flags {
        self.flags
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

impl GroupListener for GroupObject {
    fn on_write(&self, _source: IndividualAddress, data: &[u8]) -> Result<(), StackError> {
        if self.flags.write() {
            self.datapoint.set_frame(data)?;
        }
        Ok(())
    }

    fn on_read(&self, _source: IndividualAddress) -> Result<(), StackError> {
        if !self.flags.read() {
            return Ok(());
        }
        let Some(group) = self.group.get() else {
            return Ok(());
        };
        match self.datapoint.frame() {
            Ok((frame, type_size)) => group.response(self.priority, &frame, type_size),
            // Nothing cached yet, nothing to answer with.
            Err(StackError::NoValue) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn on_response(&self, _source: IndividualAddress, data: &[u8]) -> Result<(), StackError> {
        if self.flags.update() {
            self.datapoint.set_frame(data)?;
        }
        Ok(())
    }

    fn flags(&self) -> Option<Flags> {
        Some(self.flags)
    }
}

impl DatapointObserver for GroupObject {
    fn datapoint_changed(&self, dp: &Datapoint, _old: Option<DptValue>, _new: DptValue) {
        if !self.flags.transmit() {
            return;
        }
        let Some(group) = self.group.get() else {
            return;
        };
        let result = dp
            .frame()
            .and_then(|(frame, type_size)| group.write(self.priority, &frame, type_size));
        if let Err(e) = result {
            error!("group object for {} failed to transmit: {e}", dp.name());
        }
    }
}
