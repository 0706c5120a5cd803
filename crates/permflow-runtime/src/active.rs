use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

/// Hosts that currently run a cycle.
#[derive(Debug, Default)]
pub(crate) struct ActiveHosts {
    cycles: DashMap<String, Uuid>,
}

impl ActiveHosts {
    /// Claims `host_id` for `cycle_id`. `None` if another cycle holds it.
    pub(crate) fn try_acquire(
        self: &Arc<Self>,
        host_id: &str,
        cycle_id: Uuid,
    ) -> Option<ActiveHostGuard> {
        match self.cycles.entry(host_id.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                vacant.insert(cycle_id);
                Some(ActiveHostGuard {
                    hosts: Arc::clone(self),
                    host_id: host_id.to_string(),
                    cycle_id,
                })
            },
        }
    }

    pub(crate) fn is_active(&self, host_id: &str) -> bool {
        self.cycles.contains_key(host_id)
    }
}

/// Releases a host claim on drop.
#[derive(Debug)]
pub(crate) struct ActiveHostGuard {
    hosts: Arc<ActiveHosts>,
    host_id: String,
    cycle_id: Uuid,
}

impl Drop for ActiveHostGuard {
    fn drop(&mut self) {
        let cycle_id = self.cycle_id;
        self.hosts
            .cycles
            .remove_if(&self.host_id, |_, owner| *owner == cycle_id);
    }
}
