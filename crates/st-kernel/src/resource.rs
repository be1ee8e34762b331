//! `ResourceTable` — binary mutexes with FIFO queues and joint acquisition.
//!
//! # Protocol
//!
//! Every request is a *set* of resources; a single-resource `acquire` is a
//! set of one.  A request is granted only when every member is free **and**
//! the requester heads every member's wait queue, so a partially granted
//! request is never observable.
//!
//! Members are sorted and de-duplicated before anything else happens.  A
//! queued requester is appended to all member queues at one instant, which
//! keeps the relative order of any two waiters identical on every queue they
//! share.  Two trains asking for overlapping switch sets therefore can never
//! wait on each other in a cycle.
//!
//! The table never resumes anyone itself.  `release*` and `abandon` return
//! the processes whose requests became granted; the caller schedules them.

use std::collections::{BTreeMap, VecDeque};

use st_core::{ProcessId, ResourceId};
use tracing::debug;

use crate::{KernelError, KernelResult};

/// Outcome of a request.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Grant {
    /// All members now belong to the requester.
    Granted,
    /// The requester is queued and must suspend until it is returned by a
    /// later `release`.
    Queued,
}

#[derive(Default)]
struct Slot {
    holder:   Option<ProcessId>,
    queue:    VecDeque<ProcessId>,
    grants:   u64,
    releases: u64,
}

/// Fixed-size table of capacity-1 resources indexed by `ResourceId`.
pub struct ResourceTable {
    slots:   Vec<Slot>,
    /// Outstanding requests, keyed by requester: the sorted member list.
    pending: BTreeMap<ProcessId, Vec<ResourceId>>,
}

impl ResourceTable {
    /// Create `count` free resources with ids `0..count`.
    pub fn new(count: usize) -> Self {
        Self {
            slots:   (0..count).map(|_| Slot::default()).collect(),
            pending: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn holder(&self, id: ResourceId) -> Option<ProcessId> {
        self.slots.get(id.index()).and_then(|s| s.holder)
    }

    pub fn is_free(&self, id: ResourceId) -> bool {
        self.slots.get(id.index()).is_some_and(|s| s.holder.is_none())
    }

    /// Number of requesters queued on `id`.
    pub fn queue_len(&self, id: ResourceId) -> usize {
        self.slots.get(id.index()).map_or(0, |s| s.queue.len())
    }

    /// `(grants, releases)` recorded for `id` since construction.
    pub fn counters(&self, id: ResourceId) -> (u64, u64) {
        self.slots
            .get(id.index())
            .map_or((0, 0), |s| (s.grants, s.releases))
    }

    /// Whether `process` has a request waiting to be granted.
    pub fn is_waiting(&self, process: ProcessId) -> bool {
        self.pending.contains_key(&process)
    }

    /// All resources currently held by `process`, ascending.
    pub fn held_by(&self, process: ProcessId) -> Vec<ResourceId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.holder == Some(process))
            .map(|(i, _)| ResourceId(i as u16))
            .collect()
    }

    // ── Acquisition ───────────────────────────────────────────────────────

    /// Request a single resource.
    pub fn acquire(&mut self, process: ProcessId, id: ResourceId) -> KernelResult<Grant> {
        self.acquire_all(process, &[id])
    }

    /// Request every resource in `ids` as one all-or-nothing unit.
    ///
    /// The set is sorted by `ResourceId` before use, whatever order the
    /// caller passed.  An empty set is granted immediately.
    pub fn acquire_all(&mut self, process: ProcessId, ids: &[ResourceId]) -> KernelResult<Grant> {
        if self.pending.contains_key(&process) {
            return Err(KernelError::AlreadyWaiting(process));
        }
        let members = self.normalize(ids)?;
        for &id in &members {
            if self.slots[id.index()].holder == Some(process) {
                return Err(KernelError::AlreadyHolder { resource: id, holder: process });
            }
        }

        let immediately = members.iter().all(|id| {
            let slot = &self.slots[id.index()];
            slot.holder.is_none() && slot.queue.is_empty()
        });

        if immediately {
            for id in &members {
                let slot = &mut self.slots[id.index()];
                slot.holder = Some(process);
                slot.grants += 1;
            }
            debug!(%process, ?members, "granted");
            return Ok(Grant::Granted);
        }

        for id in &members {
            self.slots[id.index()].queue.push_back(process);
        }
        debug!(%process, ?members, "queued");
        self.pending.insert(process, members);
        Ok(Grant::Queued)
    }

    // ── Release ───────────────────────────────────────────────────────────

    /// Release one resource held by `process`.
    ///
    /// Returns the waiter whose request became granted as a result, if any.
    pub fn release(&mut self, process: ProcessId, id: ResourceId) -> KernelResult<Option<ProcessId>> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(KernelError::UnknownResource(id))?;
        if slot.holder != Some(process) {
            return Err(KernelError::NotHolder { resource: id, holder: process });
        }
        slot.holder = None;
        slot.releases += 1;
        debug!(%process, resource = %id, "released");
        Ok(self.grant_head(id))
    }

    /// Release every resource in `ids`, in ascending `ResourceId` order.
    ///
    /// Ownership of the whole set is checked before anything is released,
    /// so a `NotHolder` error leaves the table untouched.
    pub fn release_all(
        &mut self,
        process: ProcessId,
        ids: &[ResourceId],
    ) -> KernelResult<Vec<ProcessId>> {
        let members = self.normalize(ids)?;
        if let Some(&id) = members
            .iter()
            .find(|id| self.slots[id.index()].holder != Some(process))
        {
            return Err(KernelError::NotHolder { resource: id, holder: process });
        }
        let mut woken = Vec::new();
        for id in members {
            woken.extend(self.release(process, id)?);
        }
        Ok(woken)
    }

    /// Drop everything `process` holds or waits for.
    ///
    /// Used when a process is torn down before it could release normally.
    /// Returns the waiters granted as a consequence.
    pub fn abandon(&mut self, process: ProcessId) -> Vec<ProcessId> {
        let mut touched = Vec::new();

        if let Some(members) = self.pending.remove(&process) {
            for id in members {
                self.slots[id.index()].queue.retain(|&p| p != process);
                touched.push(id);
            }
        }
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.holder == Some(process) {
                slot.holder = None;
                slot.releases += 1;
                touched.push(ResourceId(i as u16));
            }
        }

        touched.sort();
        touched.dedup();
        debug!(%process, ?touched, "abandoned");
        touched.into_iter().filter_map(|id| self.grant_head(id)).collect()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Sort, de-duplicate and bounds-check a member list.
    fn normalize(&self, ids: &[ResourceId]) -> KernelResult<Vec<ResourceId>> {
        let mut members = ids.to_vec();
        members.sort();
        members.dedup();
        if let Some(&bad) = members.iter().find(|id| id.index() >= self.slots.len()) {
            return Err(KernelError::UnknownResource(bad));
        }
        Ok(members)
    }

    /// Grant the head of `id`'s queue if its whole request is now grantable.
    fn grant_head(&mut self, id: ResourceId) -> Option<ProcessId> {
        let waiter = *self.slots[id.index()].queue.front()?;
        let members = self.pending.get(&waiter)?;
        let ready = members.iter().all(|m| {
            let slot = &self.slots[m.index()];
            slot.holder.is_none() && slot.queue.front() == Some(&waiter)
        });
        if !ready {
            return None;
        }

        let members = self.pending.remove(&waiter)?;
        for m in &members {
            let slot = &mut self.slots[m.index()];
            slot.queue.pop_front();
            slot.holder = Some(waiter);
            slot.grants += 1;
        }
        debug!(process = %waiter, ?members, "granted from queue");
        Some(waiter)
    }
}
