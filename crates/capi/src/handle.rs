// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Generational handle registries.
//!
//! Handles crossing the C boundary are plain 64-bit ids, never pointers. An
//! id packs the resource kind (bits 56..64), the slot generation (bits
//! 32..56) and the slot index plus one (bits 0..32), so zero is never a
//! valid id. Releasing a handle bumps its slot's generation: stale ids,
//! repeated releases and ids of the wrong kind all fail to resolve instead
//! of touching freed memory. A slot whose generation reaches the maximum is
//! retired rather than wrapped, so an id is never issued twice.
//!
//! Each live resource sits behind its own mutex which calls only ever
//! `try_lock`. A handle already in use by another in-flight call is
//! reported as busy rather than waited on.

use cvgate::{Error, Result};
use parking_lot::{const_mutex, Mutex, MutexGuard};
use std::sync::Arc;

const KIND_SHIFT: u32 = 56;
const GENERATION_SHIFT: u32 = 32;
const GENERATION_MASK: u32 = 0x00FF_FFFF;
const INDEX_MASK: u64 = 0xFFFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Kind {
    Mat = 1,
    VideoCapture = 2,
    CascadeClassifier = 3,
    Hog = 4,
    SvmDetector = 5,
    TermCriteria = 6,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Mat => "mat",
            Kind::VideoCapture => "video capture",
            Kind::CascadeClassifier => "cascade classifier",
            Kind::Hog => "hog descriptor",
            Kind::SvmDetector => "svm detector",
            Kind::TermCriteria => "term criteria",
        }
    }
}

type Entry<T> = Arc<Mutex<T>>;

struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

struct Slots<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

pub(crate) struct Registry<T> {
    kind: Kind,
    inner: Mutex<Slots<T>>,
}

impl<T> Registry<T> {
    pub(crate) const fn new(kind: Kind) -> Self {
        Self {
            kind,
            inner: const_mutex(Slots {
                slots: Vec::new(),
                free: Vec::new(),
                live: 0,
            }),
        }
    }

    fn encode(&self, generation: u32, index: u32) -> u64 {
        ((self.kind as u64) << KIND_SHIFT)
            | (u64::from(generation & GENERATION_MASK) << GENERATION_SHIFT)
            | (u64::from(index) + 1)
    }

    fn invalid(&self, id: u64) -> Error {
        Error::InvalidHandle(format!("{} {id:#x}", self.kind.name()))
    }

    /// Splits `id` into slot index and generation, rejecting the null id and
    /// ids minted by another registry.
    fn decode(&self, id: u64) -> Result<(usize, u32)> {
        if id == 0 {
            return Err(Error::InvalidHandle(format!("null {} handle", self.kind.name())));
        }
        if (id >> KIND_SHIFT) as u8 != self.kind as u8 {
            return Err(self.invalid(id));
        }
        let index = (id & INDEX_MASK) as usize;
        if index == 0 {
            return Err(self.invalid(id));
        }
        let generation = (id >> GENERATION_SHIFT) as u32 & GENERATION_MASK;
        Ok((index - 1, generation))
    }

    /// Stores `value` and returns its new id.
    pub(crate) fn insert(&self, value: T) -> u64 {
        let entry = Arc::new(Mutex::new(value));
        let mut inner = self.inner.lock();
        inner.live += 1;
        let id = match inner.free.pop() {
            Some(index) => {
                let slot = &mut inner.slots[index as usize];
                slot.entry = Some(entry);
                self.encode(slot.generation, index)
            }
            None => {
                let index = inner.slots.len() as u32;
                inner.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                self.encode(0, index)
            }
        };
        log::debug!("{} {id:#x} created", self.kind.name());
        id
    }

    /// Looks up the live entry for `id`. The registry lock is held only for
    /// the lookup.
    pub(crate) fn resolve(&self, id: u64) -> Result<Entry<T>> {
        let (index, generation) = self.decode(id)?;
        let inner = self.inner.lock();
        match inner.slots.get(index) {
            Some(Slot {
                generation: g,
                entry: Some(entry),
            }) if *g == generation => Ok(Arc::clone(entry)),
            _ => Err(self.invalid(id)),
        }
    }

    /// Resolves every id in `ids`, dropping duplicates.
    pub(crate) fn resolve_distinct(&self, ids: &[u64]) -> Result<Vec<(u64, Entry<T>)>> {
        let mut out: Vec<(u64, Entry<T>)> = Vec::with_capacity(ids.len());
        for &id in ids {
            if out.iter().all(|(seen, _)| *seen != id) {
                out.push((id, self.resolve(id)?));
            }
        }
        Ok(out)
    }

    /// Runs `f` with exclusive access to the resource behind `id`.
    pub(crate) fn with<R>(&self, id: u64, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let entry = self.resolve(id)?;
        let mut value = lock(&entry, id)?;
        f(&mut value)
    }

    /// Releases `id`. Returns false when it was not live, which makes a
    /// repeated release a no-op. A call still holding the resource keeps it
    /// alive until that call returns.
    pub(crate) fn remove(&self, id: u64) -> bool {
        let Ok((index, generation)) = self.decode(id) else {
            return false;
        };
        let (entry, retired) = {
            let mut inner = self.inner.lock();
            let (entry, retired) = match inner.slots.get_mut(index) {
                Some(slot) if slot.generation == generation => match slot.entry.take() {
                    Some(entry) => {
                        slot.generation += 1;
                        (entry, slot.generation == GENERATION_MASK)
                    }
                    None => return false,
                },
                _ => return false,
            };
            if !retired {
                inner.free.push(index as u32);
            }
            inner.live -= 1;
            (entry, retired)
        };
        log::debug!("{} {id:#x} released", self.kind.name());
        if retired {
            log::debug!("{} slot {} retired", self.kind.name(), index);
        }
        // The resource is destroyed after the registry lock is released.
        drop(entry);
        true
    }

    /// Number of live handles.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().live
    }

    #[cfg(test)]
    fn set_generation(&self, id: u64, generation: u32) -> u64 {
        let (index, _) = self.decode(id).unwrap();
        self.inner.lock().slots[index].generation = generation;
        self.encode(generation, index as u32)
    }
}

/// Locks one entry without waiting.
pub(crate) fn lock<T>(entry: &Entry<T>, id: u64) -> Result<MutexGuard<'_, T>> {
    entry
        .try_lock()
        .ok_or_else(|| Error::Busy(format!("handle {id:#x} is in use by another call")))
}
