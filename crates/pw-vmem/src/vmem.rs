#[cfg(test)]
mod vmem_test;

use std::collections::BTreeMap;
use std::time::Instant;

use pw_types::{AddrType, NodeId, SizeClass, Vaddr};

use crate::coherence::{CoherenceEvent, FaultOutcome};
use crate::page::{MemorySpace, Page, VmemError};
use crate::MEMORY_REQUIRE_INTERVAL;

/// A node's view of the distributed address space: the pages it has
/// allocated or currently holds a copy of, plus a per-class bump cursor
/// used to hand out fresh addresses when this node is the allocating node.
///
/// Grounded on the teacher's `Heap` (bump allocator) and `MockVSpace`
/// (bounds-checked backing store), generalized from "one contiguous region"
/// to "many independently owned, independently resident pages".
pub struct Vmem {
    my_nid: NodeId,
    pages: BTreeMap<Vaddr, Page>,
    next_offset: [u64; 6],
}

const CLASS_TAGS: [AddrType; 6] = [
    AddrType::Value08,
    AddrType::Value16,
    AddrType::Value24,
    AddrType::Value32,
    AddrType::Value40,
    AddrType::Value48,
];

fn class_index(tag: AddrType) -> usize {
    CLASS_TAGS
        .iter()
        .position(|t| *t == tag)
        .expect("size class tag")
}

impl Vmem {
    #[must_use]
    pub fn new(my_nid: NodeId) -> Self {
        Self {
            my_nid,
            pages: BTreeMap::new(),
            next_offset: [0; 6],
        }
    }

    /// Allocate a fresh, locally owned page large enough for `len` bytes.
    pub fn allocate(&mut self, len: u64) -> Vaddr {
        let tag = SizeClass::for_len(len);
        let idx = class_index(tag);
        let offset = self.next_offset[idx];
        self.next_offset[idx] += len.max(1);

        let addr = Vaddr::new((tag.tag() as u64) << 60 | offset);
        let page = Page::new(addr, len as usize, self.my_nid.clone());
        self.pages.insert(addr, page);
        tracing::debug!(?addr, len, "allocated page");
        addr
    }

    /// Drop a page entirely. Only valid for pages this node owns.
    pub fn free(&mut self, addr: Vaddr) -> Result<(), VmemError> {
        match self.pages.get(&addr) {
            Some(page) if page.is_owner(&self.my_nid) => {
                self.pages.remove(&addr);
                Ok(())
            }
            Some(page) => Err(VmemError::NotOwner {
                addr,
                owner: page.owner.clone(),
            }),
            None => Err(VmemError::Unmapped(addr)),
        }
    }

    #[must_use]
    pub fn resident(&self, addr: Vaddr) -> bool {
        self.page_for(addr).is_some()
    }

    fn page_for(&self, addr: Vaddr) -> Option<&Page> {
        self.pages
            .range(..=addr)
            .next_back()
            .map(|(_, p)| p)
            .filter(|p| p.contains(addr))
    }

    fn page_for_mut(&mut self, addr: Vaddr) -> Option<&mut Page> {
        self.pages
            .range_mut(..=addr)
            .next_back()
            .map(|(_, p)| p)
            .filter(|p| p.contains(addr))
    }

    #[must_use]
    pub fn page(&self, addr: Vaddr) -> Option<&Page> {
        self.page_for(addr)
    }

    /// Decide what must happen before `addr` can be accessed (`writable`
    /// distinguishes a load from a store/CMPXCHG).
    pub fn fault(&mut self, addr: Vaddr, writable: bool) -> FaultOutcome {
        let Some(page) = self.page_for_mut(addr) else {
            return FaultOutcome::NeedsRequire(CoherenceEvent::Require {
                addr,
                requester: self.my_nid.clone(),
                writable,
            });
        };
        if !writable || page.is_owner(&self.my_nid) {
            return FaultOutcome::Resident;
        }

        let now = Instant::now();
        let rate_limited = page
            .last_require
            .is_some_and(|last| now.duration_since(last) < MEMORY_REQUIRE_INTERVAL);
        if rate_limited {
            page.require_misses += 1;
            return FaultOutcome::RetryLater;
        }

        page.last_require = Some(now);
        FaultOutcome::NeedsRequire(CoherenceEvent::Require {
            addr,
            requester: self.my_nid.clone(),
            writable,
        })
    }

    /// Apply an incoming coherence message to local state.
    pub fn handle_event(&mut self, event: CoherenceEvent) {
        match event {
            CoherenceEvent::Require {
                addr,
                requester,
                writable,
            } => {
                if let Some(page) = self.page_for_mut(addr) {
                    if writable && page.is_owner(&self.my_nid) {
                        page.owner = requester.clone();
                        page.writable = false;
                    }
                    page.readers.insert(requester);
                }
            }
            CoherenceEvent::Give {
                addr,
                bytes,
                transfer_ownership,
                ..
            } => {
                let entry = self
                    .pages
                    .entry(addr)
                    .or_insert_with(|| Page::new(addr, bytes.len(), self.my_nid.clone()));
                entry.bytes = bytes.into_boxed_slice();
                entry.last_require = None;
                entry.require_misses = 0;
                if transfer_ownership {
                    entry.owner = self.my_nid.clone();
                    entry.writable = true;
                }
            }
            CoherenceEvent::Unwant { addr, from } => {
                if let Some(page) = self.page_for_mut(addr) {
                    page.readers.remove(&from);
                }
            }
            CoherenceEvent::Free { addr } => {
                self.pages.remove(&addr);
            }
        }
    }
}

impl MemorySpace for Vmem {
    fn read<T: Copy>(&self, addr: Vaddr) -> Result<T, VmemError> {
        self.page_for(addr).ok_or(VmemError::Unmapped(addr))?.read(addr)
    }

    fn write<T>(&mut self, addr: Vaddr, value: T) -> Result<(), VmemError> {
        let nid = self.my_nid.clone();
        let page = self.page_for_mut(addr).ok_or(VmemError::Unmapped(addr))?;
        if !page.is_owner(&nid) {
            return Err(VmemError::NotOwner {
                addr,
                owner: page.owner.clone(),
            });
        }
        page.write(addr, value)
    }

    fn slice(&self, addr: Vaddr, len: usize) -> Result<&[u8], VmemError> {
        self.page_for(addr).ok_or(VmemError::Unmapped(addr))?.slice(addr, len)
    }

    fn slice_mut(&mut self, addr: Vaddr, len: usize) -> Result<&mut [u8], VmemError> {
        let nid = self.my_nid.clone();
        let page = self.page_for_mut(addr).ok_or(VmemError::Unmapped(addr))?;
        if !page.is_owner(&nid) {
            return Err(VmemError::NotOwner {
                addr,
                owner: page.owner.clone(),
            });
        }
        page.slice_mut(addr, len)
    }

    fn copy_within(&mut self, src: Vaddr, dst: Vaddr, len: usize) -> Result<(), VmemError> {
        let buf = self.slice(src, len)?.to_vec();
        self.slice_mut(dst, len)?.copy_from_slice(&buf);
        Ok(())
    }
}
