use crate::table::{Page, Residency};
use clap::ValueEnum;
use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Number of admissions between sweeps of the referenced bits. Only the NRU policy sweeps; FIFO
/// never consults the bits at all.
const SWEEP_PERIOD: u64 = 64;

/// The `Eviction` struct is the notice emitted when an admission forces a resident page out of
/// the pool. It carries the page-number pair so callers can log the replacement and tests can
/// assert on the exact victim.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Eviction {
    pub evicted: usize,
    pub admitted: usize,
}

impl fmt::Display for Eviction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page replaced: {} -> {}", self.evicted, self.admitted)
    }
}

/// The `EvictionPolicy` trait is the seam between the simulator and the victim-selection
/// algorithm. Implementations own a bounded pool of resident pages; `admit` performs the whole
/// capacity-check, eviction, and insertion sequence as one indivisible transaction so that two
/// concurrent misses cannot both observe room and overfill the pool.
pub trait EvictionPolicy: Send + Sync {
    /// Bring `page` into the resident pool, evicting a victim first when the pool is full.
    /// Returns the eviction notice when a replacement occurred. Admitting a page that is already
    /// resident is a no-op.
    fn admit(&self, page: Arc<Page>) -> Option<Eviction>;

    /// The fixed frame capacity F supplied at construction.
    fn capacity(&self) -> usize;

    /// Number of pages currently resident.
    fn resident(&self) -> usize;
}

/// The `FramePool` struct is the ordered collection of resident pages shared by every policy.
/// Entries are keyed by page number in admission order, so membership checks are O(1) and the
/// head is always the oldest admission. Size never exceeds `capacity`; residency flags track
/// membership exactly because both are mutated together under the owning policy's lock.
struct FramePool {
    capacity: usize,
    frames: LinkedHashMap<usize, Arc<Page>>,
}

impl FramePool {
    fn build(capacity: usize) -> Self {
        Self {
            capacity,
            frames: LinkedHashMap::with_capacity(capacity),
        }
    }

    fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    fn contains(&self, number: usize) -> bool {
        self.frames.contains_key(&number)
    }

    /// Append at the tail and mark resident. Callers must have made room first.
    fn insert(&mut self, page: Arc<Page>) {
        page.set_residency(Residency::Resident);
        self.frames.insert(page.number(), page);
    }

    /// Remove the oldest admission and mark it non-resident.
    fn evict_head(&mut self) -> Arc<Page> {
        let (_, victim) = self.frames.pop_front().expect("full pool has a head");
        victim.set_residency(Residency::NotResident);
        victim
    }

    /// Remove a specific resident page and mark it non-resident.
    fn evict(&mut self, number: usize) -> Arc<Page> {
        let victim = self.frames.remove(&number).expect("victim is resident");
        victim.set_residency(Residency::NotResident);
        victim
    }
}

/// The `FifoPolicy` struct evicts by admission order: the victim is always the oldest page still
/// resident. The referenced and modified bits exist in the page model but are never consulted
/// here; admission order is the whole decision.
pub struct FifoPolicy {
    pool: Mutex<FramePool>,
}

impl FifoPolicy {
    /// Create a new FIFO policy over a pool of `capacity` frames.
    pub fn build(capacity: usize) -> Self {
        Self {
            pool: Mutex::new(FramePool::build(capacity)),
        }
    }
}

impl EvictionPolicy for FifoPolicy {
    fn admit(&self, page: Arc<Page>) -> Option<Eviction> {
        let mut pool = self.pool.lock();
        if pool.contains(page.number()) {
            return None;
        }
        let notice = match pool.is_full() {
            true => Some(Eviction {
                evicted: pool.evict_head().number(),
                admitted: page.number(),
            }),
            false => None,
        };
        pool.insert(page);
        notice
    }

    fn capacity(&self) -> usize {
        self.pool.lock().capacity
    }

    fn resident(&self) -> usize {
        self.pool.lock().frames.len()
    }
}

/// The `NruPolicy` struct classifies resident pages into the four (referenced, modified)
/// combinations and evicts the oldest page of the lowest non-empty class. Referenced bits are
/// cleared every `SWEEP_PERIOD` admissions so old accesses eventually stop protecting a page.
pub struct NruPolicy {
    state: Mutex<NruState>,
}

struct NruState {
    pool: FramePool,
    admissions: u64,
}

impl NruPolicy {
    /// Create a new NRU policy over a pool of `capacity` frames.
    pub fn build(capacity: usize) -> Self {
        Self {
            state: Mutex::new(NruState {
                pool: FramePool::build(capacity),
                admissions: 0,
            }),
        }
    }

    /// Oldest page of the lowest non-empty class. Tuple ordering over the two bits yields
    /// exactly the class ranking: (false, false) < (false, true) < (true, false) < (true, true).
    fn pick_victim(pool: &FramePool) -> usize {
        pool.frames
            .values()
            .min_by_key(|page| (page.referenced(), page.modified()))
            .expect("full pool has a victim")
            .number()
    }
}

impl EvictionPolicy for NruPolicy {
    fn admit(&self, page: Arc<Page>) -> Option<Eviction> {
        let mut state = self.state.lock();
        state.admissions += 1;
        if state.admissions % SWEEP_PERIOD == 0 {
            state
                .pool
                .frames
                .values()
                .for_each(|resident| resident.clear_referenced());
        }
        if state.pool.contains(page.number()) {
            return None;
        }
        let notice = match state.pool.is_full() {
            true => {
                let victim = Self::pick_victim(&state.pool);
                Some(Eviction {
                    evicted: state.pool.evict(victim).number(),
                    admitted: page.number(),
                })
            }
            false => None,
        };
        state.pool.insert(page);
        notice
    }

    fn capacity(&self) -> usize {
        self.state.lock().pool.capacity
    }

    fn resident(&self) -> usize {
        self.state.lock().pool.frames.len()
    }
}

/// The `PolicyKind` enum is the configuration surface for eviction strategy selection. The
/// simulator only ever sees the trait object the chosen variant constructs.
#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum PolicyKind {
    /// Evict the page admitted earliest among those still resident.
    Fifo,
    /// Evict from the lowest non-empty (referenced, modified) class.
    Nru,
}

impl PolicyKind {
    /// Construct the selected policy over a pool of `capacity` frames.
    pub fn build(self, capacity: usize) -> Box<dyn EvictionPolicy> {
        match self {
            PolicyKind::Fifo => Box::new(FifoPolicy::build(capacity)),
            PolicyKind::Nru => Box::new(NruPolicy::build(capacity)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Fifo => write!(f, "fifo"),
            PolicyKind::Nru => write!(f, "nru"),
        }
    }
}
