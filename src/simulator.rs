use crate::policy::EvictionPolicy;
use crate::stattrack::SimulationStats;
use crate::table::PageTable;
use crate::trace::{AccessKind, Reference};
use indicatif::ProgressBar;
use log::{debug, warn};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Latency charged to a reference that finds its page resident.
pub const LATENCY_RAM: u64 = 50;

/// Latency charged to a page fault.
pub const LATENCY_SWAP: u64 = 10_000_000;

/// A structure which contains the core elements required to replay a reference trace: the loaded
/// sequence, the page table it indexes into, the replacement policy governing the resident pool,
/// and an optional pacing interval between references.
pub struct Simulation {
    references: Vec<Reference>,
    table: PageTable,
    policy: Box<dyn EvictionPolicy>,
    pacing: Option<Duration>,
}

impl Simulation {
    pub fn build(
        references: Vec<Reference>,
        table: PageTable,
        policy: Box<dyn EvictionPolicy>,
        pacing: Option<Duration>,
    ) -> Self {
        Self {
            references,
            table,
            policy,
            pacing,
        }
    }

    /// Replay the sequence to exhaustion and return the accumulated statistics.
    ///
    /// Each reference is resolved through the page table; a number the table does not know is
    /// skipped with a warning and counts toward nothing. A resident page is a hit, anything else
    /// is a miss followed by an admission. Pacing, when configured, only slows the loop down;
    /// counters never depend on it.
    pub fn run(self) -> SimulationStats {
        let mut stats = SimulationStats::new();
        let progress = ProgressBar::new(self.references.len() as u64);
        for reference in &self.references {
            progress.inc(1);
            let page = match self.table.find(reference.page_number) {
                Some(page) => page,
                None => {
                    warn!(
                        "reference {} names page {} outside the table, skipping",
                        reference.label, reference.page_number
                    );
                    continue;
                }
            };
            page.mark_referenced();
            if reference.access == AccessKind::Write {
                page.mark_modified();
            }
            match page.is_resident() {
                true => {
                    stats.hits += 1;
                    stats.hit_latency += LATENCY_RAM;
                }
                false => {
                    stats.misses += 1;
                    stats.miss_latency += LATENCY_SWAP;
                    if let Some(eviction) = self.policy.admit(Arc::clone(page)) {
                        debug!("{}", eviction);
                    }
                }
            }
            if let Some(pause) = self.pacing {
                thread::sleep(pause);
            }
        }
        progress.finish_and_clear();
        stats
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::policy::{FifoPolicy, PolicyKind};

    fn make_references(pages: &[usize]) -> Vec<Reference> {
        pages
            .iter()
            .map(|page| Reference {
                label: format!("page-{}", page),
                page_number: *page,
                channel: 0,
                access: AccessKind::Read,
            })
            .collect()
    }

    #[cfg(test)]
    mod simulation_tests {

        use super::*;

        #[test]
        fn cold_start_thrash() {
            // [0, 1, 2, 0] through 2 FIFO frames: every reference faults
            let simulation = Simulation::build(
                make_references(&[0, 1, 2, 0]),
                PageTable::build(3),
                Box::new(FifoPolicy::build(2)),
                None,
            );
            let stats = simulation.run();
            assert_eq!(stats.hits, 0);
            assert_eq!(stats.misses, 4);
            assert_eq!(stats.processed(), 4);
            assert_eq!(stats.miss_latency, 4 * LATENCY_SWAP);
            assert_eq!(stats.hit_latency, 0);
        }

        #[test]
        fn repeat_access_hits() {
            let simulation = Simulation::build(
                make_references(&[0, 0, 0]),
                PageTable::build(1),
                Box::new(FifoPolicy::build(1)),
                None,
            );
            let stats = simulation.run();
            assert_eq!(stats.misses, 1);
            assert_eq!(stats.hits, 2);
            assert_eq!(stats.hit_latency, 2 * LATENCY_RAM);
            assert_eq!(stats.miss_latency, LATENCY_SWAP);
        }

        #[test]
        fn out_of_range_reference_skipped() {
            let simulation = Simulation::build(
                make_references(&[0, 3, 1]),
                PageTable::build(3),
                Box::new(FifoPolicy::build(2)),
                None,
            );
            let stats = simulation.run();

            // page 3 equals the table capacity and never counts
            assert_eq!(stats.processed(), 2);
            assert_eq!(stats.misses, 2);
            assert_eq!(stats.hits, 0);
        }

        #[test]
        fn totals_reconcile() {
            let simulation = Simulation::build(
                make_references(&[0, 1, 0, 1, 2, 0]),
                PageTable::build(4),
                Box::new(FifoPolicy::build(3)),
                None,
            );
            let stats = simulation.run();
            assert_eq!(stats.hits + stats.misses, stats.processed());
            assert_eq!(stats.hit_latency, stats.hits * LATENCY_RAM);
            assert_eq!(stats.miss_latency, stats.misses * LATENCY_SWAP);
        }

        #[test]
        fn marks_usage_bits() {
            let table = PageTable::build(2);
            let mut references = make_references(&[0, 1]);
            references[1].access = AccessKind::Write;
            let page_zero = Arc::clone(table.find(0).unwrap());
            let page_one = Arc::clone(table.find(1).unwrap());

            Simulation::build(references, table, Box::new(FifoPolicy::build(2)), None).run();
            assert!(page_zero.referenced());
            assert!(!page_zero.modified());
            assert!(page_one.referenced());
            assert!(page_one.modified());
        }

        #[test]
        fn pacing_does_not_change_counts() {
            let simulation = Simulation::build(
                make_references(&[0, 0]),
                PageTable::build(1),
                PolicyKind::Fifo.build(1),
                Some(Duration::from_millis(1)),
            );
            let stats = simulation.run();
            assert_eq!(stats.hits, 1);
            assert_eq!(stats.misses, 1);
        }

        #[test]
        fn empty_sequence() {
            let simulation = Simulation::build(
                Vec::new(),
                PageTable::build(1),
                Box::new(FifoPolicy::build(1)),
                None,
            );
            let stats = simulation.run();
            assert_eq!(stats.processed(), 0);
        }
    }
}
