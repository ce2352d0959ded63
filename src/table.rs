use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The `Residency` enum encodes whether a page currently occupies a resident frame. Using a
/// two-state variant instead of a raw boolean keeps the page API honest: callers reason about
/// residency transitions, never about flag soup.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Residency {
    NotResident,
    Resident,
}

/// The `Page` struct is the simplest element of the simulated page table. Each instance records
/// the usage state of one fixed-size unit of the reference address space: whether it has been
/// accessed since the last sweep, whether it has been written since it was loaded, and whether it
/// currently sits in a resident frame.
///
/// All state is stored in relaxed atomics. The frame pool mutates residency under its own lock;
/// a flag read that races an admission can at worst misclassify a single access in the
/// statistics, which is the accepted consistency boundary for this simulation.
#[derive(Debug)]
pub struct Page {
    number: usize,
    referenced: AtomicBool,
    modified: AtomicBool,
    resident: AtomicBool,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            referenced: AtomicBool::new(false),
            modified: AtomicBool::new(false),
            resident: AtomicBool::new(false),
        }
    }

    /// The page's unique number, assigned once at table construction.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn residency(&self) -> Residency {
        match self.resident.load(Ordering::Relaxed) {
            true => Residency::Resident,
            false => Residency::NotResident,
        }
    }

    /// Record a residency transition. Only replacement policies call this, and only from inside
    /// their admission transaction.
    pub fn set_residency(&self, residency: Residency) {
        self.resident
            .store(residency == Residency::Resident, Ordering::Relaxed);
    }

    pub fn is_resident(&self) -> bool {
        self.resident.load(Ordering::Relaxed)
    }

    pub fn mark_referenced(&self) {
        self.referenced.store(true, Ordering::Relaxed);
    }

    pub fn clear_referenced(&self) {
        self.referenced.store(false, Ordering::Relaxed);
    }

    pub fn referenced(&self) -> bool {
        self.referenced.load(Ordering::Relaxed)
    }

    pub fn mark_modified(&self) {
        self.modified.store(true, Ordering::Relaxed);
    }

    pub fn modified(&self) -> bool {
        self.modified.load(Ordering::Relaxed)
    }
}

/// The `PageTable` struct is the complete mapping from page number to page state. It holds
/// exactly N pages numbered 0..N-1, built once and never resized; lookups of an in-range number
/// always yield the same page identity for the table's lifetime. Pages are shared via `Arc` so
/// the resident pool and the table alias the same records, mirroring how a real page table and
/// frame bookkeeping point at the same entries.
pub struct PageTable(Vec<Arc<Page>>);

impl PageTable {
    /// Create a new table with `num_pages` entries, all initially non-resident with clear flags.
    pub fn build(num_pages: usize) -> Self {
        Self((0..num_pages).map(|n| Arc::new(Page::new(n))).collect())
    }

    /// Provided a page number, attempt to find the corresponding page in the table and return an
    /// `Option` containing the result. A return value of `None` means the number falls outside
    /// the table's range; callers treat that as a skip condition, never as an error.
    pub fn find(&self, number: usize) -> Option<&Arc<Page>> {
        self.0.get(number)
    }

    /// The table's fixed capacity N.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[cfg(test)]
    mod page_tests {

        use super::*;

        #[test]
        fn new() {
            let page = Page::new(7);
            assert_eq!(page.number(), 7);
            assert_eq!(page.residency(), Residency::NotResident);
            assert!(!page.referenced());
            assert!(!page.modified());
        }

        #[test]
        fn residency_transitions() {
            let page = Page::new(0);
            page.set_residency(Residency::Resident);
            assert!(page.is_resident());
            page.set_residency(Residency::NotResident);
            assert!(!page.is_resident());
        }

        #[test]
        fn flags() {
            let page = Page::new(0);
            page.mark_referenced();
            page.mark_modified();
            assert!(page.referenced());
            assert!(page.modified());
            page.clear_referenced();
            assert!(!page.referenced());
            assert!(page.modified());
        }
    }

    #[cfg(test)]
    mod page_table_tests {

        use super::*;

        #[test]
        fn build() {
            let table = PageTable::build(10);
            assert_eq!(table.len(), 10);
            (0..10).for_each(|n| {
                let page = table.find(n).unwrap();
                assert_eq!(page.number(), n);
                assert!(!page.is_resident());
            });
        }

        #[test]
        fn find_out_of_range() {
            let table = PageTable::build(3);
            assert!(table.find(3).is_none());
            assert!(table.find(usize::MAX).is_none());
        }

        #[test]
        fn find_returns_same_identity() {
            let table = PageTable::build(4);
            let first = Arc::clone(table.find(2).unwrap());
            let second = Arc::clone(table.find(2).unwrap());
            assert!(Arc::ptr_eq(&first, &second));
        }
    }
}
