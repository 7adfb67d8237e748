/*!
 * Ready Queue Reordering
 * Stable insertion sort and stable grouping passes
 */

use super::{ReadyQueue, SENTINEL};
use crate::process::types::ProcessRecord;

impl ReadyQueue {
    /// Stable insertion sort over the linked structure - O(n²) worst case
    ///
    /// Each unsorted node walks backward through the sorted prefix while
    /// `less(candidate, existing)` holds and is spliced in there. Records
    /// that compare equal keep their relative order.
    pub fn stable_sort<F>(&mut self, mut less: F)
    where
        F: FnMut(&ProcessRecord, &ProcessRecord) -> bool,
    {
        let Some(first) = self.head() else {
            return;
        };

        // Last node of the sorted prefix
        let mut sorted_end = first;
        while let Some(candidate) = self.next_of(sorted_end) {
            let mut at = sorted_end;
            while at != SENTINEL && self.precedes(candidate, at, &mut less) {
                at = self.prev_of(at);
            }

            if at == sorted_end {
                sorted_end = candidate;
            } else {
                self.unlink(candidate);
                self.link_after(at, candidate);
            }
        }
    }

    /// Group records by key, one stable pass per key in `keys` order
    ///
    /// Each pass moves the records matching its key, in their current
    /// relative order, to sit right after the records placed by earlier
    /// passes. Records whose key is not listed keep their relative order
    /// at the back.
    pub fn group_stable<K, F>(&mut self, keys: &[K], key_of: F)
    where
        K: PartialEq,
        F: Fn(&ProcessRecord) -> K,
    {
        if self.len < 2 {
            return;
        }

        let mut placed = SENTINEL;
        for key in keys {
            placed = self.partition_after(placed, |record| key_of(record) == *key);
        }
    }

    /// Move every record after `placed` matching `pred` to directly follow
    /// the growing placed run; returns the new end of that run
    fn partition_after<P>(&mut self, mut placed: usize, pred: P) -> usize
    where
        P: Fn(&ProcessRecord) -> bool,
    {
        let mut cursor = self.next_of(placed);
        while let Some(idx) = cursor {
            let next = self.next_of(idx);
            if self.record(idx).map(&pred).unwrap_or(false) {
                if self.next_of(placed) != Some(idx) {
                    self.unlink(idx);
                    self.link_after(placed, idx);
                }
                placed = idx;
            }
            cursor = next;
        }
        placed
    }

    #[inline]
    fn precedes<F>(&self, a: usize, b: usize, less: &mut F) -> bool
    where
        F: FnMut(&ProcessRecord, &ProcessRecord) -> bool,
    {
        match (self.record(a), self.record(b)) {
            (Some(a), Some(b)) => less(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::record;
    use super::*;
    use crate::core::types::Pid;
    use crate::process::types::ProcessPriority;
    use pretty_assertions::assert_eq;

    fn timed(id: Pid, time: f64) -> ProcessRecord {
        let mut r = record(id);
        r.total_service_time = time;
        r
    }

    fn prioritized(id: Pid, priority: ProcessPriority) -> ProcessRecord {
        let mut r = record(id);
        r.priority = priority;
        r
    }

    fn by_time(a: &ProcessRecord, b: &ProcessRecord) -> bool {
        a.total_service_time < b.total_service_time
    }

    #[test]
    fn test_sort_empty_and_single() {
        let mut queue = ReadyQueue::new();
        queue.stable_sort(by_time);
        assert!(queue.is_empty());

        queue.push_back(timed(1, 3.0));
        queue.stable_sort(by_time);
        assert_eq!(queue.ids(), vec![1]);
        queue.assert_links();
    }

    #[test]
    fn test_sort_orders_and_fixes_tail() {
        let mut queue = ReadyQueue::new();
        for (id, time) in [(1, 9.0), (2, 3.0), (3, 7.0), (4, 1.0)] {
            queue.push_back(timed(id, time));
        }
        queue.stable_sort(by_time);

        assert_eq!(queue.ids(), vec![4, 2, 3, 1]);
        assert_eq!(queue.back().map(|r| r.id), Some(1));
        queue.assert_links();
    }

    #[test]
    fn test_sort_is_stable() {
        let mut queue = ReadyQueue::new();
        for (id, time) in [(1, 5.0), (2, 2.0), (3, 5.0), (4, 2.0), (5, 1.0)] {
            queue.push_back(timed(id, time));
        }
        queue.stable_sort(by_time);

        assert_eq!(queue.ids(), vec![5, 2, 4, 1, 3]);
        queue.assert_links();
    }

    #[test]
    fn test_sort_already_sorted_and_reversed() {
        let mut queue = ReadyQueue::new();
        for id in 1..=5 {
            queue.push_back(timed(id, id as f64));
        }
        queue.stable_sort(by_time);
        assert_eq!(queue.ids(), vec![1, 2, 3, 4, 5]);

        queue.reverse();
        queue.stable_sort(by_time);
        assert_eq!(queue.ids(), vec![1, 2, 3, 4, 5]);
        queue.assert_links();
    }

    #[test]
    fn test_group_stable_by_priority() {
        use ProcessPriority::*;

        let mut queue = ReadyQueue::new();
        for (id, priority) in [(1, Normal), (2, High), (3, Normal), (4, Exigency)] {
            queue.push_back(prioritized(id, priority));
        }
        queue.group_stable(&ProcessPriority::DESCENDING, |r| r.priority);

        assert_eq!(queue.ids(), vec![4, 2, 1, 3]);
        queue.assert_links();
    }

    #[test]
    fn test_group_stable_mixed() {
        use ProcessPriority::*;

        let mut queue = ReadyQueue::new();
        let layout = [(1, Low), (2, Exigency), (3, Low), (4, High), (5, Exigency), (6, Normal)];
        for (id, priority) in layout {
            queue.push_back(prioritized(id, priority));
        }
        queue.group_stable(&ProcessPriority::DESCENDING, |r| r.priority);

        assert_eq!(queue.ids(), vec![2, 5, 4, 6, 1, 3]);
        assert_eq!(queue.back().map(|r| r.id), Some(3));
        queue.assert_links();
    }

    #[test]
    fn test_group_stable_unlisted_keys_stay_behind() {
        use ProcessPriority::*;

        let mut queue = ReadyQueue::new();
        for (id, priority) in [(1, Low), (2, High), (3, Normal)] {
            queue.push_back(prioritized(id, priority));
        }
        queue.group_stable(&[High], |r| r.priority);

        assert_eq!(queue.ids(), vec![2, 1, 3]);
        queue.assert_links();
    }
}
