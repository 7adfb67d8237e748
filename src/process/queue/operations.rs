/*!
 * Ready Queue Structural Operations
 * Push, pop, ordered insert and reversal
 */

use super::{ReadyQueue, SENTINEL};
use crate::process::types::ProcessRecord;

impl ReadyQueue {
    /// Insert at the front - O(1)
    ///
    /// Arrivals are pushed here, so the queue holds newest-first until a
    /// policy reorders it.
    pub fn push_front(&mut self, record: ProcessRecord) {
        let idx = self.alloc(record);
        self.link_after(SENTINEL, idx);
        self.len += 1;
    }

    /// Insert at the back - O(1)
    pub fn push_back(&mut self, record: ProcessRecord) {
        let idx = self.alloc(record);
        self.link_after(self.tail.unwrap_or(SENTINEL), idx);
        self.len += 1;
    }

    /// Remove the first record - O(1)
    pub fn pop_front(&mut self) -> Option<ProcessRecord> {
        let idx = self.head()?;
        self.unlink(idx);
        self.len -= 1;
        self.release(idx)
    }

    /// Remove the last record - O(1)
    pub fn pop_back(&mut self) -> Option<ProcessRecord> {
        let idx = self.tail?;
        self.unlink(idx);
        self.len -= 1;
        self.release(idx)
    }

    /// Insert before the first record `existing` for which
    /// `less(existing, record)` is false - O(n)
    ///
    /// Keeps a queue already ordered by `less` ordered. The new record lands
    /// ahead of any existing records that compare equal to it.
    pub fn insert_ordered<F>(&mut self, record: ProcessRecord, mut less: F)
    where
        F: FnMut(&ProcessRecord, &ProcessRecord) -> bool,
    {
        let mut at = SENTINEL;
        let mut cursor = self.head();
        while let Some(idx) = cursor {
            let stays_ahead = self
                .record(idx)
                .map(|existing| less(existing, &record))
                .unwrap_or(false);
            if !stays_ahead {
                break;
            }
            at = idx;
            cursor = self.next_of(idx);
        }

        let idx = self.alloc(record);
        self.link_after(at, idx);
        self.len += 1;
    }

    /// Reverse the queue in place - O(n)
    pub fn reverse(&mut self) {
        let (Some(first), Some(last)) = (self.head(), self.tail) else {
            return;
        };
        if first == last {
            return;
        }

        let mut cursor = Some(first);
        while let Some(idx) = cursor {
            let node = &mut self.nodes[idx];
            let next = node.next;
            node.next = node.prev;
            node.prev = next;
            cursor = next;
        }

        // The old first node's swapped `next` points at the sentinel
        self.nodes[first].next = None;
        self.nodes[last].prev = Some(SENTINEL);
        self.nodes[SENTINEL].next = Some(last);
        self.tail = Some(first);
    }
}
