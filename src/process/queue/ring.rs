/*!
 * Ready Queue Traversal
 * In-place record updates and ring draining for interleaved execution
 */

use super::{ReadyQueue, SENTINEL};
use crate::process::types::ProcessRecord;

impl ReadyQueue {
    /// Replace every record front to back with `f(record)`
    pub fn map_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(ProcessRecord) -> ProcessRecord,
    {
        let mut cursor = self.head();
        while let Some(idx) = cursor {
            if let Some(record) = self.nodes[idx].record.take() {
                self.nodes[idx].record = Some(f(record));
            }
            cursor = self.next_of(idx);
        }
    }

    /// Close the queue into a ring and give each record turns until all retire
    ///
    /// `turn` receives the current record and whether it is the only one left
    /// in the ring, and returns the record plus whether it has finished. A
    /// record that finishes, or is alone, leaves the ring; otherwise the ring
    /// rotates to the next record. Once the ring is empty the queue is rebuilt
    /// in completion order.
    pub fn drain_ring<F>(&mut self, mut turn: F)
    where
        F: FnMut(ProcessRecord, bool) -> (ProcessRecord, bool),
    {
        let (Some(first), Some(last)) = (self.head(), self.tail) else {
            return;
        };

        // Close the ring and detach it from the sentinel
        self.nodes[last].next = Some(first);
        self.nodes[first].prev = Some(last);
        self.nodes[SENTINEL].next = None;
        self.tail = None;

        let mut in_ring = self.len;
        let mut finished = Vec::with_capacity(self.len);
        let mut current = first;

        while in_ring > 0 {
            let Some(record) = self.nodes[current].record.take() else {
                break;
            };
            let alone = in_ring == 1;
            let (record, done) = turn(record, alone);
            self.nodes[current].record = Some(record);

            let next = self.nodes[current].next.unwrap_or(current);
            if done || alone {
                let prev = self.prev_of(current);
                self.nodes[prev].next = Some(next);
                self.nodes[next].prev = Some(prev);
                self.nodes[current].prev = None;
                self.nodes[current].next = None;
                finished.push(current);
                in_ring -= 1;
            }
            current = next;
        }

        let mut at = SENTINEL;
        for idx in finished {
            self.link_after(at, idx);
            at = idx;
        }
    }
}
