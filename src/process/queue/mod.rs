/*!
 * Ready Queue
 * Sentinel-headed doubly-linked list of process records
 *
 * Nodes live in an arena (`Vec<Node>`) and link to each other by index, so
 * relocating a record is O(1) pointer surgery without any unsafe code.
 * Slot 0 is the sentinel: it never holds a record and its `prev` link is
 * always `None`. Freed slots are recycled through a free list.
 */

use super::types::ProcessRecord;
use crate::core::types::Pid;
use std::fmt;

mod operations;
mod ring;
mod sort;

/// Arena index of the sentinel head
const SENTINEL: usize = 0;

#[derive(Debug, Clone)]
struct Node {
    record: Option<ProcessRecord>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Node {
    const fn vacant() -> Self {
        Self {
            record: None,
            prev: None,
            next: None,
        }
    }
}

/// Ordered collection of processes awaiting or undergoing execution
///
/// # Invariants
/// - `nodes[SENTINEL].prev` is always `None`
/// - every live node's `prev` is `Some`, the first node points back at the sentinel
/// - `tail` is the last live node, or `None` when the queue is empty
#[derive(Debug, Clone)]
pub struct ReadyQueue {
    nodes: Vec<Node>,
    free: Vec<usize>,
    tail: Option<usize>,
    len: usize,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a queue with room for `capacity` records before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(Node::vacant());
        Self {
            nodes,
            free: Vec::new(),
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> Option<&ProcessRecord> {
        self.head().and_then(|idx| self.record(idx))
    }

    pub fn back(&self) -> Option<&ProcessRecord> {
        self.tail.and_then(|idx| self.record(idx))
    }

    /// Iterate front to back
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            queue: self,
            cursor: self.head(),
            remaining: self.len,
        }
    }

    /// Process ids front to back
    pub fn ids(&self) -> Vec<Pid> {
        self.iter().map(|record| record.id).collect()
    }

    /// Remove every record, front to back
    pub fn drain(&mut self) -> Vec<ProcessRecord> {
        let mut records = Vec::with_capacity(self.len);
        while let Some(record) = self.pop_front() {
            records.push(record);
        }
        records
    }

    // -------------------------------------------------------------------------
    // Arena plumbing shared by the submodules
    // -------------------------------------------------------------------------

    #[inline]
    fn head(&self) -> Option<usize> {
        self.nodes[SENTINEL].next
    }

    #[inline]
    fn next_of(&self, idx: usize) -> Option<usize> {
        self.nodes[idx].next
    }

    #[inline]
    fn prev_of(&self, idx: usize) -> usize {
        self.nodes[idx].prev.unwrap_or(SENTINEL)
    }

    #[inline]
    fn record(&self, idx: usize) -> Option<&ProcessRecord> {
        self.nodes[idx].record.as_ref()
    }

    /// Place a record in a free slot and return its index (unlinked)
    fn alloc(&mut self, record: ProcessRecord) -> usize {
        let node = Node {
            record: Some(record),
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Return a slot to the free list, handing back its record
    fn release(&mut self, idx: usize) -> Option<ProcessRecord> {
        let record = self.nodes[idx].record.take();
        self.nodes[idx] = Node::vacant();
        self.free.push(idx);
        record
    }

    /// Detach a live node from its neighbours, fixing the tail
    fn unlink(&mut self, idx: usize) {
        let prev = self.prev_of(idx);
        let next = self.nodes[idx].next;

        self.nodes[prev].next = next;
        match next {
            Some(next) => self.nodes[next].prev = Some(prev),
            None => self.tail = if prev == SENTINEL { None } else { Some(prev) },
        }

        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    /// Splice a detached node in right after `at` (which may be the sentinel)
    fn link_after(&mut self, at: usize, idx: usize) {
        let next = self.nodes[at].next;

        self.nodes[idx].prev = Some(at);
        self.nodes[idx].next = next;
        self.nodes[at].next = Some(idx);
        match next {
            Some(next) => self.nodes[next].prev = Some(idx),
            None => self.tail = Some(idx),
        }
    }

    #[cfg(test)]
    fn assert_links(&self) {
        assert!(self.nodes[SENTINEL].prev.is_none(), "sentinel prev must stay unused");
        assert!(self.nodes[SENTINEL].record.is_none(), "sentinel never holds data");

        let mut count = 0;
        let mut prev = SENTINEL;
        let mut cursor = self.head();
        while let Some(idx) = cursor {
            assert_eq!(self.nodes[idx].prev, Some(prev), "broken back link at {}", idx);
            assert!(self.nodes[idx].record.is_some(), "live node {} without record", idx);
            prev = idx;
            cursor = self.nodes[idx].next;
            count += 1;
        }
        assert_eq!(count, self.len);
        assert_eq!(self.tail, if count == 0 { None } else { Some(prev) });
    }
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`ReadyQueue`]
pub struct Iter<'a> {
    queue: &'a ReadyQueue,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ProcessRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        self.cursor = self.queue.next_of(idx);
        self.remaining = self.remaining.saturating_sub(1);
        self.queue.record(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> IntoIterator for &'a ReadyQueue {
    type Item = &'a ProcessRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ReadyQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ReadyQueue ({} processes)", self.len)?;
        for (position, record) in self.iter().enumerate() {
            writeln!(f, "  {:>3}. {}", position, record)?;
        }
        Ok(())
    }
}
