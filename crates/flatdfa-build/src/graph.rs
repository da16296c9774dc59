// State arena: transition slots and incoming-edge counts, addressed by index.

use flatdfa_core::{NULL_TRANSITION, Symbol, Value};

/// Index of a state in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

struct Node {
    /// One slot per symbol for inner states; empty for terminals.
    next: Vec<Option<StateId>>,
    /// Number of edges pointing at this state.
    incoming: u32,
    /// Classification value (terminals only).
    value: Value,
}

/// Arena of automaton states.
///
/// Every edge change goes through [`Graph::set_edge`] so that incoming counts
/// stay exact. A state with more than one incoming edge is a confluence state:
/// other words run through it, so it must be cloned rather than edited.
///
/// Released slots are kept on a free list and reused by later allocations.
pub struct Graph {
    nodes: Vec<Node>,
    free: Vec<StateId>,
    alphabet_size: usize,
}

impl Graph {
    pub fn new(alphabet_size: usize) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            alphabet_size,
        }
    }

    fn alloc(&mut self, slots: usize, value: Value) -> StateId {
        if let Some(id) = self.free.pop() {
            let node = &mut self.nodes[id.index()];
            node.next.clear();
            node.next.resize(slots, None);
            node.incoming = 0;
            node.value = value;
            return id;
        }
        let id = StateId(self.nodes.len() as u32);
        self.nodes.push(Node {
            next: vec![None; slots],
            incoming: 0,
            value,
        });
        id
    }

    /// Allocate an inner state with every slot empty.
    pub fn add_state(&mut self) -> StateId {
        self.alloc(self.alphabet_size, NULL_TRANSITION)
    }

    /// Allocate a terminal state carrying `value`.
    pub fn add_terminal(&mut self, value: Value) -> StateId {
        self.alloc(0, value)
    }

    /// Allocate a copy of `source` with the same outgoing edges.
    ///
    /// The copy starts with no incoming edges; every target gains one.
    pub fn clone_state(&mut self, source: StateId) -> StateId {
        let copy = self.add_state();
        for symbol in 0..self.alphabet_size {
            if let Some(target) = self.nodes[source.index()].next[symbol] {
                self.nodes[copy.index()].next[symbol] = Some(target);
                self.nodes[target.index()].incoming += 1;
            }
        }
        copy
    }

    /// Point slot `symbol` of `from` at `to`, adjusting both incoming counts.
    pub fn set_edge(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        let old = self.nodes[from.index()].next[symbol as usize].replace(to);
        if let Some(old) = old {
            self.nodes[old.index()].incoming -= 1;
        }
        self.nodes[to.index()].incoming += 1;
    }

    /// Drop an unreferenced state, removing its outgoing edges.
    pub fn release(&mut self, id: StateId) {
        debug_assert_eq!(self.nodes[id.index()].incoming, 0, "released state still referenced");
        let next = std::mem::take(&mut self.nodes[id.index()].next);
        for target in next.iter().flatten() {
            self.nodes[target.index()].incoming -= 1;
        }
        self.nodes[id.index()].next = next;
        self.free.push(id);
    }

    #[inline]
    pub fn next(&self, id: StateId, symbol: Symbol) -> Option<StateId> {
        self.nodes[id.index()].next[symbol as usize]
    }

    /// Outgoing slots of a state; its identity within a height pool.
    #[inline]
    pub fn transitions(&self, id: StateId) -> &[Option<StateId>] {
        &self.nodes[id.index()].next
    }

    #[inline]
    pub fn incoming(&self, id: StateId) -> u32 {
        self.nodes[id.index()].incoming
    }

    #[inline]
    pub fn is_confluence(&self, id: StateId) -> bool {
        self.incoming(id) > 1
    }

    /// Value carried by a terminal state.
    #[inline]
    pub fn value(&self, id: StateId) -> Value {
        self.nodes[id.index()].value
    }

    /// Number of arena slots ever allocated.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of states currently in use.
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_edge_tracks_incoming() {
        let mut g = Graph::new(3);
        let a = g.add_state();
        let b = g.add_state();
        let c = g.add_state();

        g.set_edge(a, 0, b);
        g.set_edge(a, 1, b);
        assert_eq!(g.incoming(b), 2);
        assert!(g.is_confluence(b));

        g.set_edge(a, 1, c);
        assert_eq!(g.incoming(b), 1);
        assert_eq!(g.incoming(c), 1);
        assert_eq!(g.next(a, 1), Some(c));
        assert_eq!(g.next(a, 2), None);
    }

    #[test]
    fn clone_copies_edges() {
        let mut g = Graph::new(2);
        let parent = g.add_state();
        let shared = g.add_state();
        let leaf = g.add_terminal(4);
        g.set_edge(parent, 0, shared);
        g.set_edge(shared, 1, leaf);

        let copy = g.clone_state(shared);
        assert_eq!(g.transitions(copy), g.transitions(shared));
        assert_eq!(g.incoming(copy), 0);
        assert_eq!(g.incoming(leaf), 2);
        assert_eq!(g.value(leaf), 4);
    }

    #[test]
    fn release_reuses_slot() {
        let mut g = Graph::new(2);
        let a = g.add_state();
        let leaf = g.add_terminal(1);
        g.set_edge(a, 0, leaf);
        assert_eq!(g.live_count(), 2);

        g.release(a);
        assert_eq!(g.incoming(leaf), 0);
        assert_eq!(g.live_count(), 1);
        assert_eq!(g.free_count(), 1);

        let b = g.add_state();
        assert_eq!(b, a);
        assert_eq!(g.transitions(b), &[None, None]);
        assert_eq!(g.capacity(), 2);
    }

    #[test]
    fn terminal_has_no_slots() {
        let mut g = Graph::new(4);
        let t = g.add_terminal(-9);
        assert!(g.transitions(t).is_empty());
        assert_eq!(g.value(t), -9);
    }
}
