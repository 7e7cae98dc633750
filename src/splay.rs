//! Self-adjusting binary search tree with an in-order linked list.
//!
//! Nodes live in a [`Slab`] arena and refer to each other by index,
//! so rotations are plain index reassignments. The tree does not own
//! an ordering: every operation that needs one takes it as an
//! argument. This lets the sweep compare segments against a moving
//! sweep line, as long as the ordering of the stored values does not
//! change within one call.
use std::{cmp::Ordering, fmt::Debug};

use slab::Slab;

/// Handle to a node in a [`SplayList`].
///
/// Handles are reused after a node is removed.
pub type NodeId = usize;

#[derive(Debug)]
struct Node<T> {
    value: T,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Node {
            value,
            parent: None,
            left: None,
            right: None,
            prev: None,
            next: None,
        }
    }
}

/// Splay tree whose in-order sequence is also kept as a doubly linked
/// list.
///
/// Insertion and removal are amortized `O(log n)`; predecessor and
/// successor of a node are `O(1)`.
#[derive(Debug)]
pub struct SplayList<T> {
    nodes: Slab<Node<T>>,
    root: Option<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<T> Default for SplayList<T> {
    fn default() -> Self {
        SplayList {
            nodes: Slab::new(),
            root: None,
            head: None,
            tail: None,
        }
    }
}

impl<T> SplayList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(size: usize) -> Self {
        SplayList {
            nodes: Slab::with_capacity(size),
            ..Default::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &T {
        &self.nodes[id].value
    }

    /// The smallest node.
    #[inline]
    pub fn first(&self) -> Option<NodeId> {
        self.head
    }

    /// The largest node.
    #[inline]
    pub fn last(&self) -> Option<NodeId> {
        self.tail
    }

    #[inline]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].prev
    }

    #[inline]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].next
    }

    /// Iterate over `(handle, value)` in order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cur: self.first(),
        }
    }

    /// Rotate `x` above its parent.
    fn rotate(&mut self, x: NodeId) {
        let p = match self.nodes[x].parent {
            Some(p) => p,
            None => return,
        };
        let g = self.nodes[p].parent;

        if self.nodes[p].left == Some(x) {
            let b = self.nodes[x].right;
            self.nodes[p].left = b;
            if let Some(b) = b {
                self.nodes[b].parent = Some(p);
            }
            self.nodes[x].right = Some(p);
        } else {
            let b = self.nodes[x].left;
            self.nodes[p].right = b;
            if let Some(b) = b {
                self.nodes[b].parent = Some(p);
            }
            self.nodes[x].left = Some(p);
        }
        self.nodes[p].parent = Some(x);
        self.nodes[x].parent = g;

        match g {
            Some(g) => {
                if self.nodes[g].left == Some(p) {
                    self.nodes[g].left = Some(x);
                } else {
                    self.nodes[g].right = Some(x);
                }
            }
            None => self.root = Some(x),
        }
    }

    /// Move `x` to the top of its tree.
    fn splay(&mut self, x: NodeId) {
        while let Some(p) = self.nodes[x].parent {
            match self.nodes[p].parent {
                // zig
                None => self.rotate(x),
                Some(g) => {
                    let x_left = self.nodes[p].left == Some(x);
                    let p_left = self.nodes[g].left == Some(p);
                    if x_left == p_left {
                        // zig-zig
                        self.rotate(p);
                        self.rotate(x);
                    } else {
                        // zig-zag
                        self.rotate(x);
                        self.rotate(x);
                    }
                }
            }
        }
    }

    /// Insert `value` after every node that `cmp` orders strictly
    /// before it.
    ///
    /// `cmp(existing, value)` must be consistent with the current
    /// order of the list.
    pub fn insert_by<F>(&mut self, value: T, mut cmp: F) -> NodeId
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut pred = None;
        let mut succ = None;
        let mut cur = self.root;
        while let Some(c) = cur {
            if cmp(&self.nodes[c].value, &value) == Ordering::Less {
                pred = Some(c);
                cur = self.nodes[c].right;
            } else {
                succ = Some(c);
                cur = self.nodes[c].left;
            }
        }

        let id = self.nodes.insert(Node::new(value));
        match (pred, succ) {
            (Some(p), _) => {
                self.splay(p);
                let r = self.nodes[p].right;
                self.nodes[id].right = r;
                if let Some(r) = r {
                    self.nodes[r].parent = Some(id);
                }
                self.nodes[p].right = Some(id);
                self.nodes[id].parent = Some(p);

                let next = self.nodes[p].next;
                self.nodes[id].prev = Some(p);
                self.nodes[id].next = next;
                match next {
                    Some(n) => self.nodes[n].prev = Some(id),
                    None => self.tail = Some(id),
                }
                self.nodes[p].next = Some(id);
            }
            (None, Some(s)) => {
                self.splay(s);
                let l = self.nodes[s].left;
                self.nodes[id].left = l;
                if let Some(l) = l {
                    self.nodes[l].parent = Some(id);
                }
                self.nodes[s].left = Some(id);
                self.nodes[id].parent = Some(s);

                let prev = self.nodes[s].prev;
                self.nodes[id].next = Some(s);
                self.nodes[id].prev = prev;
                match prev {
                    Some(q) => self.nodes[q].next = Some(id),
                    None => self.head = Some(id),
                }
                self.nodes[s].prev = Some(id);
            }
            (None, None) => {
                self.root = Some(id);
                self.head = Some(id);
                self.tail = Some(id);
            }
        }
        self.splay(id);
        id
    }

    /// Remove a node and return its value.
    pub fn remove(&mut self, id: NodeId) -> T {
        let (prev, next) = (self.nodes[id].prev, self.nodes[id].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }

        self.splay(id);
        let (left, right) = (self.nodes[id].left, self.nodes[id].right);
        match left {
            None => {
                self.root = right;
                if let Some(r) = right {
                    self.nodes[r].parent = None;
                }
            }
            Some(l) => {
                self.nodes[l].parent = None;
                let mut max = l;
                while let Some(r) = self.nodes[max].right {
                    max = r;
                }
                self.splay(max);
                self.nodes[max].right = right;
                if let Some(r) = right {
                    self.nodes[r].parent = Some(max);
                }
                self.root = Some(max);
            }
        }
        self.nodes.remove(id).value
    }

    /// Split the list by a monotone `probe`.
    ///
    /// Returns the last node for which `probe` is `Less` and the first
    /// node for which it is not. The last visited node is splayed.
    pub fn partition_by<F>(&mut self, mut probe: F) -> (Option<NodeId>, Option<NodeId>)
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut lo = None;
        let mut hi = None;
        let mut last = None;
        let mut cur = self.root;
        while let Some(c) = cur {
            last = Some(c);
            if probe(&self.nodes[c].value) == Ordering::Less {
                lo = Some(c);
                cur = self.nodes[c].right;
            } else {
                hi = Some(c);
                cur = self.nodes[c].left;
            }
        }
        if let Some(l) = last {
            self.splay(l);
        }
        (lo, hi)
    }

    /// Verify the links of the tree and the list, and that the values
    /// are strictly increasing under `cmp`.
    pub fn check_invariants<F>(&self, mut cmp: F) -> Result<(), String>
    where
        F: FnMut(&T, &T) -> Ordering,
        T: Debug,
    {
        if let Some(r) = self.root {
            if self.nodes[r].parent.is_some() {
                return Err(format!("root {} has a parent", r));
            }
        } else if !self.nodes.is_empty() {
            return Err("nodes without a root".to_string());
        }

        // In-order walk of the tree.
        let mut in_order = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cur = self.root;
        while cur.is_some() || !stack.is_empty() {
            while let Some(c) = cur {
                for child in [self.nodes[c].left, self.nodes[c].right].iter().flatten() {
                    if self.nodes[*child].parent != Some(c) {
                        return Err(format!("child {} does not point back to {}", child, c));
                    }
                }
                stack.push(c);
                cur = self.nodes[c].left;
            }
            if let Some(c) = stack.pop() {
                in_order.push(c);
                cur = self.nodes[c].right;
            }
        }
        if in_order.len() != self.nodes.len() {
            return Err(format!(
                "tree reaches {} of {} nodes",
                in_order.len(),
                self.nodes.len()
            ));
        }

        let listed: Vec<_> = self.iter().map(|(id, _)| id).collect();
        if listed != in_order {
            return Err(format!(
                "list order {:?} differs from tree order {:?}",
                listed, in_order
            ));
        }
        if self.last() != in_order.last().copied() {
            return Err("tail is not the last node".to_string());
        }
        for w in in_order.windows(2) {
            if self.nodes[w[1]].prev != Some(w[0]) {
                return Err(format!("broken prev link at {}", w[1]));
            }
            let (a, b) = (&self.nodes[w[0]].value, &self.nodes[w[1]].value);
            if cmp(a, b) != Ordering::Less {
                return Err(format!("{:?} is not ordered before {:?}", a, b));
            }
        }
        Ok(())
    }
}

/// In-order iterator over a [`SplayList`].
pub struct Iter<'a, T> {
    list: &'a SplayList<T>,
    cur: Option<NodeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        let node = &self.list.nodes[id];
        self.cur = node.next;
        Some((id, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn values(list: &SplayList<i32>) -> Vec<i32> {
        list.iter().map(|(_, v)| *v).collect()
    }

    #[test]
    fn test_insert_in_order() {
        let mut list = SplayList::new();
        let ids: Vec<_> = [5, 1, 9, 3, 7]
            .iter()
            .map(|v| list.insert_by(*v, i32::cmp))
            .collect();
        assert_eq!(values(&list), vec![1, 3, 5, 7, 9]);
        list.check_invariants(i32::cmp).unwrap();

        // 5 sits between 3 and 7.
        assert_eq!(list.prev(ids[0]), Some(ids[3]));
        assert_eq!(list.next(ids[0]), Some(ids[4]));
        assert_eq!(list.first(), Some(ids[1]));
        assert_eq!(list.last(), Some(ids[2]));
        assert_eq!(list.prev(ids[1]), None);
        assert_eq!(list.next(ids[2]), None);
    }

    #[test]
    fn test_remove() {
        let mut list = SplayList::new();
        let ids: Vec<_> = (0..10).map(|v| list.insert_by(v, i32::cmp)).collect();

        assert_eq!(list.remove(ids[4]), 4);
        assert_eq!(list.next(ids[3]), Some(ids[5]));
        assert_eq!(list.prev(ids[5]), Some(ids[3]));

        assert_eq!(list.remove(ids[0]), 0);
        assert_eq!(list.remove(ids[9]), 9);
        assert_eq!(list.first(), Some(ids[1]));
        assert_eq!(list.last(), Some(ids[8]));
        assert_eq!(values(&list), vec![1, 2, 3, 5, 6, 7, 8]);
        list.check_invariants(i32::cmp).unwrap();

        for id in [1, 2, 3, 5, 6, 7, 8] {
            list.remove(ids[id]);
        }
        assert!(list.is_empty());
        assert_eq!(list.first(), None);
        list.check_invariants(i32::cmp).unwrap();
    }

    #[test]
    fn test_partition() {
        let mut list = SplayList::new();
        let ids: Vec<_> = [10, 20, 30, 40].iter().map(|v| list.insert_by(*v, i32::cmp)).collect();

        assert_eq!(list.partition_by(|v| v.cmp(&25)), (Some(ids[1]), Some(ids[2])));
        assert_eq!(list.partition_by(|v| v.cmp(&30)), (Some(ids[1]), Some(ids[2])));
        assert_eq!(list.partition_by(|v| v.cmp(&5)), (None, Some(ids[0])));
        assert_eq!(list.partition_by(|v| v.cmp(&45)), (Some(ids[3]), None));
        list.check_invariants(i32::cmp).unwrap();
    }

    #[test]
    fn test_order_depends_on_context() {
        // The same values ordered by an external key, as the sweep does.
        let keys = vec![3, 1, 2];
        let mut list = SplayList::new();
        for i in 0..keys.len() {
            list.insert_by(i, |a, b| keys[*a].cmp(&keys[*b]));
        }
        let order: Vec<_> = list.iter().map(|(_, v)| *v).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_random_against_btree() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut list = SplayList::new();
        let mut reference = BTreeMap::new();

        for _ in 0..2000 {
            let v: i32 = rng.gen_range(0..500);
            if let Some(id) = reference.remove(&v) {
                assert_eq!(list.remove(id), v);
            } else {
                let id = list.insert_by(v, i32::cmp);
                reference.insert(v, id);
            }
        }
        list.check_invariants(i32::cmp).unwrap();
        assert_eq!(list.len(), reference.len());
        assert_eq!(values(&list), reference.keys().copied().collect::<Vec<_>>());

        for (id, v) in list.iter() {
            assert_eq!(reference[v], id);
        }
    }
}
