//! Hash array mapped trie holding the elements of a frozen set.
//!
//! The trie is keyed by [`StructuralKey::structural_hash`] and resolves
//! collisions with `Eq`:
//! - 32-way branching (5 bits of hash per level)
//! - Bitmap to track which slots are occupied
//! - Collision nodes for distinct elements with identical hashes
//! - Structural sharing via [`ReferenceCounter`]
//!
//! Inserting an element that is already present keeps the stored
//! representative, so deduplication never replaces shared sub-structure.

use crate::element::StructuralKey;

use super::ReferenceCounter;

// =============================================================================
// Constants
// =============================================================================

/// Branching factor (2^5 = 32)
const BRANCHING_FACTOR: usize = 32;

/// Bits per level in the trie
const BITS_PER_LEVEL: usize = 5;

/// Bit mask for extracting index within a node
const MASK: u64 = (BRANCHING_FACTOR - 1) as u64;

/// Extracts the index at a given depth from a hash.
#[inline]
const fn hash_index(hash: u64, depth: usize) -> usize {
    ((hash >> (depth * BITS_PER_LEVEL)) & MASK) as usize
}

// =============================================================================
// Node Definition
// =============================================================================

#[derive(Clone)]
enum Node<T> {
    Empty,
    Entry {
        hash: u64,
        element: T,
    },
    Bitmap {
        bitmap: u32,
        children: ReferenceCounter<[Child<T>]>,
    },
    /// Distinct elements sharing one full hash
    Collision {
        hash: u64,
        elements: ReferenceCounter<[T]>,
    },
}

#[derive(Clone)]
enum Child<T> {
    Entry { hash: u64, element: T },
    Node(ReferenceCounter<Node<T>>),
}

// =============================================================================
// ElementTable Definition
// =============================================================================

/// Persistent, deduplicating storage for structurally-keyed elements.
#[derive(Clone)]
pub(crate) struct ElementTable<T> {
    root: ReferenceCounter<Node<T>>,
    length: usize,
}

impl<T> ElementTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            root: ReferenceCounter::new(Node::Empty),
            length: 0,
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.length
    }

    pub(crate) fn iter(&self) -> TableIterator<'_, T> {
        let mut iterator = TableIterator {
            stack: Vec::new(),
            remaining: self.length,
        };
        iterator.push_node(&self.root);
        iterator
    }
}

impl<T: StructuralKey + Clone> ElementTable<T> {
    /// Returns the stored element equal to `element`.
    pub(crate) fn get(&self, element: &T) -> Option<&T> {
        Self::get_from_node(&self.root, element, element.structural_hash(), 0)
    }

    fn get_from_node<'a>(node: &'a Node<T>, element: &T, hash: u64, depth: usize) -> Option<&'a T> {
        match node {
            Node::Empty => None,
            Node::Entry {
                hash: entry_hash,
                element: stored,
            } => (*entry_hash == hash && stored == element).then_some(stored),
            Node::Bitmap { bitmap, children } => {
                let bit = 1u32 << hash_index(hash, depth);
                if bitmap & bit == 0 {
                    return None;
                }
                let position = (bitmap & (bit - 1)).count_ones() as usize;
                match &children[position] {
                    Child::Entry {
                        hash: entry_hash,
                        element: stored,
                    } => (*entry_hash == hash && stored == element).then_some(stored),
                    Child::Node(subnode) => Self::get_from_node(subnode, element, hash, depth + 1),
                }
            }
            Node::Collision {
                hash: collision_hash,
                elements,
            } => {
                if *collision_hash == hash {
                    elements.iter().find(|stored| *stored == element)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    pub(crate) fn contains(&self, element: &T) -> bool {
        self.get(element).is_some()
    }

    /// Returns a table that also holds `element`.
    ///
    /// When an equal element is already stored the table is returned as-is.
    #[must_use]
    pub(crate) fn insert(&self, element: T) -> Self {
        let hash = element.structural_hash();
        let (new_root, added) = Self::insert_into_node(&self.root, element, hash, 0);
        if !added {
            return self.clone();
        }
        Self {
            root: ReferenceCounter::new(new_root),
            length: self.length + 1,
        }
    }

    /// Returns (`new_node`, `was_added`).
    fn insert_into_node(node: &Node<T>, element: T, hash: u64, depth: usize) -> (Node<T>, bool) {
        match node {
            Node::Empty => (Node::Entry { hash, element }, true),
            Node::Entry {
                hash: existing_hash,
                element: existing,
            } => Self::insert_into_entry_node(*existing_hash, existing, element, hash, depth),
            Node::Bitmap { bitmap, children } => {
                Self::insert_into_bitmap_node(*bitmap, children, element, hash, depth)
            }
            Node::Collision {
                hash: collision_hash,
                elements,
            } => Self::insert_into_collision_node(
                node,
                *collision_hash,
                elements,
                element,
                hash,
                depth,
            ),
        }
    }

    fn insert_into_entry_node(
        existing_hash: u64,
        existing: &T,
        element: T,
        hash: u64,
        depth: usize,
    ) -> (Node<T>, bool) {
        if existing_hash == hash && *existing == element {
            (
                Node::Entry {
                    hash,
                    element: existing.clone(),
                },
                false,
            )
        } else if existing_hash == hash {
            let elements = ReferenceCounter::from(vec![existing.clone(), element]);
            (Node::Collision { hash, elements }, true)
        } else {
            Self::create_bitmap_from_two_entries(existing_hash, existing, element, hash, depth)
        }
    }

    fn create_bitmap_from_two_entries(
        existing_hash: u64,
        existing: &T,
        element: T,
        hash: u64,
        depth: usize,
    ) -> (Node<T>, bool) {
        let existing_index = hash_index(existing_hash, depth);
        let new_index = hash_index(hash, depth);

        if existing_index == new_index {
            let sub_entry = Node::Entry {
                hash: existing_hash,
                element: existing.clone(),
            };
            let (subnode, added) = Self::insert_into_node(&sub_entry, element, hash, depth + 1);
            let children = ReferenceCounter::from(vec![Child::Node(ReferenceCounter::new(subnode))]);
            (
                Node::Bitmap {
                    bitmap: 1u32 << existing_index,
                    children,
                },
                added,
            )
        } else {
            let existing_child = Child::Entry {
                hash: existing_hash,
                element: existing.clone(),
            };
            let new_child = Child::Entry { hash, element };
            let children = if existing_index < new_index {
                vec![existing_child, new_child]
            } else {
                vec![new_child, existing_child]
            };
            (
                Node::Bitmap {
                    bitmap: (1u32 << existing_index) | (1u32 << new_index),
                    children: ReferenceCounter::from(children),
                },
                true,
            )
        }
    }

    fn insert_into_bitmap_node(
        bitmap: u32,
        children: &ReferenceCounter<[Child<T>]>,
        element: T,
        hash: u64,
        depth: usize,
    ) -> (Node<T>, bool) {
        let bit = 1u32 << hash_index(hash, depth);
        let position = (bitmap & (bit - 1)).count_ones() as usize;

        if bitmap & bit == 0 {
            let mut new_children = children.to_vec();
            new_children.insert(position, Child::Entry { hash, element });
            return (
                Node::Bitmap {
                    bitmap: bitmap | bit,
                    children: ReferenceCounter::from(new_children),
                },
                true,
            );
        }

        let new_child = match &children[position] {
            Child::Entry {
                hash: child_hash,
                element: child,
            } => {
                if *child_hash == hash && *child == element {
                    return (
                        Node::Bitmap {
                            bitmap,
                            children: ReferenceCounter::clone(children),
                        },
                        false,
                    );
                }
                let child_entry = Node::Entry {
                    hash: *child_hash,
                    element: child.clone(),
                };
                let (subnode, _) = Self::insert_into_node(&child_entry, element, hash, depth + 1);
                Child::Node(ReferenceCounter::new(subnode))
            }
            Child::Node(subnode) => {
                let (new_subnode, added) =
                    Self::insert_into_node(subnode, element, hash, depth + 1);
                if !added {
                    return (
                        Node::Bitmap {
                            bitmap,
                            children: ReferenceCounter::clone(children),
                        },
                        false,
                    );
                }
                Child::Node(ReferenceCounter::new(new_subnode))
            }
        };

        let mut new_children = children.to_vec();
        new_children[position] = new_child;
        (
            Node::Bitmap {
                bitmap,
                children: ReferenceCounter::from(new_children),
            },
            true,
        )
    }

    fn insert_into_collision_node(
        node: &Node<T>,
        collision_hash: u64,
        elements: &ReferenceCounter<[T]>,
        element: T,
        hash: u64,
        depth: usize,
    ) -> (Node<T>, bool) {
        if hash == collision_hash {
            if elements.iter().any(|stored| *stored == element) {
                return (node.clone(), false);
            }
            let mut new_elements = elements.to_vec();
            new_elements.push(element);
            (
                Node::Collision {
                    hash: collision_hash,
                    elements: ReferenceCounter::from(new_elements),
                },
                true,
            )
        } else {
            Self::convert_collision_to_bitmap(node, collision_hash, element, hash, depth)
        }
    }

    /// Pushes a collision node one level down when a new hash reaches it.
    fn convert_collision_to_bitmap(
        node: &Node<T>,
        collision_hash: u64,
        element: T,
        hash: u64,
        depth: usize,
    ) -> (Node<T>, bool) {
        let collision_index = hash_index(collision_hash, depth);
        let new_index = hash_index(hash, depth);

        if collision_index == new_index {
            let (subnode, added) = Self::insert_into_node(node, element, hash, depth + 1);
            let children = ReferenceCounter::from(vec![Child::Node(ReferenceCounter::new(subnode))]);
            (
                Node::Bitmap {
                    bitmap: 1u32 << collision_index,
                    children,
                },
                added,
            )
        } else {
            let collision_child = Child::Node(ReferenceCounter::new(node.clone()));
            let new_child = Child::Entry { hash, element };
            let children = if collision_index < new_index {
                vec![collision_child, new_child]
            } else {
                vec![new_child, collision_child]
            };
            (
                Node::Bitmap {
                    bitmap: (1u32 << collision_index) | (1u32 << new_index),
                    children: ReferenceCounter::from(children),
                },
                true,
            )
        }
    }
}

impl<T: StructuralKey + Clone> FromIterator<T> for ElementTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |table, element| table.insert(element))
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

enum Frame<'a, T> {
    Children(std::slice::Iter<'a, Child<T>>),
    Elements(std::slice::Iter<'a, T>),
}

enum Step<'a, T> {
    Yield(&'a T),
    Descend(&'a Node<T>),
    Pop,
}

/// Lazy depth-first walk over the trie.
///
/// The walk order depends only on the trie's shape, so it is stable for the
/// lifetime of one table.
pub(crate) struct TableIterator<'a, T> {
    stack: Vec<Frame<'a, T>>,
    remaining: usize,
}

impl<'a, T> TableIterator<'a, T> {
    fn push_node(&mut self, node: &'a Node<T>) {
        match node {
            Node::Empty => {}
            Node::Entry { element, .. } => self
                .stack
                .push(Frame::Elements(std::slice::from_ref(element).iter())),
            Node::Bitmap { children, .. } => self.stack.push(Frame::Children(children.iter())),
            Node::Collision { elements, .. } => self.stack.push(Frame::Elements(elements.iter())),
        }
    }
}

impl<'a, T> Iterator for TableIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = match self.stack.last_mut()? {
                Frame::Children(children) => match children.next() {
                    Some(Child::Entry { element, .. }) => Step::Yield(element),
                    Some(Child::Node(subnode)) => Step::Descend(subnode),
                    None => Step::Pop,
                },
                Frame::Elements(elements) => elements.next().map_or(Step::Pop, Step::Yield),
            };
            match step {
                Step::Yield(element) => {
                    self.remaining -= 1;
                    return Some(element);
                }
                Step::Descend(node) => self.push_node(node),
                Step::Pop => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for TableIterator<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    /// Key whose hash is chosen by the test, to force collisions.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Keyed {
        hash: u64,
        name: &'static str,
    }

    impl StructuralKey for Keyed {
        fn structural_hash(&self) -> u64 {
            self.hash
        }
    }

    const fn keyed(hash: u64, name: &'static str) -> Keyed {
        Keyed { hash, name }
    }

    #[rstest]
    fn test_new_table_is_empty() {
        let table: ElementTable<Keyed> = ElementTable::new();
        assert_eq!(table.len(), 0);
        assert_eq!(table.iter().count(), 0);
    }

    #[rstest]
    fn test_insert_deduplicates() {
        let table = ElementTable::new()
            .insert(keyed(1, "a"))
            .insert(keyed(2, "b"))
            .insert(keyed(1, "a"));
        assert_eq!(table.len(), 2);
        assert!(table.contains(&keyed(1, "a")));
        assert!(table.contains(&keyed(2, "b")));
        assert!(!table.contains(&keyed(3, "c")));
    }

    #[rstest]
    fn test_full_hash_collisions_are_resolved_by_equality() {
        let table: ElementTable<Keyed> = [keyed(7, "a"), keyed(7, "b"), keyed(7, "c"), keyed(7, "a")]
            .into_iter()
            .collect();
        assert_eq!(table.len(), 3);
        assert!(table.contains(&keyed(7, "b")));
        assert!(!table.contains(&keyed(7, "d")));
    }

    #[rstest]
    fn test_collision_node_moves_down_on_new_hash() {
        // 7 and 7 + 32 share the first trie index but not the full hash.
        let table = ElementTable::new()
            .insert(keyed(7, "a"))
            .insert(keyed(7, "b"))
            .insert(keyed(7 + 32, "c"))
            .insert(keyed(8, "d"));
        assert_eq!(table.len(), 4);
        for key in [keyed(7, "a"), keyed(7, "b"), keyed(39, "c"), keyed(8, "d")] {
            assert!(table.contains(&key), "{key:?}");
        }
    }

    #[rstest]
    fn test_shared_prefix_hashes_nest() {
        let table: ElementTable<Keyed> = (0..64)
            .map(|index| keyed(index << 5, "shared-low-bits"))
            .collect();
        assert_eq!(table.len(), 64);
        assert!((0..64).all(|index| table.contains(&keyed(index << 5, "shared-low-bits"))));
    }

    #[rstest]
    fn test_insert_keeps_original_table_unchanged() {
        let original = ElementTable::new().insert(keyed(1, "a"));
        let extended = original.insert(keyed(2, "b"));
        assert_eq!(original.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(!original.contains(&keyed(2, "b")));
    }

    #[rstest]
    fn test_get_returns_first_representative() {
        let table = ElementTable::new().insert(keyed(5, "x"));
        let again = table.insert(keyed(5, "x"));
        let first = table.get(&keyed(5, "x")).unwrap();
        let second = again.get(&keyed(5, "x")).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[rstest]
    fn test_iteration_visits_every_element_once() {
        let table: ElementTable<Keyed> = (0..1000).map(|index| keyed(index * 7919, "n")).collect();
        let iterator = table.iter();
        assert_eq!(iterator.len(), 1000);
        let seen: HashSet<u64> = table.iter().map(|key| key.hash).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[rstest]
    fn test_iteration_is_restartable_and_stable() {
        let table: ElementTable<Keyed> = (0..100).map(|index| keyed(index, "n")).collect();
        let first: Vec<u64> = table.iter().map(|key| key.hash).collect();
        let second: Vec<u64> = table.iter().map(|key| key.hash).collect();
        assert_eq!(first, second);
    }
}
