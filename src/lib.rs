//! Singly linked list with a sentinel head, a cached tail, and pluggable
//! per-list behavior hooks (compare, equal, copy, free).
//!
//! Nodes are stored in a slot arena and addressed through [`NodeId`]
//! handles, which keeps the node-level API (detach, relink, adjacent
//! insertion) free of raw pointers. The cached tail makes `last` and
//! `push_back` O(1) despite the single link direction.
//!
//! ```
//! use slist::{Hooks, SinglyLinkedList};
//!
//! let mut list = SinglyLinkedList::with_hooks(Hooks::derived());
//! list.push_back(1);
//! list.push_back(2);
//! list.push_back(3);
//! assert_eq!(list.last(), Some(&3));
//!
//! assert_eq!(list.remove_at(1), Some(2));
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
//! ```

mod arena;
pub mod error;
pub mod hooks;
pub mod list;

pub use arena::NodeId;
pub use error::ListError;
pub use hooks::Hooks;
pub use list::SinglyLinkedList;
