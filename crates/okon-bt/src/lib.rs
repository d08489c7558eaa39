//! Behavior Tree runtime built on `okon-core`.
//!
//! Leaves and composites implement [`Behaviour`]; [`Node`] wraps one and drives its lifecycle
//! (`initialise` on entry, `update` every tick, `terminate` on exit or interruption), and
//! [`BehaviourTree`] owns the root, the blackboard and the trace sink.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod display;
pub mod error;
pub mod node;
pub mod nodes;
pub mod tree;

pub use bt::{Behaviour, BtStatus, NodeKind, Update};
pub use error::BtError;
pub use node::{HaltRequest, Node, TickScope};
// Default control flow: `Sequence` resumes its running child, `Selector` re-checks
// higher-priority children every tick. The dual variants are kept for trees that need them.
pub use nodes::{Condition, MemSelector, ReactiveSequence, Selector, Sequence};
pub use tree::BehaviourTree;
