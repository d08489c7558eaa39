//! Tracing primitives for OKON behavior trees.
//!
//! The tree emits a [`TraceEvent`] whenever a node is entered, exits or is interrupted. Events go
//! to a [`TraceSink`] owned by the tree; collect them with [`VecTraceSink`] or a [`TraceLog`] and
//! render or serialize them afterwards.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
