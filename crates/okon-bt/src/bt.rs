use std::fmt;

use okon_core::{Blackboard, VehicleMut};

use crate::{BtError, Node, TickScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BtStatus {
    Running,
    Success,
    Failure,
}

impl BtStatus {
    pub fn is_running(self) -> bool {
        matches!(self, BtStatus::Running)
    }

    pub fn is_success(self) -> bool {
        matches!(self, BtStatus::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, BtStatus::Failure)
    }

    /// `Success` and `Failure` end the node's current run.
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }
}

impl fmt::Display for BtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BtStatus::Running => "RUNNING",
            BtStatus::Success => "SUCCESS",
            BtStatus::Failure => "FAILURE",
        })
    }
}

/// Result of one `update`: the new status and the feedback message that replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub status: BtStatus,
    pub feedback: String,
}

impl Update {
    pub fn new(status: BtStatus, feedback: impl Into<String>) -> Self {
        Self {
            status,
            feedback: feedback.into(),
        }
    }

    pub fn running(feedback: impl Into<String>) -> Self {
        Self::new(BtStatus::Running, feedback)
    }

    pub fn success(feedback: impl Into<String>) -> Self {
        Self::new(BtStatus::Success, feedback)
    }

    pub fn failure(feedback: impl Into<String>) -> Self {
        Self::new(BtStatus::Failure, feedback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Sequence,
    Selector,
}

/// The capability every tree node provides. [`Node`] calls the hooks; implementors never call
/// their own hooks.
///
/// - `setup` runs once before the first tick; register blackboard keys here.
/// - `initialise` runs when the node is entered: on its first tick, and on the first tick after
///   it reached `Success`/`Failure` or was interrupted.
/// - `update` runs on every tick while the node is active.
/// - `terminate` runs once when `update` returns a terminal status, or with `Failure` when an
///   enclosing composite interrupts the node while it is running.
pub trait Behaviour<V>: 'static
where
    V: VehicleMut + 'static,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn setup(&mut self, _node: &str, _blackboard: &mut Blackboard) -> Result<(), BtError> {
        Ok(())
    }

    fn initialise(&mut self, _scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError>;

    fn terminate(&mut self, _new_status: BtStatus, _scope: &mut TickScope<'_, V>) {}

    fn children(&self) -> &[Node<V>] {
        &[]
    }
}
