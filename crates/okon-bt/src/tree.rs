use okon_core::{Blackboard, TickContext, VehicleMut};
use okon_tools::{NullTraceSink, TraceSink};
use tracing::{debug, info};

use crate::display::ascii_tree;
use crate::{BtError, BtStatus, HaltRequest, Node, TickScope};

/// Owns a root node, the tree's blackboard and its trace sink, and exposes the single `tick`
/// operation the driver calls at its own cadence.
pub struct BehaviourTree<V>
where
    V: VehicleMut + 'static,
{
    root: Node<V>,
    blackboard: Blackboard,
    trace: Box<dyn TraceSink>,
    halt: Option<HaltRequest>,
    last: Option<BtStatus>,
    set_up: bool,
}

impl<V> BehaviourTree<V>
where
    V: VehicleMut + 'static,
{
    pub fn new(root: Node<V>) -> Self {
        Self {
            root,
            blackboard: Blackboard::new(),
            trace: Box::new(NullTraceSink),
            halt: None,
            last: None,
            set_up: false,
        }
    }

    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.trace = Box::new(sink);
        self
    }

    /// Runs every node's `setup` hook once, then closes blackboard registration.
    pub fn setup(&mut self) -> Result<(), BtError> {
        if self.set_up {
            return Err(BtError::AlreadySetUp);
        }
        self.root.setup(&mut self.blackboard)?;
        self.blackboard.seal();
        self.set_up = true;
        info!(root = %self.root.name(), "behaviour tree set up");
        Ok(())
    }

    pub fn is_set_up(&self) -> bool {
        self.set_up
    }

    /// Evaluates the root once, depth-first and left to right.
    pub fn tick(&mut self, ctx: &TickContext, vehicle: &mut V) -> Result<BtStatus, BtError> {
        if !self.set_up {
            return Err(BtError::NotSetUp);
        }

        let mut scope = TickScope::new(
            ctx,
            vehicle,
            &mut self.blackboard,
            &mut *self.trace,
            &mut self.halt,
        );
        let status = self.root.tick(&mut scope)?;
        debug!(tick = ctx.tick, status = %status, "tree tick");

        self.last = Some(status);
        Ok(status)
    }

    /// Interrupts the root if it is still running, e.g. when the driver shuts down.
    pub fn interrupt(&mut self, ctx: &TickContext, vehicle: &mut V) {
        let mut scope = TickScope::new(
            ctx,
            vehicle,
            &mut self.blackboard,
            &mut *self.trace,
            &mut self.halt,
        );
        self.root.interrupt(&mut scope);
    }

    pub fn last_status(&self) -> Option<BtStatus> {
        self.last
    }

    pub fn halt_requested(&self) -> Option<&HaltRequest> {
        self.halt.as_ref()
    }

    pub fn root(&self) -> &Node<V> {
        &self.root
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    /// Engine-level access, bypassing client registrations. Meant for seeding and inspection.
    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn ascii_tree(&self) -> String {
        ascii_tree(&self.root)
    }
}
