use std::borrow::Cow;

use okon_core::{Blackboard, TickContext, VehicleMut};
use okon_tools::{TraceEvent, TraceSink};
use tracing::debug;

use crate::{Behaviour, BtError, BtStatus, NodeKind, Update};

/// Raised by a node that wants the driver to stop ticking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaltRequest {
    pub tick: u64,
    pub reason: String,
}

/// Everything a node may touch during one tick.
pub struct TickScope<'a, V> {
    pub ctx: &'a TickContext,
    pub vehicle: &'a mut V,
    pub blackboard: &'a mut Blackboard,
    trace: &'a mut dyn TraceSink,
    halt: &'a mut Option<HaltRequest>,
}

impl<'a, V> TickScope<'a, V> {
    pub fn new(
        ctx: &'a TickContext,
        vehicle: &'a mut V,
        blackboard: &'a mut Blackboard,
        trace: &'a mut dyn TraceSink,
        halt: &'a mut Option<HaltRequest>,
    ) -> Self {
        Self {
            ctx,
            vehicle,
            blackboard,
            trace,
            halt,
        }
    }

    pub fn emit(&mut self, event: TraceEvent) {
        self.trace.emit(event);
    }

    /// Asks the driver to stop after this tick. The first request wins.
    pub fn request_halt(&mut self, reason: impl Into<String>) {
        if self.halt.is_some() {
            return;
        }
        let reason = reason.into();
        let tick = self.ctx.tick;
        self.trace
            .emit(TraceEvent::new(tick, "bt.tree.halt").with_detail(reason.clone()));
        *self.halt = Some(HaltRequest { tick, reason });
    }

    pub fn halt_requested(&self) -> bool {
        self.halt.is_some()
    }
}

/// A named tree node: one [`Behaviour`] plus its lifecycle state.
pub struct Node<V>
where
    V: VehicleMut + 'static,
{
    name: Cow<'static, str>,
    status: Option<BtStatus>,
    feedback: String,
    behaviour: Box<dyn Behaviour<V>>,
}

impl<V> Node<V>
where
    V: VehicleMut + 'static,
{
    pub fn new(name: impl Into<Cow<'static, str>>, behaviour: impl Behaviour<V>) -> Self {
        Self {
            name: name.into(),
            status: None,
            feedback: String::new(),
            behaviour: Box::new(behaviour),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Status of the last tick, `None` before the first tick and after an interruption.
    pub fn status(&self) -> Option<BtStatus> {
        self.status
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn kind(&self) -> NodeKind {
        self.behaviour.kind()
    }

    pub fn children(&self) -> &[Node<V>] {
        self.behaviour.children()
    }

    pub fn setup(&mut self, blackboard: &mut Blackboard) -> Result<(), BtError> {
        self.behaviour.setup(&self.name, blackboard)
    }

    pub fn tick(&mut self, scope: &mut TickScope<'_, V>) -> Result<BtStatus, BtError> {
        let tick = scope.ctx.tick;

        if self.status != Some(BtStatus::Running) {
            debug!(node = %self.name, "initialise");
            self.behaviour.initialise(scope)?;
            scope.emit(TraceEvent::new(tick, "bt.node.initialise").with_node(self.name.as_ref()));
        }

        let Update { status, feedback } = self.behaviour.update(scope)?;
        debug!(
            node = %self.name,
            from = %status_label(self.status),
            to = %status,
            feedback = %feedback,
            "update"
        );
        self.feedback = feedback;

        if status.is_terminal() {
            debug!(node = %self.name, status = %status, "terminate");
            self.behaviour.terminate(status, scope);
            scope.emit(
                TraceEvent::new(tick, "bt.node.terminate")
                    .with_node(self.name.as_ref())
                    .with_detail(status.to_string()),
            );
        }

        self.status = Some(status);
        Ok(status)
    }

    /// Stops a running node: `terminate(Failure)` runs and the node returns to the uninitialised
    /// state, so its next tick enters it again. Nodes that are not running are left untouched.
    pub fn interrupt(&mut self, scope: &mut TickScope<'_, V>) {
        if self.status != Some(BtStatus::Running) {
            return;
        }

        debug!(node = %self.name, "interrupt");
        let tick = scope.ctx.tick;
        self.behaviour.terminate(BtStatus::Failure, scope);
        scope.emit(TraceEvent::new(tick, "bt.node.interrupt").with_node(self.name.as_ref()));
        self.status = None;
    }
}

pub(crate) fn status_label(status: Option<BtStatus>) -> Cow<'static, str> {
    match status {
        Some(status) => Cow::Owned(status.to_string()),
        None => Cow::Borrowed("-"),
    }
}
