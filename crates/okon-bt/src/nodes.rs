//! Composite nodes and the closure-backed condition leaf.
//!
//! Composites report the feedback of the last child they ticked in the pass.

use okon_core::{Blackboard, TickContext, VehicleMut};

use crate::{Behaviour, BtError, BtStatus, Node, NodeKind, TickScope, Update};

fn setup_children<V>(children: &mut [Node<V>], blackboard: &mut Blackboard) -> Result<(), BtError>
where
    V: VehicleMut + 'static,
{
    for child in children.iter_mut() {
        child.setup(blackboard)?;
    }
    Ok(())
}

fn interrupt_children<V>(children: &mut [Node<V>], scope: &mut TickScope<'_, V>)
where
    V: VehicleMut + 'static,
{
    for child in children.iter_mut() {
        child.interrupt(scope);
    }
}

/// Ticks children in order and resumes the running child on the next tick.
///
/// A `Success` moves on to the next child within the same tick; the first `Running` or
/// `Failure` ends the pass and becomes the sequence's status. Succeeds when every child did.
pub struct Sequence<V>
where
    V: VehicleMut + 'static,
{
    children: Vec<Node<V>>,
    index: usize,
}

impl<V> Sequence<V>
where
    V: VehicleMut + 'static,
{
    pub fn new(children: Vec<Node<V>>) -> Self {
        Self { children, index: 0 }
    }
}

impl<V> Behaviour<V> for Sequence<V>
where
    V: VehicleMut + 'static,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn setup(&mut self, _node: &str, blackboard: &mut Blackboard) -> Result<(), BtError> {
        setup_children(&mut self.children, blackboard)
    }

    fn initialise(&mut self, _scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        self.index = 0;
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        let mut feedback = String::new();
        while self.index < self.children.len() {
            let child = &mut self.children[self.index];
            let status = child.tick(scope)?;
            feedback = child.feedback().to_owned();
            match status {
                BtStatus::Running => return Ok(Update::running(feedback)),
                BtStatus::Failure => return Ok(Update::failure(feedback)),
                BtStatus::Success => self.index += 1,
            }
        }

        Ok(Update::success(feedback))
    }

    fn terminate(&mut self, _new_status: BtStatus, scope: &mut TickScope<'_, V>) {
        interrupt_children(&mut self.children, scope);
        self.index = 0;
    }

    fn children(&self) -> &[Node<V>] {
        &self.children
    }
}

/// Re-checks every child from the first one on each tick.
///
/// A child that reports `Running` while a later child was running interrupts the later one.
pub struct ReactiveSequence<V>
where
    V: VehicleMut + 'static,
{
    children: Vec<Node<V>>,
    running: Option<usize>,
}

impl<V> ReactiveSequence<V>
where
    V: VehicleMut + 'static,
{
    pub fn new(children: Vec<Node<V>>) -> Self {
        Self {
            children,
            running: None,
        }
    }
}

impl<V> Behaviour<V> for ReactiveSequence<V>
where
    V: VehicleMut + 'static,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn setup(&mut self, _node: &str, blackboard: &mut Blackboard) -> Result<(), BtError> {
        setup_children(&mut self.children, blackboard)
    }

    fn initialise(&mut self, _scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        self.running = None;
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        let mut feedback = String::new();
        for i in 0..self.children.len() {
            let status = self.children[i].tick(scope)?;
            feedback = self.children[i].feedback().to_owned();
            match status {
                BtStatus::Success => continue,
                BtStatus::Failure => return Ok(Update::failure(feedback)),
                BtStatus::Running => {
                    if let Some(prev) = self.running.filter(|&prev| prev != i) {
                        self.children[prev].interrupt(scope);
                    }
                    self.running = Some(i);
                    return Ok(Update::running(feedback));
                }
            }
        }

        Ok(Update::success(feedback))
    }

    fn terminate(&mut self, _new_status: BtStatus, scope: &mut TickScope<'_, V>) {
        interrupt_children(&mut self.children, scope);
        self.running = None;
    }

    fn children(&self) -> &[Node<V>] {
        &self.children
    }
}

/// Priority fallback: tries children in order every tick.
///
/// The first child reporting `Success` or `Running` decides the selector's status and later
/// children are not ticked. When that child differs from the one left running on an earlier
/// tick, the earlier one is interrupted. Fails when every child failed.
pub struct Selector<V>
where
    V: VehicleMut + 'static,
{
    children: Vec<Node<V>>,
    running: Option<usize>,
}

impl<V> Selector<V>
where
    V: VehicleMut + 'static,
{
    pub fn new(children: Vec<Node<V>>) -> Self {
        Self {
            children,
            running: None,
        }
    }
}

impl<V> Behaviour<V> for Selector<V>
where
    V: VehicleMut + 'static,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Selector
    }

    fn setup(&mut self, _node: &str, blackboard: &mut Blackboard) -> Result<(), BtError> {
        setup_children(&mut self.children, blackboard)
    }

    fn initialise(&mut self, _scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        self.running = None;
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        let mut feedback = String::new();
        for i in 0..self.children.len() {
            let status = self.children[i].tick(scope)?;
            feedback = self.children[i].feedback().to_owned();
            if status.is_failure() {
                continue;
            }

            if let Some(prev) = self.running.filter(|&prev| prev != i) {
                self.children[prev].interrupt(scope);
            }
            self.running = status.is_running().then_some(i);
            return Ok(Update::new(status, feedback));
        }

        self.running = None;
        Ok(Update::failure(feedback))
    }

    fn terminate(&mut self, _new_status: BtStatus, scope: &mut TickScope<'_, V>) {
        interrupt_children(&mut self.children, scope);
        self.running = None;
    }

    fn children(&self) -> &[Node<V>] {
        &self.children
    }
}

/// Selector that sticks with its running child instead of re-checking earlier ones.
pub struct MemSelector<V>
where
    V: VehicleMut + 'static,
{
    children: Vec<Node<V>>,
    index: usize,
}

impl<V> MemSelector<V>
where
    V: VehicleMut + 'static,
{
    pub fn new(children: Vec<Node<V>>) -> Self {
        Self { children, index: 0 }
    }
}

impl<V> Behaviour<V> for MemSelector<V>
where
    V: VehicleMut + 'static,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Selector
    }

    fn setup(&mut self, _node: &str, blackboard: &mut Blackboard) -> Result<(), BtError> {
        setup_children(&mut self.children, blackboard)
    }

    fn initialise(&mut self, _scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        self.index = 0;
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        let mut feedback = String::new();
        while self.index < self.children.len() {
            let child = &mut self.children[self.index];
            let status = child.tick(scope)?;
            feedback = child.feedback().to_owned();
            match status {
                BtStatus::Running => return Ok(Update::running(feedback)),
                BtStatus::Success => return Ok(Update::success(feedback)),
                BtStatus::Failure => self.index += 1,
            }
        }

        Ok(Update::failure(feedback))
    }

    fn terminate(&mut self, _new_status: BtStatus, scope: &mut TickScope<'_, V>) {
        interrupt_children(&mut self.children, scope);
        self.index = 0;
    }

    fn children(&self) -> &[Node<V>] {
        &self.children
    }
}

/// Leaf that succeeds when the predicate holds for the current vehicle state.
pub struct Condition<F> {
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(cond: F) -> Self {
        Self { cond }
    }
}

impl<F, V> Behaviour<V> for Condition<F>
where
    F: FnMut(&TickContext, &V) -> bool + 'static,
    V: VehicleMut + 'static,
{
    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        if (self.cond)(scope.ctx, &*scope.vehicle) {
            Ok(Update::success("condition holds"))
        } else {
            Ok(Update::failure("condition does not hold"))
        }
    }
}
