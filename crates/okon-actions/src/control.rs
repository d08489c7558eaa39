//! Timing and mission control leaves.

use okon_bt::{Behaviour, BtError, TickScope, Update};
use okon_core::VehicleMut;

// f32 tick periods do not sum exactly.
const ELAPSED_EPSILON: f64 = 1e-9;

/// Stays `Running` until `secs` of tick time have passed since entry.
///
/// Time is the sum of `TickContext::dt_seconds` over the ticks after the entry tick, so the rest of
/// the tree keeps being ticked while it waits. The entry tick's `dt_seconds` covers time before the
/// node was entered and is not counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wait {
    secs: f64,
    elapsed: f64,
    entered: bool,
}

impl Wait {
    pub fn new(secs: f64) -> Self {
        Self {
            secs,
            elapsed: 0.0,
            entered: false,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl<V> Behaviour<V> for Wait
where
    V: VehicleMut + 'static,
{
    fn initialise(&mut self, _scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        self.elapsed = 0.0;
        self.entered = false;
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        if self.entered {
            self.elapsed += f64::from(scope.ctx.dt_seconds);
        } else {
            self.entered = true;
        }
        if self.elapsed + ELAPSED_EPSILON >= self.secs {
            Ok(Update::success(format!(
                "Robot waited for {} seconds.",
                self.secs
            )))
        } else {
            Ok(Update::running(format!(
                "Waited {:.2} of {} seconds.",
                self.elapsed, self.secs
            )))
        }
    }
}

/// Ends the mission: asks the driver to stop ticking and succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    reason: String,
}

impl Exit {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for Exit {
    fn default() -> Self {
        Self::new("mission complete")
    }
}

impl<V> Behaviour<V> for Exit
where
    V: VehicleMut + 'static,
{
    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        scope.request_halt(self.reason.clone());
        Ok(Update::success(format!("Halt requested: {}.", self.reason)))
    }
}
