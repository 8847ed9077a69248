//! One-shot shell timer. Cancellation is done in the core by ignoring
//! stale ids, so the shell never has to track outstanding timers.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOperation {
    Start { id: u64, millis: u64 },
}

impl Operation for TimerOperation {
    type Output = ();
}

pub struct Timer<Ev> {
    context: CapabilityContext<TimerOperation, Ev>,
}

impl<Ev> Clone for Timer<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<Ev> Timer<Ev> {
    pub fn new(context: CapabilityContext<TimerOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Timer<Ev>
where
    Ev: 'static,
{
    /// Sends `make_event()` back to the app once `millis` have elapsed.
    pub fn start<F>(&self, id: u64, millis: u64, make_event: F)
    where
        F: FnOnce() -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.request_from_shell(TimerOperation::Start { id, millis })
                .await;
            ctx.update_app(make_event());
        });
    }
}
