//! Route changes requested by the core. The shell's router owns the stack.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum NavigatorOperation {
    Push { route: String },
    Back,
}

impl Operation for NavigatorOperation {
    type Output = ();
}

pub struct Navigator<Ev> {
    context: CapabilityContext<NavigatorOperation, Ev>,
}

impl<Ev> Clone for Navigator<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Navigator<Ev> {
    type Operation = NavigatorOperation;
    type MappedSelf<MappedEv> = Navigator<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Navigator::new(self.context.map_event(f))
    }
}

impl<Ev> Navigator<Ev> {
    pub fn new(context: CapabilityContext<NavigatorOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Navigator<Ev>
where
    Ev: 'static,
{
    pub fn push(&self, route: impl Into<String>) {
        let ctx = self.context.clone();
        let route = route.into();
        self.context.spawn(async move {
            ctx.notify_shell(NavigatorOperation::Push { route }).await;
        });
    }

    pub fn back(&self) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(NavigatorOperation::Back).await;
        });
    }
}
