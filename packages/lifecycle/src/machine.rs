//! Lifecycle state machine: the single authority on mode transitions.
//!
//! The firmware feeds it boot conditions and runtime events and executes the
//! effect it hands back. Every recovery path funnels into `FactoryReset` or
//! `Restart`; the next boot re-derives the state purely from the credential
//! store, never from anything held in memory here.

use statig::blocking::IntoStateMachineExt as _;
use statig::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LifecycleState {
    Unprovisioned,
    PortalActive,
    Connecting,
    Operating,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LifecycleEvent {
    BootWithCredentials,
    BootWithoutCredentials,
    ResetPinAsserted,
    CredentialsSaved,
    JoinSucceeded,
    JoinBudgetExhausted,
    RemoteResetReceived,
    LinkLost,
}

/// Side effect the firmware must execute after dispatching an event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Effect {
    None,
    /// Bring up the AP + captive portal and service it until restart.
    StartPortal,
    /// Begin the bounded station join with the stored credentials.
    StartJoin,
    /// Enter the operating loop (time sync, broker, telemetry).
    StartOperating,
    /// Clear the credential store, then restart the device.
    FactoryReset,
    /// Restart the device without touching the store.
    Restart,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct DispatchContext {
    pub(crate) effect: Effect,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            effect: Effect::None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LifecycleMachine;

#[state_machine(initial = "State::unprovisioned()")]
impl LifecycleMachine {
    #[state]
    fn unprovisioned(
        &mut self,
        context: &mut DispatchContext,
        event: &LifecycleEvent,
    ) -> Outcome<State> {
        match event {
            // Boot fast-path: the pin is sampled before the store is read,
            // so provisioning can be forced even with valid credentials.
            LifecycleEvent::ResetPinAsserted => {
                context.effect = Effect::FactoryReset;
                Handled
            }
            LifecycleEvent::BootWithCredentials => {
                context.effect = Effect::StartJoin;
                Transition(State::connecting())
            }
            LifecycleEvent::BootWithoutCredentials => {
                context.effect = Effect::StartPortal;
                Transition(State::portal_active())
            }
            _ => Handled,
        }
    }

    #[state]
    fn portal_active(
        &mut self,
        context: &mut DispatchContext,
        event: &LifecycleEvent,
    ) -> Outcome<State> {
        match event {
            // The portal never continues live: the saved configuration only
            // takes effect after a clean reboot re-reads the store.
            LifecycleEvent::CredentialsSaved => {
                context.effect = Effect::Restart;
                Transition(State::unprovisioned())
            }
            LifecycleEvent::ResetPinAsserted => {
                context.effect = Effect::FactoryReset;
                Transition(State::unprovisioned())
            }
            _ => Handled,
        }
    }

    #[state]
    fn connecting(
        &mut self,
        context: &mut DispatchContext,
        event: &LifecycleEvent,
    ) -> Outcome<State> {
        match event {
            LifecycleEvent::JoinSucceeded => {
                context.effect = Effect::StartOperating;
                Transition(State::operating())
            }
            // Credentials that never connect are treated as invalid: fall
            // back to provisioning instead of retrying forever.
            LifecycleEvent::JoinBudgetExhausted | LifecycleEvent::ResetPinAsserted => {
                context.effect = Effect::FactoryReset;
                Transition(State::unprovisioned())
            }
            _ => Handled,
        }
    }

    #[state]
    fn operating(
        &mut self,
        context: &mut DispatchContext,
        event: &LifecycleEvent,
    ) -> Outcome<State> {
        match event {
            LifecycleEvent::ResetPinAsserted | LifecycleEvent::RemoteResetReceived => {
                context.effect = Effect::FactoryReset;
                Transition(State::unprovisioned())
            }
            LifecycleEvent::LinkLost => {
                context.effect = Effect::Restart;
                Transition(State::unprovisioned())
            }
            _ => Handled,
        }
    }
}

pub struct LifecycleEngine {
    machine: statig::blocking::StateMachine<LifecycleMachine>,
}

impl LifecycleEngine {
    pub fn new() -> Self {
        Self {
            machine: LifecycleMachine::default().state_machine(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        match self.machine.state() {
            State::Unprovisioned {} => LifecycleState::Unprovisioned,
            State::PortalActive {} => LifecycleState::PortalActive,
            State::Connecting {} => LifecycleState::Connecting,
            State::Operating {} => LifecycleState::Operating,
        }
    }

    /// Dispatch an event and return the effect the firmware must run.
    pub fn apply(&mut self, event: LifecycleEvent) -> Effect {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.effect
    }
}

impl Default for LifecycleEngine {
    fn default() -> Self {
        Self::new()
    }
}
