//! Hardware-independent core of the AgroFlow sensor node: device identity,
//! credential records, the lifecycle state machine, and the small parsers
//! and encoders the firmware wires to radio/flash/broker peripherals.

#![cfg_attr(not(test), no_std)]

pub mod captive;
pub mod clock;
pub mod command;
pub mod credentials;
pub mod form;
pub mod identity;
pub mod machine;
pub mod moisture;
pub mod policy;
pub mod scan;
pub mod telemetry;

pub use command::Command;
pub use credentials::{Credentials, CREDENTIALS_RECORD_LEN};
pub use identity::DeviceId;
pub use machine::{Effect, LifecycleEngine, LifecycleEvent, LifecycleState};
pub use policy::JoinPolicy;
