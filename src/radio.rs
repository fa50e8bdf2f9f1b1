//! Beacon Control Logic
//!
//! State machines for the two transmissions and the scheduler that
//! arbitrates between them. Implements the functional core of the beacon.

pub mod beacon;
pub mod cw;
pub mod scheduler;
pub mod wspr;

pub use beacon::{BeaconEvent, BeaconState, TransmissionSession};
pub use cw::{CwPhase, CwSession};
pub use scheduler::{TransmissionScheduler, Trigger};
pub use wspr::{SessionStatus, WsprSession};
