//! Counterpart
//!
//! Counterpart synthesizes randomized-but-constrained expected product
//! models for a seller platform and verifies the backend's persisted state
//! against them, field by field. It sits between a UI driver (which applies
//! the expected model to the application) and a REST client (which serves
//! the ground truth); both are external collaborators behind small traits.

pub mod apply;
pub mod backend;
pub mod fixtures;
pub mod prelude;
pub mod products;
pub mod retry;
pub mod scenario;
pub mod synthesis;
pub mod utils;
pub mod verify;
