pub mod commitment;
pub mod events;
pub mod snapshot;
