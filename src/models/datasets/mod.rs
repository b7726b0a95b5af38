pub mod events;
pub mod snapshot;
