//! Query/persistence gateway: generic CRUD over the entity store.

mod gateway;
mod validation;
pub use gateway::Gateway;
pub use validation::RecordValidator;
