pub mod interaction_store;

pub use interaction_store::InMemoryInteractionStore;
