pub mod component;
pub mod object_store;
