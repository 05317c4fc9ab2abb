pub mod diff_mask;
pub mod error;
pub mod field_value;
pub mod property;
pub mod property_mutate;
pub mod replicate;
pub mod synced_object;
