pub mod defaults;
pub mod merge;
pub mod validate;
