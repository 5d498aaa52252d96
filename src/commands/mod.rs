pub mod lint;
pub mod transfer;
