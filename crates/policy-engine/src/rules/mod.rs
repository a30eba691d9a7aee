pub mod context;
pub mod device;
pub mod identity;
