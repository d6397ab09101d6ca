pub mod rounding;
pub mod user_locks;
