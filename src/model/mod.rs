pub mod attendance;
pub mod store;
pub mod user;
