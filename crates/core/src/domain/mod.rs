pub mod profile;
pub mod projection;
pub mod user;
