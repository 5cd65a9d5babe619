pub mod driver;
pub mod trip;
pub mod user;
