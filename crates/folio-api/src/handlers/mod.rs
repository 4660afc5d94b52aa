pub mod health;
pub mod presign;
pub mod session;
pub mod uploads;
