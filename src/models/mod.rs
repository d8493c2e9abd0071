pub mod event;
pub mod payment;
pub mod session;
pub mod ticket;
pub mod user;
