pub mod audit;
pub mod auth;
pub mod colors;
pub mod ical;
