pub mod availability;
pub mod booking;
pub mod exception;
pub mod jobs;
pub mod schedule;
