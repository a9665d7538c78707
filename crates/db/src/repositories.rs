pub mod audit;
pub mod booking;
pub mod exception;
pub mod schedule;
pub mod service;
pub mod staff;
