pub mod booking;
pub mod catalog;
pub mod customers;
pub mod reports;
pub mod staff;
pub mod tally;
