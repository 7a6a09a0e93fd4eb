pub mod calendar;
pub mod form;
pub mod integration;
pub mod table;
