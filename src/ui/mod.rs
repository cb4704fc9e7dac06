pub mod catalog;
pub mod panels;
