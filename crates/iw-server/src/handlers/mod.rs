pub mod modify;
pub mod pages;
