pub mod company;
pub mod principal;
