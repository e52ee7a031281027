pub mod car;
pub mod review;
