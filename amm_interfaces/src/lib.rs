#![no_std]

pub mod constants;
pub mod handler;
pub mod hooks;
pub mod pool_id;
pub mod pool_type;
pub mod types;

mod test;
