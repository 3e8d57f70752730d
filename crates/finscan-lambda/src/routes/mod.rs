pub mod health;
pub mod outputs;
pub mod process;
