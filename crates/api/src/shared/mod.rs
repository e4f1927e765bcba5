pub mod signature;
pub mod usecase;
