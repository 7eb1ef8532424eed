pub mod decide;
pub mod token;
