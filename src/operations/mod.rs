pub mod buffer;
pub mod coincidence;
pub mod cut;
pub mod index;
