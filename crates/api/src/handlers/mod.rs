pub mod emails;
pub mod pixel;
