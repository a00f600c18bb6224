pub mod hash;
pub mod item;
pub mod source;
