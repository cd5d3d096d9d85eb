pub mod card;
pub mod html;

pub use card::*;
