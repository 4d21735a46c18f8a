pub mod jwt;
pub mod weighted;

pub use jwt::*;
pub use weighted::{pick_uniform, pick_weighted, pick_weighted_or_uniform};
