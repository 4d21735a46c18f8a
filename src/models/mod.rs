pub mod collection;
pub mod common;
pub mod friendship;
pub mod gacha;
pub mod gift;
pub mod pagination;
pub mod ticket;

pub use collection::*;
pub use common::*;
pub use friendship::*;
pub use gacha::*;
pub use gift::*;
pub use pagination::*;
pub use ticket::*;
