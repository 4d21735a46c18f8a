pub mod friendships;
pub mod gacha_animations;
pub mod gacha_history;
pub mod gacha_rates;
pub mod gachas;
pub mod gifts;
pub mod horses;
pub mod login_bonus_claims;
pub mod ticket_types;
pub mod user_collections;
pub mod user_tickets;
pub mod users;

pub use friendships as friendship_entity;
pub use gacha_animations as gacha_animation_entity;
pub use gacha_history as gacha_history_entity;
pub use gacha_rates as gacha_rate_entity;
pub use gachas as gacha_entity;
pub use gifts as gift_entity;
pub use horses as horse_entity;
pub use login_bonus_claims as login_bonus_claim_entity;
pub use ticket_types as ticket_type_entity;
pub use user_collections as user_collection_entity;
pub use user_tickets as user_ticket_entity;
pub use users as user_entity;

pub use friendships::FriendshipStatus;
pub use gifts::{GiftKind, GiftStatus};
