pub mod catalog_service;
pub mod collection_service;
pub mod friendship_service;
pub mod gacha_service;
pub mod gift_service;
pub mod login_bonus_service;
pub mod ticket_service;

pub use catalog_service::CatalogService;
pub use collection_service::CollectionService;
pub use friendship_service::FriendshipService;
pub use gacha_service::GachaService;
pub use gift_service::GiftService;
pub use login_bonus_service::LoginBonusService;
pub use ticket_service::TicketService;
