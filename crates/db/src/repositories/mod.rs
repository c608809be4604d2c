//! Repositories, one per table (rooms and hotels share the catalog module).

pub mod admin_user_repo;
pub mod booking_repo;
pub mod email_session_repo;
pub mod inventory_repo;
pub mod otp_request_repo;
pub mod room_repo;

pub use admin_user_repo::AdminUserRepo;
pub use booking_repo::BookingRepo;
pub use email_session_repo::EmailSessionRepo;
pub use inventory_repo::InventoryRepo;
pub use otp_request_repo::OtpRequestRepo;
pub use room_repo::{HotelRepo, RoomRepo};
