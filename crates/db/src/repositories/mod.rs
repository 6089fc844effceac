mod booking_repo;
mod resource_repo;

pub use booking_repo::BookingRepository;
pub use resource_repo::ResourceRepository;
