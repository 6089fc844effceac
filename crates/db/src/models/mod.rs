mod booking;
mod resource;

pub use booking::*;
pub use resource::*;
