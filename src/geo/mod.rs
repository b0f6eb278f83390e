pub mod distance;
pub mod projection;
