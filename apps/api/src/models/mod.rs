pub mod analysis;
pub mod conversation;
