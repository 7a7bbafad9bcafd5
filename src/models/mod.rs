pub mod experience;
pub mod insight;
pub mod reputation;
pub mod view;
