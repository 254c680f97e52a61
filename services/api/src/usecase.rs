pub mod cart;
pub mod favorite;
pub mod flags;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;
