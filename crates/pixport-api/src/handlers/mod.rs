pub mod health;
pub mod image_delete;
pub mod images;
pub mod profile_photo;
pub mod signature;
