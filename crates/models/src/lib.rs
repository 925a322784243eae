pub mod db;
pub mod user_preference;
pub mod user_product;
