pub mod category;
pub mod locale;
pub mod product;
pub mod types;
