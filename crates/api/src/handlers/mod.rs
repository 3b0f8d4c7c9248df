pub mod categories;
pub mod category;
pub mod dashboard;
pub mod media;
pub mod product;
pub mod webhooks;
