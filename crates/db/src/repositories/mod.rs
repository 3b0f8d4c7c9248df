//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Operations that touch more than one row
//! open their own transaction.

pub mod category_repo;
pub mod dashboard_repo;
pub mod owner_repo;
pub mod product_repo;

pub use category_repo::CategoryRepo;
pub use dashboard_repo::DashboardRepo;
pub use owner_repo::OwnerRepo;
pub use product_repo::ProductRepo;
