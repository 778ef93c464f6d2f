pub mod app_config;
pub mod database;
pub mod user_repo;
pub mod order_repo;
pub mod catalog_repo;
pub mod memory;

pub use database::DbClient;
pub use user_repo::PgUserRepository;
pub use order_repo::PgOrderRepository;
pub use catalog_repo::PgCatalogRepository;
pub use memory::InMemoryStore;
