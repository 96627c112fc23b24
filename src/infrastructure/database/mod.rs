// src/infrastructure/database/mod.rs
mod memory_repository;
mod pool;
mod postgres_repository;


pub use memory_repository::create_memory_repository;
#[cfg(test)]
pub(crate) use memory_repository::MemoryRepository;
pub use pool::init_database_with_retry;
pub use postgres_repository::create_postgres_repository;
