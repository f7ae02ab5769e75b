/// Database plumbing
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded schema migrations from the workspace `migrations/` directory

pub mod migrations;
pub mod pool;
