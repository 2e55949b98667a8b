pub mod initdb;
pub mod seed_demo;
pub mod summary;

pub use initdb::init_database;
pub use seed_demo::seed_demo;
pub use summary::print_summary;
