pub mod privacy_pool;
