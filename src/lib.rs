pub mod config;
pub mod delay;
pub mod extract;
pub mod http_client;
pub mod logger;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod squads;
pub mod store;
pub mod table;
