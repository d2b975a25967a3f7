pub mod api;
pub mod flows;
pub mod http_client;
pub mod roster;
pub mod state;
pub mod worker;
