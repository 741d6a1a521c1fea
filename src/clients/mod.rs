pub mod gateway;
pub mod nanoko_client;

pub use gateway::NanokoGateway;
pub use nanoko_client::NanokoClient;
