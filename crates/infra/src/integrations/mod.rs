//! External service integrations

pub mod meraki;
pub mod webex;

pub use meraki::{ApiResponse, MerakiClient};
pub use webex::WebexClient;
