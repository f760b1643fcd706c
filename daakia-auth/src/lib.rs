pub mod config;
pub mod dtos;
pub mod flow;
pub mod models;
pub mod services;
pub mod sso;
pub mod utils;

pub use flow::{FlowError, LoginFlow, LoginState};
pub use sso::{LoginOptions, SsoResolver};
