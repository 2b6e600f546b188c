pub mod config;
pub mod leonardo;

pub use config::Config;
pub use leonardo::{Leonardo, Model};
pub use leonardo::api::{GenerationJob, GenerationParams, UploadTicket};
