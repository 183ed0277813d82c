pub mod message;
pub mod telemetry;
