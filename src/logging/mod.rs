pub mod telemetry;

pub use telemetry::{
    TelemetryConfig, create_counter, create_histogram, init_telemetry, shutdown_telemetry,
};
