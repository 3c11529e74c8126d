//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | AnalogPort         | ESP32 ADC1 oneshot       |
//! |                | SensorPort         | Temperature + solar hub  |
//! |                | RailPort           | Rail relay GPIOs         |
//! | `log_sink`     | EventSink          | Serial log output        |

pub mod hardware;
pub mod log_sink;
