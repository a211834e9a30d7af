mod alert;
mod health;
mod metrics;
mod send;

pub use alert::{alert_handler, usage_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use send::{send_markdown, send_markdown_default, send_text, send_text_default};
