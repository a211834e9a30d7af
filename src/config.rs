use clap::Parser;
use std::time::Duration;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "wecom-relay")]
#[command(about = "Rate limited relay for WeCom group robot webhooks")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Forwarding targets (comma-separated name=url pairs, must include "default")
    // Example: "default=https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=...,ops=https://..."
    #[arg(short, long, env = "WEBHOOK_TARGETS")]
    pub targets: String,

    // Rate limit max calls per window, per target
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = 50)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 60)]
    pub rate_window: u64,

    // Tracing filter directive
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
