//! 日志初始化
//!
//! 日志写入文件，控制台只留给名册界面

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::utils::logging::init_log_file;

/// 初始化 tracing：`RUST_LOG` 优先，否则按 `verbose_logging` 选择 debug/info
pub fn init(config: &Config) -> Result<()> {
    init_log_file(&config.log_file)
        .with_context(|| format!("无法初始化日志文件: {}", config.log_file.display()))?;

    let file = OpenOptions::new()
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("无法打开日志文件: {}", config.log_file.display()))?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("初始化日志失败: {}", e))?;

    Ok(())
}
