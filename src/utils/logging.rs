//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::models::RosterState;
use crate::services::qualifying_rows;

/// 初始化日志文件（覆盖旧文件并写入表头）
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &Path) -> Result<()> {
    if let Some(parent) = log_file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let log_header = format!(
        "{}\n交卷登记日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 交卷时间登记");
    info!("🏫 学校: {}", config.institution_name);
    info!("💾 数据目录: {}", config.data_dir.display());
    info!("📁 导出目录: {}", config.export_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录会话结束时的统计
///
/// # 参数
/// - `state`: 退出时的名册
pub fn log_session_end(state: &RosterState) {
    let checked_in = qualifying_rows(state).len();
    info!("\n{}", "=".repeat(60));
    info!("📊 会话结束");
    info!(
        "结束时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 已交卷: {}/{}", checked_in, state.entries().len());
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Ana", 5), "Ana");
        assert_eq!(truncate_text("María José", 5), "María...");
    }

    #[test]
    fn test_init_log_file_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("roster.log");
        init_log_file(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("交卷登记日志"));
    }
}
