use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::RosterShapeError;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 持久化错误
    #[error("持久化错误: {0}")]
    Persistence(#[from] PersistenceError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 控制台读写错误
    #[error("控制台读写失败: {0}")]
    Console(#[from] io::Error),
}

/// 名册持久化错误
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// 存储读写失败
    #[error("{operation}存储键 {key} 失败: {source}")]
    Io {
        operation: &'static str,
        key: String,
        #[source]
        source: io::Error,
    },
    /// 序列化失败
    #[error("序列化名册失败: {0}")]
    Serialize(#[source] serde_json::Error),
    /// 快照不是合法的 JSON 或字段缺失
    #[error("解析名册快照失败: {0}")]
    Deserialize(#[source] serde_json::Error),
    /// 考试标签不在固定集合中
    #[error("未知的考试标签: {0:?}")]
    UnknownExamLabel(String),
    /// 快照结构不一致
    #[error("名册快照结构无效: {0}")]
    InvalidShape(#[from] RosterShapeError),
}

/// 文档导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 写文件失败
    #[error("写入文件失败 ({path}): {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// 文件名生成失败
    #[error("生成文件名失败: {0}")]
    Filename(#[from] regex::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}", path = path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
