use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "exam_roster.toml";

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// 名册快照存放目录
    pub data_dir: PathBuf,
    /// PDF 输出目录
    pub export_dir: PathBuf,
    /// 学校名称（文档标题）
    pub institution_name: String,
    /// 考试系列（副标题中跟在考试标签后面）
    pub exam_series: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".exam_roster"),
            export_dir: PathBuf::from("."),
            institution_name: "INSTITUCION EDUCATIVA VALORES Y CIENCIAS".to_string(),
            exam_series: "TIPO ADMISION 2025".to_string(),
            verbose_logging: false,
            log_file: PathBuf::from("exam_roster.log"),
        }
    }
}

/// TOML 配置文件，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    institution_name: Option<String>,
    exam_series: Option<String>,
    verbose_logging: Option<bool>,
    log_file: Option<PathBuf>,
}

impl Config {
    /// 加载配置：默认值 < TOML 文件 < 环境变量
    ///
    /// 配置文件路径取自 `ROSTER_CONFIG`；未设置时若当前目录存在
    /// `exam_roster.toml` 则读取它
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("ROSTER_CONFIG").ok().map(PathBuf::from);
        let base = match explicit {
            Some(path) => Self::from_toml_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            data_dir: file.data_dir.unwrap_or(default.data_dir),
            export_dir: file.export_dir.unwrap_or(default.export_dir),
            institution_name: file.institution_name.unwrap_or(default.institution_name),
            exam_series: file.exam_series.unwrap_or(default.exam_series),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
            log_file: file.log_file.unwrap_or(default.log_file),
        })
    }

    /// 仅从环境变量读取（在默认值之上）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 用环境变量覆盖已有配置，无法解析的值保持原值
    pub fn with_env_overrides(self) -> Self {
        Self {
            data_dir: std::env::var("ROSTER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.data_dir),
            export_dir: std::env::var("ROSTER_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.export_dir),
            institution_name: std::env::var("ROSTER_INSTITUTION").unwrap_or(self.institution_name),
            exam_series: std::env::var("ROSTER_EXAM_SERIES").unwrap_or(self.exam_series),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            log_file: std::env::var("ROSTER_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(self.log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            institution_name = "COLEGIO SAN MARTIN"
            verbose_logging = true
            "#,
        )
        .unwrap();

        assert_eq!(config.institution_name, "COLEGIO SAN MARTIN");
        assert!(config.verbose_logging);
        assert_eq!(config.exam_series, Config::default().exam_series);
        assert_eq!(config.data_dir, Config::default().data_dir);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Config::from_toml_str("colour = \"red\"").is_err());
    }

    #[test]
    fn test_from_toml_file_errors_carry_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::from_toml_file(&missing),
            Err(ConfigError::Read { path, .. }) if path == missing
        ));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "data_dir = [").unwrap();
        assert!(matches!(
            Config::from_toml_file(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }
}
