//! 控制台命令解析
//!
//! 一行一个命令，命令名支持西班牙语和英语别名

use thiserror::Error;

use crate::models::ExamLabel;

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetGrade(String),
    SetExam(ExamLabel),
    Add,
    Rename { id: u32, name: String },
    RegisterTime(u32),
    Export,
    Clear,
    List,
    Help,
    Quit,
}

/// 命令解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("空命令")]
    Empty,
    #[error("未知命令: {0}")]
    Unknown(String),
    #[error("缺少参数: {0}")]
    MissingArgument(&'static str),
    #[error("无效的条目编号: {0}")]
    InvalidId(String),
    #[error("未知的考试: {0}")]
    UnknownExam(String),
}

impl Command {
    /// 解析一行输入
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "grado" | "grade" => Ok(Command::SetGrade(require(rest, "grado")?.to_string())),
            "examen" | "exam" => {
                let label = require(rest, "examen")?;
                ExamLabel::parse(label)
                    .map(Command::SetExam)
                    .ok_or_else(|| CommandError::UnknownExam(label.to_string()))
            }
            "agregar" | "add" => Ok(Command::Add),
            "nombre" | "name" => {
                let (id, name) = match rest.split_once(char::is_whitespace) {
                    Some((id, name)) => (id, name.trim()),
                    None => (rest, ""),
                };
                Ok(Command::Rename {
                    id: parse_id(require(id, "id")?)?,
                    name: name.to_string(),
                })
            }
            "hora" | "time" => Ok(Command::RegisterTime(parse_id(require(rest, "id")?)?)),
            "pdf" | "export" => Ok(Command::Export),
            "limpiar" | "clear" => Ok(Command::Clear),
            "lista" | "list" => Ok(Command::List),
            "ayuda" | "help" | "?" => Ok(Command::Help),
            "salir" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn require<'a>(value: &'a str, name: &'static str) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::MissingArgument(name))
    } else {
        Ok(value)
    }
}

fn parse_id(value: &str) -> Result<u32, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidId(value.to_string()))
}
