//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 控制台应用
//! - 管理应用生命周期（初始化、事件循环、退出）
//! - 打印名册、提示信息和清空确认
//!
//! ### `command` - 命令解析
//! - 把一行输入解析成 [`Command`]
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (控制台事件循环)
//!     ↓
//! workflow::RosterSession (名册 + 自动保存 + 前置条件)
//!     ↓
//! services (能力层：persistence / export / pdf)
//!     ↓
//! infrastructure (基础设施：KeyValueStore / Clock)
//! ```

pub mod app;
pub mod command;

pub use app::{render_roster, App};
pub use command::{Command, CommandError};
