//! # Exam Roster
//!
//! 一个用于登记学生交卷时间并导出 PDF 名单的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有存储介质和时钟，只暴露能力
//! - `KeyValueStore` - 按键读写字节（文件 / 内存）
//! - `Clock` - 当前时间，测试时可注入固定时间
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `RosterRepository` - 名册快照的读取 / 保存 / 删除
//! - `DocumentExporter` - 筛选已交卷的行，生成标题、表格和文件名
//! - `PdfRenderer` - 把标题和表格写成 PDF 文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - `RosterSession` 持有名册，每次修改后自动保存，
//!   并执行"先配置再编辑"、"有交卷记录才能导出"的前置条件
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 控制台事件循环、命令解析、清空确认
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{Clock, FileKeyValueStore, KeyValueStore, SystemClock};
pub use models::{EntryUpdate, ExamLabel, RosterConfiguration, RosterState, StudentEntry};
pub use orchestrator::{App, Command};
pub use services::{DocumentExporter, DocumentRenderer, PdfRenderer, RosterRepository};
pub use workflow::{Gate, RosterSession};
