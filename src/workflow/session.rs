//! 名册会话 - 流程层
//!
//! 核心职责：持有当前名册，把界面操作转成名册修改，
//! 每次修改后立即写入存储，并执行界面上的前置条件
//!
//! 前置条件：
//! 1. 年级和考试都填写后才能编辑条目
//! 2. 至少有一个条目登记了时间才能导出

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::error::ExportError;
use crate::infrastructure::{Clock, KeyValueStore};
use crate::models::{EntryUpdate, ExamLabel, RosterState};
use crate::services::{DocumentExporter, DocumentRenderer, RosterRepository};

/// 操作被前置条件拦下
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Gate {
    #[error("年级或考试尚未配置")]
    NotConfigured,
    #[error("没有已登记时间的条目")]
    NothingToExport,
    #[error("条目 ID 已用尽")]
    IdsExhausted,
}

/// 会话操作错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Gate(#[from] Gate),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// 名册会话
pub struct RosterSession<S, C> {
    state: RosterState,
    repository: RosterRepository<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> RosterSession<S, C> {
    /// 从存储恢复名册（失败则使用默认名册）
    pub fn open(repository: RosterRepository<S>, clock: C) -> Self {
        let state = repository.load();
        Self {
            state,
            repository,
            clock,
        }
    }

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn repository(&self) -> &RosterRepository<S> {
        &self.repository
    }

    pub fn set_grade(&mut self, grade: impl Into<String>) {
        self.state.set_grade(grade);
        info!("📝 年级: {:?}", self.state.config().grade);
        self.commit();
    }

    pub fn set_exam_label(&mut self, exam_label: Option<ExamLabel>) {
        self.state.set_exam_label(exam_label);
        info!("📝 考试: {:?}", exam_label.map(ExamLabel::label));
        self.commit();
    }

    /// 追加一行
    pub fn add_entry(&mut self) -> Result<u32, Gate> {
        self.ensure_configured()?;
        let id = self.state.add_entry().ok_or_else(|| {
            error!("❌ 条目 ID 已用尽 (nextId {})", self.state.next_id());
            Gate::IdsExhausted
        })?;
        info!("➕ 新增条目 #{}", id);
        self.commit();
        Ok(id)
    }

    /// 修改姓名
    pub fn rename_entry(&mut self, id: u32, name: impl Into<String>) -> Result<EntryUpdate, Gate> {
        self.ensure_configured()?;
        let outcome = self.state.rename_entry(id, name);
        self.finish_update("改名", id, outcome);
        Ok(outcome)
    }

    /// 按当前时间登记交卷
    pub fn register_time(&mut self, id: u32) -> Result<EntryUpdate, Gate> {
        self.ensure_configured()?;
        let time = self.clock.submission_time();
        let outcome = self.state.register_time(id, time);
        self.finish_update("登记时间", id, outcome);
        Ok(outcome)
    }

    /// 清空名册并删除快照（调用方负责先征得确认）
    pub fn clear_all(&mut self) {
        self.repository.erase();
        self.state.clear_all();
        info!("🧹 名册已清空");
        self.commit();
    }

    /// 导出名册
    pub fn export(
        &self,
        exporter: &DocumentExporter,
        renderer: &mut dyn DocumentRenderer,
    ) -> Result<PathBuf, SessionError> {
        self.ensure_configured()?;
        if !self.state.has_registered_time() {
            return Err(Gate::NothingToExport.into());
        }

        exporter.export(&self.state, renderer).map_err(|e| {
            error!("❌ 导出失败: {}", e);
            SessionError::Export(e)
        })
    }

    fn ensure_configured(&self) -> Result<(), Gate> {
        if self.state.is_configured() {
            Ok(())
        } else {
            Err(Gate::NotConfigured)
        }
    }

    fn finish_update(&mut self, action: &str, id: u32, outcome: EntryUpdate) {
        if outcome.is_updated() {
            info!("✓ 条目 #{} {}", id, action);
            self.commit();
        } else {
            debug!("条目 #{} {}未生效: {:?}", id, action, outcome);
        }
    }

    /// 状态变化后写入存储
    fn commit(&mut self) {
        self.repository.save(&self.state);
    }
}
