//! 名册持久化服务 - 业务能力层
//!
//! 把整个名册序列化后存到固定的键下；读写失败只记日志，不影响界面

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PersistenceError;
use crate::infrastructure::KeyValueStore;
use crate::models::{ExamLabel, RosterConfiguration, RosterState, StudentEntry};

/// 名册快照的存储键
pub const STORAGE_KEY: &str = "exam-roster-state";

/// 存储中的快照格式
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterSnapshot {
    students: Vec<StudentEntry>,
    next_id: u32,
    grade: String,
    exam_number: String,
}

impl From<&RosterState> for RosterSnapshot {
    fn from(state: &RosterState) -> Self {
        Self {
            students: state.entries().to_vec(),
            next_id: state.next_id(),
            grade: state.config().grade.clone(),
            exam_number: state
                .config()
                .exam_label
                .map(|exam| exam.label().to_string())
                .unwrap_or_default(),
        }
    }
}

impl TryFrom<RosterSnapshot> for RosterState {
    type Error = PersistenceError;

    fn try_from(snapshot: RosterSnapshot) -> Result<Self, Self::Error> {
        let exam_label = if snapshot.exam_number.is_empty() {
            None
        } else {
            Some(
                ExamLabel::from_label(&snapshot.exam_number)
                    .ok_or(PersistenceError::UnknownExamLabel(snapshot.exam_number))?,
            )
        };

        let config = RosterConfiguration {
            grade: snapshot.grade,
            exam_label,
        };

        // 空字符串时间等同于未登记
        let students = snapshot
            .students
            .into_iter()
            .map(|mut entry| {
                if !entry.has_time() {
                    entry.time = None;
                }
                entry
            })
            .collect();

        Ok(RosterState::from_parts(students, snapshot.next_id, config)?)
    }
}

/// 序列化名册
pub fn encode_snapshot(state: &RosterState) -> Result<Vec<u8>, PersistenceError> {
    serde_json::to_vec(&RosterSnapshot::from(state)).map_err(PersistenceError::Serialize)
}

/// 反序列化并校验名册
pub fn decode_snapshot(bytes: &[u8]) -> Result<RosterState, PersistenceError> {
    let snapshot: RosterSnapshot =
        serde_json::from_slice(bytes).map_err(PersistenceError::Deserialize)?;
    RosterState::try_from(snapshot)
}

/// 名册仓库
///
/// 职责：
/// - 启动时读取快照，失败则回退到默认名册
/// - 每次状态变化后写入快照
/// - 清空名册时删除快照
pub struct RosterRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> RosterRepository<S> {
    /// 使用默认键创建
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    /// 使用自定义键创建
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 读取快照；键不存在时返回 `Ok(None)`
    pub fn try_load(&self) -> Result<Option<RosterState>, PersistenceError> {
        let bytes = self.store.get(&self.key).map_err(|source| PersistenceError::Io {
            operation: "读取",
            key: self.key.clone(),
            source,
        })?;

        bytes.map(|b| decode_snapshot(&b)).transpose()
    }

    /// 读取名册，任何失败都回退到默认名册
    pub fn load(&self) -> RosterState {
        match self.try_load() {
            Ok(Some(state)) => {
                info!(
                    "📂 已恢复名册: {} 个条目, nextId={}",
                    state.entries().len(),
                    state.next_id()
                );
                state
            }
            Ok(None) => {
                info!("📄 没有找到已保存的名册，使用默认名册");
                RosterState::default()
            }
            Err(e) => {
                warn!("⚠️ 读取名册失败，使用默认名册: {}", e);
                RosterState::default()
            }
        }
    }

    /// 写入快照
    pub fn try_save(&mut self, state: &RosterState) -> Result<(), PersistenceError> {
        let bytes = encode_snapshot(state)?;
        self.store
            .set(&self.key, &bytes)
            .map_err(|source| PersistenceError::Io {
                operation: "写入",
                key: self.key.clone(),
                source,
            })?;
        debug!("名册已保存 ({} 字节)", bytes.len());
        Ok(())
    }

    /// 写入快照，失败只记日志；返回是否成功
    pub fn save(&mut self, state: &RosterState) -> bool {
        match self.try_save(state) {
            Ok(()) => true,
            Err(e) => {
                warn!("⚠️ 保存名册失败，本次修改仅保留在内存中: {}", e);
                false
            }
        }
    }

    /// 删除快照
    pub fn try_erase(&mut self) -> Result<(), PersistenceError> {
        self.store
            .remove(&self.key)
            .map_err(|source| PersistenceError::Io {
                operation: "删除",
                key: self.key.clone(),
                source,
            })
    }

    /// 删除快照，失败只记日志
    pub fn erase(&mut self) -> bool {
        match self.try_erase() {
            Ok(()) => {
                debug!("已删除名册快照");
                true
            }
            Err(e) => {
                warn!("⚠️ 删除名册快照失败: {}", e);
                false
            }
        }
    }
}
