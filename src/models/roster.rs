//! 名册模型
//!
//! 名册 = 有序的学生条目 + 下一个 ID 计数器 + 年级/考试配置。
//! 所有修改都通过这里的方法完成，每个方法返回明确的结果，
//! 由上层决定是否需要持久化。

use std::collections::HashSet;

use super::exam::ExamLabel;
use super::student::StudentEntry;

/// 默认状态中预置条目的 ID
pub const FIRST_ENTRY_ID: u32 = 1;

/// 名册配置：年级 + 考试标签
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterConfiguration {
    pub grade: String,
    pub exam_label: Option<ExamLabel>,
}

impl RosterConfiguration {
    /// 年级和考试标签都已填写
    pub fn is_configured(&self) -> bool {
        !self.grade.trim().is_empty() && self.exam_label.is_some()
    }
}

/// 单个条目修改的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryUpdate {
    /// 已修改
    Updated,
    /// 没有该 ID 的条目
    NotFound,
    /// 条目已登记时间，姓名被锁定
    Locked,
    /// 姓名为空，不能登记时间
    EmptyName,
    /// 时间已登记过，保持原值
    AlreadyRegistered,
}

impl EntryUpdate {
    /// 是否真的改变了状态
    pub fn is_updated(self) -> bool {
        self == EntryUpdate::Updated
    }
}

/// 名册结构校验错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterShapeError {
    #[error("条目 ID 重复: {0}")]
    DuplicateId(u32),
    #[error("nextId {next_id} 不大于已有的最大 ID {max_id}")]
    StaleNextId { next_id: u32, max_id: u32 },
    #[error("nextId {0} 已无可分配的 ID")]
    ExhaustedIds(u32),
}

/// 名册状态（根聚合）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterState {
    entries: Vec<StudentEntry>,
    next_id: u32,
    config: RosterConfiguration,
}

impl Default for RosterState {
    fn default() -> Self {
        Self {
            entries: vec![StudentEntry::new(FIRST_ENTRY_ID)],
            next_id: FIRST_ENTRY_ID + 1,
            config: RosterConfiguration::default(),
        }
    }
}

impl RosterState {
    /// 从已有数据构建名册，ID 必须唯一且都小于 `next_id`
    ///
    /// `next_id` 为 `u32::MAX` 时计数器无法再前进，同样视为无效
    pub fn from_parts(
        entries: Vec<StudentEntry>,
        next_id: u32,
        config: RosterConfiguration,
    ) -> Result<Self, RosterShapeError> {
        if next_id == u32::MAX {
            return Err(RosterShapeError::ExhaustedIds(next_id));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(RosterShapeError::DuplicateId(entry.id));
            }
        }

        if let Some(max_id) = entries.iter().map(|e| e.id).max() {
            if next_id <= max_id {
                return Err(RosterShapeError::StaleNextId { next_id, max_id });
            }
        }

        Ok(Self {
            entries,
            next_id,
            config,
        })
    }

    pub fn entries(&self) -> &[StudentEntry] {
        &self.entries
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn config(&self) -> &RosterConfiguration {
        &self.config
    }

    pub fn entry(&self, id: u32) -> Option<&StudentEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// 至少有一个条目已登记时间
    pub fn has_registered_time(&self) -> bool {
        self.entries.iter().any(StudentEntry::has_time)
    }

    /// 追加空白条目，返回新条目的 ID；ID 用尽时返回 `None` 且不修改名册
    ///
    /// `next_id` 始终小于 `u32::MAX`，保存后的名册总能重新读取
    pub fn add_entry(&mut self) -> Option<u32> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).filter(|&next| next < u32::MAX)?;
        self.entries.push(StudentEntry::new(id));
        Some(id)
    }

    /// 修改姓名；已登记时间的条目不可修改
    pub fn rename_entry(&mut self, id: u32, name: impl Into<String>) -> EntryUpdate {
        match self.entries.iter_mut().find(|e| e.id == id) {
            None => EntryUpdate::NotFound,
            Some(entry) if entry.is_locked() => EntryUpdate::Locked,
            Some(entry) => {
                entry.name = name.into();
                EntryUpdate::Updated
            }
        }
    }

    /// 登记交卷时间，只在尚未登记时写入
    pub fn register_time(&mut self, id: u32, time: impl Into<String>) -> EntryUpdate {
        match self.entries.iter_mut().find(|e| e.id == id) {
            None => EntryUpdate::NotFound,
            Some(entry) if entry.has_time() => EntryUpdate::AlreadyRegistered,
            Some(entry) if !entry.has_name() => EntryUpdate::EmptyName,
            Some(entry) => {
                entry.time = Some(time.into());
                EntryUpdate::Updated
            }
        }
    }

    pub fn set_grade(&mut self, grade: impl Into<String>) {
        self.config.grade = grade.into();
    }

    pub fn set_exam_label(&mut self, exam_label: Option<ExamLabel>) {
        self.config.exam_label = exam_label;
    }

    /// 清空名册，回到默认状态
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_state() -> RosterState {
        let mut state = RosterState::default();
        state.set_grade("5B");
        state.set_exam_label(Some(ExamLabel::Third));
        state.rename_entry(1, "Luis");
        for name in ["Ana", "Beto", "Carla"] {
            let id = state.add_entry().unwrap();
            state.rename_entry(id, name);
        }
        state.register_time(2, "9:00:00 AM");
        state
    }

    #[test]
    fn test_default_state() {
        let state = RosterState::default();
        assert_eq!(state.entries(), &[StudentEntry::new(1)]);
        assert_eq!(state.next_id(), 2);
        assert_eq!(state.config(), &RosterConfiguration::default());
        assert!(!state.is_configured());
        assert!(!state.has_registered_time());
    }

    #[test]
    fn test_add_entry_ids_strictly_increase() {
        let mut state = RosterState::default();
        let mut last = FIRST_ENTRY_ID;
        for _ in 0..20 {
            let id = state.add_entry().unwrap();
            assert!(id > last);
            last = id;
        }
        let ids: HashSet<u32> = state.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), state.entries().len());
        assert_eq!(state.next_id(), last + 1);
    }

    #[test]
    fn test_clear_resets_id_counter() {
        let mut state = RosterState::default();
        state.add_entry();
        state.add_entry();
        state.clear_all();
        assert_eq!(state.add_entry(), Some(2));
    }

    #[test]
    fn test_add_entry_stops_at_last_id() {
        let mut state = RosterState::from_parts(
            vec![StudentEntry::new(1)],
            u32::MAX - 2,
            RosterConfiguration::default(),
        )
        .unwrap();

        assert_eq!(state.add_entry(), Some(u32::MAX - 2));
        assert_eq!(state.next_id(), u32::MAX - 1);

        let before = state.clone();
        assert_eq!(state.add_entry(), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_rename_only_touches_matching_entry() {
        let mut state = filled_state();
        let before = state.entries().to_vec();

        assert_eq!(state.rename_entry(3, "X"), EntryUpdate::Updated);

        for (old, new) in before.iter().zip(state.entries()) {
            if old.id == 3 {
                assert_eq!(new.name, "X");
                assert_eq!(new.time, old.time);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_rename_unknown_id_is_noop() {
        let mut state = filled_state();
        let before = state.clone();
        assert_eq!(state.rename_entry(99, "X"), EntryUpdate::NotFound);
        assert_eq!(state, before);
    }

    #[test]
    fn test_rename_locked_after_time() {
        let mut state = filled_state();
        assert_eq!(state.rename_entry(2, "Otra"), EntryUpdate::Locked);
        assert_eq!(state.entry(2).unwrap().name, "Ana");
    }

    #[test]
    fn test_register_time_is_set_once() {
        let mut state = filled_state();
        assert_eq!(state.register_time(3, "9:10:00 AM"), EntryUpdate::Updated);
        assert_eq!(
            state.register_time(3, "9:20:00 AM"),
            EntryUpdate::AlreadyRegistered
        );
        assert_eq!(state.entry(3).unwrap().time.as_deref(), Some("9:10:00 AM"));
    }

    #[test]
    fn test_register_time_requires_name() {
        let mut state = RosterState::default();
        state.rename_entry(1, "  ");
        assert_eq!(state.register_time(1, "9:00:00 AM"), EntryUpdate::EmptyName);
        assert_eq!(state.entry(1).unwrap().time, None);
        assert_eq!(state.register_time(42, "9:00:00 AM"), EntryUpdate::NotFound);
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let mut state = filled_state();
        state.clear_all();
        assert_eq!(state, RosterState::default());
        assert_eq!(state.entries().len(), 1);
        assert_eq!(state.entries()[0], StudentEntry::new(1));
        assert_eq!(state.next_id(), 2);
        assert!(state.config().grade.is_empty());
        assert_eq!(state.config().exam_label, None);
    }

    #[test]
    fn test_is_configured_needs_both_fields() {
        let mut state = RosterState::default();
        state.set_grade("5B");
        assert!(!state.is_configured());
        state.set_exam_label(Some(ExamLabel::First));
        assert!(state.is_configured());
        state.set_grade("   ");
        assert!(!state.is_configured());
    }

    #[test]
    fn test_from_parts_rejects_bad_shapes() {
        let dup = vec![StudentEntry::new(1), StudentEntry::new(1)];
        assert_eq!(
            RosterState::from_parts(dup, 2, RosterConfiguration::default()),
            Err(RosterShapeError::DuplicateId(1))
        );

        let stale = vec![StudentEntry::new(1), StudentEntry::new(5)];
        assert_eq!(
            RosterState::from_parts(stale, 5, RosterConfiguration::default()),
            Err(RosterShapeError::StaleNextId {
                next_id: 5,
                max_id: 5
            })
        );

        let full = vec![StudentEntry::new(1)];
        assert_eq!(
            RosterState::from_parts(full, u32::MAX, RosterConfiguration::default()),
            Err(RosterShapeError::ExhaustedIds(u32::MAX))
        );

        let ok = RosterState::from_parts(Vec::new(), 1, RosterConfiguration::default());
        assert!(ok.is_ok());
    }
}
