use serde::{Deserialize, Serialize};

/// 学生条目：姓名 + 交卷时间
///
/// `time` 一旦登记就不可再修改，同时锁定 `name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEntry {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub time: Option<String>,
}

impl StudentEntry {
    /// 创建空白条目（无姓名、无时间）
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: String::new(),
            time: None,
        }
    }

    /// 姓名是否已填写（忽略首尾空白）
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// 是否已登记交卷时间
    pub fn has_time(&self) -> bool {
        self.time.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// 已登记时间的条目不可再改名
    pub fn is_locked(&self) -> bool {
        self.has_time()
    }

    /// 可导出的行：姓名非空且已登记时间
    pub fn is_checked_in(&self) -> bool {
        self.has_name() && self.has_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_blank() {
        let entry = StudentEntry::new(7);
        assert_eq!(entry.id, 7);
        assert!(!entry.has_name());
        assert!(!entry.is_locked());
        assert!(!entry.is_checked_in());
    }

    #[test]
    fn test_whitespace_name_does_not_count() {
        let entry = StudentEntry {
            id: 1,
            name: "   ".to_string(),
            time: Some("10:00:00 AM".to_string()),
        };
        assert!(!entry.has_name());
        assert!(!entry.is_checked_in());
    }

    #[test]
    fn test_empty_time_neither_locks_nor_exports() {
        let entry = StudentEntry {
            id: 1,
            name: "Ana".to_string(),
            time: Some(String::new()),
        };
        assert!(!entry.has_time());
        assert!(!entry.is_locked());
        assert!(!entry.is_checked_in());
    }

    #[test]
    fn test_missing_time_field_deserializes_as_none() {
        let entry: StudentEntry = serde_json::from_str(r#"{"id":3,"name":"Ana"}"#).unwrap();
        assert_eq!(entry.time, None);

        let entry: StudentEntry =
            serde_json::from_str(r#"{"id":3,"name":"Ana","time":null}"#).unwrap();
        assert_eq!(entry.time, None);
    }
}
