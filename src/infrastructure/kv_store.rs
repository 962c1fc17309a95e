//! 键值存储 - 基础设施层
//!
//! 持有存储介质，只暴露按键读写字节的能力，不认识名册

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// 按键读写字节的持久化存储
pub trait KeyValueStore {
    /// 读取键对应的值，不存在时返回 `None`
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// 写入（覆盖）键对应的值
    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()>;

    /// 删除键，不存在时视为成功
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// 基于目录的存储：每个键一个文件
///
/// 写入时先写临时文件再重命名，避免中途崩溃留下半个文件
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 键对应的文件路径
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(value)?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        debug!("已写入 {} ({} 字节)", path.display(), value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// 内存存储（测试和演示用）
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    values: HashMap<String, Vec<u8>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = tempdir().unwrap();
        let mut store = FileKeyValueStore::new(dir.path().join("nested"));

        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", b"hola").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"hola"[..]));
        assert!(!store.path_for("k").with_extension("json.tmp").exists());

        store.set("k", b"adios").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"adios"[..]));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        // 再删一次也不报错
        store.remove("k").unwrap();
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryKeyValueStore::new();
        store.set("a", b"1").unwrap();
        assert!(store.contains("a"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
