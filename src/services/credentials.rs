//! 凭据存储服务 - 业务能力层
//!
//! 只负责"记住用户名和密码"能力：按固定服务命名空间读写三个字符串值

use crate::error::CredentialError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub const REMEMBERED_USERNAME_KEY: &str = "remembered_username";
pub const REMEMBERED_PASSWORD_KEY: &str = "remembered_password";
pub const REMEMBER_ENABLED_KEY: &str = "remember_enabled";

/// 凭据存储
///
/// 删除不存在的键不算错误
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError>;
    fn delete(&self, key: &str) -> Result<(), CredentialError>;
}

/// 记住的登录信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RememberedLogin {
    pub username: String,
    pub password: String,
}

/// 读取记住的登录信息
///
/// 只有开关为 "true" 且用户名和密码都非空时才返回
pub fn load_remembered(store: &dyn CredentialStore) -> Result<Option<RememberedLogin>, CredentialError> {
    if store.get(REMEMBER_ENABLED_KEY)?.as_deref() != Some("true") {
        return Ok(None);
    }

    let username = store.get(REMEMBERED_USERNAME_KEY)?.unwrap_or_default();
    let password = store.get(REMEMBERED_PASSWORD_KEY)?.unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return Ok(None);
    }

    Ok(Some(RememberedLogin { username, password }))
}

pub fn save_remembered(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<(), CredentialError> {
    store.set(REMEMBERED_USERNAME_KEY, username)?;
    store.set(REMEMBERED_PASSWORD_KEY, password)?;
    store.set(REMEMBER_ENABLED_KEY, "true")
}

pub fn clear_remembered(store: &dyn CredentialStore) -> Result<(), CredentialError> {
    store.delete(REMEMBERED_USERNAME_KEY)?;
    store.delete(REMEMBERED_PASSWORD_KEY)?;
    store.delete(REMEMBER_ENABLED_KEY)
}

/// 凭据文件内容：服务名 -> (键 -> 值)
type CredentialFile = BTreeMap<String, BTreeMap<String, String>>;

/// 基于 TOML 文件的凭据存储
pub struct FileCredentialStore {
    path: PathBuf,
    service: String,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    /// 创建凭据存储（文件在第一次写入时创建）
    pub fn new(path: impl Into<PathBuf>, service: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            service: service.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<CredentialFile, CredentialError> {
        if !self.path.exists() {
            return Ok(CredentialFile::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| CredentialError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| CredentialError::Parse {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write_file(&self, data: &CredentialFile) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| CredentialError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let content = toml::to_string(data)?;
        fs::write(&self.path, content).map_err(|source| CredentialError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, CredentialError> {
        self.lock
            .lock()
            .map_err(|_| CredentialError::Unavailable("credential lock poisoned".to_string()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let _guard = self.guard()?;
        let data = self.read_file()?;
        Ok(data.get(&self.service).and_then(|entries| entries.get(key)).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let _guard = self.guard()?;
        let mut data = self.read_file()?;
        data.entry(self.service.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.write_file(&data)?;
        debug!("凭据已写入: {}/{}", self.service, key);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CredentialError> {
        let _guard = self.guard()?;
        let mut data = self.read_file()?;

        let removed = data
            .get_mut(&self.service)
            .and_then(|entries| entries.remove(key))
            .is_some();
        if !removed {
            return Ok(());
        }

        if data.get(&self.service).is_some_and(|entries| entries.is_empty()) {
            data.remove(&self.service);
        }
        self.write_file(&data)
    }
}

/// 内存中的凭据存储
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, CredentialError> {
        self.entries
            .lock()
            .map_err(|_| CredentialError::Unavailable("credential lock poisoned".to_string()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CredentialError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
