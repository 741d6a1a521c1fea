use audition_admin::error::CredentialError;
use audition_admin::services::credentials::{
    REMEMBERED_PASSWORD_KEY, REMEMBERED_USERNAME_KEY, REMEMBER_ENABLED_KEY,
};
use audition_admin::services::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use audition_admin::views::{LoginField, LoginIntent, LoginWindow, NotificationLevel, Window};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::assert_ok;

/// 只读的凭据存储，写入总是失败
struct ReadOnlyStore;

impl CredentialStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, CredentialError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), CredentialError> {
        Err(CredentialError::Unavailable("read-only".to_string()))
    }

    fn delete(&self, _key: &str) -> Result<(), CredentialError> {
        Ok(())
    }
}

fn login_window(store: Arc<dyn CredentialStore>) -> LoginWindow {
    LoginWindow::new(store, Duration::from_secs(3))
}

#[test]
fn empty_fields_are_rejected() {
    let mut window = login_window(Arc::new(MemoryCredentialStore::new()));
    window.set_username("admin");

    window.submit();

    assert!(window.take_intents().is_empty());
    assert!(window.form_enabled());
    let notification = window.notification().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.message, "Please enter both username and password");
}

#[test]
fn remember_writes_all_three_values() {
    let store = Arc::new(MemoryCredentialStore::new());
    let mut window = login_window(store.clone());
    window.set_username("admin");
    window.set_password("secret");
    window.set_remember(true);

    window.submit();

    assert_eq!(store.get(REMEMBERED_USERNAME_KEY).unwrap().as_deref(), Some("admin"));
    assert_eq!(store.get(REMEMBERED_PASSWORD_KEY).unwrap().as_deref(), Some("secret"));
    assert_eq!(store.get(REMEMBER_ENABLED_KEY).unwrap().as_deref(), Some("true"));
    assert_eq!(window.busy_label(), Some("Logging in"));
    assert_eq!(
        window.take_intents(),
        vec![LoginIntent::Login {
            username: "admin".to_string(),
            password: "secret".to_string(),
        }]
    );
}

#[test]
fn unchecked_remember_clears_store() {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(REMEMBERED_USERNAME_KEY, "old").unwrap();
    store.set(REMEMBERED_PASSWORD_KEY, "older").unwrap();
    store.set(REMEMBER_ENABLED_KEY, "true").unwrap();

    let mut window = login_window(store.clone());
    assert!(window.remember());
    window.toggle_remember();
    window.set_username("admin");
    window.set_password("secret");
    window.submit();

    assert_eq!(store.get(REMEMBERED_USERNAME_KEY).unwrap(), None);
    assert_eq!(store.get(REMEMBERED_PASSWORD_KEY).unwrap(), None);
    assert_eq!(store.get(REMEMBER_ENABLED_KEY).unwrap(), None);
}

#[test]
fn remembered_login_prefills_form() {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(REMEMBERED_USERNAME_KEY, "admin").unwrap();
    store.set(REMEMBERED_PASSWORD_KEY, "secret").unwrap();
    store.set(REMEMBER_ENABLED_KEY, "true").unwrap();

    let window = login_window(store);

    assert_eq!(window.username(), "admin");
    assert_eq!(window.password(), "secret");
    assert!(window.remember());
    assert_eq!(window.focus(), LoginField::Password);
}

#[test]
fn file_store_persists_between_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("credentials.toml");

    {
        let store: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(&path, "nanoko-admin"));
        let mut window = login_window(store);
        window.set_username("admin");
        window.set_password("secret");
        window.set_remember(true);
        window.submit();
    }
    assert!(path.exists());

    let reopened = FileCredentialStore::new(&path, "nanoko-admin");
    let value = assert_ok!(reopened.get(REMEMBERED_USERNAME_KEY));
    assert_eq!(value.as_deref(), Some("admin"));

    let window = login_window(Arc::new(reopened));
    assert_eq!(window.password(), "secret");

    // 其他服务名下看不到这些值
    let other = FileCredentialStore::new(&path, "someone-else");
    assert_eq!(assert_ok!(other.get(REMEMBERED_USERNAME_KEY)), None);
}

#[test]
fn deleting_missing_key_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credentials.toml"), "nanoko-admin");

    assert_ok!(store.delete(REMEMBERED_PASSWORD_KEY));
}

#[test]
fn failing_store_warns_but_still_logs_in() {
    let mut window = login_window(Arc::new(ReadOnlyStore));
    window.set_username("admin");
    window.set_password("secret");
    window.set_remember(true);

    window.submit();

    let notification = window.notification().unwrap();
    assert_eq!(notification.level, NotificationLevel::Warning);
    assert_eq!(notification.message, "Could not save credentials");
    assert_eq!(window.take_intents().len(), 1);
}

#[test]
fn login_failure_unlocks_form() {
    let mut window = login_window(Arc::new(MemoryCredentialStore::new()));
    window.set_username("admin");
    window.set_password("wrong");
    window.submit();
    assert!(!window.form_enabled());

    // 加载中的表单忽略重复提交和输入
    window.submit();
    window.input_char('x');
    assert_eq!(window.take_intents().len(), 1);
    assert_eq!(window.password(), "wrong");

    window.on_login_failed("invalid credentials");

    assert!(window.form_enabled());
    assert_eq!(window.busy_label(), None);
    assert_eq!(window.notification().unwrap().message, "invalid credentials");
}

#[test]
fn typing_follows_focus() {
    let mut window = login_window(Arc::new(MemoryCredentialStore::new()));

    for c in "root".chars() {
        window.input_char(c);
    }
    window.focus_next();
    window.input_char('p');
    window.backspace();
    window.input_char('q');
    window.focus_next();
    window.input_char(' ');

    assert_eq!(window.username(), "root");
    assert_eq!(window.password(), "q");
    assert!(window.remember());
    window.focus_prev();
    assert_eq!(window.focus(), LoginField::Password);

    window.cancel();
    assert_eq!(window.take_intents(), vec![LoginIntent::Quit]);
}
