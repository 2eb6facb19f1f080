use crate::client::ApiClient;
use reqwest::Url;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{error, warn};

pub const USER_ID_KEY: &str = "writetrack_user_id";
pub const USER_ID_PARAM: &str = "user_id";

/// String key/value storage that outlives a page, like browser local storage.
#[allow(async_fn_in_trait)]
pub trait LocalStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>>;
    async fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    async fn remove(&mut self, key: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> BTreeMap<String, String> {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    error!("failed to parse store file: {err}");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                error!("failed to read store file: {err}");
                BTreeMap::new()
            }
        }
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let payload = serde_json::to_vec_pretty(entries)?;
        fs::write(&self.path, payload).await
    }
}

impl LocalStore for FileStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.load().await.remove(key))
    }

    async fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.load().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    async fn remove(&mut self, key: &str) -> io::Result<()> {
        let mut entries = self.load().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Assessment,
    Dashboard,
    LearningPlan,
    Practice,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Assessment => "/assessment.html",
            Page::Dashboard => "/dashboard.html",
            Page::LearningPlan => "/writepath/plan.html",
            Page::Practice => "/index.html",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub message: &'static str,
    pub to: Url,
}

pub const ASSESSMENT_REQUIRED: &str = "Please complete an assessment first to access this feature.";

#[derive(Debug)]
pub struct UserManager<S> {
    store: S,
    origin: Url,
    user_id: Option<String>,
    profile: Option<Value>,
}

impl<S: LocalStore> UserManager<S> {
    pub fn new(store: S, origin: Url) -> Self {
        Self {
            store,
            origin,
            user_id: None,
            profile: None,
        }
    }

    /// The `user_id` query parameter wins over the stored value; whichever
    /// is found is written back to the store.
    pub async fn init(&mut self, location: &Url) -> io::Result<Option<String>> {
        let from_url = location
            .query_pairs()
            .find(|(key, _)| key == USER_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        let user_id = match from_url {
            Some(id) => Some(id),
            None => self
                .store
                .get(USER_ID_KEY)
                .await?
                .filter(|value| !value.is_empty()),
        };

        if let Some(id) = &user_id {
            self.persist_user_id(id).await?;
        }
        Ok(user_id)
    }

    pub async fn persist_user_id(&mut self, user_id: &str) -> io::Result<()> {
        self.user_id = Some(user_id.to_string());
        self.store.set(USER_ID_KEY, user_id).await
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub async fn load_profile(&mut self, api: &ApiClient) -> Option<&Value> {
        let user_id = self.user_id.as_deref()?;
        match api.get_user_profile(user_id).await {
            Ok(profile) => {
                self.profile = Some(profile);
                self.profile.as_ref()
            }
            Err(err) => {
                warn!("failed to load user profile: {err}");
                None
            }
        }
    }

    pub fn profile(&self) -> Option<&Value> {
        self.profile.as_ref()
    }

    pub fn url_for(&self, page: Page) -> Url {
        let mut url = self.origin.clone();
        url.set_path(page.path());
        url.set_query(None);
        url.set_fragment(None);
        if let Some(id) = &self.user_id {
            url.query_pairs_mut().append_pair(USER_ID_PARAM, id);
        }
        url
    }

    pub fn assessment_url(&self) -> Url {
        self.url_for(Page::Assessment)
    }

    pub fn dashboard_url(&self) -> Url {
        self.url_for(Page::Dashboard)
    }

    pub fn learning_plan_url(&self) -> Url {
        self.url_for(Page::LearningPlan)
    }

    pub fn practice_url(&self) -> Url {
        self.url_for(Page::Practice)
    }

    pub fn require_authentication(&self) -> Result<&str, Redirect> {
        self.user_id.as_deref().ok_or_else(|| Redirect {
            message: ASSESSMENT_REQUIRED,
            to: self.assessment_url(),
        })
    }

    pub async fn logout(&mut self) -> io::Result<()> {
        self.user_id = None;
        self.profile = None;
        self.store.remove(USER_ID_KEY).await
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[derive(Debug)]
pub struct Session<S> {
    pub api: ApiClient,
    pub user: UserManager<S>,
}

impl<S: LocalStore> Session<S> {
    pub fn new(api: ApiClient, user: UserManager<S>) -> Self {
        Self { api, user }
    }

    pub async fn load_profile(&mut self) -> Option<&Value> {
        self.user.load_profile(&self.api).await
    }
}
