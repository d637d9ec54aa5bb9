use std::env;

pub const DEFAULT_PROJECT_ID: &str = "formula-e-selfie";
pub const DEFAULT_LOCATION: &str = "global";
pub const DEFAULT_MODEL_ID: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_ASPECT_RATIO: &str = "4:3";
pub const DEFAULT_BUCKET: &str = "created-images";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://storage.googleapis.com";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://storage.googleapis.com/upload/storage/v1";

#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub project_id: String,
    pub location: String,
    pub model_id: String,
    pub aspect_ratio: String,
    pub enable_search_grounding: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub public_base_url: String,
    pub upload_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: Option<u16>,
    pub max_upload_bytes: usize,
    pub use_memory_storage: bool,
    pub vertex: VertexConfig,
    pub storage: StorageConfig,
    pub access_token: Option<String>,
    pub auth_timeout_secs: u64,
}

impl Default for VertexConfig {
    fn default() -> Self {
        VertexConfig {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            enable_search_grounding: true,
            timeout_secs: 120,
        }
    }
}

impl VertexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let project_id = env::var("GOOGLE_CLOUD_PROJECT").unwrap_or(defaults.project_id);
        let location = env::var("GOOGLE_CLOUD_LOCATION").unwrap_or(defaults.location);
        let model_id = env::var("GENAI_MODEL_ID").unwrap_or(defaults.model_id);
        let aspect_ratio = env::var("GENAI_ASPECT_RATIO").unwrap_or(defaults.aspect_ratio);
        let enable_search_grounding = env::var("GENAI_SEARCH_GROUNDING")
            .ok()
            .map_or(true, |val| val != "false");
        let timeout_secs = env::var("GENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        VertexConfig {
            project_id,
            location,
            model_id,
            aspect_ratio,
            enable_search_grounding,
            timeout_secs,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn api_host(&self) -> String {
        if self.location == "global" {
            "aiplatform.googleapis.com".to_string()
        } else {
            format!("{}-aiplatform.googleapis.com", self.location)
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.api_host(),
            self.project_id,
            self.location,
            self.model_id
        )
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            bucket: DEFAULT_BUCKET.to_string(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bucket = env::var("GCS_BUCKET").unwrap_or(defaults.bucket);
        let public_base_url = env::var("GCS_PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url);
        let upload_base_url = env::var("GCS_UPLOAD_BASE_URL").unwrap_or(defaults.upload_base_url);
        let timeout_secs = env::var("GCS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        StorageConfig {
            bucket,
            public_base_url,
            upload_base_url,
            timeout_secs,
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }

    pub fn with_upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.upload_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: None,
            max_upload_bytes: 20 * 1024 * 1024,
            use_memory_storage: false,
            vertex: VertexConfig::default(),
            storage: StorageConfig::default(),
            access_token: None,
            auth_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_upload_bytes);
        let use_memory_storage = env::var("USE_MEMORY_STORAGE")
            .ok()
            .map_or(false, |val| val == "true");
        let access_token = env::var("GOOGLE_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        let auth_timeout_secs = env::var("AUTH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.auth_timeout_secs);

        Config {
            host,
            port,
            max_upload_bytes,
            use_memory_storage,
            vertex: VertexConfig::from_env(),
            storage: StorageConfig::from_env(),
            access_token,
            auth_timeout_secs,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_vertex(mut self, config: VertexConfig) -> Self {
        self.vertex = config;
        self
    }

    pub fn with_storage(mut self, config: StorageConfig) -> Self {
        self.storage = config;
        self
    }

    pub fn with_memory_storage(mut self) -> Self {
        self.use_memory_storage = true;
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port.unwrap_or(8080))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_location_uses_unprefixed_host() {
        let config = VertexConfig::new();
        assert_eq!(
            config.endpoint(),
            "https://aiplatform.googleapis.com/v1/projects/formula-e-selfie/locations/global/publishers/google/models/gemini-3-pro-image-preview:generateContent"
        );
    }

    #[test]
    fn test_regional_location_prefixes_host() {
        let config = VertexConfig::new()
            .with_location("us-central1")
            .with_project("demo")
            .with_model("gemini-2.5-flash-image");
        assert_eq!(config.api_host(), "us-central1-aiplatform.googleapis.com");
        assert!(config
            .endpoint()
            .ends_with("/projects/demo/locations/us-central1/publishers/google/models/gemini-2.5-flash-image:generateContent"));
    }

    #[test]
    fn test_public_url_pattern() {
        let storage = StorageConfig::new().with_public_base_url("https://storage.googleapis.com/");
        assert_eq!(
            storage.public_url("abc.png"),
            "https://storage.googleapis.com/created-images/abc.png"
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.bind_addr(), ("0.0.0.0".to_string(), 8080));
        assert_eq!(config.vertex.aspect_ratio, "4:3");
        assert!(config.vertex.enable_search_grounding);
        assert!(!config.use_memory_storage);
        assert_eq!(config.storage.timeout_secs, 60);
        assert_eq!(config.auth_timeout_secs, 10);
        assert_eq!(config.with_port(9000).bind_addr().1, 9000);
    }
}
