pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub listen_addr: String,
    /// Comma-separated allowed CORS origins. If empty or "*", allows all origins (dev mode).
    pub cors_origins: String,
    pub open_cage_api_key: String,
    pub geocoder_base_url: String,
    pub storage_bucket: String,
    pub storage_access_token: String,
    pub storage_base_url: String,
    /// Request body cap, sized for background image uploads.
    pub max_upload_bytes: usize,
}

fn required(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

fn or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a number, got {v:?}")),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            database_url: required("DATABASE_URL"),
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 10),
            listen_addr: or_default("LISTEN_ADDR", "0.0.0.0:3000"),
            cors_origins: or_default("CORS_ORIGINS", "*"),
            open_cage_api_key: required("OPEN_CAGE_API_KEY"),
            geocoder_base_url: or_default("GEOCODER_BASE_URL", "https://api.opencagedata.com"),
            storage_bucket: required("STORAGE_BUCKET"),
            storage_access_token: required("STORAGE_ACCESS_TOKEN"),
            storage_base_url: or_default("STORAGE_BASE_URL", "https://storage.googleapis.com"),
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
        }
    }
}
