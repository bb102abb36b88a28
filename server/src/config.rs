use std::env;

#[derive(Clone)]
pub struct IndexDbConf {
    pub db_location: String,
}

impl IndexDbConf {
    pub fn from_env_vars() -> Self {
        Self { db_location: env_or_panic("INDEX_DB_LOCATION") }
    }
}

#[derive(Clone)]
pub struct FilesDbConfig {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base used to derive the public object url clients browse with.
    pub public_endpoint: String,
}

impl FilesDbConfig {
    pub fn from_env_vars() -> FilesDbConfig {
        FilesDbConfig {
            scheme: env_or_empty("FILES_DB_SCHEME"),
            host: env_or_empty("FILES_DB_HOST"),
            port: env_or_empty("FILES_DB_PORT").map(|e| e.parse().expect("Expected u16!")),
            region: env_or_panic("FILES_DB_REGION"),
            bucket: env_or_panic("FILES_DB_BUCKET"),
            access_key: env_or_panic("FILES_DB_ACCESS_KEY"),
            secret_key: env_or_panic("FILES_DB_SECRET_KEY"),
            public_endpoint: env_or_panic("FILES_DB_PUBLIC_ENDPOINT"),
        }
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub log_path: String,
    pub session_ttl_secs: u64,
    pub session_sweep_secs: u64,
    pub credential_ttl_secs: u32,
}

impl ServerConfig {
    pub fn from_env_vars() -> ServerConfig {
        ServerConfig {
            port: env_or_panic("SERVER_PORT").parse().unwrap(),
            log_path: env_or_panic("LOG_PATH"),
            session_ttl_secs: env_or_default("SESSION_TTL_SECS", 60 * 60 * 24 * 7),
            session_sweep_secs: env_or_default("SESSION_SWEEP_SECS", 60 * 60),
            credential_ttl_secs: env_or_default("CREDENTIAL_TTL_SECS", 60 * 30) as u32,
        }
    }
}

#[derive(Clone)]
pub struct BillingConfig {
    pub stripe_secret: String,
    pub signing_secret: String,
    pub pro_price_id: String,
    pub premium_price_id: String,
}

impl BillingConfig {
    /// All four billing vars must be present together or absent together;
    /// half-configured billing is a deployment mistake, not a mode.
    pub fn from_env_vars() -> Option<BillingConfig> {
        let stripe_secret = env_or_empty("STRIPE_SECRET_KEY");
        let signing_secret = env_or_empty("STRIPE_WEBHOOK_SIGNING_SECRET");
        let pro_price_id = env_or_empty("STRIPE_PRO_PRICE_ID");
        let premium_price_id = env_or_empty("STRIPE_PREMIUM_PRICE_ID");

        match (stripe_secret, signing_secret, pro_price_id, premium_price_id) {
            (Some(stripe_secret), Some(signing_secret), Some(pro_price_id), Some(premium_price_id)) => {
                Some(BillingConfig { stripe_secret, signing_secret, pro_price_id, premium_price_id })
            }
            (None, None, None, None) => None,
            _ => panic!("Invalid config, stripe vars must all be set (billing on) or all be unset (billing off)"),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub index_db: IndexDbConf,
    pub files_db: FilesDbConfig,
    pub server: ServerConfig,
    pub billing: Option<BillingConfig>,
}

impl Config {
    pub fn from_env_vars() -> Self {
        Self {
            index_db: IndexDbConf::from_env_vars(),
            files_db: FilesDbConfig::from_env_vars(),
            server: ServerConfig::from_env_vars(),
            billing: BillingConfig::from_env_vars(),
        }
    }
}

fn env_or_panic(var_name: &str) -> String {
    env::var(var_name).unwrap_or_else(|_| panic!("Missing environment variable {}", var_name))
}

fn env_or_empty(var_name: &str) -> Option<String> {
    match env::var(var_name) {
        Ok(var) => Some(var),
        Err(_) => None,
    }
}

fn env_or_default(var_name: &str, default: u64) -> u64 {
    match env::var(var_name) {
        Ok(var) => var
            .parse()
            .unwrap_or_else(|_| panic!("{} must be an integer", var_name)),
        Err(_) => default,
    }
}
