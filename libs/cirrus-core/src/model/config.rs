use serde::{Deserialize, Serialize};

pub const DEFAULT_TRANSFER_TIMEOUT_SECS: u64 = 30 * 60;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
    /// Where logs land. Nothing else is written to disk; in-flight upload
    /// state does not survive a restart.
    pub writeable_path: String,
    pub logs: bool,
    pub colored_logs: bool,
    /// Upper bound on one direct-to-storage transfer. Independent of the
    /// 30-minute write-credential expiry.
    pub transfer_timeout_secs: u64,
}

impl Config {
    pub fn new(api_url: &str, writeable_path: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            writeable_path: writeable_path.to_string(),
            logs: true,
            colored_logs: true,
            transfer_timeout_secs: DEFAULT_TRANSFER_TIMEOUT_SECS,
        }
    }
}
