use secrecy::SecretString;
use serde::Deserialize;

/// The single system-wide shared secret that wearables present on ingestion.
/// It proves "this call comes from a legitimate device" and nothing more;
/// per-device identity travels in the payload.
#[derive(Debug, Deserialize)]
pub struct DeviceSettings {
    pub api_key: SecretString,
}

impl DeviceSettings {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key: SecretString::new(api_key.into_boxed_str()),
        }
    }
}
