use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::time::sleep;

use cirrus_shared::api::{ErrorWrapper, Request};

use crate::model::config::Config;
use crate::model::errors::{CoreErrKind, CoreResult};

#[derive(Debug)]
pub enum ApiError<E> {
    Endpoint(E),
    InvalidAuth,
    BadRequest,
    InternalError,
    Serialize(String),
    SendFailed(String),
    ReceiveFailed(String),
    Deserialize(String),
}

/// The seam between this library and the wire. Everything that talks to the
/// server goes through a `Requester` so tests can swap the transport out.
pub trait Requester: Clone + Send + Sync + 'static {
    fn request<T: Request + Send>(
        &self, request: T,
    ) -> impl Future<Output = Result<T::Response, ApiError<T::Error>>> + Send;
}

/// The production transport. The session cookie issued at login lives in the
/// reqwest cookie store and rides along on every call.
#[derive(Debug, Clone)]
pub struct Network {
    pub client: Client,
    pub api_url: Arc<String>,
}

impl Network {
    pub fn new(config: &Config) -> CoreResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|err| CoreErrKind::Unexpected(format!("{err:?}")))?;
        Ok(Self { client, api_url: Arc::new(config.api_url.clone()) })
    }
}

impl Requester for Network {
    #[instrument(level = "debug", skip(self, request), fields(route = T::ROUTE), err(Debug))]
    async fn request<T: Request + Send>(
        &self, request: T,
    ) -> Result<T::Response, ApiError<T::Error>> {
        let serialized_request =
            serde_json::to_vec(&request).map_err(|err| ApiError::Serialize(err.to_string()))?;

        let mut retries = 0;
        let start = Instant::now();
        let sent = loop {
            match self
                .client
                .request(T::METHOD, format!("{}{}", self.api_url, T::ROUTE).as_str())
                .header("Content-Type", "application/json")
                .body(serialized_request.clone())
                .send()
                .await
            {
                Ok(o) => {
                    if start.elapsed() > Duration::from_millis(1000) {
                        warn!("network request took {:?}", start.elapsed());
                    }
                    break o;
                }
                Err(e) => {
                    if retries < 3 {
                        warn!(
                            "network request send failed; retrying after {}ms; error = {:?}",
                            retries * 100,
                            e.to_string()
                        );
                        sleep(Duration::from_millis(retries * 100)).await;
                        retries += 1;
                        continue;
                    } else {
                        return Err(ApiError::SendFailed(e.to_string()));
                    }
                }
            }
        };

        let status = sent.status();
        let serialized_response = sent
            .bytes()
            .await
            .map_err(|err| ApiError::ReceiveFailed(err.to_string()))?;

        if status.is_success() {
            serde_json::from_slice(&serialized_response)
                .map_err(|err| ApiError::Deserialize(err.to_string()))
        } else {
            let wrapper: ErrorWrapper<T::Error> = serde_json::from_slice(&serialized_response)
                .map_err(|err| ApiError::Deserialize(err.to_string()))?;
            Err(wrapper.into())
        }
    }
}
