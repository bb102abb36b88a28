use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use s3::bucket::Bucket as S3Client;
use s3::creds::Credentials;
use s3::region::Region;
use tokio::time::sleep;

use crate::config::FilesDbConfig;

#[derive(Debug)]
pub enum Error {
    NoSuchKey(String),
    Unknown(Option<String>, Option<u16>),
}

/// The narrow interface the rest of the server sees of object storage:
/// issue a scoped write credential, move an object, remove one. Bytes never
/// transit this process.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// A time-boxed url permitting one PUT of the declared content type and
    /// length directly against the store.
    fn presign_put(
        &self, key: &str, content_type: &str, content_length: u64, expiry_secs: u32,
    ) -> Result<String, Error>;

    async fn copy(&self, from: &str, to: &str) -> Result<(), Error>;

    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// The public url a browser fetches the object from.
    fn public_url(&self, key: &str) -> String;
}

pub struct S3Store {
    bucket: S3Client,
    public_endpoint: String,
    bucket_name: String,
}

pub fn create_client(config: &FilesDbConfig) -> Result<S3Store, Error> {
    debug!("Creating files_db client...");

    let credentials = Credentials {
        access_key: Some(config.access_key.clone()),
        secret_key: Some(config.secret_key.clone()),
        security_token: None,
        session_token: None,
        expiration: None,
    };

    let bucket = match (&config.scheme, &config.host, &config.port) {
        (Some(scheme), Some(host), Some(port)) => {
            let url = format!("{}://{}:{}", scheme, host, port);
            S3Client::new(
                &config.bucket,
                Region::Custom { endpoint: url, region: config.region.clone() },
                credentials,
            )
            .map(|bucket| bucket.with_path_style())
        }
        _ => S3Client::new(
            &config.bucket,
            config
                .region
                .parse()
                .map_err(|_| Error::Unknown(Some("bad region".to_string()), None))?,
            credentials,
        ),
    }
    .map_err(|err| Error::Unknown(Some(err.to_string()), None))?;

    Ok(S3Store {
        bucket,
        public_endpoint: config.public_endpoint.clone(),
        bucket_name: config.bucket.clone(),
    })
}

#[async_trait]
impl ObjectStore for S3Store {
    fn presign_put(
        &self, key: &str, content_type: &str, _content_length: u64, expiry_secs: u32,
    ) -> Result<String, Error> {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            content_type
                .parse()
                .map_err(|_| Error::Unknown(Some("bad content type".to_string()), None))?,
        );

        self.bucket
            .presign_put(format!("/{key}"), expiry_secs, Some(headers))
            .map_err(|err| Error::Unknown(Some(err.to_string()), None))
    }

    async fn copy(&self, from: &str, to: &str) -> Result<(), Error> {
        let status = self
            .bucket
            .copy_object_internal(format!("/{from}"), format!("/{to}"))
            .await
            .map_err(|err| Error::Unknown(Some(err.to_string()), None))?;

        match status {
            200 => Ok(()),
            404 => Err(Error::NoSuchKey(from.to_string())),
            status => Err(Error::Unknown(None, Some(status))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let mut response = Ok(());
        for attempt_number in 1..=3 {
            let result = self
                .bucket
                .delete_object(format!("/{key}"))
                .await
                .map_err(|err| Error::Unknown(Some(err.to_string()), None))?;

            match result.status_code() {
                200 | 204 => return Ok(()),
                status @ 500..=599 => {
                    // https://docs.aws.amazon.com/AmazonS3/latest/userguide/ErrorBestPractices.html
                    error!(
                        "{} while deleting {} in s3. Will retry: {}.",
                        status,
                        key,
                        attempt_number != 3
                    );
                    response = Err(Error::Unknown(None, Some(status)));
                }
                status => return Err(Error::Unknown(None, Some(status))),
            }

            sleep(Duration::from_secs(1)).await;
        }
        response
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket_name, key)
    }
}

/// Backing store for tests and local development: keys only, no bytes. The
/// direct PUT leg happens outside the server, so "an object exists" is all
/// the server-side flows ever observe.
#[derive(Default)]
pub struct InMemoryStore {
    objects: Mutex<HashSet<String>>,
    fail_copies: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryStore {
    /// Simulate the client's credentialed PUT having landed.
    pub fn seed_object(&self, key: &str) {
        self.objects
            .lock()
            .expect("object set poisoned")
            .insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .expect("object set poisoned")
            .contains(key)
    }

    pub fn fail_copies(&self, fail: bool) {
        self.fail_copies.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    fn presign_put(
        &self, key: &str, _content_type: &str, _content_length: u64, expiry_secs: u32,
    ) -> Result<String, Error> {
        Ok(format!("https://storage.test/{key}?expires={expiry_secs}"))
    }

    async fn copy(&self, from: &str, to: &str) -> Result<(), Error> {
        if self.fail_copies.load(Ordering::SeqCst) {
            return Err(Error::Unknown(Some("injected copy failure".to_string()), Some(500)));
        }
        let mut objects = self.objects.lock().expect("object set poisoned");
        if !objects.contains(from) {
            return Err(Error::NoSuchKey(from.to_string()));
        }
        objects.insert(to.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::Unknown(Some("injected delete failure".to_string()), Some(500)));
        }
        self.objects.lock().expect("object set poisoned").remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://storage.test/{key}")
    }
}
