use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use url::Url;

use crate::config::ObjectStorageSettings;
use crate::errors::{ConfigurationError, DataAccessError};
use crate::metrics::BLOB_UPLOADS_TOTAL;

type HmacSha256 = Hmac<Sha256>;

const AWS_URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `path` and returns a URL for retrieving them.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<Url, DataAccessError>;
}

/// S3-compatible object storage signed with AWS SigV4.
#[derive(Clone, Debug)]
pub struct S3BlobStore {
    bucket: String,
    region: String,
    endpoint: Url,
    access_key: String,
    secret_key: String,
    prefix: String,
    http: Client,
}

impl S3BlobStore {
    pub fn new(settings: ObjectStorageSettings, app_env: &str) -> Result<Self, ConfigurationError> {
        let endpoint = settings
            .endpoint
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", settings.region));
        let endpoint = Url::parse(&endpoint).map_err(|err| ConfigurationError::Invalid {
            key: "storage.endpoint",
            reason: err.to_string(),
        })?;

        if endpoint.host_str().is_none() {
            return Err(ConfigurationError::Invalid {
                key: "storage.endpoint",
                reason: "endpoint must include a host".to_string(),
            });
        }
        match endpoint.scheme() {
            "https" => {}
            "http" if app_env != "prod" => {}
            scheme => {
                return Err(ConfigurationError::Invalid {
                    key: "storage.endpoint",
                    reason: format!("scheme '{}' not allowed in {} mode", scheme, app_env),
                })
            }
        }
        if settings.access_key.is_empty() || settings.secret_key.is_empty() {
            return Err(ConfigurationError::Missing("storage.access_key / storage.secret_key"));
        }

        Ok(Self {
            bucket: settings.bucket,
            region: settings.region,
            endpoint,
            access_key: settings.access_key,
            secret_key: settings.secret_key,
            prefix: sanitize_prefix(&settings.prefix),
            http: Client::new(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        let cleaned = key.trim_matches('/');
        if self.prefix.is_empty() {
            cleaned.to_string()
        } else {
            format!("{}/{}", self.prefix, cleaned)
        }
    }

    fn object_path(&self, object_key: &str) -> String {
        let encoded = object_key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, AWS_URI_ENCODE_SET).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!("/{}/{}", self.bucket, encoded)
    }

    fn authorization(
        &self,
        canonical_uri: &str,
        host: &str,
        payload_hash: &str,
        amz_date: &str,
        date_stamp: &str,
    ) -> String {
        let scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region);
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";
        let canonical_request = format!(
            "PUT\n{}\n\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
            canonical_uri, host, payload_hash, amz_date, signed_headers, payload_hash
        );
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = derive_signing_key(&self.secret_key, date_stamp, &self.region);
        let signature = hex::encode(hmac_sign(&signing_key, string_to_sign.as_bytes()));

        format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key, scope, signed_headers, signature
        )
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<Url, DataAccessError> {
        let object_key = self.full_key(path);
        let canonical_uri = self.object_path(&object_key);
        let host = self
            .endpoint
            .host_str()
            .ok_or_else(|| DataAccessError::Backend("storage endpoint missing host".into()))?
            .to_lowercase();
        let host = match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        };

        let payload_hash = hex::encode(Sha256::digest(&bytes));
        let now = Utc::now();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();
        let authorization =
            self.authorization(&canonical_uri, &host, &payload_hash, &amz_date, &date_stamp);

        let mut url = self.endpoint.clone();
        url.set_path(&canonical_uri);

        let result = self
            .http
            .put(url.clone())
            .header("Authorization", authorization)
            .header("x-amz-date", amz_date)
            .header("x-amz-content-sha256", payload_hash)
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => {
                BLOB_UPLOADS_TOTAL.with_label_values(&["success"]).inc();
                tracing::info!("Uploaded object {}", object_key);
                Ok(url)
            }
            Err(err) => {
                BLOB_UPLOADS_TOTAL.with_label_values(&["error"]).inc();
                Err(DataAccessError::Backend(format!(
                    "failed to upload object {}: {}",
                    object_key, err
                )))
            }
        }
    }
}

/// Keeps blobs in memory and hands out `memory://` URLs.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Option<(Vec<u8>, String)> {
        self.blobs.read().await.get(path.trim_matches('/')).cloned()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<Url, DataAccessError> {
        let key = path.trim_matches('/').to_string();
        let url = Url::parse(&format!("memory://blobs/{}", key))
            .map_err(|err| DataAccessError::Backend(err.to_string()))?;
        self.blobs
            .write()
            .await
            .insert(key, (bytes, content_type.to_string()));
        BLOB_UPLOADS_TOTAL.with_label_values(&["success"]).inc();
        Ok(url)
    }
}

fn sanitize_prefix(prefix: &str) -> String {
    prefix
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn derive_signing_key(secret: &str, date: &str, region: &str) -> Vec<u8> {
    let mut key = format!("AWS4{}", secret).into_bytes();
    key = hmac_sign(&key, date);
    key = hmac_sign(&key, region);
    key = hmac_sign(&key, "s3");
    hmac_sign(&key, b"aws4_request")
}

fn hmac_sign(key: &[u8], message: impl AsRef<[u8]>) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message.as_ref());
    mac.finalize().into_bytes().to_vec()
}
