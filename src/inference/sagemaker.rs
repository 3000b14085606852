// AWS SageMaker runtime implementation of InferenceClient.
//
// Credentials and region come from the default AWS provider chain
// (environment, shared config, instance/role metadata). Setting those up
// is outside this program.

use async_trait::async_trait;
use aws_sdk_sagemakerruntime::error::DisplayErrorContext;
use aws_sdk_sagemakerruntime::primitives::Blob;
use aws_sdk_sagemakerruntime::Client;
use tracing::debug;

use super::traits::{InferenceClient, RawResponse};
use crate::error::{Error, Result};

/// Request body content type: one CSV row of feature values.
pub const CONTENT_TYPE: &str = "text/csv";
/// Requested response content type.
pub const ACCEPT: &str = "application/json";

/// SageMaker runtime inference client.
pub struct SageMakerClient {
    client: Client,
}

impl SageMakerClient {
    /// Build a client from the default AWS configuration chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl InferenceClient for SageMakerClient {
    async fn invoke(&self, endpoint: &str, payload: &str) -> Result<RawResponse> {
        debug!(
            endpoint = endpoint,
            payload_bytes = payload.len(),
            "Invoking inference endpoint"
        );

        let output = self
            .client
            .invoke_endpoint()
            .endpoint_name(endpoint)
            .content_type(CONTENT_TYPE)
            .accept(ACCEPT)
            .body(Blob::new(payload.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| {
                Error::Inference(format!(
                    "InvokeEndpoint {endpoint} failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let body = output
            .body()
            .map(|blob| blob.as_ref().to_vec())
            .unwrap_or_default();

        Ok(RawResponse::new(body))
    }
}
