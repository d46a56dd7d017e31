//! Kinesis client module
//!
//! Wraps the `aws-sdk-kinesis` client as a [`RecordSink`].
//!
//! Region and credentials come from the ambient AWS configuration chain
//! (environment, profile, instance metadata). The region and endpoint can be
//! overridden for testing against a local emulator.

use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_kinesis::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_kinesis::operation::put_record::PutRecordError;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::Client;

use crate::error::ReplayError;
use crate::record::Envelope;
use crate::sink::{Ack, RecordSink};

/// Default time allowed for a single `PutRecord` call.
pub const DEFAULT_PUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Kinesis client.
#[derive(Debug, Clone)]
pub struct KinesisConfig {
    /// Region override; the ambient region is used when `None`.
    pub region: Option<String>,

    /// Endpoint override, e.g. `http://localhost:4566` for LocalStack.
    pub endpoint_url: Option<String>,

    /// Upper bound on a single submission.
    pub put_timeout: Duration,
}

impl Default for KinesisConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            put_timeout: DEFAULT_PUT_TIMEOUT,
        }
    }
}

/// Kinesis Data Streams sink.
pub struct KinesisSink {
    client: Client,
    put_timeout: Duration,
}

impl KinesisSink {
    /// Loads the AWS configuration and builds the client.
    ///
    /// No network call is made here; credential problems surface on the first
    /// submission.
    pub async fn connect(config: &KinesisConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(ref region) = config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(ref endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        tracing::debug!(
            region = sdk_config.region().map(|r| r.as_ref()).unwrap_or("<unset>"),
            "Loaded AWS configuration"
        );

        Self {
            client: Client::new(&sdk_config),
            put_timeout: config.put_timeout,
        }
    }
}

impl RecordSink for KinesisSink {
    async fn submit(&self, envelope: &Envelope) -> Result<Ack, ReplayError> {
        let request = self
            .client
            .put_record()
            .stream_name(&envelope.stream_name)
            .partition_key(&envelope.partition_key)
            .data(Blob::new(envelope.payload.clone()))
            .send();

        let output = tokio::time::timeout(self.put_timeout, request)
            .await
            .map_err(|_| ReplayError::Timeout(self.put_timeout))?
            .map_err(|e| ReplayError::Transport(classify_put_record_error(&e)))?;

        Ok(Ack::new(output.sequence_number()).with_shard(output.shard_id()))
    }
}

/// Describes a `PutRecord` failure for the operator.
///
/// The classification only shapes the message; no error is retried.
fn classify_put_record_error<R: std::fmt::Debug>(err: &SdkError<PutRecordError, R>) -> String {
    match err {
        SdkError::ServiceError(service_err) => {
            let inner = service_err.err();
            let message = inner.message().unwrap_or("no message");
            describe_service_error(inner.code().unwrap_or("Unknown"), message)
        }
        SdkError::TimeoutError(_) => "request timed out in the SDK".to_string(),
        SdkError::DispatchFailure(e) => format!("dispatch failure: {:?}", e),
        SdkError::ConstructionFailure(e) => format!("request construction failed: {:?}", e),
        SdkError::ResponseError(e) => format!("unreadable response: {:?}", e),
        _ => format!("{:?}", err),
    }
}

/// Maps a Kinesis service error code to a short description.
fn describe_service_error(code: &str, message: &str) -> String {
    let kind = match code {
        "ProvisionedThroughputExceededException" | "ThrottlingException" => "throttled",
        "ResourceNotFoundException" => "stream not found",
        "AccessDeniedException" | "UnrecognizedClientException" | "ExpiredTokenException" => {
            "access denied"
        }
        "InvalidArgumentException" | "ValidationException" => "invalid request",
        "KMSThrottlingException" | "KMSAccessDeniedException" | "KMSNotFoundException"
        | "KMSDisabledException" | "KMSInvalidStateException" | "KMSOptInRequired" => {
            "stream encryption failure"
        }
        _ => "service error",
    };
    format!("{} ({}): {}", kind, code, message)
}
