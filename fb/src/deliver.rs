//! Delivery seam between the bridge and the wire client.
//!
//! The dispatcher and the bulk importer deliver points through [`PointSink`]
//! rather than the HTTP client directly, so delivery can be observed in
//! tests and the configuration-presence policy stays at this layer: the wire
//! client always receives a complete target.

use async_trait::async_trait;
use lineproto::{DataPoint, WriteClient, WriteError, WriteTarget};

use crate::config::BridgeConfig;
use crate::enrich::now_ms;
use crate::error::BridgeError;

/// Destination for enriched points.
#[async_trait]
pub trait PointSink: Send + Sync {
    /// Deliver one batch. Points that cannot be encoded are dropped by the
    /// wire layer; an empty surviving batch is a successful no-op.
    async fn deliver(&self, target: &WriteTarget, points: &[DataPoint]) -> Result<(), WriteError>;
}

/// Sink backed by the HTTP write client.
#[derive(Clone, Default)]
pub struct HttpSink {
    client: WriteClient,
}

impl HttpSink {
    pub fn new() -> Self {
        Self { client: WriteClient::new() }
    }
}

#[async_trait]
impl PointSink for HttpSink {
    async fn deliver(&self, target: &WriteTarget, points: &[DataPoint]) -> Result<(), WriteError> {
        self.client.write(target, points).await.map(|_| ())
    }
}

/// Write target for a config, present only when both fields are set.
pub fn write_target(config: &BridgeConfig) -> Option<WriteTarget> {
    config
        .is_connectable()
        .then(|| WriteTarget::new(&config.endpoint_url, &config.auth_token))
}

/// The synthetic point used to validate connectivity. Not real task data.
pub fn heartbeat_point(measurement: &str, now_ms: i64) -> DataPoint {
    DataPoint::new(measurement, now_ms)
        .tag("service", "bridge")
        .tag("type", "heartbeat")
        .field("status", 1.0)
}

/// Send a heartbeat with the given configuration.
///
/// Missing connection fields fail with [`BridgeError::NotConfigured`] before
/// any network activity.
pub async fn check_connection(sink: &dyn PointSink, config: &BridgeConfig) -> Result<(), BridgeError> {
    let Some(target) = write_target(config) else {
        return Err(BridgeError::NotConfigured);
    };
    let point = heartbeat_point(config.measurement(), now_ms());
    sink.deliver(&target, &[point]).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that fails the test if delivery is attempted.
    struct UnreachableSink;

    #[async_trait]
    impl PointSink for UnreachableSink {
        async fn deliver(&self, _target: &WriteTarget, _points: &[DataPoint]) -> Result<(), WriteError> {
            panic!("no delivery expected");
        }
    }

    /// Sink that records the delivered batch.
    struct RecordingSink(std::sync::Mutex<Vec<Vec<DataPoint>>>);

    #[async_trait]
    impl PointSink for RecordingSink {
        async fn deliver(&self, _target: &WriteTarget, points: &[DataPoint]) -> Result<(), WriteError> {
            self.0.lock().unwrap().push(points.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_write_target_requires_both_fields() {
        let mut config = BridgeConfig::default();
        assert!(write_target(&config).is_none());

        config.endpoint_url = "https://db.example/write".to_string();
        assert!(write_target(&config).is_none());

        config.auth_token = "tok".to_string();
        let target = write_target(&config).unwrap();
        assert_eq!(target.url, "https://db.example/write");
        assert_eq!(target.token, "tok");
    }

    #[tokio::test]
    async fn test_check_connection_unconfigured_never_touches_sink() {
        let result = check_connection(&UnreachableSink, &BridgeConfig::default()).await;
        assert!(matches!(result, Err(BridgeError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_check_connection_sends_one_heartbeat() {
        let sink = RecordingSink(std::sync::Mutex::new(Vec::new()));
        let config = BridgeConfig {
            endpoint_url: "https://db.example/write".to_string(),
            auth_token: "tok".to_string(),
            measurement: "tasks".to_string(),
        };

        check_connection(&sink, &config).await.unwrap();

        let batches = sink.0.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let point = &batches[0][0];
        assert_eq!(point.measurement, "tasks");
        let tags: Vec<_> = point.tags().iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(tags, vec![("service", "bridge"), ("type", "heartbeat")]);
        assert_eq!(point.fields().len(), 1);
    }
}
