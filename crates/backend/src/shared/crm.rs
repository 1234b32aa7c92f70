use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::shared::config::CrmConfig;

/// Проверка доступности адреса CRM
#[async_trait]
pub trait CrmProbe: Send + Sync {
    async fn is_reachable(&self, url: &str) -> bool;
}

/// HTTP-проверка через reqwest: адрес доступен, если сервер ответил
/// любым статусом ниже 500 за отведённое время
pub struct HttpCrmProbe {
    client: reqwest::Client,
}

impl HttpCrmProbe {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CrmProbe for HttpCrmProbe {
    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!("CRM probe {} -> {}", url, status);
                !status.is_server_error()
            }
            Err(e) => {
                tracing::warn!("CRM probe {} failed: {}", url, e);
                false
            }
        }
    }
}

/// Определение рабочего адреса CRM
///
/// Кандидаты проверяются по порядку, первый доступный запоминается до
/// вызова `invalidate`. Если ни один не ответил, возвращается резервный
/// адрес, и он в кэш не попадает.
pub struct CrmUrlResolver {
    candidates: Vec<String>,
    fallback: String,
    probe: Arc<dyn CrmProbe>,
    cached: RwLock<Option<String>>,
}

impl CrmUrlResolver {
    pub fn new(candidates: Vec<String>, fallback: String, probe: Arc<dyn CrmProbe>) -> Self {
        Self {
            candidates,
            fallback,
            probe,
            cached: RwLock::new(None),
        }
    }

    pub fn from_config(config: &CrmConfig) -> anyhow::Result<Self> {
        let probe = HttpCrmProbe::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(
            config.candidates.clone(),
            config.fallback.clone(),
            Arc::new(probe),
        ))
    }

    pub async fn resolve(&self) -> String {
        if let Some(url) = self.cached.read().await.as_ref() {
            return url.clone();
        }

        for candidate in &self.candidates {
            if self.probe.is_reachable(candidate).await {
                tracing::info!("CRM base URL resolved: {}", candidate);
                *self.cached.write().await = Some(candidate.clone());
                return candidate.clone();
            }
        }

        tracing::warn!(
            "No CRM candidate reachable, using fallback {}",
            self.fallback
        );
        self.fallback.clone()
    }

    pub async fn cached(&self) -> Option<String> {
        self.cached.read().await.clone()
    }

    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
        tracing::info!("CRM base URL cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct FakeProbe {
        up: Mutex<HashSet<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeProbe {
        fn new(up: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                up: Mutex::new(up.iter().map(|s| s.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn set_up(&self, up: &[&str]) {
            *self.up.lock().unwrap() = up.iter().map(|s| s.to_string()).collect();
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CrmProbe for FakeProbe {
        async fn is_reachable(&self, url: &str) -> bool {
            self.calls.lock().unwrap().push(url.to_string());
            self.up.lock().unwrap().contains(url)
        }
    }

    fn resolver(probe: Arc<FakeProbe>) -> CrmUrlResolver {
        CrmUrlResolver::new(
            vec!["http://a".into(), "http://b".into()],
            "http://fallback".into(),
            probe,
        )
    }

    #[tokio::test]
    async fn test_first_reachable_is_cached() {
        let probe = FakeProbe::new(&["http://b"]);
        let r = resolver(probe.clone());

        assert_eq!(r.resolve().await, "http://b");
        assert_eq!(probe.calls(), vec!["http://a", "http://b"]);

        assert_eq!(r.resolve().await, "http://b");
        assert_eq!(probe.calls().len(), 2);
        assert_eq!(r.cached().await.as_deref(), Some("http://b"));
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let probe = FakeProbe::new(&[]);
        let r = resolver(probe.clone());

        assert_eq!(r.resolve().await, "http://fallback");
        assert!(r.cached().await.is_none());

        probe.set_up(&["http://a"]);
        assert_eq!(r.resolve().await, "http://a");
        assert_eq!(probe.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_probe() {
        let probe = FakeProbe::new(&["http://a", "http://b"]);
        let r = resolver(probe.clone());
        assert_eq!(r.resolve().await, "http://a");

        probe.set_up(&["http://b"]);
        assert_eq!(r.resolve().await, "http://a");

        r.invalidate().await;
        assert_eq!(r.resolve().await, "http://b");
    }
}
