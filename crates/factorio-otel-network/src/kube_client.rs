//! Kubernetes API 클라이언트.
//!
//! `TargetDiscovery` + `LogStreamer` 포트 구현.
//! 라벨 셀렉터로 게임 서버 파드를 찾고, 그 파드의 로그를 follow 모드로 읽는다.

use async_trait::async_trait;
use factorio_otel_core::config::LogTailConfig;
use factorio_otel_core::error::CoreError;
use factorio_otel_core::ports::log_source::{LogLineStream, LogStreamer, TargetDiscovery};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::TokenFile;
use crate::line_stream::split_lines;

/// 파드 목록 응답 (필요한 필드만)
#[derive(Debug, Deserialize)]
struct PodList {
    #[serde(default)]
    items: Vec<Pod>,
}

#[derive(Debug, Deserialize)]
struct Pod {
    metadata: PodMetadata,
}

#[derive(Debug, Deserialize)]
struct PodMetadata {
    name: String,
}

/// Kubernetes API 클라이언트: `TargetDiscovery`, `LogStreamer` 포트 구현
pub struct KubeClient {
    http: reqwest::Client,
    api_base: String,
    namespace: String,
    label_selector: String,
    token: TokenFile,
    request_timeout: Duration,
}

impl KubeClient {
    /// 설정에서 클라이언트 생성
    ///
    /// CA 번들이 있으면 루트 인증서로 신뢰하고, 없으면 인증서 검증을 끈다.
    /// 로그 스트림은 무기한 열려 있어야 하므로 클라이언트 전체 타임아웃은 두지 않는다.
    pub fn new(config: &LogTailConfig) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder();

        match std::fs::read(&config.ca_path) {
            Ok(pem) => {
                let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    CoreError::Config(format!(
                        "CA 인증서 파싱 실패: {}: {e}",
                        config.ca_path.display()
                    ))
                })?;
                builder = builder.add_root_certificate(cert);
            }
            Err(e) => {
                warn!(
                    "CA 인증서 없음 ({}: {e}), TLS 검증 생략",
                    config.ca_path.display()
                );
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let http = builder
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            namespace: config.namespace.clone(),
            label_selector: config.pod_label.clone(),
            token: TokenFile::new(config.token_path.clone()),
            request_timeout: config.request_timeout(),
        })
    }

    /// 응답 상태 코드 확인
    ///
    /// 200이 아니면 상태와 본문을 담은 에러 반환
    async fn check_response(
        resp: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            401 | 403 => Err(CoreError::Auth(format!("{what}: {status} {text}"))),
            _ => Err(CoreError::Network(format!("{what}: {status} {text}"))),
        }
    }
}

#[async_trait]
impl TargetDiscovery for KubeClient {
    async fn find_target(&self) -> Result<String, CoreError> {
        let token = self.token.read().await?;
        let url = format!("{}/api/v1/namespaces/{}/pods", self.api_base, self.namespace);
        debug!("파드 탐색: {url} labelSelector={}", self.label_selector);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("labelSelector", self.label_selector.as_str()), ("limit", "1")])
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("파드 목록 요청 실패: {e}")))?;

        let resp = Self::check_response(resp, "파드 목록 조회").await?;
        let body = resp
            .bytes()
            .await
            .map_err(|e| CoreError::Network(format!("파드 목록 읽기 실패: {e}")))?;
        let pods: PodList = serde_json::from_slice(&body)?;

        pods.items
            .into_iter()
            .next()
            .map(|pod| pod.metadata.name)
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "Pod".to_string(),
                id: format!("{}/{}", self.namespace, self.label_selector),
            })
    }
}

#[async_trait]
impl LogStreamer for KubeClient {
    async fn open_log_stream(&self, target: &str) -> Result<LogLineStream, CoreError> {
        let token = self.token.read().await?;
        let url = format!(
            "{}/api/v1/namespaces/{}/pods/{}/log",
            self.api_base, self.namespace, target
        );

        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("follow", "true"),
                ("tailLines", "0"),
                ("timestamps", "false"),
            ])
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("로그 스트림 요청 실패: {e}")))?;

        let resp = Self::check_response(resp, "로그 스트림 열기").await?;
        Ok(split_lines(resp.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use mockito::Matcher;
    use std::io::Write;

    /// mockito 서버를 가리키는 클라이언트와 토큰 파일 생성
    fn client_for(server: &mockito::ServerGuard) -> (KubeClient, tempfile::NamedTempFile) {
        let mut token = tempfile::NamedTempFile::new().unwrap();
        write!(token, "test-token").unwrap();

        let config = LogTailConfig {
            namespace: "factorio".to_string(),
            pod_label: "app=factorio".to_string(),
            api_base: server.url(),
            token_path: token.path().to_path_buf(),
            ca_path: "/nonexistent/ca.crt".into(),
            ..LogTailConfig::default()
        };
        (KubeClient::new(&config).unwrap(), token)
    }

    fn pod_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("labelSelector".into(), "app=factorio".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
        ])
    }

    #[tokio::test]
    async fn finds_first_pod() {
        let mut server = mockito::Server::new_async().await;
        let (client, _token) = client_for(&server);

        let mock = server
            .mock("GET", "/api/v1/namespaces/factorio/pods")
            .match_query(pod_query())
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"kind":"PodList","items":[{"metadata":{"name":"factorio-0"}},{"metadata":{"name":"factorio-1"}}]}"#,
            )
            .create_async()
            .await;

        let name = client.find_target().await.unwrap();
        assert_eq!(name, "factorio-0");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_pod_list_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let (client, _token) = client_for(&server);

        let mock = server
            .mock("GET", "/api/v1/namespaces/factorio/pods")
            .match_query(pod_query())
            .with_status(200)
            .with_body(r#"{"kind":"PodList","items":[]}"#)
            .create_async()
            .await;

        let err = client.find_target().await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(err.to_string().contains("app=factorio"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_pod_list_is_serialization_error() {
        let mut server = mockito::Server::new_async().await;
        let (client, _token) = client_for(&server);

        let mock = server
            .mock("GET", "/api/v1/namespaces/factorio/pods")
            .match_query(pod_query())
            .with_status(200)
            .with_body(r#"{"kind":"PodList","items":[{"metadata":{}}]}"#)
            .create_async()
            .await;

        let err = client.find_target().await.unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn forbidden_is_auth_error_with_body() {
        let mut server = mockito::Server::new_async().await;
        let (client, _token) = client_for(&server);

        let mock = server
            .mock("GET", "/api/v1/namespaces/factorio/pods")
            .match_query(pod_query())
            .with_status(403)
            .with_body("pods is forbidden")
            .create_async()
            .await;

        let err = client.find_target().await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
        assert!(err.to_string().contains("pods is forbidden"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let (client, _token) = client_for(&server);

        let _mock = server
            .mock("GET", "/api/v1/namespaces/factorio/pods")
            .match_query(pod_query())
            .with_status(500)
            .with_body("etcd unavailable")
            .create_async()
            .await;

        let err = client.find_target().await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }

    #[tokio::test]
    async fn missing_token_fails_before_request() {
        let mut server = mockito::Server::new_async().await;
        let (client, token) = client_for(&server);
        drop(token);

        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = client.find_target().await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn streams_log_lines() {
        let mut server = mockito::Server::new_async().await;
        let (client, _token) = client_for(&server);

        let mock = server
            .mock("GET", "/api/v1/namespaces/factorio/pods/factorio-0/log")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("follow".into(), "true".into()),
                Matcher::UrlEncoded("tailLines".into(), "0".into()),
                Matcher::UrlEncoded("timestamps".into(), "false".into()),
            ]))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body("Bob joined the game\n[CHAT] Bob: hi: there\nRocket launched\n")
            .create_async()
            .await;

        let stream = client.open_log_stream("factorio-0").await.unwrap();
        let lines: Vec<String> = stream.map(|l| l.unwrap()).collect().await;
        assert_eq!(
            lines,
            vec![
                "Bob joined the game",
                "[CHAT] Bob: hi: there",
                "Rocket launched"
            ]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn log_stream_not_found() {
        let mut server = mockito::Server::new_async().await;
        let (client, _token) = client_for(&server);

        let _mock = server
            .mock("GET", "/api/v1/namespaces/factorio/pods/gone/log")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("pods \"gone\" not found")
            .create_async()
            .await;

        let err = client.open_log_stream("gone").await.err().unwrap();
        assert!(matches!(err, CoreError::Network(_)));
        assert!(err.to_string().contains("not found"));
    }
}
