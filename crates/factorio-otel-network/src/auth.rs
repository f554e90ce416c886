//! 서비스 어카운트 토큰.
//!
//! 클러스터 내부에서 Kubernetes API 호출에 쓰는 베어러 토큰을 파일에서 읽는다.
//! 토큰은 주기적으로 교체되므로 요청마다 다시 읽는다.

use factorio_otel_core::error::CoreError;
use std::path::PathBuf;

/// 파일 기반 베어러 토큰 공급자
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 현재 토큰 읽기 (앞뒤 공백 제거)
    pub async fn read(&self) -> Result<String, CoreError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CoreError::Auth(format!(
                "서비스 어카운트 토큰 읽기 실패: {}: {e}",
                self.path.display()
            ))
        })?;

        let token = raw.trim();
        if token.is_empty() {
            return Err(CoreError::Auth(format!(
                "서비스 어카운트 토큰이 비어 있음: {}",
                self.path.display()
            )));
        }
        Ok(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_trimmed_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  eyJhbGciOi.token  ").unwrap();

        let token = TokenFile::new(file.path()).read().await.unwrap();
        assert_eq!(token, "eyJhbGciOi.token");
    }

    #[tokio::test]
    async fn missing_file_is_auth_error() {
        let err = TokenFile::new("/nonexistent/token").read().await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
        assert!(err.to_string().contains("인증"));
    }

    #[tokio::test]
    async fn empty_file_is_auth_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = TokenFile::new(file.path()).read().await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
    }
}
