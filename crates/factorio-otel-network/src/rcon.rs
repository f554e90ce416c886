//! RCON 원격 콘솔 클라이언트.
//!
//! `ConsoleConnector`/`ConsoleSession` 포트 구현. Source RCON 프로토콜 over TCP.
//!
//! 패킷 형식 (little-endian):
//! `size(i32) | id(i32) | type(i32) | body | 0x00 0x00`, `size`는 id부터 끝까지의 길이.

use async_trait::async_trait;
use factorio_otel_core::config::RconConfig;
use factorio_otel_core::error::CoreError;
use factorio_otel_core::ports::console::{ConsoleConnector, ConsoleSession};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// 인증 요청
pub const PACKET_AUTH: i32 = 3;
/// 인증 응답 (명령 실행 요청과 같은 값)
pub const PACKET_AUTH_RESPONSE: i32 = 2;
/// 명령 실행 요청
pub const PACKET_EXEC_COMMAND: i32 = 2;
/// 명령 응답
pub const PACKET_RESPONSE_VALUE: i32 = 0;

/// id + type
const HEADER_LEN: usize = 8;
/// body 뒤의 NUL 2바이트
const PADDING_LEN: usize = 2;
/// 허용하는 최대 패킷 크기
pub const MAX_PACKET_SIZE: usize = 4 * 1024 * 1024;

/// 인증 실패 시 서버가 돌려주는 id
const AUTH_FAILED_ID: i32 = -1;

/// RCON 패킷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub kind: i32,
    pub body: Vec<u8>,
}

impl Packet {
    pub fn new(id: i32, kind: i32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// 와이어 포맷으로 인코딩
    pub fn encode(&self) -> Vec<u8> {
        let size = HEADER_LEN + self.body.len() + PADDING_LEN;
        let mut buf = Vec::with_capacity(4 + size);
        buf.extend_from_slice(&(size as i32).to_le_bytes());
        buf.extend_from_slice(&self.id.to_le_bytes());
        buf.extend_from_slice(&self.kind.to_le_bytes());
        buf.extend_from_slice(&self.body);
        buf.extend_from_slice(&[0, 0]);
        buf
    }

    /// 본문을 문자열로 (잘못된 UTF-8은 대체 문자로)
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// 패킷 하나 읽기
pub async fn read_packet<R>(reader: &mut R) -> Result<Packet, CoreError>
where
    R: AsyncRead + Unpin,
{
    let size = reader.read_i32_le().await?;
    if size < (HEADER_LEN + PADDING_LEN) as i32 || size as usize > MAX_PACKET_SIZE {
        return Err(CoreError::Protocol(format!("잘못된 패킷 크기: {size}")));
    }

    let mut buf = vec![0u8; size as usize];
    reader.read_exact(&mut buf).await?;

    let id = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let kind = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let body = buf[HEADER_LEN..buf.len() - PADDING_LEN].to_vec();

    Ok(Packet { id, kind, body })
}

/// 패킷 하나 쓰기
pub async fn write_packet<W>(writer: &mut W, packet: &Packet) -> Result<(), CoreError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&packet.encode()).await?;
    writer.flush().await?;
    Ok(())
}

/// 인증된 RCON 세션: `ConsoleSession` 포트 구현
///
/// TCP 연결 하나를 소유하며 drop 시 연결이 닫힌다.
pub struct RconSession<S = TcpStream> {
    stream: S,
    next_id: i32,
    io_timeout: Duration,
}

impl RconSession<TcpStream> {
    /// TCP 연결 후 인증
    pub async fn connect(
        address: &str,
        password: &str,
        dial_timeout: Duration,
        io_timeout: Duration,
    ) -> Result<Self, CoreError> {
        let stream = timeout(dial_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| CoreError::Network(format!("RCON 연결 타임아웃: {address}")))?
            .map_err(|e| CoreError::Network(format!("RCON 연결 실패: {address}: {e}")))?;

        let mut session = Self::new(stream, io_timeout);
        session.authenticate(password).await?;
        debug!("RCON 인증 완료: {address}");
        Ok(session)
    }
}

impl<S> RconSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// 이미 열린 스트림으로 세션 생성 (인증 전)
    pub fn new(stream: S, io_timeout: Duration) -> Self {
        Self {
            stream,
            next_id: 1,
            io_timeout,
        }
    }

    fn next_request_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        id
    }

    /// 비밀번호 인증
    ///
    /// 서버는 인증 응답 전에 빈 응답 패킷을 먼저 보낼 수 있다.
    pub async fn authenticate(&mut self, password: &str) -> Result<(), CoreError> {
        let id = self.next_request_id();
        let io_timeout = self.io_timeout;
        let stream = &mut self.stream;

        let round_trip = async move {
            write_packet(stream, &Packet::new(id, PACKET_AUTH, password)).await?;
            loop {
                let packet = read_packet(stream).await?;
                match packet.kind {
                    PACKET_RESPONSE_VALUE => continue,
                    PACKET_AUTH_RESPONSE if packet.id == AUTH_FAILED_ID => {
                        return Err(CoreError::Auth("RCON 비밀번호 거부".to_string()));
                    }
                    PACKET_AUTH_RESPONSE if packet.id == id => return Ok(()),
                    kind => {
                        return Err(CoreError::Protocol(format!(
                            "예상치 못한 인증 응답: id={}, type={kind}",
                            packet.id
                        )));
                    }
                }
            }
        };

        timeout(io_timeout, round_trip)
            .await
            .map_err(|_| CoreError::Network("RCON 인증 응답 타임아웃".to_string()))?
    }

    /// 명령 실행 후 응답 본문 반환
    pub async fn exec(&mut self, command: &str) -> Result<String, CoreError> {
        let id = self.next_request_id();
        let io_timeout = self.io_timeout;
        let stream = &mut self.stream;

        let round_trip = async move {
            write_packet(stream, &Packet::new(id, PACKET_EXEC_COMMAND, command)).await?;
            loop {
                let packet = read_packet(stream).await?;
                if packet.kind == PACKET_RESPONSE_VALUE && packet.id == id {
                    return Ok(packet.body_text());
                }
                debug!(
                    "RCON 패킷 무시: id={}, type={} (대기 id={id})",
                    packet.id, packet.kind
                );
            }
        };

        timeout(io_timeout, round_trip)
            .await
            .map_err(|_| CoreError::Network("RCON 명령 응답 타임아웃".to_string()))?
    }
}

#[async_trait]
impl<S> ConsoleSession for RconSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn execute(&mut self, command: &str) -> Result<String, CoreError> {
        self.exec(command).await
    }
}

/// RCON 연결 팩토리: `ConsoleConnector` 포트 구현
pub struct RconConnector {
    address: String,
    password: String,
    dial_timeout: Duration,
    io_timeout: Duration,
}

impl RconConnector {
    /// 새 커넥터 생성
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Self {
        let defaults = RconConfig::default();
        Self {
            address: address.into(),
            password: password.into(),
            dial_timeout: defaults.dial_timeout(),
            io_timeout: defaults.io_timeout(),
        }
    }

    /// 설정에서 생성
    pub fn from_config(config: &RconConfig) -> Self {
        Self::new(config.address(), config.password.clone())
            .with_timeouts(config.dial_timeout(), config.io_timeout())
    }

    /// 타임아웃 설정
    pub fn with_timeouts(mut self, dial_timeout: Duration, io_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self.io_timeout = io_timeout;
        self
    }
}

#[async_trait]
impl ConsoleConnector for RconConnector {
    async fn connect(&self) -> Result<Box<dyn ConsoleSession>, CoreError> {
        let session = RconSession::connect(
            &self.address,
            &self.password,
            self.dial_timeout,
            self.io_timeout,
        )
        .await?;
        Ok(Box::new(session))
    }
}
