//! 바이트 스트림 → 줄 스트림 변환.
//!
//! follow 모드 로그 응답 본문을 `tokio_util` 코덱으로 줄 단위로 자른다.
//! `\n`으로 나누고 끝의 `\r`은 제거하며, 잘못된 UTF-8은 대체 문자로 바꾼다.

use bytes::{Buf, Bytes};
use factorio_otel_core::error::CoreError;
use factorio_otel_core::ports::log_source::LogLineStream;
use futures::stream::{Stream, StreamExt};
use std::fmt::Display;
use std::io;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead};
use tokio_util::io::StreamReader;

/// 한 줄의 최대 길이 (구분자 제외)
pub const MAX_LINE_BYTES: usize = 64 * 1024;

fn line_codec() -> AnyDelimiterCodec {
    AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), b"\n".to_vec(), MAX_LINE_BYTES)
}

fn into_line(frame: Bytes) -> String {
    let bytes = frame.strip_suffix(b"\r").unwrap_or(&frame[..]);
    String::from_utf8_lossy(bytes).into_owned()
}

fn into_core_error(err: AnyDelimiterCodecError) -> CoreError {
    match err {
        AnyDelimiterCodecError::MaxChunkLengthExceeded => {
            CoreError::Protocol(format!("로그 라인이 너무 김 (>{MAX_LINE_BYTES} bytes)"))
        }
        AnyDelimiterCodecError::Io(e) => {
            CoreError::Network(format!("로그 스트림 읽기 실패: {e}"))
        }
    }
}

/// 청크 스트림을 줄 스트림으로 변환
///
/// 스트림이 끝날 때 개행 없이 남은 마지막 줄도 내보낸다.
/// 읽기 에러나 길이 초과 후에는 스트림이 끝난다.
pub fn split_lines<S, B, E>(chunks: S) -> LogLineStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: Buf + Send + 'static,
    E: Display + Send + 'static,
{
    let chunks = Box::pin(chunks.map(|chunk| chunk.map_err(|e| io::Error::other(e.to_string()))));
    let frames = FramedRead::new(StreamReader::new(chunks), line_codec());

    // 첫 에러를 내보낸 뒤 종료
    Box::pin(frames.scan(false, |errored, frame| {
        let item = if *errored {
            None
        } else {
            let line = frame.map(into_line).map_err(into_core_error);
            *errored = line.is_err();
            Some(line)
        };
        futures::future::ready(item)
    }))
}
