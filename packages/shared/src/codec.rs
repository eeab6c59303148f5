//! Fixed-layout encoder and decoder for `Message` records.
//!
//! Each field is copied byte-for-byte to a fixed offset. Strings are
//! NUL-padded to their field width; the timestamp is stored in host byte
//! order, matching the existing wire format.

use crate::{
    error::CodecError,
    protocol::{
        CONTENT_SIZE, MAX_CONTENT_LEN, MAX_SENDER_NAME_LEN, Message, RECORD_SIZE,
        SENDER_NAME_SIZE, TIMESTAMP_SIZE, bounded,
    },
};

const CONTENT_OFFSET: usize = SENDER_NAME_SIZE;
const TIMESTAMP_OFFSET: usize = SENDER_NAME_SIZE + CONTENT_SIZE;

/// Encode `msg` into the first `RECORD_SIZE` bytes of `buffer`.
///
/// # Errors
///
/// Returns `CodecError::BufferTooSmall` if `buffer` is shorter than a record.
pub fn encode(msg: &Message, buffer: &mut [u8]) -> Result<(), CodecError> {
    let actual = buffer.len();
    let record = buffer
        .first_chunk_mut::<RECORD_SIZE>()
        .ok_or(CodecError::BufferTooSmall {
            required: RECORD_SIZE,
            actual,
        })?;
    write_record(msg, record);

    Ok(())
}

fn write_record(msg: &Message, buffer: &mut [u8; RECORD_SIZE]) {
    write_str_field(
        &mut buffer[..CONTENT_OFFSET],
        &msg.sender_name,
        MAX_SENDER_NAME_LEN,
    );
    write_str_field(
        &mut buffer[CONTENT_OFFSET..TIMESTAMP_OFFSET],
        &msg.content,
        MAX_CONTENT_LEN,
    );
    buffer[TIMESTAMP_OFFSET..].copy_from_slice(&msg.timestamp.to_ne_bytes());
}

/// Decode a message from the first `RECORD_SIZE` bytes of `buffer`.
///
/// String fields end at the first NUL byte (or one byte before the end of the
/// field when no NUL is present). Invalid UTF-8 is replaced lossily and the
/// result is cut back to the field's visible width, so a decoded message
/// never exceeds the bounds of a constructed one. Relays that must forward
/// the exact bytes should forward the record, not the decoded message.
///
/// # Errors
///
/// Returns `CodecError::BufferTooSmall` if `buffer` is shorter than a record.
pub fn decode(buffer: &[u8]) -> Result<Message, CodecError> {
    ensure_capacity(buffer.len())?;

    let sender_name = read_str_field(&buffer[..CONTENT_OFFSET]);
    let content = read_str_field(&buffer[CONTENT_OFFSET..TIMESTAMP_OFFSET]);

    let mut timestamp = [0u8; TIMESTAMP_SIZE];
    timestamp.copy_from_slice(&buffer[TIMESTAMP_OFFSET..RECORD_SIZE]);

    Ok(Message {
        sender_name,
        content,
        timestamp: i64::from_ne_bytes(timestamp),
    })
}

impl Message {
    /// Encode this message into a freshly allocated record
    pub fn to_record(&self) -> [u8; RECORD_SIZE] {
        let mut record = [0u8; RECORD_SIZE];
        write_record(self, &mut record);
        record
    }
}

fn ensure_capacity(actual: usize) -> Result<(), CodecError> {
    if actual < RECORD_SIZE {
        return Err(CodecError::BufferTooSmall {
            required: RECORD_SIZE,
            actual,
        });
    }
    Ok(())
}

fn write_str_field(field: &mut [u8], value: &str, max_len: usize) {
    let bytes = bounded(value, max_len).as_bytes();
    field[..bytes.len()].copy_from_slice(bytes);
    field[bytes.len()..].fill(0);
}

fn read_str_field(field: &[u8]) -> String {
    // The last byte of a field is reserved for the terminator.
    let visible = &field[..field.len() - 1];
    let end = visible
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(visible.len());
    let text = String::from_utf8_lossy(&visible[..end]);
    bounded(&text, visible.len()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_decode_round_trip() {
        // テスト項目: エンコードしたメッセージをデコードすると元に戻る
        // given (前提条件):
        let message = Message::new("Alice", "hi", 1000);
        let mut buffer = [0u8; RECORD_SIZE];

        // when (操作):
        encode(&message, &mut buffer).unwrap();
        let decoded = decode(&buffer).unwrap();

        // then (期待する結果):
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_round_trip_with_maximum_lengths_and_extreme_timestamps() {
        // テスト項目: 最大長のフィールドと極端なタイムスタンプでも往復できる
        // given (前提条件):
        let name = "n".repeat(MAX_SENDER_NAME_LEN);
        let content = "c".repeat(MAX_CONTENT_LEN);

        for timestamp in [i64::MIN, -1, 0, i64::MAX] {
            let message = Message::new(&name, &content, timestamp);

            // when (操作):
            let decoded = decode(&message.to_record()).unwrap();

            // then (期待する結果):
            assert_eq!(decoded, message);
        }
    }

    #[test]
    fn test_round_trip_with_multibyte_fields_at_the_limit() {
        // テスト項目: マルチバイト文字を含むフィールドも最大長ちょうどで往復できる
        // given (前提条件):
        // 10 × 3 bytes + 1 byte = 31 bytes
        let name = format!("{}x", "あ".repeat(10));
        // 2 + 3 + 4 bytes per cycle, 28 cycles = 252 bytes, plus "abc"
        let content = format!("{}abc", "éあ😀".repeat(28));
        let message = Message::new(&name, &content, 1_700_000_000);

        // when (操作):
        let decoded = decode(&message.to_record()).unwrap();

        // then (期待する結果):
        assert_eq!(message.sender_name.len(), MAX_SENDER_NAME_LEN);
        assert_eq!(message.content.len(), MAX_CONTENT_LEN);
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_decode_invalid_utf8_stays_within_field_bounds() {
        // テスト項目: 不正な UTF-8 を含むレコードをデコードしてもフィールドの上限を超えない
        // given (前提条件):
        let mut buffer = [0u8; RECORD_SIZE];
        buffer[..5].copy_from_slice(b"Ren\xE9e");
        buffer[CONTENT_OFFSET..CONTENT_OFFSET + 200].fill(0xFF);

        // when (操作):
        let decoded = decode(&buffer).unwrap();

        // then (期待する結果):
        assert_eq!(decoded.sender_name, "Ren\u{FFFD}e");
        assert!(decoded.content.len() <= MAX_CONTENT_LEN);
        assert!(decoded.content.chars().all(|c| c == '\u{FFFD}'));
        let reencoded = decode(&decoded.to_record()).unwrap();
        assert_eq!(reencoded, decoded);
    }

    #[test]
    fn test_round_trip_with_empty_fields() {
        // テスト項目: 空文字列のフィールドも往復できる
        // given (前提条件):
        let message = Message::new("", "", 42);

        // when (操作):
        let decoded = decode(&message.to_record()).unwrap();

        // then (期待する結果):
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_fields_are_at_fixed_offsets() {
        // テスト項目: 各フィールドが固定オフセットに NUL パディングで書き込まれる
        // given (前提条件):
        let message = Message::new("bob", "hello", 7);

        // when (操作):
        let record = message.to_record();

        // then (期待する結果):
        assert_eq!(&record[..3], b"bob");
        assert!(record[3..SENDER_NAME_SIZE].iter().all(|&b| b == 0));
        assert_eq!(&record[CONTENT_OFFSET..CONTENT_OFFSET + 5], b"hello");
        assert!(record[CONTENT_OFFSET + 5..TIMESTAMP_OFFSET].iter().all(|&b| b == 0));
        assert_eq!(&record[TIMESTAMP_OFFSET..], &7i64.to_ne_bytes());
    }

    #[test]
    fn test_encode_overwrites_previous_content() {
        // テスト項目: 再利用したバッファに前回の内容が残らない
        // given (前提条件):
        let mut buffer = Message::new("someone-long", "a longer message", 1).to_record();

        // when (操作):
        encode(&Message::new("al", "hi", 2), &mut buffer).unwrap();
        let decoded = decode(&buffer).unwrap();

        // then (期待する結果):
        assert_eq!(decoded, Message::new("al", "hi", 2));
    }

    #[test]
    fn test_encode_fails_on_small_buffer() {
        // テスト項目: レコードサイズ未満のバッファへのエンコードは BufferTooSmall になる
        // given (前提条件):
        let message = Message::new("alice", "hi", 0);
        let mut buffer = [0u8; RECORD_SIZE - 1];

        // when (操作):
        let result = encode(&message, &mut buffer);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(CodecError::BufferTooSmall {
                required: RECORD_SIZE,
                actual: RECORD_SIZE - 1
            })
        );
    }

    #[test]
    fn test_decode_fails_on_small_buffer() {
        // テスト項目: レコードサイズ未満のバッファからのデコードは BufferTooSmall になる
        // given (前提条件):
        let buffer = [0u8; 10];

        // when (操作):
        let result = decode(&buffer);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(CodecError::BufferTooSmall { actual: 10, .. })
        ));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        // テスト項目: レコードより大きいバッファは先頭のレコードだけが読まれる
        // given (前提条件):
        let message = Message::new("carol", "hey", 5);
        let mut buffer = vec![0xAA; RECORD_SIZE + 16];
        encode(&message, &mut buffer).unwrap();

        // when (操作):
        let decoded = decode(&buffer).unwrap();

        // then (期待する結果):
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_decode_unterminated_field_is_bounded() {
        // テスト項目: NUL 終端のないフィールドも最大長までで打ち切られる
        // given (前提条件):
        let mut buffer = [b'x'; RECORD_SIZE];
        buffer[TIMESTAMP_OFFSET..].copy_from_slice(&0i64.to_ne_bytes());

        // when (操作):
        let decoded = decode(&buffer).unwrap();

        // then (期待する結果):
        assert_eq!(decoded.sender_name.len(), MAX_SENDER_NAME_LEN);
        assert_eq!(decoded.content.len(), MAX_CONTENT_LEN);
    }

    proptest! {
        /// Any constructed message survives an encode/decode round trip
        #[test]
        fn round_trip_holds_for_valid_messages(
            name in "\\PC{0,40}",
            content in "\\PC{0,300}",
            timestamp in any::<i64>(),
        ) {
            let message = Message::new(&name, &content, timestamp);

            let decoded = decode(&message.to_record()).unwrap();

            prop_assert!(message.sender_name.len() <= MAX_SENDER_NAME_LEN);
            prop_assert!(message.content.len() <= MAX_CONTENT_LEN);
            prop_assert_eq!(decoded, message);
        }
    }
}
