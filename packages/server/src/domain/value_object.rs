//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum message length in characters, shared with the REST message API.
pub const MAX_MESSAGE_TEXT_CHARS: usize = 1000;

/// User identifier value object.
///
/// Issued by the auth service; always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::UserIdNotPositive` for zero or negative ids
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::UserIdNotPositive(id));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ChatId(i64);

impl ChatId {
    /// Create a new ChatId.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::ChatIdNotPositive` for zero or negative ids
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::ChatIdNotPositive(id));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ChatId {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChatId> for i64 {
    fn from(id: ChatId) -> Self {
        id.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message text value object.
///
/// Represents the body of a chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText.
    ///
    /// Whitespace-only text counts as empty. Length is measured in characters,
    /// not bytes.
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        if text.trim().is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        let len = text.chars().count();
        if len > MAX_MESSAGE_TEXT_CHARS {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MAX_MESSAGE_TEXT_CHARS,
                actual: len,
            });
        }
        Ok(Self(text))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of one live WebSocket connection.
///
/// A user may hold several connections at once, so the Hub keys its
/// registry by this id rather than by `UserId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_new_success() {
        // テスト項目: 正の整数からユーザー ID を作成できる
        // when (操作):
        let result = UserId::new(42);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().value(), 42);
    }

    #[test]
    fn test_user_id_new_non_positive_fails() {
        // テスト項目: 0 以下のユーザー ID は作成できない
        // then (期待する結果):
        assert_eq!(UserId::new(0), Err(ValueObjectError::UserIdNotPositive(0)));
        assert_eq!(
            UserId::new(-1),
            Err(ValueObjectError::UserIdNotPositive(-1))
        );
    }

    #[test]
    fn test_chat_id_deserialize_rejects_zero() {
        // テスト項目: JSON の chat_id が 0 の場合はデシリアライズに失敗する
        // given (前提条件):
        let json = "0";

        // when (操作):
        let result = serde_json::from_str::<ChatId>(json);

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(serde_json::from_str::<ChatId>("10").unwrap().value(), 10);
    }

    #[test]
    fn test_message_text_new_success() {
        // テスト項目: 有効なメッセージ本文を作成できる
        // when (操作):
        let result = MessageText::new("hello".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "hello");
    }

    #[test]
    fn test_message_text_whitespace_only_fails() {
        // テスト項目: 空白のみのメッセージ本文は作成できない
        // when (操作):
        let result = MessageText::new("  \n\t ".to_string());

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::MessageTextEmpty));
    }

    #[test]
    fn test_message_text_too_long_counts_characters() {
        // テスト項目: 文字数 (バイト数ではない) で上限を判定する
        // given (前提条件): マルチバイト文字 1000 文字はちょうど上限
        let at_limit = "я".repeat(MAX_MESSAGE_TEXT_CHARS);
        let over_limit = "я".repeat(MAX_MESSAGE_TEXT_CHARS + 1);

        // then (期待する結果):
        assert!(MessageText::new(at_limit).is_ok());
        assert_eq!(
            MessageText::new(over_limit),
            Err(ValueObjectError::MessageTextTooLong {
                max: MAX_MESSAGE_TEXT_CHARS,
                actual: MAX_MESSAGE_TEXT_CHARS + 1
            })
        );
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        assert!(ts1 < ts2);
    }
}
