use chrono::Utc;

/// Get current Unix timestamp (seconds)
pub fn get_unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unix_timestamp_is_seconds() {
        // テスト項目: 秒単位の Unix タイムスタンプが返される
        // when (操作):
        let now = get_unix_timestamp();

        // then (期待する結果): 2020-01-01 以降かつミリ秒ではない桁数
        assert!(now > 1_577_836_800);
        assert!(now < 100_000_000_000);
    }
}
