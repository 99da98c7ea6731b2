//! 令牌吊销表
//!
//! 注销时记录令牌的 `jti` 直到其过期; 过期条目由后台任务定期清理。

use dashmap::DashMap;

/// 已吊销令牌 (`jti` -> 过期时间戳, 秒)
#[derive(Debug, Default)]
pub struct RevokedTokens {
    entries: DashMap<String, i64>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// 吊销令牌直到 `exp`
    pub fn revoke(&self, jti: impl Into<String>, exp: i64) {
        self.entries.insert(jti.into(), exp);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// 清理在 `now` 之前已过期的条目, 返回清理数量
    pub fn purge_expired(&self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, exp| *exp > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_and_check() {
        let revoked = RevokedTokens::new();
        assert!(!revoked.is_revoked("a"));

        revoked.revoke("a", 100);
        assert!(revoked.is_revoked("a"));
        assert!(!revoked.is_revoked("b"));
    }

    #[test]
    fn test_purge_expired() {
        let revoked = RevokedTokens::new();
        revoked.revoke("old", 10);
        revoked.revoke("fresh", 1_000);

        assert_eq!(revoked.purge_expired(500), 1);
        assert!(!revoked.is_revoked("old"));
        assert!(revoked.is_revoked("fresh"));
        assert_eq!(revoked.len(), 1);
    }
}
