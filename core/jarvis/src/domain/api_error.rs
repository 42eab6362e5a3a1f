//! リモート API エラーの分類
//!
//! エラーメッセージを小文字化して部分一致で判定する。先に一致したものが優先。

/// API エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Authentication,
    Connectivity,
    Quota,
    Unclassified,
}

impl ApiErrorKind {
    /// 判定順
    const ORDERED: [ApiErrorKind; 3] = [
        ApiErrorKind::Authentication,
        ApiErrorKind::Connectivity,
        ApiErrorKind::Quota,
    ];

    fn triggers(&self) -> &'static [&'static str] {
        match self {
            Self::Authentication => &["api key", "authentication"],
            Self::Connectivity => &["timeout", "connection"],
            Self::Quota => &["quota", "limit"],
            Self::Unclassified => &[],
        }
    }

    /// エラーメッセージから分類を決める
    pub fn classify(error_message: &str) -> Self {
        let lower = error_message.to_lowercase();
        Self::ORDERED
            .into_iter()
            .find(|kind| kind.triggers().iter().any(|t| lower.contains(t)))
            .unwrap_or(Self::Unclassified)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Connectivity => "connectivity",
            Self::Quota => "quota",
            Self::Unclassified => "unclassified",
        }
    }

    /// 利用者に表示するメッセージ。Unclassified のみ元のエラー文を含める
    pub fn user_message(&self, error_message: &str) -> String {
        match self {
            Self::Authentication => {
                "There seems to be an issue with the API key. Please check GEMINI_API_KEY in your environment or .env file.".to_string()
            }
            Self::Connectivity => {
                "Unable to connect to the Gemini API. Please check your internet connection.".to_string()
            }
            Self::Quota => {
                "You've reached your API usage limit. Please try again later.".to_string()
            }
            Self::Unclassified => format!(
                "An error occurred while communicating with the AI service: {}",
                error_message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_category() {
        assert_eq!(
            ApiErrorKind::classify("Gemini API error: API key not valid."),
            ApiErrorKind::Authentication
        );
        assert_eq!(
            ApiErrorKind::classify("Authentication failed"),
            ApiErrorKind::Authentication
        );
        assert_eq!(
            ApiErrorKind::classify("request timeout: operation timed out"),
            ApiErrorKind::Connectivity
        );
        assert_eq!(
            ApiErrorKind::classify("connection failed: Connection refused"),
            ApiErrorKind::Connectivity
        );
        assert_eq!(
            ApiErrorKind::classify("Resource has been exhausted (e.g. check QUOTA)."),
            ApiErrorKind::Quota
        );
        assert_eq!(ApiErrorKind::classify("rate limit exceeded"), ApiErrorKind::Quota);
        assert_eq!(
            ApiErrorKind::classify("Gemini API error: Internal error"),
            ApiErrorKind::Unclassified
        );
    }

    #[test]
    fn test_classify_first_match_wins() {
        // 認証と接続の両方を含む場合は認証が先
        assert_eq!(
            ApiErrorKind::classify("connection reset during authentication"),
            ApiErrorKind::Authentication
        );
        // 接続とクォータでは接続が先
        assert_eq!(
            ApiErrorKind::classify("connection limit reached"),
            ApiErrorKind::Connectivity
        );
    }

    #[test]
    fn test_user_message_includes_raw_only_when_unclassified() {
        let quota = ApiErrorKind::Quota.user_message("quota exceeded for project 123");
        assert!(!quota.contains("123"));
        assert!(quota.contains("usage limit"));

        let other = ApiErrorKind::Unclassified.user_message("HTTP 500: boom");
        assert_eq!(
            other,
            "An error occurred while communicating with the AI service: HTTP 500: boom"
        );
    }
}
