//! Common types used across the client

use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Korean,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
        }
    }
}

/// Severity of a notice shown to the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// Non-error events the registration and login flows report to the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    UsernameAvailable,
    UsernameTaken,
    CodeSent,
    CodeResent,
    EmptySearchQuery,
    NoSearchResults,
    SignupComplete,
    LoginComplete,
}

impl NoticeKind {
    pub fn level(&self) -> NoticeLevel {
        match self {
            NoticeKind::UsernameAvailable
            | NoticeKind::CodeSent
            | NoticeKind::CodeResent
            | NoticeKind::SignupComplete
            | NoticeKind::LoginComplete => NoticeLevel::Success,
            NoticeKind::NoSearchResults => NoticeLevel::Info,
            NoticeKind::UsernameTaken | NoticeKind::EmptySearchQuery => NoticeLevel::Warning,
        }
    }

    pub fn title(&self, language: Language) -> &'static str {
        match (self, language) {
            (NoticeKind::UsernameAvailable, Language::Korean) => "아이디 확인",
            (NoticeKind::UsernameAvailable, Language::English) => "Username check",
            (NoticeKind::UsernameTaken, Language::Korean) => "아이디 중복",
            (NoticeKind::UsernameTaken, Language::English) => "Username taken",
            (NoticeKind::CodeSent, Language::Korean) => "인증 코드 발송",
            (NoticeKind::CodeSent, Language::English) => "Verification code sent",
            (NoticeKind::CodeResent, Language::Korean) => "인증 코드 재발송",
            (NoticeKind::CodeResent, Language::English) => "Verification code resent",
            (NoticeKind::EmptySearchQuery, Language::Korean) => "입력 오류",
            (NoticeKind::EmptySearchQuery, Language::English) => "Input error",
            (NoticeKind::NoSearchResults, Language::Korean) => "검색 결과",
            (NoticeKind::NoSearchResults, Language::English) => "Search results",
            (NoticeKind::SignupComplete, Language::Korean) => "회원가입 완료",
            (NoticeKind::SignupComplete, Language::English) => "Sign-up complete",
            (NoticeKind::LoginComplete, Language::Korean) => "로그인 성공",
            (NoticeKind::LoginComplete, Language::English) => "Signed in",
        }
    }

    pub fn message(&self, language: Language) -> &'static str {
        match (self, language) {
            (NoticeKind::UsernameAvailable, Language::Korean) => "사용 가능한 아이디입니다.",
            (NoticeKind::UsernameAvailable, Language::English) => "This username is available.",
            (NoticeKind::UsernameTaken, Language::Korean) => "이미 사용 중인 아이디입니다.",
            (NoticeKind::UsernameTaken, Language::English) => "This username is already in use.",
            (NoticeKind::CodeSent, Language::Korean) => {
                "인증 코드가 발송되었습니다. 이메일을 확인해주세요."
            }
            (NoticeKind::CodeSent, Language::English) => {
                "A verification code was sent. Please check your email."
            }
            (NoticeKind::CodeResent, Language::Korean) => "인증 코드가 재발송되었습니다.",
            (NoticeKind::CodeResent, Language::English) => "The verification code was sent again.",
            (NoticeKind::EmptySearchQuery, Language::Korean) => "검색어를 입력해주세요.",
            (NoticeKind::EmptySearchQuery, Language::English) => "Please enter a search term.",
            (NoticeKind::NoSearchResults, Language::Korean) => "검색 결과가 없습니다.",
            (NoticeKind::NoSearchResults, Language::English) => "No restaurants matched.",
            (NoticeKind::SignupComplete, Language::Korean) => "회원가입이 완료되었습니다!",
            (NoticeKind::SignupComplete, Language::English) => "Your account has been created!",
            (NoticeKind::LoginComplete, Language::Korean) => "로그인되었습니다!",
            (NoticeKind::LoginComplete, Language::English) => "You are signed in!",
        }
    }
}

/// A notice queued for the rendering layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            kind,
            level: kind.level(),
        }
    }

    pub fn title(&self, language: Language) -> &'static str {
        self.kind.title(language)
    }

    pub fn message(&self, language: Language) -> &'static str {
        self.kind.message(language)
    }
}
