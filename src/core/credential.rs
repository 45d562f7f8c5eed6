//! Simulated bearer credentials.
//!
//! In mock mode the roles lookup is steered by the credential itself: a token
//! of the form `Bearer <MOCK_BEARER_TOKEN><ddd>` asks the simulator to answer
//! with HTTP status `ddd`. Test suites use this to request any authorization
//! outcome without configuring the mock.

use regex::Regex;
use std::sync::LazyLock;

pub const MOCK_BEARER_TOKEN: &str = "mock_bearer_token_";

static BEARER_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^Bearer {}(?P<response_code>\d{{3}})$",
        regex::escape(MOCK_BEARER_TOKEN)
    ))
    .expect("bearer token pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch {
    pub matched: bool,
    /// Embedded status when `matched`, otherwise 403.
    pub status: u16,
}

/// Parse an `Authorization` header value against the simulated token pattern.
pub fn parse_simulated_credential(authorization: Option<&str>) -> TokenMatch {
    let status = authorization
        .and_then(|header| BEARER_TOKEN_PATTERN.captures(header))
        .and_then(|caps| caps.name("response_code"))
        .and_then(|code| code.as_str().parse::<u16>().ok());

    match status {
        Some(status) => TokenMatch {
            matched: true,
            status,
        },
        None => TokenMatch {
            matched: false,
            status: 403,
        },
    }
}

/// Access token the mock token service hands out for a given password.
pub fn mock_access_token(password: &str) -> String {
    format!("{}{}", MOCK_BEARER_TOKEN, password)
}
