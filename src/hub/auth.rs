// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Hub One login form handling

use std::sync::LazyLock;

use md5::compute as md5_compute;
use regex::Regex;

use crate::error::AuthError;

/// `active_page` value the login form posts to
const LOGIN_ACTIVE_PAGE: &str = "9148";

const LOGIN_BUTTON: &str = "submit_button_login_submit: ..";

const TOO_MANY_SESSIONS: &str =
    "No more than 100 sessions at a time are allowed. Please wait until open sessions expire.";

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("valid input pattern"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([a-z_][a-z0-9_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute pattern")
});

/// Hidden fields of the login form needed to build a login request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoginForm {
    pub(crate) auth_key: String,
    pub(crate) post_token: String,
}

impl LoginForm {
    /// Extracts the login form from a page served to an unauthenticated client
    pub(crate) fn parse(page: &str) -> Result<Self, AuthError> {
        if page.contains(TOO_MANY_SESSIONS) {
            return Err(AuthError::TooManySessions);
        }

        let auth_key = input_value(page, "auth_key").ok_or(AuthError::MissingFormField("auth_key"))?;
        let post_token =
            input_value(page, "post_token").ok_or(AuthError::MissingFormField("post_token"))?;

        tracing::trace!("Login form parsed, auth_key length: {}", auth_key.len());
        Ok(Self {
            auth_key,
            post_token,
        })
    }

    /// MD5 of the plaintext password concatenated with the form's `auth_key`
    pub(crate) fn md5_pass(&self, password: &str) -> String {
        let digest = md5_compute(format!("{password}{}", self.auth_key));
        hex::encode(digest.0)
    }

    /// Form body for the login POST
    pub(crate) fn submission(&self, password: &str) -> Vec<(&'static str, String)> {
        vec![
            ("active_page", LOGIN_ACTIVE_PAGE.to_string()),
            ("mimic_button_field", LOGIN_BUTTON.to_string()),
            ("post_token", self.post_token.clone()),
            ("md5_pass", self.md5_pass(password)),
            ("auth_key", self.auth_key.clone()),
        ]
    }
}

/// Value of the `<input>` with the given name, attributes in any order
fn input_value(page: &str, name: &str) -> Option<String> {
    INPUT_TAG.find_iter(page).find_map(|tag| {
        let mut input_name = None;
        let mut value = None;
        for caps in ATTRIBUTE.captures_iter(tag.as_str()) {
            let attr_value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string());
            match caps[1].to_ascii_lowercase().as_str() {
                "name" => input_name = attr_value,
                "value" => value = attr_value,
                _ => {}
            }
        }
        if input_name.as_deref() == Some(name) {
            value
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = include_str!("../../tests/fixtures/hub_one_login.html");

    #[test]
    fn test_parse_login_form() {
        let form = LoginForm::parse(LOGIN_PAGE).unwrap();
        assert_eq!(form.auth_key, "1234567890");
        assert_eq!(form.post_token, "1a2b3c4d5e6f");
    }

    #[test]
    fn test_md5_pass() {
        let form = LoginForm::parse(LOGIN_PAGE).unwrap();
        assert_eq!(form.md5_pass("hunter2"), "9336fd74097f4f937b94fda9f6c4d742");
    }

    #[test]
    fn test_submission_fields() {
        let form = LoginForm::parse(LOGIN_PAGE).unwrap();
        let body = form.submission("hunter2");
        let names: Vec<&str> = body.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec![
                "active_page",
                "mimic_button_field",
                "post_token",
                "md5_pass",
                "auth_key"
            ]
        );
        assert_eq!(body[0].1, "9148");
        assert_eq!(body[1].1, "submit_button_login_submit: ..");
        assert_eq!(body[3].1, "9336fd74097f4f937b94fda9f6c4d742");
    }

    #[test]
    fn test_too_many_sessions() {
        let page = format!("<html><body>{TOO_MANY_SESSIONS}</body></html>");
        assert!(matches!(
            LoginForm::parse(&page),
            Err(AuthError::TooManySessions)
        ));
    }

    #[test]
    fn test_missing_post_token() {
        let page = LOGIN_PAGE.replace("post_token", "something_else");
        assert!(matches!(
            LoginForm::parse(&page),
            Err(AuthError::MissingFormField("post_token"))
        ));
    }

    #[test]
    fn test_input_value_single_quotes() {
        let page = "<input type='hidden' name='auth_key' value='42'>";
        assert_eq!(input_value(page, "auth_key").as_deref(), Some("42"));
        assert_eq!(input_value(page, "post_token"), None);
    }
}
