//! Secret input.
//!
//! Secrets reach keyraken either on the command line or through an interactive hidden
//! prompt. The prompt is a capability handed in by the UI ([`SecretProvider`]): the
//! command layer never touches a terminal, and tests use [`FixedSecret`].
//!
//! | Command | flag missing | flag = `""` | flag = `"s"` |
//! |---------|--------------|-------------|--------------|
//! | `create --secret` | prompt | prompt | `s` |
//! | `update --new_secret` | unchanged | prompt | `s` |

use crate::error::{KeyrakenError, Result};
use std::fmt;
use zeroize::Zeroizing;

pub type SecretString = Zeroizing<String>;

pub const SECRET_PROMPT: &str = "Enter secret (input will be hidden):";

/// Where a secret should come from.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretInput {
    Given(SecretString),
    Prompt,
    Absent,
}

impl fmt::Debug for SecretInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretInput::Given(_) => f.write_str("Given(<redacted>)"),
            SecretInput::Prompt => f.write_str("Prompt"),
            SecretInput::Absent => f.write_str("Absent"),
        }
    }
}

impl SecretInput {
    /// `create` always needs a secret, so anything but a non-empty value prompts.
    pub fn for_create(arg: Option<String>) -> Self {
        match arg {
            Some(s) if !s.is_empty() => SecretInput::Given(Zeroizing::new(s)),
            _ => SecretInput::Prompt,
        }
    }

    /// `update` leaves the secret alone unless the flag is present.
    pub fn for_update(arg: Option<String>) -> Self {
        match arg {
            None => SecretInput::Absent,
            Some(s) if s.is_empty() => SecretInput::Prompt,
            Some(s) => SecretInput::Given(Zeroizing::new(s)),
        }
    }

    /// Turn the input into a secret, prompting through `provider` when asked to.
    pub fn resolve(self, provider: &dyn SecretProvider) -> Result<Option<SecretString>> {
        match self {
            SecretInput::Given(s) => Ok(Some(s)),
            SecretInput::Prompt => provider.provide(SECRET_PROMPT).map(Some),
            SecretInput::Absent => Ok(None),
        }
    }
}

/// Source of interactively entered secrets.
pub trait SecretProvider {
    /// Ask for a secret. A dismissed prompt is `NoSecretProvided`.
    fn provide(&self, message: &str) -> Result<SecretString>;
}

/// Deterministic provider for tests and non-interactive use.
#[derive(Debug, Clone, Default)]
pub struct FixedSecret(Option<String>);

impl FixedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Some(secret.into()))
    }

    /// A provider that behaves like a dismissed prompt.
    pub fn dismissed() -> Self {
        Self(None)
    }
}

impl SecretProvider for FixedSecret {
    fn provide(&self, _message: &str) -> Result<SecretString> {
        self.0
            .clone()
            .map(Zeroizing::new)
            .ok_or(KeyrakenError::NoSecretProvided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_prompts_unless_value_given() {
        assert_eq!(SecretInput::for_create(None), SecretInput::Prompt);
        assert_eq!(SecretInput::for_create(Some(String::new())), SecretInput::Prompt);
        assert_eq!(
            SecretInput::for_create(Some("s".into())),
            SecretInput::Given(Zeroizing::new("s".into()))
        );
    }

    #[test]
    fn update_is_absent_without_flag() {
        assert_eq!(SecretInput::for_update(None), SecretInput::Absent);
        assert_eq!(SecretInput::for_update(Some(String::new())), SecretInput::Prompt);
    }

    #[test]
    fn resolve_uses_provider_only_for_prompt() {
        let provider = FixedSecret::new("typed");
        let given = SecretInput::Given(Zeroizing::new("arg".into()))
            .resolve(&provider)
            .unwrap();
        assert_eq!(given.unwrap().as_str(), "arg");

        let prompted = SecretInput::Prompt.resolve(&provider).unwrap();
        assert_eq!(prompted.unwrap().as_str(), "typed");

        assert!(SecretInput::Absent.resolve(&provider).unwrap().is_none());
    }

    #[test]
    fn dismissed_prompt_is_no_secret_provided() {
        let result = SecretInput::Prompt.resolve(&FixedSecret::dismissed());
        assert!(matches!(result, Err(KeyrakenError::NoSecretProvided)));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let input = SecretInput::Given(Zeroizing::new("hunter2".into()));
        assert_eq!(format!("{:?}", input), "Given(<redacted>)");
    }
}
