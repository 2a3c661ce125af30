use inquire::{InquireError, Password, PasswordDisplayMode};
use keyrakenapp::error::{KeyrakenError, Result};
use keyrakenapp::secret::{SecretProvider, SecretString};
use tracing::debug;
use zeroize::Zeroizing;

/// Hidden-input prompt on the controlling terminal.
pub struct TerminalPrompt;

impl SecretProvider for TerminalPrompt {
    fn provide(&self, message: &str) -> Result<SecretString> {
        let answer = Password::new(message)
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Hidden)
            .prompt();

        match answer {
            Ok(secret) => Ok(Zeroizing::new(secret)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Err(KeyrakenError::NoSecretProvided)
            }
            Err(InquireError::NotTTY) => {
                debug!("no terminal available to prompt for the secret");
                Err(KeyrakenError::NoSecretProvided)
            }
            Err(e) => Err(KeyrakenError::InvalidInput(format!(
                "Could not read secret: {}",
                e
            ))),
        }
    }
}
