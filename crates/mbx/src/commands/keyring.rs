//! Keyring operations for secure password storage.
//!
//! Stores the account password in the OS-native credential manager:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service API (requires libsecret)

use keyring::Entry;

use super::{CommandError, Result};

/// Service name for keyring entries.
const SERVICE: &str = "mbx-mail-cli";

/// Username for the password entry.
const USERNAME: &str = "account_password";

/// Appends a recovery suggestion to keyring error messages.
fn with_hint(error: &keyring::Error) -> String {
    match error {
        keyring::Error::NoStorageAccess(_) | keyring::Error::PlatformFailure(_) => format!(
            "{}\n\nHint: no credential store is reachable. Set MBX_PASSWORD or use \
             'mbx config set account.password <PASSWORD>' instead.",
            error
        ),
        _ => error.to_string(),
    }
}

/// Stores the password in the OS keyring.
pub fn store_password(password: &str) -> Result<()> {
    let entry = Entry::new(SERVICE, USERNAME)
        .map_err(|e| CommandError::Config(format!("Keyring error: {}", with_hint(&e))))?;
    entry.set_password(password).map_err(|e| {
        CommandError::Config(format!("Failed to store password: {}", with_hint(&e)))
    })?;
    Ok(())
}

/// Retrieves the password from the OS keyring.
///
/// Returns `Ok(None)` if no password is stored.
pub fn get_password() -> Result<Option<String>> {
    let entry = Entry::new(SERVICE, USERNAME)
        .map_err(|e| CommandError::Config(format!("Keyring error: {}", with_hint(&e))))?;
    match entry.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(keyring::Error::Ambiguous(_)) => Ok(None),
        Err(e) => Err(CommandError::Config(format!(
            "Failed to read password: {}",
            with_hint(&e)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_only_for_storage_errors() {
        let hint = with_hint(&keyring::Error::NoEntry);
        assert!(!hint.contains("Hint:"));
    }

    // Store/get are not exercised here: CI environments often lack a
    // keyring daemon, and tests must not leave entries in the user's store.
}
