//! age passphrase provider.
//!
//! Decrypts scrypt-protected age files in process, armored or binary.

use std::io::Read;

use ::age::secrecy::SecretString;
use tracing::trace;
use zeroize::Zeroizing;

use super::{read_password, CredentialSource, DecryptionProvider};
use crate::core::domain::{SecretFile, SecretValue};
use crate::error::DecryptError;

/// age file provider using a scrypt passphrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeFile;

impl AgeFile {
    fn passphrase(
        &self,
        file: &SecretFile,
        credential: &CredentialSource,
    ) -> Result<SecretValue, DecryptError> {
        match credential {
            CredentialSource::PasswordFile(path) => read_password(path, file),
            CredentialSource::Prompt => dialoguer::Password::new()
                .with_prompt(format!("Passphrase for {}", file.path().display()))
                .interact()
                .map(SecretValue::from)
                .map_err(|e| DecryptError::failed(file.path(), format!("prompt failed: {}", e))),
        }
    }
}

impl DecryptionProvider for AgeFile {
    fn decrypt(
        &self,
        file: &SecretFile,
        credential: &CredentialSource,
    ) -> Result<SecretValue, DecryptError> {
        trace!(path = %file.path().display(), "decrypting with age");

        let ciphertext = std::fs::read(file.path())
            .map_err(|e| DecryptError::failed(file.path(), format!("cannot read file: {}", e)))?;

        let passphrase = self.passphrase(file, credential)?;
        let identity =
            ::age::scrypt::Identity::new(SecretString::from(passphrase.expose().to_string()));

        let armored = ::age::armor::ArmoredReader::new(&ciphertext[..]);
        let decryptor = ::age::Decryptor::new(armored)
            .map_err(|e| DecryptError::failed(file.path(), e.to_string()))?;

        let mut reader = decryptor
            .decrypt(std::iter::once(&identity as &dyn ::age::Identity))
            .map_err(|e| DecryptError::failed(file.path(), e.to_string()))?;

        let mut plaintext = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut plaintext)
            .map_err(|e| DecryptError::failed(file.path(), e.to_string()))?;

        let text = std::str::from_utf8(&plaintext).map_err(|_| DecryptError::NotUtf8 {
            path: file.path().to_path_buf(),
        })?;

        trace!(plaintext_len = text.len(), "decrypted with age");
        Ok(SecretValue::new(text))
    }
}
