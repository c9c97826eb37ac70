//! Test fixtures and constants.

use std::io::Write;

use age::secrecy::SecretString;

/// Passphrase every fixture file is encrypted with.
pub const PASSPHRASE: &str = "correct horse battery staple";

/// Scenario A document.
pub const NESTED_DOC: &str = "api_key: abc\nadmin:\n  password: xyz\n";

/// Three keys, one of them null.
pub const WITH_NULL_DOC: &str = "db_user: app\ndb_pass: s3cr3t-pass\nunused:\n";

/// Document with values distinctive enough to grep for.
pub const DISTINCT_DOC: &str = "api_token: tok-9f8e7d6c\nnested:\n  password: pw-5a4b3c2d\n";

/// Values from `DISTINCT_DOC` and `WITH_NULL_DOC` that must never show up in output.
pub const SENSITIVE_VALUES: &[&str] = &["tok-9f8e7d6c", "pw-5a4b3c2d", "s3cr3t-pass"];

/// Encrypt `plaintext` as an armored age file with a fast scrypt work factor.
pub fn age_encrypt(plaintext: &str, passphrase: &str) -> Vec<u8> {
    let mut recipient = age::scrypt::Recipient::new(SecretString::from(passphrase.to_string()));
    recipient.set_work_factor(10);
    let encryptor =
        age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn age::Recipient))
            .expect("failed to build encryptor");

    let mut out = Vec::new();
    let armor = age::armor::ArmoredWriter::wrap_output(&mut out, age::armor::Format::AsciiArmor)
        .expect("failed to wrap armor");
    let mut writer = encryptor.wrap_output(armor).expect("failed to wrap output");
    writer
        .write_all(plaintext.as_bytes())
        .expect("failed to write plaintext");
    writer
        .finish()
        .and_then(|armor| armor.finish())
        .expect("failed to finish encryption");
    out
}

/// A document with `count` flat keys `key_0..key_n`.
pub fn flat_doc(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{}_{}: value-{}-{}\n", prefix, i, prefix, i))
        .collect()
}
