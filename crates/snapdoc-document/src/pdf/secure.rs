// SPDX-License-Identifier: MIT
//
// Post-assembly pass over the serialised PDF using `lopdf`: writes the /Info
// metadata dictionary and applies standard-security-handler encryption when a
// password is set.

use lopdf::encryption::{EncryptionState, EncryptionVersion, Permissions};
use lopdf::{Document, Object, dictionary};
use sha2::{Digest, Sha256};
use snapdoc_core::error::SnapdocError;
use snapdoc_core::types::DocumentSettings;
use tracing::{debug, info, instrument};

/// RC4 key length used for the standard security handler, in bits.
const ENCRYPTION_KEY_BITS: usize = 128;

/// Apply document metadata and (optionally) encryption to assembled bytes.
///
/// Returns the input unchanged when there is nothing to do, so unprotected
/// exports skip the reparse entirely.
#[instrument(skip(bytes, settings), fields(bytes_len = bytes.len()))]
pub fn finalize_document(
    bytes: Vec<u8>,
    settings: &DocumentSettings,
) -> Result<Vec<u8>, SnapdocError> {
    let has_info =
        settings.author.is_some() || settings.title.is_some() || settings.subject.is_some();
    let password = settings.effective_password();

    if !has_info && password.is_none() {
        return Ok(bytes);
    }

    let mut doc = Document::load_mem(&bytes)
        .map_err(|err| SnapdocError::PdfError(format!("failed to reload document: {}", err)))?;

    if has_info {
        write_document_info(&mut doc, settings);
    }

    if let Some(password) = password {
        ensure_file_id(&mut doc, &bytes);
        encrypt_with_password(&mut doc, password)?;
        info!("document encrypted");
    }

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| SnapdocError::PdfError(format!("failed to serialise document: {}", err)))?;

    debug!(output_bytes = output.len(), "document finalised");
    Ok(output)
}

/// Write author/title/subject into the trailer's /Info dictionary.
fn write_document_info(doc: &mut Document, settings: &DocumentSettings) {
    let mut info = dictionary! {};
    if let Some(author) = &settings.author {
        info.set("Author", Object::string_literal(author.as_str()));
    }
    if let Some(title) = &settings.title {
        info.set("Title", Object::string_literal(title.as_str()));
    }
    if let Some(subject) = &settings.subject {
        info.set("Subject", Object::string_literal(subject.as_str()));
    }

    let info_id = doc.add_object(Object::Dictionary(info));
    doc.trailer.set("Info", Object::Reference(info_id));
}

/// The standard security handler derives its keys from the file identifier;
/// generators that omit /ID get a stable one derived from the content hash.
fn ensure_file_id(doc: &mut Document, bytes: &[u8]) {
    if doc.trailer.get(b"ID").is_ok() {
        return;
    }
    let digest = Sha256::digest(bytes);
    let id = Object::string_literal(digest[..16].to_vec());
    doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));
}

/// Encrypt the document in place with the given password (used as both the
/// owner and user password), granting full permissions.
fn encrypt_with_password(doc: &mut Document, password: &str) -> Result<(), SnapdocError> {
    let version = EncryptionVersion::V2 {
        document: doc,
        owner_password: password,
        user_password: password,
        key_length: ENCRYPTION_KEY_BITS,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version)
        .map_err(|err| SnapdocError::Encryption(format!("key derivation failed: {}", err)))?;
    doc.encrypt(&state)
        .map_err(|err| SnapdocError::Encryption(format!("encryption failed: {}", err)))?;
    Ok(())
}
