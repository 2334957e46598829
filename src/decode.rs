//! Top-level quest decoding: try each encoding method until one verifies,
//! then hand the recovered container to a [`ContainerDecoder`].

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::cipher::{self, QuestCipher};
use crate::container::ContainerDecoder;
use crate::error::{QstError, QstResult};
use crate::frame::{QUEST_PREAMBLE, QUEST_TAG, QuestFrame};
use crate::method::{self, EncodingMethod};
use crate::password::{PASSWORD_LEN, container_password};

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Tag the file must start with. `None` expects [`QUEST_PREAMBLE`] and
    /// also accepts the unterminated [`QUEST_TAG`].
    pub preamble: Option<Vec<u8>>,
    /// Only try this method instead of searching all of them.
    pub method: Option<usize>,
}

/// Outcome of decoding with one candidate method.
#[derive(Debug)]
pub enum Trial {
    Success(Vec<u8>),
    /// Checksum did not verify: the file was written with another method.
    WrongMethod,
    Fatal(QstError),
}

/// Top layer removed and verified.
#[derive(Debug)]
pub struct DecodedLayer {
    pub method: &'static EncodingMethod,
    /// Packfile container bytes.
    pub plaintext: Vec<u8>,
    pub password: &'static [u8; PASSWORD_LEN],
}

/// Decode the top layer with a single method.
pub fn try_method(data: &[u8], preamble: &[u8], method: &EncodingMethod) -> Trial {
    let frame = match QuestFrame::parse(data, preamble) {
        Ok(f) => f,
        Err(e) => return Trial::Fatal(e),
    };

    let mut plaintext = frame.payload.to_vec();
    let mut cipher = QuestCipher::new(method.unmask_seed(frame.raw_seed), method);
    cipher.decrypt(&mut plaintext);

    if cipher.verify(frame.trailer) {
        Trial::Success(plaintext)
    } else {
        Trial::WrongMethod
    }
}

/// Remove the top obfuscation layer, searching methods newest first unless
/// the options pin one.
pub fn decode_layer(data: &[u8], options: &DecodeOptions) -> QstResult<DecodedLayer> {
    if let Some(preamble) = &options.preamble {
        return search_methods(data, preamble, options.method);
    }

    let tag = QUEST_TAG.as_bytes();
    match search_methods(data, QUEST_PREAMBLE, options.method) {
        Err(e) if data.starts_with(tag) && retry_bare_tag(&e) => {
            debug!(error = %e, "retrying with unterminated quest tag");
            search_methods(data, tag, options.method).map_err(|_| e)
        }
        result => result,
    }
}

/// Errors after which the frame may still be valid with the seed at byte 24.
fn retry_bare_tag(e: &QstError) -> bool {
    match e {
        QstError::FormatMismatch { offset } => *offset == QUEST_TAG.len(),
        QstError::TruncatedInput { .. }
        | QstError::ChecksumMismatch { .. }
        | QstError::UnknownFormat => true,
        _ => false,
    }
}

fn search_methods(
    data: &[u8],
    preamble: &[u8],
    pinned: Option<usize>,
) -> QstResult<DecodedLayer> {
    let candidates: Vec<&'static EncodingMethod> = match pinned {
        Some(index) => vec![EncodingMethod::by_index(index)?],
        None => method::newest_first().collect(),
    };

    for m in candidates {
        match try_method(data, preamble, m) {
            Trial::Success(plaintext) => {
                info!(method = m.index, size = plaintext.len(), "quest frame verified");
                return Ok(DecodedLayer {
                    method: m,
                    plaintext,
                    password: container_password(),
                });
            }
            Trial::WrongMethod => {
                debug!(method = m.index, "checksum mismatch");
                if pinned.is_some() {
                    return Err(QstError::ChecksumMismatch { method: m.index });
                }
            }
            Trial::Fatal(e) => {
                debug!(method = m.index, error = %e, "fatal frame error");
                return Err(e);
            }
        }
    }

    Err(QstError::UnknownFormat)
}

impl DecodedLayer {
    /// Unpack the container with the resolved password.
    pub fn into_payload(self, decoder: &dyn ContainerDecoder) -> QstResult<Vec<u8>> {
        let payload = decoder
            .decode(&self.plaintext, self.password)
            .map_err(QstError::ContainerDecodeFailed)?;
        debug!(size = payload.len(), "container decoded");
        Ok(payload)
    }
}

/// Decode a quest all the way to its payload.
pub fn decode_quest(
    data: &[u8],
    options: &DecodeOptions,
    decoder: &dyn ContainerDecoder,
) -> QstResult<Vec<u8>> {
    decode_layer(data, options)?.into_payload(decoder)
}

/// Read a quest file from disk and decode it.
pub fn decode_file(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
    decoder: &dyn ContainerDecoder,
) -> QstResult<Vec<u8>> {
    let data = fs::read(path).map_err(QstError::CantOpenFile)?;
    decode_quest(&data, options, decoder)
}

/// Build a quest frame around already packed container bytes.
pub fn encode_quest(
    container: &[u8],
    raw_seed: u32,
    method: &EncodingMethod,
    preamble: &[u8],
) -> Vec<u8> {
    let (ciphertext, trailer) = cipher::encrypt(container, method.unmask_seed(raw_seed), method);
    QuestFrame {
        raw_seed,
        payload: &ciphertext,
        trailer,
    }
    .to_bytes(preamble)
}
