use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

const KEY_CONTEXT: &str = "aisle 2024 recently-viewed history token v1";
const SEPARATOR: char = '.';

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
	#[error("Token is not in payload.mac form.")]
	Malformed,
	#[error("Token signature does not match.")]
	BadSignature,
	#[error(transparent)]
	Base64(#[from] base64::DecodeError),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
}

/// Signs and verifies the client-held history token.
///
/// Wire form: `base64url(json array) "." hex(keyed blake3 of the base64 payload)`. The codec is
/// agnostic to list invariants; callers normalize decoded lists.
#[derive(Clone)]
pub struct TokenCodec {
	key: [u8; 32],
}
impl TokenCodec {
	pub fn new(secret: &str) -> Self {
		Self { key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()) }
	}

	pub fn encode(&self, handles: &[String]) -> Result<String, TokenError> {
		let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(handles)?);
		let mac = blake3::keyed_hash(&self.key, payload.as_bytes());

		Ok(format!("{payload}{SEPARATOR}{}", mac.to_hex()))
	}

	pub fn decode(&self, token: &str) -> Result<Vec<String>, TokenError> {
		let (payload, mac) = token.trim().rsplit_once(SEPARATOR).ok_or(TokenError::Malformed)?;
		let mac = blake3::Hash::from_hex(mac).map_err(|_| TokenError::Malformed)?;

		// `blake3::Hash` equality is constant time.
		if blake3::keyed_hash(&self.key, payload.as_bytes()) != mac {
			return Err(TokenError::BadSignature);
		}

		let bytes = URL_SAFE_NO_PAD.decode(payload)?;

		Ok(serde_json::from_slice(&bytes)?)
	}
}

impl std::fmt::Debug for TokenCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenCodec").finish_non_exhaustive()
	}
}
