use crate::model::BlockKey;

const KEY_DELIMITER: char = '-';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Malformed span token: {token:?}")]
    Malformed { token: String },
}

/// Location of one decorated span: which block, which decoration pass within
/// the block's span tree, which leaf within that pass.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanId {
    pub block_key: BlockKey,
    pub pass_id: usize,
    pub leaf_id: usize,
}

impl SpanId {
    pub fn new(block_key: BlockKey, pass_id: usize, leaf_id: usize) -> Self {
        Self {
            block_key,
            pass_id,
            leaf_id,
        }
    }

    /// Flatten to a `<block>-<pass>-<leaf>` token.
    pub fn encode(&self) -> String {
        format!(
            "{}{KEY_DELIMITER}{}{KEY_DELIMITER}{}",
            self.block_key, self.pass_id, self.leaf_id
        )
    }

    /// Parse a token produced by [`SpanId::encode`].
    ///
    /// Splits from the right so block keys containing the delimiter survive.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let malformed = || TokenError::Malformed {
            token: token.to_string(),
        };

        let mut parts = token.rsplitn(3, KEY_DELIMITER);
        let leaf_id = parts.next().ok_or_else(malformed)?;
        let pass_id = parts.next().ok_or_else(malformed)?;
        let block_key = parts.next().ok_or_else(malformed)?;

        if block_key.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            block_key: BlockKey::from(block_key),
            pass_id: parse_index(pass_id).ok_or_else(malformed)?,
            leaf_id: parse_index(leaf_id).ok_or_else(malformed)?,
        })
    }
}

impl std::fmt::Display for SpanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Only canonical decimal indices: `encode` never writes signs or leading zeros.
fn parse_index(s: &str) -> Option<usize> {
    let canonical = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s == "0" || !s.starts_with('0'));
    if canonical { s.parse().ok() } else { None }
}
