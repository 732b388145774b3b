//! Reading and writing Telegram animated stickers (gzip-compressed Lottie JSON).

use crate::compactor::{compact_with, CompactOptions};
use crate::error::{LottieError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use lottie_data::model::AnimationDocument;
use serde_json::Value;
use std::io::{Read, Write};
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub struct Codec;

impl Codec {
    /// Whether `bytes` start with the gzip magic number.
    pub fn is_gzip(bytes: &[u8]) -> bool {
        bytes.starts_with(&GZIP_MAGIC)
    }

    /// Decompresses and parses a `.tgs` payload.
    pub fn decode(bytes: &[u8]) -> Result<AnimationDocument> {
        let mut json = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut json)
            .map_err(|e| LottieError::MalformedInput(format!("gzip: {}", e)))?;
        debug!(compressed = bytes.len(), json = json.len(), "decompressed sticker");
        Self::decode_json(&json)
    }

    /// Parses an uncompressed Lottie JSON document.
    pub fn decode_json(bytes: &[u8]) -> Result<AnimationDocument> {
        serde_json::from_slice(bytes)
            .map_err(|e| LottieError::MalformedInput(format!("json: {}", e)))
    }

    /// Serializes the document into a JSON tree, ready for compaction.
    pub fn to_tree(doc: &AnimationDocument) -> Result<Value> {
        serde_json::to_value(doc).map_err(|e| LottieError::Encode(e.to_string()))
    }

    /// Writes a JSON tree as compact UTF-8 JSON and gzips it.
    ///
    /// Output depends only on the tree: key order is kept and the gzip header
    /// carries no timestamp.
    pub fn encode_tree(tree: &Value) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(tree).map_err(|e| LottieError::Encode(e.to_string()))?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&json)?;
        let bytes = encoder.finish()?;
        debug!(json = json.len(), compressed = bytes.len(), "encoded sticker");
        Ok(bytes)
    }

    /// Encodes the document without compaction.
    pub fn encode(doc: &AnimationDocument) -> Result<Vec<u8>> {
        Self::encode_tree(&Self::to_tree(doc)?)
    }

    /// Compacts the serialized document, then encodes it.
    pub fn encode_compacted(doc: &AnimationDocument, options: CompactOptions) -> Result<Vec<u8>> {
        let mut tree = Self::to_tree(doc)?;
        compact_with(&mut tree, options);
        Self::encode_tree(&tree)
    }
}
