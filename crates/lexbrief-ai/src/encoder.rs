//! Text encoders producing unit-length vectors.

use std::hash::Hasher;

use twox_hash::XxHash64;

/// Turns text into fixed-length, L2-normalised vectors.
///
/// Implementations must be deterministic for a given model and input.
pub trait Encoder: Send + Sync {
    /// Vector dimensionality.
    fn dim(&self) -> usize;

    /// Encode a batch of texts, one vector per input, in input order.
    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Dimensionality of the hashing encoder, matching all-MiniLM-L6-v2.
pub const HASH_DIM: usize = 384;

/// Feature-hashing bag-of-words encoder.
///
/// Needs no model files, so it backs tests and offline runs. Lower-cased
/// alphanumeric tokens are hashed into buckets with a signed weight, then
/// the vector is normalised. Texts with no tokens encode to the zero vector.
#[derive(Debug, Clone)]
pub struct HashEncoder {
    dim: usize,
}

impl HashEncoder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn encode_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let h = hasher.finish();
            let bucket = (h % self.dim as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        normalize(&mut v);
        v
    }
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self::new(HASH_DIM)
    }
}

impl Encoder for HashEncoder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.encode_one(t)).collect())
    }
}

/// L2-normalise a vector in place. Zero vectors are left untouched.
pub fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Mask-weighted mean over the token axis, followed by L2 normalisation.
///
/// `hidden` is a flat `[batch, seq_len, dim]` buffer; `mask` is a flat
/// `[batch, mask_stride]` buffer, of which the first `seq_len` entries of
/// each row are used.
pub fn mean_pool(
    hidden: &[f32],
    mask: &[i64],
    batch: usize,
    seq_len: usize,
    mask_stride: usize,
    dim: usize,
) -> Vec<Vec<f32>> {
    let mut pooled_rows = Vec::with_capacity(batch);
    for i in 0..batch {
        let mut pooled = vec![0.0f32; dim];
        let mut tokens = 0.0f32;
        for j in 0..seq_len {
            let weight = mask[i * mask_stride + j] as f32;
            if weight <= 0.0 {
                continue;
            }
            let offset = (i * seq_len + j) * dim;
            for (p, h) in pooled.iter_mut().zip(&hidden[offset..offset + dim]) {
                *p += h * weight;
            }
            tokens += weight;
        }
        if tokens > 0.0 {
            for p in &mut pooled {
                *p /= tokens;
            }
        }
        normalize(&mut pooled);
        pooled_rows.push(pooled);
    }
    pooled_rows
}
