//! Retrieval layer: text encoders, the embedding index, and the
//! feedback-adaptive precedent ranker.

mod encoder;
pub use encoder::{Encoder, HASH_DIM, HashEncoder, mean_pool, normalize};

#[cfg(feature = "onnx")]
mod embedder;
#[cfg(feature = "onnx")]
pub use embedder::OnnxEncoder;

mod index;
pub use index::{EmbeddingIndex, Hit};

mod ranker;
pub use ranker::{
    PrecedentRanker, RECENCY_HORIZON_YEARS, RankerConfig, ScoreWeights, overlap, recency,
};
