//! Checkpoint naming and the directory-level checkpoint manager.

// Filename codec.
pub(crate) mod codec;
// Save/load of checkpoint pairs.
pub(crate) mod manager;


pub use codec::{
    LearnerId,
    encode_checkpoint_name,
    decode_checkpoint_name,
    latest_stage,
};

pub use manager::CheckpointManager;
