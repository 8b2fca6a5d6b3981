//! Asset generation use cases.

use std::sync::Arc;

mod avatar;

pub use avatar::{AvatarSpec, GenerateAvatar};

/// Container for asset use cases.
pub struct AssetUseCases {
    pub generate_avatar: Arc<GenerateAvatar>,
}

impl AssetUseCases {
    pub fn new(generate_avatar: Arc<GenerateAvatar>) -> Self {
        Self { generate_avatar }
    }
}
