//! Portrait generation for islanders being created.

use std::sync::Arc;

use island_domain::{Appearance, Gender};

use crate::infrastructure::ports::{AvatarError, AvatarPort, AvatarRequest};

const PORTRAIT_ASPECT_RATIO: &str = "3:4";

/// Creation-wizard choices that shape the portrait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarSpec {
    pub gender: Gender,
    pub appearance: Appearance,
    pub personality_vibe: String,
}

pub struct GenerateAvatar {
    avatars: Arc<dyn AvatarPort>,
}

impl GenerateAvatar {
    pub fn new(avatars: Arc<dyn AvatarPort>) -> Self {
        Self { avatars }
    }

    /// Returns the URL of the generated image.
    pub async fn execute(&self, spec: &AvatarSpec) -> Result<String, AvatarError> {
        let request = AvatarRequest {
            prompt: build_portrait_prompt(spec),
            aspect_ratio: PORTRAIT_ASPECT_RATIO.to_string(),
        };
        let url = self.avatars.generate(request).await?;
        tracing::info!(gender = %spec.gender, url = %url, "Avatar generated");
        Ok(url)
    }
}

fn build_portrait_prompt(spec: &AvatarSpec) -> String {
    let look = &spec.appearance;
    format!(
        "A close-up portrait of a {gender} human character with {hair_style} {hair_color} hair, \
         {skin_tone} skin tone, and {face_shape} face shape. They are wearing {outfit} \
         beach/summer clothing and have a {vibe} expression. The style is cute and fun, like a \
         modern game character, with bright eyes and vibrant colors. Set against a soft, \
         tropical paradise background.",
        gender = spec.gender,
        hair_style = look.hair_style,
        hair_color = look.hair_color,
        skin_tone = look.skin_tone,
        face_shape = look.face_shape,
        outfit = look.outfit_style,
        vibe = spec.personality_vibe,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockAvatarPort;

    fn spec() -> AvatarSpec {
        AvatarSpec {
            gender: Gender::Female,
            appearance: Appearance {
                face_shape: "heart".into(),
                skin_tone: "olive".into(),
                hair_style: "wavy".into(),
                hair_color: "auburn".into(),
                outfit_style: "boho".into(),
            },
            personality_vibe: "playful".into(),
        }
    }

    #[test]
    fn prompt_describes_the_choices() {
        let prompt = build_portrait_prompt(&spec());
        assert!(prompt.starts_with("A close-up portrait of a female human character"));
        assert!(prompt.contains("wavy auburn hair"));
        assert!(prompt.contains("olive skin tone, and heart face shape"));
        assert!(prompt.contains("wearing boho beach/summer clothing"));
        assert!(prompt.contains("playful expression"));
    }

    #[tokio::test]
    async fn when_generated_then_url_returned() {
        let mut avatars = MockAvatarPort::new();
        avatars
            .expect_generate()
            .withf(|req| req.aspect_ratio == "3:4" && req.prompt.contains("auburn"))
            .times(1)
            .returning(|_| Ok("https://replicate.delivery/portrait.png".to_string()));

        let url = GenerateAvatar::new(Arc::new(avatars))
            .execute(&spec())
            .await
            .expect("url");
        assert_eq!(url, "https://replicate.delivery/portrait.png");
    }

    #[tokio::test]
    async fn when_service_unconfigured_then_unavailable() {
        let mut avatars = MockAvatarPort::new();
        avatars
            .expect_generate()
            .returning(|_| Err(AvatarError::Unavailable));

        let err = GenerateAvatar::new(Arc::new(avatars))
            .execute(&spec())
            .await
            .expect_err("should fail");
        assert!(matches!(err, AvatarError::Unavailable));
    }
}
