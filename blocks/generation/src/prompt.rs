use aws_sdk_rekognition::types::{Attribute, Image, S3Object};
use aws_sdk_rekognition::Client as RekognitionClient;

use crate::error::GenerateError;

/// Scene term used when label detection returns nothing.
pub const DEFAULT_SCENE: &str = "an abstract shape";
/// Feeling term used when no face attribute clears the confidence bar.
pub const DEFAULT_FEELING: &str = "serenity and contemplation";
/// Prompt used when image analysis fails entirely.
pub const FALLBACK_PROMPT: &str =
    "An inspiring digital art piece of a mountain landscape with deep artistic texture.";

/// Face attributes below this confidence never make it into the prompt.
const FACE_CONFIDENCE_THRESHOLD: f32 = 90.0;

/// One detected label or face attribute with its confidence score.
#[derive(Debug, Clone)]
pub struct DetectedTrait {
    pub name: String,
    pub confidence: f32,
}

/// What the labeling service saw in the source image.
#[derive(Debug, Clone, Default)]
pub struct ImageTraits {
    pub labels: Vec<DetectedTrait>,
    pub face_attributes: Vec<DetectedTrait>,
}

/// Compose the artistic prompt from detected traits. Deterministic: the
/// highest-confidence label becomes the scene, the first face attribute over
/// the confidence bar becomes the feeling, with fixed defaults for both.
pub fn compose_prompt(traits: &ImageTraits) -> String {
    let scene = traits
        .labels
        .iter()
        .max_by(|a, b| {
            a.confidence
                .partial_cmp(&b.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|t| t.name.to_lowercase())
        .unwrap_or_else(|| DEFAULT_SCENE.to_string());

    let feeling = traits
        .face_attributes
        .iter()
        .find(|t| t.confidence > FACE_CONFIDENCE_THRESHOLD)
        .map(|t| t.name.to_lowercase())
        .unwrap_or_else(|| DEFAULT_FEELING.to_string());

    format!(
        "A vibrant, expressive digital painting in the style of Van Gogh, \
         featuring {}, capturing a dominant emotion of {}. \
         Focus on dramatic lighting and thick, visible brushstrokes. \
         Artistic, beautiful, 4k.",
        scene, feeling
    )
}

/// Run label and face-attribute detection against the uploaded object.
pub async fn analyze_source_image(
    client: &RekognitionClient,
    bucket: &str,
    key: &str,
) -> Result<ImageTraits, GenerateError> {
    let image = Image::builder()
        .s3_object(S3Object::builder().bucket(bucket).name(key).build())
        .build();

    let labels_resp = client
        .detect_labels()
        .image(image.clone())
        .max_labels(10)
        .send()
        .await
        .map_err(|e| GenerateError::AnalysisUnavailable(e.to_string()))?;

    let labels = labels_resp
        .labels()
        .iter()
        .filter_map(|label| {
            Some(DetectedTrait {
                name: label.name()?.to_string(),
                confidence: label.confidence().unwrap_or(0.0),
            })
        })
        .collect();

    let faces_resp = client
        .detect_faces()
        .image(image)
        .attributes(Attribute::All)
        .send()
        .await
        .map_err(|e| GenerateError::AnalysisUnavailable(e.to_string()))?;

    let mut face_attributes = Vec::new();
    for face in faces_resp.face_details() {
        for emotion in face.emotions() {
            if let Some(kind) = emotion.r#type() {
                face_attributes.push(DetectedTrait {
                    name: kind.as_str().to_string(),
                    confidence: emotion.confidence().unwrap_or(0.0),
                });
            }
        }
    }

    Ok(ImageTraits {
        labels,
        face_attributes,
    })
}

/// Derive the prompt for a source image; any analysis failure surfaces as
/// `AnalysisUnavailable` so the caller can fall back.
pub async fn derive_prompt(
    client: &RekognitionClient,
    bucket: &str,
    key: &str,
) -> Result<String, GenerateError> {
    let traits = analyze_source_image(client, bucket, key).await?;
    Ok(compose_prompt(&traits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traits(labels: &[(&str, f32)], attrs: &[(&str, f32)]) -> ImageTraits {
        ImageTraits {
            labels: labels
                .iter()
                .map(|(n, c)| DetectedTrait {
                    name: n.to_string(),
                    confidence: *c,
                })
                .collect(),
            face_attributes: attrs
                .iter()
                .map(|(n, c)| DetectedTrait {
                    name: n.to_string(),
                    confidence: *c,
                })
                .collect(),
        }
    }

    #[test]
    fn labels_without_qualifying_attributes_use_default_feeling() {
        let prompt = compose_prompt(&traits(&[("Mountain", 98.2), ("Sky", 95.0)], &[]));
        assert!(prompt.contains("mountain"));
        assert!(prompt.contains(DEFAULT_FEELING));
    }

    #[test]
    fn highest_confidence_label_wins_regardless_of_order() {
        let prompt = compose_prompt(&traits(&[("Sky", 80.0), ("Ocean", 99.0)], &[]));
        assert!(prompt.contains("ocean"));
        assert!(!prompt.contains("sky"));
    }

    #[test]
    fn first_attribute_over_the_bar_becomes_the_feeling() {
        let prompt = compose_prompt(&traits(
            &[("Portrait", 99.0)],
            &[("CALM", 85.0), ("HAPPY", 93.0), ("SURPRISED", 97.0)],
        ));
        // 85.0 is under the bar; the first qualifying one is HAPPY
        assert!(prompt.contains("happy"));
        assert!(!prompt.contains("calm"));
        assert!(!prompt.contains("surprised"));
    }

    #[test]
    fn empty_analysis_uses_both_defaults() {
        let prompt = compose_prompt(&ImageTraits::default());
        assert!(prompt.contains(DEFAULT_SCENE));
        assert!(prompt.contains(DEFAULT_FEELING));
    }

    #[test]
    fn composition_is_deterministic() {
        let input = traits(&[("Mountain", 98.2)], &[("HAPPY", 95.0)]);
        assert_eq!(compose_prompt(&input), compose_prompt(&input));
    }
}
