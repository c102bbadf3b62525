//! Embedding similarity and the visual weight derived from it.

use thiserror::Error;

use crate::model::{Color, VisualProps};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimilarityError {
    #[error("embedding lengths differ ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("embedding component {index} is not a finite number")]
    NonFinite { index: usize },
}

/// Cosine of the angle between two vectors. Zero-norm vectors have similarity 0.
pub fn cosine_similarity(left: &[f64], right: &[f64]) -> Result<f64, SimilarityError> {
    if left.len() != right.len() {
        return Err(SimilarityError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut dot = 0.0;
    let mut left_norm = 0.0;
    let mut right_norm = 0.0;
    for (index, (&a, &b)) in left.iter().zip(right).enumerate() {
        if !a.is_finite() || !b.is_finite() {
            return Err(SimilarityError::NonFinite { index });
        }
        dot += a * b;
        left_norm += a * a;
        right_norm += b * b;
    }

    if left_norm <= 0.0 || right_norm <= 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (left_norm.sqrt() * right_norm.sqrt()))
}

/// Similarity in [0, 1]. Missing, empty or malformed embeddings count as unrelated.
pub fn semantic_similarity(left: Option<&[f64]>, right: Option<&[f64]>) -> f64 {
    let (Some(left), Some(right)) = (left, right) else {
        return 0.0;
    };
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    match cosine_similarity(left, right) {
        Ok(similarity) => similarity.clamp(0.0, 1.0),
        Err(error) => {
            tracing::debug!(%error, "treating malformed embedding pair as unrelated");
            0.0
        }
    }
}

pub fn connection_visual_props(similarity: f64) -> VisualProps {
    let similarity = normalize(similarity);
    VisualProps {
        opacity: similarity,
        thickness: (similarity * 4.0).max(1.0),
        glow: similarity * 0.6,
        pulse_duration: 2000.0 + (1.0 - similarity) * 3000.0,
    }
}

pub fn connection_color(similarity: f64, hue: f64) -> Color {
    let similarity = normalize(similarity);
    Color::hsl(hue, 60.0 + similarity * 40.0, 40.0 + similarity * 30.0)
}

fn normalize(similarity: f64) -> f64 {
    if similarity.is_nan() {
        0.0
    } else {
        similarity.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unit_vectors_give_dot_product() {
        let similarity = cosine_similarity(&[0.8, 0.6], &[1.0, 0.0]).unwrap();
        assert!(approx(similarity, 0.8));
    }

    #[test]
    fn scale_does_not_change_similarity() {
        let a = cosine_similarity(&[3.0, 4.0], &[6.0, 8.0]).unwrap();
        assert!(approx(a, 1.0));
    }

    #[test]
    fn mismatched_lengths_are_errors() {
        assert_eq!(
            cosine_similarity(&[1.0], &[1.0, 0.0]),
            Err(SimilarityError::LengthMismatch { left: 1, right: 2 })
        );
        assert_eq!(
            cosine_similarity(&[1.0, f64::NAN], &[1.0, 0.0]),
            Err(SimilarityError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn semantic_similarity_degrades_to_zero() {
        assert_eq!(semantic_similarity(None, Some(&[1.0])), 0.0);
        assert_eq!(semantic_similarity(Some(&[]), Some(&[])), 0.0);
        assert_eq!(semantic_similarity(Some(&[1.0]), Some(&[1.0, 2.0])), 0.0);
        assert_eq!(semantic_similarity(Some(&[0.0, 0.0]), Some(&[1.0, 2.0])), 0.0);
        assert_eq!(semantic_similarity(Some(&[1.0, 0.0]), Some(&[-1.0, 0.0])), 0.0);
    }

    #[test]
    fn visual_props_grow_with_similarity() {
        let weak = connection_visual_props(0.2);
        let strong = connection_visual_props(0.9);
        assert!(strong.opacity > weak.opacity);
        assert!(strong.thickness > weak.thickness);
        assert!(strong.glow > weak.glow);
        assert!(strong.pulse_duration < weak.pulse_duration);
        assert_eq!(weak.thickness, 1.0);

        let full = connection_visual_props(1.0);
        assert_eq!(full.thickness, 4.0);
        assert_eq!(full.pulse_duration, 2000.0);
        assert_eq!(connection_visual_props(7.0), full);
    }

    #[test]
    fn color_saturation_tracks_similarity() {
        assert_eq!(connection_color(0.0, 200.0), Color::hsl(200.0, 60.0, 40.0));
        assert_eq!(connection_color(1.0, 200.0), Color::hsl(200.0, 100.0, 70.0));
    }
}
