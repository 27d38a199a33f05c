//! Temperature inference from serialized regression artifacts
//!
//! Loads two opaque artifact blobs produced offline (a feature scaler
//! and a linear regression model) and predicts a maximum temperature
//! from three inputs: precipitation (mm), minimum temperature (°C) and
//! wind speed (m/s). Training and evaluation happen elsewhere; this
//! module only serves the fitted parameters.

use serde::Deserialize;
use thiserror::Error;

/// The model consumes exactly these features, in this order:
/// precipitation, temp_min, wind.
pub const FEATURE_COUNT: usize = 3;

/// Errors raised while loading or validating inference artifacts
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Artifact bytes are not a valid encoded document
    #[error("failed to decode artifact: {0}")]
    BadArtifact(#[from] serde_json::Error),

    /// Artifact decoded but its parameters are unusable
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),
}

/// Standardizing feature scaler fitted offline
///
/// Transforms raw features to `(x - mean) / scale`, the same
/// standardization the model was trained against.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl FeatureScaler {
    /// Decode a scaler artifact from its serialized bytes
    ///
    /// # Errors
    /// Fails when the bytes do not decode, when either parameter vector
    /// is not exactly [`FEATURE_COUNT`] long, or when any scale entry is
    /// zero (a degenerate fit that would divide by zero).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InferenceError> {
        let scaler: Self = serde_json::from_slice(bytes)?;

        if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
            return Err(InferenceError::InvalidArtifact(format!(
                "scaler expects {} features, got mean={} scale={}",
                FEATURE_COUNT,
                scaler.mean.len(),
                scaler.scale.len()
            )));
        }
        if scaler.scale.iter().any(|s| *s == 0.0) {
            return Err(InferenceError::InvalidArtifact(
                "scaler has a zero scale entry".to_string(),
            ));
        }

        Ok(scaler)
    }

    /// Standardize one feature vector
    pub fn transform(&self, features: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (features[i] - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

/// Linear regression model fitted offline
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl RegressionModel {
    /// Decode a model artifact from its serialized bytes
    ///
    /// # Errors
    /// Fails when the bytes do not decode or the coefficient vector is
    /// not exactly [`FEATURE_COUNT`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InferenceError> {
        let model: Self = serde_json::from_slice(bytes)?;

        if model.coefficients.len() != FEATURE_COUNT {
            return Err(InferenceError::InvalidArtifact(format!(
                "model expects {} coefficients, got {}",
                FEATURE_COUNT,
                model.coefficients.len()
            )));
        }

        Ok(model)
    }

    /// Predict from an already-scaled feature vector
    pub fn predict(&self, scaled: [f64; FEATURE_COUNT]) -> f64 {
        self.coefficients
            .iter()
            .zip(scaled)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept
    }
}

/// Scaler + model pair, loaded once at startup
#[derive(Debug, Clone)]
pub struct TemperaturePredictor {
    scaler: FeatureScaler,
    model: RegressionModel,
}

impl TemperaturePredictor {
    /// Build a predictor from the two artifact blobs
    ///
    /// # Errors
    /// Propagates decode/validation failures from either artifact.
    pub fn from_artifacts(scaler_bytes: &[u8], model_bytes: &[u8]) -> Result<Self, InferenceError> {
        Ok(Self {
            scaler: FeatureScaler::from_bytes(scaler_bytes)?,
            model: RegressionModel::from_bytes(model_bytes)?,
        })
    }

    /// Predict the maximum temperature in Celsius
    pub fn predict(&self, precipitation: f64, temp_min: f64, wind: f64) -> f64 {
        let scaled = self.scaler.transform([precipitation, temp_min, wind]);
        self.model.predict(scaled)
    }
}
