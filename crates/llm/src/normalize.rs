//! Reshapes raw model payloads into [`ModelResponse`].

use crate::client::RawModelPayload;
use crate::types::{ModelResponse, ModelVariant};
use websage_core::{AppError, AppResult};

/// Convert a raw payload into the tagged result for `variant`.
///
/// The standard variant always yields `Simple`, the reasoning variant always
/// yields `Reasoned`. An empty reasoning trace is a valid `Reasoned` result;
/// a missing one is not. Answer content is never inspected.
pub fn normalize(payload: RawModelPayload, variant: ModelVariant) -> AppResult<ModelResponse> {
    let answer = payload.content.ok_or_else(|| {
        AppError::ModelResponseInvalid(format!(
            "Response from '{}' has no message content",
            payload.model
        ))
    })?;

    match variant {
        ModelVariant::Standard => Ok(ModelResponse::Simple { answer }),
        ModelVariant::Reasoning => {
            let reasoning = payload.reasoning_content.ok_or_else(|| {
                AppError::ModelResponseInvalid(format!(
                    "Response from '{}' has no reasoning_content",
                    payload.model
                ))
            })?;

            if reasoning.is_empty() {
                tracing::debug!("Reasoning model returned an empty trace");
            }

            Ok(ModelResponse::Reasoned { reasoning, answer })
        }
    }
}
