use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::keyframe::StepAnimation;

/// Identity of an assembly step. Authored ids may be strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawStepId")]
pub struct StepId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStepId {
    Text(String),
    Number(i64),
}

impl From<RawStepId> for StepId {
    fn from(raw: RawStepId) -> Self {
        match raw {
            RawStepId::Text(s) => Self(s),
            RawStepId::Number(n) => Self(n.to_string()),
        }
    }
}

impl StepId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One assembly step as far as the viewer is concerned.
///
/// Other authored members (titles, descriptions, narration files) belong to
/// the host application and are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Arc<StepAnimation>>,
}

impl Step {
    #[must_use]
    pub fn new(id: impl Into<StepId>, animation: Option<StepAnimation>) -> Self {
        Self {
            id: id.into(),
            animation: animation.map(Arc::new),
        }
    }
}
