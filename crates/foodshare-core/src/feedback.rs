//! App feedback submitted from the settings screen.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use foodshare_shared::constants::{ANONYMOUS_NAME, MAX_RATING, MIN_RATING};
use foodshare_shared::IdentityProvider;
use foodshare_store::Feedback;

use crate::error::{Result, ServiceError};
use crate::validate;
use crate::SharedDatabase;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackDraft {
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
}

pub struct FeedbackService {
    db: SharedDatabase,
}

impl FeedbackService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Record feedback.  Anonymous submissions drop the name and email; the
    /// submitter's role is kept when someone is signed in.
    pub fn submit_feedback(
        &self,
        identity: &dyn IdentityProvider,
        draft: FeedbackDraft,
    ) -> Result<Feedback> {
        if !(MIN_RATING..=MAX_RATING).contains(&draft.rating) {
            return Err(ServiceError::Validation(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }

        let (name, email) = if draft.anonymous {
            (ANONYMOUS_NAME.to_string(), String::new())
        } else {
            let email = validate::optional(draft.email.as_deref())
                .map(|e| validate::email(&e))
                .transpose()?
                .unwrap_or_default();
            (
                validate::optional(draft.name.as_deref()).unwrap_or_default(),
                email,
            )
        };

        let feedback = Feedback {
            id: Uuid::new_v4(),
            rating: draft.rating,
            body: draft.text.trim().to_string(),
            name,
            email,
            role: identity.current_user().map(|u| u.role),
            submitted_at: Utc::now(),
        };

        let db = self.db.lock()?;
        db.insert_feedback(&feedback)?;
        info!(rating = feedback.rating, anonymous = draft.anonymous, "feedback received");
        Ok(feedback)
    }

    /// Most recent submissions first.
    pub fn recent_feedback(&self, limit: u32) -> Result<Vec<Feedback>> {
        let db = self.db.lock()?;
        Ok(db.list_feedback(limit)?)
    }
}
