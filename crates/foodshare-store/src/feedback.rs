//! Submitted app feedback.

use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Feedback;
use crate::row::{ts, ts_at, uuid_at};

impl Database {
    pub fn insert_feedback(&self, feedback: &Feedback) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO feedback (id, rating, body, name, email, role, submitted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    feedback.id.to_string(),
                    feedback.rating,
                    feedback.body,
                    feedback.name,
                    feedback.email,
                    feedback.role.map(|r| r.as_str()),
                    ts(&feedback.submitted_at),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "feedback"))?;
        Ok(())
    }

    /// Most recent first.
    pub fn list_feedback(&self, limit: u32) -> Result<Vec<Feedback>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, rating, body, name, email, role, submitted_at
             FROM feedback ORDER BY submitted_at DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            let role: Option<String> = row.get(5)?;
            let role = role
                .map(|s| {
                    s.parse().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            5,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })
                })
                .transpose()?;
            Ok(Feedback {
                id: uuid_at(row, 0)?,
                rating: row.get(1)?,
                body: row.get(2)?,
                name: row.get(3)?,
                email: row.get(4)?,
                role,
                submitted_at: ts_at(row, 6)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use foodshare_shared::Role;

    fn entry(rating: u8, name: &str) -> Feedback {
        Feedback {
            id: uuid::Uuid::new_v4(),
            rating,
            body: "Great app".into(),
            name: name.into(),
            email: String::new(),
            role: Some(Role::Receiver),
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn insert_and_list_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let mut old = entry(4, "Anonymous");
        old.submitted_at = Utc::now() - Duration::days(1);
        old.role = None;
        db.insert_feedback(&old).unwrap();
        db.insert_feedback(&entry(5, "Siti")).unwrap();

        let all = db.list_feedback(10).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Siti");
        assert_eq!(all[1].role, None);

        assert_eq!(db.list_feedback(1).unwrap().len(), 1);
    }

    #[test]
    fn out_of_range_rating_rejected_by_schema() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_feedback(&entry(6, "x")).is_err());
    }
}
