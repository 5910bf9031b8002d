//! Subject store: per-space course records keyed by case-insensitive shortcut.
//!
//! # Invariants
//! - `(space_id, shortcut_key)` is unique; lookups always go through
//!   [`shortcut_key`].
//! - Removing a subject removes its reviews and their votes in the same
//!   transaction.

use crate::model::subject::{shortcut_key, Subject, SubjectId};
use crate::model::{SpaceId, UserId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const SUBJECT_SELECT_SQL: &str = "SELECT
    s.uuid AS uuid,
    s.space_id AS space_id,
    s.shortcut AS shortcut,
    s.name AS name,
    s.category AS category
FROM subjects s";

/// Repository interface for subject records.
pub trait SubjectRepository {
    /// Case-insensitive exact match on shortcut within one space.
    fn get_subject(&self, space_id: SpaceId, shortcut: &str) -> RepoResult<Option<Subject>>;
    fn get_subject_by_id(&self, id: SubjectId) -> RepoResult<Option<Subject>>;
    /// Overwrites name/category of an existing shortcut or creates a new row.
    fn upsert_subject(
        &self,
        space_id: SpaceId,
        shortcut: &str,
        name: &str,
        category: &str,
    ) -> RepoResult<Subject>;
    /// Creates a new row; fails with `DuplicateSubject` if the shortcut is taken.
    fn insert_subject(
        &self,
        space_id: SpaceId,
        shortcut: &str,
        name: &str,
        category: &str,
    ) -> RepoResult<Subject>;
    /// Deletes the subject with its reviews and votes. Returns whether a row
    /// was removed.
    fn remove_subject(&self, space_id: SpaceId, shortcut: &str) -> RepoResult<bool>;
    fn list_subjects(&self, space_id: SpaceId) -> RepoResult<Vec<Subject>>;
    /// Subjects with at least one review.
    fn list_reviewed(&self, space_id: SpaceId) -> RepoResult<Vec<Subject>>;
    /// Subjects with at least one review written by `author_id`.
    fn list_reviewed_by_user(&self, space_id: SpaceId, author_id: UserId)
        -> RepoResult<Vec<Subject>>;
}

/// SQLite-backed subject repository.
pub struct SqliteSubjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SubjectRepository for SqliteSubjectRepository<'_> {
    fn get_subject(&self, space_id: SpaceId, shortcut: &str) -> RepoResult<Option<Subject>> {
        let Ok(key) = shortcut_key(shortcut) else {
            return Ok(None);
        };
        load_subject_by_key(self.conn, space_id, &key)
    }

    fn get_subject_by_id(&self, id: SubjectId) -> RepoResult<Option<Subject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBJECT_SELECT_SQL} WHERE s.uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_subject_row(row)?));
        }
        Ok(None)
    }

    fn upsert_subject(
        &self,
        space_id: SpaceId,
        shortcut: &str,
        name: &str,
        category: &str,
    ) -> RepoResult<Subject> {
        let key = shortcut_key(shortcut)?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO subjects (uuid, space_id, shortcut, shortcut_key, name, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (space_id, shortcut_key) DO UPDATE SET
                shortcut = excluded.shortcut,
                name = excluded.name,
                category = excluded.category,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                Uuid::new_v4().to_string(),
                space_id,
                shortcut.trim(),
                key.as_str(),
                name,
                category,
            ],
        )?;
        let subject = load_required_subject(&tx, space_id, &key)?;
        tx.commit()?;
        Ok(subject)
    }

    fn insert_subject(
        &self,
        space_id: SpaceId,
        shortcut: &str,
        name: &str,
        category: &str,
    ) -> RepoResult<Subject> {
        let key = shortcut_key(shortcut)?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if load_subject_by_key(&tx, space_id, &key)?.is_some() {
            return Err(RepoError::DuplicateSubject {
                space_id,
                shortcut: shortcut.trim().to_string(),
            });
        }

        tx.execute(
            "INSERT INTO subjects (uuid, space_id, shortcut, shortcut_key, name, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                Uuid::new_v4().to_string(),
                space_id,
                shortcut.trim(),
                key.as_str(),
                name,
                category,
            ],
        )?;
        let subject = load_required_subject(&tx, space_id, &key)?;
        tx.commit()?;
        Ok(subject)
    }

    fn remove_subject(&self, space_id: SpaceId, shortcut: &str) -> RepoResult<bool> {
        let Ok(key) = shortcut_key(shortcut) else {
            return Ok(false);
        };
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let Some(subject) = load_subject_by_key(&tx, space_id, &key)? else {
            return Ok(false);
        };
        let subject_uuid = subject.id.to_string();

        tx.execute(
            "DELETE FROM review_votes
             WHERE review_uuid IN (SELECT uuid FROM reviews WHERE subject_uuid = ?1);",
            [subject_uuid.as_str()],
        )?;
        tx.execute(
            "DELETE FROM reviews WHERE subject_uuid = ?1;",
            [subject_uuid.as_str()],
        )?;
        tx.execute(
            "DELETE FROM subjects WHERE uuid = ?1;",
            [subject_uuid.as_str()],
        )?;

        tx.commit()?;
        Ok(true)
    }

    fn list_subjects(&self, space_id: SpaceId) -> RepoResult<Vec<Subject>> {
        query_subjects(
            self.conn,
            &format!("{SUBJECT_SELECT_SQL} WHERE s.space_id = ?1 ORDER BY s.shortcut_key ASC;"),
            params![space_id],
        )
    }

    fn list_reviewed(&self, space_id: SpaceId) -> RepoResult<Vec<Subject>> {
        query_subjects(
            self.conn,
            &format!(
                "{SUBJECT_SELECT_SQL}
                 WHERE s.space_id = ?1
                   AND EXISTS (SELECT 1 FROM reviews r WHERE r.subject_uuid = s.uuid)
                 ORDER BY s.shortcut_key ASC;"
            ),
            params![space_id],
        )
    }

    fn list_reviewed_by_user(
        &self,
        space_id: SpaceId,
        author_id: UserId,
    ) -> RepoResult<Vec<Subject>> {
        query_subjects(
            self.conn,
            &format!(
                "{SUBJECT_SELECT_SQL}
                 WHERE s.space_id = ?1
                   AND EXISTS (
                     SELECT 1 FROM reviews r
                     WHERE r.subject_uuid = s.uuid
                       AND r.author_id = ?2
                   )
                 ORDER BY s.shortcut_key ASC;"
            ),
            params![space_id, author_id],
        )
    }
}

/// Loads a subject by normalized key. Also used inside open transactions.
pub(crate) fn load_subject_by_key(
    conn: &Connection,
    space_id: SpaceId,
    key: &str,
) -> RepoResult<Option<Subject>> {
    let mut stmt = conn.prepare(&format!(
        "{SUBJECT_SELECT_SQL} WHERE s.space_id = ?1 AND s.shortcut_key = ?2;"
    ))?;
    let mut rows = stmt.query(params![space_id, key])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_subject_row(row)?));
    }
    Ok(None)
}

fn load_required_subject(conn: &Connection, space_id: SpaceId, key: &str) -> RepoResult<Subject> {
    load_subject_by_key(conn, space_id, key)?.ok_or_else(|| {
        RepoError::InvalidData(format!(
            "subject `{key}` missing in space {space_id} right after write"
        ))
    })
}

fn query_subjects(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Vec<Subject>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut subjects = Vec::new();
    while let Some(row) = rows.next()? {
        subjects.push(parse_subject_row(row)?);
    }
    Ok(subjects)
}

fn parse_subject_row(row: &Row<'_>) -> RepoResult<Subject> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Subject {
        id: parse_uuid(&uuid_text, "subjects.uuid")?,
        space_id: row.get("space_id")?,
        shortcut: row.get("shortcut")?,
        name: row.get("name")?,
        category: row.get("category")?,
    })
}
