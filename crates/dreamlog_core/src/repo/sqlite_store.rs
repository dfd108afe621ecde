//! SQLite implementation of the dream record store.
//!
//! # Responsibility
//! - Answer store queries with single SQL statements per call.
//! - Decode and validate persisted rows.
//!
//! # Invariants
//! - Every query is scoped by `dreams.user_uuid`.
//! - Dates are persisted as `YYYY-MM-DD` text, so text ordering is date
//!   ordering.
//! - Nothing in this module writes to the database.

use crate::model::{CategoryKind, DreamRecord, User, UserId};
use crate::repo::dream_store::{DreamRecordStore, RepoError, RepoResult};
use crate::stats::{CategoryFrequency, DateRange, LuciditySum};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Table names backing one category kind.
struct CategoryTables {
    table: &'static str,
    join_table: &'static str,
    foreign_key: &'static str,
}

fn category_tables(kind: CategoryKind) -> CategoryTables {
    match kind {
        CategoryKind::Tag => CategoryTables {
            table: "tags",
            join_table: "dream_tags",
            foreign_key: "tag_id",
        },
        CategoryKind::Emotion => CategoryTables {
            table: "emotions",
            join_table: "dream_emotions",
            foreign_key: "emotion_id",
        },
    }
}

/// SQLite-backed dream store.
pub struct SqliteDreamStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDreamStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   not the one produced by `db::open_db`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<u64> {
        let value: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        to_count(value)
    }
}

impl DreamRecordStore for SqliteDreamStore<'_> {
    fn list_dream_dates(&self, user_id: UserId) -> RepoResult<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT dream_date
             FROM dreams
             WHERE user_uuid = ?1
             ORDER BY dream_date ASC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut dates = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            dates.push(parse_date(&text)?);
        }
        Ok(dates)
    }

    fn count_dreams_in_range(&self, user_id: UserId, range: &DateRange) -> RepoResult<u64> {
        self.count(
            "SELECT COUNT(*)
             FROM dreams
             WHERE user_uuid = ?1
               AND dream_date BETWEEN ?2 AND ?3;",
            params![
                user_id.to_string(),
                format_date(range.start()),
                format_date(range.end()),
            ],
        )
    }

    fn total_dream_count(&self, user_id: UserId) -> RepoResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM dreams WHERE user_uuid = ?1;",
            [user_id.to_string()],
        )
    }

    fn sum_and_count_lucidity(&self, user_id: UserId) -> RepoResult<LuciditySum> {
        let (sum, count): (i64, i64) = self.conn.query_row(
            "SELECT COALESCE(SUM(lucidity), 0), COUNT(*)
             FROM dreams
             WHERE user_uuid = ?1;",
            [user_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(LuciditySum {
            sum,
            count: to_count(count)?,
        })
    }

    fn category_frequencies(
        &self,
        user_id: UserId,
        kind: CategoryKind,
    ) -> RepoResult<Vec<CategoryFrequency>> {
        let tables = category_tables(kind);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT c.name AS name, COUNT(*) AS frequency
             FROM {join} j
             INNER JOIN dreams d ON d.uuid = j.dream_uuid
             INNER JOIN {table} c ON c.id = j.{fk}
             WHERE d.user_uuid = ?1
             GROUP BY c.id, c.name
             ORDER BY frequency DESC, c.name ASC;",
            join = tables.join_table,
            table = tables.table,
            fk = tables.foreign_key,
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut frequencies = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get("name")?;
            let frequency: i64 = row.get("frequency")?;
            frequencies.push(CategoryFrequency::new(name, to_count(frequency)?));
        }
        Ok(frequencies)
    }

    fn total_category_occurrences(&self, user_id: UserId, kind: CategoryKind) -> RepoResult<u64> {
        let tables = category_tables(kind);
        self.count(
            &format!(
                "SELECT COUNT(*)
                 FROM {join} j
                 INNER JOIN dreams d ON d.uuid = j.dream_uuid
                 WHERE d.user_uuid = ?1;",
                join = tables.join_table,
            ),
            [user_id.to_string()],
        )
    }

    fn exists_dream_on_date(&self, user_id: UserId, date: NaiveDate) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM dreams
                WHERE user_uuid = ?1
                  AND dream_date = ?2
            );",
            params![user_id.to_string(), format_date(date)],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, email, created_at, updated_at
             FROM users
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            let user = User {
                id: parse_uuid(&row.get::<_, String>("uuid")?, "users.uuid")?,
                name: row.get("name")?,
                email: row.get("email")?,
                created_at: row.get("created_at")?,
                updated_at: row.get("updated_at")?,
            };
            user.validate()?;
            return Ok(Some(user));
        }
        Ok(None)
    }

    fn list_dreams(&self, user_id: UserId) -> RepoResult<Vec<DreamRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, user_uuid, dream_date, lucidity, title, description
             FROM dreams
             WHERE user_uuid = ?1
             ORDER BY dream_date ASC, created_at ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut dreams = Vec::new();
        while let Some(row) = rows.next()? {
            let mut dream = parse_dream_row(row)?;
            let dream_uuid = dream.id.to_string();
            dream.tags = load_category_names(self.conn, CategoryKind::Tag, &dream_uuid)?;
            dream.emotions = load_category_names(self.conn, CategoryKind::Emotion, &dream_uuid)?;
            dream.validate()?;
            dreams.push(dream);
        }
        Ok(dreams)
    }
}

fn parse_dream_row(row: &Row<'_>) -> RepoResult<DreamRecord> {
    let dream_date: String = row.get("dream_date")?;
    Ok(DreamRecord {
        id: parse_uuid(&row.get::<_, String>("uuid")?, "dreams.uuid")?,
        user_id: parse_uuid(&row.get::<_, String>("user_uuid")?, "dreams.user_uuid")?,
        dream_date: parse_date(&dream_date)?,
        lucidity: row.get("lucidity")?,
        title: row.get("title")?,
        description: row.get("description")?,
        tags: Vec::new(),
        emotions: Vec::new(),
    })
}

fn load_category_names(
    conn: &Connection,
    kind: CategoryKind,
    dream_uuid: &str,
) -> RepoResult<Vec<String>> {
    let tables = category_tables(kind);
    let mut stmt = conn.prepare(&format!(
        "SELECT c.name
         FROM {join} j
         INNER JOIN {table} c ON c.id = j.{fk}
         WHERE j.dream_uuid = ?1
         ORDER BY c.name ASC;",
        join = tables.join_table,
        table = tables.table,
        fk = tables.foreign_key,
    ))?;
    let mut rows = stmt.query([dream_uuid])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(0)?);
    }
    Ok(names)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Accepts only the canonical text form, so reads agree with the text
/// comparisons used by range and point queries.
fn parse_date(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date) == value)
        .ok_or_else(|| {
            RepoError::InvalidData(format!("invalid date value `{value}` in dreams.dream_date"))
        })
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn to_count(value: i64) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` returned by query")))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let required: [(&'static str, &[&'static str]); 6] = [
        ("users", &["uuid", "name", "email", "created_at", "updated_at"]),
        (
            "dreams",
            &["uuid", "user_uuid", "dream_date", "lucidity", "title", "description"],
        ),
        ("tags", &["id", "name"]),
        ("emotions", &["id", "name"]),
        ("dream_tags", &["dream_uuid", "tag_id"]),
        ("dream_emotions", &["dream_uuid", "emotion_id"]),
    ];

    for (table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
