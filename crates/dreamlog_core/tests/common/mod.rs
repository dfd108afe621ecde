#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use rusqlite::{params, Connection};
use uuid::Uuid;

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn days_before(day: NaiveDate, days: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(days)).unwrap()
}

pub fn insert_user(conn: &Connection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO users (uuid, name, email) VALUES (?1, ?2, ?3);",
        params![id.to_string(), name, format!("{name}@example.com")],
    )
    .unwrap();
    id
}

pub fn insert_dream(
    conn: &Connection,
    user_id: Uuid,
    dream_date: &str,
    lucidity: i64,
    tags: &[&str],
    emotions: &[&str],
) -> Uuid {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO dreams (uuid, user_uuid, dream_date, lucidity, title)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            id.to_string(),
            user_id.to_string(),
            dream_date,
            lucidity,
            format!("dream on {dream_date}")
        ],
    )
    .unwrap();

    for tag in tags {
        conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1);", [tag])
            .unwrap();
        conn.execute(
            "INSERT INTO dream_tags (dream_uuid, tag_id)
             SELECT ?1, id FROM tags WHERE name = ?2;",
            params![id.to_string(), tag],
        )
        .unwrap();
    }
    for emotion in emotions {
        conn.execute(
            "INSERT OR IGNORE INTO emotions (name) VALUES (?1);",
            [emotion],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO dream_emotions (dream_uuid, emotion_id)
             SELECT ?1, id FROM emotions WHERE name = ?2;",
            params![id.to_string(), emotion],
        )
        .unwrap();
    }
    id
}
