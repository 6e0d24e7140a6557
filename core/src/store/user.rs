use super::{from_epoch, to_epoch};
use crate::model::User;
use rusqlite::{params, Connection};

pub(super) fn insert_users(conn: &Connection, users: &[User]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO users (id, name, email, region, join_date, total_orders, satisfaction_score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for u in users {
        stmt.execute(params![
            &u.id,
            &u.name,
            &u.email,
            &u.region,
            to_epoch(&u.join_date),
            u.total_orders,
            u.satisfaction_score,
        ])?;
    }
    Ok(())
}

pub(super) fn select_users(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, region, join_date, total_orders, satisfaction_score
         FROM users ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(User {
            id:                 row.get(0)?,
            name:               row.get(1)?,
            email:              row.get(2)?,
            region:             row.get(3)?,
            join_date:          from_epoch(4, row.get(4)?)?,
            total_orders:       row.get(5)?,
            satisfaction_score: row.get(6)?,
        })
    })?;
    rows.collect()
}
