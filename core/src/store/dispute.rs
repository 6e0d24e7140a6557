use super::{from_epoch, opt_from_epoch, parse_enum, to_epoch};
use crate::model::Dispute;
use rusqlite::{params, Connection};

pub(super) fn insert_disputes(conn: &Connection, disputes: &[Dispute]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO disputes (
            id, order_id, user_id, seller_id, dispute_type, amount, status,
            resolution, dispute_date, resolution_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;
    for d in disputes {
        stmt.execute(params![
            &d.id,
            &d.order_id,
            &d.user_id,
            &d.seller_id,
            d.dispute_type.as_str(),
            d.amount,
            d.status.as_str(),
            &d.resolution,
            to_epoch(&d.dispute_date),
            d.resolution_date.as_ref().map(to_epoch),
        ])?;
    }
    Ok(())
}

pub(super) fn select_disputes(conn: &Connection) -> rusqlite::Result<Vec<Dispute>> {
    let mut stmt = conn.prepare(
        "SELECT id, order_id, user_id, seller_id, dispute_type, amount, status,
                resolution, dispute_date, resolution_date
         FROM disputes ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Dispute {
            id:              row.get(0)?,
            order_id:        row.get(1)?,
            user_id:         row.get(2)?,
            seller_id:       row.get(3)?,
            dispute_type:    parse_enum(4, row.get(4)?)?,
            amount:          row.get(5)?,
            status:          parse_enum(6, row.get(6)?)?,
            resolution:      row.get(7)?,
            dispute_date:    from_epoch(8, row.get(8)?)?,
            resolution_date: opt_from_epoch(9, row.get(9)?)?,
        })
    })?;
    rows.collect()
}
