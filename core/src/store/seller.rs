use super::{from_epoch, to_epoch};
use crate::model::Seller;
use rusqlite::{params, Connection};

pub(super) fn insert_sellers(conn: &Connection, sellers: &[Seller]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO sellers (
            id, name, business_type, region, category, join_date,
            trust_index, fulfillment_rate, return_rate, complaint_ratio, total_orders
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for s in sellers {
        stmt.execute(params![
            &s.id,
            &s.name,
            &s.business_type,
            &s.region,
            &s.category,
            to_epoch(&s.join_date),
            s.trust_index,
            s.fulfillment_rate,
            s.return_rate,
            s.complaint_ratio,
            s.total_orders,
        ])?;
    }
    Ok(())
}

pub(super) fn select_sellers(conn: &Connection) -> rusqlite::Result<Vec<Seller>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, business_type, region, category, join_date,
                trust_index, fulfillment_rate, return_rate, complaint_ratio, total_orders
         FROM sellers ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Seller {
            id:               row.get(0)?,
            name:             row.get(1)?,
            business_type:    row.get(2)?,
            region:           row.get(3)?,
            category:         row.get(4)?,
            join_date:        from_epoch(5, row.get(5)?)?,
            trust_index:      row.get(6)?,
            fulfillment_rate: row.get(7)?,
            return_rate:      row.get(8)?,
            complaint_ratio:  row.get(9)?,
            total_orders:     row.get(10)?,
        })
    })?;
    rows.collect()
}
