use super::{from_epoch, opt_from_epoch, parse_enum, to_epoch};
use crate::model::Order;
use rusqlite::{params, Connection};

pub(super) fn insert_orders(conn: &Connection, orders: &[Order]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO orders (
            id, user_id, seller_id, amount, status, category, region,
            order_date, fulfillment_date, is_disputed, is_returned, fraud_flag
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )?;
    for o in orders {
        stmt.execute(params![
            &o.id,
            &o.user_id,
            &o.seller_id,
            o.amount,
            o.status.as_str(),
            &o.category,
            &o.region,
            to_epoch(&o.order_date),
            o.fulfillment_date.as_ref().map(to_epoch),
            o.is_disputed,
            o.is_returned,
            o.fraud_flag,
        ])?;
    }
    Ok(())
}

pub(super) fn select_orders(conn: &Connection) -> rusqlite::Result<Vec<Order>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, seller_id, amount, status, category, region,
                order_date, fulfillment_date, is_disputed, is_returned, fraud_flag
         FROM orders ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Order {
            id:               row.get(0)?,
            user_id:          row.get(1)?,
            seller_id:        row.get(2)?,
            amount:           row.get(3)?,
            status:           parse_enum(4, row.get(4)?)?,
            category:         row.get(5)?,
            region:           row.get(6)?,
            order_date:       from_epoch(7, row.get(7)?)?,
            fulfillment_date: opt_from_epoch(8, row.get(8)?)?,
            is_disputed:      row.get(9)?,
            is_returned:      row.get(10)?,
            fraud_flag:       row.get(11)?,
        })
    })?;
    rows.collect()
}
