use super::{from_epoch, parse_enum, to_epoch};
use crate::model::Review;
use rusqlite::{params, Connection};

pub(super) fn insert_reviews(conn: &Connection, reviews: &[Review]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO reviews (
            id, order_id, user_id, seller_id, rating, review_text,
            sentiment_score, sentiment_label, review_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for r in reviews {
        stmt.execute(params![
            &r.id,
            &r.order_id,
            &r.user_id,
            &r.seller_id,
            r.rating,
            &r.review_text,
            r.sentiment_score,
            r.sentiment_label.as_str(),
            to_epoch(&r.review_date),
        ])?;
    }
    Ok(())
}

pub(super) fn select_reviews(conn: &Connection) -> rusqlite::Result<Vec<Review>> {
    let mut stmt = conn.prepare(
        "SELECT id, order_id, user_id, seller_id, rating, review_text,
                sentiment_score, sentiment_label, review_date
         FROM reviews ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Review {
            id:              row.get(0)?,
            order_id:        row.get(1)?,
            user_id:         row.get(2)?,
            seller_id:       row.get(3)?,
            rating:          row.get(4)?,
            review_text:     row.get(5)?,
            sentiment_score: row.get(6)?,
            sentiment_label: parse_enum(7, row.get(7)?)?,
            review_date:     from_epoch(8, row.get(8)?)?,
        })
    })?;
    rows.collect()
}
