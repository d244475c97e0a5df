use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, Error as SqlError, ErrorCode, Row, params};

use crate::models::{NewTip, TipRecord};

/// Local log of tips that went out.
pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("DBを開けませんでした: path={path}"))?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS tips (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                creator_id TEXT NOT NULL,
                creator_name TEXT NOT NULL,
                sender TEXT NOT NULL,
                recipient TEXT NOT NULL,
                amount TEXT NOT NULL,
                batch_id TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (batch_id, creator_id)
            );
            ",
        )?;
        Ok(())
    }

    pub fn insert_tip(&self, tip: &NewTip) -> Result<i64> {
        insert_tip_row(&self.conn, tip)
    }

    /// All or nothing: a failing row rolls back the rows before it.
    pub fn insert_tips(&self, tips: &[NewTip]) -> Result<Vec<i64>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(tips.len());
        for tip in tips {
            ids.push(insert_tip_row(&tx, tip)?);
        }
        tx.commit()?;
        Ok(ids)
    }

    pub fn history_by_creator(&self, creator_id: &str) -> Result<Vec<TipRecord>> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, creator_id, creator_name, sender, recipient, amount, batch_id, created_at
            FROM tips
            WHERE creator_id = ?1
            ORDER BY id DESC
            ",
        )?;
        let rows = stmt.query_map(params![creator_id], read_tip)?;

        let mut tips = Vec::new();
        for row in rows {
            tips.push(row?);
        }
        Ok(tips)
    }

    pub fn recent_tips(&self, limit: u32) -> Result<Vec<TipRecord>> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, creator_id, creator_name, sender, recipient, amount, batch_id, created_at
            FROM tips
            ORDER BY id DESC
            LIMIT ?1
            ",
        )?;
        let rows = stmt.query_map(params![limit], read_tip)?;

        let mut tips = Vec::new();
        for row in rows {
            tips.push(row?);
        }
        Ok(tips)
    }
}

fn insert_tip_row(conn: &Connection, tip: &NewTip) -> Result<i64> {
    conn.execute(
        "
        INSERT INTO tips(creator_id, creator_name, sender, recipient, amount, batch_id)
        VALUES(?1, ?2, ?3, ?4, ?5, ?6)
        ",
        params![
            tip.creator_id,
            tip.creator_name,
            tip.sender.to_string(),
            tip.recipient.to_string(),
            tip.amount,
            tip.batch_id,
        ],
    )
    .map_err(map_unique_err)?;
    Ok(conn.last_insert_rowid())
}

fn read_tip(row: &Row<'_>) -> rusqlite::Result<TipRecord> {
    Ok(TipRecord {
        id: row.get(0)?,
        creator_id: row.get(1)?,
        creator_name: row.get(2)?,
        sender: row.get(3)?,
        recipient: row.get(4)?,
        amount: row.get(5)?,
        batch_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_unique_err(err: SqlError) -> anyhow::Error {
    match err {
        SqlError::SqliteFailure(code, _) if code.code == ErrorCode::ConstraintViolation => {
            anyhow!("一意制約違反: このバッチでは既に同じcreatorへのtipが記録されています")
        }
        other => anyhow!(other),
    }
}
