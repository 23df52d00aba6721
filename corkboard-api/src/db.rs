//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling via deadpool-postgres, plus the high-level
//! operations the route handlers call. Every positional mutation (create,
//! delete, move, reorder) runs inside a transaction that locks the affected
//! parent rows first, so sibling positions stay dense under concurrency.

use crate::error::{ApiError, ApiResult};
use crate::types::{
    ColumnOrder, CreateBoardRequest, CreateCardRequest, CreateColumnRequest, UpdateBoardRequest,
    UpdateCardRequest, UpdateColumnRequest,
};
use corkboard_core::{
    check_dense, new_entity_id, plan_across_parents, plan_within_parent, Board, BoardId,
    BoardMember, BoardRole, Card, CardId, Column, ColumnId, MemberId, MovePlan, Position,
    SiblingShift,
};
use deadpool_postgres::{
    Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts, Transaction,
};
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "corkboard".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("CORKBOARD_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("CORKBOARD_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("CORKBOARD_DB_NAME").unwrap_or_else(|_| "corkboard".to_string()),
            user: std::env::var("CORKBOARD_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("CORKBOARD_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("CORKBOARD_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("CORKBOARD_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig {
            max_size: self.max_size,
            timeouts: Timeouts {
                wait: Some(self.timeout),
                ..Timeouts::default()
            },
            ..PoolConfig::default()
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

const BOARD_COLUMNS: &str = "board_id, owner_id, title, description, created_at, updated_at";
const COLUMN_COLUMNS: &str = "column_id, board_id, title, position, created_at, updated_at";
const CARD_COLUMNS: &str = "card_id, column_id, title, description, position, created_at, updated_at";

fn row_to_board(row: &Row) -> Board {
    Board {
        board_id: row.get("board_id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_board_member(row: &Row) -> BoardMember {
    let role: &str = row.get("role");
    BoardMember {
        board_id: row.get("board_id"),
        member_id: row.get("member_id"),
        role: match role {
            "owner" => BoardRole::Owner,
            _ => BoardRole::Member,
        },
        created_at: row.get("created_at"),
    }
}

fn row_to_column(row: &Row) -> Column {
    Column {
        column_id: row.get("column_id"),
        board_id: row.get("board_id"),
        title: row.get("title"),
        position: row.get("position"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_card(row: &Row) -> Card {
    Card {
        card_id: row.get("card_id"),
        column_id: row.get("column_id"),
        title: row.get("title"),
        description: row.get("description"),
        position: row.get("position"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool and provides high-level
/// operations over the corkboard schema.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Run a trivial query to confirm the database is reachable.
    pub async fn ping(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    // ========================================================================
    // SESSION OPERATIONS
    // ========================================================================

    /// Resolve a session key to its member, ignoring expired sessions.
    pub async fn session_member(&self, session_key: &str) -> ApiResult<Option<MemberId>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "SELECT member_id FROM sessions
                 WHERE session_key = $1 AND expires_at > now()",
                &[&session_key],
            )
            .await?;
        Ok(row.map(|r| r.get("member_id")))
    }

    // ========================================================================
    // BOARD OPERATIONS
    // ========================================================================

    /// Create a board owned by `owner_id`, along with its owner membership
    /// row.
    pub async fn board_create(
        &self,
        owner_id: MemberId,
        req: &CreateBoardRequest,
    ) -> ApiResult<Board> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        let board_id = new_entity_id();
        let row = tx
            .query_one(
                &format!(
                    "INSERT INTO boards (board_id, owner_id, title, description)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {BOARD_COLUMNS}"
                ),
                &[&board_id, &owner_id, &req.title, &req.description],
            )
            .await?;

        tx.execute(
            "INSERT INTO board_members (board_id, member_id, role)
             VALUES ($1, $2, 'owner')",
            &[&board_id, &owner_id],
        )
        .await?;

        tx.commit().await?;
        Ok(row_to_board(&row))
    }

    /// Get a board by ID.
    pub async fn board_get(&self, board_id: BoardId) -> ApiResult<Option<Board>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                &format!("SELECT {BOARD_COLUMNS} FROM boards WHERE board_id = $1"),
                &[&board_id],
            )
            .await?;
        Ok(row.as_ref().map(row_to_board))
    }

    /// List boards the member owns or has been added to, newest first.
    pub async fn board_list_by_member(&self, member_id: MemberId) -> ApiResult<Vec<Board>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT DISTINCT {BOARD_COLUMNS} FROM boards b
                     LEFT JOIN board_members bm USING (board_id)
                     WHERE b.owner_id = $1 OR bm.member_id = $1
                     ORDER BY created_at DESC"
                ),
                &[&member_id],
            )
            .await?;
        Ok(rows.iter().map(row_to_board).collect())
    }

    /// Update a board's title and/or description.
    pub async fn board_update(
        &self,
        board_id: BoardId,
        req: &UpdateBoardRequest,
    ) -> ApiResult<Board> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                &format!(
                    "UPDATE boards
                     SET title = COALESCE($2, title),
                         description = COALESCE($3, description),
                         updated_at = now()
                     WHERE board_id = $1
                     RETURNING {BOARD_COLUMNS}"
                ),
                &[&board_id, &req.title, &req.description],
            )
            .await?;
        row.as_ref()
            .map(row_to_board)
            .ok_or_else(|| ApiError::board_not_found(board_id))
    }

    /// Delete a board. Columns and cards go with it via FK cascade.
    pub async fn board_delete(&self, board_id: BoardId) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        let deleted = conn
            .execute("DELETE FROM boards WHERE board_id = $1", &[&board_id])
            .await?;
        if deleted == 0 {
            return Err(ApiError::board_not_found(board_id));
        }
        Ok(())
    }

    /// Whether the member owns the board or appears in its membership table.
    pub async fn has_board_access(
        &self,
        board_id: BoardId,
        member_id: MemberId,
    ) -> ApiResult<bool> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "SELECT EXISTS (
                     SELECT 1 FROM boards WHERE board_id = $1 AND owner_id = $2
                     UNION ALL
                     SELECT 1 FROM board_members WHERE board_id = $1 AND member_id = $2
                 )",
                &[&board_id, &member_id],
            )
            .await?;
        Ok(row.get(0))
    }

    /// Whether a member row exists.
    pub async fn member_exists(&self, member_id: MemberId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM members WHERE member_id = $1)",
                &[&member_id],
            )
            .await?;
        Ok(row.get(0))
    }

    /// Grant a member access to a board.
    ///
    /// Fails when the member is already on the board (the owner's own
    /// membership row counts).
    pub async fn board_member_add(
        &self,
        board_id: BoardId,
        member_id: MemberId,
    ) -> ApiResult<BoardMember> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "INSERT INTO board_members (board_id, member_id, role)
                 VALUES ($1, $2, 'member')
                 ON CONFLICT (board_id, member_id) DO NOTHING
                 RETURNING board_id, member_id, role, created_at",
                &[&board_id, &member_id],
            )
            .await?;
        row.as_ref()
            .map(row_to_board_member)
            .ok_or_else(|| ApiError::invalid_input("Member already added to this board"))
    }

    /// All cards on a board, grouped by column and ordered by position.
    /// Used to assemble the full board detail response.
    pub async fn board_cards(&self, board_id: BoardId) -> ApiResult<Vec<Card>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT c.card_id, c.column_id, c.title, c.description, c.position,
                        c.created_at, c.updated_at
                 FROM cards c
                 JOIN columns col USING (column_id)
                 WHERE col.board_id = $1
                 ORDER BY c.column_id, c.position",
                &[&board_id],
            )
            .await?;
        Ok(rows.iter().map(row_to_card).collect())
    }

    // ========================================================================
    // COLUMN OPERATIONS
    // ========================================================================

    /// Create a column, appended at the end of the board.
    ///
    /// The board row is locked first so two concurrent creates cannot claim
    /// the same position.
    pub async fn column_create(&self, req: &CreateColumnRequest) -> ApiResult<Column> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        lock_board(&tx, req.board_id).await?;

        let count: i64 = tx
            .query_one(
                "SELECT count(*) FROM columns WHERE board_id = $1",
                &[&req.board_id],
            )
            .await?
            .get(0);
        let position = count as Position;

        let column_id = new_entity_id();
        let row = tx
            .query_one(
                &format!(
                    "INSERT INTO columns (column_id, board_id, title, position)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {COLUMN_COLUMNS}"
                ),
                &[&column_id, &req.board_id, &req.title, &position],
            )
            .await?;

        tx.commit().await?;
        Ok(row_to_column(&row))
    }

    /// Get a column by ID.
    pub async fn column_get(&self, column_id: ColumnId) -> ApiResult<Option<Column>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                &format!("SELECT {COLUMN_COLUMNS} FROM columns WHERE column_id = $1"),
                &[&column_id],
            )
            .await?;
        Ok(row.as_ref().map(row_to_column))
    }

    /// List a board's columns in position order.
    pub async fn column_list_by_board(&self, board_id: BoardId) -> ApiResult<Vec<Column>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {COLUMN_COLUMNS} FROM columns
                     WHERE board_id = $1 ORDER BY position"
                ),
                &[&board_id],
            )
            .await?;
        Ok(rows.iter().map(row_to_column).collect())
    }

    /// Update a column's title. Position changes go through `column_move`.
    pub async fn column_update(
        &self,
        column_id: ColumnId,
        req: &UpdateColumnRequest,
    ) -> ApiResult<Column> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                &format!(
                    "UPDATE columns
                     SET title = COALESCE($2, title), updated_at = now()
                     WHERE column_id = $1
                     RETURNING {COLUMN_COLUMNS}"
                ),
                &[&column_id, &req.title],
            )
            .await?;
        row.as_ref()
            .map(row_to_column)
            .ok_or_else(|| ApiError::column_not_found(column_id))
    }

    /// Delete a column and its cards, closing the position gap it leaves in
    /// the board.
    pub async fn column_delete(&self, column_id: ColumnId) -> ApiResult<()> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        let row = tx
            .query_opt(
                "SELECT board_id FROM columns WHERE column_id = $1",
                &[&column_id],
            )
            .await?
            .ok_or_else(|| ApiError::column_not_found(column_id))?;
        let board_id: BoardId = row.get("board_id");

        lock_board(&tx, board_id).await?;

        // Position changes and deletes both serialize on the board lock, so
        // only a position read taken under it is trustworthy.
        let position: Position = tx
            .query_opt(
                "SELECT position FROM columns WHERE column_id = $1",
                &[&column_id],
            )
            .await?
            .ok_or_else(|| ApiError::column_not_found(column_id))?
            .get(0);

        // Cards cascade via FK.
        tx.execute("DELETE FROM columns WHERE column_id = $1", &[&column_id])
            .await?;
        tx.execute(
            "UPDATE columns SET position = position - 1
             WHERE board_id = $1 AND position > $2",
            &[&board_id, &position],
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Bulk-reorder columns of a board in one transaction.
    ///
    /// Each listed column's position is set to the requested value; columns
    /// not listed keep theirs. Before committing, the board's full position
    /// set is re-read and must form exactly `{0, .., n-1}` — assignments
    /// that would leave duplicates or gaps roll back with a validation
    /// error. Returns the columns in their new order.
    pub async fn columns_reorder(
        &self,
        board_id: BoardId,
        assignments: &[ColumnOrder],
    ) -> ApiResult<Vec<Column>> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        lock_board(&tx, board_id).await?;

        for assignment in assignments {
            let updated = tx
                .execute(
                    "UPDATE columns SET position = $2, updated_at = now()
                     WHERE column_id = $1 AND board_id = $3",
                    &[&assignment.id, &assignment.position, &board_id],
                )
                .await?;
            if updated == 0 {
                // Rolls back on drop.
                return Err(ApiError::column_not_found(assignment.id));
            }
        }

        let rows = tx
            .query(
                &format!(
                    "SELECT {COLUMN_COLUMNS} FROM columns
                     WHERE board_id = $1 ORDER BY position"
                ),
                &[&board_id],
            )
            .await?;
        let final_positions: Vec<Position> = rows.iter().map(|r| r.get("position")).collect();
        if !check_dense(&final_positions) {
            let count = final_positions.len();
            return Err(ApiError::validation_failed(format!(
                "column_orders must leave the board's {} columns at positions 0..{} \
                 with no duplicates or gaps",
                count,
                count.max(1) - 1
            )));
        }

        tx.commit().await?;
        Ok(rows.iter().map(row_to_column).collect())
    }

    /// Move a single column to a new position within its board, shifting the
    /// displaced siblings by one.
    pub async fn column_move(
        &self,
        column_id: ColumnId,
        requested_position: Position,
    ) -> ApiResult<Column> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        let row = tx
            .query_opt(
                "SELECT board_id, position FROM columns WHERE column_id = $1",
                &[&column_id],
            )
            .await?
            .ok_or_else(|| ApiError::column_not_found(column_id))?;
        let board_id: BoardId = row.get("board_id");

        lock_board(&tx, board_id).await?;

        // Re-read under the lock; a concurrent move may have shifted us, and
        // a concurrent delete may have removed us outright.
        let old_position: Position = tx
            .query_opt(
                "SELECT position FROM columns WHERE column_id = $1",
                &[&column_id],
            )
            .await?
            .ok_or_else(|| ApiError::column_not_found(column_id))?
            .get(0);
        let count: i64 = tx
            .query_one(
                "SELECT count(*) FROM columns WHERE board_id = $1",
                &[&board_id],
            )
            .await?
            .get(0);

        let plan = plan_within_parent(old_position, requested_position, count as Position)?;
        let new_position = match plan {
            MovePlan::Noop => old_position,
            MovePlan::WithinParent {
                shift,
                new_position,
            } => {
                shift_columns(&tx, board_id, &shift).await?;
                new_position
            }
            // plan_within_parent never crosses parents
            MovePlan::AcrossParents { .. } => unreachable!(),
        };

        let row = tx
            .query_one(
                &format!(
                    "UPDATE columns SET position = $2, updated_at = now()
                     WHERE column_id = $1
                     RETURNING {COLUMN_COLUMNS}"
                ),
                &[&column_id, &new_position],
            )
            .await?;

        tx.commit().await?;
        Ok(row_to_column(&row))
    }

    // ========================================================================
    // CARD OPERATIONS
    // ========================================================================

    /// Create a card, appended at the end of the column.
    pub async fn card_create(&self, req: &CreateCardRequest) -> ApiResult<Card> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        lock_columns(&tx, &[req.column_id]).await?;

        let count: i64 = tx
            .query_one(
                "SELECT count(*) FROM cards WHERE column_id = $1",
                &[&req.column_id],
            )
            .await?
            .get(0);
        let position = count as Position;

        let card_id = new_entity_id();
        let row = tx
            .query_one(
                &format!(
                    "INSERT INTO cards (card_id, column_id, title, description, position)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING {CARD_COLUMNS}"
                ),
                &[
                    &card_id,
                    &req.column_id,
                    &req.title,
                    &req.description,
                    &position,
                ],
            )
            .await?;

        tx.commit().await?;
        Ok(row_to_card(&row))
    }

    /// Get a card by ID.
    pub async fn card_get(&self, card_id: CardId) -> ApiResult<Option<Card>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE card_id = $1"),
                &[&card_id],
            )
            .await?;
        Ok(row.as_ref().map(row_to_card))
    }

    /// List a column's cards in position order.
    pub async fn card_list_by_column(&self, column_id: ColumnId) -> ApiResult<Vec<Card>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {CARD_COLUMNS} FROM cards
                     WHERE column_id = $1 ORDER BY position"
                ),
                &[&column_id],
            )
            .await?;
        Ok(rows.iter().map(row_to_card).collect())
    }

    /// Search a board's cards by title or description substring, case
    /// insensitive. Results come back in board order: by column position,
    /// then card position.
    pub async fn card_search(&self, board_id: BoardId, query: &str) -> ApiResult<Vec<Card>> {
        let conn = self.get_conn().await?;
        let pattern = format!("%{}%", escape_like(query));
        let rows = conn
            .query(
                "SELECT c.card_id, c.column_id, c.title, c.description, c.position,
                        c.created_at, c.updated_at
                 FROM cards c
                 JOIN columns col USING (column_id)
                 WHERE col.board_id = $1
                   AND (c.title ILIKE $2 OR c.description ILIKE $2)
                 ORDER BY col.position, c.position",
                &[&board_id, &pattern],
            )
            .await?;
        Ok(rows.iter().map(row_to_card).collect())
    }

    /// Update a card's title and/or description. Position and column changes
    /// go through `card_move`.
    pub async fn card_update(&self, card_id: CardId, req: &UpdateCardRequest) -> ApiResult<Card> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                &format!(
                    "UPDATE cards
                     SET title = COALESCE($2, title),
                         description = COALESCE($3, description),
                         updated_at = now()
                     WHERE card_id = $1
                     RETURNING {CARD_COLUMNS}"
                ),
                &[&card_id, &req.title, &req.description],
            )
            .await?;
        row.as_ref()
            .map(row_to_card)
            .ok_or_else(|| ApiError::card_not_found(card_id))
    }

    /// Delete a card, closing the position gap it leaves in its column.
    ///
    /// The card row is locked first so a concurrent move cannot change which
    /// column and position the gap-close shift applies to.
    pub async fn card_delete(&self, card_id: CardId) -> ApiResult<()> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        let row = tx
            .query_opt(
                "SELECT column_id, position FROM cards WHERE card_id = $1 FOR UPDATE",
                &[&card_id],
            )
            .await?
            .ok_or_else(|| ApiError::card_not_found(card_id))?;
        let column_id: ColumnId = row.get("column_id");
        let position: Position = row.get("position");

        lock_columns(&tx, &[column_id]).await?;

        tx.execute("DELETE FROM cards WHERE card_id = $1", &[&card_id])
            .await?;
        tx.execute(
            "UPDATE cards SET position = position - 1
             WHERE column_id = $1 AND position > $2",
            &[&column_id, &position],
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Move a card within its column or into another column on the same
    /// board.
    ///
    /// The card row itself is locked first, which pins its source column and
    /// position before the column locks are taken: a competing move of the
    /// same card cannot commit in between and leave this transaction shifting
    /// the wrong column. The column rows are then locked in a consistent
    /// order. A lock-order collision with a sibling shift from another
    /// transaction surfaces as a detected deadlock, which maps to a
    /// retryable 409.
    pub async fn card_move(
        &self,
        card_id: CardId,
        target_column_id: ColumnId,
        requested_position: Position,
    ) -> ApiResult<Card> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        let row = tx
            .query_opt(
                "SELECT column_id, position FROM cards WHERE card_id = $1 FOR UPDATE",
                &[&card_id],
            )
            .await?
            .ok_or_else(|| ApiError::card_not_found(card_id))?;
        let source_column_id: ColumnId = row.get("column_id");
        let old_position: Position = row.get("position");

        let locked = lock_columns(&tx, &[source_column_id, target_column_id]).await?;
        let source_board = locked
            .iter()
            .find(|(id, _)| *id == source_column_id)
            .map(|(_, board)| *board)
            .ok_or_else(|| ApiError::column_not_found(source_column_id))?;
        let target_board = locked
            .iter()
            .find(|(id, _)| *id == target_column_id)
            .map(|(_, board)| *board)
            .ok_or_else(|| ApiError::column_not_found(target_column_id))?;
        if source_board != target_board {
            return Err(ApiError::invalid_move(format!(
                "card {} cannot move to a column on another board",
                card_id
            )));
        }

        let plan = if source_column_id == target_column_id {
            let count: i64 = tx
                .query_one(
                    "SELECT count(*) FROM cards WHERE column_id = $1",
                    &[&source_column_id],
                )
                .await?
                .get(0);
            plan_within_parent(old_position, requested_position, count as Position)?
        } else {
            let target_count: i64 = tx
                .query_one(
                    "SELECT count(*) FROM cards WHERE column_id = $1",
                    &[&target_column_id],
                )
                .await?
                .get(0);
            plan_across_parents(old_position, requested_position, target_count as Position)?
        };

        let new_position = match plan {
            MovePlan::Noop => old_position,
            MovePlan::WithinParent {
                shift,
                new_position,
            } => {
                shift_cards(&tx, source_column_id, &shift).await?;
                new_position
            }
            MovePlan::AcrossParents {
                source_shift,
                target_shift,
                new_position,
            } => {
                shift_cards(&tx, source_column_id, &source_shift).await?;
                shift_cards(&tx, target_column_id, &target_shift).await?;
                new_position
            }
        };

        let row = tx
            .query_one(
                &format!(
                    "UPDATE cards SET column_id = $2, position = $3, updated_at = now()
                     WHERE card_id = $1
                     RETURNING {CARD_COLUMNS}"
                ),
                &[&card_id, &target_column_id, &new_position],
            )
            .await?;

        tx.commit().await?;
        Ok(row_to_card(&row))
    }
}

// ============================================================================
// TRANSACTION HELPERS
// ============================================================================

/// Escape LIKE wildcards so search input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Lock a board row for the duration of the transaction. Serializes all
/// positional mutations of the board's columns.
async fn lock_board(tx: &Transaction<'_>, board_id: BoardId) -> ApiResult<()> {
    tx.query_opt(
        "SELECT board_id FROM boards WHERE board_id = $1 FOR UPDATE",
        &[&board_id],
    )
    .await?
    .ok_or_else(|| ApiError::board_not_found(board_id))?;
    Ok(())
}

/// Lock column rows in column_id order, so concurrent cross-column moves
/// acquire them consistently. Returns each locked column with its board.
async fn lock_columns(
    tx: &Transaction<'_>,
    column_ids: &[ColumnId],
) -> ApiResult<Vec<(ColumnId, BoardId)>> {
    let ids: Vec<ColumnId> = column_ids.to_vec();
    let rows = tx
        .query(
            "SELECT column_id, board_id FROM columns
             WHERE column_id = ANY($1)
             ORDER BY column_id
             FOR UPDATE",
            &[&ids],
        )
        .await?;
    let locked: Vec<(ColumnId, BoardId)> = rows
        .iter()
        .map(|r| (r.get("column_id"), r.get("board_id")))
        .collect();
    // Single-column callers get their NotFound here.
    if let Some(&missing) = column_ids.iter().find(|id| !locked.iter().any(|(l, _)| l == *id)) {
        return Err(ApiError::column_not_found(missing));
    }
    Ok(locked)
}

/// Apply a sibling shift to a column's position range.
async fn shift_columns(
    tx: &Transaction<'_>,
    board_id: BoardId,
    shift: &SiblingShift,
) -> ApiResult<()> {
    match shift.end {
        Some(end) => {
            tx.execute(
                "UPDATE columns SET position = position + $2, updated_at = now()
                 WHERE board_id = $1 AND position >= $3 AND position <= $4",
                &[&board_id, &shift.delta, &shift.start, &end],
            )
            .await?;
        }
        None => {
            tx.execute(
                "UPDATE columns SET position = position + $2, updated_at = now()
                 WHERE board_id = $1 AND position >= $3",
                &[&board_id, &shift.delta, &shift.start],
            )
            .await?;
        }
    }
    Ok(())
}

/// Apply a sibling shift to a card position range within one column.
async fn shift_cards(
    tx: &Transaction<'_>,
    column_id: ColumnId,
    shift: &SiblingShift,
) -> ApiResult<()> {
    match shift.end {
        Some(end) => {
            tx.execute(
                "UPDATE cards SET position = position + $2, updated_at = now()
                 WHERE column_id = $1 AND position >= $3 AND position <= $4",
                &[&column_id, &shift.delta, &shift.start, &end],
            )
            .await?;
        }
        None => {
            tx.execute(
                "UPDATE cards SET position = position + $2, updated_at = now()
                 WHERE column_id = $1 AND position >= $3",
                &[&column_id, &shift.delta, &shift.start],
            )
            .await?;
        }
    }
    Ok(())
}
