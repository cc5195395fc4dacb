//! Book instances (copies) repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::instance::{BookInstance, LoanStatus, LoanedCopy},
};

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a copy by its uuid
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book copy {} not found", id)))
    }

    /// Set a copy's due-back date. The single state-changing write of the
    /// renewal workflow; concurrent renewals are last-write-wins.
    pub async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book copy {} not found", id)));
        }

        Ok(())
    }

    /// List on-loan copies ordered by due_back ascending, paginated.
    /// With `borrower_id` set, restricted to that borrower's loans.
    pub async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        page: i64,
        per_page: i64,
        today: NaiveDate,
    ) -> AppResult<(Vec<LoanedCopy>, i64)> {
        let offset = (page - 1) * per_page;

        let mut copies = match borrower_id {
            Some(borrower_id) => {
                sqlx::query_as::<_, LoanedCopy>(
                    r#"
                    SELECT bi.id, b.title, bi.imprint, bi.due_back, bi.borrower_id,
                           u.last_name || ', ' || u.first_name AS borrower_name
                    FROM book_instances bi
                    LEFT JOIN books b ON bi.book_id = b.id
                    LEFT JOIN users u ON bi.borrower_id = u.id
                    WHERE bi.status = 'o' AND bi.borrower_id = $1
                    ORDER BY bi.due_back
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(borrower_id)
                .bind(per_page)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, LoanedCopy>(
                    r#"
                    SELECT bi.id, b.title, bi.imprint, bi.due_back, bi.borrower_id,
                           u.last_name || ', ' || u.first_name AS borrower_name
                    FROM book_instances bi
                    LEFT JOIN books b ON bi.book_id = b.id
                    LEFT JOIN users u ON bi.borrower_id = u.id
                    WHERE bi.status = 'o'
                    ORDER BY bi.due_back
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(per_page)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        for copy in &mut copies {
            copy.is_overdue = copy.due_back.map(|due| due < today).unwrap_or(false);
        }

        let total: i64 = match borrower_id {
            Some(borrower_id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM book_instances WHERE status = 'o' AND borrower_id = $1",
                )
                .bind(borrower_id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = 'o'")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok((copies, total))
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies with the given status
    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
