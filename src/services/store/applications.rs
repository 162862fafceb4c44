use sqlx::Row;

use super::{Store, StoreError};
use crate::models::{JobApplication, UserId};

impl Store {
    /// Apply a graduate to an open job posting
    pub async fn create_application(
        &self,
        job_id: i64,
        graduate_id: UserId,
    ) -> Result<JobApplication, StoreError> {
        let job = self.get_job(job_id).await?;
        if !job.is_recruiting {
            return Err(StoreError::NotFound(format!("Job {} is not recruiting", job_id)));
        }
        let graduate = self.get_user(graduate_id).await?;

        let result = sqlx::query("INSERT INTO job_applications (graduate_id, job_id) VALUES (?, ?)")
            .bind(graduate_id)
            .bind(job_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                StoreError::on_unique(e, "This graduate has already applied to this job")
            })?;

        tracing::info!("Graduate {} applied to job {}", graduate_id, job_id);

        Ok(JobApplication {
            id: result.last_insert_rowid(),
            graduate_id,
            job_id,
            graduate: Some(graduate),
            job: Some(job),
        })
    }

    /// Applications, optionally narrowed to one job and/or one graduate
    pub async fn list_applications(
        &self,
        job_id: Option<i64>,
        graduate_id: Option<UserId>,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, graduate_id, job_id
            FROM job_applications
            WHERE (? IS NULL OR job_id = ?)
              AND (? IS NULL OR graduate_id = ?)
            ORDER BY id
            "#,
        )
        .bind(job_id)
        .bind(job_id)
        .bind(graduate_id)
        .bind(graduate_id)
        .fetch_all(&self.pool)
        .await?;

        let mut applications = Vec::with_capacity(rows.len());
        for row in &rows {
            let job_id: i64 = row.try_get("job_id")?;
            let graduate_id: UserId = row.try_get("graduate_id")?;

            applications.push(JobApplication {
                id: row.try_get("id")?,
                graduate_id,
                job_id,
                graduate: Some(self.get_user(graduate_id).await?),
                job: Some(self.get_job(job_id).await?),
            });
        }

        Ok(applications)
    }

    pub async fn find_application(
        &self,
        job_id: i64,
        graduate_id: UserId,
    ) -> Result<JobApplication, StoreError> {
        self.list_applications(Some(job_id), Some(graduate_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "Application of graduate {} to job {}",
                    graduate_id, job_id
                ))
            })
    }
}
