use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;

use super::catalog::skill_from_row;
use super::{Store, StoreError};
use crate::models::{JobPosting, JobRole, JobSkill, RoleId, SkillId, UserId};

const JOB_SELECT: &str = r#"
    SELECT j.id, j.title, j.yoe, j.role_id, j.is_recruiting, j.employer_id,
           r.name AS role_name
    FROM jobs j
    LEFT JOIN job_roles r ON r.id = j.role_id
"#;

fn job_from_row(row: &SqliteRow) -> Result<JobPosting, sqlx::Error> {
    let role_id: RoleId = row.try_get("role_id")?;
    let role_name: Option<String> = row.try_get("role_name")?;

    Ok(JobPosting {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        yoe: row.try_get("yoe")?,
        role_id,
        role: role_name.map(|name| JobRole { id: role_id, name }),
        tree: Vec::new(),
        is_recruiting: row.try_get("is_recruiting")?,
        employer_id: row.try_get("employer_id")?,
    })
}

impl Store {
    /// Job postings still recruiting, with role and required skills
    pub async fn load_open_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        self.load_jobs(true).await
    }

    /// Job postings that stopped recruiting
    pub async fn load_closed_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        self.load_jobs(false).await
    }

    async fn load_jobs(&self, recruiting: bool) -> Result<Vec<JobPosting>, StoreError> {
        let query = format!("{} WHERE j.is_recruiting = ? ORDER BY j.id", JOB_SELECT);

        let rows = sqlx::query(&query)
            .bind(recruiting)
            .fetch_all(&self.pool)
            .await?;

        let mut jobs = rows
            .iter()
            .map(job_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let mut skills = self.skills_by_job().await?;
        for job in &mut jobs {
            job.tree = skills.remove(&job.id).unwrap_or_default();
        }

        tracing::debug!("Loaded {} jobs (recruiting: {})", jobs.len(), recruiting);

        Ok(jobs)
    }

    pub async fn get_job(&self, id: i64) -> Result<JobPosting, StoreError> {
        let query = format!("{} WHERE j.id = ?", JOB_SELECT);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Job {}", id)))?;

        let mut job = job_from_row(&row)?;
        job.tree = self.skills_of_job(id).await?;

        Ok(job)
    }

    pub async fn create_job(
        &self,
        title: &str,
        yoe: f64,
        role_id: RoleId,
        employer_id: UserId,
    ) -> Result<JobPosting, StoreError> {
        let role = self.get_role(role_id).await?;

        let result = sqlx::query(
            "INSERT INTO jobs (title, yoe, role_id, is_recruiting, employer_id) VALUES (?, ?, ?, TRUE, ?)",
        )
        .bind(title)
        .bind(yoe)
        .bind(role_id)
        .bind(employer_id)
        .execute(&self.pool)
        .await?;

        Ok(JobPosting {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            yoe,
            role_id,
            role: Some(role),
            tree: Vec::new(),
            is_recruiting: true,
            employer_id: Some(employer_id),
        })
    }

    /// Add a required skill; adding one twice is a no-op
    pub async fn add_job_skill(&self, job_id: i64, skill_id: SkillId) -> Result<(), StoreError> {
        self.get_job(job_id).await?;
        self.get_skill(skill_id).await?;

        sqlx::query("INSERT OR IGNORE INTO job_skills_tree (job_id, job_skill_id) VALUES (?, ?)")
            .bind(job_id)
            .bind(skill_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_recruiting(&self, job_id: i64, recruiting: bool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE jobs SET is_recruiting = ? WHERE id = ?")
            .bind(recruiting)
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Job {}", job_id)));
        }

        tracing::info!("Job {} recruiting set to {}", job_id, recruiting);

        Ok(())
    }

    async fn skills_by_job(&self) -> Result<HashMap<i64, Vec<JobSkill>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT t.job_id, s.id, s.name
            FROM job_skills_tree t
            JOIN job_skills s ON s.id = t.job_skill_id
            ORDER BY t.job_id, s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut skills: HashMap<i64, Vec<JobSkill>> = HashMap::new();
        for row in &rows {
            let job_id: i64 = row.try_get("job_id")?;
            skills.entry(job_id).or_default().push(skill_from_row(row)?);
        }

        Ok(skills)
    }

    async fn skills_of_job(&self, job_id: i64) -> Result<Vec<JobSkill>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name
            FROM job_skills_tree t
            JOIN job_skills s ON s.id = t.job_skill_id
            WHERE t.job_id = ?
            ORDER BY s.id
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| skill_from_row(row).map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::NewUser;

    async fn employer(store: &Store) -> UserId {
        store
            .create_user(NewUser {
                username: "acme".to_string(),
                email: "jobs@acme.test".to_string(),
                password_hash: "hash".to_string(),
                salt: "salt".to_string(),
                admin: false,
                graduate: false,
                employer: true,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_open_jobs_exclude_closed_ones() {
        let store = Store::in_memory().await.unwrap();
        let employer_id = employer(&store).await;
        let role = store.create_role("Data analyst").await.unwrap();
        let sql = store.create_skill("SQL").await.unwrap();

        let open = store.create_job("Analyst", 1.0, role.id, employer_id).await.unwrap();
        let closed = store.create_job("Senior analyst", 5.0, role.id, employer_id).await.unwrap();
        store.add_job_skill(open.id, sql.id).await.unwrap();
        store.add_job_skill(open.id, sql.id).await.unwrap();
        store.set_recruiting(closed.id, false).await.unwrap();

        let jobs = store.load_open_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, open.id);
        assert_eq!(jobs[0].tree, vec![sql]);
        assert_eq!(jobs[0].role, Some(role));

        let hidden = store.load_closed_jobs().await.unwrap();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].id, closed.id);
    }

    #[tokio::test]
    async fn test_unknown_role_and_job() {
        let store = Store::in_memory().await.unwrap();
        let employer_id = employer(&store).await;

        assert!(matches!(
            store.create_job("Ghost", 0.0, 7, employer_id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.set_recruiting(7, false).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
