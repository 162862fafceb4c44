use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{Store, StoreError};
use crate::models::{JobRole, JobSkill, RoleId, SkillId};

pub(super) fn skill_from_row(row: &SqliteRow) -> Result<JobSkill, sqlx::Error> {
    Ok(JobSkill {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

fn role_from_row(row: &SqliteRow) -> Result<JobRole, sqlx::Error> {
    Ok(JobRole {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

impl Store {
    pub async fn list_skills(&self) -> Result<Vec<JobSkill>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM job_skills ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| skill_from_row(row).map_err(StoreError::from))
            .collect()
    }

    pub async fn create_skill(&self, name: &str) -> Result<JobSkill, StoreError> {
        let result = sqlx::query("INSERT INTO job_skills (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(JobSkill {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn get_skill(&self, id: SkillId) -> Result<JobSkill, StoreError> {
        let row = sqlx::query("SELECT id, name FROM job_skills WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Skill {}", id)))?;

        Ok(skill_from_row(&row)?)
    }

    pub async fn list_roles(&self) -> Result<Vec<JobRole>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM job_roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| role_from_row(row).map_err(StoreError::from))
            .collect()
    }

    pub async fn create_role(&self, name: &str) -> Result<JobRole, StoreError> {
        let result = sqlx::query("INSERT INTO job_roles (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(JobRole {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn get_role(&self, id: RoleId) -> Result<JobRole, StoreError> {
        let row = sqlx::query("SELECT id, name FROM job_roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Job role {}", id)))?;

        Ok(role_from_row(&row)?)
    }
}
