use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;

use super::catalog::skill_from_row;
use super::{Store, StoreError};
use crate::models::{CurriculumVitae, JobRole, JobSkill, PublicUser, RoleId, SkillId, UserId};

const CV_SELECT: &str = r#"
    SELECT c.id, c.gpa, c.yoe, c.graduate_id, c.job_role_id,
           r.name AS role_name,
           u.username, u.email, u.admin, u.graduate, u.employer
    FROM curriculum_vitae c
    LEFT JOIN job_roles r ON r.id = c.job_role_id
    LEFT JOIN users u ON u.id = c.graduate_id
"#;

fn cv_from_row(row: &SqliteRow) -> Result<CurriculumVitae, sqlx::Error> {
    let graduate_id: UserId = row.try_get("graduate_id")?;
    let job_role_id: RoleId = row.try_get("job_role_id")?;
    let role_name: Option<String> = row.try_get("role_name")?;
    let username: Option<String> = row.try_get("username")?;

    let graduate = match username {
        Some(username) => Some(PublicUser {
            id: graduate_id,
            username,
            email: row.try_get("email")?,
            admin: row.try_get("admin")?,
            graduate: row.try_get("graduate")?,
            employer: row.try_get("employer")?,
        }),
        None => None,
    };

    Ok(CurriculumVitae {
        id: row.try_get("id")?,
        gpa: row.try_get("gpa")?,
        yoe: row.try_get("yoe")?,
        graduate_id,
        job_role_id,
        graduate,
        job_role: role_name.map(|name| JobRole { id: job_role_id, name }),
        tree: Vec::new(),
    })
}

impl Store {
    /// The CV of one graduate, with role, skills and owner
    pub async fn load_cv_for_graduate(
        &self,
        graduate_id: UserId,
    ) -> Result<CurriculumVitae, StoreError> {
        let query = format!("{} WHERE c.graduate_id = ?", CV_SELECT);

        let row = sqlx::query(&query)
            .bind(graduate_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("CV for graduate {}", graduate_id)))?;

        let mut cv = cv_from_row(&row)?;
        cv.tree = self.skills_of_cv(cv.id).await?;

        Ok(cv)
    }

    /// Every CV except the one owned by `excluding_graduate_id`
    pub async fn load_other_graduate_cvs(
        &self,
        excluding_graduate_id: UserId,
    ) -> Result<Vec<CurriculumVitae>, StoreError> {
        let query = format!("{} WHERE c.graduate_id <> ? ORDER BY c.id", CV_SELECT);

        let rows = sqlx::query(&query)
            .bind(excluding_graduate_id)
            .fetch_all(&self.pool)
            .await?;

        self.with_skills(&rows).await
    }

    pub async fn list_cvs(&self) -> Result<Vec<CurriculumVitae>, StoreError> {
        let query = format!("{} ORDER BY c.id", CV_SELECT);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        self.with_skills(&rows).await
    }

    pub async fn get_cv(&self, id: i64) -> Result<CurriculumVitae, StoreError> {
        let query = format!("{} WHERE c.id = ?", CV_SELECT);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("CV {}", id)))?;

        let mut cv = cv_from_row(&row)?;
        cv.tree = self.skills_of_cv(id).await?;

        Ok(cv)
    }

    /// A graduate holds at most one CV
    pub async fn create_cv(
        &self,
        graduate_id: UserId,
        gpa: f64,
        yoe: f64,
        job_role_id: RoleId,
    ) -> Result<CurriculumVitae, StoreError> {
        let owner = self.get_user(graduate_id).await?;
        if !owner.graduate {
            return Err(StoreError::InvalidInput(format!(
                "User {} is not a graduate",
                graduate_id
            )));
        }
        self.get_role(job_role_id).await?;

        let result = sqlx::query(
            "INSERT INTO curriculum_vitae (gpa, yoe, graduate_id, job_role_id) VALUES (?, ?, ?, ?)",
        )
        .bind(gpa)
        .bind(yoe)
        .bind(graduate_id)
        .bind(job_role_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            StoreError::on_unique(e, format!("Graduate {} already has a CV", graduate_id))
        })?;

        self.get_cv(result.last_insert_rowid()).await
    }

    /// Add a skill to a CV; adding one twice is a no-op
    pub async fn add_cv_skill(&self, cv_id: i64, skill_id: SkillId) -> Result<(), StoreError> {
        self.get_skill(skill_id).await?;

        sqlx::query(
            "INSERT OR IGNORE INTO graduate_skills_tree (curriculum_vitae_id, job_skill_id) VALUES (?, ?)",
        )
        .bind(cv_id)
        .bind(skill_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn with_skills(&self, rows: &[SqliteRow]) -> Result<Vec<CurriculumVitae>, StoreError> {
        let mut cvs = rows
            .iter()
            .map(cv_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let mut skills = self.skills_by_cv().await?;
        for cv in &mut cvs {
            cv.tree = skills.remove(&cv.id).unwrap_or_default();
        }

        Ok(cvs)
    }

    async fn skills_by_cv(&self) -> Result<HashMap<i64, Vec<JobSkill>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT t.curriculum_vitae_id, s.id, s.name
            FROM graduate_skills_tree t
            JOIN job_skills s ON s.id = t.job_skill_id
            ORDER BY t.curriculum_vitae_id, s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut skills: HashMap<i64, Vec<JobSkill>> = HashMap::new();
        for row in &rows {
            let cv_id: i64 = row.try_get("curriculum_vitae_id")?;
            skills.entry(cv_id).or_default().push(skill_from_row(row)?);
        }

        Ok(skills)
    }

    async fn skills_of_cv(&self, cv_id: i64) -> Result<Vec<JobSkill>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name
            FROM graduate_skills_tree t
            JOIN job_skills s ON s.id = t.job_skill_id
            WHERE t.curriculum_vitae_id = ?
            ORDER BY s.id
            "#,
        )
        .bind(cv_id)
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

    async fn graduate(store: &Store, username: &str) -> UserId {
        store
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{}@uni.test", username),
                password_hash: "hash".to_string(),
                salt: "salt".to_string(),
                admin: false,
                graduate: true,
                employer: false,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_cv_lookup_and_exclusion() {
        let store = Store::in_memory().await.unwrap();
        let role = store.create_role("QA engineer").await.unwrap();
        let testing = store.create_skill("Testing").await.unwrap();

        let ada = graduate(&store, "ada").await;
        let bob = graduate(&store, "bob").await;

        let ada_cv = store.create_cv(ada, 3.2, 1.0, role.id).await.unwrap();
        store.create_cv(bob, 2.9, 0.5, role.id).await.unwrap();
        store.add_cv_skill(ada_cv.id, testing.id).await.unwrap();
        store.add_cv_skill(ada_cv.id, testing.id).await.unwrap();

        let loaded = store.load_cv_for_graduate(ada).await.unwrap();
        assert_eq!(loaded.tree, vec![testing]);
        assert_eq!(loaded.graduate.as_ref().map(|u| u.username.as_str()), Some("ada"));
        assert_eq!(loaded.job_role, Some(role));

        let others = store.load_other_graduate_cvs(ada).await.unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].graduate_id, bob);

        assert_eq!(store.list_cvs().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_second_cv_conflicts() {
        let store = Store::in_memory().await.unwrap();
        let role = store.create_role("QA engineer").await.unwrap();
        let ada = graduate(&store, "ada").await;

        store.create_cv(ada, 3.0, 0.0, role.id).await.unwrap();
        let err = store.create_cv(ada, 3.5, 1.0, role.id).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        assert!(matches!(
            store.load_cv_for_graduate(999).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cv_requires_graduate_account() {
        let store = Store::in_memory().await.unwrap();
        let role = store.create_role("QA engineer").await.unwrap();
        let acme = store
            .create_user(NewUser {
                username: "acme".to_string(),
                email: "hr@acme.test".to_string(),
                password_hash: "hash".to_string(),
                salt: "salt".to_string(),
                admin: false,
                graduate: false,
                employer: true,
            })
            .await
            .unwrap()
            .id;

        let err = store.create_cv(acme, 3.0, 1.0, role.id).await.unwrap_err();

        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert!(store.list_cvs().await.unwrap().is_empty());
    }
}
