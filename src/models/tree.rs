use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStatus {
    Alive,
    Dead,
    Replanted,
}

impl TreeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TreeStatus::Alive => "alive",
            TreeStatus::Dead => "dead",
            TreeStatus::Replanted => "replanted",
        }
    }
}

/// Body of `POST /api/trees`.
#[derive(Debug, Deserialize)]
pub struct TreeForm {
    pub tree_id: Option<String>,
    pub species_id: Option<i64>,
    pub beneficiary_id: i64,
    /// `YYYY-MM-DD`
    pub planting_date: String,
    pub number_of_seedlings: Option<i32>,
    pub status: Option<TreeStatus>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Validated tree ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTree {
    pub tree_id: String,
    pub species_id: Option<i64>,
    pub beneficiary_id: i64,
    pub planting_date: chrono::NaiveDate,
    pub number_of_seedlings: i32,
    pub status: TreeStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TreeForm {
    /// Check the form and fill defaults. Errors are user-facing messages.
    pub fn validate(self) -> Result<NewTree, Vec<String>> {
        let mut errors = Vec::new();

        let planting_date =
            match chrono::NaiveDate::parse_from_str(self.planting_date.trim(), "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push("planting_date must be YYYY-MM-DD".to_string());
                    None
                }
            };

        let number_of_seedlings = self.number_of_seedlings.unwrap_or(1);
        if number_of_seedlings < 1 {
            errors.push("number_of_seedlings must be at least 1".to_string());
        }
        if self.latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
            errors.push("latitude must be between -90 and 90".to_string());
        }
        if self.longitude.is_some_and(|lng| !(-180.0..=180.0).contains(&lng)) {
            errors.push("longitude must be between -180 and 180".to_string());
        }

        let tree_id = self
            .tree_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(generate_tree_id);

        match planting_date {
            Some(planting_date) if errors.is_empty() => Ok(NewTree {
                tree_id,
                species_id: self.species_id,
                beneficiary_id: self.beneficiary_id,
                planting_date,
                number_of_seedlings,
                status: self.status.unwrap_or(TreeStatus::Alive),
                latitude: self.latitude,
                longitude: self.longitude,
            }),
            _ => Err(errors),
        }
    }
}

/// `TAWI-` followed by ten upper-case hex characters.
pub fn generate_tree_id() -> String {
    let bytes: [u8; 5] = rand::rng().random();
    format!("TAWI-{}", hex::encode_upper(bytes))
}

/// Body of `POST /api/trees/{id}/updates`.
#[derive(Debug, Deserialize)]
pub struct TreeUpdateForm {
    pub status: TreeStatus,
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

pub async fn create(pool: &PgPool, tree: &NewTree) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO trees \
            (tree_id, species_id, beneficiary_id, planting_date, number_of_seedlings, status, latitude, longitude) \
         VALUES ($1, $2, $3, $4::DATE, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(&tree.tree_id)
    .bind(tree.species_id)
    .bind(tree.beneficiary_id)
    .bind(tree.planting_date.format("%Y-%m-%d").to_string())
    .bind(tree.number_of_seedlings)
    .bind(tree.status.as_str())
    .bind(tree.latitude)
    .bind(tree.longitude)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Append a dated update and move the tree to its status, atomically.
/// Returns `None` when the tree does not exist.
pub async fn record_update(
    pool: &PgPool,
    tree_id: i64,
    update: &TreeUpdateForm,
) -> Result<Option<i64>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let changed = sqlx::query("UPDATE trees SET status = $1 WHERE id = $2")
        .bind(update.status.as_str())
        .bind(tree_id)
        .execute(&mut *tx)
        .await?;
    if changed.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }
    let (update_id,): (i64,) = sqlx::query_as(
        "INSERT INTO tree_updates (tree_id, status, height_cm, notes) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(tree_id)
    .bind(update.status.as_str())
    .bind(update.height_cm)
    .bind(&update.notes)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(Some(update_id))
}
