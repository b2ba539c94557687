//! Coupon Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Coupon, CouponCreate, CouponUpdate};
use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const COUPON_TABLE: &str = "coupon";

#[derive(Clone)]
pub struct CouponRepository {
    base: BaseRepository,
}

impl CouponRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a coupon that can discount right now: code matches
    /// case-insensitively, `active` is set, and `now` falls inside the
    /// inclusive validity window.
    pub async fn find_valid(&self, code: &str, now: i64) -> RepoResult<Option<Coupon>> {
        let coupon: Option<Coupon> = self
            .base
            .db()
            .query(
                "SELECT * FROM coupon \
                 WHERE string::uppercase(code) = $code \
                   AND active = true \
                   AND valid_from <= $now \
                   AND valid_to >= $now \
                 LIMIT 1",
            )
            .bind(("code", code.trim().to_uppercase()))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(coupon)
    }

    /// List all coupons (administrative action)
    pub async fn find_all(&self) -> RepoResult<Vec<Coupon>> {
        let coupons: Vec<Coupon> = self
            .base
            .db()
            .query("SELECT * FROM coupon ORDER BY code")
            .await?
            .take(0)?;
        Ok(coupons)
    }

    /// Create a coupon (administrative action)
    pub async fn create(&self, data: CouponCreate) -> RepoResult<Coupon> {
        validate_percent(data.discount_percent)?;
        if data.valid_to < data.valid_from {
            return Err(RepoError::Validation(
                "valid_to must not precede valid_from".into(),
            ));
        }

        let coupon = Coupon {
            id: None,
            code: data.code.trim().to_string(),
            discount_percent: data.discount_percent,
            valid_from: data.valid_from,
            valid_to: data.valid_to,
            active: data.active.unwrap_or(true),
        };

        let created: Option<Coupon> = self
            .base
            .db()
            .create(COUPON_TABLE)
            .content(coupon)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("coupon_code") {
                    RepoError::Duplicate(format!("Coupon '{}' already exists", data.code))
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create coupon".to_string()))
    }

    /// Update a coupon (administrative action)
    pub async fn update(&self, id: &RecordId, data: CouponUpdate) -> RepoResult<Coupon> {
        let mut coupon: Coupon = self
            .base
            .db()
            .select(id.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Coupon {}", id)))?;

        if let Some(code) = data.code {
            coupon.code = code.trim().to_string();
        }
        if let Some(percent) = data.discount_percent {
            validate_percent(percent)?;
            coupon.discount_percent = percent;
        }
        if let Some(valid_from) = data.valid_from {
            coupon.valid_from = valid_from;
        }
        if let Some(valid_to) = data.valid_to {
            coupon.valid_to = valid_to;
        }
        if let Some(active) = data.active {
            coupon.active = active;
        }
        if coupon.valid_to < coupon.valid_from {
            return Err(RepoError::Validation(
                "valid_to must not precede valid_from".into(),
            ));
        }
        coupon.id = None;

        let updated: Option<Coupon> = self
            .base
            .db()
            .update(id.clone())
            .content(coupon)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Coupon {}", id)))
    }

    /// Delete a coupon (administrative action)
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Coupon> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}

fn validate_percent(percent: Decimal) -> RepoResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(RepoError::Validation(
            "discount_percent must be between 0 and 100".into(),
        ));
    }
    Ok(())
}
