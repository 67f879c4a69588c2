//! Sales owner resolution: referral code lookup with uniform-random
//! fallback over the active sales pool.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::user::{User, UserRole};
use crate::services::users;

/// Pick one candidate uniformly at random, or none from an empty pool.
pub fn pick_fallback<'a, R: Rng>(candidates: &'a [User], rng: &mut R) -> Option<&'a User> {
    candidates.choose(rng)
}

/// Resolve the sales owner for a new business with an injected RNG.
///
/// A supplied referral code must match exactly one user — a miss is a hard
/// `InvalidReferralCode`, never a silent fallback. Without a code, one user
/// is drawn uniformly from the sales pool; an empty pool leaves the
/// business unassigned, which is a valid terminal state.
pub async fn resolve_with<R: Rng>(
    pool: &PgPool,
    referral_code: Option<&str>,
    rng: &mut R,
) -> Result<Option<User>, AppError> {
    if let Some(code) = referral_code {
        let referrer = users::find_by_referral_code(pool, code)
            .await?
            .ok_or(AppError::InvalidReferralCode)?;
        return Ok(Some(referrer));
    }

    let candidates = users::find_by_role(pool, UserRole::Sales).await?;
    Ok(pick_fallback(&candidates, rng).cloned())
}

/// Resolve with a freshly seeded RNG; the production entry point.
pub async fn resolve(pool: &PgPool, referral_code: Option<&str>) -> Result<Option<User>, AppError> {
    let mut rng = StdRng::from_entropy();
    resolve_with(pool, referral_code, &mut rng).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sales_user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: UserRole::Sales,
            referral_code: None,
            avatar: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_pool_yields_unassigned() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_fallback(&[], &mut rng).is_none());
    }

    #[test]
    fn single_candidate_always_picked() {
        let pool = vec![sales_user("Ravi")];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_fallback(&pool, &mut rng).unwrap().full_name, "Ravi");
    }

    #[test]
    fn seeded_pick_is_deterministic() {
        let pool = vec![sales_user("A"), sales_user("B"), sales_user("C")];

        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);
        assert_eq!(
            pick_fallback(&pool, &mut first).unwrap().id,
            pick_fallback(&pool, &mut second).unwrap().id
        );
    }

    #[test]
    fn pick_eventually_covers_the_pool() {
        let pool = vec![sales_user("A"), sales_user("B"), sales_user("C")];
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick_fallback(&pool, &mut rng).unwrap().id);
        }
        assert_eq!(seen.len(), pool.len());
    }
}
