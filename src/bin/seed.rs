//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use bizdir::models::business::CreateBusiness;
use bizdir::services::business;
use bizdir::services::media::MediaInput;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== bizdir Seed Script ===");

    seed_users(&pool).await?;
    seed_plans(&pool).await?;
    seed_sample_businesses(&pool).await?;

    println!("\n=== Seed complete! ===");

    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = 'admin@bizdir.local')")
            .fetch_one(pool)
            .await?;

    if exists {
        println!("[skip] Users already seeded");
        return Ok(());
    }

    let users = vec![
        ("Platform Admin", "admin@bizdir.local", "admin", None),
        ("Super Admin", "superadmin@bizdir.local", "superadmin", None),
        ("Priya Nair", "priya@bizdir.local", "sales", Some("PRIYA-2024")),
        ("Marco Alves", "marco@bizdir.local", "sales", Some("MARCO-2024")),
        ("Dana Whitfield", "dana@bizdir.local", "owner", None),
    ];

    for (name, email, role, referral_code) in users {
        sqlx::query(
            "INSERT INTO users (full_name, email, role, referral_code) \
             VALUES ($1, $2, $3::user_role, $4)",
        )
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(referral_code)
        .execute(pool)
        .await?;
    }

    println!("[done] Created admin, superadmin, two sales users, and an owner");
    Ok(())
}

async fn seed_plans(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM price_plans")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Plans already exist ({count})");
        return Ok(());
    }

    let plans = vec![
        ("Starter", 0i64, 30, json!(["Basic listing"])),
        (
            "Premium",
            4900i64,
            90,
            json!(["Featured listing", "Gallery images", "Priority support"]),
        ),
    ];

    for (name, price_cents, duration_days, features) in plans {
        sqlx::query(
            "INSERT INTO price_plans (name, price_cents, duration_days, features) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(name)
        .bind(price_cents)
        .bind(duration_days)
        .bind(features)
        .execute(pool)
        .await?;
    }

    println!("[done] Created 2 pricing plans");
    Ok(())
}

async fn seed_sample_businesses(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM businesses")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Businesses already exist ({count})");
        return Ok(());
    }

    let owner_id: Uuid =
        sqlx::query_scalar("SELECT id FROM users WHERE email = 'dana@bizdir.local'")
            .fetch_one(pool)
            .await?;

    let samples = vec![
        (
            "Lakeside Family Clinic",
            "Health",
            json!({"register_number": "HL-1001", "speciality": "Pediatrics", "ambulance_available": true}),
            json!({"city": "Austin", "state": "TX"}),
            Some("PRIYA-2024"),
        ),
        (
            "Harborview Hotel",
            "Hotel",
            json!({"register_number": "HT-2001", "speciality": "Business travel", "star_rating": 4, "room_count": 120}),
            json!({"city": "Portland", "state": "OR"}),
            None,
        ),
        (
            "Willow Day Spa",
            "BeautySpa",
            json!({"register_number": "BS-3001", "speciality": "Deep tissue massage", "appointment_required": true}),
            json!({"city": "Austin", "state": "TX"}),
            None,
        ),
    ];

    for (name, category, category_data, location, referral_code) in samples {
        let input = CreateBusiness {
            name: name.to_string(),
            owner_id,
            owner_name: Some("Dana Whitfield".to_string()),
            phone: Some("+1-512-555-0148".to_string()),
            email: Some("hello@example.com".to_string()),
            website: None,
            location: Some(location),
            social_links: None,
            business_hours: Some(json!([
                {"day": "Mon", "open": "09:00", "close": "18:00"},
                {"day": "Tue", "open": "09:00", "close": "18:00"}
            ])),
            experience: None,
            description: Some(format!("{name} — seeded sample listing")),
            category: category.to_string(),
            services: None,
            category_data: Some(category_data),
            referral_code: referral_code.map(str::to_string),
            plan_id: None,
        };

        let created = business::create(pool, &input, MediaInput::default()).await?;
        println!(
            "[done] Seeded {} ({})",
            created.business.name, created.business.category
        );
    }

    Ok(())
}
