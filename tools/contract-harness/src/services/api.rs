//! Api service contract runner (requires `--features api`).

use std::path::Path;

use anyhow::Result;
use ladle_api::{router::build_router, state::AppState};
use ladle_api_migration::Migrator;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;

use crate::{fixture, reporter, runner::Runner, services::InfraUrls};

/// Run api migrations, seed the catalogs, start the api service in-process,
/// run all api fixtures.
///
/// Returns `true` if every fixture passed.
pub async fn run(infra: &InfraUrls, workspace_root: &Path) -> Result<bool> {
    // ── DB + migrations + seed ─────────────────────────────────────────────
    let db = Database::connect(&infra.database_url).await?;
    Migrator::up(&db, None).await?;
    seed_catalogs(&db).await?;

    // ── Start api service on a random OS-assigned port ─────────────────────
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let base_url = format!("http://127.0.0.1:{port}");

    let state = AppState { db };
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    // ── Load fixtures and run ──────────────────────────────────────────────
    let fixtures = fixture::load_all(workspace_root, Some("api"))?;
    let runner = Runner::new(&base_url);
    let mut rep = reporter::Reporter::new();

    for f in &fixtures {
        let result = runner.run(f).await;
        rep.record(f, result);
    }

    rep.print_summary();
    Ok(rep.all_passed())
}

/// Seed the tag and ingredient catalogs the fixtures assert against. The rows
/// and their serial ids match `contracts/http/api/`.
async fn seed_catalogs(db: &DatabaseConnection) -> Result<()> {
    db.execute_unprepared(
        "INSERT INTO tags (name, slug, color) VALUES \
         ('завтрак', 'breakfast', '#ffaa00'), \
         ('обед', 'lunch', '#49b64e'), \
         ('ужин', 'dinner', '#4060ff') \
         ON CONFLICT DO NOTHING",
    )
    .await?;
    db.execute_unprepared(
        "INSERT INTO ingredients (name, measurement_unit) VALUES \
         ('Мука', 'г'), \
         ('Молоко', 'мл'), \
         ('Яйца', 'шт.') \
         ON CONFLICT DO NOTHING",
    )
    .await?;
    Ok(())
}
