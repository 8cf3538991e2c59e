//! Integration tests for `CommunityService` on in-memory SurrealDB.

use agora_core::AgoraError;
use agora_core::models::community::{CreateCommunity, UpdateCommunity};
use agora_core::repository::{OaiSetRepository, Pagination};
use agora_db::SurrealStore;
use agora_db::repository::{
    SurrealCommunityRepository, SurrealOaiSetRepository, SurrealRoleRepository,
};
use agora_provision::{CommunityConfig, CommunityService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service = CommunityService<
    SurrealStore<Db>,
    SurrealCommunityRepository<Db>,
    SurrealRoleRepository<Db>,
>;

async fn setup() -> (Surreal<Db>, Service) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agora_db::run_migrations(&db).await.unwrap();

    let service = CommunityService::new(
        SurrealStore::new(db.clone()),
        SurrealCommunityRepository::new(db.clone()),
        SurrealRoleRepository::new(db.clone()),
        CommunityConfig::default(),
    );
    (db, service)
}

async fn count(db: &Surreal<Db>, table: &str) -> usize {
    let mut result = db.query(format!("SELECT * FROM {table}")).await.unwrap();
    let rows: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    rows.len()
}

fn input(name: &str) -> CreateCommunity {
    CreateCommunity {
        name: name.into(),
        description: format!("All about {name}"),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_provisions_everything() {
    let (db, service) = setup().await;

    let community = service.create(input("Earth Sciences")).await.unwrap();
    assert_eq!(community.name, "Earth Sciences");
    assert_eq!(community.publication_workflow, "direct_publish");
    assert!(!community.restricted_submission);
    assert!(!community.deleted);

    let roles = service.roles(community.id).await.unwrap();
    assert_eq!(
        roles.admin.name,
        format!("com:{}:admin", community.id.simple())
    );
    assert_eq!(
        roles.member.name,
        format!("com:{}:member", community.id.simple())
    );

    assert_eq!(count(&db, "community").await, 1);
    assert_eq!(count(&db, "role").await, 2);
    assert_eq!(count(&db, "role_grant").await, 10);
    assert_eq!(count(&db, "oai_set").await, 1);
}

#[tokio::test]
async fn create_keeps_explicit_choices() {
    let (_db, service) = setup().await;

    let community = service
        .create(CreateCommunity {
            logo: Some("logo.png".into()),
            publication_workflow: Some("review_and_publish".into()),
            restricted_submission: Some(true),
            ..input("Linguistics")
        })
        .await
        .unwrap();

    assert_eq!(community.logo.as_deref(), Some("logo.png"));
    assert_eq!(community.publication_workflow, "review_and_publish");
    assert!(community.restricted_submission);
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let (db, service) = setup().await;

    service.create(input("Physics")).await.unwrap();
    let err = service.create(input("Physics")).await.unwrap_err();
    assert!(err.is_already_exists(), "unexpected error: {err}");

    assert_eq!(count(&db, "community").await, 1);
    assert_eq!(count(&db, "role").await, 2);
}

#[tokio::test]
async fn invalid_input_writes_nothing() {
    let (db, service) = setup().await;

    for bad in [
        input("   "),
        input(&"x".repeat(81)),
        CreateCommunity {
            publication_workflow: Some("self_publish".into()),
            ..input("Chemistry")
        },
        CreateCommunity {
            description: "d".repeat(2001),
            ..input("Chemistry")
        },
    ] {
        let err = service.create(bad).await.unwrap_err();
        assert!(matches!(err, AgoraError::Validation { .. }), "unexpected error: {err}");
    }

    assert_eq!(count(&db, "community").await, 0);
    assert_eq!(count(&db, "role").await, 0);
}

#[tokio::test]
async fn update_leaves_oai_set_untouched() {
    let (db, service) = setup().await;
    let community = service.create(input("Geology")).await.unwrap();

    let updated = service
        .update(
            community.id,
            UpdateCommunity {
                name: Some("Geoscience".into()),
                description: Some("Rocks and more".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Geoscience");
    assert_eq!(updated.description, "Rocks and more");
    assert!(updated.updated_at >= community.updated_at);

    let set = SurrealOaiSetRepository::new(db)
        .get_by_spec(&community.id.to_string())
        .await
        .unwrap();
    assert_eq!(set.name, "Geology");
    assert_eq!(set.description, "All about Geology");

    // Role names depend on the id only.
    let roles = service.roles(community.id).await.unwrap();
    assert_eq!(roles.admin.name, format!("com:{}:admin", community.id.simple()));
}

#[tokio::test]
async fn update_validates_and_reports_missing() {
    let (_db, service) = setup().await;
    let community = service.create(input("Astronomy")).await.unwrap();

    let err = service
        .update(
            community.id,
            UpdateCommunity {
                publication_workflow: Some("nope".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AgoraError::Validation { .. }));

    let err = service
        .update(Uuid::new_v4(), UpdateCommunity::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AgoraError::NotFound { .. }));
}

#[tokio::test]
async fn soft_delete_hides_from_default_listing() {
    let (db, service) = setup().await;
    let kept = service.create(input("Mathematics")).await.unwrap();
    let gone = service.create(input("Alchemy")).await.unwrap();

    service.delete(gone.id).await.unwrap();

    let visible = service.list(Pagination::default(), false).await.unwrap();
    assert_eq!(visible.total, 1);
    assert_eq!(visible.items[0].id, kept.id);

    let all = service.list(Pagination::default(), true).await.unwrap();
    assert_eq!(all.total, 2);

    let deleted = service.get(gone.id).await.unwrap();
    assert!(deleted.deleted);

    // Provisioned entities survive soft deletion.
    assert_eq!(count(&db, "role").await, 4);
    assert_eq!(count(&db, "oai_set").await, 2);
}

#[tokio::test]
async fn list_paginates() {
    let (_db, service) = setup().await;
    for name in ["A", "B", "C"] {
        service.create(input(name)).await.unwrap();
    }

    let page = service
        .list(Pagination { offset: 1, limit: 1 }, false)
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.offset, 1);
}

#[tokio::test]
async fn get_by_name_finds_community() {
    let (_db, service) = setup().await;
    let community = service.create(input("Oceanography")).await.unwrap();

    let found = service.get_by_name("Oceanography").await.unwrap();
    assert_eq!(found.id, community.id);

    let err = service.get_by_name("Nothing").await.unwrap_err();
    assert!(matches!(err, AgoraError::NotFound { .. }));
}

#[tokio::test]
async fn repair_restores_deleted_grants() {
    let (db, service) = setup().await;
    let community = service.create(input("Meteorology")).await.unwrap();

    db.query("DELETE oai_set; DELETE role_grant WHERE action = 'accounts-search'")
        .await
        .unwrap()
        .check()
        .unwrap();
    assert_eq!(count(&db, "role_grant").await, 9);

    let report = service.repair(community.id).await.unwrap();
    assert_eq!(report.roles.roles_created, 0);
    assert_eq!(report.roles.grants_created, 1);
    assert!(report.oai_set_created);

    assert_eq!(count(&db, "role_grant").await, 10);
    assert_eq!(count(&db, "oai_set").await, 1);

    let again = service.repair(community.id).await.unwrap();
    assert!(again.is_noop());
}

#[tokio::test]
async fn repair_unknown_community_is_not_found() {
    let (_db, service) = setup().await;
    let err = service.repair(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AgoraError::NotFound { .. }));
}

#[tokio::test]
async fn raised_limits_still_fail_validation() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agora_db::run_migrations(&db).await.unwrap();

    let service = CommunityService::new(
        SurrealStore::new(db.clone()),
        SurrealCommunityRepository::new(db.clone()),
        SurrealRoleRepository::new(db.clone()),
        CommunityConfig {
            max_name_length: 200,
            max_description_length: 10_000,
            ..Default::default()
        },
    );

    let err = service.create(input(&"x".repeat(120))).await.unwrap_err();
    assert!(matches!(err, AgoraError::Validation { .. }), "unexpected error: {err}");

    let err = service
        .create(CreateCommunity {
            description: "d".repeat(3000),
            ..input("Botany")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AgoraError::Validation { .. }), "unexpected error: {err}");

    assert_eq!(count(&db, "community").await, 0);
}
