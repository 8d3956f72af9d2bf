mod common;

#[cfg(test)]
pub mod intake_tests {
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::common::*;

    use presskit::common::ApiError;
    use presskit::db;
    use presskit::models::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn new_lead_starts_unread_with_email_unsent(pool: PgPool) {
        let lead = db::create_lead(&pool, &lead_input("Jane Roe", "jane@example.com"))
            .await
            .unwrap();

        assert_eq!(lead.status, LeadStatus::New);
        assert!(!lead.email_sent);
        assert_eq!(lead.notes, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn marking_email_sent_flips_only_the_flag(pool: PgPool) {
        let lead = db::create_lead(&pool, &lead_input("Jane Roe", "jane@example.com"))
            .await
            .unwrap();

        db::mark_lead_email_sent(&pool, lead.id).await.unwrap();

        let fetched = db::get_lead(&pool, lead.id).await.unwrap();
        assert!(fetched.email_sent);
        assert_eq!(fetched.status, LeadStatus::New);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn lead_patch_is_partial(pool: PgPool) {
        let lead = db::create_lead(&pool, &lead_input("Jane Roe", "jane@example.com"))
            .await
            .unwrap();

        let noted = db::update_lead(
            &pool,
            lead.id,
            &LeadPatch {
                notes: Some("Follow up on Monday".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(noted.status, LeadStatus::New);
        assert_eq!(noted.notes.as_deref(), Some("Follow up on Monday"));

        let read = db::update_lead(
            &pool,
            lead.id,
            &LeadPatch {
                status: Some(LeadStatus::Read),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(read.status, LeadStatus::Read);
        assert_eq!(read.notes.as_deref(), Some("Follow up on Monday"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn lead_listing_filters_and_searches(pool: PgPool) {
        let first = db::create_lead(&pool, &lead_input("Jane Roe", "jane@example.com"))
            .await
            .unwrap();
        db::create_lead(&pool, &lead_input("John Smith", "john@example.com"))
            .await
            .unwrap();

        db::update_lead(
            &pool,
            first.id,
            &LeadPatch {
                status: Some(LeadStatus::Replied),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let (replied, total) = db::list_leads(&pool, 1, 10, Some(LeadStatus::Replied), None)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(replied[0].name, "Jane Roe");

        let (found, search_total) = db::list_leads(&pool, 1, 10, None, Some("smith"))
            .await
            .unwrap();
        assert_eq!(search_total, 1);
        assert_eq!(found[0].email, "john@example.com");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn lead_delete_and_missing_ids(pool: PgPool) {
        let lead = db::create_lead(&pool, &lead_input("Jane Roe", "jane@example.com"))
            .await
            .unwrap();

        db::delete_lead(&pool, lead.id).await.unwrap();
        assert!(matches!(
            db::get_lead(&pool, lead.id).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            db::delete_lead(&pool, Uuid::new_v4()).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn application_roundtrips_typed_fields(pool: PgPool) {
        let application =
            db::create_application(&pool, &application_input("Jane Roe", "jane@example.com"))
                .await
                .unwrap();

        assert_eq!(application.status, ApplicationStatus::New);
        assert!(!application.email_sent);
        assert_eq!(application.timeline, Timeline::TwoToFourWeeks);
        assert_eq!(application.service_type, ServiceType::Build);
        assert_eq!(
            application.features,
            vec!["crm".to_string(), "payment-gateway".to_string()]
        );

        let fetched = db::get_application(&pool, application.id).await.unwrap();
        assert_eq!(fetched.timeline, Timeline::TwoToFourWeeks);
        assert_eq!(fetched.using_houzez, UsingHouzez::Yes);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn application_patch_is_partial(pool: PgPool) {
        let application =
            db::create_application(&pool, &application_input("Jane Roe", "jane@example.com"))
                .await
                .unwrap();

        let noted = db::update_application(
            &pool,
            application.id,
            &ApplicationPatch {
                admin_notes: Some("Strong fit".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(noted.status, ApplicationStatus::New);
        assert_eq!(noted.admin_notes.as_deref(), Some("Strong fit"));
        assert_eq!(noted.problem, application.problem);

        let advanced = db::update_application(
            &pool,
            application.id,
            &ApplicationPatch {
                status: Some(ApplicationStatus::CallScheduled),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(advanced.status, ApplicationStatus::CallScheduled);
        assert_eq!(advanced.admin_notes.as_deref(), Some("Strong fit"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn application_listing_filters_by_kebab_case_status(pool: PgPool) {
        let application =
            db::create_application(&pool, &application_input("Jane Roe", "jane@example.com"))
                .await
                .unwrap();
        db::create_application(&pool, &application_input("John Smith", "john@example.com"))
            .await
            .unwrap();

        db::update_application(
            &pool,
            application.id,
            &ApplicationPatch {
                status: Some(ApplicationStatus::ProposalSent),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let (sent, total) =
            db::list_applications(&pool, 1, 10, Some(ApplicationStatus::ProposalSent), None)
                .await
                .unwrap();
        assert_eq!(total, 1);
        assert_eq!(sent[0].full_name, "Jane Roe");

        let (found, search_total) = db::list_applications(&pool, 1, 10, None, Some("acme"))
            .await
            .unwrap();
        assert_eq!(search_total, 2, "search should match the shared company name");
        assert_eq!(found.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn dashboard_stats_count_and_trim_recents(pool: PgPool) {
        for i in 0..6 {
            db::create_lead(
                &pool,
                &lead_input(&format!("Lead {i}"), &format!("lead{i}@example.com")),
            )
            .await
            .unwrap();
        }
        db::create_application(&pool, &application_input("Jane Roe", "jane@example.com"))
            .await
            .unwrap();

        let dashboard = db::dashboard_stats(&pool).await.unwrap();

        assert_eq!(dashboard.stats.total_leads, 6);
        assert_eq!(dashboard.stats.new_leads, 6);
        assert_eq!(dashboard.stats.total_applications, 1);
        assert_eq!(dashboard.stats.new_applications, 1);

        assert_eq!(dashboard.recent_leads.len(), 5);
        assert_eq!(dashboard.recent_applications.len(), 1);
        assert_eq!(dashboard.recent_applications[0].service_type, ServiceType::Build);
    }
}
