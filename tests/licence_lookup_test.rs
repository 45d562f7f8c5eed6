use anyhow::Result;
use chrono::{Datelike, Utc};
use rcr_returns::app::crm_service_from_config;
use rcr_returns::domain::ports::CrmLookupService;
use rcr_returns::{AppConfig, RcrError};
use std::io::Write;
use tempfile::Builder;

/// Mock-mode CRM client wired exactly as the binary wires it.
fn mock_crm() -> impl CrmLookupService {
    crm_service_from_config(&AppConfig::default()).unwrap()
}

#[tokio::test]
async fn test_licence_lookup_b7a111() -> Result<()> {
    let licence = mock_crm().get_licence("B7A111", "WA4 1HT").await?;

    assert!(licence.licence_number.ends_with("B7A111"));
    assert_eq!(licence.contact.id, "contact-identifier-111");
    assert_eq!(licence.contact.postcode, "WA4 1HT");
    Ok(())
}

#[tokio::test]
async fn test_licence_lookup_b7a718_from_full_licence_number() -> Result<()> {
    let licence = mock_crm()
        .get_licence("00310321-2DC3AAR-B7A718", "wa48ht")
        .await?;

    assert_eq!(licence.licence_number, "B7A718");
    assert_eq!(licence.contact.id, "contact-identifier-718");
    assert_eq!(licence.contact.postcode, "WA4 8HT");
    Ok(())
}

#[tokio::test]
async fn test_licence_lookup_verification_failure() {
    let result = mock_crm().get_licence("B7A718", "WA4 1HT").await;
    assert!(matches!(result, Err(RcrError::ForbiddenError { .. })));
}

#[tokio::test]
async fn test_licence_lookup_not_found() {
    match mock_crm().get_licence("notfound", "blah").await {
        Err(RcrError::NotFoundError { message }) => {
            assert_eq!(message, "Unable to retrieve permission")
        }
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_directory_file_override() -> Result<()> {
    let mut directory = Builder::new().suffix(".csv").tempfile()?;
    writeln!(directory, "permission,contact_id,postcode")?;
    writeln!(directory, "ZZ9001,contact-identifier-9001,SW1A 1AA")?;

    let config = AppConfig::from_toml_str(&format!(
        "[mock]\ndirectory_file = \"{}\"\n",
        directory.path().display().to_string().replace('\\', "/")
    ))?;
    let crm = crm_service_from_config(&config)?;

    let licence = crm.get_licence("ZZ9001", "SW1A 1AA").await?;
    assert_eq!(licence.contact.id, "contact-identifier-9001");
    assert!(crm.get_licence("B7A718", "WA4 8HT").await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_activity_lifecycle_against_simulator() -> Result<()> {
    let crm = mock_crm();
    let season = Utc::now().year();

    let started = crm.create_activity("contact-identifier-718", season).await?;
    assert!(started.starts_with("contact-identifier-718"));

    let submitted = crm
        .update_activity("contact-identifier-718", season - 1)
        .await?;
    assert!(submitted.starts_with("contact-identifier-718"));

    match crm.create_activity("contact-identifier-718", season - 2).await {
        Err(RcrError::CrmError { status, message }) => {
            assert_eq!(status, 201);
            assert_eq!(message, "Invalid contact id, season or status");
        }
        other => panic!("expected CRM rejection, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_roles_steered_by_password() -> Result<()> {
    let crm = mock_crm();

    let identity = crm
        .get_authenticated_user_roles("admin@example.com", "200")
        .await?;
    assert_eq!(identity.roles, vec!["RcrAdminUser"]);

    assert!(matches!(
        crm.get_authenticated_user_roles("admin@example.com", "403").await,
        Err(RcrError::ForbiddenError { .. })
    ));
    assert!(matches!(
        crm.get_authenticated_user_roles("admin@example.com", "not-a-code").await,
        Err(RcrError::ForbiddenError { .. })
    ));
    assert!(matches!(
        crm.get_authenticated_user_roles("admin@example.com", "500").await,
        Err(RcrError::CrmError { status: 500, .. })
    ));
    Ok(())
}
