use anyhow::Result;
use sea_orm::DatabaseConnection;
use service::dashboard;
use tracing::trace;

pub async fn print_summary(db: &DatabaseConnection) -> Result<()> {
    trace!("Entering print_summary function");

    let summary = dashboard::summary(db).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
