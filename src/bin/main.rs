use keuanganku::{
    auth::AuthService,
    dashboard::{format_idr, summarize},
    entries::{export_csv, CsvOptions, EntryStore, InMemoryEntryStore},
    market::{MockPriceSource, PriceSource},
    state::InMemoryStorage,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    info!("KeuanganKu offline demo starting");

    // Create components
    let storage = Arc::new(InMemoryStorage::new());
    let auth = AuthService::new(storage, Duration::ZERO);
    let entries = InMemoryEntryStore::seeded();
    let prices = MockPriceSource::new();

    let user = auth.login("akuntamu@gmail.com", "tamu123").await?;
    info!(user_id = %user.id, name = %user.name, "Logged in");

    let all = entries.list().await?;
    let summary = summarize(&all, None);

    println!("\n=== DASHBOARD ({}) ===", user.name);
    println!("Total Balance:  {}", format_idr(summary.total_balance));
    println!("Income:         {}", format_idr(summary.total_income));
    println!("Expenses:       {}", format_idr(summary.total_expenses));
    println!("Savings Rate:   {:.1}%", summary.savings_rate);

    println!("\n=== ENTRIES CSV ===");
    let csv = export_csv(&all, CsvOptions::default())?;
    std::io::stdout().write_all(&csv)?;

    println!("\n=== BTC (30 days, mock) ===");
    for point in prices.chart("BTC").await? {
        let date = chrono::DateTime::from_timestamp_millis(point.timestamp)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("  {}  {:>12.2}", date, point.price);
    }

    auth.logout().await?;
    Ok(())
}
