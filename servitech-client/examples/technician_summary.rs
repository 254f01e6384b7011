use servitech_client::{domain::IncidentBucket, ServitechClient};
use std::collections::BTreeMap;
use std::error::Error;
use std::{env, time::Duration};

/// Prints the total repair time per client for a technician's resolved incidents.
///
/// Reads `SERVITECH_API_URL` and `SERVITECH_TECHNICIAN_ID` from the environment (or `.env`).
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let base_url = env::var("SERVITECH_API_URL").unwrap_or_else(|_| "http://localhost:8000".into());
    let technician_id: i64 = env::var("SERVITECH_TECHNICIAN_ID")?.parse()?;

    let client = ServitechClient::new(&base_url, Duration::from_secs(5))?;
    let resolved = client
        .fetch_incidents_for_technician(technician_id, IncidentBucket::Resolved)
        .await?;

    let mut seconds_per_client: BTreeMap<Option<i64>, u64> = BTreeMap::new();
    for incident in &resolved {
        let seconds = incident.horas.as_deref().map(hms_to_seconds).unwrap_or(0);
        *seconds_per_client.entry(incident.cliente_id).or_default() += seconds;
    }

    println!("{} resolved incidents", resolved.len());
    for (client_id, seconds) in seconds_per_client {
        let label = client_id.map_or_else(|| "unknown".to_string(), |id| id.to_string());
        println!(
            "client {:>8}: {:02}:{:02}:{:02}",
            label,
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        );
    }

    Ok(())
}

fn hms_to_seconds(raw: &str) -> u64 {
    let parts: Vec<u64> = raw.split(':').filter_map(|p| p.trim().parse().ok()).collect();
    match parts.as_slice() {
        [h, m, s] => h * 3600 + m * 60 + s,
        _ => 0,
    }
}
