//! Temperature traversal over the Redfish resource graph.
//!
//! ServiceRoot -> Chassis collection -> each Chassis member, then either
//! ThermalSubsystem -> ThermalMetrics -> DataSourceUri per sensor, or the legacy
//! Thermal resource with inline Temperatures. Requests are issued one at a time and
//! the first non-200 answer aborts the whole walk.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::error::FetchError;
use super::types::{Reading, ThermalSource};
use crate::redfish::{odata_id, RedfishClient, RedfishResponse, SERVICE_ROOT};

/// Log in, collect every temperature reading, and log out.
/// Logout is attempted exactly once on every path and its failure is ignored.
pub async fn fetch_temperatures(client: &dyn RedfishClient) -> Result<Vec<Reading>, FetchError> {
    let result = match client.login().await {
        Ok(()) => collect_readings(client).await,
        Err(e) => {
            warn!("Login failed: {:#}", e);
            Err(FetchError::Auth(format!("{:#}", e)))
        }
    };

    if let Err(e) = client.logout().await {
        debug!("Logout failed (ignored): {:#}", e);
    }

    match &result {
        Ok(readings) => info!("Collected {} temperature readings", readings.len()),
        Err(FetchError::Unexpected(e)) => error!("Temperature fetch aborted: {:?}", e),
        Err(e) => warn!("Temperature fetch failed: {}", e),
    }

    result
}

/// GET a resource and require HTTP 200.
async fn get_ok(client: &dyn RedfishClient, url: &str) -> Result<RedfishResponse, FetchError> {
    let response = client.get(url).await?;
    if !response.is_ok() {
        return Err(FetchError::Http {
            url: url.to_string(),
            status: response.status,
            message: response.extended_error(),
        });
    }
    Ok(response)
}

fn array_field<'a>(body: &'a Value, url: &str, field: &str) -> Result<&'a Vec<Value>, FetchError> {
    body.get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::traversal(url, field))
}

/// A chassis that is not linked to any computer system (PSU backplane, drive cage, ...).
fn lacks_computer_system(member: &RedfishResponse) -> bool {
    member.text.trim().is_empty()
        || member.body.get("Links").and_then(|l| l.get("ComputerSystems")).is_none()
}

async fn collect_readings(client: &dyn RedfishClient) -> Result<Vec<Reading>, FetchError> {
    let root = get_ok(client, SERVICE_ROOT).await?;
    let chassis_url = odata_id(&root.body, &["Chassis"])
        .ok_or_else(|| FetchError::traversal(SERVICE_ROOT, "Chassis.@odata.id"))?;

    let collection = get_ok(client, chassis_url).await?;
    let members = array_field(&collection.body, chassis_url, "Members")?;
    let several = members.len() > 1;

    let mut readings = Vec::new();
    for member in members {
        let member_url = odata_id(member, &[])
            .ok_or_else(|| FetchError::traversal(chassis_url, "Members[].@odata.id"))?;
        let chassis = get_ok(client, member_url).await?;

        if several && lacks_computer_system(&chassis) {
            debug!("Skipping {}: no Links.ComputerSystems", member_url);
            continue;
        }

        match ThermalSource::detect(&chassis.body) {
            Some(ThermalSource::Subsystem(url)) => {
                readings.extend(subsystem_readings(client, &url).await?);
            }
            Some(ThermalSource::Legacy(url)) => {
                readings.extend(legacy_readings(client, &url).await?);
            }
            None => debug!("Skipping {}: no Thermal or ThermalSubsystem", member_url),
        }
    }

    Ok(readings)
}

/// ThermalSubsystem -> ThermalMetrics -> one GET per sensor DataSourceUri.
async fn subsystem_readings(client: &dyn RedfishClient, subsystem_url: &str) -> Result<Vec<Reading>, FetchError> {
    let subsystem = get_ok(client, subsystem_url).await?;
    let metrics_url = odata_id(&subsystem.body, &["ThermalMetrics"])
        .ok_or_else(|| FetchError::traversal(subsystem_url, "ThermalMetrics.@odata.id"))?;

    let metrics = get_ok(client, metrics_url).await?;
    let sensors = array_field(&metrics.body, metrics_url, "TemperatureReadingsCelsius")?;

    let mut readings = Vec::with_capacity(sensors.len());
    for sensor in sensors {
        let source = sensor
            .get("DataSourceUri")
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::traversal(metrics_url, "TemperatureReadingsCelsius[].DataSourceUri"))?;
        let reading = get_ok(client, source).await?;
        readings.push(Reading::from_resource(&reading.body));
    }

    debug!("{}: {} sensors", metrics_url, readings.len());
    Ok(readings)
}

/// Legacy Thermal resource: readings are inline under Temperatures.
async fn legacy_readings(client: &dyn RedfishClient, thermal_url: &str) -> Result<Vec<Reading>, FetchError> {
    let thermal = get_ok(client, thermal_url).await?;
    let temperatures = array_field(&thermal.body, thermal_url, "Temperatures")?;

    debug!("{}: {} sensors", thermal_url, temperatures.len());
    Ok(temperatures.iter().map(Reading::from_resource).collect())
}
